// src/config/mod.rs

pub mod consts;
pub mod options;
pub mod row;
pub mod table;

pub use options::RunOptions;
pub use row::{ConfigRow, Destination};
pub use table::ConfigTable;
