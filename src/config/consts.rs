// src/config/consts.rs

// Remote search API
pub const DEFAULT_API_URL: &str = "https://discovery.nationalarchives.gov.uk/API/search/v1/records";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const PARAM_PREFIX: &str = "sps.";
pub const CURSOR_PARAM: &str = "sps.batchStartMark";
pub const CURSOR_START: &str = "*";
pub const CURSOR_END: &str = "null";

/// Request parameters that take a list of values (comma-separated in the table).
pub const MULTI_VALUED_PARAMS: &[&str] = &[
    "sps.recordSeries",
    "sps.departments",
    "sps.taxonomySubjects",
    "sps.timePeriods",
    "sps.recordCollections",
    "sps.catalogueLevels",
    "sps.closureStatuses",
    "sps.recordRepositories",
];

// Configuration table keys
pub const KEY_LABELS: &str = "labels";
pub const KEY_REGEX: &str = "regex";
pub const KEY_OUTPUT_PATH: &str = "output_filepath";
pub const KEY_SHEET_NAME: &str = "excel_sheet_name";
pub const KEY_ENCODING: &str = "output_encoding";
pub const KEY_COLUMNS: &str = "discovery_columns";
pub const KEY_MAX_RECORDS: &str = "max_records";

pub const CONFIG_KEYS: &[&str] = &[
    KEY_LABELS,
    KEY_REGEX,
    KEY_OUTPUT_PATH,
    KEY_SHEET_NAME,
    KEY_ENCODING,
    KEY_COLUMNS,
    KEY_MAX_RECORDS,
];

pub const APPEND_SENTINEL: &str = "APPEND";
pub const LOCALE_ENCODING: &str = "LOCALE";

/// Record fields written when a row does not name its own `discovery_columns`.
pub const DEFAULT_COLUMNS: &[&str] = &[
    "reference",
    "title",
    "coveringDates",
    "startDate",
    "endDate",
    "numStartDate",
    "numEndDate",
    "description",
    "id",
    "places",
];

pub const DESCRIPTION_FIELD: &str = "description";

// Columns appended after the label columns
pub const NO_LABELS_COLUMN: &str = "no_label_data";
pub const RESIDUAL_COLUMN: &str = "possible_unlisted_labels";

/// Separator for list values rendered into a single cell.
pub const LIST_SEP: &str = "; ";

// Spreadsheet sheet names
pub const SHEET_NAME_MAX: usize = 31;
pub const SHEET_NAME_FORBIDDEN: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];
pub const SHEET_DEDUP_ATTEMPTS: usize = 3;
pub const SPREADSHEET_EXT: &str = "xlsx";
