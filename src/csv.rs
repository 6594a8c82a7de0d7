// src/csv.rs
// Delimited-text encoding of a result table.

use encoding_rs::Encoding;
use tracing::warn;

use crate::{core::encoding, store::DataSet};

/// Serialize `data` as CSV in `enc`. The header line is skipped when
/// appending to a file that already has one.
pub fn to_csv_bytes(
    data: &DataSet,
    with_header: bool,
    enc: &'static Encoding,
) -> Result<Vec<u8>, ::csv::Error> {
    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(Vec::new());

    if with_header {
        writer.write_record(&data.headers)?;
    }
    for row in &data.rows {
        writer.write_record(row)?;
    }

    let utf8 = writer.into_inner().map_err(|e| e.into_error())?;
    // csv only ever writes what it was given, which is valid UTF-8
    let text = String::from_utf8_lossy(&utf8);
    let (bytes, lossy) = encoding::encode(&text, enc);
    if lossy {
        warn!(encoding = enc.name(), "some characters could not be encoded and were replaced");
    }
    if with_header {
        // a header chunk starts the file
        return Ok([encoding::bom(enc), bytes.as_slice()].concat());
    }
    Ok(bytes)
}
