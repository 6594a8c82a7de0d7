// src/core/encoding.rs
//! Output text encodings for delimited files.

use std::env;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

use crate::config::consts::LOCALE_ENCODING;

/// Map a configured encoding name to an encoder.
/// Absent/blank is UTF-8; `LOCALE` is the host default; unknown names are `None`.
pub fn resolve(label: Option<&str>) -> Option<&'static Encoding> {
    match label.map(str::trim) {
        None | Some("") => Some(UTF_8),
        Some(l) if l.eq_ignore_ascii_case(LOCALE_ENCODING) => Some(locale_encoding()),
        Some(l) => Encoding::for_label(l.as_bytes()),
    }
}

/// Best guess at the host's default text encoding.
pub fn locale_encoding() -> &'static Encoding {
    for var in ["LC_ALL", "LC_CTYPE", "LANG"] {
        if let Ok(value) = env::var(var) {
            if value.is_empty() { continue; }
            // "en_GB.UTF-8@euro" → "UTF-8"
            if let Some((_, charset)) = value.split_once('.') {
                let charset = charset.split('@').next().unwrap_or(charset);
                if let Some(enc) = Encoding::for_label(charset.as_bytes()) {
                    return enc;
                }
            }
            break;
        }
    }
    platform_default()
}

#[cfg(windows)]
fn platform_default() -> &'static Encoding { encoding_rs::WINDOWS_1252 }

#[cfg(not(windows))]
fn platform_default() -> &'static Encoding { UTF_8 }

/// Encode UTF-8 text for writing. The flag is true when some characters
/// could not be represented and were replaced.
///
/// `encoding_rs` only decodes UTF-16, so those two are encoded here.
/// No byte order mark is written; see `bom`.
pub fn encode(text: &str, encoding: &'static Encoding) -> (Vec<u8>, bool) {
    if encoding == UTF_8 {
        return (text.as_bytes().to_vec(), false);
    }
    if encoding == UTF_16LE {
        return (text.encode_utf16().flat_map(u16::to_le_bytes).collect(), false);
    }
    if encoding == UTF_16BE {
        return (text.encode_utf16().flat_map(u16::to_be_bytes).collect(), false);
    }
    let (bytes, _, lossy) = encoding.encode(text);
    (bytes.into_owned(), lossy)
}

/// Byte order mark that starts a new file in `encoding`. Empty except for UTF-16.
pub fn bom(encoding: &'static Encoding) -> &'static [u8] {
    if encoding == UTF_16LE {
        b"\xFF\xFE"
    } else if encoding == UTF_16BE {
        b"\xFE\xFF"
    } else {
        b""
    }
}
