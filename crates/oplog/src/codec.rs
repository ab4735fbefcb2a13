//! Line encoding of journal records.
//!
//! One record per line, five tab-separated fields:
//!
//! ```text
//! id \t type \t status \t timestamp \t key=value&key=value
//! ```
//!
//! Every field, key and value is percent-encoded, so tabs, newlines,
//! `&`, `=` and `%` inside file content or paths never break the framing.
//! A `+` read back from a field decodes to a space, matching journals
//! written with form encoding.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::entry::{JournalEntry, Params};
use crate::error::{Error, Result};

/// Everything except ASCII alphanumerics and `-_.*` is escaped
const FIELD: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'*');

const FIELD_COUNT: usize = 5;

pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, FIELD).to_string()
}

pub fn decode_component(s: &str) -> Result<String> {
    let plus_as_space = s.replace('+', " ");
    percent_decode_str(&plus_as_space)
        .decode_utf8()
        .map(|cow| cow.into_owned())
        .map_err(|e| Error::corrupt(format!("invalid UTF-8 in '{s}': {e}")))
}

pub fn encode_params(params: &Params) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Decode a parameter string. Pairs without `=` are dropped.
pub fn decode_params(s: &str) -> Result<Params> {
    let mut params = Params::new();
    for pair in s.split('&') {
        let Some((k, v)) = pair.split_once('=') else {
            continue;
        };
        _ = params.insert(decode_component(k)?, decode_component(v)?);
    }
    Ok(params)
}

/// Encode a record as a single line, without the trailing newline
pub fn encode_line(entry: &JournalEntry) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        encode_component(&entry.id),
        encode_component(entry.op.as_str()),
        encode_component(entry.status.as_str()),
        entry.timestamp,
        encode_params(&entry.params)
    )
}

pub fn decode_line(line: &str) -> Result<JournalEntry> {
    let fields: Vec<&str> = line.splitn(FIELD_COUNT, '\t').collect();
    let [id, op, status, timestamp, params] = fields.as_slice() else {
        return Err(Error::corrupt(format!(
            "expected {FIELD_COUNT} fields, found {}",
            fields.len()
        )));
    };

    let timestamp = decode_component(timestamp)?
        .parse::<i64>()
        .map_err(|e| Error::corrupt(format!("bad timestamp '{timestamp}': {e}")))?;

    Ok(JournalEntry {
        id: decode_component(id)?,
        op: decode_component(op)?.parse()?,
        status: decode_component(status)?.parse()?,
        timestamp,
        params: decode_params(params)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{EntryStatus, OperationType, PARAM_CONTENT, PARAM_PATH, params};

    #[test]
    fn test_component_escapes_framing_characters() {
        let raw = "a\tb\nc&d=e%f+g h";
        let encoded = encode_component(raw);
        for ch in ['\t', '\n', '&', '=', '+', ' '] {
            assert!(!encoded.contains(ch), "{ch:?} leaked into {encoded}");
        }
        assert_eq!(decode_component(&encoded).unwrap(), raw);
    }

    #[test]
    fn test_component_keeps_unreserved() {
        assert_eq!(encode_component("abc-XYZ_0.9*"), "abc-XYZ_0.9*");
        assert_eq!(encode_component("/x.txt"), "%2Fx.txt");
    }

    #[test]
    fn test_plus_decodes_as_space() {
        assert_eq!(decode_component("hello+world").unwrap(), "hello world");
        assert_eq!(decode_component("1%2B1").unwrap(), "1+1");
    }

    #[test]
    fn test_unicode_component() {
        let raw = "diretório/água ☃";
        assert_eq!(decode_component(&encode_component(raw)).unwrap(), raw);
    }

    #[test]
    fn test_invalid_utf8_is_corrupt() {
        assert!(matches!(
            decode_component("%FF%FE"),
            Err(Error::CorruptRecord(_))
        ));
    }

    #[test]
    fn test_params_round_trip_with_empty_values() {
        let p = params([("path", "/a b"), ("content", ""), ("", "empty key")]);
        assert_eq!(decode_params(&encode_params(&p)).unwrap(), p);

        let empty = Params::new();
        assert_eq!(encode_params(&empty), "");
        assert_eq!(decode_params("").unwrap(), empty);
    }

    #[test]
    fn test_decode_params_drops_pairs_without_separator() {
        let p = decode_params("a=1&&junk&b=").unwrap();
        assert_eq!(p, params([("a", "1"), ("b", "")]));
    }

    #[test]
    fn test_decode_params_keeps_equals_in_value() {
        let p = decode_params("k=a=b").unwrap();
        assert_eq!(p.get("k").map(String::as_str), Some("a=b"));
    }

    #[test]
    fn test_line_round_trip() {
        let entry = JournalEntry {
            id: "0190a1b2-c3d4-7e5f-8a9b-0c1d2e3f4a5b".to_string(),
            op: OperationType::Write,
            params: params([(PARAM_PATH, "/x.txt"), (PARAM_CONTENT, "line1\nline2\tend&more")]),
            status: EntryStatus::Pending,
            timestamp: 1_700_000_000_123,
        };
        let line = encode_line(&entry);
        assert!(!line.contains('\n'));
        assert_eq!(line.matches('\t').count(), 4);

        let back = decode_line(&line).unwrap();
        assert_eq!(back, entry);
        assert_eq!(encode_line(&back), line);
    }

    #[test]
    fn test_decode_line_with_empty_params() {
        let entry = decode_line("id1\tTOUCH\tCOMMITTED\t42\t").unwrap();
        assert_eq!(entry.id, "id1");
        assert_eq!(entry.op, OperationType::Touch);
        assert_eq!(entry.status, EntryStatus::Committed);
        assert_eq!(entry.timestamp, 42);
        assert!(entry.params.is_empty());
    }

    #[test]
    fn test_decode_line_failures() {
        assert!(decode_line("").is_err());
        assert!(decode_line("id\tMKDIR\tPENDING\t12").is_err());
        assert!(decode_line("id\tMKDIR\tPENDING\tnot-a-number\tpath=%2Fa").is_err());
        assert!(decode_line("id\tFORMAT\tPENDING\t12\t").is_err());
        assert!(decode_line("id\tMKDIR\tMAYBE\t12\t").is_err());
    }

    #[test]
    fn test_decode_line_reads_form_encoded_journal() {
        let entry =
            decode_line("abc\tWRITE\tCOMMIT\t1\tcontent=hello+world&path=%2Fdocs%2Fa.txt").unwrap();
        assert_eq!(entry.status, EntryStatus::Committed);
        assert_eq!(entry.param("content"), Some("hello world"));
        assert_eq!(entry.param("path"), Some("/docs/a.txt"));
    }
}
