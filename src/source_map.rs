//! Line-granular source maps.
//!
//! Every output line produced from the body maps its column 0 to column 0 of
//! the input line with the same index. Prefix code shares the first line with
//! the body and suffix lines are left unmapped, so the mappings string is one
//! `AAAA` segment followed by `AACA` for each further body line.

use serde::{Deserialize, Serialize};
use zest_common::count_newlines;

/// A version 3 source map as it is written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSourceMap {
    pub version: u32,
    pub file: String,
    pub sources: Vec<String>,
    pub names: Vec<String>,
    pub mappings: String,
}

impl RawSourceMap {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Build the map for `output`, whose first `body_line_count` lines come from
/// the input line for line.
pub fn compute_source_map(
    output: &str,
    body_line_count: usize,
    compiled_filename: &str,
    source_path: Option<&str>,
) -> RawSourceMap {
    let output_line_count = count_newlines(output) + 1;
    let mapped = body_line_count.min(output_line_count);
    let mut mappings = String::with_capacity(output_line_count * 5);
    for line in 0..output_line_count {
        if line > 0 {
            mappings.push(';');
        }
        if line < mapped {
            // generated column 0, source 0, one input line down, column 0
            let line_delta = if line == 0 { 0 } else { 1 };
            vlq::encode_into(0, &mut mappings);
            vlq::encode_into(0, &mut mappings);
            vlq::encode_into(line_delta, &mut mappings);
            vlq::encode_into(0, &mut mappings);
        }
    }
    tracing::trace!(lines = output_line_count, mapped, "computed source map");
    RawSourceMap {
        version: 3,
        file: compiled_filename.to_string(),
        sources: vec![source_path.unwrap_or_default().to_string()],
        names: Vec::new(),
        mappings,
    }
}

/// Base64 variable-length quantities.
pub mod vlq {
    const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    const SHIFT: u32 = 5;
    const CONTINUATION_BIT: u32 = 1 << SHIFT;
    const MASK: u32 = CONTINUATION_BIT - 1;

    pub fn encode_into(value: i32, out: &mut String) {
        let mut rest = if value < 0 {
            (value.unsigned_abs() << 1) | 1
        } else {
            (value as u32) << 1
        };
        loop {
            let mut digit = rest & MASK;
            rest >>= SHIFT;
            if rest > 0 {
                digit |= CONTINUATION_BIT;
            }
            out.push(BASE64[digit as usize] as char);
            if rest == 0 {
                break;
            }
        }
    }

    /// Decode one value, returning it and the number of bytes consumed.
    pub fn decode(input: &str) -> Option<(i32, usize)> {
        let mut result = 0u32;
        let mut shift = 0u32;
        for (consumed, byte) in input.bytes().enumerate() {
            let digit = BASE64.iter().position(|&c| c == byte)? as u32;
            result |= (digit & MASK) << shift;
            if digit & CONTINUATION_BIT == 0 {
                let magnitude = (result >> 1) as i32;
                let value = if result & 1 == 1 { -magnitude } else { magnitude };
                return Some((value, consumed + 1));
            }
            shift += SHIFT;
            if shift > 30 {
                return None;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vlq_encodes_small_values() {
        let mut out = String::new();
        vlq::encode_into(0, &mut out);
        vlq::encode_into(1, &mut out);
        vlq::encode_into(-1, &mut out);
        vlq::encode_into(16, &mut out);
        assert_eq!(out, "ACDgB");
    }

    #[test]
    fn test_vlq_decode_matches_encode() {
        for value in [0, 1, -1, 15, 16, -16, 1000, -12345] {
            let mut out = String::new();
            vlq::encode_into(value, &mut out);
            assert_eq!(vlq::decode(&out), Some((value, out.len())));
        }
    }

    #[test]
    fn test_mappings_cover_body_lines_only() {
        let map = compute_source_map("a;\nb;\nc;\nsuffix();", 3, "out.js", Some("in.js"));
        assert_eq!(map.mappings, "AAAA;AACA;AACA;");
        assert_eq!(map.version, 3);
        assert_eq!(map.file, "out.js");
        assert_eq!(map.sources, vec!["in.js".to_string()]);
        assert!(map.names.is_empty());
    }

    #[test]
    fn test_single_line_map() {
        let map = compute_source_map("\"use strict\"; x;", 1, "out.js", None);
        assert_eq!(map.mappings, "AAAA");
        assert_eq!(map.sources, vec![String::new()]);
    }

    #[test]
    fn test_source_map_json_field_names() {
        let map = compute_source_map("x", 1, "out.js", Some("in.js"));
        let json: serde_json::Value = serde_json::from_str(&map.to_json().unwrap()).unwrap();
        assert_eq!(json["version"], 3);
        assert_eq!(json["mappings"], "AAAA");
        assert_eq!(json["sources"][0], "in.js");
    }
}
