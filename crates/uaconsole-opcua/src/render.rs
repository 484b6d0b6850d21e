// SPDX-License-Identifier: MIT
// Copyright (c) 2025 UAConsole contributors.

//! Pure text rendering for tree output.
//!
//! Everything here is a total function over its inputs: formatting never
//! performs I/O and never fails. The traversal engine composes these into
//! one output line per visited node.

use crate::client::transport::{ReadOutcome, UaVariant};
use crate::types::{NodeClass, NodeId, QualifiedName};

/// Deepest level that still widens the indent. Levels beyond this render
/// flush with the cap so a hostile depth cannot grow lines without bound.
pub const MAX_INDENT_LEVELS: u32 = 32;

/// Returns the indentation for a depth level: two spaces per level,
/// capped at [`MAX_INDENT_LEVELS`].
pub fn indent(depth: u32) -> String {
    "  ".repeat(depth.min(MAX_INDENT_LEVELS) as usize)
}

/// Renders a variant as display text.
///
/// Dispatch over a closed set of decoded kinds with a default arm:
/// Boolean, UInt16, UInt32, Float (two decimal places) and DateTime
/// (`YYYY-MM-DD HH:MM:SS`, UTC) decode to value text; every other kind
/// renders as `[<type-name>]`. Total — an unsupported kind is a
/// placeholder, never an error.
pub fn variant_text(value: &UaVariant) -> String {
    match value {
        UaVariant::Boolean(v) => if *v { "true" } else { "false" }.to_string(),
        UaVariant::UInt16(v) => v.to_string(),
        UaVariant::UInt32(v) => v.to_string(),
        UaVariant::Float(v) => format!("{:.2}", v),
        UaVariant::DateTime(v) => v.format("%Y-%m-%d %H:%M:%S").to_string(),
        other => format!("[{}]", other.type_name()),
    }
}

/// Renders a failed value read with its raw status code.
pub fn read_error_text(status_code: u32) -> String {
    format!("[Read error: 0x{:08X}]", status_code)
}

/// Renders the ` = <value>` / ` [Read error: ...]` suffix for a Variable
/// node's line.
///
/// The decoder only ever sees the variant of a successful read; a bad
/// status or an empty variant renders the raw status instead.
pub fn value_suffix(outcome: &ReadOutcome) -> String {
    match &outcome.value {
        Some(value) if outcome.is_good() && !value.is_null() => {
            format!(" = {}", variant_text(value))
        }
        _ => format!(" {}", read_error_text(outcome.status_code)),
    }
}

/// Renders the base line for one node: indentation, browse name,
/// bracketed NodeId, and class label.
pub fn node_line(
    depth: u32,
    browse_name: &QualifiedName,
    node_id: &NodeId,
    node_class: NodeClass,
) -> String {
    format!(
        "{}{} {} ({})",
        indent(depth),
        browse_name.name,
        node_id.to_bracket_string(),
        node_class.label()
    )
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_indent() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(1), "  ");
        assert_eq!(indent(3), "      ");
        // Capped: deeper levels stop widening.
        assert_eq!(indent(MAX_INDENT_LEVELS + 10), indent(MAX_INDENT_LEVELS));
    }

    #[test]
    fn test_decode_boolean() {
        assert_eq!(variant_text(&UaVariant::Boolean(true)), "true");
        assert_eq!(variant_text(&UaVariant::Boolean(false)), "false");
    }

    #[test]
    fn test_decode_unsigned() {
        assert_eq!(variant_text(&UaVariant::UInt16(512)), "512");
        assert_eq!(variant_text(&UaVariant::UInt32(70000)), "70000");
    }

    #[test]
    fn test_decode_float_two_places() {
        assert_eq!(variant_text(&UaVariant::Float(3.14159)), "3.14");
        assert_eq!(variant_text(&UaVariant::Float(2.0)), "2.00");
        assert_eq!(variant_text(&UaVariant::Float(-0.005)), "-0.01");
    }

    #[test]
    fn test_decode_datetime() {
        let dt = chrono::Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(variant_text(&UaVariant::DateTime(dt)), "2025-01-01 00:00:00");

        let dt = chrono::Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 7).unwrap();
        assert_eq!(variant_text(&UaVariant::DateTime(dt)), "2025-12-31 23:59:07");
    }

    #[test]
    fn test_undecoded_kinds_render_type_name() {
        assert_eq!(variant_text(&UaVariant::Int32(-42)), "[Int32]");
        assert_eq!(variant_text(&UaVariant::Double(1.5)), "[Double]");
        assert_eq!(variant_text(&UaVariant::String("hello".into())), "[String]");
        assert_eq!(variant_text(&UaVariant::ByteString(vec![1, 2])), "[ByteString]");
        assert_eq!(variant_text(&UaVariant::Array(vec![])), "[Array]");
    }

    #[test]
    fn test_read_error_text() {
        assert_eq!(read_error_text(0x8001_0000), "[Read error: 0x80010000]");
        assert_eq!(read_error_text(0), "[Read error: 0x00000000]");
    }

    #[test]
    fn test_value_suffix() {
        let ok = ReadOutcome::success(UaVariant::Float(3.14159));
        assert_eq!(value_suffix(&ok), " = 3.14");

        let bad = ReadOutcome::failure(0x8001_0000);
        assert_eq!(value_suffix(&bad), " [Read error: 0x80010000]");

        // Empty variant with a good status still renders as a read error.
        let empty = ReadOutcome::success(UaVariant::Null);
        assert_eq!(value_suffix(&empty), " [Read error: 0x00000000]");
    }

    #[test]
    fn test_node_line() {
        let line = node_line(
            2,
            &QualifiedName::standard("Temperature"),
            &NodeId::numeric(2, 1001),
            NodeClass::Variable,
        );
        assert_eq!(line, "    Temperature [ns=2;i=1001] (Variable)");
    }
}
