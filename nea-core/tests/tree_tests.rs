//! 值树集成测试 - 解析、访问与序列化

use std::io::Cursor;

use nea_core::{NeaError, ParseMode, Scalar, ValueNode};
use pretty_assertions::assert_eq;

const UNIT: &str = "\
[unit:
\tname: Archer;
\thp: 12;
\tspeed: 1.5;
\tranged: yes;
\t[tags:
\t\tfirst: scout;
\t]
]";

// ===== 解析测试 =====

#[test]
fn test_parse_nested_document() {
    let unit = ValueNode::parse(UNIT).unwrap();
    assert_eq!(unit.key(), "unit");
    assert_eq!(unit.len(), 5);
    assert_eq!(unit.get("name").unwrap().as_text().unwrap(), "Archer");
    assert_eq!(unit.get("hp").unwrap().as_integer().unwrap(), 12);
    assert_eq!(unit.get("speed").unwrap().as_decimal().unwrap(), 1.5);
    assert!(unit.get("ranged").unwrap().as_bool().unwrap());
    assert_eq!(
        unit.get("tags").unwrap().get("first").unwrap().as_text().unwrap(),
        "scout"
    );
}

#[test]
fn test_children_sorted_by_key() {
    let unit = ValueNode::parse(UNIT).unwrap();
    let keys: Vec<&str> = unit.children().unwrap().keys().collect();
    assert_eq!(keys, vec!["hp", "name", "ranged", "speed", "tags"]);
}

#[test]
fn test_parse_multiple_top_level_nodes() {
    let nodes = ValueNode::parse_all("a: 1;\n[b: c: 2;]\nd: three;").unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[1].get("c").unwrap().as_integer().unwrap(), 2);
    assert_eq!(nodes[2].scalar(), Some(&Scalar::Text("three".to_string())));
}

#[test]
fn test_flat_mode_keeps_raw_body() {
    let nodes = ValueNode::from_reader(Cursor::new(UNIT), ParseMode::Flat).unwrap();
    assert_eq!(nodes.len(), 1);
    let raw = nodes[0].as_text().unwrap();
    assert!(raw.starts_with("name: Archer;"));
    assert!(raw.contains("[tags:"));
}

#[test]
fn test_from_reader_recursive() {
    let nodes = ValueNode::from_reader(Cursor::new("x: 1;\r\ny: 2;\r\n"), ParseMode::Recursive).unwrap();
    let keys: Vec<&str> = nodes.iter().map(ValueNode::key).collect();
    assert_eq!(keys, vec!["x", "y"]);
}

// ===== 序列化测试 =====

#[test]
fn test_save_round_trip() {
    let unit = ValueNode::parse(UNIT).unwrap();
    let saved = unit.save(0);
    let reparsed = ValueNode::parse(&saved).unwrap();
    assert_eq!(reparsed.save(0), saved);
    assert_eq!(reparsed.get("hp").unwrap().as_integer().unwrap(), 12);
}

#[test]
fn test_save_with_indent() {
    let node = ValueNode::composite("a", vec![ValueNode::leaf("b", 1)]);
    assert_eq!(node.save(1), "\t[a:\n\t\tb: 1;\n\t]");
}

// ===== 错误测试 =====

#[test]
fn test_unterminated_section_reports_position() {
    let err = ValueNode::parse("\n[unit:\n\thp: 3;").unwrap_err();
    assert!(matches!(err, NeaError::Syntax { .. }));
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_carriage_return_line_endings() {
    let unit = ValueNode::parse("[unit:\r\thp: 3;\r\tname: Old Mac;\r]").unwrap();
    assert_eq!(unit.get("hp").unwrap().as_integer().unwrap(), 3);
    assert_eq!(unit.get("name").unwrap().as_text().unwrap(), "Old Mac");

    let err = ValueNode::parse("[u:\r x: 1\r]").unwrap_err();
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_reader_failure_surfaces_as_io_error() {
    let mut bytes = b"ok: 1;\n".to_vec();
    bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
    let err = ValueNode::from_reader(Cursor::new(bytes), ParseMode::Recursive).unwrap_err();
    assert!(matches!(err, NeaError::Io(_)));
}

#[test]
fn test_coercion_error_names_key() {
    let unit = ValueNode::parse(UNIT).unwrap();
    let err = unit.get("name").unwrap().as_integer().unwrap_err();
    assert!(err.to_string().contains("name"));
}
