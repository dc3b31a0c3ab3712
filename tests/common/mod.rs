//! Record types shared by the integration suites.

#![allow(dead_code)]

use goon::{record, Dynamic, Registry};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestInner {
    pub value: f32,
}

record! {
    TestInner as "testInner" in "goon" {
        "TestInnerValue" => value,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenPosition {
    pub filename: String,
    pub offset: i64,
    pub line: i64,
    pub column: i64,
}

record! {
    TokenPosition as "Position" in "token" {
        "Filename" => filename,
        "Offset" => offset,
        "Line" => line,
        "Column" => column,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestUnit {
    pub name: String,
    pub kind: Option<i64>,
    pub map: HashMap<String, i64>,
    pub uint: u64,
    pub interface_map: HashMap<i64, Dynamic>,
    pub seq: Vec<Dynamic>,
    pub flag: bool,
    pub inner: TestInner,
    pub array: Vec<i64>,
    pub interface_struct: Dynamic,
    pub interface_val: Dynamic,
    pub position: TokenPosition,
    pub ignored: String,
}

record! {
    TestUnit as "testUnit" in "goon" {
        "Name" => name,
        "Type" => kind,
        "Map" => map,
        "Uint" => uint,
        "InterfaceMap" => interface_map,
        "Seq" => seq,
        "Bool" => flag,
        "TestInner" => inner,
        "Array" => array,
        "InterfaceStruct" => interface_struct,
        "InterfaceVal" => interface_val,
        "Position" => position,
        "Ignored" => ignored [skip],
    }
}

pub fn registry() -> Registry {
    Registry::new()
        .with::<TestUnit>()
        .with::<TestInner>()
        .with::<TokenPosition>()
}

pub fn nested_unit() -> TestUnit {
    TestUnit {
        name: "Test".into(),
        kind: Some(10),
        flag: true,
        ..TestUnit::default()
    }
}

pub fn compare_unit() -> TestUnit {
    let mut map = HashMap::new();
    map.insert("Key1".to_string(), 10);

    let mut interface_map = HashMap::new();
    interface_map.insert(1, Dynamic::from("Test1"));
    interface_map.insert(2, Dynamic::from(2));
    interface_map.insert(3, Dynamic::from("Test3"));
    interface_map.insert(4, Dynamic::record(nested_unit()));

    TestUnit {
        name: "testUnit 1".into(),
        kind: Some(10),
        map,
        uint: 23,
        interface_map,
        seq: vec![
            Dynamic::from(0),
            Dynamic::record(nested_unit()),
            Dynamic::from(2),
            Dynamic::from(3),
        ],
        flag: false,
        inner: TestInner { value: 20.0 },
        array: vec![1, 2, 3, 4],
        interface_struct: Dynamic::record(TestInner { value: 30.0 }),
        interface_val: Dynamic::from("String"),
        position: TokenPosition {
            filename: "Word".into(),
            ..TokenPosition::default()
        },
        ignored: String::new(),
    }
}
