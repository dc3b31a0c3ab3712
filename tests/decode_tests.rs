mod common;

use common::{compare_unit, registry, TestInner, TestUnit};
use goon::{decode, decode_reader, decode_slice, decode_typed, record, Decoder, Dynamic, Error};
use std::collections::HashMap;

const COMPLEX_TYPE_TEST: &str = r#"package goon

var unit1 = &testUnit{
	Name: "testUnit 1",
	Type: 10,
	Map: map[string]int{
		"Key1": 10,
	},
	Uint: 23,
	InterfaceMap: map[int]interface{}{
		1: "Test1",
		2: 2,
		3: "Test3",
		4: &testUnit{
			Name: "Test",
			Type: 10,
			Map: nil,
			Uint: 0,
			InterfaceMap: nil,
			Seq: nil,
			Bool: true,
			TestInner: testInner{
				TestInnerValue: 0,
			},
			Array: nil,
			InterfaceStruct: nil,
			InterfaceVal: nil,
			Position: token.Position{
				Filename: "",
				Offset: 0,
				Line: 0,
				Column: 0,
			},
		},
	},
	Seq: []interface{}{
		0,
		&testUnit{
			Name: "Test",
			Type: 10,
			Map: nil,
			Uint: 0,
			InterfaceMap: nil,
			Seq: nil,
			Bool: true,
			TestInner: testInner{
				TestInnerValue: 0,
			},
			Array: nil,
			InterfaceStruct: nil,
			InterfaceVal: nil,
			Position: token.Position{
				Filename: "",
				Offset: 0,
				Line: 0,
				Column: 0,
			},
		},
		2,
		3,
	},
	Bool: false,
	TestInner: testInner{
		TestInnerValue: 20,
	},
	Array: []interface{}{
		1,
		2,
		3,
		4,
	},
	InterfaceStruct: &testInner{
		TestInnerValue: 30,
	},
	InterfaceVal: "String",
	Position: token.Position{
		Filename: "Word",
		Offset: 0,
		Line: 0,
		Column: 0,
	},
}"#;

#[test]
fn test_complex_type_fixture() {
    let registry = registry();
    let (doc, diagnostics) = decode_typed("data.goon", COMPLEX_TYPE_TEST, &registry).unwrap();
    assert!(diagnostics.is_empty(), "{}", diagnostics);

    let unit = doc
        .get("unit1")
        .and_then(|v| v.as_record::<TestUnit>())
        .expect("unit1 should decode as a testUnit");
    assert_eq!(unit, &compare_unit());
}

#[test]
fn test_complex_type_fixture_untyped() {
    let (doc, diagnostics) = decode("data.goon", COMPLEX_TYPE_TEST).unwrap();
    assert!(diagnostics.is_empty());

    let unit = doc.get("unit1").and_then(|v| v.as_map()).unwrap();
    assert_eq!(unit.len(), 12);
    assert_eq!(unit.get_str("Name").and_then(|v| v.as_str()), Some("testUnit 1"));
    assert_eq!(unit.get_str("Map").map(Dynamic::is_nil), Some(false));
    let position = unit.get_str("Position").and_then(|v| v.as_map()).unwrap();
    assert_eq!(position.get_str("Filename").and_then(|v| v.as_str()), Some("Word"));
    let seq = unit.get_str("Seq").and_then(|v| v.as_seq()).unwrap();
    assert_eq!(seq.len(), 4);
    assert!(seq[1].is_map());
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Server {
    host: String,
    port: i64,
    ratio: f32,
    tags: Vec<String>,
}

record! {
    Server as "Server" in "cfg" {
        "Host" => host,
        "Port" => port,
        "Ratio" => ratio,
        "Tags" => tags,
    }
}

#[test]
fn test_soft_failure_isolation() {
    let text = "package cfg

var s = &Server{
	Host: \"db\",
	Port: \"5432\",
	Ratio: 10,
	Tags: []string{\"a\", 2, \"c\"},
}
";
    let registry = goon::Registry::new().with::<Server>();
    let (doc, diagnostics) = decode_typed("cfg.goon", text, &registry).unwrap();

    assert_eq!(
        diagnostics.messages(),
        vec![
            "unable to assign string value to int64 (cfg.goon:5:8)",
            "unable to assign int value to string (cfg.goon:7:22)",
        ]
    );
    let server = doc.get("s").and_then(|v| v.as_record::<Server>()).unwrap();
    assert_eq!(
        server,
        &Server {
            host: "db".into(),
            port: 0,
            ratio: 10.0,
            tags: vec!["a".into(), "c".into()],
        }
    );
}

#[test]
fn test_unknown_factory_type() {
    let text = "package cfg
var a = &Missing{X: 1}
var b = 2
var c = []interface{}{&Missing{}, 3}
";
    let registry = goon::Registry::new().with::<Server>();
    let (doc, diagnostics) = decode_typed("cfg.goon", text, &registry).unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(doc.get("a"), Some(&Dynamic::Nil));
    assert_eq!(doc.get("b"), Some(&Dynamic::from(2)));
    assert_eq!(doc.get("c"), Some(&Dynamic::from(vec![Dynamic::from(3)])));

    // a required record slot does report the miss
    let (server, diagnostics) = Decoder::new("cfg.goon")
        .with_factory(&registry)
        .bind_var::<Server>("package cfg\nvar s = Other{}", "s")
        .unwrap();
    assert_eq!(server, None);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.iter().next().unwrap().position.line, 2);
}

#[test]
fn test_numeric_widening() {
    let text = "package goon\nvar i = testInner{TestInnerValue: 10}";
    let registry = registry();
    let (inner, diagnostics) = Decoder::new("w.goon")
        .with_factory(&registry)
        .bind_var::<TestInner>(text, "i")
        .unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(inner, Some(TestInner { value: 10.0 }));
}

#[test]
fn test_untyped_mode_keeps_field_order() {
    let text = "package cfg\nvar s = Server{Port: 1, Host: \"h\", Port: 2}";
    let (doc, _) = decode("cfg.goon", text).unwrap();
    let fields = doc.get("s").and_then(|v| v.as_map()).unwrap();
    let keys: Vec<_> = fields.keys().filter_map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["Port", "Host"]);
    assert_eq!(fields.get_str("Port"), Some(&Dynamic::from(2)));
}

#[test]
fn test_typed_variable_without_value() {
    let text = "package cfg\nvar (\n\tnothing []int\n\tsomething = 1 // trailing comment\n)\n";
    let (doc, diagnostics) = decode("cfg.goon", text).unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(doc.get("nothing"), Some(&Dynamic::Nil));
    assert_eq!(doc.get("something"), Some(&Dynamic::from(1)));
    assert_eq!(goon::to_string(&doc).unwrap(), "package cfg\n\nvar nothing interface{}\n\nvar something = 1\n\n");
}

#[test]
fn test_fatal_errors() {
    let err = decode("bad.goon", "package cfg\nvar x = []int{1, 2").unwrap_err();
    assert!(err.position().is_some());

    let err = decode_slice("bad.goon", &[0x70, 0xff, 0xfe], None).unwrap_err();
    assert!(matches!(err, Error::InvalidUtf8(_)));

    let (doc, _) = decode_reader("r.goon", "package r\nvar x = 1".as_bytes(), None).unwrap();
    assert_eq!(doc.get("x"), Some(&Dynamic::from(1)));
}

#[test]
fn test_identifier_map_keys_are_strings() {
    let text = "package p\nvar m = map[string]int{T: 1, x: 2, f: 3, nil: 4}";
    let (map, diagnostics) = Decoder::new("p.goon")
        .bind_var::<HashMap<String, i64>>(text, "m")
        .unwrap();
    assert!(diagnostics.is_empty(), "{}", diagnostics);
    let map = map.unwrap();
    assert_eq!(map.len(), 4);
    assert_eq!(map["T"], 1);
    assert_eq!(map["f"], 3);
    assert_eq!(map["nil"], 4);

    let (doc, _) = decode("p.goon", text).unwrap();
    let keys: Vec<_> = doc
        .get("m")
        .and_then(|v| v.as_map())
        .unwrap()
        .keys()
        .filter_map(|k| k.as_str())
        .collect();
    assert_eq!(keys, vec!["T", "x", "f", "nil"]);
}

#[test]
fn test_unsupported_expressions_are_absent() {
    let text = "package p
var a = 1
var b = 1 + 2
var c = 3
var d = []int{1, 'x', 0x10, 2i, len(xs), 4}
var e = map[string]int{\"k\": f(2), \"j\": 5}
";
    let (doc, diagnostics) = decode("p.goon", text).unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(doc.len(), 5);
    assert_eq!(doc.get("a"), Some(&Dynamic::from(1)));
    assert_eq!(doc.get("b"), Some(&Dynamic::Nil));
    assert_eq!(doc.get("c"), Some(&Dynamic::from(3)));
    assert_eq!(
        doc.get("d"),
        Some(&Dynamic::from(vec![Dynamic::from(1), Dynamic::from(4)]))
    );
    let e = doc.get("e").and_then(|v| v.as_map()).unwrap();
    assert_eq!(e.len(), 1);
    assert_eq!(e.get_str("j"), Some(&Dynamic::from(5)));

    // an operator with nothing after it is still malformed
    assert!(decode("p.goon", "package p\nvar x = 1 +").is_err());
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Known {
    n: i64,
}

record! {
    Known as "Known" in "p" {
        "N" => n,
    }
}

#[test]
fn test_factory_miss_drops_optional_elements() {
    let text = "package p
var ks = []*Known{&Known{N: 1}, &Unknown{N: 2}, &Known{N: 3}}
var km = map[string]*Known{\"a\": &Unknown{}, \"b\": &Known{N: 2}}
";
    let registry = goon::Registry::new().with::<Known>();
    let decoder = Decoder::new("p.goon").with_factory(&registry);

    let (ks, diagnostics) = decoder.bind_var::<Vec<Option<Known>>>(text, "ks").unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(ks, Some(vec![Some(Known { n: 1 }), Some(Known { n: 3 })]));

    let (km, diagnostics) = decoder
        .bind_var::<HashMap<String, Option<Known>>>(text, "km")
        .unwrap();
    assert!(diagnostics.is_empty());
    let km = km.unwrap();
    assert_eq!(km.len(), 1);
    assert_eq!(km["b"], Some(Known { n: 2 }));
}

#[test]
fn test_nesting_limit_is_fatal() {
    let deep = format!("package p\nvar x = {}1", "&".repeat(20_000));
    let err = decode("deep.goon", &deep).unwrap_err();
    assert!(matches!(err, Error::Syntax { .. }));
    assert!(err.to_string().contains("nested too deeply"));

    let nested = format!(
        "package p\nvar x = {}1{}",
        "[]interface{}{".repeat(100),
        "}".repeat(100)
    );
    let (doc, _) = decode("nested.goon", &nested).unwrap();
    let mut value = doc.get("x").unwrap();
    let mut levels = 0;
    while let Some(items) = value.as_seq() {
        value = &items[0];
        levels += 1;
    }
    assert_eq!(levels, 100);
    assert_eq!(value, &Dynamic::from(1));
}
