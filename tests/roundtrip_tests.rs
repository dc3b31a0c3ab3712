mod common;

use common::{compare_unit, registry, TestInner, TestUnit};
use goon::{decode_typed, encode, record, Decoder, Dynamic, DynamicMap, Encode};

#[test]
fn test_unit_round_trip() {
    let mut unit = compare_unit();
    unit.ignored = "IGNORE_ME!".into();
    let unit = Some(unit);

    let text = encode([("unit1", &unit as &dyn Encode)], "goon").unwrap();
    assert!(!text.contains("Ignored"));
    assert!(!text.contains("IGNORE_ME!"));

    let registry = registry();
    let (doc, diagnostics) = decode_typed("data.goon", &text, &registry).unwrap();
    assert!(diagnostics.is_empty(), "{}", diagnostics);
    assert_eq!(doc.namespace(), "goon");
    assert_eq!(doc.len(), 1);
    assert_eq!(
        doc.get("unit1").and_then(|v| v.as_record::<TestUnit>()),
        Some(&compare_unit())
    );
}

#[test]
fn test_unit_text_shape() {
    let unit = Some(compare_unit());
    let text = encode([("unit1", &unit as &dyn Encode)], "goon").unwrap();

    assert!(text.starts_with("package goon\n\nvar unit1 = &testUnit{\n\tName: \"testUnit 1\",\n\tType: 10,\n"));
    assert!(text.contains("\tMap: map[string]int64{\n\t\t\"Key1\": 10,\n\t},\n"));
    assert!(text.contains(
        "\tInterfaceMap: map[int64]interface{}{\n\t\t1: \"Test1\",\n\t\t2: 2,\n\t\t3: \"Test3\",\n\t\t4: &testUnit{\n\t\t\tName: \"Test\",\n"
    ));
    assert!(text.contains("\tTestInner: testInner{\n\t\tTestInnerValue: 20.0,\n\t},\n"));
    assert!(text.contains("\tArray: []int64{\n\t\t1,\n\t\t2,\n\t\t3,\n\t\t4,\n\t},\n"));
    assert!(text.contains("\tInterfaceStruct: &testInner{\n"));
    assert!(text.contains("\tPosition: token.Position{\n\t\tFilename: \"Word\",\n"));
    // empty collections and nil pointers inside the nested units
    assert!(text.contains("\t\t\tType: 10,\n\t\t\tMap: map[string]int64{},\n"));
    assert!(text.contains("\t\t\tInterfaceStruct: nil,\n"));
    assert!(text.ends_with("}\n\n"));
}

#[test]
fn test_scenario() {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Record {
        name: String,
        count: i64,
    }

    record! {
        Record as "Record" in "demo" {
            "Name" => name,
            "Count" => count,
        }
    }

    let x = Some(Record {
        name: "a".into(),
        count: 3,
    });
    let text = encode([("x", &x as &dyn Encode)], "demo").unwrap();
    assert!(text.starts_with("package demo"));
    assert!(text.contains("var x = &Record{\n\tName: \"a\",\n\tCount: 3,\n}"));

    let factory = |name: &str, _namespace: &str| -> Option<Box<dyn goon::Record>> {
        (name == "Record").then(|| Box::new(Record::default()) as Box<dyn goon::Record>)
    };
    let (doc, diagnostics) = decode_typed("demo.goon", &text, &factory).unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(doc.get("x"), Some(&Dynamic::record(x.unwrap())));
}

#[test]
fn test_pointer_fidelity() {
    let some = Some(Box::new(TestInner { value: 1.5 }));
    let none: Option<Box<TestInner>> = None;
    let text = encode(
        [("some", &some as &dyn Encode), ("none", &none as &dyn Encode)],
        "goon",
    )
    .unwrap();
    assert_eq!(
        text,
        "package goon\n\nvar some = &testInner{\n\tTestInnerValue: 1.5,\n}\n\nvar none = nil\n\n"
    );

    let registry = registry();
    let decoder = Decoder::new("p.goon").with_factory(&registry);
    let (decoded, diagnostics) = decoder
        .bind_var::<Option<Box<TestInner>>>(&text, "some")
        .unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(decoded, Some(some));

    let (decoded, diagnostics) = decoder
        .bind_var::<Option<Box<TestInner>>>(&text, "none")
        .unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(decoded, Some(None));
}

#[test]
fn test_ignored_field_is_zeroed() {
    let unit = TestUnit {
        name: "n".into(),
        ignored: "secret".into(),
        ..TestUnit::default()
    };
    let text = encode([("u", &unit as &dyn Encode)], "goon").unwrap();
    assert!(!text.contains("secret"));
    assert!(text.starts_with("package goon\n\nvar u = testUnit{\n"));

    let registry = registry();
    let (decoded, _) = Decoder::new("u.goon")
        .with_factory(&registry)
        .bind_var::<TestUnit>(&text, "u")
        .unwrap();
    let decoded = decoded.unwrap();
    assert_eq!(decoded.name, "n");
    assert_eq!(decoded.ignored, "");
}

#[test]
fn test_untyped_document_round_trip() {
    let mut cfg = DynamicMap::new();
    cfg.insert(Dynamic::from("Port"), Dynamic::from(8080));
    cfg.insert(Dynamic::from(7), Dynamic::from(vec![Dynamic::from(0.25), Dynamic::Nil]));
    cfg.insert(Dynamic::from(true), Dynamic::from("tab\there"));

    let mut doc = goon::Document::new("demo");
    doc.insert("cfg", Dynamic::from(cfg));
    doc.insert("min", Dynamic::from(i64::MIN));
    doc.insert("quote", Dynamic::from("\"q\"\n\\"));

    let text = goon::to_string(&doc).unwrap();
    let (decoded, diagnostics) = goon::decode("demo.goon", &text).unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(decoded, doc);
}

#[test]
fn test_unsigned_extremes_round_trip() {
    let max = u64::MAX;
    let text = encode([("max", &max as &dyn Encode)], "goon").unwrap();
    assert_eq!(text, "package goon\n\nvar max = 18446744073709551615\n\n");
    let (value, diagnostics) = Decoder::new("m.goon").bind_var::<u64>(&text, "max").unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(value, Some(u64::MAX));
}
