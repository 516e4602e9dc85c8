//! Field additions, removals and nested changes across releases

use crate::common::*;
use std::sync::Arc;

fn profile_v1() -> SchemaRegistry {
    registry_of(
        ClassDescriptor::new("app::Profile")
            .with_field(scalar("name", WireTag::String))
            .with_field(scalar("legacy_score", WireTag::Int32))
            .with_field(FieldDescriptor::object("address", "app::Address"))
            .with_field(scalar("age", WireTag::Byte)),
        vec![ClassDescriptor::new("app::Address")
            .with_field(scalar("street", WireTag::String))
            .with_field(FieldDescriptor::sequence(
                "lines",
                "Vec<String>",
                Shape::List,
                WireTag::String,
            ))],
    )
}

/// `legacy_score` and `address` removed, `email` added
fn profile_v2() -> SchemaRegistry {
    registry_of(
        ClassDescriptor::new("app::Profile")
            .with_field(scalar("name", WireTag::String))
            .with_field(scalar("email", WireTag::String))
            .with_field(scalar("age", WireTag::Byte)),
        vec![],
    )
}

fn sample_v1() -> Record {
    Record::new("app::Profile")
        .with("name", "grace")
        .with("legacy_score", 99i32)
        .with(
            "address",
            Record::new("app::Address")
                .with("street", "1 Main St")
                .with("lines", vec!["Apt 4", "Floor 2", "Rear"]),
        )
        .with("age", 37u8)
}

#[test]
fn removed_nested_object_with_list_is_skipped_whole() {
    let store = Arc::new(MemorySnapshotStore::new());
    let v1 = memory_codec(&store, 1, profile_v1());
    let v2 = memory_codec(&store, 2, profile_v2());

    let (record, report) = write_then_read(&v1, &v2, &sample_v1());

    assert_eq!(record.get("name"), Some(&Value::String("grace".into())));
    assert_eq!(record.get("age"), Some(&Value::Byte(37)));
    assert_eq!(record.get("email"), Some(&Value::String(String::new())));
    assert!(record.get("address").is_none());

    let skipped: Vec<_> = report.skipped.iter().map(|s| s.field.as_str()).collect();
    assert_eq!(skipped, ["legacy_score", "address"]);
    assert!(report
        .skipped
        .iter()
        .all(|s| s.reason == SkipReason::Removed));
}

#[test]
fn absent_nested_object_is_skipped_by_presence_byte() {
    let store = Arc::new(MemorySnapshotStore::new());
    let v1 = memory_codec(&store, 1, profile_v1());
    let v2 = memory_codec(&store, 2, profile_v2());

    let record = sample_v1().with("address", Value::Object(None));
    let (decoded, _) = write_then_read(&v1, &v2, &record);
    assert_eq!(decoded.get("age"), Some(&Value::Byte(37)));
}

#[test]
fn added_field_in_new_release_reads_old_payload() {
    let store = Arc::new(MemorySnapshotStore::new());
    let v2 = memory_codec(&store, 2, profile_v2());
    let v3 = memory_codec(
        &store,
        3,
        registry_of(
            ClassDescriptor::new("app::Profile")
                .with_field(scalar("name", WireTag::String))
                .with_field(scalar("email", WireTag::String))
                .with_field(scalar("age", WireTag::Byte))
                .with_field(FieldDescriptor::sequence(
                    "tags",
                    "Vec<String>",
                    Shape::List,
                    WireTag::String,
                )),
            vec![],
        ),
    );

    let record = Record::new("app::Profile")
        .with("name", "ada")
        .with("email", "ada@example.com")
        .with("age", 36u8);
    let (decoded, report) = write_then_read(&v2, &v3, &record);

    assert_eq!(decoded.get("email"), Some(&Value::String("ada@example.com".into())));
    assert_eq!(decoded.get("tags"), Some(&Value::Sequence(vec![])));
    assert!(report.is_lossless());
}

#[test]
fn each_payload_migrates_from_its_own_version() {
    let store = Arc::new(MemorySnapshotStore::new());
    let v1 = memory_codec(&store, 1, profile_v1());
    let v2 = memory_codec(&store, 2, profile_v2());
    v1.record_current_schema().unwrap();
    v2.record_current_schema().unwrap();

    let old_bytes = v1.encode(&sample_v1()).unwrap();
    let new_bytes = v2
        .encode(
            &Record::new("app::Profile")
                .with("name", "linus")
                .with("email", "l@example.com")
                .with("age", 28u8),
        )
        .unwrap();

    let class = v2.registry().get("app::Profile").unwrap();
    let (from_old, old_report) = v2
        .decode_with_report(&old_bytes, "app::Profile", Record::fresh(class))
        .unwrap();
    let (from_new, new_report) = v2
        .decode_with_report(&new_bytes, "app::Profile", Record::fresh(class))
        .unwrap();

    assert_eq!(old_report.source_version, 1);
    assert_eq!(new_report.source_version, 2);
    assert!(!new_report.is_migration());
    assert_eq!(from_old.get("age"), Some(&Value::Byte(37)));
    assert_eq!(from_new.get("email"), Some(&Value::String("l@example.com".into())));
}

#[test]
fn sequence_of_nested_objects_migrates_each_element() {
    let item_v1 = ClassDescriptor::new("app::Item")
        .with_field(scalar("sku", WireTag::String))
        .with_field(scalar("qty", WireTag::Int16));
    let item_v2 = ClassDescriptor::new("app::Item")
        .with_field(scalar("qty", WireTag::Int16))
        .with_field(scalar("price", WireTag::Decimal128));
    let cart = |item: ClassDescriptor| {
        registry_of(
            ClassDescriptor::new("app::Cart").with_field(FieldDescriptor::object_sequence(
                "items",
                "Vec<app::Item>",
                Shape::List,
                "app::Item",
            )),
            vec![item],
        )
    };

    let store = Arc::new(MemorySnapshotStore::new());
    let v1 = memory_codec(&store, 1, cart(item_v1));
    let v2 = memory_codec(&store, 2, cart(item_v2));

    let record = Record::new("app::Cart").with(
        "items",
        vec![
            Record::new("app::Item").with("sku", "A-1").with("qty", 2i16),
            Record::new("app::Item").with("sku", "B-2").with("qty", 5i16),
        ],
    );
    let (decoded, report) = write_then_read(&v1, &v2, &record);

    let items = decoded.get("items").unwrap().as_sequence().unwrap();
    let quantities: Vec<_> = items
        .iter()
        .map(|i| i.as_record().unwrap().get("qty").cloned())
        .collect();
    assert_eq!(
        quantities,
        vec![Some(Value::Int16(2)), Some(Value::Int16(5))]
    );
    assert_eq!(report.skipped.len(), 2);
}
