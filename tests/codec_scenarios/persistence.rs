//! Objects and snapshots that outlive the process that wrote them

use crate::common::*;
use chrono::NaiveDate;
use std::fs;
use verscodec::{Decimal128, FromValue, Result, SnapshotStore, Ticks, Versioned};

#[derive(Debug, Clone, PartialEq)]
struct Invoice {
    number: u32,
    issued: Ticks,
    total: Decimal128,
    lines: Vec<String>,
}

impl Versioned for Invoice {
    fn class_descriptor() -> ClassDescriptor {
        ClassDescriptor::new("billing::Invoice")
            .with_field(FieldDescriptor::scalar("number", "u32", WireTag::UInt32))
            .with_field(FieldDescriptor::scalar("issued", "Ticks", WireTag::DateTime))
            .with_field(FieldDescriptor::scalar("total", "Decimal128", WireTag::Decimal128))
            .with_field(FieldDescriptor::sequence(
                "lines",
                "Vec<String>",
                Shape::List,
                WireTag::String,
            ))
    }

    fn to_record(&self) -> Record {
        Record::new("billing::Invoice")
            .with("number", self.number)
            .with("issued", self.issued)
            .with("total", self.total)
            .with("lines", self.lines.clone())
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Invoice {
            number: record.require("number")?,
            issued: record.require("issued")?,
            total: record.require("total")?,
            lines: record.require("lines")?,
        })
    }
}

fn invoice() -> Invoice {
    let issued = NaiveDate::from_ymd_opt(2024, 2, 29)
        .and_then(|d| d.and_hms_opt(13, 45, 0))
        .and_then(Ticks::from_naive)
        .unwrap();
    Invoice {
        number: 1001,
        issued,
        total: Decimal128::from_parts(false, 123_456, 2).unwrap(),
        lines: vec!["widget".into(), "gadget".into()],
    }
}

fn invoice_registry() -> SchemaRegistry {
    SchemaRegistry::new().with_type::<Invoice>().unwrap()
}

#[test]
fn typed_object_survives_reopen() {
    let dir = temp_dir();
    let path = dir.path().join("invoices").join("1001.bin");

    {
        let codec = file_codec(dir.path(), 1, invoice_registry());
        codec.record_current_schema().unwrap();
        codec.save_to_file(&path, &invoice().to_record()).unwrap();
    }

    let codec = file_codec(dir.path(), 1, invoice_registry());
    let bytes = fs::read(&path).unwrap();
    let decoded: Invoice = codec.decode_value(&bytes).unwrap();
    assert_eq!(decoded, invoice());
    assert_eq!(decoded.total.to_string(), "1234.56");
    assert_eq!(
        decoded.issued.to_naive().unwrap().to_string(),
        "2024-02-29 13:45:00"
    );
}

#[test]
fn snapshot_document_is_readable_json() {
    let dir = temp_dir();
    let codec = file_codec(dir.path(), 4, invoice_registry());
    codec.record_current_schema().unwrap();

    let text = fs::read_to_string(dir.path().join("Version-4.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["schemaVersion"], 4);
    let class = &json["classes"][0];
    assert_eq!(class["qualifiedName"], "billing::Invoice");
    assert_eq!(class["simpleName"], "Invoice");
    assert_eq!(class["fields"][3]["declaredTypeName"], "Vec<String>");
    assert_eq!(class["fields"][3]["shape"], "List");
    assert_eq!(class["fields"][3]["wireTag"], "String");
    assert!(class["fields"][3].get("elementClassName").is_none());
}

#[test]
fn recording_twice_keeps_first_snapshot() {
    let dir = temp_dir();
    let first = file_codec(dir.path(), 1, invoice_registry());
    assert!(first.record_current_schema().unwrap().is_written());

    // Same version number, different classes: the recorded history wins
    let other = file_codec(
        dir.path(),
        1,
        registry_of(ClassDescriptor::new("billing::Other"), vec![]),
    );
    assert!(!other.record_current_schema().unwrap().is_written());

    let recorded = other.history().store().load(1).unwrap().unwrap();
    assert!(recorded.contains("billing::Invoice"));
    assert!(!recorded.contains("billing::Other"));
}

#[test]
fn upgraded_reader_loads_old_file() {
    let dir = temp_dir();
    let path = dir.path().join("1001.bin");
    {
        let v1 = file_codec(dir.path(), 1, invoice_registry());
        v1.record_current_schema().unwrap();
        v1.save_to_file(&path, &invoice().to_record()).unwrap();
    }

    // v2 widens `number` and drops `lines`
    let v2 = file_codec(
        dir.path(),
        2,
        registry_of(
            ClassDescriptor::new("billing::Invoice")
                .with_field(FieldDescriptor::scalar("number", "u64", WireTag::UInt64))
                .with_field(FieldDescriptor::scalar("issued", "Ticks", WireTag::DateTime))
                .with_field(FieldDescriptor::scalar("total", "Decimal128", WireTag::Decimal128)),
            vec![],
        ),
    );
    let into = Record::new("billing::Invoice");
    let record = v2.load_from_file(&path, "billing::Invoice", into).unwrap();

    assert_eq!(u64::from_value(record.get("number").unwrap()).unwrap(), 1001);
    assert_eq!(record.get("issued"), Some(&Value::DateTime(invoice().issued)));
    assert!(record.get("lines").is_none());
}
