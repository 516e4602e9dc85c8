//! Damaged payloads and snapshot files

use crate::common::*;
use std::fs;
use std::sync::Arc;
use verscodec::{SnapshotStore, PAYLOAD_HEADER_SIZE};

fn note_registry() -> SchemaRegistry {
    registry_of(
        ClassDescriptor::new("app::Note")
            .with_field(scalar("title", WireTag::String))
            .with_field(FieldDescriptor::sequence(
                "scores",
                "Vec<i32>",
                Shape::List,
                WireTag::Int32,
            )),
        vec![],
    )
}

fn note() -> Record {
    Record::new("app::Note")
        .with("title", "hello")
        .with("scores", vec![1i32, 2, 3])
}

#[test]
fn every_truncation_is_reported() {
    let store = Arc::new(MemorySnapshotStore::new());
    let codec = memory_codec(&store, 1, note_registry());
    let bytes = codec.encode(&note()).unwrap();

    for len in 0..bytes.len() {
        let result = codec.decode(&bytes[..len], "app::Note", Record::new("app::Note"));
        assert!(
            matches!(result, Err(Error::Truncated { .. })),
            "prefix of {} bytes should be truncated, got {:?}",
            len,
            result
        );
    }
}

#[test]
fn length_prefix_past_end_is_truncated() {
    let store = Arc::new(MemorySnapshotStore::new());
    let codec = memory_codec(&store, 1, note_registry());
    let mut bytes = codec.encode(&note()).unwrap();
    // Inflate the title's length prefix
    bytes[PAYLOAD_HEADER_SIZE] = 200;

    let result = codec.decode(&bytes, "app::Note", Record::new("app::Note"));
    assert!(matches!(result, Err(Error::Truncated { .. })));
}

#[test]
fn negative_sequence_count_is_corruption() {
    let store = Arc::new(MemorySnapshotStore::new());
    let codec = memory_codec(&store, 1, note_registry());
    let mut bytes = codec.encode(&note()).unwrap();
    let count_at = PAYLOAD_HEADER_SIZE + 4 + "hello".len();
    bytes[count_at..count_at + 4].copy_from_slice(&(-1i32).to_le_bytes());

    let result = codec.decode(&bytes, "app::Note", Record::new("app::Note"));
    assert!(matches!(result, Err(Error::Corruption(_))));
}

#[test]
fn invalid_utf8_is_reported() {
    let store = Arc::new(MemorySnapshotStore::new());
    let codec = memory_codec(&store, 1, note_registry());
    let mut bytes = codec.encode(&note()).unwrap();
    bytes[PAYLOAD_HEADER_SIZE + 4] = 0xFF;

    let result = codec.decode(&bytes, "app::Note", Record::new("app::Note"));
    assert!(matches!(result, Err(Error::InvalidUtf8 { .. })));
}

#[test]
fn tampered_snapshot_file_is_corruption() {
    let dir = temp_dir();
    let v1 = file_codec(dir.path(), 1, note_registry());
    v1.record_current_schema().unwrap();
    let bytes = v1.encode(&note()).unwrap();

    // Rename the v1 document to v5 so its contents disagree with its name
    let store = v1.history().store();
    fs::rename(
        store.config().snapshot_path(1),
        store.config().snapshot_path(5),
    )
    .unwrap();

    let mut payload = bytes.clone();
    payload[0] = 5;
    let v6 = file_codec(dir.path(), 6, note_registry());
    let result = v6.decode(&payload, "app::Note", Record::new("app::Note"));
    assert!(matches!(result, Err(Error::Corruption(_))));
    assert!(v6.history().store().versions().unwrap().contains(&5));
}

#[test]
fn trailing_bytes_inside_payload_rejected() {
    let store = Arc::new(MemorySnapshotStore::new());
    let codec = memory_codec(&store, 1, note_registry());
    let bytes = codec.encode(&note()).unwrap();

    let mut payload = bytes[PAYLOAD_HEADER_SIZE..].to_vec();
    payload.extend_from_slice(&[0, 0]);
    let framed = [&1u16.to_le_bytes()[..], &(payload.len() as i32).to_le_bytes()[..], &payload[..]].concat();

    let result = codec.decode(&framed, "app::Note", Record::new("app::Note"));
    assert!(matches!(result, Err(Error::TrailingBytes { remaining: 2 })));
}

#[test]
fn bytes_after_frame_are_ignored() {
    let store = Arc::new(MemorySnapshotStore::new());
    let codec = memory_codec(&store, 1, note_registry());
    let mut bytes = codec.encode(&note()).unwrap();
    bytes.extend_from_slice(b"garbage");

    let record = codec
        .decode(&bytes, "app::Note", Record::new("app::Note"))
        .unwrap();
    assert_eq!(record.get("title"), Some(&Value::String("hello".into())));
}

fn linked_registry() -> SchemaRegistry {
    registry_of(
        ClassDescriptor::new("app::Link")
            .with_field(scalar("id", WireTag::Int32))
            .with_field(FieldDescriptor::object("next", "app::Link")),
        vec![],
    )
}

/// Frame `payload` under `version` by hand
fn framed(version: u16, payload: &[u8]) -> Vec<u8> {
    let mut bytes = version.to_le_bytes().to_vec();
    bytes.extend_from_slice(&(payload.len() as i32).to_le_bytes());
    bytes.extend_from_slice(payload);
    bytes
}

/// Every link present, each with id 1
fn endless_links() -> Vec<u8> {
    [1u8, 0, 0, 0, 1].repeat(200_000)
}

#[test]
fn deep_nesting_fails_cleanly_same_version() {
    let store = Arc::new(MemorySnapshotStore::new());
    let codec = memory_codec(&store, 1, linked_registry());

    let result = codec.decode(
        &framed(1, &endless_links()),
        "app::Link",
        Record::new("app::Link"),
    );
    assert!(matches!(result, Err(Error::Corruption(_))));
}

#[test]
fn deep_nesting_fails_cleanly_when_migrating() {
    let store = Arc::new(MemorySnapshotStore::new());
    let v1 = memory_codec(&store, 1, linked_registry());
    v1.record_current_schema().unwrap();
    let v2 = memory_codec(&store, 2, linked_registry());

    let result = v2.decode(
        &framed(1, &endless_links()),
        "app::Link",
        Record::new("app::Link"),
    );
    assert!(matches!(result, Err(Error::Corruption(_))));
}

#[test]
fn configured_depth_bounds_both_directions() {
    let store = Arc::new(MemorySnapshotStore::new());
    let codec = Codec::new(
        linked_registry(),
        CodecConfig::new(1).with_max_depth(2),
        Arc::clone(&store),
    )
    .unwrap();

    let two_deep = Record::new("app::Link").with(
        "next",
        Record::new("app::Link").with("next", Record::new("app::Link")),
    );
    let bytes = codec.encode(&two_deep).unwrap();
    let back = codec
        .decode(&bytes, "app::Link", Record::new("app::Link"))
        .unwrap();
    assert!(back.get("next").is_some());

    let three_deep = Record::new("app::Link").with("next", two_deep);
    assert!(matches!(
        codec.encode(&three_deep),
        Err(Error::ValueOutOfRange(_))
    ));
}
