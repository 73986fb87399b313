//! Tests for ExifMetadata with an in-memory codec

use exifkit::{
    BinaryFormat, ExifCodec, ExifError, ExifMetadata, ExifResult, IfdName, RawIfdMap, RawValue,
    TagFilter, TagRegistry, TagValue, ValueFormatter,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Stores directories as a JSON document
struct JsonCodec;

fn raw_to_json(value: &RawValue) -> Value {
    match value {
        RawValue::Text(s) => json!(s),
        RawValue::Bytes(b) => json!({ "bytes": b }),
        RawValue::Int(i) => json!(i),
        RawValue::Float(f) => json!(f),
        RawValue::Rational(n, d) => json!({ "rational": [n, d] }),
        RawValue::Seq(items) => Value::Array(items.iter().map(raw_to_json).collect()),
    }
}

fn json_to_raw(value: &Value) -> ExifResult<RawValue> {
    let malformed = || ExifError::codec(format!("malformed value {}", value));
    match value {
        Value::String(s) => Ok(RawValue::Text(s.clone())),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(RawValue::Int(i)),
            None => n.as_f64().map(RawValue::Float).ok_or_else(malformed),
        },
        Value::Array(items) => Ok(RawValue::Seq(
            items.iter().map(json_to_raw).collect::<ExifResult<_>>()?,
        )),
        Value::Object(obj) => {
            if let Some(Value::Array(bytes)) = obj.get("bytes") {
                let bytes = bytes
                    .iter()
                    .map(|b| b.as_u64().map(|b| b as u8))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(malformed)?;
                return Ok(RawValue::Bytes(bytes));
            }
            match obj.get("rational").and_then(|r| r.as_array()).map(|r| r.as_slice()) {
                Some([n, d]) => match (n.as_i64(), d.as_i64()) {
                    (Some(n), Some(d)) => Ok(RawValue::Rational(n, d)),
                    _ => Err(malformed()),
                },
                _ => Err(malformed()),
            }
        }
        _ => Err(malformed()),
    }
}

impl ExifCodec for JsonCodec {
    fn decode(&self, bytes: &[u8]) -> ExifResult<RawIfdMap> {
        let doc: BTreeMap<String, BTreeMap<u16, Value>> =
            serde_json::from_slice(bytes).map_err(ExifError::codec)?;
        let mut raw = RawIfdMap::new();
        for (ifd, tags) in doc {
            let ifd: IfdName = ifd.parse()?;
            for (tag_id, value) in tags {
                raw.entry(ifd).or_default().insert(tag_id, json_to_raw(&value)?);
            }
        }
        Ok(raw)
    }

    fn encode(&self, ifds: &RawIfdMap) -> ExifResult<Vec<u8>> {
        let mut doc = Map::new();
        for (ifd, tags) in ifds {
            let tags: Map<String, Value> = tags
                .iter()
                .map(|(id, value)| (id.to_string(), raw_to_json(value)))
                .collect();
            doc.insert(ifd.to_string(), Value::Object(tags));
        }
        serde_json::to_vec(&Value::Object(doc)).map_err(ExifError::codec)
    }
}

fn shared() -> (Arc<TagRegistry>, Arc<ValueFormatter>) {
    (
        Arc::new(TagRegistry::builtin().unwrap()),
        Arc::new(ValueFormatter::builtin().unwrap()),
    )
}

fn load(doc: Value) -> ExifMetadata {
    let (registry, formatter) = shared();
    let bytes = serde_json::to_vec(&doc).unwrap();
    ExifMetadata::load(registry, formatter, &JsonCodec, &bytes).unwrap()
}

#[test]
fn load_read_and_format() {
    let meta = load(json!({
        "IFD0": {"271": "Canon", "274": 6},
        "Exif": {"33434": {"rational": [1, 100]}, "33437": {"rational": [28, 10]}}
    }));

    assert_eq!(meta.len(), 4);
    assert_eq!(meta.read_tag("Make", None).unwrap().as_str(), Some("Canon"));
    assert_eq!(meta.read_tag(271u16, None).unwrap(), &TagValue::Ascii("Canon".into()));
    assert_eq!(
        meta.read_tag_formatted("ExposureTime", None, None).unwrap(),
        "1/100s"
    );
    assert_eq!(meta.read_tag_formatted("FNumber", None, None).unwrap(), "2.8");
    assert_eq!(
        meta.read_tag_formatted("Orientation", None, None).unwrap(),
        "Right-top"
    );
}

#[test]
fn save_round_trip() {
    let mut meta = load(json!({"IFD0": {"271": "Canon"}}));
    meta.write_tag("Artist", "Jane Doe", None).unwrap();
    meta.write_tag("GPSVersionID", vec![2_i64, 2, 0, 0], None).unwrap();
    meta.write_tag("MakerNote", vec![0xff_u8, 0xfe], None).unwrap();

    let bytes = meta.save(&JsonCodec).unwrap();
    let (registry, formatter) = shared();
    let reloaded = ExifMetadata::load(registry, formatter, &JsonCodec, &bytes).unwrap();

    assert_eq!(reloaded.to_raw(), meta.to_raw());
    assert_eq!(
        reloaded.read_tag("GPSVersionID", None).unwrap(),
        &TagValue::Byte(vec![2, 2, 0, 0])
    );
    assert!(reloaded.store().contains(315, IfdName::Ifd0));
}

#[test]
fn invalid_value_fails_whole_load() {
    let (registry, formatter) = shared();
    let bytes = serde_json::to_vec(&json!({
        "IFD0": {"271": "Canon"},
        "Exif": {"33434": {"rational": [1, 0]}}
    }))
    .unwrap();
    let err = ExifMetadata::load(registry, formatter, &JsonCodec, &bytes).unwrap_err();
    match err {
        ExifError::TagType {
            tag_id,
            name,
            detail,
            ..
        } => {
            assert_eq!(tag_id, 33434);
            assert_eq!(name, "ExposureTime");
            assert_eq!(detail, "denominator cannot be zero");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn codec_errors_propagate() {
    let (registry, formatter) = shared();
    let err = ExifMetadata::load(registry, formatter, &JsonCodec, b"\x00\x01").unwrap_err();
    assert!(matches!(err, ExifError::Codec(_)));
}

#[test]
fn binary_rendering() {
    let mut meta = load(json!({}));
    meta.write_tag("MakerNote", vec![0xff_u8, 0xfe, 0xfd, 0xfc], None)
        .unwrap();

    let render = |format| meta.read_tag_formatted("MakerNote", None, format).unwrap();
    assert_eq!(render(None), "<bytes: 4>");
    assert_eq!(render(Some(BinaryFormat::Hex)), "hex:fffefdfc");
    assert_eq!(render(Some(BinaryFormat::Base64)), "base64://79/A==");
    assert_eq!(
        "base32".parse::<BinaryFormat>().unwrap_err().to_string(),
        "Unsupported binary format 'base32', expected one of 'bytes', 'hex', 'base64'"
    );
}

#[test]
fn gps_and_interop_share_ids() {
    let mut meta = load(json!({}));
    meta.write_tag("GPSLatitude", vec![(35_i64, 1_i64), (41, 1), (35, 100)], None)
        .unwrap();
    meta.write_tag(2u16, b"0100".to_vec(), Some(IfdName::Interop))
        .unwrap();

    assert_eq!(
        meta.read_tag_formatted("GPSLatitude", None, None).unwrap(),
        "35°41.35'"
    );
    assert_eq!(
        meta.read_tag(2u16, Some(IfdName::Interop)).unwrap(),
        &TagValue::Undefined(b"0100".to_vec())
    );
    assert!(matches!(
        meta.store().get_by_id(2),
        Err(ExifError::AmbiguousTag { .. })
    ));
}

#[test]
fn read_tags_formatted_by_name() {
    let meta = load(json!({
        "IFD0": {"271": "Canon", "272": "EOS R5"},
        "Exif": {"37380": {"rational": [-2, 3]}}
    }));

    let values = meta
        .read_tags_formatted(["Make", "Model", "Artist"], None, None, true)
        .unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values["Model"], "EOS R5");

    let bias = meta
        .read_tag_formatted("ExposureBiasValue", None, None)
        .unwrap();
    assert_eq!(bias, "-0.6666666666666666 EV");
}

#[test]
fn summaries_serialize() {
    let meta = load(json!({
        "IFD0": {"271": "Canon"},
        "IFD1": {"271": "Canon"},
        "Exif": {"33434": {"rational": [1, 250]}}
    }));

    let filter = TagFilter::new().with_tags(["ExposureTime"]);
    let summaries = meta.summaries(&filter, None).unwrap();
    assert_eq!(
        serde_json::to_value(&summaries).unwrap(),
        json!([{"id": 33434, "name": "ExposureTime", "value": "1/250s", "ifd": "Exif"}])
    );

    let thumbnail = meta
        .summaries(&TagFilter::new().with_ifd(IfdName::Ifd1), None)
        .unwrap();
    assert_eq!(thumbnail.len(), 1);
    assert_eq!(thumbnail[0].ifd, IfdName::Ifd1);
}

#[test]
fn tag_names_come_from_registry() {
    let meta = load(json!({}));
    let names = meta.tag_names();
    assert_eq!(names.len(), meta.registry().len());
    assert!(names.contains(&"DateTimeOriginal"));
}
