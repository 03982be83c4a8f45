use crate::error::ValidationError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// One video as listed by the backend, with its path already normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
    pub path: String,
    pub name: String,
    pub size: u64,
    pub modified_at: DateTime<Utc>,
    pub hash: String,
}

impl VideoRecord {
    /// Path without its last segment.
    pub fn folder(&self) -> &str {
        folder_key(&self.path)
    }
}

/// Rewrites `\` separators to `/`.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Folder part of an already normalized path.
pub fn folder_key(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Label shown for a folder: its last segment, empty when the folder ends
/// in a separator.
pub fn folder_name(folder: &str) -> &str {
    match folder.rfind(|c: char| c == '/' || c == '\\') {
        Some(idx) => &folder[idx + 1..],
        None => folder,
    }
}

/// Accepts RFC 3339 (what the backend sends), a naive datetime, or a bare date.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// A present, non-null field of one wire record.
fn field<'a>(
    record: &'a Map<String, Value>,
    index: usize,
    name: &str,
) -> Result<&'a Value, ValidationError> {
    match record.get(name) {
        Some(Value::Null) | None => Err(ValidationError::new(
            index,
            format!("missing field `{}`", name),
        )),
        Some(value) => Ok(value),
    }
}

fn string_field(
    record: &Map<String, Value>,
    index: usize,
    name: &str,
) -> Result<String, ValidationError> {
    let value = field(record, index, name)?;
    value.as_str().map(str::to_string).ok_or_else(|| {
        ValidationError::new(index, format!("field `{}` is not a string: {}", name, value))
    })
}

/// Converts one element of the `/video` array.
pub fn record_from_value(value: &Value, index: usize) -> Result<VideoRecord, ValidationError> {
    let record = value
        .as_object()
        .ok_or_else(|| ValidationError::new(index, format!("not an object: {}", value)))?;

    let path = string_field(record, index, "path")?;
    let name = string_field(record, index, "name")?;
    let size_raw = field(record, index, "size")?;
    let size = size_raw.as_u64().ok_or_else(|| {
        ValidationError::new(
            index,
            format!("field `size` is not a byte count: {}", size_raw),
        )
    })?;
    let modified_raw = string_field(record, index, "modified_at")?;
    let hash = string_field(record, index, "hash")?;

    let modified_at = parse_timestamp(&modified_raw).ok_or_else(|| {
        ValidationError::new(index, format!("unparseable modified_at {:?}", modified_raw))
    })?;

    Ok(VideoRecord {
        path: normalize_path(&path),
        name,
        size,
        modified_at,
        hash,
    })
}

/// Turns a whole wire batch into records, rejecting the batch on the first
/// bad record or repeated hash.
pub fn validate_batch(batch: &[Value]) -> Result<Vec<VideoRecord>, ValidationError> {
    let mut seen = HashSet::with_capacity(batch.len());
    let mut records = Vec::with_capacity(batch.len());

    for (index, value) in batch.iter().enumerate() {
        let record = record_from_value(value, index)?;
        if !seen.insert(record.hash.clone()) {
            return Err(ValidationError::new(
                index,
                format!("duplicate hash {}", record.hash),
            ));
        }
        records.push(record);
    }

    Ok(records)
}
