//! Dot/bracket path evaluation over fetched JSON documents.
//!
//! Supports the subset the sensor configuration UI produces: `a.b.c`,
//! `a.values[0]`, `a[0][1].b`.

use serde_json::Value;

/// Walk `path` through `doc`; `None` when any step misses
pub fn lookup<'v>(doc: &'v Value, path: &str) -> Option<&'v Value> {
    if path.is_empty() {
        return Some(doc);
    }

    let mut current = doc;
    for segment in path.split('.') {
        let name_end = segment.find('[').unwrap_or(segment.len());
        let name = &segment[..name_end];
        if !name.is_empty() {
            current = current.get(name)?;
        }

        let mut rest = &segment[name_end..];
        while let Some(after) = rest.strip_prefix('[') {
            let close = after.find(']')?;
            let index: usize = after[..close].parse().ok()?;
            current = current.get(index)?;
            rest = &after[close + 1..];
        }
        if !rest.is_empty() {
            return None;
        }
    }
    Some(current)
}

/// Coerce a JSON leaf into a number (accepts numbers and numeric strings,
/// the two shapes metric APIs actually return)
pub fn as_number(value: &Value) -> Option<f32> {
    match value {
        Value::Number(n) => n.as_f64().map(|v| v as f32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
