//! Forgiving field decoders for stored records.
//!
//! Documents written by older front ends carry `null` for omitted form
//! fields, negative streaks, or numbers where text is expected. None of
//! these may turn a readable document into a corrupt one, so every record
//! field decodes through one of these helpers and falls back to a default.
//!
//! # Invariants
//! - Decoders here never fail on well-formed JSON.
//! - Only a document that is not a JSON object is treated as corrupt.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Text field: `null` reads as empty, other scalars keep their JSON text.
pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Flag field using truthiness: `null`, `0`, `""`, `[]` and `{}` are false.
pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(truthy(&Value::deserialize(deserializer)?))
}

/// Counter field: negatives clamp to zero, non-numbers read as zero.
pub fn counter<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let count = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64))
            .unwrap_or(i64::MAX),
        _ => 0,
    };
    Ok(u32::try_from(count.max(0)).unwrap_or(u32::MAX))
}

/// Collection field: non-arrays read as empty, non-object elements are skipped.
pub fn records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(values) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(values.into_iter().filter_map(object_record).collect())
}

/// Singleton record field: anything but an object reads as absent.
pub fn record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(object_record(Value::deserialize(deserializer)?))
}

fn object_record<T: DeserializeOwned>(value: Value) -> Option<T> {
    if value.is_object() {
        serde_json::from_value(value).ok()
    } else {
        None
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|float| float != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(values) => !values.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::truthy;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "super::text")]
        text: String,
        #[serde(default, deserialize_with = "super::flag")]
        flag: bool,
        #[serde(default, deserialize_with = "super::counter")]
        count: u32,
    }

    fn decode(value: serde_json::Value) -> Sample {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn nulls_read_as_defaults() {
        let decoded = decode(json!({"text": null, "flag": null, "count": null}));
        assert_eq!(decoded.text, "");
        assert!(!decoded.flag);
        assert_eq!(decoded.count, 0);
    }

    #[test]
    fn out_of_range_and_mistyped_values_are_coerced() {
        let decoded = decode(json!({"text": 42, "flag": 1, "count": -3}));
        assert_eq!(decoded.text, "42");
        assert!(decoded.flag);
        assert_eq!(decoded.count, 0);

        let decoded = decode(json!({"count": 7.9}));
        assert_eq!(decoded.count, 7);
        assert_eq!(decode(json!({"count": 1e12})).count, u32::MAX);
    }

    #[test]
    fn truthiness_follows_empty_means_false() {
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!([])));
        assert!(truthy(&json!("yes")));
        assert!(truthy(&json!({"a": 1})));
    }
}
