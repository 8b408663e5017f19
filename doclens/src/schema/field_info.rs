use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::common::Value;

/// Structural schema of a collection: qualified field path to [FieldInfo].
///
/// Paths are dot-joined (`address.city`); fields of documents held in arrays
/// are qualified by the array's path (`items.sku`).
pub type SchemaDescriptor = BTreeMap<String, FieldInfo>;

/// What schema inference observed for one field path.
///
/// `type_name` is the tag of the last value seen at the path. `max_length`
/// is the longest string seen, in characters. The boolean flags are set the
/// first time a matching value is seen and never cleared. `array_size` is the
/// length of the last non-empty array seen.
///
/// Serializes with camelCase keys and omits unset flags:
///
/// ```rust
/// use doclens::schema::FieldInfo;
///
/// let info = FieldInfo { type_name: "int32".to_string(), numeric: true, ..Default::default() };
/// assert_eq!(
///     serde_json::to_string(&info).unwrap(),
///     r#"{"type":"int32","numeric":true}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInfo {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub numeric: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub date_field: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub boolean_field: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub nested: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub array: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_size: Option<usize>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub array_of_objects: bool,
}

impl FieldInfo {
    /// Folds one observed value into this entry.
    ///
    /// Only the value itself is recorded; recursion into documents and arrays
    /// is up to the caller.
    pub(crate) fn observe(&mut self, value: &Value) {
        self.type_name = value.type_name().to_string();

        match value {
            Value::I32(_) | Value::I64(_) | Value::F64(_) => self.numeric = true,
            Value::String(text) => {
                let length = text.chars().count();
                self.max_length = Some(self.max_length.map_or(length, |max| max.max(length)));
            }
            Value::DateTime(_) => self.date_field = true,
            Value::Bool(_) => self.boolean_field = true,
            Value::Document(_) => self.nested = true,
            Value::Array(items) => {
                self.array = true;
                if let Some(first) = items.first() {
                    self.array_size = Some(items.len());
                    if first.is_document() {
                        self.array_of_objects = true;
                    }
                }
            }
            Value::Null => {}
        }
    }
}

#[inline]
fn is_false(flag: &bool) -> bool {
    !*flag
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use chrono::Utc;

    #[test]
    fn test_string_max_length_in_chars() {
        let mut info = FieldInfo::default();
        info.observe(&Value::from("héllo"));
        info.observe(&Value::from("ab"));
        assert_eq!(info.type_name, "string");
        assert_eq!(info.max_length, Some(5));
    }

    #[test]
    fn test_flags_are_sticky_type_is_last() {
        let mut info = FieldInfo::default();
        info.observe(&Value::I32(1));
        info.observe(&Value::Bool(true));
        info.observe(&Value::from(Utc::now()));
        assert!(info.numeric);
        assert!(info.boolean_field);
        assert!(info.date_field);
        assert_eq!(info.type_name, "date");
    }

    #[test]
    fn test_array_size_only_for_non_empty() {
        let mut info = FieldInfo::default();
        info.observe(&Value::Array(vec![]));
        assert!(info.array);
        assert_eq!(info.array_size, None);

        info.observe(&Value::from(vec![1, 2, 3]));
        assert_eq!(info.array_size, Some(3));
        assert!(!info.array_of_objects);

        info.observe(&Value::Array(vec![]));
        assert_eq!(info.array_size, Some(3));
    }

    #[test]
    fn test_array_of_objects() {
        let mut info = FieldInfo::default();
        info.observe(&Value::Array(vec![Value::Document(doc! { a: 1 })]));
        assert!(info.array_of_objects);
        assert_eq!(info.array_size, Some(1));
    }

    #[test]
    fn test_serialization_skips_unset() {
        let mut info = FieldInfo::default();
        info.observe(&Value::from("xyz"));
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "string", "maxLength": 3 }));

        let mut info = FieldInfo::default();
        info.observe(&Value::Array(vec![Value::Document(doc! { a: 1 })]));
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "array", "array": true, "arraySize": 1, "arrayOfObjects": true })
        );
    }

    #[test]
    fn test_deserialize() {
        let info: FieldInfo =
            serde_json::from_str(r#"{"type":"document","nested":true}"#).unwrap();
        assert!(info.nested);
        assert!(!info.numeric);
        assert_eq!(info.type_name, "document");
    }
}
