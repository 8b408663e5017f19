use im::OrdMap;
use smallvec::SmallVec;

use crate::common::{Value, FIELD_SEPARATOR};
use crate::errors::{DocLensError, DocLensResult, ErrorKind};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt::{Debug, Display};

type FieldVec = SmallVec<[String; 8]>;

/// A schema-less document: a mapping from field name to [Value].
///
/// Documents can nest other documents and arrays. A value inside a nested
/// document is addressed with a dot-separated path, and a numeric segment
/// addresses an array element:
///
/// ```rust
/// use doclens::doc;
/// use doclens::common::Value;
///
/// let doc = doc! {
///     name: "Ada",
///     address: { city: "London" },
///     phones: [{ kind: "home" }, { kind: "work" }]
/// };
/// assert_eq!(doc.get("address.city").unwrap(), Value::from("London"));
/// assert_eq!(doc.get("phones.1.kind").unwrap(), Value::from("work"));
/// assert_eq!(doc.get("missing").unwrap(), Value::Null);
/// ```
///
/// Field order carries no meaning; iteration is in key order. The map is a
/// persistent `im::OrdMap`, so cloning a document is O(1).
#[derive(Clone, Eq, PartialEq, Hash, Default, Ord, PartialOrd)]
pub struct Document {
    data: OrdMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: OrdMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Associates the specified [Value] with the specified key in this document.
    ///
    /// An embedded key (`"user.name"`) creates the intermediate documents it needs.
    ///
    /// # Errors
    ///
    /// Returns an error if the key, or one of its segments, is empty.
    pub fn put<'a, T: Into<Value>>(&mut self, key: impl Into<Cow<'a, str>>, value: T) -> DocLensResult<()> {
        let key = key.into();
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(DocLensError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }

        let value = value.into();
        if key.contains(FIELD_SEPARATOR) {
            let splits: Vec<&str> = key.split(FIELD_SEPARATOR).collect();
            self.deep_put(&splits, value)
        } else {
            self.data = self.data.update(key.to_string(), value);
            Ok(())
        }
    }

    /// Returns the [Value] at `key`, or [Value::Null] if the document has no such field.
    ///
    /// Embedded paths are resolved through nested documents and arrays. A
    /// non-numeric segment applied to an array collects the matching values of
    /// every element into a new array.
    pub fn get(&self, key: &str) -> DocLensResult<Value> {
        Ok(self.lookup(key)?.unwrap_or(Value::Null))
    }

    /// Resolves `key` like [Document::get] but tells a missing field apart from
    /// a field explicitly set to null.
    pub fn lookup(&self, key: &str) -> DocLensResult<Option<Value>> {
        if let Some(value) = self.data.get(key) {
            return Ok(Some(value.clone()));
        }
        if !key.contains(FIELD_SEPARATOR) {
            return Ok(None);
        }

        let splits: Vec<&str> = key.split(FIELD_SEPARATOR).collect();
        if splits.iter().any(|s| s.is_empty()) {
            log::error!("Invalid embedded field name {}", key);
            return Err(DocLensError::new(
                &format!("Invalid embedded field name {}", key),
                ErrorKind::ValidationError,
            ));
        }
        Ok(Self::recursive_get(self.data.get(splits[0]), &splits[1..]))
    }

    /// Checks whether the document holds `field`, top level or embedded,
    /// regardless of its value (null included).
    pub fn contains_field(&self, field: &str) -> bool {
        matches!(self.lookup(field), Ok(Some(_)))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Retrieves the leaf field paths of this document.
    ///
    /// Nested documents are flattened into dot-joined paths; arrays are leaves.
    pub fn fields(&self) -> FieldVec {
        self.get_fields_internal("")
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Iterates over the top level `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    /// Builds a document from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [ErrorKind::InvalidDataType] if `json` is not an object.
    pub fn from_json(json: serde_json::Value) -> DocLensResult<Document> {
        match json {
            serde_json::Value::Object(map) => Ok(Document::from_json_map(map)),
            other => {
                log::error!("Expected a JSON object for a document, found {}", other);
                Err(DocLensError::new(
                    "Expected a JSON object for a document",
                    ErrorKind::InvalidDataType,
                ))
            }
        }
    }

    pub(crate) fn from_json_map(map: serde_json::Map<String, serde_json::Value>) -> Document {
        let mut data = OrdMap::new();
        for (key, value) in map {
            // keys are stored as-is, a dotted JSON key stays a single field
            data.insert(key, Value::from(value));
        }
        Document { data }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .data
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }

    fn get_fields_internal(&self, prefix: &str) -> FieldVec {
        let mut fields = FieldVec::new();
        for (key, value) in self.data.iter() {
            let field = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}{}{}", prefix, FIELD_SEPARATOR, key)
            };

            if let Value::Document(doc) = value {
                fields.append(&mut doc.get_fields_internal(&field));
            } else {
                fields.push(field);
            }
        }
        fields
    }

    fn deep_put(&mut self, splits: &[&str], value: Value) -> DocLensResult<()> {
        let key = match splits.first() {
            Some(key) if !key.is_empty() => *key,
            _ => {
                log::error!("Document does not support empty key");
                return Err(DocLensError::new(
                    "Document does not support empty key",
                    ErrorKind::InvalidOperation,
                ));
            }
        };

        if splits.len() == 1 {
            self.data = self.data.update(key.to_string(), value);
            return Ok(());
        }

        let mut nested = match self.data.get(key) {
            Some(Value::Document(obj)) => obj.clone(),
            _ => Document::new(),
        };
        nested.deep_put(&splits[1..], value)?;
        self.data = self.data.update(key.to_string(), Value::Document(nested));
        Ok(())
    }

    fn recursive_get(value: Option<&Value>, splits: &[&str]) -> Option<Value> {
        let value = value?;
        if splits.is_empty() {
            return Some(value.clone());
        }

        let key = splits[0];
        match value {
            Value::Document(obj) => Self::recursive_get(obj.data.get(key), &splits[1..]),
            Value::Array(arr) => match key.parse::<usize>() {
                Ok(index) => Self::recursive_get(arr.get(index), &splits[1..]),
                // not an index, collect the path from every element
                Err(_) => Self::decompose(arr, splits),
            },
            _ => None,
        }
    }

    fn decompose(arr: &[Value], splits: &[&str]) -> Option<Value> {
        let mut items = Vec::with_capacity(arr.len());
        for item in arr {
            match Self::recursive_get(Some(item), splits) {
                Some(Value::Array(values)) => items.extend(values),
                Some(value) => items.push(value),
                None => {}
            }
        }

        if items.is_empty() {
            None
        } else {
            Some(Value::Array(items))
        }
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.data.iter()).finish()
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.data.iter())
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Document::from_json(json).map_err(serde::de::Error::custom)
    }
}

pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a Document with JSON-like syntax.
///
/// ```rust
/// use doclens::doc;
///
/// let empty = doc! {};
/// assert!(empty.is_empty());
///
/// let base = 100;
/// let user = doc! {
///     name: "Charlie",
///     "display name": "Chuck",
///     score: (base * 2),
///     address: { city: "Paris", zip: "75001" },
///     tags: ["admin", "user"]
/// };
/// assert_eq!(user.size(), 5);
/// ```
#[macro_export]
macro_rules! doc {
    ({}) => {
        $crate::collection::Document::new()
    };

    () => {
        $crate::collection::Document::new()
    };

    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::doc!($($key : $value),*)
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::doc_value;

            let mut doc = $crate::collection::Document::new();
            $(
                doc.put($crate::collection::normalize(stringify!($key)), $crate::doc_value!($value))
                .expect(&format!("Failed to put value {} in document", stringify!($value)));
            )*
            doc
        }
    };
}

/// Helper macro to convert values for the doc! macro.
#[macro_export]
macro_rules! doc_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        {
            $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
        }
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    fn set_up() -> Document {
        doc! {
            score: 1034,
            location: {
                state: "NY",
                city: "New York",
                address: {
                    line1: "40",
                    zip: 10001,
                },
            },
            category: ["food", "produce", "grocery"],
            obj_array: [
                { value: 1 },
                { value: 2 },
            ],
            nothing: (Value::Null)
        }
    }

    #[test]
    fn test_get_top_level() {
        let doc = set_up();
        assert_eq!(doc.get("score").unwrap(), Value::I32(1034));
        assert_eq!(doc.get("unknown").unwrap(), Value::Null);
    }

    #[test]
    fn test_get_embedded() {
        let doc = set_up();
        assert_eq!(doc.get("location.city").unwrap(), Value::from("New York"));
        assert_eq!(doc.get("location.address.zip").unwrap(), Value::I32(10001));
        assert_eq!(doc.get("location.address.none").unwrap(), Value::Null);
    }

    #[test]
    fn test_get_array_index() {
        let doc = set_up();
        assert_eq!(doc.get("category.2").unwrap(), Value::from("grocery"));
        assert_eq!(doc.get("category.9").unwrap(), Value::Null);
        assert_eq!(doc.get("obj_array.0.value").unwrap(), Value::I32(1));
    }

    #[test]
    fn test_get_decomposes_array_of_documents() {
        let doc = set_up();
        assert_eq!(
            doc.get("obj_array.value").unwrap(),
            Value::Array(vec![Value::I32(1), Value::I32(2)])
        );
    }

    #[test]
    fn test_get_invalid_embedded_key() {
        let doc = set_up();
        assert!(doc.get("location..city").is_err());
        assert!(doc.get(".score").is_err());
    }

    #[test]
    fn test_lookup_tells_missing_from_null() {
        let doc = set_up();
        assert_eq!(doc.lookup("nothing").unwrap(), Some(Value::Null));
        assert_eq!(doc.lookup("absent").unwrap(), None);
        assert!(doc.contains_field("nothing"));
        assert!(doc.contains_field("location.state"));
        assert!(!doc.contains_field("location.country"));
    }

    #[test]
    fn test_put_embedded_creates_documents() {
        let mut doc = Document::new();
        doc.put("user.name", "Alice").unwrap();
        doc.put("user.email", "alice@example.com").unwrap();
        assert_eq!(doc.size(), 1);
        assert_eq!(doc.get("user.name").unwrap(), Value::from("Alice"));
        assert_eq!(doc.get("user").unwrap().as_document().unwrap().size(), 2);
    }

    #[test]
    fn test_put_empty_key_fails() {
        let mut doc = Document::new();
        assert!(doc.put("", 1).is_err());
        assert!(doc.put("a..b", 1).is_err());
    }

    #[test]
    fn test_fields() {
        let doc = set_up();
        let fields = doc.fields();
        assert!(fields.contains(&"location.address.zip".to_string()));
        assert!(fields.contains(&"category".to_string()));
        assert!(!fields.contains(&"location".to_string()));
    }

    #[test]
    fn test_from_json_requires_object() {
        assert!(Document::from_json(serde_json::json!([1, 2])).is_err());
        let doc = Document::from_json(serde_json::json!({"a.b": 1})).unwrap();
        // a dotted JSON key is one field, not a path
        assert!(doc.contains_key("a.b"));
    }

    #[test]
    fn test_json_round_trip() {
        let doc = set_up();
        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get("location.address.zip").unwrap(), Value::I64(10001));
        assert_eq!(back.get("category.0").unwrap(), Value::from("food"));
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a = doc! { x: 1, y: 2 };
        let b = doc! { y: 2, x: 1 };
        assert_eq!(a, b);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("\"quoted\""), "quoted");
        assert_eq!(normalize("plain"), "plain");
    }
}
