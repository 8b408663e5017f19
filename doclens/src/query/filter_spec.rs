use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::collection::Document;
use crate::common::Value;
use crate::errors::{DocLensError, DocLensResult, ErrorKind};

/// Caller-supplied search criteria, one entry per field.
///
/// Each entry's value decides the predicate built for the field:
///
/// * a string containing `*` is a case-insensitive wildcard pattern,
/// * a document is an operator map such as `{"gte": 18, "lt": 65}`,
/// * anything else must match exactly.
///
/// Entries keep their insertion order, and criteria parsed from JSON keep
/// the key order of the source text, so the translated filter and the echoed
/// criteria are deterministic.
///
/// ```rust
/// use doclens::query::FilterSpec;
/// use serde_json::json;
///
/// let spec = FilterSpec::from_json(json!({
///     "name": "Jo*",
///     "age": { "$gte": 18 },
///     "status": "active"
/// })).unwrap();
/// assert_eq!(spec.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    criteria: IndexMap<String, Value>,
}

impl FilterSpec {
    pub fn new() -> Self {
        FilterSpec {
            criteria: IndexMap::new(),
        }
    }

    /// Adds a criterion and returns the spec, for chaining.
    pub fn with<T: Into<Value>>(mut self, field: &str, value: T) -> Self {
        self.insert(field, value);
        self
    }

    /// Adds or replaces the criterion for `field`.
    pub fn insert<T: Into<Value>>(&mut self, field: &str, value: T) {
        self.criteria.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.criteria.get(field)
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.criteria.iter()
    }

    /// Parses criteria from a JSON object.
    ///
    /// Nested objects become operator maps. Fails with `InvalidDataType` if
    /// `json` is not an object.
    pub fn from_json(json: serde_json::Value) -> DocLensResult<Self> {
        match json {
            serde_json::Value::Object(map) => {
                let criteria = map
                    .into_iter()
                    .map(|(field, value)| (field, Value::from(value)))
                    .collect();
                Ok(FilterSpec { criteria })
            }
            other => {
                log::error!("Filter criteria must be a JSON object, found {}", other);
                Err(DocLensError::new(
                    "Filter criteria must be a JSON object",
                    ErrorKind::InvalidDataType,
                ))
            }
        }
    }

    /// Parses criteria from JSON text.
    pub fn from_json_str(text: &str) -> DocLensResult<Self> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json(json)
    }

    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .criteria
            .iter()
            .map(|(field, value)| (field.clone(), value.to_json()))
            .collect();
        serde_json::Value::Object(map)
    }
}

impl From<Document> for FilterSpec {
    fn from(document: Document) -> Self {
        let criteria = document
            .iter()
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect();
        FilterSpec { criteria }
    }
}

impl FromIterator<(String, Value)> for FilterSpec {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        FilterSpec {
            criteria: iter.into_iter().collect(),
        }
    }
}

impl Serialize for FilterSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.criteria.iter())
    }
}

impl<'de> Deserialize<'de> for FilterSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        FilterSpec::from_json(json).map_err(|err| serde::de::Error::custom(err.message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        let spec = FilterSpec::from_json(json!({ "b": 1, "a": "x*", "c": { "gt": 2 } })).unwrap();
        assert_eq!(spec.len(), 3);
        assert_eq!(spec.get("b"), Some(&Value::I64(1)));
        assert_eq!(spec.get("a"), Some(&Value::from("x*")));
        assert!(spec.get("c").unwrap().is_document());
    }

    #[test]
    fn test_parsed_criteria_keep_source_order() {
        let spec = FilterSpec::from_json_str(r#"{"zeta":1,"alpha":{"gt":2},"mid":"x*"}"#).unwrap();
        let fields: Vec<&str> = spec.iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(fields, vec!["zeta", "alpha", "mid"]);

        let echoed = serde_json::to_string(&spec.to_json()).unwrap();
        assert_eq!(echoed, r#"{"zeta":1,"alpha":{"gt":2},"mid":"x*"}"#);
        assert_eq!(serde_json::to_string(&spec).unwrap(), echoed);
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = FilterSpec::from_json(json!([1, 2])).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidDataType);
    }

    #[test]
    fn test_from_json_str() {
        let spec = FilterSpec::from_json_str(r#"{"status":"active"}"#).unwrap();
        assert_eq!(spec.get("status"), Some(&Value::from("active")));
        assert!(FilterSpec::from_json_str("{not json").is_err());
    }

    #[test]
    fn test_builder_and_insert() {
        let mut spec = FilterSpec::new().with("a", 1).with("b", "x");
        spec.insert("a", 2);
        assert_eq!(spec.len(), 2);
        assert_eq!(spec.get("a"), Some(&Value::I32(2)));
        assert!(!spec.is_empty());
        assert!(FilterSpec::default().is_empty());

        let fields: Vec<&str> = spec.iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(fields, vec!["a", "b"]);
    }

    #[test]
    fn test_from_document() {
        let spec = FilterSpec::from(doc! { age: { gte: 18 } });
        assert!(spec.get("age").unwrap().is_document());
    }

    #[test]
    fn test_serde() {
        let spec = FilterSpec::new().with("name", "Jo*").with("age", 3);
        let text = serde_json::to_string(&spec).unwrap();
        assert_eq!(text, r#"{"name":"Jo*","age":3}"#);

        let parsed: FilterSpec = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.get("age"), Some(&Value::I64(3)));
        assert_eq!(spec.to_json(), json!({ "name": "Jo*", "age": 3 }));
    }
}
