use std::fmt::Display;

use crate::common::Value;
use crate::errors::{DocLensError, DocLensResult, ErrorKind};
use crate::filter::{self, field, Filter};

use super::FilterSpec;

/// Operators accepted inside an operator map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperator {
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Nin,
    Regex,
    Exists,
}

impl QueryOperator {
    /// Parses an operator key, with or without a leading `$`.
    pub fn parse(key: &str) -> Option<QueryOperator> {
        let name = key.strip_prefix('$').unwrap_or(key);
        match name {
            "gt" => Some(QueryOperator::Gt),
            "gte" => Some(QueryOperator::Gte),
            "lt" => Some(QueryOperator::Lt),
            "lte" => Some(QueryOperator::Lte),
            "in" => Some(QueryOperator::In),
            "nin" => Some(QueryOperator::Nin),
            "regex" => Some(QueryOperator::Regex),
            "exists" => Some(QueryOperator::Exists),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            QueryOperator::Gt => "gt",
            QueryOperator::Gte => "gte",
            QueryOperator::Lt => "lt",
            QueryOperator::Lte => "lte",
            QueryOperator::In => "in",
            QueryOperator::Nin => "nin",
            QueryOperator::Regex => "regex",
            QueryOperator::Exists => "exists",
        }
    }
}

impl Display for QueryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Translates a [FilterSpec] into a [Filter].
///
/// Each field yields one predicate and the predicates are AND-combined; an
/// empty `FilterSpec` yields the match-all filter. Per field:
///
/// 1. a string containing `*` becomes a case-insensitive wildcard match,
/// 2. an operator map becomes one predicate per operator, AND-combined,
/// 3. any other value becomes exact equality.
///
/// An array field satisfies a predicate when one of its elements does.
///
/// In strict mode (the default) an unknown operator key or an operand of the
/// wrong shape fails the whole translation with `InvalidOperator`. In lenient
/// mode the offending operator is skipped and a warning is logged.
///
/// ```rust
/// use doclens::doc;
/// use doclens::query::{FilterSpec, QueryBuilder};
/// use serde_json::json;
///
/// let spec = FilterSpec::from_json(json!({ "age": { "gte": 18 }, "name": "jo*" })).unwrap();
/// let filter = QueryBuilder::new().build(&spec).unwrap();
/// assert!(filter.apply(&doc! { name: "John", age: 20 }).unwrap());
///
/// let bad = FilterSpec::from_json(json!({ "age": { "$between": [1, 2] } })).unwrap();
/// assert!(QueryBuilder::new().build(&bad).is_err());
/// assert!(QueryBuilder::lenient().build(&bad).is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryBuilder {
    strict: bool,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        QueryBuilder::new()
    }
}

impl QueryBuilder {
    /// A strict builder.
    pub fn new() -> Self {
        QueryBuilder { strict: true }
    }

    /// A builder that skips unsupported operators instead of failing.
    pub fn lenient() -> Self {
        QueryBuilder { strict: false }
    }

    pub fn with_strict(strict: bool) -> Self {
        QueryBuilder { strict }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn build(&self, spec: &FilterSpec) -> DocLensResult<Filter> {
        let mut filters = Vec::with_capacity(spec.len());
        for (field_name, criterion) in spec.iter() {
            filters.extend(self.field_filters(field_name, criterion)?);
        }

        let filter = filter::and(filters);
        log::debug!("Translated filter criteria {} into {}", spec.to_json(), filter);
        Ok(filter)
    }

    fn field_filters(&self, field_name: &str, criterion: &Value) -> DocLensResult<Vec<Filter>> {
        match criterion {
            Value::String(text) if text.contains('*') => {
                Ok(vec![field(field_name).wildcard(text)?])
            }
            Value::Document(operators) => {
                let mut filters = Vec::with_capacity(operators.size());
                for (key, operand) in operators.iter() {
                    if let Some(filter) = self.operator_filter(field_name, key, operand)? {
                        filters.push(filter);
                    }
                }
                Ok(filters)
            }
            other => Ok(vec![field(field_name).eq(other.clone())]),
        }
    }

    fn operator_filter(
        &self,
        field_name: &str,
        key: &str,
        operand: &Value,
    ) -> DocLensResult<Option<Filter>> {
        let operator = match QueryOperator::parse(key) {
            Some(operator) => operator,
            None => {
                return self.reject(&format!(
                    "Unsupported operator {} on field {}",
                    key, field_name
                ))
            }
        };

        match (operator, operand) {
            (QueryOperator::Gt, value) if is_comparable(value) => {
                Ok(Some(field(field_name).gt(value.clone())))
            }
            (QueryOperator::Gte, value) if is_comparable(value) => {
                Ok(Some(field(field_name).gte(value.clone())))
            }
            (QueryOperator::Lt, value) if is_comparable(value) => {
                Ok(Some(field(field_name).lt(value.clone())))
            }
            (QueryOperator::Lte, value) if is_comparable(value) => {
                Ok(Some(field(field_name).lte(value.clone())))
            }
            (QueryOperator::In, Value::Array(values)) => {
                Ok(Some(field(field_name).in_array(values.clone())))
            }
            (QueryOperator::Nin, Value::Array(values)) => {
                Ok(Some(field(field_name).not_in_array(values.clone())))
            }
            (QueryOperator::Regex, Value::String(pattern)) => {
                match field(field_name).regex_ignore_case(pattern) {
                    Ok(filter) => Ok(Some(filter)),
                    Err(err) => self.reject(&format!(
                        "Invalid pattern for operator {} on field {}: {}",
                        operator,
                        field_name,
                        err.message()
                    )),
                }
            }
            (QueryOperator::Exists, Value::Bool(exists)) => {
                Ok(Some(field(field_name).exists(*exists)))
            }
            (operator, operand) => self.reject(&format!(
                "Operator {} on field {} does not accept a {} operand",
                operator,
                field_name,
                operand.type_name()
            )),
        }
    }

    fn reject(&self, message: &str) -> DocLensResult<Option<Filter>> {
        if self.strict {
            log::error!("{}", message);
            Err(DocLensError::new(message, ErrorKind::InvalidOperator))
        } else {
            log::warn!("{}, ignoring it", message);
            Ok(None)
        }
    }
}

fn is_comparable(value: &Value) -> bool {
    value.is_number() || value.is_string() || value.is_date_time() || value.is_bool()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use crate::filter::{is_all_filter, FilterOperator};
    use serde_json::json;

    fn spec(json: serde_json::Value) -> FilterSpec {
        FilterSpec::from_json(json).unwrap()
    }

    #[test]
    fn test_parse_operator() {
        assert_eq!(QueryOperator::parse("gt"), Some(QueryOperator::Gt));
        assert_eq!(QueryOperator::parse("$gte"), Some(QueryOperator::Gte));
        assert_eq!(QueryOperator::parse("$nin"), Some(QueryOperator::Nin));
        assert_eq!(QueryOperator::parse("ne"), None);
        assert_eq!(QueryOperator::parse("$$gt"), None);
    }

    #[test]
    fn test_empty_spec_is_all() {
        let filter = QueryBuilder::new().build(&FilterSpec::new()).unwrap();
        assert!(is_all_filter(&filter));
    }

    #[test]
    fn test_exact_match() {
        let filter = QueryBuilder::new().build(&spec(json!({ "status": "active" }))).unwrap();
        assert_eq!(filter.operator(), FilterOperator::Equals);
        assert!(filter.apply(&doc! { status: "active" }).unwrap());
        assert!(!filter.apply(&doc! { status: "Active" }).unwrap());
    }

    #[test]
    fn test_wildcard() {
        let filter = QueryBuilder::new().build(&spec(json!({ "name": "Jo*" }))).unwrap();
        assert_eq!(filter.operator(), FilterOperator::Regex);
        assert!(filter.apply(&doc! { name: "John Doe" }).unwrap());
        assert!(filter.apply(&doc! { name: "Jo" }).unwrap());
        assert!(filter.apply(&doc! { name: "jOHN" }).unwrap());
        assert!(!filter.apply(&doc! { name: "jim" }).unwrap());
    }

    #[test]
    fn test_wildcard_escapes_metacharacters() {
        let filter = QueryBuilder::new().build(&spec(json!({ "path": "a.b*" }))).unwrap();
        assert!(filter.apply(&doc! { path: "a.bc" }).unwrap());
        assert!(!filter.apply(&doc! { path: "axbc" }).unwrap());
    }

    #[test]
    fn test_range() {
        let filter = QueryBuilder::new()
            .build(&spec(json!({ "age": { "$gte": 18, "$lt": 65 } })))
            .unwrap();
        assert_eq!(filter.operator(), FilterOperator::And);
        assert!(filter.apply(&doc! { age: 18 }).unwrap());
        assert!(filter.apply(&doc! { age: 64 }).unwrap());
        assert!(!filter.apply(&doc! { age: 65 }).unwrap());
        assert!(!filter.apply(&doc! { age: 17 }).unwrap());
    }

    #[test]
    fn test_membership_regex_exists() {
        let filter = QueryBuilder::new()
            .build(&spec(json!({
                "status": { "in": ["a", "b"] },
                "role": { "nin": ["admin"] },
                "email": { "regex": "@EXAMPLE\\.com$" },
                "deleted": { "exists": false }
            })))
            .unwrap();

        assert!(filter
            .apply(&doc! { status: "a", role: "user", email: "x@example.com" })
            .unwrap());
        assert!(!filter
            .apply(&doc! { status: "c", role: "user", email: "x@example.com" })
            .unwrap());
        assert!(!filter
            .apply(&doc! { status: "a", role: "admin", email: "x@example.com" })
            .unwrap());
        assert!(!filter
            .apply(&doc! { status: "a", role: "user", email: "x@example.org" })
            .unwrap());
        assert!(!filter
            .apply(&doc! { status: "a", role: "user", email: "x@example.com", deleted: true })
            .unwrap());
    }

    #[test]
    fn test_multiple_fields_are_and_combined() {
        let filter = QueryBuilder::new()
            .build(&spec(json!({ "a": 1, "b": { "gt": 1 } })))
            .unwrap();
        assert_eq!(filter.logical_filters().unwrap().len(), 2);
        assert!(filter.apply(&doc! { a: 1, b: 2 }).unwrap());
        assert!(!filter.apply(&doc! { a: 2, b: 2 }).unwrap());
    }

    #[test]
    fn test_empty_operator_map_adds_nothing() {
        let filter = QueryBuilder::new()
            .build(&spec(json!({ "a": {}, "b": 1 })))
            .unwrap();
        assert_eq!(filter.operator(), FilterOperator::Equals);

        let all = QueryBuilder::new().build(&spec(json!({ "a": {} }))).unwrap();
        assert!(is_all_filter(&all));
    }

    #[test]
    fn test_strict_rejects_unknown_operator() {
        let err = QueryBuilder::new()
            .build(&spec(json!({ "a": { "$ne": 1 } })))
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidOperator);
    }

    #[test]
    fn test_strict_rejects_ill_typed_operands() {
        let builder = QueryBuilder::new();
        for bad in [
            json!({ "a": { "in": 1 } }),
            json!({ "a": { "nin": "x" } }),
            json!({ "a": { "exists": "yes" } }),
            json!({ "a": { "regex": 5 } }),
            json!({ "a": { "regex": "(" } }),
            json!({ "a": { "gt": [1] } }),
            json!({ "a": { "lt": null } }),
        ] {
            let err = builder.build(&spec(bad)).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidOperator);
        }
    }

    #[test]
    fn test_lenient_skips_bad_operators() {
        let builder = QueryBuilder::lenient();
        assert!(!builder.is_strict());
        let filter = builder
            .build(&spec(json!({ "a": { "$ne": 1, "gt": 5, "in": 3 } })))
            .unwrap();
        assert_eq!(filter.operator(), FilterOperator::Greater);
        assert!(filter.apply(&doc! { a: 6 }).unwrap());
        assert!(!filter.apply(&doc! { a: 1 }).unwrap());
    }

    #[test]
    fn test_deterministic() {
        let criteria = spec(json!({ "a": { "gt": 1 }, "b": "x*", "c": true }));
        let one = QueryBuilder::new().build(&criteria).unwrap();
        let two = QueryBuilder::new().build(&criteria).unwrap();
        assert_eq!(one.to_string(), two.to_string());
    }
}
