use std::{any::Any, fmt::Display};

use regex::{Regex, RegexBuilder};

use crate::{
    collection::Document,
    common::Value,
    errors::{DocLensError, DocLensResult, ErrorKind},
};

use super::{matches_value, FilterOperator, FilterProvider};

/// Matches documents whose string field matches a regular expression.
///
/// The pattern is unanchored: it matches when it occurs anywhere in the
/// value. Non-string fields and missing fields never match, while an array
/// field matches when one of its string elements does. The expression
/// is compiled once, when the filter is built, so an invalid pattern is
/// reported at construction instead of on every document.
pub(crate) struct RegexFilter {
    field_name: String,
    pattern: String,
    case_insensitive: bool,
    regex: Regex,
}

impl RegexFilter {
    pub(crate) fn new(
        field_name: String,
        pattern: String,
        case_insensitive: bool,
    ) -> DocLensResult<Self> {
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|err| {
                log::error!("Invalid regex pattern {} for field {}: {}", pattern, field_name, err);
                DocLensError::new(
                    &format!("Invalid regex pattern {}: {}", pattern, err),
                    ErrorKind::FilterError,
                )
            })?;

        Ok(RegexFilter {
            field_name,
            pattern,
            case_insensitive,
            regex,
        })
    }

    pub(crate) fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }
}

impl FilterProvider for RegexFilter {
    fn apply(&self, entry: &Document) -> DocLensResult<bool> {
        let value = entry.get(&self.field_name)?;
        Ok(matches_value(&value, |v| {
            v.as_string().is_some_and(|text| self.regex.is_match(text))
        }))
    }

    fn operator(&self) -> FilterOperator {
        FilterOperator::Regex
    }

    fn has_field(&self) -> bool {
        true
    }

    fn get_field_name(&self) -> DocLensResult<String> {
        Ok(self.field_name.clone())
    }

    fn get_field_value(&self) -> DocLensResult<Option<Value>> {
        Ok(Some(Value::String(self.pattern.clone())))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Display for RegexFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flags = if self.is_case_insensitive() { "i" } else { "" };
        write!(f, "({} =~ /{}/{})", self.field_name, self.pattern, flags)
    }
}

/// Converts a wildcard pattern into a regular expression.
///
/// Every `*` stands for any run of characters (possibly empty); every other
/// character is matched literally, regex metacharacters included.
///
/// ```rust
/// use doclens::filter::wildcard_to_regex;
///
/// assert_eq!(wildcard_to_regex("Jo*"), "Jo.*");
/// assert_eq!(wildcard_to_regex("a.b*"), "a\\.b.*");
/// ```
pub fn wildcard_to_regex(pattern: &str) -> String {
    pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*")
}
