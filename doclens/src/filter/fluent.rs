use crate::common::Value;
use crate::errors::DocLensResult;

use super::{
    wildcard_to_regex, ComparisonFilter, ComparisonMode, EqualsFilter, ExistsFilter, Filter,
    InFilter, NotInFilter, RegexFilter,
};

/// Creates a fluent filter builder for the specified field name.
///
/// The name may address an embedded field with `.` separators, for example
/// `field("address.city")`.
pub fn field(field_name: &str) -> FluentFilter {
    FluentFilter {
        field_name: field_name.to_string(),
    }
}

/// A fluent builder for constructing filters on a specific field.
///
/// Each method consumes the builder and returns a [Filter] that can be
/// passed to a store or combined with other filters through
/// [Filter::and].
///
/// ```rust
/// use doclens::doc;
/// use doclens::filter::field;
///
/// let adults = field("age").gte(18);
/// let named = field("name").wildcard("jo*").unwrap();
/// let filter = adults.and(named);
///
/// assert!(filter.apply(&doc! { name: "John", age: 40 }).unwrap());
/// assert!(!filter.apply(&doc! { name: "Mary", age: 40 }).unwrap());
/// ```
pub struct FluentFilter {
    field_name: String,
}

impl FluentFilter {
    /// Matches documents where the field equals `value`.
    #[inline]
    pub fn eq<T: Into<Value>>(self, value: T) -> Filter {
        Filter::new(EqualsFilter::new(self.field_name, value.into()))
    }

    /// Matches documents where the field is greater than `value`.
    #[inline]
    pub fn gt<T: Into<Value>>(self, value: T) -> Filter {
        self.compare(value.into(), ComparisonMode::Greater)
    }

    /// Matches documents where the field is greater than or equal to `value`.
    #[inline]
    pub fn gte<T: Into<Value>>(self, value: T) -> Filter {
        self.compare(value.into(), ComparisonMode::GreaterEqual)
    }

    /// Matches documents where the field is less than `value`.
    #[inline]
    pub fn lt<T: Into<Value>>(self, value: T) -> Filter {
        self.compare(value.into(), ComparisonMode::Lesser)
    }

    /// Matches documents where the field is less than or equal to `value`.
    #[inline]
    pub fn lte<T: Into<Value>>(self, value: T) -> Filter {
        self.compare(value.into(), ComparisonMode::LesserEqual)
    }

    /// Matches documents where the field equals one of `values`.
    #[inline]
    pub fn in_array<T: Into<Value>>(self, values: Vec<T>) -> Filter {
        let values = values.into_iter().map(Into::into).collect();
        Filter::new(InFilter::new(self.field_name, values))
    }

    /// Matches documents where the field equals none of `values`.
    #[inline]
    pub fn not_in_array<T: Into<Value>>(self, values: Vec<T>) -> Filter {
        let values = values.into_iter().map(Into::into).collect();
        Filter::new(NotInFilter::new(self.field_name, values))
    }

    /// Matches documents where the field is (or is not) present.
    #[inline]
    pub fn exists(self, exists: bool) -> Filter {
        Filter::new(ExistsFilter::new(self.field_name, exists))
    }

    /// Matches documents whose string field matches the regular expression.
    ///
    /// Fails with a filter error if `pattern` does not compile.
    pub fn regex(self, pattern: &str) -> DocLensResult<Filter> {
        let filter = RegexFilter::new(self.field_name, pattern.to_string(), false)?;
        Ok(Filter::new(filter))
    }

    /// Like [FluentFilter::regex], ignoring case.
    pub fn regex_ignore_case(self, pattern: &str) -> DocLensResult<Filter> {
        let filter = RegexFilter::new(self.field_name, pattern.to_string(), true)?;
        Ok(Filter::new(filter))
    }

    /// Case-insensitive wildcard match where `*` stands for any characters.
    ///
    /// See [wildcard_to_regex] for how the pattern is read.
    pub fn wildcard(self, pattern: &str) -> DocLensResult<Filter> {
        self.regex_ignore_case(&wildcard_to_regex(pattern))
    }

    fn compare(self, value: Value, mode: ComparisonMode) -> Filter {
        Filter::new(ComparisonFilter::new(self.field_name, value, mode))
    }
}
