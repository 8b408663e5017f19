use std::{any::Any, cmp::Ordering, fmt::Display};

use crate::{collection::Document, common::Value, errors::DocLensResult};

use super::{matches_value, FilterOperator, FilterProvider};

/// The bound a [ComparisonFilter] checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ComparisonMode {
    Greater,
    GreaterEqual,
    Lesser,
    LesserEqual,
}

impl ComparisonMode {
    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            ComparisonMode::Greater => ordering == Ordering::Greater,
            ComparisonMode::GreaterEqual => ordering != Ordering::Less,
            ComparisonMode::Lesser => ordering == Ordering::Less,
            ComparisonMode::LesserEqual => ordering != Ordering::Greater,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            ComparisonMode::Greater => ">",
            ComparisonMode::GreaterEqual => ">=",
            ComparisonMode::Lesser => "<",
            ComparisonMode::LesserEqual => "<=",
        }
    }
}

/// A range bound on a field: `>`, `>=`, `<` or `<=`.
///
/// Only values of the same kind as the operand are ordered against it:
/// numbers with numbers, strings with strings, dates with dates. A field of
/// another kind, or a missing field, never satisfies the bound. An array
/// field satisfies it when any of its elements does.
pub(crate) struct ComparisonFilter {
    field_name: String,
    field_value: Value,
    mode: ComparisonMode,
}

impl ComparisonFilter {
    #[inline]
    pub(crate) fn new(field_name: String, field_value: Value, mode: ComparisonMode) -> Self {
        ComparisonFilter {
            field_name,
            field_value,
            mode,
        }
    }
}

impl FilterProvider for ComparisonFilter {
    fn apply(&self, entry: &Document) -> DocLensResult<bool> {
        let value = match entry.lookup(&self.field_name)? {
            Some(value) => value,
            None => return Ok(false),
        };

        if value.is_null() {
            return Ok(false);
        }

        Ok(matches_value(&value, |v| {
            !v.is_null()
                && v.compare_same_kind(&self.field_value)
                    .is_some_and(|ordering| self.mode.accepts(ordering))
        }))
    }

    fn operator(&self) -> FilterOperator {
        match self.mode {
            ComparisonMode::Greater => FilterOperator::Greater,
            ComparisonMode::GreaterEqual => FilterOperator::GreaterEqual,
            ComparisonMode::Lesser => FilterOperator::Lesser,
            ComparisonMode::LesserEqual => FilterOperator::LesserEqual,
        }
    }

    fn has_field(&self) -> bool {
        true
    }

    fn get_field_name(&self) -> DocLensResult<String> {
        Ok(self.field_name.clone())
    }

    fn get_field_value(&self) -> DocLensResult<Option<Value>> {
        Ok(Some(self.field_value.clone()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Display for ComparisonFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({} {} {})",
            self.field_name,
            self.mode.symbol(),
            self.field_value
        )
    }
}

/// Matches documents whose field equals one of a set of values.
///
/// A missing field reads as null, so a `null` member matches documents
/// without the field. An array field matches when any of its elements is in
/// the set.
pub(crate) struct InFilter {
    field_name: String,
    field_values: Vec<Value>,
}

impl InFilter {
    #[inline]
    pub(crate) fn new(field_name: String, field_values: Vec<Value>) -> Self {
        InFilter {
            field_name,
            field_values,
        }
    }
}

impl FilterProvider for InFilter {
    fn apply(&self, entry: &Document) -> DocLensResult<bool> {
        let value = entry.get(&self.field_name)?;
        Ok(matches_value(&value, |v| self.field_values.contains(v)))
    }

    fn operator(&self) -> FilterOperator {
        FilterOperator::In
    }

    fn has_field(&self) -> bool {
        true
    }

    fn get_field_name(&self) -> DocLensResult<String> {
        Ok(self.field_name.clone())
    }

    fn get_field_value(&self) -> DocLensResult<Option<Value>> {
        Ok(Some(Value::Array(self.field_values.clone())))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Display for InFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({} in {})",
            self.field_name,
            Value::Array(self.field_values.clone())
        )
    }
}

/// Matches documents whose field equals none of a set of values.
///
/// Documents without the field match unless the set holds `null`. An array
/// field matches only when none of its elements is in the set, so an empty
/// array always matches.
pub(crate) struct NotInFilter {
    field_name: String,
    field_values: Vec<Value>,
}

impl NotInFilter {
    #[inline]
    pub(crate) fn new(field_name: String, field_values: Vec<Value>) -> Self {
        NotInFilter {
            field_name,
            field_values,
        }
    }
}

impl FilterProvider for NotInFilter {
    fn apply(&self, entry: &Document) -> DocLensResult<bool> {
        let value = entry.get(&self.field_name)?;
        Ok(!matches_value(&value, |v| self.field_values.contains(v)))
    }

    fn operator(&self) -> FilterOperator {
        FilterOperator::NotIn
    }

    fn has_field(&self) -> bool {
        true
    }

    fn get_field_name(&self) -> DocLensResult<String> {
        Ok(self.field_name.clone())
    }

    fn get_field_value(&self) -> DocLensResult<Option<Value>> {
        Ok(Some(Value::Array(self.field_values.clone())))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Display for NotInFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({} not in {})",
            self.field_name,
            Value::Array(self.field_values.clone())
        )
    }
}
