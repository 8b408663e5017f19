use std::{any::Any, fmt::Display};

use crate::{collection::Document, common::Value, errors::DocLensResult};

use super::{matches_value, FilterOperator, FilterProvider};

/// A filter that matches all documents.
///
/// An empty filter specification translates to this filter.
pub(crate) struct AllFilter;

impl FilterProvider for AllFilter {
    fn apply(&self, _entry: &Document) -> DocLensResult<bool> {
        Ok(true)
    }

    fn operator(&self) -> FilterOperator {
        FilterOperator::All
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Display for AllFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AllFilter")
    }
}

/// A filter that matches documents where a field equals a specific value.
///
/// An array field matches when it equals the operand as a whole or when one
/// of its elements does, so `eq("dev")` selects documents tagged `dev`.
/// Numbers compare by value across widths (`1`, `1i64` and `1.0` are equal).
/// A missing field reads as null, so `eq(null)` matches documents without
/// the field.
pub(crate) struct EqualsFilter {
    field_name: String,
    field_value: Value,
}

impl EqualsFilter {
    #[inline]
    pub(crate) fn new(field_name: String, field_value: Value) -> Self {
        EqualsFilter {
            field_name,
            field_value,
        }
    }
}

impl FilterProvider for EqualsFilter {
    fn apply(&self, entry: &Document) -> DocLensResult<bool> {
        let value = entry.get(&self.field_name)?;
        Ok(matches_value(&value, |v| *v == self.field_value))
    }

    fn operator(&self) -> FilterOperator {
        FilterOperator::Equals
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

impl Display for EqualsFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} == {})", self.field_name, self.field_value)
    }
}

/// A filter on the presence of a field.
///
/// With `exists = true` it matches documents that hold the field, whatever
/// its value (null included); with `exists = false` it matches the others.
pub(crate) struct ExistsFilter {
    field_name: String,
    exists: bool,
}

impl ExistsFilter {
    #[inline]
    pub(crate) fn new(field_name: String, exists: bool) -> Self {
        ExistsFilter { field_name, exists }
    }
}

impl FilterProvider for ExistsFilter {
    fn apply(&self, entry: &Document) -> DocLensResult<bool> {
        let present = entry.lookup(&self.field_name)?.is_some();
        Ok(present == self.exists)
    }

    fn operator(&self) -> FilterOperator {
        FilterOperator::Exists
    }

    fn has_field(&self) -> bool {
        true
    }

    fn get_field_name(&self) -> DocLensResult<String> {
        Ok(self.field_name.clone())
    }

    fn get_field_value(&self) -> DocLensResult<Option<Value>> {
        Ok(Some(Value::Bool(self.exists)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Display for ExistsFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} exists {})", self.field_name, self.exists)
    }
}
