use std::{any::Any, fmt::Display};

use crate::{collection::Document, errors::DocLensResult};

use super::{Filter, FilterOperator, FilterProvider};

/// Matches documents satisfying every child filter.
///
/// Children are evaluated in order and evaluation stops at the first one
/// that does not match.
pub(crate) struct AndFilter {
    filters: Vec<Filter>,
}

impl AndFilter {
    #[inline]
    pub(crate) fn new(filters: Vec<Filter>) -> Self {
        AndFilter { filters }
    }
}

impl FilterProvider for AndFilter {
    fn apply(&self, entry: &Document) -> DocLensResult<bool> {
        for filter in &self.filters {
            if !filter.apply(entry)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn operator(&self) -> FilterOperator {
        FilterOperator::And
    }

    fn logical_filters(&self) -> DocLensResult<Vec<Filter>> {
        Ok(self.filters.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Display for AndFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                write!(f, " && ")?;
            }
            write!(f, "{}", filter)?;
        }
        write!(f, ")")
    }
}
