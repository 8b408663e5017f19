use crate::collection::Document;
use crate::common::Value;
use crate::errors::{DocLensError, DocLensResult, ErrorKind};
use std::any::Any;
use std::fmt::Display;
use std::ops::Deref;
use std::sync::Arc;

use super::{AllFilter, AndFilter};

/// The operation a filter node performs.
///
/// Stores that cannot evaluate a [Filter] in process (a remote database, for
/// instance) walk the tree through [FilterProvider::operator],
/// [FilterProvider::get_field_name], [FilterProvider::get_field_value] and
/// [FilterProvider::logical_filters] and translate each node into their own
/// query language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    /// Matches every document
    All,
    /// Field equals the operand
    Equals,
    /// Field is greater than the operand
    Greater,
    /// Field is greater than or equal to the operand
    GreaterEqual,
    /// Field is less than the operand
    Lesser,
    /// Field is less than or equal to the operand
    LesserEqual,
    /// Field equals one of the operand array's values
    In,
    /// Field equals none of the operand array's values
    NotIn,
    /// Field is a string matching the operand pattern
    Regex,
    /// Field presence equals the boolean operand
    Exists,
    /// Every child filter matches
    And,
}

impl FilterOperator {
    /// The operator's name in filter specifications (`gt`, `in`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            FilterOperator::All => "all",
            FilterOperator::Equals => "eq",
            FilterOperator::Greater => "gt",
            FilterOperator::GreaterEqual => "gte",
            FilterOperator::Lesser => "lt",
            FilterOperator::LesserEqual => "lte",
            FilterOperator::In => "in",
            FilterOperator::NotIn => "nin",
            FilterOperator::Regex => "regex",
            FilterOperator::Exists => "exists",
            FilterOperator::And => "and",
        }
    }
}

/// Trait for implementing filter nodes.
///
/// A `FilterProvider` evaluates a condition against a document and describes
/// itself so that it can be translated by stores that do not evaluate filters
/// in memory.
pub trait FilterProvider: Any + Send + Sync + Display {
    /// Applies the filter to a document and returns whether it matches.
    fn apply(&self, entry: &Document) -> DocLensResult<bool>;

    /// The operation this node performs.
    fn operator(&self) -> FilterOperator;

    /// Checks if this filter operates on a specific field.
    #[inline]
    fn has_field(&self) -> bool {
        false
    }

    /// Gets the field name this filter operates on.
    fn get_field_name(&self) -> DocLensResult<String> {
        log::error!("Filter {} does not have field name", self);
        Err(DocLensError::new(
            "Filter does not have field name",
            ErrorKind::FilterError,
        ))
    }

    /// Gets the operand this filter compares the field with.
    fn get_field_value(&self) -> DocLensResult<Option<Value>> {
        log::debug!("Filter {} does not have field value", self);
        Err(DocLensError::new(
            "Filter does not have field value",
            ErrorKind::FilterError,
        ))
    }

    /// Gets the children of a logical filter.
    fn logical_filters(&self) -> DocLensResult<Vec<Filter>> {
        Err(DocLensError::new(
            "Filter is not a logical filter",
            ErrorKind::FilterError,
        ))
    }

    fn as_any(&self) -> &dyn Any;
}

/// A predicate tree selecting documents from a collection.
///
/// `Filter` is a cheap, clonable handle on a [FilterProvider]. Filters are
/// built with the fluent API in [super::field] or translated from a
/// `FilterSpec` by the query builder.
///
/// ```rust
/// use doclens::doc;
/// use doclens::filter::field;
///
/// let filter = field("age").gte(18).and(field("status").eq("active"));
/// assert!(filter.apply(&doc! { age: 30, status: "active" }).unwrap());
/// assert!(!filter.apply(&doc! { age: 12, status: "active" }).unwrap());
/// ```
#[derive(Clone)]
pub struct Filter {
    inner: Arc<dyn FilterProvider>,
}

impl Filter {
    /// Creates a new filter from a filter provider implementation.
    pub fn new<T: FilterProvider + 'static>(inner: T) -> Self {
        Filter {
            inner: Arc::new(inner),
        }
    }

    /// Combines this filter with another using logical AND.
    ///
    /// Nested AND nodes are flattened so that the tree stays one level deep.
    pub fn and(&self, filter: Filter) -> Self {
        and(vec![self.clone(), filter])
    }
}

impl Display for Filter {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Filter{}", self.inner)
    }
}

impl Deref for Filter {
    type Target = Arc<dyn FilterProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Creates a filter that matches all documents.
pub fn all() -> Filter {
    Filter::new(AllFilter {})
}

/// AND-combines filters.
///
/// Match-all children are dropped and nested AND nodes are flattened. No
/// remaining children gives the match-all filter, a single one is returned
/// as is.
pub fn and(filters: Vec<Filter>) -> Filter {
    let mut flat = Vec::with_capacity(filters.len());
    for filter in filters {
        if is_all_filter(&filter) {
            continue;
        }
        match filter.logical_filters() {
            Ok(children) if filter.operator() == FilterOperator::And => flat.extend(children),
            _ => flat.push(filter),
        }
    }

    match flat.len() {
        0 => all(),
        1 => flat.remove(0),
        _ => Filter::new(AndFilter::new(flat)),
    }
}

pub fn is_all_filter(filter: &Filter) -> bool {
    filter.operator() == FilterOperator::All
}

/// Tests a resolved field value against a leaf predicate.
///
/// An array satisfies the predicate when the array as a whole does or when
/// any one of its elements does. A path through an array of documents
/// resolves to such an array, so `items.sku` matches an order if any item
/// carries that sku.
pub(crate) fn matches_value(value: &Value, predicate: impl Fn(&Value) -> bool) -> bool {
    if predicate(value) {
        return true;
    }
    match value {
        Value::Array(items) => items.iter().any(predicate),
        _ => false,
    }
}
