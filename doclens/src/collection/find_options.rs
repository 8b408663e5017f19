use crate::common::SortOrder;

/// Ordered list of `(field, direction)` pairs used to sort a read.
///
/// The first pair is the primary key, later pairs break ties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortableFields {
    sorting_order: Vec<(String, SortOrder)>,
}

impl SortableFields {
    pub fn new() -> SortableFields {
        SortableFields {
            sorting_order: Vec::new(),
        }
    }

    #[inline]
    pub fn add_field(self, field_name: String) -> SortableFields {
        self.add_sorted_field(field_name, SortOrder::Ascending)
    }

    #[inline]
    pub fn add_sorted_field(mut self, field_name: String, sort_order: SortOrder) -> SortableFields {
        self.sorting_order.push((field_name, sort_order));
        self
    }

    #[inline]
    pub fn sorting_order(&self) -> &[(String, SortOrder)] {
        &self.sorting_order
    }

    pub fn is_empty(&self) -> bool {
        self.sorting_order.is_empty()
    }
}

/// Options for controlling find operations on a store.
///
/// `FindOptions` carries the sort, skip and limit a store applies after
/// filtering. Sort field names are passed to the store uninterpreted.
///
/// # Examples
///
/// ```rust
/// use doclens::collection::{order_by, FindOptions};
/// use doclens::common::SortOrder;
///
/// let options = FindOptions::new()
///     .sort_by("age".to_string(), SortOrder::Descending)
///     .skip(10)
///     .limit(20);
/// assert_eq!(options.skip, Some(10));
///
/// let by_name = order_by("name", SortOrder::Ascending);
/// assert!(by_name.sort_by.is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub sort_by: Option<SortableFields>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

/// Creates `FindOptions` with sorting by a field.
pub fn order_by(field_name: &str, sort_order: SortOrder) -> FindOptions {
    FindOptions::new().sort_by(field_name.to_string(), sort_order)
}

/// Creates `FindOptions` that skips a number of results.
pub fn skip_by(skip: u64) -> FindOptions {
    FindOptions::new().skip(skip)
}

/// Creates `FindOptions` that limits the number of results.
pub fn limit_to(limit: u64) -> FindOptions {
    FindOptions::new().limit(limit)
}

impl FindOptions {
    /// Creates a new `FindOptions`: no sort, no skip, no limit.
    pub fn new() -> FindOptions {
        FindOptions {
            sort_by: None,
            skip: None,
            limit: None,
        }
    }

    /// Sets the number of documents to skip.
    pub fn skip(mut self, skip: u64) -> FindOptions {
        self.skip = Some(skip);
        self
    }

    /// Sets the maximum number of documents to return.
    pub fn limit(mut self, limit: u64) -> FindOptions {
        self.limit = Some(limit);
        self
    }

    pub fn sort_by(mut self, field_name: String, sort_order: SortOrder) -> FindOptions {
        let fields = self.sort_by.unwrap_or_default();
        self.sort_by = Some(fields.add_sorted_field(field_name, sort_order));
        self
    }
}
