/// Specifies the direction for sorting documents.
///
/// # Usage
/// Used with `order_by()` when reading a page of documents:
/// ```text
/// let options = order_by("age", SortOrder::Descending).skip(20).limit(10);
/// let docs = store.find("users", &all(), &options)?;
/// ```
///
/// Request layers usually receive the direction as text; [SortOrder::parse]
/// treats `"desc"` (any case) as descending and everything else as ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Sort in ascending order (smallest to largest, A-Z, oldest to newest)
    #[default]
    Ascending,
    /// Sort in descending order (largest to smallest, Z-A, newest to oldest)
    Descending,
}

impl SortOrder {
    pub fn parse(text: &str) -> SortOrder {
        if text.trim().eq_ignore_ascii_case("desc") {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        }
    }
}
