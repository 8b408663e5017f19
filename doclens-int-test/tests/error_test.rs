use doclens::accessor::CollectionAccessor;
use doclens::common::SortOrder;
use doclens::envelope::ErrorEnvelope;
use doclens::errors::ErrorKind;
use doclens::query::FilterSpec;
use doclens::store::memory::InMemoryStore;
use doclens_int_test::test_util::{
    cleanup, create_seeded_context, init_logger, run_test, FailingStore, TestContext,
};
use serde_json::json;

const FAULT: &str = "connection reset by peer";

fn create_failing_context() -> doclens::errors::DocLensResult<TestContext> {
    init_logger();
    let accessor = CollectionAccessor::builder()
        .store(FailingStore::new(&["users"], FAULT))
        .build()?;
    Ok(TestContext::new(InMemoryStore::new(), accessor))
}

#[test]
fn test_every_read_reports_missing_collection() {
    run_test(
        create_seeded_context,
        |ctx| {
            let accessor = ctx.accessor();
            let kinds = vec![
                accessor
                    .get_page("ghost", 0, 10, None, SortOrder::Ascending)
                    .map(|_| ()),
                accessor.get_all("ghost").map(|_| ()),
                accessor.search("ghost", &FilterSpec::new(), 0, 10).map(|_| ()),
                accessor.get_schema("ghost", 10).map(|_| ()),
                accessor.get_distinct_values("ghost", "status").map(|_| ()),
                accessor.collection_stats("ghost").map(|_| ()),
            ];

            for result in kinds {
                let err = result.unwrap_err();
                assert_eq!(err.kind(), &ErrorKind::CollectionNotFound);
                assert_eq!(err.message(), "Collection not found: ghost");
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_missing_collection_checked_before_criteria() {
    run_test(
        create_seeded_context,
        |ctx| {
            let criteria = FilterSpec::from_json(json!({ "age": { "$ne": 1 } }))?;
            let err = ctx.accessor().search("ghost", &criteria, 0, 10).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::CollectionNotFound);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_missing_collection_checked_before_field_name() {
    run_test(
        create_seeded_context,
        |ctx| {
            let err = ctx.accessor().get_distinct_values("ghost", "").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::CollectionNotFound);

            let err = ctx.accessor().get_distinct_values("users", "").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ValidationError);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_store_failure_is_access_failure() {
    run_test(
        create_failing_context,
        |ctx| {
            let accessor = ctx.accessor();
            let results = vec![
                accessor
                    .get_page("users", 0, 10, None, SortOrder::Ascending)
                    .map(|_| ()),
                accessor.get_all("users").map(|_| ()),
                accessor.search("users", &FilterSpec::new(), 0, 10).map(|_| ()),
                accessor.get_schema("users", 10).map(|_| ()),
                accessor.get_distinct_values("users", "status").map(|_| ()),
                accessor.collection_stats("users").map(|_| ()),
            ];

            for result in results {
                let err = result.unwrap_err();
                assert_eq!(err.kind(), &ErrorKind::AccessFailure);
                assert_eq!(err.message(), FAULT);
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_failing_store_still_lists_and_checks() {
    run_test(
        create_failing_context,
        |ctx| {
            let accessor = ctx.accessor();
            assert_eq!(accessor.list_collections()?.len(), 1);
            assert!(accessor.collection_exists("users")?);

            let err = accessor.get_all("orders").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::CollectionNotFound);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_error_envelopes() {
    run_test(
        create_failing_context,
        |ctx| {
            let accessor = ctx.accessor();

            let err = accessor.get_all("users").unwrap_err();
            let envelope = ErrorEnvelope::from_error("Failed to fetch data", "users", &err);
            assert_eq!(
                serde_json::to_value(&envelope)?,
                json!({ "error": "Failed to fetch data", "message": FAULT })
            );

            let err = accessor.get_all("ghost").unwrap_err();
            let envelope = ErrorEnvelope::from_error("Failed to fetch data", "ghost", &err);
            assert_eq!(
                serde_json::to_value(&envelope)?,
                json!({ "error": "Collection not found", "collection": "ghost" })
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_invalid_configuration() {
    init_logger();

    let err = CollectionAccessor::builder().build().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidOperation);

    let err = CollectionAccessor::builder()
        .store(InMemoryStore::new())
        .default_page_limit(0)
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ValidationError);

    let err = CollectionAccessor::builder()
        .store(InMemoryStore::new())
        .default_page_limit(500)
        .max_page_limit(200)
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ValidationError);

    let err = CollectionAccessor::builder()
        .store(InMemoryStore::new())
        .max_schema_depth(0)
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ValidationError);
}

#[test]
fn test_failure_debug_output_carries_message() {
    run_test(
        create_failing_context,
        |ctx| {
            let err = ctx.accessor().collection_stats("users").unwrap_err();
            assert_eq!(err.to_string(), FAULT);
            assert!(format!("{:?}", err).starts_with(FAULT));
            Ok(())
        },
        cleanup,
    )
}
