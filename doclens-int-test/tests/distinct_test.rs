use doclens::common::Value;
use doclens::envelope::DistinctEnvelope;
use doclens::errors::ErrorKind;
use doclens_int_test::test_util::{cleanup, create_seeded_context, run_test};
use serde_json::json;

#[test]
fn test_distinct_scalar_values_in_first_seen_order() {
    run_test(
        create_seeded_context,
        |ctx| {
            let statuses = ctx.accessor().get_distinct_values("users", "status")?;
            assert_eq!(
                statuses,
                vec![
                    Value::from("active"),
                    Value::from("pending"),
                    Value::from("inactive"),
                ]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_distinct_flattens_arrays() {
    run_test(
        create_seeded_context,
        |ctx| {
            let tags = ctx.accessor().get_distinct_values("users", "tags")?;
            assert_eq!(
                tags,
                vec![Value::from("admin"), Value::from("ops"), Value::from("dev")]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_distinct_through_array_of_documents() {
    run_test(
        create_seeded_context,
        |ctx| {
            let skus = ctx.accessor().get_distinct_values("orders", "items.sku")?;
            assert_eq!(
                skus,
                vec![Value::from("A-1"), Value::from("B-7"), Value::from("C-3")]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_distinct_embedded_field() {
    run_test(
        create_seeded_context,
        |ctx| {
            let cities = ctx.accessor().get_distinct_values("users", "address.city")?;
            assert_eq!(
                cities,
                vec![Value::from("Paris"), Value::from("Lyon"), Value::from("Nice")]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_distinct_has_no_duplicates() {
    run_test(
        create_seeded_context,
        |ctx| {
            let ids = ctx.accessor().get_distinct_values("people", "id")?;
            assert_eq!(ids.len(), 250);

            let ages = ctx.accessor().get_distinct_values("people", "age")?;
            assert!(!ages.is_empty());
            assert!(ages.len() <= 72);
            for (i, age) in ages.iter().enumerate() {
                assert!(!ages[i + 1..].contains(age));
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_distinct_keeps_explicit_null() {
    run_test(
        create_seeded_context,
        |ctx| {
            let emails = ctx.accessor().get_distinct_values("users", "email")?;
            assert_eq!(emails.len(), 3);
            assert!(emails.contains(&Value::Null));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_distinct_missing_field_is_empty() {
    run_test(
        create_seeded_context,
        |ctx| {
            let accessor = ctx.accessor();
            assert!(accessor.get_distinct_values("users", "nickname")?.is_empty());
            assert!(accessor.get_distinct_values("empty", "status")?.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_distinct_empty_field_name() {
    run_test(
        create_seeded_context,
        |ctx| {
            let err = ctx.accessor().get_distinct_values("users", "").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ValidationError);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_distinct_envelope() {
    run_test(
        create_seeded_context,
        |ctx| {
            let values = ctx.accessor().get_distinct_values("users", "status")?;
            let envelope = DistinctEnvelope::new("users", "status", values);
            assert_eq!(
                serde_json::to_value(&envelope)?,
                json!({
                    "collection": "users",
                    "field": "status",
                    "values": ["active", "pending", "inactive"],
                    "count": 3
                })
            );
            Ok(())
        },
        cleanup,
    )
}
