use doclens::common::SortOrder;
use doclens::envelope::{CollectionList, PageEnvelope};
use doclens::query::FilterSpec;
use doclens_int_test::test_util::{cleanup, create_seeded_context, run_test};
use serde_json::json;

#[test]
fn test_collection_list_envelope() {
    run_test(
        create_seeded_context,
        |ctx| {
            let list = CollectionList::new(ctx.accessor().list_collections()?);
            assert_eq!(
                serde_json::to_value(&list)?,
                json!({ "collections": ["empty", "orders", "people", "users"], "count": 4 })
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_page_envelope() {
    run_test(
        create_seeded_context,
        |ctx| {
            let page = ctx
                .accessor()
                .get_page("orders", 0, 2, Some("number"), SortOrder::Descending)?;
            let envelope = PageEnvelope::from_page("orders", page);
            let json = serde_json::to_value(&envelope)?;

            assert_eq!(json["collection"], "orders");
            assert_eq!(
                json["pagination"],
                json!({ "page": 0, "limit": 2, "total": 3, "totalPages": 2 })
            );
            assert_eq!(json["data"][0]["number"], 1003);
            assert_eq!(json["data"][0]["items"][0], json!({ "sku": "C-3", "qty": 1 }));
            assert_eq!(json["data"][1]["number"], 1002);
            assert!(json.get("searchCriteria").is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_search_envelope_echoes_criteria() {
    run_test(
        create_seeded_context,
        |ctx| {
            let criteria = FilterSpec::from_json(json!({ "total": { "$gte": 100 }, "customer": "*major" }))?;
            let page = ctx.accessor().search("orders", &criteria, 0, 10)?;
            let envelope = PageEnvelope::from_page("orders", page).with_search_criteria(criteria);
            let json = serde_json::to_value(&envelope)?;

            assert_eq!(json["pagination"]["total"], 1);
            assert_eq!(json["pagination"]["totalPages"], 1);
            assert_eq!(json["data"][0]["customer"], "Mary Major");
            assert_eq!(
                json["searchCriteria"],
                json!({ "total": { "$gte": 100 }, "customer": "*major" })
            );
            assert_eq!(
                serde_json::to_string(&json["searchCriteria"])?,
                r#"{"total":{"$gte":100},"customer":"*major"}"#
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_empty_page_envelope() {
    run_test(
        create_seeded_context,
        |ctx| {
            let page = ctx.accessor().get_page("empty", 3, 10, None, SortOrder::Ascending)?;
            let json = serde_json::to_value(PageEnvelope::from_page("empty", page))?;
            assert_eq!(json["data"], json!([]));
            assert_eq!(
                json["pagination"],
                json!({ "page": 3, "limit": 10, "total": 0, "totalPages": 0 })
            );
            Ok(())
        },
        cleanup,
    )
}
