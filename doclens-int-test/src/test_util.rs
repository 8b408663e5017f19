use std::collections::BTreeSet;
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
use std::sync::Once;

use chrono::{DateTime, TimeZone, Utc};
use doclens::accessor::CollectionAccessor;
use doclens::collection::{Document, FindOptions};
use doclens::common::Value;
use doclens::doc;
use doclens::errors::{DocLensError, DocLensResult};
use doclens::filter::Filter;
use doclens::store::memory::InMemoryStore;
use doclens::store::DocumentStoreProvider;
use fake::faker::chrono::en::DateTimeBetween;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;

static LOGGER: Once = Once::new();

/// Installs the test logger once per test binary.
pub fn init_logger() {
    LOGGER.call_once(|| {
        let _ = colog::default_builder()
            .filter_level(log::LevelFilter::Warn)
            .is_test(true)
            .try_init();
    });
}

/// Runs `test` on the context created by `before`, then `after`.
///
/// `after` runs even when the test fails or panics. A failure is reported
/// with the error's debug output, which includes its backtrace.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> DocLensResult<()>,
    B: Fn() -> DocLensResult<TestContext>,
    A: Fn(TestContext) -> DocLensResult<()>,
{
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let outcome = catch_unwind(AssertUnwindSafe(|| test(ctx.clone())));
    let after_result = after(ctx);

    match outcome {
        Ok(Ok(())) => {
            if let Err(e) = after_result {
                panic!("After run failed: {:?}", e);
            }
        }
        Ok(Err(e)) => panic!("Test failed: {:?}", e),
        Err(panic) => resume_unwind(panic),
    }
}

#[derive(Clone)]
pub struct TestContext {
    id: String,
    store: InMemoryStore,
    accessor: CollectionAccessor,
}

impl TestContext {
    pub fn new(store: InMemoryStore, accessor: CollectionAccessor) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            store,
            accessor,
        }
    }

    /// Unique per context, for naming collections that must not collide.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn store(&self) -> InMemoryStore {
        self.store.clone()
    }

    pub fn accessor(&self) -> CollectionAccessor {
        self.accessor.clone()
    }
}

/// An empty store behind a default accessor.
pub fn create_test_context() -> DocLensResult<TestContext> {
    init_logger();
    let store = InMemoryStore::new();
    let accessor = CollectionAccessor::builder().store(store.clone()).build()?;
    Ok(TestContext::new(store, accessor))
}

/// A store seeded with `users` (see [create_test_users]), `orders`, 250
/// generated `people` and an `empty` collection.
pub fn create_seeded_context() -> DocLensResult<TestContext> {
    let ctx = create_test_context()?;
    insert_test_documents(&ctx.store())?;
    Ok(ctx)
}

/// Like [create_seeded_context] with operator checking relaxed.
pub fn create_lenient_context() -> DocLensResult<TestContext> {
    init_logger();
    let store = InMemoryStore::new();
    insert_test_documents(&store)?;
    let accessor = CollectionAccessor::builder()
        .store(store.clone())
        .strict_operators(false)
        .build()?;
    Ok(TestContext::new(store, accessor))
}

pub fn cleanup(ctx: TestContext) -> DocLensResult<()> {
    let store = ctx.store();
    let names: BTreeSet<String> = store.collection_names()?;
    for name in names {
        store.drop_collection(&name);
    }
    Ok(())
}

pub fn insert_test_documents(store: &InMemoryStore) -> DocLensResult<()> {
    store.insert_many("users", create_test_users())?;
    store.insert_many("orders", create_test_orders())?;
    store.insert_many("people", create_fake_people(250))?;
    store.create_collection("empty")?;
    Ok(())
}

pub fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

pub fn create_test_users() -> Vec<Document> {
    vec![
        doc! {
            name: "John Doe",
            age: 41,
            status: "active",
            email: "john@example.com",
            address: { city: "Paris", zip: "75001" },
            tags: ["admin", "ops"],
            joined: (date(2019, 3, 14)),
        },
        doc! {
            name: "Jo",
            age: 17,
            status: "pending",
            address: { city: "Lyon", zip: "69001" },
            tags: [],
            joined: (date(2023, 11, 2)),
        },
        doc! {
            name: "jim",
            age: 29,
            status: "active",
            email: "jim@example.org",
            address: { city: "Paris", zip: "75011" },
            tags: ["dev"],
            joined: (date(2021, 7, 30)),
        },
        doc! {
            name: "Jane Roe",
            age: 35,
            status: "inactive",
            email: (Value::Null),
            tags: ["dev", "ops"],
            joined: (date(2020, 1, 5)),
        },
        doc! {
            name: "Mary Major",
            age: 62,
            status: "active",
            address: { city: "Nice", zip: "06000", geo: { lat: 43.7, lon: 7.26 } },
            joined: (date(2018, 9, 9)),
        },
    ]
}

pub fn create_test_orders() -> Vec<Document> {
    vec![
        doc! {
            number: 1001,
            customer: "John Doe",
            total: 120.5,
            items: [{ sku: "A-1", qty: 2 }, { sku: "B-7", qty: 1 }],
        },
        doc! {
            number: 1002,
            customer: "jim",
            total: 35.0,
            items: [{ sku: "B-7", qty: 4 }],
        },
        doc! {
            number: 1003,
            customer: "Mary Major",
            total: 980.0,
            items: [{ sku: "C-3", qty: 1 }, { sku: "A-1", qty: 1 }],
            rush: true,
        },
    ]
}

/// Generated people: `seq` runs from 0 in insertion order, the rest is fake.
pub fn create_fake_people(count: usize) -> Vec<Document> {
    let from = date(1950, 1, 1);
    let to = date(2005, 12, 31);
    (0..count)
        .map(|seq| {
            let name: String = Name().fake();
            let email: String = SafeEmail().fake();
            let age: i32 = (18..90).fake();
            let born: DateTime<Utc> = DateTimeBetween(from, to).fake();
            let id: uuid::Uuid = fake::uuid::UUIDv4.fake();
            doc! {
                seq: (seq as i64),
                id: (id.to_string()),
                name: name,
                email: email,
                age: age,
                born: born,
            }
        })
        .collect()
}

pub fn is_sorted<T: Ord>(iterable: impl IntoIterator<Item = T>, ascending: bool) -> bool {
    let mut iter = iterable.into_iter();
    if let Some(mut prev) = iter.next() {
        for current in iter {
            if ascending && prev > current {
                return false;
            }
            if !ascending && prev < current {
                return false;
            }
            prev = current;
        }
    }
    true
}

/// A backend whose reads all fail the way a lost connection would.
///
/// Collections listed in `names` report as existing.
pub struct FailingStore {
    names: BTreeSet<String>,
    message: String,
}

impl FailingStore {
    pub fn new(names: &[&str], message: &str) -> Self {
        FailingStore {
            names: names.iter().map(|name| name.to_string()).collect(),
            message: message.to_string(),
        }
    }

    fn fault(&self) -> DocLensError {
        DocLensError::access_failure(&self.message)
    }
}

impl DocumentStoreProvider for FailingStore {
    fn collection_names(&self) -> DocLensResult<BTreeSet<String>> {
        Ok(self.names.clone())
    }

    fn has_collection(&self, name: &str) -> DocLensResult<bool> {
        Ok(self.names.contains(name))
    }

    fn count(&self, _name: &str, _filter: &Filter) -> DocLensResult<u64> {
        Err(self.fault())
    }

    fn find(
        &self,
        _name: &str,
        _filter: &Filter,
        _find_options: &FindOptions,
    ) -> DocLensResult<Vec<Document>> {
        Err(self.fault())
    }

    fn distinct(&self, _name: &str, _field: &str) -> DocLensResult<Vec<Value>> {
        Err(self.fault())
    }
}
