//! # Item Usecase
//!
//! Create, read, update, delete and summarize items.
//!
//! ## Update Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  update_item(ctx, id, input)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. repo.find_by_id ─── NoRows ──────────────► NotFound(id)            │
//! │       │                 (checked first: a bad body on a missing id     │
//! │       │                  is still NotFound)                            │
//! │       ▼                                                                 │
//! │  2. input.is_empty() ─────────────────────────► Validation(EmptyUpdate)│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. validate supplied fields only ────────────► Validation(..)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. merge: Set(v) overwrites, Unset keeps, updated_at = now            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  5. repo.update ── failure ───────────────────► Database / Cancelled   │
//! │       │          └ 0 rows (deleted meanwhile) ► NotFound(id)           │
//! │       ▼                                                                 │
//! │  6. merged Item                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no optimistic locking: two concurrent updates of the same item
//! both succeed and the last write wins.

use chrono::NaiveDate;
use tracing::{debug, info};

use vault_core::validation::{
    parse_purchase_date, validate_brand, validate_category, validate_name,
    validate_purchase_price, ValidationResult,
};
use vault_core::{
    timestamp_now, CategorySummary, CreateItemInput, Item, ItemError, ItemResult, Patch,
    UpdateItemInput, ValidationError,
};
use vault_db::{ItemRepository, RequestContext, Storage};

use crate::classify::classify;

/// Item operations over any [`Storage`].
///
/// ## Usage
/// ```rust,ignore
/// let usecase = ItemUsecase::new(db.items());
///
/// let item = usecase.create_item(&ctx, input).await?;
/// let summary = usecase.get_category_summary(&ctx).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemUsecase<S> {
    repo: ItemRepository<S>,
}

impl<S: Storage> ItemUsecase<S> {
    /// Creates a usecase over an item repository.
    pub fn new(repo: ItemRepository<S>) -> Self {
        ItemUsecase { repo }
    }

    /// Creates a usecase directly over a storage.
    pub fn from_storage(storage: S) -> Self {
        ItemUsecase::new(ItemRepository::new(storage))
    }

    /// Returns the repository.
    pub fn repository(&self) -> &ItemRepository<S> {
        &self.repo
    }

    /// Lists every item, ordered by id.
    pub async fn get_all_items(&self, ctx: &RequestContext) -> ItemResult<Vec<Item>> {
        self.repo.find_all(ctx).await.map_err(|e| classify(e, None))
    }

    /// Gets one item.
    ///
    /// ## Errors
    /// `NotFound` if no item has `id`.
    pub async fn get_item_by_id(&self, ctx: &RequestContext, id: i64) -> ItemResult<Item> {
        self.repo
            .find_by_id(ctx, id)
            .await
            .map_err(|e| classify(e, Some(id)))
    }

    /// Validates and stores a new item, then returns it as stored.
    ///
    /// Nothing reaches storage if validation fails.
    pub async fn create_item(
        &self,
        ctx: &RequestContext,
        input: CreateItemInput,
    ) -> ItemResult<Item> {
        let new_item = Item::new(
            input.name,
            input.category,
            input.brand,
            input.purchase_price,
            &input.purchase_date,
        )?;

        let id = self
            .repo
            .insert(ctx, &new_item)
            .await
            .map_err(|e| classify(e, None))?;

        info!(id = id, category = %new_item.category, "Item created");

        self.repo
            .find_by_id(ctx, id)
            .await
            .map_err(|e| classify(e, Some(id)))
    }

    /// Applies a partial update. See the module docs for the order of checks.
    pub async fn update_item(
        &self,
        ctx: &RequestContext,
        id: i64,
        input: UpdateItemInput,
    ) -> ItemResult<Item> {
        let current = self
            .repo
            .find_by_id(ctx, id)
            .await
            .map_err(|e| classify(e, Some(id)))?;

        let changes = ValidatedUpdate::try_from(input)?;
        let merged = changes.apply(current);

        let affected = self
            .repo
            .update(ctx, &merged)
            .await
            .map_err(|e| classify(e, Some(id)))?;

        if affected == 0 {
            debug!(id = id, "Item vanished before update");
            return Err(ItemError::NotFound(id));
        }

        info!(id = id, "Item updated");
        Ok(merged)
    }

    /// Deletes an item.
    ///
    /// ## Errors
    /// `NotFound` if no item has `id`, including when it was already deleted.
    pub async fn delete_item(&self, ctx: &RequestContext, id: i64) -> ItemResult<()> {
        self.repo
            .find_by_id(ctx, id)
            .await
            .map_err(|e| classify(e, Some(id)))?;

        let affected = self
            .repo
            .delete(ctx, id)
            .await
            .map_err(|e| classify(e, Some(id)))?;

        if affected == 0 {
            return Err(ItemError::NotFound(id));
        }

        info!(id = id, "Item deleted");
        Ok(())
    }

    /// Counts and sums items per category from a single read of all items.
    pub async fn get_category_summary(&self, ctx: &RequestContext) -> ItemResult<CategorySummary> {
        let items = self.get_all_items(ctx).await?;
        let summary = CategorySummary::from_items(&items);

        debug!(
            categories = summary.categories.len(),
            total_count = summary.total_count,
            "Category summary computed"
        );
        Ok(summary)
    }

    /// Number of stored items.
    pub async fn count_items(&self, ctx: &RequestContext) -> ItemResult<i64> {
        self.repo.count(ctx).await.map_err(|e| classify(e, None))
    }
}

// =============================================================================
// Validated Update
// =============================================================================

/// An update whose supplied fields all passed validation.
#[derive(Debug)]
struct ValidatedUpdate {
    name: Patch<String>,
    category: Patch<String>,
    brand: Patch<String>,
    purchase_price: Patch<i64>,
    purchase_date: Patch<NaiveDate>,
}

fn checked<T>(value: T, rule: impl FnOnce(&T) -> ValidationResult<()>) -> ValidationResult<T> {
    rule(&value)?;
    Ok(value)
}

impl TryFrom<UpdateItemInput> for ValidatedUpdate {
    type Error = ValidationError;

    fn try_from(input: UpdateItemInput) -> ValidationResult<Self> {
        if input.is_empty() {
            return Err(ValidationError::EmptyUpdate);
        }

        Ok(ValidatedUpdate {
            name: input.name.try_map(|v| checked(v, |v| validate_name(v)))?,
            category: input.category.try_map(|v| checked(v, |v| validate_category(v)))?,
            brand: input.brand.try_map(|v| checked(v, |v| validate_brand(v)))?,
            purchase_price: input
                .purchase_price
                .try_map(|v| checked(v, |v| validate_purchase_price(*v)))?,
            purchase_date: input.purchase_date.try_map(|v| parse_purchase_date(&v))?,
        })
    }
}

impl ValidatedUpdate {
    fn apply(self, current: Item) -> Item {
        Item {
            id: current.id,
            name: self.name.unwrap_or(current.name),
            category: self.category.unwrap_or(current.category),
            brand: self.brand.unwrap_or(current.brand),
            purchase_price: self.purchase_price.unwrap_or(current.purchase_price),
            purchase_date: self.purchase_date.unwrap_or(current.purchase_date),
            created_at: current.created_at,
            updated_at: timestamp_now().max(current.created_at),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use vault_db::{Database, DbConfig, ExecResult, Row, Rows, StorageError, StorageResult, Value};

    use super::*;

    // -------------------------------------------------------------------------
    // Test storage: records statements, optionally injects a fault
    // -------------------------------------------------------------------------

    #[derive(Debug, Clone, Copy)]
    enum Fault {
        /// Fail with `QueryFailed`.
        Error,
        /// Pretend the statement matched nothing.
        ZeroRows,
    }

    #[derive(Debug, Default)]
    struct Recorder {
        statements: Vec<String>,
        fault: Option<(&'static str, Fault)>,
    }

    #[derive(Debug, Clone)]
    struct RecordingStorage {
        inner: Database,
        recorder: Arc<Mutex<Recorder>>,
    }

    impl RecordingStorage {
        async fn new() -> Self {
            RecordingStorage {
                inner: Database::new(DbConfig::in_memory()).await.unwrap(),
                recorder: Arc::new(Mutex::new(Recorder::default())),
            }
        }

        /// Statements starting with `prefix` hit `fault` instead of SQLite.
        fn fail_on(&self, prefix: &'static str, fault: Fault) {
            self.recorder.lock().unwrap().fault = Some((prefix, fault));
        }

        fn statements(&self) -> Vec<String> {
            self.recorder.lock().unwrap().statements.clone()
        }

        fn writes(&self) -> usize {
            self.statements()
                .iter()
                .filter(|s| {
                    s.starts_with("INSERT") || s.starts_with("UPDATE") || s.starts_with("DELETE")
                })
                .count()
        }

        fn reset(&self) {
            self.recorder.lock().unwrap().statements.clear();
        }

        fn record(&self, sql: &str) -> Option<Fault> {
            let sql = sql.trim().to_string();
            let mut recorder = self.recorder.lock().unwrap();
            let fault = recorder
                .fault
                .filter(|(prefix, _)| sql.starts_with(prefix))
                .map(|(_, fault)| fault);
            recorder.statements.push(sql);
            fault
        }
    }

    #[async_trait]
    impl Storage for RecordingStorage {
        async fn execute(
            &self,
            ctx: &RequestContext,
            sql: &str,
            params: &[Value],
        ) -> StorageResult<ExecResult> {
            match self.record(sql) {
                Some(Fault::Error) => Err(StorageError::QueryFailed("disk I/O error".into())),
                Some(Fault::ZeroRows) => Ok(ExecResult::default()),
                None => self.inner.execute(ctx, sql, params).await,
            }
        }

        async fn query(
            &self,
            ctx: &RequestContext,
            sql: &str,
            params: &[Value],
        ) -> StorageResult<Rows> {
            match self.record(sql) {
                Some(Fault::Error) => Err(StorageError::QueryFailed("disk I/O error".into())),
                Some(Fault::ZeroRows) => Ok(Rows::default()),
                None => self.inner.query(ctx, sql, params).await,
            }
        }

        async fn query_row(
            &self,
            ctx: &RequestContext,
            sql: &str,
            params: &[Value],
        ) -> StorageResult<Row> {
            match self.record(sql) {
                Some(Fault::Error) => Err(StorageError::QueryFailed("disk I/O error".into())),
                Some(Fault::ZeroRows) => Err(StorageError::NoRows),
                None => self.inner.query_row(ctx, sql, params).await,
            }
        }
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    async fn setup() -> (ItemUsecase<RecordingStorage>, RecordingStorage, RequestContext) {
        let storage = RecordingStorage::new().await;
        (
            ItemUsecase::from_storage(storage.clone()),
            storage,
            RequestContext::background(),
        )
    }

    fn input(name: &str, category: &str, brand: &str, price: i64, date: &str) -> CreateItemInput {
        CreateItemInput {
            name: name.to_string(),
            category: category.to_string(),
            brand: brand.to_string(),
            purchase_price: price,
            purchase_date: date.to_string(),
        }
    }

    fn rolex() -> CreateItemInput {
        input("Submariner", "Watch", "ROLEX", 1_000_000, "2023-01-01")
    }

    // -------------------------------------------------------------------------
    // Create / Get
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_create_then_get_returns_same_item() {
        let (usecase, _, ctx) = setup().await;

        let created = usecase.create_item(&ctx, rolex()).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.name, "Submariner");
        assert_eq!(created.purchase_date.to_string(), "2023-01-01");
        assert_eq!(created.created_at, created.updated_at);

        let fetched = usecase.get_item_by_id(&ctx, created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_validation_happens_before_storage() {
        let (usecase, storage, ctx) = setup().await;
        storage.reset();

        let cases = [
            input("", "Watch", "ROLEX", 1, "2023-01-01"),
            input("Sub", "  ", "ROLEX", 1, "2023-01-01"),
            input("Sub", "Watch", "", 1, "2023-01-01"),
            input("Sub", "Watch", "ROLEX", -1, "2023-01-01"),
            input("Sub", "Watch", "ROLEX", 1, "2023-02-30"),
            input("Sub", "Watch", "ROLEX", 1, "01/02/2023"),
        ];
        for case in cases {
            let result = usecase.create_item(&ctx, case).await;
            assert!(matches!(result, Err(ItemError::Validation(_))), "{result:?}");
        }
        assert!(storage.statements().is_empty());
    }

    #[tokio::test]
    async fn test_price_zero_is_accepted() {
        let (usecase, _, ctx) = setup().await;
        let item = usecase
            .create_item(&ctx, input("Gift", "Bag", "Chanel", 0, "2023-05-05"))
            .await
            .unwrap();
        assert_eq!(item.purchase_price, 0);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let (usecase, _, ctx) = setup().await;
        assert_eq!(
            usecase.get_item_by_id(&ctx, 42).await,
            Err(ItemError::NotFound(42))
        );
    }

    #[tokio::test]
    async fn test_get_all_ordered_by_id() {
        let (usecase, _, ctx) = setup().await;
        assert!(usecase.get_all_items(&ctx).await.unwrap().is_empty());

        for name in ["b", "a", "c"] {
            usecase
                .create_item(&ctx, input(name, "Bag", "Celine", 1, "2023-01-01"))
                .await
                .unwrap();
        }

        let names: Vec<String> = usecase
            .get_all_items(&ctx)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(usecase.count_items(&ctx).await.unwrap(), 3);
    }

    // -------------------------------------------------------------------------
    // Update
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_partial_update_preserves_other_fields() {
        let (usecase, _, ctx) = setup().await;
        let original = usecase.create_item(&ctx, rolex()).await.unwrap();

        let updated = usecase
            .update_item(&ctx, original.id, UpdateItemInput::default().brand("Tudor"))
            .await
            .unwrap();

        assert_eq!(updated.brand, "Tudor");
        assert_eq!(updated.name, original.name);
        assert_eq!(updated.category, original.category);
        assert_eq!(updated.purchase_price, original.purchase_price);
        assert_eq!(updated.purchase_date, original.purchase_date);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at >= original.updated_at);

        let stored = usecase.get_item_by_id(&ctx, original.id).await.unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_update_every_field() {
        let (usecase, _, ctx) = setup().await;
        let original = usecase.create_item(&ctx, rolex()).await.unwrap();

        let change = UpdateItemInput::default()
            .name("Classic Flap")
            .category("Bag")
            .brand("Chanel")
            .purchase_price(0)
            .purchase_date("2024-02-29");
        let updated = usecase.update_item(&ctx, original.id, change).await.unwrap();

        assert_eq!(updated.name, "Classic Flap");
        assert_eq!(updated.category, "Bag");
        assert_eq!(updated.brand, "Chanel");
        assert_eq!(updated.purchase_price, 0);
        assert_eq!(updated.purchase_date.to_string(), "2024-02-29");
    }

    #[tokio::test]
    async fn test_empty_update_rejected() {
        let (usecase, storage, ctx) = setup().await;
        let item = usecase.create_item(&ctx, rolex()).await.unwrap();
        storage.reset();

        let result = usecase
            .update_item(&ctx, item.id, UpdateItemInput::default())
            .await;
        assert_eq!(
            result,
            Err(ItemError::Validation(ValidationError::EmptyUpdate))
        );
        assert_eq!(storage.writes(), 0);
    }

    #[tokio::test]
    async fn test_invalid_supplied_field_rejected() {
        let (usecase, storage, ctx) = setup().await;
        let item = usecase.create_item(&ctx, rolex()).await.unwrap();
        storage.reset();

        let cases = [
            UpdateItemInput::default().name(""),
            UpdateItemInput::default().brand("   "),
            UpdateItemInput::default().category(""),
            UpdateItemInput::default().purchase_price(-1),
            UpdateItemInput::default().purchase_date("2023-13-01"),
            // One bad field spoils an otherwise valid update
            UpdateItemInput::default().name("Fine").purchase_price(-5),
        ];
        for case in cases {
            let result = usecase.update_item(&ctx, item.id, case).await;
            assert!(matches!(result, Err(ItemError::Validation(_))), "{result:?}");
        }

        assert_eq!(storage.writes(), 0);
        assert_eq!(usecase.get_item_by_id(&ctx, item.id).await.unwrap(), item);
    }

    #[tokio::test]
    async fn test_update_missing_id_is_not_found_even_with_bad_body() {
        let (usecase, storage, ctx) = setup().await;

        assert_eq!(
            usecase
                .update_item(&ctx, 999, UpdateItemInput::default())
                .await,
            Err(ItemError::NotFound(999))
        );
        assert_eq!(
            usecase
                .update_item(&ctx, 999, UpdateItemInput::default().purchase_price(-1))
                .await,
            Err(ItemError::NotFound(999))
        );
        assert_eq!(storage.writes(), 0);
    }

    #[tokio::test]
    async fn test_update_row_vanished_is_not_found() {
        let (usecase, storage, ctx) = setup().await;
        let item = usecase.create_item(&ctx, rolex()).await.unwrap();
        storage.fail_on("UPDATE", Fault::ZeroRows);

        let result = usecase
            .update_item(&ctx, item.id, UpdateItemInput::default().name("x"))
            .await;
        assert_eq!(result, Err(ItemError::NotFound(item.id)));
    }

    #[tokio::test]
    async fn test_update_storage_failure_is_database() {
        let (usecase, storage, ctx) = setup().await;
        let item = usecase.create_item(&ctx, rolex()).await.unwrap();
        storage.fail_on("UPDATE", Fault::Error);

        let result = usecase
            .update_item(&ctx, item.id, UpdateItemInput::default().name("x"))
            .await;
        assert_eq!(result, Err(ItemError::Database));
    }

    // -------------------------------------------------------------------------
    // Delete
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_delete_twice() {
        let (usecase, _, ctx) = setup().await;
        let item = usecase.create_item(&ctx, rolex()).await.unwrap();

        usecase.delete_item(&ctx, item.id).await.unwrap();
        assert_eq!(
            usecase.get_item_by_id(&ctx, item.id).await,
            Err(ItemError::NotFound(item.id))
        );
        assert_eq!(
            usecase.delete_item(&ctx, item.id).await,
            Err(ItemError::NotFound(item.id))
        );
    }

    #[tokio::test]
    async fn test_delete_missing_never_writes() {
        let (usecase, storage, ctx) = setup().await;
        assert_eq!(usecase.delete_item(&ctx, 7).await, Err(ItemError::NotFound(7)));
        assert_eq!(storage.writes(), 0);
    }

    // -------------------------------------------------------------------------
    // Summary
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_empty_summary() {
        let (usecase, _, ctx) = setup().await;
        let summary = usecase.get_category_summary(&ctx).await.unwrap();
        assert!(summary.is_empty());
        assert_eq!(summary.total_count, 0);
        assert_eq!(summary.total_price, 0);
    }

    #[tokio::test]
    async fn test_watch_and_bag_scenario() {
        let (usecase, storage, ctx) = setup().await;

        usecase.create_item(&ctx, rolex()).await.unwrap();
        let omega = usecase
            .create_item(
                &ctx,
                input("Speedmaster", "Watch", "Omega", 800_000, "2023-03-15"),
            )
            .await
            .unwrap();
        usecase
            .create_item(&ctx, input("Classic Flap", "Bag", "Chanel", 300_000, "2022-11-20"))
            .await
            .unwrap();

        storage.reset();
        let summary = usecase.get_category_summary(&ctx).await.unwrap();

        // A single read backs the whole summary
        assert_eq!(storage.statements().len(), 1);

        let watch = summary.get("Watch").unwrap();
        assert_eq!(watch.count, 2);
        assert_eq!(watch.total_price, 1_800_000);
        let bag = summary.get("Bag").unwrap();
        assert_eq!(bag.count, 1);
        assert_eq!(bag.total_price, 300_000);
        assert_eq!(summary.total_count, 3);
        assert_eq!(summary.total_price, 2_100_000);

        usecase.delete_item(&ctx, omega.id).await.unwrap();
        let summary = usecase.get_category_summary(&ctx).await.unwrap();
        assert_eq!(summary.get("Watch").unwrap().total_price, 1_000_000);
    }

    #[tokio::test]
    async fn test_summary_storage_failure_is_database() {
        let (usecase, storage, ctx) = setup().await;
        storage.fail_on("SELECT", Fault::Error);

        assert_eq!(
            usecase.get_category_summary(&ctx).await,
            Err(ItemError::Database)
        );
        assert_eq!(usecase.get_item_by_id(&ctx, 1).await, Err(ItemError::Database));
    }

    // -------------------------------------------------------------------------
    // Cancellation
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_cancelled_context() {
        let (usecase, _, _) = setup().await;
        let (ctx, handle) = RequestContext::cancellable();
        handle.cancel();

        assert_eq!(usecase.get_all_items(&ctx).await, Err(ItemError::Cancelled));
        assert_eq!(
            usecase.create_item(&ctx, rolex()).await,
            Err(ItemError::Cancelled)
        );
    }

    #[tokio::test]
    async fn test_works_through_dyn_storage() {
        let storage: Arc<dyn Storage> = Arc::new(Database::new(DbConfig::in_memory()).await.unwrap());
        let usecase = ItemUsecase::from_storage(storage);
        let ctx = RequestContext::background();

        let item = usecase.create_item(&ctx, rolex()).await.unwrap();
        assert_eq!(usecase.get_item_by_id(&ctx, item.id).await.unwrap(), item);
    }
}
