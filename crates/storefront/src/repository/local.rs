//! Local data source: every collection is a JSON document in a
//! [`KeyValueStore`].
//!
//! Each operation reads the whole collection, changes it, and writes it back.
//! A single async mutex serializes those read-modify-write cycles within the
//! process. There is no cross-collection transaction: an order and its log
//! entry are two separate writes.
//!
//! Storage and parse failures are logged and never surface to readers: a
//! failed read yields the collection's default value. Writers never store
//! that fallback: a change to a collection that cannot be read is logged and
//! dropped, or returned as an error when the operation has a `Result`.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use blife_core::fixtures::{self, Dataset};
use blife_core::{
    CartItem, Identity, IdentityUpdate, LogEntry, LogEvent, MillisClock, NewReview, Order, OrderId,
    OrderItemStatus, Product, ProductId, ProductInput, Review, StoreApplication,
    StoreCustomization, StoreId, StoreStatus, UserId, sort_newest_first,
};

use super::{RepositoryError, keys};
use crate::storage::{KeyValueStore, StorageError};

/// Repository over a key-value store.
pub struct LocalRepository {
    kv: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
    clock: MillisClock,
}

impl std::fmt::Debug for LocalRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalRepository").finish_non_exhaustive()
    }
}

impl LocalRepository {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            write_lock: Mutex::new(()),
            clock: MillisClock::new(),
        }
    }

    // =========================================================================
    // Collection I/O
    // =========================================================================

    /// Run a storage call on tokio's blocking pool. [`FileKv`] does plain
    /// file I/O, which must stay off the async worker threads.
    ///
    /// [`FileKv`]: crate::storage::FileKv
    async fn with_kv<R, F>(&self, call: F) -> Result<R, StorageError>
    where
        R: Send + 'static,
        F: FnOnce(&dyn KeyValueStore) -> Result<R, StorageError> + Send + 'static,
    {
        let kv = Arc::clone(&self.kv);
        tokio::task::spawn_blocking(move || call(kv.as_ref()))
            .await
            .map_err(|e| StorageError::TaskFailed(e.to_string()))?
    }

    /// Parse a stored collection. `Ok(None)` when the key was never written.
    async fn try_load<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<Vec<T>>, RepositoryError> {
        let owned = key.to_owned();
        let raw = self.with_kv(move |kv| kv.get(&owned)).await?;
        parse_collection(key, raw)
    }

    /// Load a collection, seeding `default` on first read.
    async fn load<T, F>(&self, key: &str, default: F) -> Vec<T>
    where
        T: DeserializeOwned + Serialize,
        F: FnOnce() -> Vec<T>,
    {
        match self.try_load(key).await {
            Ok(Some(items)) => items,
            Ok(None) => {
                let items = default();
                self.save(key, &items).await;
                items
            }
            Err(e) => {
                tracing::error!(key, error = %e, "Failed to read collection");
                default()
            }
        }
    }

    /// Load a collection that is about to be written back.
    ///
    /// A missing key yields `default`; unreadable data is an error so the
    /// caller cannot replace it with the fallback.
    async fn load_for_update<T, F>(&self, key: &str, default: F) -> Result<Vec<T>, RepositoryError>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Vec<T>,
    {
        Ok(self.try_load(key).await?.unwrap_or_else(default))
    }

    /// Apply `change` to a collection and write it back. Skipped, with an
    /// error log, when the stored collection cannot be read.
    async fn update_collection<T, F, G>(&self, key: &str, default: F, change: G)
    where
        T: DeserializeOwned + Serialize,
        F: FnOnce() -> Vec<T>,
        G: FnOnce(&mut Vec<T>),
    {
        match self.load_for_update(key, default).await {
            Ok(mut items) => {
                change(&mut items);
                self.save(key, &items).await;
            }
            Err(e) => {
                tracing::error!(key, error = %e, "Refusing to overwrite unreadable collection");
            }
        }
    }

    async fn try_save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), RepositoryError> {
        let raw = serde_json::to_string(items).map_err(|source| RepositoryError::DataCorruption {
            key: key.to_string(),
            source,
        })?;
        let owned = key.to_owned();
        self.with_kv(move |kv| kv.set(&owned, &raw)).await?;
        Ok(())
    }

    async fn save<T: Serialize>(&self, key: &str, items: &[T]) {
        if let Err(e) = self.try_save(key, items).await {
            tracing::error!(key, error = %e, "Failed to write collection");
        }
    }

    async fn load_products(&self) -> Vec<Product> {
        self.load(keys::PRODUCTS, fixtures::default_products).await
    }

    async fn load_orders(&self) -> Vec<Order> {
        self.load(keys::ORDERS, Vec::new).await
    }

    async fn load_users(&self) -> Vec<Identity> {
        self.load(keys::USERS, fixtures::default_users).await
    }

    async fn load_stores(&self) -> Vec<StoreApplication> {
        self.load(keys::STORES, || fixtures::default_stores(Utc::now()))
            .await
    }

    async fn load_reviews(&self) -> Vec<Review> {
        self.load(keys::REVIEWS, || fixtures::default_reviews(Utc::now()))
            .await
    }

    async fn load_logs(&self) -> Vec<LogEntry> {
        self.load(keys::LOGS, Vec::new).await
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub async fn products(&self) -> Vec<Product> {
        self.load_products().await
    }

    pub async fn add_product(&self, input: ProductInput) -> Product {
        let _guard = self.write_lock.lock().await;
        let product = input.with_id(ProductId::new(self.clock.next()));
        self.update_collection(keys::PRODUCTS, fixtures::default_products, |products| {
            products.push(product.clone());
        })
        .await;
        product
    }

    pub async fn update_product(&self, product: Product) -> Result<Product, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut products = self
            .load_for_update(keys::PRODUCTS, fixtures::default_products)
            .await?;
        let slot = products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| RepositoryError::NotFound(format!("product {}", product.id)))?;
        *slot = product.clone();
        self.save(keys::PRODUCTS, &products).await;
        Ok(product)
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<Product, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut products = self
            .load_for_update(keys::PRODUCTS, fixtures::default_products)
            .await?;
        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("product {id}")))?;
        let removed = products.remove(index);
        self.save(keys::PRODUCTS, &products).await;
        Ok(removed)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    pub async fn orders(&self) -> Vec<Order> {
        self.load_orders().await
    }

    pub async fn create_order(&self, items: Vec<CartItem>, user_id: &UserId) -> Order {
        let _guard = self.write_lock.lock().await;
        let order = Order::place(items, user_id.clone(), self.clock.next(), Utc::now());
        self.update_collection(keys::ORDERS, Vec::new, |orders| orders.push(order.clone()))
            .await;
        order
    }

    pub async fn update_order_item_status(
        &self,
        order_id: &OrderId,
        product_id: ProductId,
        status: OrderItemStatus,
    ) -> Result<Order, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut orders: Vec<Order> = self.load_for_update(keys::ORDERS, Vec::new).await?;
        let order = orders
            .iter_mut()
            .find(|o| &o.id == order_id)
            .ok_or_else(|| RepositoryError::NotFound(format!("order {order_id}")))?;
        if !order.set_item_status(product_id, status) {
            return Err(RepositoryError::NotFound(format!(
                "product {product_id} in order {order_id}"
            )));
        }
        let updated = order.clone();
        self.save(keys::ORDERS, &orders).await;
        Ok(updated)
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub async fn users(&self) -> Vec<Identity> {
        self.load_users().await
    }

    pub async fn update_user(
        &self,
        id: &UserId,
        update: &IdentityUpdate,
    ) -> Result<Identity, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.load_for_update(keys::USERS, fixtures::default_users).await?;
        let user = users
            .iter_mut()
            .find(|u| &u.id == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("user {id}")))?;
        *user = user.with_update(update);
        let updated = user.clone();
        self.save(keys::USERS, &users).await;
        Ok(updated)
    }

    pub async fn upsert_user(&self, identity: &Identity) {
        let _guard = self.write_lock.lock().await;
        self.update_collection(
            keys::USERS,
            fixtures::default_users,
            |users: &mut Vec<Identity>| match users.iter_mut().find(|u| u.id == identity.id) {
                Some(existing) => *existing = identity.clone(),
                None => users.push(identity.clone()),
            },
        )
        .await;
    }

    // =========================================================================
    // Stores
    // =========================================================================

    pub async fn store_applications(&self) -> Vec<StoreApplication> {
        self.load_stores().await
    }

    pub async fn create_store_application(
        &self,
        user_id: &UserId,
        store_name: &str,
        store_description: &str,
    ) -> StoreApplication {
        let _guard = self.write_lock.lock().await;
        let application = StoreApplication::submit(
            user_id.clone(),
            store_name,
            store_description,
            self.clock.next(),
            Utc::now(),
        );
        self.update_collection(
            keys::STORES,
            || fixtures::default_stores(Utc::now()),
            |stores: &mut Vec<StoreApplication>| {
                stores.retain(|s| &s.user_id != user_id);
                stores.push(application.clone());
            },
        )
        .await;
        application
    }

    pub async fn update_store_status(
        &self,
        store_id: &StoreId,
        status: StoreStatus,
    ) -> Result<StoreApplication, RepositoryError> {
        self.modify_store(store_id, |store| store.status = status)
            .await
    }

    pub async fn update_store_customization(
        &self,
        store_id: &StoreId,
        customization: StoreCustomization,
    ) -> Result<StoreApplication, RepositoryError> {
        self.modify_store(store_id, move |store| store.customize(customization))
            .await
    }

    async fn modify_store<F>(
        &self,
        store_id: &StoreId,
        change: F,
    ) -> Result<StoreApplication, RepositoryError>
    where
        F: FnOnce(&mut StoreApplication),
    {
        let _guard = self.write_lock.lock().await;
        let mut stores =
            self.load_for_update(keys::STORES, || fixtures::default_stores(Utc::now()))
                .await?;
        let store = stores
            .iter_mut()
            .find(|s| &s.store_id == store_id)
            .ok_or_else(|| RepositoryError::NotFound(format!("store {store_id}")))?;
        change(store);
        let updated = store.clone();
        self.save(keys::STORES, &stores).await;
        Ok(updated)
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    pub async fn reviews(&self) -> Vec<Review> {
        self.load_reviews().await
    }

    pub async fn add_review(&self, review: NewReview, author: &Identity) -> Review {
        let _guard = self.write_lock.lock().await;
        let review = review.into_review(author, self.clock.next(), Utc::now());
        self.update_collection(
            keys::REVIEWS,
            || fixtures::default_reviews(Utc::now()),
            |reviews| reviews.insert(0, review.clone()),
        )
        .await;
        review
    }

    // =========================================================================
    // Logs
    // =========================================================================

    pub async fn logs(&self) -> Vec<LogEntry> {
        self.load_logs().await
    }

    pub async fn log_event(&self, event: LogEvent) -> LogEntry {
        let _guard = self.write_lock.lock().await;
        let entry = event.into_entry(self.clock.next(), Utc::now());
        self.update_collection(keys::LOGS, Vec::new, |logs| logs.insert(0, entry.clone()))
            .await;
        entry
    }

    // =========================================================================
    // Operator commands
    // =========================================================================

    /// Overwrite every collection with `dataset`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if any collection cannot be written.
    pub async fn import(&self, dataset: &Dataset) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        self.try_save(keys::PRODUCTS, &dataset.products).await?;
        self.try_save(keys::USERS, &dataset.users).await?;
        self.try_save(keys::STORES, &dataset.stores).await?;
        self.try_save(keys::REVIEWS, &dataset.reviews).await?;
        self.try_save(keys::ORDERS, &dataset.orders).await?;
        self.try_save(keys::LOGS, &dataset.logs).await?;
        Ok(())
    }

    /// Remove every collection so the next read reseeds the defaults.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a key cannot be removed.
    pub async fn clear(&self) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        self.with_kv(|kv| keys::ALL.iter().try_for_each(|key| kv.remove(key)))
            .await?;
        Ok(())
    }

    /// Read the logs without seeding, failing on unreadable data.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the collection cannot be read or parsed.
    pub fn read_logs(&self) -> Result<Vec<LogEntry>, RepositoryError> {
        let raw = self.kv.get(keys::LOGS)?;
        Ok(parse_collection(keys::LOGS, raw)?.unwrap_or_default())
    }
}

fn parse_collection<T: DeserializeOwned>(
    key: &str,
    raw: Option<String>,
) -> Result<Option<Vec<T>>, RepositoryError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| RepositoryError::DataCorruption {
            key: key.to_string(),
            source,
        })
}

/// Orders newest first.
pub(super) fn newest_first(mut orders: Vec<Order>) -> Vec<Order> {
    sort_newest_first(&mut orders);
    orders
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use blife_core::{Email, Price, UserRole};

    use super::*;
    use crate::storage::{FileKv, MemoryKv};

    fn repo() -> LocalRepository {
        LocalRepository::new(Arc::new(MemoryKv::new()))
    }

    fn input(name: &str, price: i64) -> ProductInput {
        ProductInput {
            store_id: StoreId::new("STORE-MOCK-123"),
            name: name.to_string(),
            name_th: String::new(),
            price: Price::baht(price),
            image_url: String::new(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_first_read_seeds_defaults() {
        let kv = Arc::new(MemoryKv::new());
        let repo = LocalRepository::new(kv.clone());
        assert_eq!(repo.products().await.len(), 6);
        assert_eq!(repo.users().await.len(), 4);
        assert_eq!(repo.store_applications().await.len(), 2);
        assert_eq!(repo.reviews().await.len(), 2);
        assert!(repo.orders().await.is_empty());
        assert!(kv.get(keys::PRODUCTS).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_corrupt_collection_falls_back_to_default() {
        let kv = Arc::new(MemoryKv::new());
        kv.set(keys::PRODUCTS, "{not json").unwrap();
        let repo = LocalRepository::new(kv.clone());
        assert_eq!(repo.products().await.len(), 6);
        // The corrupt document is left for an operator to inspect.
        assert_eq!(kv.get(keys::PRODUCTS).unwrap().as_deref(), Some("{not json"));
    }

    #[tokio::test]
    async fn test_writes_leave_corrupt_collection_alone() {
        let kv = Arc::new(MemoryKv::new());
        kv.set(keys::PRODUCTS, "{not json").unwrap();
        kv.set(keys::LOGS, "[{").unwrap();
        let repo = LocalRepository::new(kv.clone());

        repo.add_product(input("Kombucha", 95)).await;
        let fixture = fixtures::default_products().remove(0);
        assert!(matches!(
            repo.update_product(fixture.clone()).await,
            Err(RepositoryError::DataCorruption { .. })
        ));
        assert!(matches!(
            repo.delete_product(fixture.id).await,
            Err(RepositoryError::DataCorruption { .. })
        ));
        repo.log_event(LogEvent::info(blife_core::LogSource::Product, "added"))
            .await;

        assert_eq!(kv.get(keys::PRODUCTS).unwrap().as_deref(), Some("{not json"));
        assert_eq!(kv.get(keys::LOGS).unwrap().as_deref(), Some("[{"));
    }

    #[tokio::test]
    async fn test_oversized_price_never_reaches_the_catalog() {
        let repo = repo();
        let kept = repo.add_product(input("Kept", 10)).await;
        let mut huge = input("Huge", 0);
        huge.price = Price::parse_lenient("79228162514264337593543950335");
        repo.add_product(huge).await;
        repo.add_product(input("After", 20)).await;

        let names: Vec<String> = repo.products().await.into_iter().map(|p| p.name).collect();
        assert_eq!(names.len(), 9);
        for name in ["Kept", "Huge", "After"] {
            assert!(names.iter().any(|n| n == name), "{name}");
        }
        assert!(repo.products().await.iter().any(|p| p.id == kept.id));
    }

    #[tokio::test]
    async fn test_product_crud() {
        let repo = repo();
        let added = repo.add_product(input("Kombucha", 95)).await;
        assert_eq!(repo.products().await.len(), 7);

        let mut edited = added.clone();
        edited.price = Price::baht(99);
        repo.update_product(edited).await.unwrap();
        let stored = repo.products().await;
        assert_eq!(stored.iter().find(|p| p.id == added.id).unwrap().price, Price::baht(99));

        let removed = repo.delete_product(added.id).await.unwrap();
        assert_eq!(removed.name, "Kombucha");
        assert!(matches!(
            repo.delete_product(added.id).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_product_ids_are_unique() {
        let repo = repo();
        let a = repo.add_product(input("A", 1)).await;
        let b = repo.add_product(input("B", 1)).await;
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_create_order_and_update_item_status() {
        let repo = repo();
        let products = repo.products().await;
        let items = vec![
            CartItem {
                product: products[0].clone(),
                quantity: 1,
            },
            CartItem {
                product: products[1].clone(),
                quantity: 1,
            },
        ];
        let order = repo.create_order(items, &UserId::new("user-1")).await;
        assert_eq!(order.total, Price::baht(2740));

        let updated = repo
            .update_order_item_status(&order.id, products[1].id, OrderItemStatus::Shipped)
            .await
            .unwrap();
        assert_eq!(updated.items[1].status, OrderItemStatus::Shipped);
        assert_eq!(repo.orders().await[0].items[1].status, OrderItemStatus::Shipped);
    }

    #[tokio::test]
    async fn test_store_application_replaces_previous() {
        let repo = repo();
        let user = UserId::new("user-1678886400002");
        let app = repo.create_store_application(&user, "Fresh Farm", "Veg").await;
        let stores = repo.store_applications().await;
        assert_eq!(stores.len(), 2);
        assert!(stores.iter().all(|s| s.store_name != "Green Goodness"));
        assert_eq!(app.status, StoreStatus::Pending);
    }

    #[tokio::test]
    async fn test_upsert_and_update_user() {
        let repo = repo();
        let identity = Identity::mock_login(
            Email::parse("new@example.com").unwrap(),
            UserRole::Customer,
            42,
        );
        repo.upsert_user(&identity).await;
        repo.upsert_user(&identity).await;
        assert_eq!(repo.users().await.len(), 5);

        let updated = repo
            .update_user(&identity.id, &IdentityUpdate::role(UserRole::Seller))
            .await
            .unwrap();
        assert_eq!(updated.role, UserRole::Seller);
        assert!(matches!(
            repo.update_user(&UserId::new("ghost"), &IdentityUpdate::default()).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_logs_and_reviews_are_prepended() {
        let repo = repo();
        repo.log_event(LogEvent::info(blife_core::LogSource::General, "first")).await;
        repo.log_event(LogEvent::info(blife_core::LogSource::General, "second")).await;
        let logs = repo.logs().await;
        assert_eq!(logs[0].message, "second");

        let author = Identity::mock_login(
            Email::parse("customer@example.com").unwrap(),
            UserRole::Customer,
            1,
        );
        let review = NewReview {
            product_id: ProductId::new(2),
            rating: 4,
            comment: "Nice".into(),
        };
        repo.add_review(review, &author).await;
        assert_eq!(repo.reviews().await[0].product_id, ProductId::new(2));
    }

    #[tokio::test]
    async fn test_import_and_clear_on_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let repo = LocalRepository::new(Arc::new(FileKv::open(dir.path()).unwrap()));
        repo.import(&Dataset::defaults(Utc::now())).await.unwrap();
        assert!(dir.path().join("blife_products.json").exists());

        repo.clear().await.unwrap();
        assert!(!dir.path().join("blife_products.json").exists());
        assert!(repo.read_logs().unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_writes_on_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Arc::new(LocalRepository::new(Arc::new(
            FileKv::open(dir.path()).unwrap(),
        )));

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.add_product(input(&format!("Batch {i}"), 10)).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let reopened = LocalRepository::new(Arc::new(FileKv::open(dir.path()).unwrap()));
        assert_eq!(reopened.products().await.len(), 6 + 8);
    }
}
