//! Marketplace data access.
//!
//! [`Repository`] is the single gateway every handler goes through. It
//! dispatches to the data source chosen at build time (see
//! [`DataSource::current`]) and records the marketplace log entries that
//! accompany each change.
//!
//! # Collections
//!
//! | Key | Contents |
//! |-----|----------|
//! | `blife_products` | `Product[]` |
//! | `blife_orders` | `Order[]` |
//! | `blife_users` | `Identity[]` |
//! | `blife_stores` | `StoreApplication[]` |
//! | `blife_reviews` | `Review[]`, newest first |
//! | `blife_logs` | `LogEntry[]`, newest first |

pub mod local;
pub mod remote;

use std::sync::Arc;

use thiserror::Error;

use blife_core::{
    CartItem, Identity, IdentityUpdate, LogEntry, LogEvent, LogSource, NewReview, Order, OrderId,
    OrderItemStatus, Product, ProductId, ProductInput, Review, StoreApplication,
    StoreCustomization, StoreId, StoreStatus, UserId,
};

pub use local::LocalRepository;
pub use remote::RemoteRepository;

use crate::storage::{KeyValueStore, StorageError};

/// Fixed storage keys.
pub mod keys {
    pub const PRODUCTS: &str = "blife_products";
    pub const ORDERS: &str = "blife_orders";
    pub const USERS: &str = "blife_users";
    pub const STORES: &str = "blife_stores";
    pub const REVIEWS: &str = "blife_reviews";
    pub const LOGS: &str = "blife_logs";

    /// Every collection key.
    pub const ALL: [&str; 6] = [PRODUCTS, ORDERS, USERS, STORES, REVIEWS, LOGS];
}

/// Repository operation errors.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying key-value store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A stored collection could not be parsed or serialized.
    #[error("Data corruption in {key}: {source}")]
    DataCorruption {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Entity not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The data source does not implement this operation.
    #[error("Operation not supported by this data source: {0}")]
    Unsupported(&'static str),
}

/// Which backend serves marketplace data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Collections in a key-value store owned by this process.
    LocalStorage,
    /// A remote backend API (stubbed).
    Api,
}

impl DataSource {
    /// The data source selected at build time by the `remote-api` feature.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(feature = "remote-api") {
            Self::Api
        } else {
            Self::LocalStorage
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LocalStorage => "LOCAL_STORAGE",
            Self::Api => "API",
        }
    }
}

/// Data access gateway.
#[derive(Debug)]
pub enum Repository {
    Local(LocalRepository),
    Remote(RemoteRepository),
}

/// Dispatch a call to whichever backend is active.
macro_rules! dispatch {
    ($self:ident.$method:ident($($arg:expr),*)) => {
        match $self {
            Self::Local(repo) => repo.$method($($arg),*).await,
            Self::Remote(repo) => repo.$method($($arg),*).await,
        }
    };
}

impl Repository {
    /// Build the repository for the compiled-in data source.
    ///
    /// `kv` is only used by the local data source.
    #[must_use]
    pub fn for_data_source(source: DataSource, kv: Arc<dyn KeyValueStore>) -> Self {
        match source {
            DataSource::LocalStorage => Self::Local(LocalRepository::new(kv)),
            DataSource::Api => Self::Remote(RemoteRepository::new()),
        }
    }

    /// Local repository over `kv`.
    #[must_use]
    pub fn local(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::Local(LocalRepository::new(kv))
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub async fn products(&self) -> Vec<Product> {
        dispatch!(self.products())
    }

    pub async fn product(&self, id: ProductId) -> Option<Product> {
        self.products().await.into_iter().find(|p| p.id == id)
    }

    pub async fn products_by_store(&self, store_id: &StoreId) -> Vec<Product> {
        self.products()
            .await
            .into_iter()
            .filter(|p| &p.store_id == store_id)
            .collect()
    }

    pub async fn add_product(&self, input: ProductInput) -> Product {
        let product = dispatch!(self.add_product(input));
        self.log_event(LogEvent::info(
            LogSource::Product,
            format!(
                "Product '{}' created for store {}.",
                product.name, product.store_id
            ),
        ))
        .await;
        product
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    pub async fn update_product(&self, product: Product) -> Result<Product, RepositoryError> {
        let product = dispatch!(self.update_product(product))?;
        self.log_event(LogEvent::info(
            LogSource::Product,
            format!("Product '{}' (ID: {}) updated.", product.name, product.id),
        ))
        .await;
        Ok(product)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    pub async fn delete_product(&self, id: ProductId) -> Result<Product, RepositoryError> {
        let product = dispatch!(self.delete_product(id))?;
        self.log_event(LogEvent::warn(
            LogSource::Product,
            format!("Product '{}' (ID: {}) deleted.", product.name, product.id),
        ))
        .await;
        Ok(product)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    pub async fn orders(&self) -> Vec<Order> {
        dispatch!(self.orders())
    }

    /// Place an order for `items`. All lines start `Processing`.
    pub async fn create_order(&self, items: Vec<CartItem>, user_id: &UserId) -> Order {
        let order = dispatch!(self.create_order(items, user_id));
        self.log_event(LogEvent::info(
            LogSource::Order,
            format!(
                "New order {} placed by user {} for {}.",
                order.id, order.user_id, order.total
            ),
        ))
        .await;
        order
    }

    pub async fn order(&self, id: &OrderId) -> Option<Order> {
        self.orders().await.into_iter().find(|o| &o.id == id)
    }

    /// A user's orders, newest first.
    pub async fn orders_by_user(&self, user_id: &UserId) -> Vec<Order> {
        let orders = self
            .orders()
            .await
            .into_iter()
            .filter(|o| &o.user_id == user_id)
            .collect();
        local::newest_first(orders)
    }

    /// Orders containing the store's products, trimmed to those lines,
    /// newest first.
    pub async fn orders_by_store(&self, store_id: &StoreId) -> Vec<Order> {
        let orders = self
            .orders()
            .await
            .iter()
            .filter_map(|o| o.for_store(store_id))
            .collect();
        local::newest_first(orders)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order or line does not exist.
    pub async fn update_order_item_status(
        &self,
        order_id: &OrderId,
        product_id: ProductId,
        status: OrderItemStatus,
    ) -> Result<Order, RepositoryError> {
        dispatch!(self.update_order_item_status(order_id, product_id, status))
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub async fn users(&self) -> Vec<Identity> {
        dispatch!(self.users())
    }

    pub async fn user(&self, id: &UserId) -> Option<Identity> {
        self.users().await.into_iter().find(|u| &u.id == id)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this ID.
    pub async fn update_user(
        &self,
        id: &UserId,
        update: &IdentityUpdate,
    ) -> Result<Identity, RepositoryError> {
        dispatch!(self.update_user(id, update))
    }

    /// Insert or replace the user-list entry for `identity`.
    pub async fn upsert_user(&self, identity: &Identity) {
        dispatch!(self.upsert_user(identity));
    }

    // =========================================================================
    // Stores
    // =========================================================================

    pub async fn store_applications(&self) -> Vec<StoreApplication> {
        dispatch!(self.store_applications())
    }

    pub async fn store(&self, id: &StoreId) -> Option<StoreApplication> {
        self.store_applications()
            .await
            .into_iter()
            .find(|s| &s.store_id == id)
    }

    pub async fn store_by_user(&self, user_id: &UserId) -> Option<StoreApplication> {
        self.store_applications()
            .await
            .into_iter()
            .find(|s| &s.user_id == user_id)
    }

    /// Submit a store application, replacing any earlier one by the user.
    pub async fn create_store_application(
        &self,
        user_id: &UserId,
        store_name: &str,
        store_description: &str,
    ) -> StoreApplication {
        dispatch!(self.create_store_application(user_id, store_name, store_description))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no store has this ID.
    pub async fn update_store_status(
        &self,
        store_id: &StoreId,
        status: StoreStatus,
    ) -> Result<StoreApplication, RepositoryError> {
        let store = dispatch!(self.update_store_status(store_id, status))?;
        self.log_event(LogEvent::info(
            LogSource::Store,
            format!(
                "Store '{}' ({}) status updated to {}.",
                store.store_name, store.store_id, store.status
            ),
        ))
        .await;
        Ok(store)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no store has this ID.
    pub async fn update_store_customization(
        &self,
        store_id: &StoreId,
        customization: StoreCustomization,
    ) -> Result<StoreApplication, RepositoryError> {
        let store = dispatch!(self.update_store_customization(store_id, customization))?;
        self.log_event(LogEvent::info(
            LogSource::Store,
            format!("Store ID {} customization updated.", store.store_id),
        ))
        .await;
        Ok(store)
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    pub async fn reviews(&self) -> Vec<Review> {
        dispatch!(self.reviews())
    }

    /// Reviews of one product, newest first.
    pub async fn reviews_for_product(&self, product_id: ProductId) -> Vec<Review> {
        let mut reviews: Vec<Review> = self
            .reviews()
            .await
            .into_iter()
            .filter(|r| r.product_id == product_id)
            .collect();
        reviews.sort_by(|a, b| b.date.cmp(&a.date));
        reviews
    }

    pub async fn add_review(&self, review: NewReview, author: &Identity) -> Review {
        dispatch!(self.add_review(review, author))
    }

    // =========================================================================
    // Logs
    // =========================================================================

    /// Marketplace log entries, newest first.
    pub async fn logs(&self) -> Vec<LogEntry> {
        dispatch!(self.logs())
    }

    pub async fn log_event(&self, event: LogEvent) -> LogEntry {
        dispatch!(self.log_event(event))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use blife_core::{CartItem, LogLevel, Price};

    use super::*;
    use crate::storage::MemoryKv;

    fn repo() -> Repository {
        Repository::local(Arc::new(MemoryKv::new()))
    }

    #[test]
    fn test_default_data_source_is_local() {
        #[cfg(not(feature = "remote-api"))]
        assert_eq!(DataSource::current(), DataSource::LocalStorage);
        #[cfg(feature = "remote-api")]
        assert_eq!(DataSource::current(), DataSource::Api);
    }

    #[tokio::test]
    async fn test_products_by_store() {
        let repo = repo();
        assert_eq!(
            repo.products_by_store(&StoreId::new("STORE-MOCK-123")).await.len(),
            6
        );
        assert!(repo
            .products_by_store(&StoreId::new("STORE-PENDING-456"))
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_create_order_logs_total() {
        let repo = repo();
        let products = repo.products().await;
        let items = products
            .iter()
            .take(2)
            .map(|p| CartItem {
                product: p.clone(),
                quantity: 1,
            })
            .collect();
        let order = repo.create_order(items, &UserId::new("user-9")).await;
        let logs = repo.logs().await;
        assert_eq!(
            logs[0].message,
            format!("New order {} placed by user user-9 for ฿2,740.", order.id)
        );
        assert_eq!(logs[0].source, LogSource::Order);
        assert_eq!(order.total, Price::baht(2740));
    }

    #[tokio::test]
    async fn test_delete_product_logs_warning() {
        let repo = repo();
        repo.delete_product(ProductId::new(3)).await.unwrap();
        let logs = repo.logs().await;
        assert_eq!(logs[0].level, LogLevel::Warn);
        assert_eq!(
            logs[0].message,
            "Product 'Cold Brew Coffee Beans' (ID: 3) deleted."
        );
    }

    #[tokio::test]
    async fn test_orders_by_store_trims_and_omits() {
        let repo = repo();
        let mock = repo.products().await.remove(0);
        let mut foreign = mock.clone();
        foreign.id = ProductId::new(99);
        foreign.store_id = StoreId::new("STORE-OTHER");

        let user = UserId::new("u");
        repo.create_order(
            vec![
                CartItem {
                    product: mock.clone(),
                    quantity: 1,
                },
                CartItem {
                    product: foreign.clone(),
                    quantity: 2,
                },
            ],
            &user,
        )
        .await;
        repo.create_order(
            vec![CartItem {
                product: foreign,
                quantity: 1,
            }],
            &user,
        )
        .await;

        let store_orders = repo.orders_by_store(&StoreId::new("STORE-MOCK-123")).await;
        assert_eq!(store_orders.len(), 1);
        assert_eq!(store_orders[0].items.len(), 1);
        assert_eq!(repo.orders_by_user(&user).await.len(), 2);
    }

    #[tokio::test]
    async fn test_store_status_update_logs() {
        let repo = repo();
        repo.update_store_status(&StoreId::new("STORE-PENDING-456"), StoreStatus::Approved)
            .await
            .unwrap();
        assert_eq!(
            repo.logs().await[0].message,
            "Store 'Green Goodness' (STORE-PENDING-456) status updated to APPROVED."
        );
    }

    #[tokio::test]
    async fn test_reviews_for_product_newest_first() {
        let repo = repo();
        let reviews = repo.reviews_for_product(ProductId::new(1)).await;
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].id.as_str(), "rev-2");
    }
}
