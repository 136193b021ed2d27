//! Remote API data source.
//!
//! Placeholder for a backend service. No calls are made: every operation logs
//! that it is not implemented. Reads return empty collections and creations
//! return the entity that would have been sent, so page flows still complete.

use chrono::Utc;

use blife_core::{
    CartItem, Identity, IdentityUpdate, LogEntry, LogEvent, LogLevel, MillisClock, NewReview,
    Order, OrderId, OrderItemStatus, Product, ProductId, ProductInput, Review, StoreApplication,
    StoreCustomization, StoreId, StoreStatus, UserId,
};

use super::RepositoryError;

fn not_implemented(operation: &str) {
    tracing::warn!("API mode: {operation}() is not implemented.");
}

/// Repository stub for the remote API.
#[derive(Debug, Default)]
pub struct RemoteRepository {
    clock: MillisClock,
}

impl RemoteRepository {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clock: MillisClock::new(),
        }
    }

    pub async fn products(&self) -> Vec<Product> {
        not_implemented("getProducts");
        Vec::new()
    }

    pub async fn add_product(&self, input: ProductInput) -> Product {
        not_implemented("addProduct");
        input.with_id(ProductId::new(self.clock.next()))
    }

    pub async fn update_product(&self, _product: Product) -> Result<Product, RepositoryError> {
        not_implemented("updateProduct");
        Err(RepositoryError::Unsupported("updateProduct"))
    }

    pub async fn delete_product(&self, _id: ProductId) -> Result<Product, RepositoryError> {
        not_implemented("deleteProduct");
        Err(RepositoryError::Unsupported("deleteProduct"))
    }

    pub async fn orders(&self) -> Vec<Order> {
        not_implemented("getOrders");
        Vec::new()
    }

    pub async fn create_order(&self, items: Vec<CartItem>, user_id: &UserId) -> Order {
        not_implemented("createOrder");
        Order::place(items, user_id.clone(), self.clock.next(), Utc::now())
    }

    pub async fn update_order_item_status(
        &self,
        _order_id: &OrderId,
        _product_id: ProductId,
        _status: OrderItemStatus,
    ) -> Result<Order, RepositoryError> {
        not_implemented("updateOrderItemStatus");
        Err(RepositoryError::Unsupported("updateOrderItemStatus"))
    }

    pub async fn users(&self) -> Vec<Identity> {
        not_implemented("getUsers");
        Vec::new()
    }

    pub async fn update_user(
        &self,
        _id: &UserId,
        _update: &IdentityUpdate,
    ) -> Result<Identity, RepositoryError> {
        not_implemented("updateUser");
        Err(RepositoryError::Unsupported("updateUser"))
    }

    pub async fn upsert_user(&self, _identity: &Identity) {
        not_implemented("upsertUser");
    }

    pub async fn store_applications(&self) -> Vec<StoreApplication> {
        not_implemented("getStoreApplications");
        Vec::new()
    }

    pub async fn create_store_application(
        &self,
        user_id: &UserId,
        store_name: &str,
        store_description: &str,
    ) -> StoreApplication {
        not_implemented("createStoreApplication");
        StoreApplication::submit(
            user_id.clone(),
            store_name,
            store_description,
            self.clock.next(),
            Utc::now(),
        )
    }

    pub async fn update_store_status(
        &self,
        _store_id: &StoreId,
        _status: StoreStatus,
    ) -> Result<StoreApplication, RepositoryError> {
        not_implemented("updateStoreApplicationStatus");
        Err(RepositoryError::Unsupported("updateStoreApplicationStatus"))
    }

    pub async fn update_store_customization(
        &self,
        _store_id: &StoreId,
        _customization: StoreCustomization,
    ) -> Result<StoreApplication, RepositoryError> {
        not_implemented("updateStoreCustomization");
        Err(RepositoryError::Unsupported("updateStoreCustomization"))
    }

    pub async fn reviews(&self) -> Vec<Review> {
        not_implemented("getReviews");
        Vec::new()
    }

    pub async fn add_review(&self, review: NewReview, author: &Identity) -> Review {
        not_implemented("addReview");
        review.into_review(author, self.clock.next(), Utc::now())
    }

    pub async fn logs(&self) -> Vec<LogEntry> {
        not_implemented("getLogs");
        Vec::new()
    }

    pub async fn log_event(&self, event: LogEvent) -> LogEntry {
        not_implemented("logEvent");
        match event.level {
            LogLevel::Info => tracing::info!(source = %event.source, "{}", event.message),
            LogLevel::Warn => tracing::warn!(source = %event.source, "{}", event.message),
            LogLevel::Error => tracing::error!(source = %event.source, "{}", event.message),
        }
        event.into_entry(self.clock.next(), Utc::now())
    }
}
