//! The default marketplace dataset.
//!
//! Seeded into any collection that has never been written. Dates are relative
//! to the moment of seeding so the sample data always looks recent.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Identity, LogEntry, Order, Product, Review, StoreApplication};
use crate::types::{
    Email, Price, ProductId, ReviewId, SellerStatus, StoreId, StoreStatus, UserId, UserRole,
};

/// Every persisted collection at once.
///
/// Also the shape of operator fixture files; missing collections default to
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub products: Vec<Product>,
    pub users: Vec<Identity>,
    pub stores: Vec<StoreApplication>,
    pub reviews: Vec<Review>,
    pub orders: Vec<Order>,
    pub logs: Vec<LogEntry>,
}

impl Dataset {
    /// The sample marketplace: six products, four users, two stores, two
    /// reviews, and no orders or logs.
    #[must_use]
    pub fn defaults(now: DateTime<Utc>) -> Self {
        Self {
            products: default_products(),
            users: default_users(),
            stores: default_stores(now),
            reviews: default_reviews(now),
            orders: Vec::new(),
            logs: Vec::new(),
        }
    }
}

const IMAGE_BASE: &str = "https://images.unsplash.com/photo-";

#[must_use]
pub fn default_products() -> Vec<Product> {
    let store = StoreId::new("STORE-MOCK-123");
    let product = |id: i64, name: &str, name_th: &str, price: i64, photo: &str, description: &str| Product {
        id: ProductId::new(id),
        store_id: store.clone(),
        name: name.to_owned(),
        name_th: name_th.to_owned(),
        price: Price::baht(price),
        image_url: format!("{IMAGE_BASE}{photo}?q=80"),
        description: description.to_owned(),
    };

    vec![
        product(
            1,
            "Organic Whey Protein",
            "เวย์โปรตีน ออร์แกนิค",
            1890,
            "1579758629938-03607ccdb340",
            "Build lean muscle with our clean, 100% grass-fed whey protein. It's packed with 25g of protein per serving, low in sugar, and free from artificial sweeteners.",
        ),
        product(
            2,
            "Men's Daily Multivitamin",
            "วิตามินรวมสำหรับผู้ชาย",
            850,
            "1607620839355-7e17d7b34a17",
            "A complete daily multivitamin complex designed specifically for men. Supports energy levels, immune health, and muscle function.",
        ),
        product(
            3,
            "Cold Brew Coffee Beans",
            "เมล็ดกาแฟสกัดเย็น",
            450,
            "1599160539162-4b6a827c1f8a",
            "Specially selected Arabica beans, coarse-ground for a rich, smooth, and low-acid cold brew.",
        ),
        product(
            4,
            "Keto Protein Bars",
            "โปรตีนบาร์ คีโต",
            120,
            "1557844352-761f2565b576",
            "The perfect on-the-go snack for a ketogenic lifestyle. Low in net carbs, high in healthy fats and protein.",
        ),
        product(
            5,
            "Organic Green Tea",
            "ชาเขียวออร์แกนิค",
            320,
            "1627435601361-ec25f2b74c20",
            "Premium, hand-picked organic green tea leaves. Rich in antioxidants like EGCG, it helps boost metabolism.",
        ),
        product(
            6,
            "Trail Mix Nuts & Seeds",
            "ถั่วและเมล็ดพืชรวม",
            250,
            "1610422343103-6670b036a13d",
            "A satisfying and heart-healthy blend of raw almonds, walnuts, pumpkin seeds, and sunflower seeds.",
        ),
    ]
}

fn user(id: &str, email: &str, role: UserRole, status: SellerStatus, store: Option<&str>) -> Option<Identity> {
    Some(Identity {
        id: UserId::new(id),
        email: Email::parse(email).ok()?,
        role,
        seller_status: status,
        store_id: store.map(StoreId::new),
    })
}

#[must_use]
pub fn default_users() -> Vec<Identity> {
    [
        user(
            "user-1678886400001",
            "seller.approved@example.com",
            UserRole::Seller,
            SellerStatus::Approved,
            Some("STORE-MOCK-123"),
        ),
        user(
            "user-1678886400002",
            "seller.pending@example.com",
            UserRole::Customer,
            SellerStatus::Pending,
            Some("STORE-PENDING-456"),
        ),
        user(
            "user-1678886400003",
            "customer@example.com",
            UserRole::Customer,
            SellerStatus::None,
            None,
        ),
        user(
            "ADMIN-USER-001",
            "admin@example.com",
            UserRole::Admin,
            SellerStatus::None,
            None,
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[must_use]
pub fn default_stores(now: DateTime<Utc>) -> Vec<StoreApplication> {
    vec![
        StoreApplication {
            store_id: StoreId::new("STORE-MOCK-123"),
            user_id: UserId::new("user-1678886400001"),
            store_name: "Healthy Habits Co.".to_owned(),
            store_description: "Your one-stop shop for organic and healthy products.".to_owned(),
            status: StoreStatus::Approved,
            submitted_at: now - Duration::days(10),
            banner_image_url: Some(format!("{IMAGE_BASE}1542838132-92c53300491e?q=80&w=1920")),
            profile_image_url: Some(
                "https://api.dicebear.com/8.x/initials/svg?seed=Healthy%20Habits".to_owned(),
            ),
            theme_color: Some("#10B981".to_owned()),
        },
        StoreApplication {
            store_id: StoreId::new("STORE-PENDING-456"),
            user_id: UserId::new("user-1678886400002"),
            store_name: "Green Goodness".to_owned(),
            store_description: "Selling fresh organic produce.".to_owned(),
            status: StoreStatus::Pending,
            submitted_at: now - Duration::days(1),
            banner_image_url: Some(format!("{IMAGE_BASE}1516214124259-011a8a287136?q=80&w=1920")),
            profile_image_url: Some(
                "https://api.dicebear.com/8.x/initials/svg?seed=Green%20Goodness".to_owned(),
            ),
            theme_color: Some("#34D399".to_owned()),
        },
    ]
}

#[must_use]
pub fn default_reviews(now: DateTime<Utc>) -> Vec<Review> {
    vec![
        Review {
            id: ReviewId::new("rev-1"),
            product_id: ProductId::new(1),
            user_id: UserId::new("user-1678886400003"),
            user_name: "customer@example.com".to_owned(),
            rating: 5,
            comment: "This is the best whey protein I've ever used! Mixes well and tastes great."
                .to_owned(),
            date: now - Duration::days(3),
        },
        Review {
            id: ReviewId::new("rev-2"),
            product_id: ProductId::new(1),
            user_id: UserId::new("user-1678886400004"),
            user_name: "jane.doe@example.com".to_owned(),
            rating: 4,
            comment: "Good quality protein, but a little on the sweet side for me. Still, a solid product."
                .to_owned(),
            date: now - Duration::days(1),
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_counts() {
        let data = Dataset::defaults(Utc::now());
        assert_eq!(data.products.len(), 6);
        assert_eq!(data.users.len(), 4);
        assert_eq!(data.stores.len(), 2);
        assert_eq!(data.reviews.len(), 2);
        assert!(data.orders.is_empty());
        assert!(data.logs.is_empty());
    }

    #[test]
    fn test_default_products_belong_to_mock_store() {
        assert!(default_products()
            .iter()
            .all(|p| p.store_id.as_str() == "STORE-MOCK-123"));
    }

    #[test]
    fn test_fixture_with_missing_collections() {
        let data: Dataset = serde_json::from_str(r#"{"orders": []}"#).unwrap();
        assert!(data.products.is_empty());
    }
}
