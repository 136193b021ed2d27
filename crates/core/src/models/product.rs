//! Catalog products.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId, StoreId};

/// A product listed by an approved seller.
///
/// Cart lines and order items hold snapshots of this record; they never
/// reference the live catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub store_id: StoreId,
    pub name: String,
    /// Thai display name.
    #[serde(rename = "name_th")]
    pub name_th: String,
    pub price: Price,
    pub image_url: String,
    pub description: String,
}

/// Product fields submitted by the seller form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub store_id: StoreId,
    pub name: String,
    #[serde(rename = "name_th")]
    pub name_th: String,
    pub price: Price,
    pub image_url: String,
    pub description: String,
}

impl ProductInput {
    /// Attach an ID, producing a catalog product.
    #[must_use]
    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            store_id: self.store_id,
            name: self.name,
            name_th: self.name_th,
            price: self.price,
            image_url: self.image_url,
            description: self.description,
        }
    }
}

impl Product {
    /// Thumbnail URL for list views (the seed images are Unsplash URLs that
    /// accept sizing parameters).
    #[must_use]
    pub fn thumbnail_url(&self, size: u32) -> String {
        if self.image_url.contains('?') {
            format!("{}&w={size}&h={size}&fit=crop", self.image_url)
        } else {
            self.image_url.clone()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_keeps_thai_name_field() {
        let json = r#"{"id":3,"storeId":"STORE-MOCK-123","name":"Cold Brew Coffee Beans","name_th":"เมล็ดกาแฟสกัดเย็น","price":450,"imageUrl":"https://x?q=80","description":"Beans"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.name_th, "เมล็ดกาแฟสกัดเย็น");
        assert_eq!(product.price, Price::baht(450));

        let out = serde_json::to_value(&product).unwrap();
        assert!(out.get("name_th").is_some());
        assert!(out.get("storeId").is_some());
    }

    #[test]
    fn test_thumbnail_url() {
        let input = ProductInput {
            store_id: StoreId::new("S"),
            name: "Tea".into(),
            name_th: "ชา".into(),
            price: Price::baht(320),
            image_url: "https://img?q=80".into(),
            description: String::new(),
        };
        let product = input.with_id(ProductId::new(5));
        assert_eq!(product.thumbnail_url(64), "https://img?q=80&w=64&h=64&fit=crop");
    }
}
