//! Product records as served by the upstream catalog API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductId;

/// A catalog product.
///
/// Immutable once fetched. `price` accepts either a JSON number or a numeric
/// string since both shapes appear in the wild, and is always written back
/// as a JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    pub category: String,
    pub description: String,
    /// Absolute URL of the product image.
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

/// Aggregate customer rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Average score, 0 to 5.
    pub rate: f64,
    /// Number of ratings contributing to `rate`.
    pub count: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_numeric_price() {
        let json = r#"{
            "id": 1,
            "title": "Fjallraven Backpack",
            "price": 109.95,
            "category": "men's clothing",
            "description": "Your perfect pack",
            "image": "https://example.com/81fPKd-2AYL.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price.to_string(), "109.95");
        assert_eq!(product.rating.unwrap().count, 120);
    }

    #[test]
    fn test_deserialize_string_price_without_rating() {
        let json = r#"{
            "id": 2,
            "title": "Shirt",
            "price": "20",
            "category": "clothing",
            "description": "Cotton",
            "image": "https://example.com/shirt.jpg"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Decimal::from(20));
        assert!(product.rating.is_none());
    }

    #[test]
    fn test_integer_price_displays_without_fraction() {
        let json = r#"{"id":3,"title":"Mug","price":20,"category":"home","description":"","image":""}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price.to_string(), "20");
    }

    #[test]
    fn test_price_serializes_as_number() {
        let json = r#"{"id":5,"title":"Hat","price":"15.5","category":"","description":"","image":""}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        let value = serde_json::to_value(&product).unwrap();
        assert!(value["price"].is_number());
        assert_eq!(value["price"], 15.5);

        let back: Product = serde_json::from_value(value).unwrap();
        assert_eq!(back.price, product.price);
    }

    #[test]
    fn test_missing_title_is_rejected() {
        let json = r#"{"id":4,"price":1,"category":"","description":"","image":""}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }
}
