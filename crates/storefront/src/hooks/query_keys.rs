//! Cache keys for product queries.
//!
//! Keys carry the request parameters so that each distinct request has its
//! own entry: `products:{limit}` and `product:{id}`.

use shopfront_core::{ProductId, QueryKey};

/// Root segment of list queries.
pub const PRODUCTS: &str = "products";
/// Root segment of single-product queries.
pub const PRODUCT: &str = "product";

/// Key for the product list with the given limit.
#[must_use]
pub fn products(limit: u32) -> QueryKey {
    QueryKey::new([PRODUCTS.to_string(), limit.to_string()])
}

/// Key for one product.
#[must_use]
pub fn product(id: ProductId) -> QueryKey {
    product_root().child(id.to_string())
}

/// Bare single-product key, used while the id is unknown.
#[must_use]
pub fn product_root() -> QueryKey {
    QueryKey::new([PRODUCT])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_include_parameters() {
        assert_eq!(products(10).to_string(), "products:10");
        assert_ne!(products(10), products(5));
        assert_eq!(product(ProductId::new(3)).to_string(), "product:3");
        assert_ne!(product(ProductId::new(3)), product(ProductId::new(4)));
    }

    #[test]
    fn test_product_keys_share_root() {
        assert!(product(ProductId::new(1)).starts_with(&product_root()));
        assert!(!products(10).starts_with(&product_root()));
    }
}
