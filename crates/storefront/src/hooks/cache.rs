//! Cached value types for product queries.

use shopfront_core::Product;

/// Value stored in the product query cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
}

impl CacheValue {
    #[must_use]
    pub fn into_product(self) -> Option<Product> {
        match self {
            Self::Product(product) => Some(*product),
            Self::Products(_) => None,
        }
    }

    #[must_use]
    pub fn into_products(self) -> Option<Vec<Product>> {
        match self {
            Self::Products(products) => Some(products),
            Self::Product(_) => None,
        }
    }
}

impl From<Product> for CacheValue {
    fn from(product: Product) -> Self {
        Self::Product(Box::new(product))
    }
}

impl From<Vec<Product>> for CacheValue {
    fn from(products: Vec<Product>) -> Self {
        Self::Products(products)
    }
}
