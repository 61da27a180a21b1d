//! Product entity and cached payload shapes

use serde::{Deserialize, Serialize};

/// A catalog product. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub category: String,
}

impl Product {
    pub fn new(
        id: i32,
        name: impl Into<String>,
        price: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            category: category.into(),
        }
    }
}

/// Value stored in a cache entry: one product or a sequence of products
///
/// The serialized form is tagged so a single product can never be decoded
/// as a list (or the other way around).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ProductPayload {
    Single(Product),
    List(Vec<Product>),
}

impl ProductPayload {
    /// Returns the single product, or `None` for list payloads
    pub fn into_single(self) -> Option<Product> {
        match self {
            Self::Single(product) => Some(product),
            Self::List(_) => None,
        }
    }

    /// Returns the product list, or `None` for single payloads
    pub fn into_list(self) -> Option<Vec<Product>> {
        match self {
            Self::Single(_) => None,
            Self::List(products) => Some(products),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::List(products) => products.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Product> for ProductPayload {
    fn from(product: Product) -> Self {
        Self::Single(product)
    }
}

impl From<Vec<Product>> for ProductPayload {
    fn from(products: Vec<Product>) -> Self {
        Self::List(products)
    }
}
