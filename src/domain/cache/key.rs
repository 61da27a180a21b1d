//! Cache key construction for product queries

use std::fmt;

use serde::{Deserialize, Serialize};

/// A logical read against the product catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProductQuery {
    AllProducts,
    ProductById(i32),
    ProductsByCategory(String),
}

impl ProductQuery {
    pub fn shape(&self) -> QueryShape {
        match self {
            Self::AllProducts => QueryShape::AllProducts,
            Self::ProductById(_) => QueryShape::ProductById,
            Self::ProductsByCategory(_) => QueryShape::ProductsByCategory,
        }
    }
}

impl fmt::Display for ProductQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllProducts => write!(f, "AllProducts"),
            Self::ProductById(id) => write!(f, "ProductById({})", id),
            Self::ProductsByCategory(category) => write!(f, "ProductsByCategory({})", category),
        }
    }
}

/// Query shape without its parameters; selects the expiration policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryShape {
    AllProducts,
    ProductById,
    ProductsByCategory,
}

impl QueryShape {
    /// Token used as the first key segment after the namespace
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllProducts => "AllProducts",
            Self::ProductById => "Product",
            Self::ProductsByCategory => "ProductsByCategory",
        }
    }
}

/// Storage namespace, one per cache backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheNamespace {
    Local,
    Distributed,
}

impl CacheNamespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Distributed => "distributed",
        }
    }
}

impl fmt::Display for CacheNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds cache keys of the form `<namespace>:<shape>[:<param>]`
///
/// The namespace and shape tokens never contain the parameter, so two
/// different queries (or the same query in two namespaces) cannot produce
/// the same key. Parameters are appended verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheKeyBuilder {
    namespace: CacheNamespace,
}

impl CacheKeyBuilder {
    pub fn new(namespace: CacheNamespace) -> Self {
        Self { namespace }
    }

    pub fn namespace(&self) -> CacheNamespace {
        self.namespace
    }

    pub fn build(&self, query: &ProductQuery) -> String {
        let prefix = self.namespace.as_str();
        let shape = query.shape().as_str();

        match query {
            ProductQuery::AllProducts => format!("{}:{}", prefix, shape),
            ProductQuery::ProductById(id) => format!("{}:{}:{}", prefix, shape, id),
            ProductQuery::ProductsByCategory(category) => {
                format!("{}:{}:{}", prefix, shape, category)
            }
        }
    }
}
