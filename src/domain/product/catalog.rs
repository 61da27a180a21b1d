//! Product catalog - the authoritative, slow data source

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use super::Product;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Read-only access to the product store
///
/// Implementations carry no caching logic of their own.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetches every product
    async fn fetch_all(&self) -> Result<Vec<Product>, DomainError>;

    /// Fetches a product by ID, `None` when the ID is unknown
    async fn fetch_by_id(&self, id: i32) -> Result<Option<Product>, DomainError>;

    /// Fetches all products in a category (exact, case-sensitive match)
    async fn fetch_by_category(&self, category: &str) -> Result<Vec<Product>, DomainError>;
}

/// Artificial latency applied to each catalog operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogLatency {
    pub fetch_all: Duration,
    pub fetch_by_id: Duration,
    pub fetch_by_category: Duration,
}

impl Default for CatalogLatency {
    fn default() -> Self {
        Self {
            fetch_all: Duration::from_millis(1000),
            fetch_by_id: Duration::from_millis(300),
            fetch_by_category: Duration::from_millis(700),
        }
    }
}

impl CatalogLatency {
    /// No artificial delay
    pub fn none() -> Self {
        Self {
            fetch_all: Duration::ZERO,
            fetch_by_id: Duration::ZERO,
            fetch_by_category: Duration::ZERO,
        }
    }
}

/// Catalog backed by an injected product list, simulating a slow database
#[derive(Debug)]
pub struct InMemoryProductCatalog {
    products: Vec<Product>,
    latency: CatalogLatency,
    fetch_count: AtomicU64,
}

impl InMemoryProductCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            latency: CatalogLatency::default(),
            fetch_count: AtomicU64::new(0),
        }
    }

    /// Catalog holding the sample product set
    pub fn seeded() -> Self {
        Self::new(default_products())
    }

    pub fn with_latency(mut self, latency: CatalogLatency) -> Self {
        self.latency = latency;
        self
    }

    /// Number of fetches served since creation or the last reset
    pub fn fetch_count(&self) -> u64 {
        self.fetch_count.load(Ordering::SeqCst)
    }

    pub fn reset_fetch_count(&self) {
        self.fetch_count.store(0, Ordering::SeqCst);
    }

    async fn simulate_latency(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProductCatalog for InMemoryProductCatalog {
    async fn fetch_all(&self) -> Result<Vec<Product>, DomainError> {
        self.simulate_latency(self.latency.fetch_all).await;
        info!(operation = "fetch_all", "Database hit");

        Ok(self.products.clone())
    }

    async fn fetch_by_id(&self, id: i32) -> Result<Option<Product>, DomainError> {
        self.simulate_latency(self.latency.fetch_by_id).await;
        info!(operation = "fetch_by_id", id, "Database hit");

        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }

    async fn fetch_by_category(&self, category: &str) -> Result<Vec<Product>, DomainError> {
        self.simulate_latency(self.latency.fetch_by_category).await;
        info!(operation = "fetch_by_category", category, "Database hit");

        Ok(self
            .products
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect())
    }
}

/// The sample product set
pub fn default_products() -> Vec<Product> {
    vec![
        Product::new(1, "Laptop", 1200.0, "Electronics"),
        Product::new(2, "Smartphone", 800.0, "Electronics"),
        Product::new(3, "Headphones", 200.0, "Electronics"),
        Product::new(4, "T-Shirt", 25.0, "Clothing"),
        Product::new(5, "Jeans", 50.0, "Clothing"),
        Product::new(6, "Coffee Maker", 150.0, "Home"),
        Product::new(7, "Blender", 80.0, "Home"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant_catalog() -> InMemoryProductCatalog {
        InMemoryProductCatalog::seeded().with_latency(CatalogLatency::none())
    }

    #[tokio::test]
    async fn test_fetch_all() {
        let catalog = instant_catalog();

        let products = catalog.fetch_all().await.unwrap();
        assert_eq!(products.len(), 7);
        assert_eq!(catalog.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_by_id() {
        let catalog = instant_catalog();

        let product = catalog.fetch_by_id(1).await.unwrap();
        assert_eq!(
            product,
            Some(Product::new(1, "Laptop", 1200.0, "Electronics"))
        );

        let missing = catalog.fetch_by_id(999).await.unwrap();
        assert!(missing.is_none());
        assert_eq!(catalog.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_fetch_by_category() {
        let catalog = instant_catalog();

        let home = catalog.fetch_by_category("Home").await.unwrap();
        let names: Vec<&str> = home.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Coffee Maker", "Blender"]);

        let none = catalog.fetch_by_category("home").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_latency() {
        let catalog = InMemoryProductCatalog::seeded();
        let start = tokio::time::Instant::now();

        catalog.fetch_by_id(2).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_injected_products() {
        let catalog = InMemoryProductCatalog::new(vec![Product::new(42, "Desk", 300.0, "Office")])
            .with_latency(CatalogLatency::none());

        let products = catalog.fetch_all().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, 42);

        catalog.reset_fetch_count();
        assert_eq!(catalog.fetch_count(), 0);
    }
}
