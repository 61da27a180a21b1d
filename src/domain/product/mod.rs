//! Product domain - catalog entities and the slow data source

mod catalog;
mod entity;

pub use catalog::{default_products, CatalogLatency, InMemoryProductCatalog, ProductCatalog};
pub use entity::{Product, ProductPayload};

#[cfg(test)]
pub use catalog::MockProductCatalog;
