//! Product catalog: model, storage, business rules and the console front end

use std::fmt;

mod controller;
mod repository;
mod service;

pub(crate) use controller::ProductController;
pub(crate) use repository::{InMemoryProductRepository, ProductRepository};
pub(crate) use service::{ProductService, ProductServiceImpl};

/// A catalog entry
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Product {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) price: f64,
}

impl Product {
    pub(crate) fn new(id: &str, name: &str, description: &str, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            price,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id={}, name={}, description={}, price={:.2}",
            self.id, self.name, self.description, self.price
        )
    }
}

/// Catalog operation errors
#[derive(Debug, PartialEq)]
pub(crate) enum CatalogError {
    NotFound(String),
    EmptyId,
    QuotaExceeded(&'static str),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::NotFound(id) => write!(f, "product {id} does not exist"),
            CatalogError::EmptyId => f.write_str("product id must not be empty"),
            CatalogError::QuotaExceeded(operation) => write!(f, "quota for {operation} is exhausted, try again later"),
        }
    }
}

impl std::error::Error for CatalogError {}
