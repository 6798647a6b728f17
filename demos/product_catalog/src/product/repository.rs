use super::{CatalogError, Product};
use crate::config::AppConfig;
use ioc::{Bean, BoxError, Inject, PostConstruct};
use std::{
    collections::BTreeMap,
    sync::{PoisonError, RwLock}
};

/// Product storage
pub(crate) trait ProductRepository: Send + Sync {
    fn find_by_id(&self, id: &str) -> Result<Product, CatalogError>;
    fn find_all(&self) -> Vec<Product>;
    fn save(&self, product: Product) -> Result<(), CatalogError>;
    fn delete(&self, id: &str) -> Result<(), CatalogError>;
}

/// Keeps products in memory, seeded with a few entries on startup
#[derive(Default, Bean)]
#[bean(provides(dyn ProductRepository), post_construct)]
pub(crate) struct InMemoryProductRepository {
    #[inject("appConfig")]
    config: Inject<AppConfig>,
    products: RwLock<BTreeMap<String, Product>>,
}

impl PostConstruct for InMemoryProductRepository {
    fn post_construct(&self) -> Result<(), BoxError> {
        tracing::info!(database_url = %self.config.database_url, "product repository connected");
        let mut products = self.products
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for product in [
            Product::new("p001", "Laptop", "High performance laptop", 5999.00),
            Product::new("p002", "Smartphone", "Next generation smartphone", 3999.00),
        ] {
            products.insert(product.id.clone(), product);
        }
        Ok(())
    }
}

impl ProductRepository for InMemoryProductRepository {
    fn find_by_id(&self, id: &str) -> Result<Product, CatalogError> {
        self.products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.into()))
    }

    fn find_all(&self) -> Vec<Product> {
        self.products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    fn save(&self, product: Product) -> Result<(), CatalogError> {
        if product.id.is_empty() {
            return Err(CatalogError::EmptyId);
        }
        self.products
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(product.id.clone(), product);
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), CatalogError> {
        self.products
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CatalogError::NotFound(id.into()))
    }
}
