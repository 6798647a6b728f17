use super::{CatalogError, Product, ProductRepository};
use crate::{log::LogService, quota::QuotaService};
use ioc::{Bean, BoxError, Inject, PostConstruct};

const CREATE_PRODUCT: &str = "createProduct";

/// Catalog business rules
pub(crate) trait ProductService: Send + Sync {
    fn get_product(&self, id: &str) -> Result<Product, CatalogError>;
    fn list_products(&self) -> Vec<Product>;
    fn create_product(&self, product: Product) -> Result<(), CatalogError>;
    fn update_product(&self, product: Product) -> Result<(), CatalogError>;
    fn delete_product(&self, id: &str) -> Result<(), CatalogError>;
}

#[derive(Default, Bean)]
#[bean(provides(dyn ProductService), post_construct)]
pub(crate) struct ProductServiceImpl {
    #[inject("productRepository")]
    repo: Inject<dyn ProductRepository>,
    #[inject("quotaService")]
    quota: Inject<dyn QuotaService>,
    #[inject("logService")]
    logger: Inject<dyn LogService>,
}

impl PostConstruct for ProductServiceImpl {
    fn post_construct(&self) -> Result<(), BoxError> {
        self.logger.debug("product service ready");
        Ok(())
    }
}

impl ProductService for ProductServiceImpl {
    fn get_product(&self, id: &str) -> Result<Product, CatalogError> {
        self.logger.info(&format!("fetching product {id}"));
        self.repo.find_by_id(id)
    }

    fn list_products(&self) -> Vec<Product> {
        self.logger.info("listing products");
        self.repo.find_all()
    }

    fn create_product(&self, product: Product) -> Result<(), CatalogError> {
        self.logger.info(&format!("creating product {}", product.id));
        if !self.quota.has_quota(CREATE_PRODUCT) || !self.quota.use_quota(CREATE_PRODUCT) {
            self.logger.error(&format!("quota exhausted for {CREATE_PRODUCT}"));
            return Err(CatalogError::QuotaExceeded(CREATE_PRODUCT));
        }
        self.repo.save(product)
    }

    fn update_product(&self, product: Product) -> Result<(), CatalogError> {
        self.logger.info(&format!("updating product {}", product.id));
        self.repo.find_by_id(&product.id)?;
        self.repo.save(product)
    }

    fn delete_product(&self, id: &str) -> Result<(), CatalogError> {
        self.logger.info(&format!("deleting product {id}"));
        self.repo.delete(id)
    }
}
