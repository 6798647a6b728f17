//! Product catalog with per-operation quotas, wired by the `ioc` container

use config::AppConfig;
use ioc::{
    BoxError, Container, Scope,
    logging::{LoggingConfig, configure_logging}
};
use log::TracingLogService;
use product::{InMemoryProductRepository, ProductController, ProductServiceImpl};
use quota::InMemoryQuotaService;
use std::sync::Arc;

mod config;
mod log;
mod product;
mod quota;

fn main() -> Result<(), BoxError> {
    configure_logging(LoggingConfig::new().without_caller())?;

    let container = Container::new();
    register_beans(&container)?;
    container.init()?;

    println!("registered beans: {}", container.get_all_names().join(", "));

    let controller = product_controller(&container)?;
    controller.show_product("p001");
    controller.create_product("p003", "Tablet", "10 inch HD tablet", 2499.00);
    controller.rename_product("p003", "Tablet Pro");
    controller.delete_product("p404");
    controller.list_products();

    manual_injection(&container)?;
    drain_quota(&controller);

    Ok(())
}

fn register_beans(container: &Container) -> Result<(), BoxError> {
    container.register_factory("appConfig", Scope::Singleton, AppConfig::from_env)?;
    container.register("logService", TracingLogService::default(), Scope::Singleton)?;
    container.register("quotaService", InMemoryQuotaService::default(), Scope::Singleton)?;
    container.register("productRepository", InMemoryProductRepository::default(), Scope::Singleton)?;
    container.register("productService", ProductServiceImpl::default(), Scope::Singleton)?;
    container.register_by_category_and_name("controllers", "product", ProductController::default())?;
    Ok(())
}

fn product_controller(container: &Container) -> Result<Arc<ProductController>, BoxError> {
    container
        .get_by_category_safe("controllers", "product")?
        .downcast::<ProductController>()
        .ok_or_else(|| "controllers:product is not a ProductController".into())
}

/// Wires a controller the container doesn't manage
fn manual_injection(container: &Container) -> Result<(), BoxError> {
    let controller = ProductController::default();
    println!("before injection, wired: {}", controller.is_wired());

    container.inject(&controller)?;
    println!("after injection, wired: {}", controller.is_wired());

    controller.show_product("p002");
    Ok(())
}

fn drain_quota(controller: &ProductController) {
    for i in 1..=6 {
        let id = format!("p{:03}", i + 100);
        if !controller.create_product(&id, &format!("Test product {i}"), "quota test", 999.00) {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{CatalogError, Product, ProductService};

    fn catalog() -> Container {
        let container = Container::new();
        register_beans(&container).unwrap();
        container.init().unwrap();
        container
    }

    #[test]
    fn it_wires_the_catalog() {
        let container = catalog();

        let controller = product_controller(&container).unwrap();

        assert!(controller.is_wired());
        assert_eq!(container.get_category_names("controllers"), ["controllers:product"]);
    }

    #[test]
    fn it_reads_seeded_products() {
        let container = catalog();
        let service = container.get_as::<dyn ProductService>("productService").unwrap();

        let product = service.get_product("p001").unwrap();

        assert_eq!(product.name, "Laptop");
        assert_eq!(service.list_products().len(), 2);
    }

    #[test]
    fn it_limits_product_creation() {
        let container = catalog();
        let service = container.get_by_capability::<dyn ProductService>().unwrap();

        for i in 0..5 {
            let id = format!("t{i}");
            service.create_product(Product::new(&id, "Test", "quota test", 1.0)).unwrap();
        }
        let err = service.create_product(Product::new("t5", "Test", "quota test", 1.0)).unwrap_err();

        assert_eq!(err, CatalogError::QuotaExceeded("createProduct"));
    }

    #[test]
    fn it_rejects_updates_of_missing_products() {
        let container = catalog();
        let service = container.get_as::<dyn ProductService>("productService").unwrap();

        let err = service.update_product(Product::new("p999", "Ghost", "", 0.0)).unwrap_err();

        assert_eq!(err, CatalogError::NotFound("p999".into()));
    }

    #[test]
    fn it_injects_unmanaged_controller() {
        let container = catalog();
        let controller = ProductController::default();

        container.inject(&controller).unwrap();

        assert!(controller.is_wired());
    }
}
