use super::{Product, ProductService};
use ioc::{Bean, Inject};

/// Console front end of the catalog
#[derive(Default, Bean)]
pub(crate) struct ProductController {
    #[inject]
    service: Inject<dyn ProductService>,
}

impl ProductController {
    pub(crate) fn is_wired(&self) -> bool {
        self.service.is_injected()
    }

    pub(crate) fn show_product(&self, id: &str) {
        match self.service.get_product(id) {
            Ok(product) => println!("product: {product}"),
            Err(err) => println!("failed to get product: {err}"),
        }
    }

    pub(crate) fn list_products(&self) {
        for product in self.service.list_products() {
            println!("  {product}");
        }
    }

    pub(crate) fn create_product(&self, id: &str, name: &str, description: &str, price: f64) -> bool {
        match self.service.create_product(Product::new(id, name, description, price)) {
            Ok(()) => {
                println!("product {id} created");
                true
            }
            Err(err) => {
                println!("failed to create product: {err}");
                false
            }
        }
    }

    pub(crate) fn rename_product(&self, id: &str, name: &str) {
        let result = self.service
            .get_product(id)
            .and_then(|product| self.service.update_product(Product { name: name.into(), ..product }));
        match result {
            Ok(()) => println!("product {id} renamed to {name}"),
            Err(err) => println!("failed to rename product: {err}"),
        }
    }

    pub(crate) fn delete_product(&self, id: &str) {
        match self.service.delete_product(id) {
            Ok(()) => println!("product {id} deleted"),
            Err(err) => println!("failed to delete product: {err}"),
        }
    }
}
