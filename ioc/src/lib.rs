//! # ioc
//!
//! > A dependency injection container: register beans by name or category,
//! > wire them by name or by capability and start them in two phases.
//!
//! ## Features
//! * Singleton and prototype beans, from instances or factories
//! * Field injection by bean name or by capability (`dyn Trait`)
//! * Optional dependencies
//! * Post-construct hooks that run after all singletons are wired
//! * Circular dependency detection
//! * `#[derive(Bean)]` for the field markers
//! * A process-wide default container
//!
//! ## Example
//! ```no_run
//! use ioc::{Bean, Container, Inject, Scope};
//!
//! trait ProductRepository: Send + Sync {
//!     fn find(&self, id: u32) -> Option<String>;
//! }
//!
//! #[derive(Default, Bean)]
//! #[bean(provides(dyn ProductRepository))]
//! struct InMemoryProductRepository;
//!
//! impl ProductRepository for InMemoryProductRepository {
//!     fn find(&self, id: u32) -> Option<String> {
//!         (id == 1).then(|| "Laptop".into())
//!     }
//! }
//!
//! #[derive(Default, Bean)]
//! struct ProductService {
//!     #[inject("productRepository")]
//!     repo: Inject<dyn ProductRepository>,
//! }
//!
//! fn main() -> Result<(), ioc::Error> {
//!     let container = Container::new();
//!     container.register("productRepository", InMemoryProductRepository, Scope::Singleton)?;
//!     container.register("productService", ProductService::default(), Scope::Singleton)?;
//!     container.init()?;
//!
//!     let service = container.get_as::<ProductService>("productService")?;
//!     assert_eq!(service.repo.find(1).as_deref(), Some("Laptop"));
//!     Ok(())
//! }
//! ```

pub use ioc_di::{
    Bean,
    BeanDefinition,
    BoxError,
    Container,
    Descriptor,
    Error,
    ErrorKind,
    FieldSpec,
    Inject,
    Instance,
    Phase,
    PostConstruct,
    Scope,
    value_beans,
};

#[cfg(feature = "macros")]
pub use ioc_macros::Bean;

#[cfg(feature = "global")]
pub mod global;
#[cfg(feature = "logging")]
pub mod logging;

pub mod error {
    //! Container errors
    pub use ioc_di::error::{BoxError, Error, ErrorKind};
}
