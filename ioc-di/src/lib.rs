//! Dependency injection container: bean registry, two-phase startup
//! with field injection and circular dependency detection.

pub use crate::{
    bean::{Bean, Descriptor, Instance, PostConstruct},
    container::Container,
    error::{BoxError, Error, ErrorKind},
    inject::{FieldSpec, Inject},
    lifecycle::Phase,
    registry::BeanDefinition,
    scope::Scope,
};

pub mod error;
pub mod bean;
pub mod container;
pub mod inject;
pub mod lifecycle;
pub mod registry;
pub mod scope;

mod injector;
mod resolver;
