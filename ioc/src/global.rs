//! The process-wide default container and functions to access it
//!
//! Meant for the outermost entry point of an application.
//! Libraries should accept a [`Container`] handle instead.
//!
//! # Example
//! ```no_run
//! use ioc::{global, Bean, Scope};
//!
//! #[derive(Default, Bean)]
//! struct LogService;
//!
//! global::register("logService", LogService, Scope::Singleton).unwrap();
//! global::init().unwrap();
//!
//! let log = global::get("logService");
//! assert!(log.downcast::<LogService>().is_some());
//! ```

use crate::{Bean, BeanDefinition, BoxError, Container, Error, Instance, Scope};
use std::{collections::HashMap, sync::LazyLock};

static GLOBAL_CONTAINER: LazyLock<Container> = LazyLock::new(Container::new);

/// Returns the default container, creating it on first access
#[inline]
pub fn container() -> &'static Container {
    &GLOBAL_CONTAINER
}

/// Registers a bean in the default container.
///
/// See [`Container::register`]
#[inline]
pub fn register<T: Bean + Default>(name: &str, instance: T, scope: Scope) -> Result<(), Error> {
    container().register(name, instance, scope)
}

/// Registers a singleton that keeps `instance` in the default container.
///
/// See [`Container::register_singleton`]
#[inline]
pub fn register_singleton<T: Bean>(name: &str, instance: T) -> Result<(), Error> {
    container().register_singleton(name, instance)
}

/// Registers a singleton under `category:TypeName` in the default container.
///
/// See [`Container::register_by_category`]
#[inline]
pub fn register_by_category<T: Bean>(category: &str, instance: T) -> Result<(), Error> {
    container().register_by_category(category, instance)
}

/// Registers a singleton under `category:name` in the default container.
///
/// See [`Container::register_by_category_and_name`]
#[inline]
pub fn register_by_category_and_name<T: Bean>(
    category: &str,
    name: &str,
    instance: T
) -> Result<(), Error> {
    container().register_by_category_and_name(category, name, instance)
}

/// Registers a factory-produced bean in the default container.
///
/// See [`Container::register_factory`]
#[inline]
pub fn register_factory<T, F, E>(name: &str, scope: Scope, factory: F) -> Result<(), Error>
where
    T: Bean,
    F: Fn() -> Result<T, E> + Send + Sync + 'static,
    E: Into<BoxError> + 'static
{
    container().register_factory(name, scope, factory)
}

/// Returns a bean from the default container.
///
/// # Panics
/// If the bean can't be retrieved. See [`get_safe`] for the checked version.
#[inline]
pub fn get(name: &str) -> Instance {
    container().get(name)
}

/// Returns a bean from the default container
#[inline]
pub fn get_safe(name: &str) -> Result<Instance, Error> {
    container().get_safe(name)
}

/// Returns a bean registered in a category of the default container.
///
/// # Panics
/// If the bean can't be retrieved. See [`get_by_category_safe`] for the checked version.
#[inline]
pub fn get_by_category(category: &str, name: &str) -> Instance {
    container().get_by_category(category, name)
}

/// Returns a bean registered in a category of the default container
#[inline]
pub fn get_by_category_safe(category: &str, name: &str) -> Result<Instance, Error> {
    container().get_by_category_safe(category, name)
}

/// Injects dependencies from the default container into an unmanaged object
#[inline]
pub fn inject<T: Bean>(target: &T) -> Result<(), Error> {
    container().inject(target)
}

/// Initializes the default container
#[inline]
pub fn init() -> Result<(), Error> {
    container().init()
}

/// Returns a snapshot of all bean definitions of the default container
#[inline]
pub fn get_all() -> HashMap<String, BeanDefinition> {
    container().get_all()
}

/// Returns all bean names of the default container in registration order
#[inline]
pub fn get_all_names() -> Vec<String> {
    container().get_all_names()
}
