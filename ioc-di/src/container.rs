//! Dependency Injection container and tools

use crate::{
    bean::{Bean, Descriptor, Instance, short_type_name},
    error::{BoxError, Error},
    injector::{self, Filled},
    lifecycle::{Lookup, Phase},
    registry::{BeanDefinition, Registry},
    resolver,
    scope::Scope
};
use std::{
    any::{TypeId, type_name},
    collections::HashMap,
    fmt::{self, Debug, Formatter},
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard}
};

const CATEGORY_SEPARATOR: char = ':';

#[derive(Debug, Default)]
pub(crate) struct State {
    pub(crate) registry: Registry,
    pub(crate) phase: Phase,
}

/// Dependency Injection container.
///
/// Owns bean instances, wires their declared dependencies together
/// and runs a two-phase startup: injection, then post-construct hooks.
/// The handle is cheap to clone, all clones share the same beans.
///
/// # Example
/// ```ignore
/// use ioc::{Bean, Container, Inject, Scope};
///
/// trait ProductRepository: Send + Sync {}
///
/// #[derive(Default, Bean)]
/// #[bean(provides(dyn ProductRepository))]
/// struct InMemoryProductRepository;
///
/// impl ProductRepository for InMemoryProductRepository {}
///
/// #[derive(Default, Bean)]
/// struct ProductService {
///     #[inject("productRepository")]
///     repo: Inject<dyn ProductRepository>,
/// }
///
/// let container = Container::new();
/// container.register("productRepository", InMemoryProductRepository, Scope::Singleton)?;
/// container.register("productService", ProductService::default(), Scope::Singleton)?;
/// container.init()?;
///
/// let service = container.get_as::<ProductService>("productService")?;
/// assert!(service.repo.is_injected());
/// ```
#[derive(Clone, Default)]
pub struct Container {
    inner: Arc<RwLock<State>>,
}

impl Debug for Container {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let state = self.read();
        f.debug_struct("Container")
            .field("phase", &state.phase)
            .field("beans", &state.registry.len())
            .finish()
    }
}

impl Container {
    /// Creates an empty container
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, State> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Identity of the shared state, used to keep resolution paths of different containers apart
    #[inline]
    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    /// Registers a bean under `name`.
    ///
    /// A singleton keeps `instance`. A prototype only declares the type:
    /// every retrieval creates a new one with `T::default()`.
    /// Singletons of types without `Default` go through [`register_singleton`](Container::register_singleton).
    pub fn register<T: Bean + Default>(&self, name: &str, instance: T, scope: Scope) -> Result<(), Error> {
        validate_name(name, "bean name")?;
        self.insert(BeanDefinition::with_instance(name, instance, scope), None)
    }

    /// Registers a singleton under `name` that keeps `instance`
    pub fn register_singleton<T: Bean>(&self, name: &str, instance: T) -> Result<(), Error> {
        validate_name(name, "bean name")?;
        self.insert(BeanDefinition::singleton(name, instance), None)
    }

    /// Registers a singleton under `category:TypeName`,
    /// where `TypeName` is the short name of `T`
    pub fn register_by_category<T: Bean>(&self, category: &str, instance: T) -> Result<(), Error> {
        validate_name(category, "category")?;
        let key = short_type_name(type_name::<T>());
        let definition = BeanDefinition::singleton(&format!("{category}:{key}"), instance)
            .in_category(category);
        self.insert(definition, Some((category, key)))
    }

    /// Registers a singleton under `category:name`
    pub fn register_by_category_and_name<T: Bean>(
        &self,
        category: &str,
        name: &str,
        instance: T
    ) -> Result<(), Error> {
        validate_name(category, "category")?;
        validate_name(name, "bean name")?;
        let definition = BeanDefinition::singleton(&format!("{category}:{name}"), instance)
            .in_category(category);
        self.insert(definition, Some((category, name)))
    }

    /// Registers a bean whose instances are produced by `factory`.
    ///
    /// A singleton factory runs once, during [`init`](Container::init).
    /// A prototype factory runs on every retrieval.
    pub fn register_factory<T, F, E>(&self, name: &str, scope: Scope, factory: F) -> Result<(), Error>
    where
        T: Bean,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError> + 'static
    {
        validate_name(name, "bean name")?;
        self.insert(BeanDefinition::with_factory(name, scope, factory), None)
    }

    fn insert(&self, definition: BeanDefinition, index: Option<(&str, &str)>) -> Result<(), Error> {
        let mut state = self.write();
        if state.phase != Phase::NotInitialized {
            #[cfg(feature = "tracing")]
            tracing::error!(bean = definition.name(), "registration after initialization started");
            return Err(Error::AlreadyInitialized);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            bean = definition.name(),
            bean_type = definition.type_name(),
            scope = %definition.scope(),
            factory = definition.has_factory(),
            "registering bean"
        );

        let result = match index {
            Some((category, key)) => state.registry.insert_in_category(category, key, definition),
            None => state.registry.insert(definition),
        };

        #[cfg(feature = "tracing")]
        let result = result.inspect_err(|err| tracing::error!(error = %err, "bean registration rejected"));

        result
    }

    /// Returns a bean by name.
    ///
    /// # Panics
    /// If the bean can't be retrieved. See [`get_safe`](Container::get_safe) for the checked version.
    pub fn get(&self, name: &str) -> Instance {
        match self.get_safe(name) {
            Ok(instance) => instance,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::error!(bean = name, error = %err, "failed to get bean");
                panic!("{err}")
            }
        }
    }

    /// Returns a bean by name.
    ///
    /// Singletons are the same object on every call, prototypes are a new one each time.
    pub fn get_safe(&self, name: &str) -> Result<Instance, Error> {
        let phase = self.read().phase;
        match phase {
            Phase::NotInitialized => Err(Error::ContainerNotReady),
            Phase::InjectionPhase => self.resolve_during_injection(name),
            Phase::PostConstructPhase | Phase::Initialized => {
                let scope = {
                    let state = self.read();
                    let definition = resolver::by_name(&state.registry, name)?;
                    if let Some(instance) = definition.instance() {
                        return Ok(instance);
                    }
                    definition.scope()
                };
                match scope {
                    Scope::Prototype => self.create_prototype(name),
                    Scope::Singleton => Err(Error::ContainerNotReady),
                }
            }
        }
    }

    /// Returns a bean registered in a category, by its short type name or explicit name.
    ///
    /// # Panics
    /// If the bean can't be retrieved. See [`get_by_category_safe`](Container::get_by_category_safe)
    /// for the checked version.
    pub fn get_by_category(&self, category: &str, name: &str) -> Instance {
        match self.get_by_category_safe(category, name) {
            Ok(instance) => instance,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::error!(category, bean = name, error = %err, "failed to get bean by category");
                panic!("{err}")
            }
        }
    }

    /// Returns a bean registered in a category, by its short type name or explicit name
    pub fn get_by_category_safe(&self, category: &str, name: &str) -> Result<Instance, Error> {
        let bean = {
            let state = self.read();
            if state.phase == Phase::NotInitialized {
                return Err(Error::ContainerNotReady);
            }
            state.registry
                .lookup(category, name)?
                .name()
                .to_owned()
        };
        self.get_safe(&bean)
    }

    /// Returns a bean by name, viewed as `C`
    pub fn get_as<C: ?Sized + Send + Sync + 'static>(&self, name: &str) -> Result<Arc<C>, Error> {
        let instance = self.get_safe(name)?;
        instance
            .cast::<C>()
            .ok_or_else(|| Error::CapabilityMismatch {
                bean: instance.name().into(),
                capability: type_name::<C>(),
            })
    }

    /// Returns the only bean that provides `C`
    pub fn get_by_capability<C: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<C>, Error> {
        let name = {
            let state = self.read();
            if state.phase == Phase::NotInitialized {
                return Err(Error::ContainerNotReady);
            }
            let created_only = state.phase == Phase::InjectionPhase;
            resolver::by_capability(&state.registry, TypeId::of::<C>(), type_name::<C>(), created_only)?
                .name()
                .to_owned()
        };
        self.get_as::<C>(&name)
    }

    /// Injects the dependencies of an object that is not managed by the container
    ///
    /// # Example
    /// ```ignore
    /// let controller = ProductController::default();
    /// container.inject(&controller)?;
    /// ```
    pub fn inject<T: Bean>(&self, target: &T) -> Result<(), Error> {
        let descriptor = Descriptor::<T>::of();
        if descriptor.is_opaque() {
            return Err(Error::UnsupportedTarget(type_name::<T>()));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(bean_type = type_name::<T>(), "injecting dependencies into unmanaged object");

        injector::inject_fields(target, descriptor.fields(), &Lookup::new(self), Filled::Resolve)
    }

    /// Returns a snapshot of all bean definitions
    pub fn get_all(&self) -> HashMap<String, BeanDefinition> {
        self.read()
            .registry
            .iter()
            .map(|definition| (definition.name().to_owned(), definition.clone()))
            .collect()
    }

    /// Returns all bean names in registration order
    pub fn get_all_names(&self) -> Vec<String> {
        self.read()
            .registry
            .iter()
            .map(|definition| definition.name().to_owned())
            .collect()
    }

    /// Returns bean names registered in `category`, in registration order
    pub fn get_category_names(&self, category: &str) -> Vec<String> {
        self.read()
            .registry
            .category_names(category)
    }

    /// Returns the current startup phase
    #[inline]
    pub fn phase(&self) -> Phase {
        self.read().phase
    }

    /// Returns `true` once [`init`](Container::init) has completed
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.phase() == Phase::Initialized
    }

    /// Returns `true` if a bean with this name is registered
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.read()
            .registry
            .contains(name)
    }

    /// Number of registered beans
    #[inline]
    pub fn len(&self) -> usize {
        self.read()
            .registry
            .len()
    }

    /// Returns `true` if no bean is registered
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[inline]
fn validate_name(name: &str, what: &'static str) -> Result<(), Error> {
    if name.is_empty() {
        return Err(Error::NilInput(what));
    }
    if name.contains(CATEGORY_SEPARATOR) {
        return Err(Error::InvalidName(name.into()));
    }
    Ok(())
}
