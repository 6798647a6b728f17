//! Storage of registered bean definitions

use crate::{
    bean::{Bean, BeanRef, BeanType, Instance},
    error::{BoxError, Error},
    scope::Scope
};
use indexmap::IndexMap;
use std::{
    any::TypeId,
    collections::HashMap,
    fmt::{self, Debug, Formatter},
    sync::Arc
};

type FactoryFn = Arc<
    dyn Fn() -> Result<BeanRef, BoxError>
    + Send
    + Sync
>;

/// How a fresh instance of a bean is produced
#[derive(Clone)]
pub(crate) enum Source {
    /// The `Default` constructor of the declared type
    Default(fn() -> BeanRef),

    /// A registered factory
    Factory(FactoryFn),

    /// The instance supplied at registration
    Instance(BeanRef),
}

impl Source {
    #[inline]
    pub(crate) fn create(&self) -> Result<BeanRef, BoxError> {
        match self {
            Source::Default(create) => Ok(create()),
            Source::Factory(factory) => factory(),
            Source::Instance(value) => Ok(Arc::clone(value)),
        }
    }
}

#[inline]
fn default_bean<T: Bean + Default>() -> BeanRef {
    Arc::new(T::default())
}

/// Registration metadata of one bean
#[derive(Clone)]
pub struct BeanDefinition {
    name: Arc<str>,
    category: Option<String>,
    ty: Arc<BeanType>,
    instance: Option<BeanRef>,
    scope: Scope,
    source: Source,
    injected: bool,
    initialized: bool,
}

impl Debug for BeanDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanDefinition")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("type", &self.ty)
            .field("scope", &self.scope)
            .field("factory", &self.has_factory())
            .field("instance", &self.instance.is_some())
            .field("injected", &self.injected)
            .field("initialized", &self.initialized)
            .finish()
    }
}

impl BeanDefinition {
    /// Defines a bean from a ready instance.
    ///
    /// A prototype only takes the type from `instance`,
    /// every retrieval creates a new one with `T::default()`.
    pub(crate) fn with_instance<T: Bean + Default>(name: &str, instance: T, scope: Scope) -> Self {
        match scope {
            Scope::Singleton => Self::singleton(name, instance),
            Scope::Prototype => Self::new::<T>(name, scope, None, Source::Default(default_bean::<T>)),
        }
    }

    /// Defines a singleton that keeps `instance`
    pub(crate) fn singleton<T: Bean>(name: &str, instance: T) -> Self {
        let value: BeanRef = Arc::new(instance);
        Self::new::<T>(name, Scope::Singleton, Some(Arc::clone(&value)), Source::Instance(value))
    }

    /// Defines a bean created by a factory
    pub(crate) fn with_factory<T, F, E>(name: &str, scope: Scope, factory: F) -> Self
    where
        T: Bean,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError> + 'static
    {
        let factory: FactoryFn = Arc::new(move || {
            factory()
                .map(|bean| Arc::new(bean) as BeanRef)
                .map_err(Into::into)
        });
        Self::new::<T>(name, scope, None, Source::Factory(factory))
    }

    fn new<T: Bean>(name: &str, scope: Scope, instance: Option<BeanRef>, source: Source) -> Self {
        Self {
            name: name.into(),
            category: None,
            ty: BeanType::of::<T>(),
            instance,
            scope,
            source,
            injected: false,
            initialized: false,
        }
    }

    #[inline]
    pub(crate) fn in_category(mut self, category: &str) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Unique bean name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category the bean was registered in, if any
    #[inline]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Full name of the declared type
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ty.type_name()
    }

    /// Declared type name without the module path and generic arguments
    #[inline]
    pub fn short_type_name(&self) -> &'static str {
        self.ty.short_name()
    }

    /// [`TypeId`] of the declared type
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.ty.type_id()
    }

    /// Bean scope
    #[inline]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Returns `true` if instances of this bean are produced by a factory
    #[inline]
    pub fn has_factory(&self) -> bool {
        matches!(self.source, Source::Factory(_))
    }

    /// Returns `true` if the bean has a post-construct hook
    #[inline]
    pub fn has_post_construct(&self) -> bool {
        self.ty.has_post_construct()
    }

    /// Returns `true` if a singleton instance has been created
    #[inline]
    pub fn has_instance(&self) -> bool {
        self.instance.is_some()
    }

    /// Returns `true` if the dependencies of the bean have been injected
    #[inline]
    pub fn is_injected(&self) -> bool {
        self.injected
    }

    /// Returns `true` if the post-construct step has been completed
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the singleton instance, if created
    #[inline]
    pub fn instance(&self) -> Option<Instance> {
        self.instance
            .as_ref()
            .map(|value| self.wrap(Arc::clone(value)))
    }

    /// Returns `true` if the declared type provides the capability `C`
    #[inline]
    pub fn provides<C: ?Sized + 'static>(&self) -> bool {
        self.ty.provides(TypeId::of::<C>())
    }

    #[inline]
    pub(crate) fn provides_id(&self, capability: TypeId) -> bool {
        self.ty.provides(capability)
    }

    #[inline]
    pub(crate) fn source(&self) -> &Source {
        &self.source
    }

    /// Wraps a value created from this definition into an [`Instance`]
    #[inline]
    pub(crate) fn wrap(&self, value: BeanRef) -> Instance {
        Instance::new(Arc::clone(&self.name), value, Arc::clone(&self.ty))
    }

    /// Stores a created singleton instance, keeping the first one if it has already been set
    pub(crate) fn set_instance(&mut self, value: BeanRef) -> Instance {
        let value = self.instance.get_or_insert(value);
        let value = Arc::clone(value);
        self.wrap(value)
    }

    #[inline]
    pub(crate) fn mark_injected(&mut self) {
        self.injected = true;
    }

    #[inline]
    pub(crate) fn mark_initialized(&mut self) {
        self.initialized = true;
    }
}

/// Registered beans in registration order, plus the category index
#[derive(Debug, Default)]
pub(crate) struct Registry {
    beans: IndexMap<String, BeanDefinition>,
    categories: HashMap<String, HashMap<String, String>>,
}

impl Registry {
    /// Adds a bean, rejecting a taken name
    pub(crate) fn insert(&mut self, definition: BeanDefinition) -> Result<(), Error> {
        if self.beans.contains_key(definition.name()) {
            return Err(Error::DuplicateName(definition.name().into()));
        }
        self.beans.insert(definition.name().into(), definition);
        Ok(())
    }

    /// Adds a bean and indexes it under `(category, key)`
    pub(crate) fn insert_in_category(
        &mut self,
        category: &str,
        key: &str,
        definition: BeanDefinition
    ) -> Result<(), Error> {
        let taken = self.categories
            .get(category)
            .is_some_and(|keys| keys.contains_key(key));
        if taken {
            return Err(Error::DuplicateName(definition.name().into()));
        }
        let name = definition.name().to_owned();
        self.insert(definition)?;
        self.categories
            .entry(category.into())
            .or_default()
            .insert(key.into(), name);
        Ok(())
    }

    #[inline]
    pub(crate) fn get(&self, name: &str) -> Result<&BeanDefinition, Error> {
        self.beans
            .get(name)
            .ok_or_else(|| Error::BeanNotFound(name.into()))
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, name: &str) -> Result<&mut BeanDefinition, Error> {
        self.beans
            .get_mut(name)
            .ok_or_else(|| Error::BeanNotFound(name.into()))
    }

    /// Finds the bean indexed under `(category, key)`
    pub(crate) fn lookup(&self, category: &str, key: &str) -> Result<&BeanDefinition, Error> {
        let name = self.categories
            .get(category)
            .and_then(|keys| keys.get(key))
            .ok_or_else(|| Error::BeanNotFound(format!("{category}:{key}")))?;
        self.get(name)
    }

    /// Bean names of a category, in registration order
    pub(crate) fn category_names(&self, category: &str) -> Vec<String> {
        let Some(keys) = self.categories.get(category) else {
            return Vec::new();
        };
        self.beans
            .keys()
            .filter(|name| keys.values().any(|indexed| indexed == *name))
            .cloned()
            .collect()
    }

    /// Names of singleton beans, in registration order
    pub(crate) fn singletons(&self) -> Vec<String> {
        self.beans
            .values()
            .filter(|definition| definition.scope() == Scope::Singleton)
            .map(|definition| definition.name().to_owned())
            .collect()
    }

    #[inline]
    pub(crate) fn iter(&self) -> impl Iterator<Item = &BeanDefinition> {
        self.beans.values()
    }

    #[inline]
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.beans.contains_key(name)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.beans.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[derive(Default)]
    struct Repo;

    impl Bean for Repo {}

    #[test]
    fn it_rejects_duplicate_name_and_keeps_first() {
        let mut registry = Registry::default();

        registry.insert(BeanDefinition::with_instance("repo", Repo, Scope::Singleton)).unwrap();
        let err = registry
            .insert(BeanDefinition::with_instance("repo", Repo, Scope::Prototype))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DuplicateName);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("repo").unwrap().scope(), Scope::Singleton);
    }

    #[test]
    fn it_keeps_registration_order() {
        let mut registry = Registry::default();

        for name in ["c", "a", "b"] {
            registry.insert(BeanDefinition::with_instance(name, Repo, Scope::Singleton)).unwrap();
        }

        assert_eq!(registry.singletons(), ["c", "a", "b"]);
    }

    #[test]
    fn it_stores_no_instance_for_prototype() {
        let definition = BeanDefinition::with_instance("repo", Repo, Scope::Prototype);

        assert!(!definition.has_instance());
        assert!(definition.source().create().is_ok());
    }

    #[test]
    fn it_keeps_registered_singleton_instance() {
        struct Pool(usize);
        impl Bean for Pool {}

        let definition = BeanDefinition::singleton("pool", Pool(4));
        let instance = definition.instance().unwrap();
        let created = definition.wrap(definition.source().create().unwrap());

        assert!(!definition.has_factory());
        assert_eq!(instance.downcast::<Pool>().unwrap().0, 4);
        assert!(instance.ptr_eq(&created));
    }

    #[test]
    fn it_keeps_first_singleton_instance() {
        let mut definition = BeanDefinition::with_factory("repo", Scope::Singleton, || Ok::<_, BoxError>(Repo));

        let first = definition.set_instance(Arc::new(Repo));
        let second = definition.set_instance(Arc::new(Repo));

        assert!(first.ptr_eq(&second));
    }

    #[test]
    fn it_looks_up_by_category() {
        let mut registry = Registry::default();
        let definition = BeanDefinition::with_instance("repository:Repo", Repo, Scope::Singleton)
            .in_category("repository");

        registry.insert_in_category("repository", "Repo", definition).unwrap();

        assert_eq!(registry.lookup("repository", "Repo").unwrap().name(), "repository:Repo");
        assert_eq!(registry.category_names("repository"), ["repository:Repo"]);
        assert_eq!(
            registry.lookup("repository", "Other").unwrap_err().kind(),
            ErrorKind::BeanNotFound
        );
    }

    #[test]
    fn it_rejects_taken_category_key() {
        let mut registry = Registry::default();
        let first = BeanDefinition::with_instance("repository:Repo", Repo, Scope::Singleton);
        let second = BeanDefinition::with_instance("repository:Repo", Repo, Scope::Singleton);

        registry.insert_in_category("repository", "Repo", first).unwrap();
        let err = registry.insert_in_category("repository", "Repo", second).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DuplicateName);
        assert_eq!(registry.len(), 1);
    }
}
