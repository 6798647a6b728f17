//! Utilities to declare injectable fields

use crate::{bean::Instance, error::Error};
use std::{
    any::{TypeId, type_name},
    fmt::{self, Debug, Formatter},
    ops::Deref,
    sync::{Arc, OnceLock}
};

type AssignFn<T> = Box<
    dyn Fn(&T, &Instance) -> Result<(), Error>
    + Send
    + Sync
>;

type FilledFn<T> = Box<
    dyn Fn(&T) -> bool
    + Send
    + Sync
>;

/// A set-once slot for a dependency of type `C`, usually a `dyn Trait`.
///
/// The container fills the slot while wiring the bean that owns it.
/// Once filled, the slot never changes.
///
/// # Example
/// ```ignore
/// use ioc::{Bean, Inject};
///
/// trait ProductRepository: Send + Sync {
///     fn count(&self) -> usize;
/// }
///
/// #[derive(Default, Bean)]
/// struct ProductService {
///     #[inject("productRepository")]
///     repo: Inject<dyn ProductRepository>,
/// }
///
/// impl ProductService {
///     fn count(&self) -> usize {
///         self.repo.count()
///     }
/// }
/// ```
pub struct Inject<C: ?Sized>(OnceLock<Arc<C>>);

impl<C: ?Sized> Default for Inject<C> {
    #[inline]
    fn default() -> Self {
        Self(OnceLock::new())
    }
}

impl<C: ?Sized> Clone for Inject<C> {
    #[inline]
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<C: ?Sized> Debug for Inject<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inject")
            .field("capability", &type_name::<C>())
            .field("injected", &self.is_injected())
            .finish()
    }
}

impl<C: ?Sized> From<Arc<C>> for Inject<C> {
    #[inline]
    fn from(value: Arc<C>) -> Self {
        Self(OnceLock::from(value))
    }
}

impl<C: ?Sized> Deref for Inject<C> {
    type Target = C;

    /// # Panics
    /// If the dependency has not been injected
    #[inline]
    fn deref(&self) -> &C {
        match self.0.get() {
            Some(value) => value.as_ref(),
            None => panic!("dependency {} has not been injected", type_name::<C>()),
        }
    }
}

impl<C: ?Sized> Inject<C> {
    /// Creates an empty slot
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the injected dependency, if any
    #[inline]
    pub fn get(&self) -> Option<&Arc<C>> {
        self.0.get()
    }

    /// Returns `true` if the slot has been filled
    #[inline]
    pub fn is_injected(&self) -> bool {
        self.0.get().is_some()
    }

    /// Fills the slot. Assigning the instance the slot already holds is a no-op.
    pub(crate) fn assign(&self, value: Arc<C>, field: &'static str) -> Result<(), Error> {
        let current = self.0.get_or_init(|| Arc::clone(&value));
        if Arc::ptr_eq(current, &value) {
            Ok(())
        } else {
            Err(Error::UnassignableField(field))
        }
    }
}

/// Where the dependency of a field comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target<'a> {
    /// A bean with an exact name
    Name(&'a str),

    /// The only bean that provides a capability
    Capability(TypeId, &'static str),
}

/// Describes one injected field of `T`
pub struct FieldSpec<T> {
    name: &'static str,
    capability: TypeId,
    capability_name: &'static str,
    bean: Option<String>,
    optional: bool,
    assign: AssignFn<T>,
    filled: FilledFn<T>,
}

impl<T> Debug for FieldSpec<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("capability", &self.capability_name)
            .field("bean", &self.bean)
            .field("optional", &self.optional)
            .finish()
    }
}

impl<T> FieldSpec<T> {
    pub(crate) fn new<C, F>(name: &'static str, access: F) -> Self
    where
        T: 'static,
        C: ?Sized + Send + Sync + 'static,
        F: for<'a> Fn(&'a T) -> &'a Inject<C> + Send + Sync + 'static
    {
        let access = Arc::new(access);
        let slot = Arc::clone(&access);
        let filled: FilledFn<T> = Box::new(move |target: &T| (*slot)(target).is_injected());
        let assign: AssignFn<T> = Box::new(move |target: &T, instance: &Instance| {
            let value = instance
                .cast::<C>()
                .ok_or_else(|| Error::CapabilityMismatch {
                    bean: instance.name().into(),
                    capability: type_name::<C>(),
                })?;
            (*access)(target).assign(value, name)
        });
        Self {
            name,
            capability: TypeId::of::<C>(),
            capability_name: type_name::<C>(),
            bean: None,
            optional: false,
            assign,
            filled,
        }
    }

    /// Resolves the dependency by an exact bean name instead of by capability.
    ///
    /// An empty name keeps the by-capability resolution.
    #[inline]
    pub fn named(&mut self, bean: impl Into<String>) -> &mut Self {
        let bean = bean.into();
        self.bean = (!bean.is_empty()).then_some(bean);
        self
    }

    /// Leaves the field empty instead of failing when the dependency can't be resolved
    #[inline]
    pub fn optional(&mut self) -> &mut Self {
        self.optional = true;
        self
    }

    /// Field name
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Explicit bean name, if any
    #[inline]
    pub fn bean_name(&self) -> Option<&str> {
        self.bean.as_deref()
    }

    /// Type name of the capability the field requires
    #[inline]
    pub fn capability_name(&self) -> &'static str {
        self.capability_name
    }

    /// Returns `true` if the field is optional
    #[inline]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    #[inline]
    pub(crate) fn target(&self) -> Target<'_> {
        match &self.bean {
            Some(bean) => Target::Name(bean),
            None => Target::Capability(self.capability, self.capability_name),
        }
    }

    #[inline]
    pub(crate) fn assign(&self, target: &T, instance: &Instance) -> Result<(), Error> {
        (self.assign)(target, instance)
    }

    /// Returns `true` if the slot of this field in `target` is already filled
    #[inline]
    pub(crate) fn is_filled(&self, target: &T) -> bool {
        (self.filled)(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    trait Repo: Send + Sync {
        fn id(&self) -> u32;
    }

    struct Memory(u32);

    impl Repo for Memory {
        fn id(&self) -> u32 {
            self.0
        }
    }

    #[derive(Default)]
    struct Service {
        repo: Inject<dyn Repo>,
    }

    #[test]
    fn it_starts_empty() {
        let slot = Inject::<dyn Repo>::new();

        assert!(!slot.is_injected());
        assert!(slot.get().is_none());
    }

    #[test]
    fn it_assigns_once() {
        let slot = Inject::<dyn Repo>::new();
        let repo: Arc<dyn Repo> = Arc::new(Memory(1));

        slot.assign(repo.clone(), "repo").unwrap();

        assert!(slot.is_injected());
        assert_eq!(slot.id(), 1);
    }

    #[test]
    fn it_accepts_same_instance_again() {
        let slot = Inject::<dyn Repo>::new();
        let repo: Arc<dyn Repo> = Arc::new(Memory(1));

        slot.assign(repo.clone(), "repo").unwrap();

        assert!(slot.assign(repo, "repo").is_ok());
    }

    #[test]
    fn it_rejects_different_instance() {
        let slot = Inject::<dyn Repo>::new();

        slot.assign(Arc::new(Memory(1)), "repo").unwrap();
        let err = slot.assign(Arc::new(Memory(2)), "repo").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnassignableField);
        assert_eq!(slot.id(), 1);
    }

    #[test]
    #[should_panic(expected = "has not been injected")]
    fn it_panics_on_deref_of_empty_slot() {
        let slot = Inject::<dyn Repo>::new();

        let _ = slot.id();
    }

    #[test]
    fn it_shares_dependency_between_clones() {
        let slot = Inject::<dyn Repo>::from(Arc::new(Memory(7)) as Arc<dyn Repo>);

        let clone = slot.clone();

        assert!(Arc::ptr_eq(slot.get().unwrap(), clone.get().unwrap()));
    }

    #[test]
    fn it_targets_capability_by_default() {
        let spec = FieldSpec::<Service>::new("repo", |service: &Service| &service.repo);

        assert_eq!(
            spec.target(),
            Target::Capability(TypeId::of::<dyn Repo>(), type_name::<dyn Repo>())
        );
        assert!(!spec.is_optional());
    }

    #[test]
    fn it_targets_name_when_named() {
        let mut spec = FieldSpec::<Service>::new("repo", |service: &Service| &service.repo);

        spec.named("productRepository").optional();

        assert_eq!(spec.target(), Target::Name("productRepository"));
        assert_eq!(spec.bean_name(), Some("productRepository"));
        assert!(spec.is_optional());
    }

    #[test]
    fn it_reports_filled_slot() {
        let spec = FieldSpec::<Service>::new("repo", |service: &Service| &service.repo);
        let service = Service::default();

        assert!(!spec.is_filled(&service));

        service.repo.assign(Arc::new(Memory(3)), "repo").unwrap();

        assert!(spec.is_filled(&service));
    }

    #[test]
    fn it_keeps_capability_target_for_empty_name() {
        let mut spec = FieldSpec::<Service>::new("repo", |service: &Service| &service.repo);

        spec.named("");

        assert!(matches!(spec.target(), Target::Capability(..)));
    }
}
