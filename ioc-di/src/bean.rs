//! Bean metadata: the [`Bean`] trait, its [`Descriptor`] table and the type-erased [`Instance`]

use crate::{
    error::{BoxError, Error},
    inject::{FieldSpec, Inject},
    injector::{self, Filled, Resolve}
};
use std::{
    any::{Any, TypeId, type_name},
    collections::HashMap,
    fmt::{self, Debug, Formatter},
    sync::Arc
};

pub(crate) type BeanRef = Arc<
    dyn Any
    + Send
    + Sync
>;

type CastFn = Arc<
    dyn Fn(&BeanRef) -> Option<Box<dyn Any + Send + Sync>>
    + Send
    + Sync
>;

type InjectFn = Arc<
    dyn Fn(&BeanRef, &dyn Resolve) -> Result<(), Error>
    + Send
    + Sync
>;

type HookFn = Arc<
    dyn Fn(&BeanRef) -> Result<(), BoxError>
    + Send
    + Sync
>;

/// A type that can be managed by the container.
///
/// The [`describe`](Bean::describe) method fills the metadata table the container uses
/// to wire the bean: which fields to inject, which capabilities the bean provides
/// and whether it has a post-construct hook. It is usually derived:
///
/// # Example
/// ```ignore
/// use ioc::{Bean, Inject, PostConstruct, error::BoxError};
///
/// trait ProductRepository: Send + Sync {}
/// trait ProductService: Send + Sync {}
///
/// #[derive(Default, Bean)]
/// #[bean(provides(dyn ProductService), post_construct)]
/// struct ProductServiceImpl {
///     #[inject("productRepository")]
///     repo: Inject<dyn ProductRepository>,
/// }
///
/// impl ProductService for ProductServiceImpl {}
///
/// impl PostConstruct for ProductServiceImpl {
///     fn post_construct(&self) -> Result<(), BoxError> {
///         Ok(())
///     }
/// }
/// ```
///
/// The same table can be written by hand:
/// ```ignore
/// impl Bean for ProductServiceImpl {
///     fn describe(descriptor: &mut Descriptor<Self>) {
///         descriptor
///             .provides::<dyn ProductService, _>(|bean| bean)
///             .post_construct();
///         descriptor
///             .field("repo", |bean| &bean.repo)
///             .named("productRepository");
///     }
/// }
/// ```
pub trait Bean: Sized + Send + Sync + 'static {
    /// Fills the metadata table of this bean type.
    ///
    /// The default implementation describes a record without injected fields.
    #[inline]
    fn describe(_descriptor: &mut Descriptor<Self>) {}
}

/// A hook invoked exactly once after all dependencies of a bean have been injected
pub trait PostConstruct {
    /// Runs initialization logic that needs the injected dependencies
    fn post_construct(&self) -> Result<(), BoxError>;
}

/// Per-type metadata table of a [`Bean`]
pub struct Descriptor<T> {
    fields: Vec<FieldSpec<T>>,
    casts: Vec<(TypeId, &'static str, CastFn)>,
    post_construct: Option<fn(&T) -> Result<(), BoxError>>,
    opaque: bool,
}

impl<T> Debug for Descriptor<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("type", &type_name::<T>())
            .field("fields", &self.fields)
            .field("capabilities", &self.casts.iter().map(|(_, name, _)| *name).collect::<Vec<_>>())
            .field("post_construct", &self.post_construct.is_some())
            .field("opaque", &self.opaque)
            .finish()
    }
}

impl<T: Bean> Descriptor<T> {
    #[inline]
    pub(crate) fn new() -> Self {
        Self {
            fields: Vec::new(),
            casts: Vec::new(),
            post_construct: None,
            opaque: false,
        }
    }

    /// Builds the complete table of `T`
    pub(crate) fn of() -> Self {
        let mut descriptor = Self::new();
        T::describe(&mut descriptor);
        descriptor
    }

    /// Declares an injected field.
    ///
    /// Without an explicit [name](FieldSpec::named) the dependency is resolved
    /// by the field's capability `C`.
    pub fn field<C, F>(&mut self, name: &'static str, access: F) -> &mut FieldSpec<T>
    where
        C: ?Sized + Send + Sync + 'static,
        F: for<'a> Fn(&'a T) -> &'a Inject<C> + Send + Sync + 'static
    {
        let index = self.fields.len();
        self.fields.push(FieldSpec::new(name, access));
        &mut self.fields[index]
    }

    /// Declares that this bean can be viewed as `C`, usually a `dyn Trait`
    pub fn provides<C, F>(&mut self, cast: F) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<T>) -> Arc<C> + Send + Sync + 'static
    {
        let erased: CastFn = Arc::new(move |bean: &BeanRef| {
            let bean = Arc::clone(bean).downcast::<T>().ok()?;
            Some(Box::new(cast(bean)) as Box<dyn Any + Send + Sync>)
        });
        self.casts.push((TypeId::of::<C>(), type_name::<C>(), erased));
        self
    }

    /// Registers the [`PostConstruct`] hook of this bean
    #[inline]
    pub fn post_construct(&mut self) -> &mut Self
    where
        T: PostConstruct
    {
        self.post_construct = Some(T::post_construct);
        self
    }

    /// Marks this bean as a plain value that has no injectable fields
    #[inline]
    pub fn opaque(&mut self) -> &mut Self {
        self.opaque = true;
        self
    }

    #[inline]
    pub(crate) fn is_opaque(&self) -> bool {
        self.opaque
    }

    #[inline]
    pub(crate) fn fields(&self) -> &[FieldSpec<T>] {
        &self.fields
    }

    /// Erases the table into a [`BeanType`]
    pub(crate) fn into_type(self) -> BeanType {
        let Descriptor { fields, casts, post_construct, opaque } = self;

        let mut capabilities: HashMap<TypeId, (&'static str, CastFn)> = casts
            .into_iter()
            .map(|(id, name, cast)| (id, (name, cast)))
            .collect();
        capabilities.entry(TypeId::of::<T>()).or_insert_with(|| {
            let cast: CastFn = Arc::new(|bean: &BeanRef| {
                let bean = Arc::clone(bean).downcast::<T>().ok()?;
                Some(Box::new(bean) as Box<dyn Any + Send + Sync>)
            });
            (type_name::<T>(), cast)
        });

        let inject = (!opaque).then(|| {
            let inject: InjectFn = Arc::new(move |bean: &BeanRef, resolve: &dyn Resolve| {
                let target = (**bean)
                    .downcast_ref::<T>()
                    .ok_or(Error::UnsupportedTarget(type_name::<T>()))?;
                injector::inject_fields(target, &fields, resolve, Filled::Keep)
            });
            inject
        });

        let post_construct = post_construct.map(|hook| {
            let hook: HookFn = Arc::new(move |bean: &BeanRef| match (**bean).downcast_ref::<T>() {
                Some(target) => hook(target),
                None => Err(format!("instance is not a {}", type_name::<T>()).into()),
            });
            hook
        });

        let full_name = type_name::<T>();
        BeanType {
            type_id: TypeId::of::<T>(),
            type_name: full_name,
            short_name: short_type_name(full_name),
            capabilities,
            inject,
            post_construct,
        }
    }
}

/// The declared type of a bean: its identity and its erased metadata table
pub(crate) struct BeanType {
    type_id: TypeId,
    type_name: &'static str,
    short_name: &'static str,
    capabilities: HashMap<TypeId, (&'static str, CastFn)>,
    inject: Option<InjectFn>,
    post_construct: Option<HookFn>,
}

impl Debug for BeanType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut capabilities = self.capabilities
            .values()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>();
        capabilities.sort_unstable();
        f.debug_struct("BeanType")
            .field("type_name", &self.type_name)
            .field("capabilities", &capabilities)
            .field("record", &self.inject.is_some())
            .field("post_construct", &self.post_construct.is_some())
            .finish()
    }
}

impl BeanType {
    /// Describes and erases `T`
    #[inline]
    pub(crate) fn of<T: Bean>() -> Arc<Self> {
        Arc::new(Descriptor::<T>::of().into_type())
    }

    #[inline]
    pub(crate) fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub(crate) fn short_name(&self) -> &'static str {
        self.short_name
    }

    #[inline]
    pub(crate) fn provides(&self, capability: TypeId) -> bool {
        self.capabilities.contains_key(&capability)
    }

    #[inline]
    pub(crate) fn is_record(&self) -> bool {
        self.inject.is_some()
    }

    #[inline]
    pub(crate) fn has_post_construct(&self) -> bool {
        self.post_construct.is_some()
    }

    pub(crate) fn cast<C: ?Sized + 'static>(&self, bean: &BeanRef) -> Option<Arc<C>> {
        let (_, cast) = self.capabilities.get(&TypeId::of::<C>())?;
        cast(bean)?
            .downcast::<Arc<C>>()
            .ok()
            .map(|boxed| *boxed)
    }

    /// Runs the field injector against `bean`
    pub(crate) fn inject(&self, bean: &BeanRef, resolve: &dyn Resolve) -> Result<(), Error> {
        match &self.inject {
            Some(inject) => inject(bean, resolve),
            None => Err(Error::UnsupportedTarget(self.type_name)),
        }
    }

    /// Runs the post-construct hook, if there is one
    pub(crate) fn post_construct(&self, bean: &BeanRef) -> Option<Result<(), BoxError>> {
        self.post_construct
            .as_ref()
            .map(|hook| hook(bean))
    }
}

/// A live bean instance together with its name and declared type.
///
/// Cloning is cheap and keeps pointing to the same object.
#[derive(Clone)]
pub struct Instance {
    name: Arc<str>,
    value: BeanRef,
    ty: Arc<BeanType>,
}

impl Debug for Instance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("name", &self.name)
            .field("type", &self.ty.type_name())
            .finish()
    }
}

impl Instance {
    #[inline]
    pub(crate) fn new(name: Arc<str>, value: BeanRef, ty: Arc<BeanType>) -> Self {
        Self { name, value, ty }
    }

    /// Name of the bean this instance belongs to
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full type name of the instance
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ty.type_name()
    }

    /// Returns the concrete object if it is a `T`
    #[inline]
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.value)
            .downcast::<T>()
            .ok()
    }

    /// Returns the object viewed as the capability `C`
    /// (either its concrete type or a declared `dyn Trait`)
    #[inline]
    pub fn cast<C: ?Sized + 'static>(&self) -> Option<Arc<C>> {
        self.ty.cast::<C>(&self.value)
    }

    /// Returns `true` if the object can be viewed as `C`
    #[inline]
    pub fn provides<C: ?Sized + 'static>(&self) -> bool {
        self.ty.provides(TypeId::of::<C>())
    }

    /// Returns `true` if both handles point to the same object
    #[inline]
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }

    #[inline]
    pub(crate) fn value(&self) -> &BeanRef {
        &self.value
    }

    #[inline]
    pub(crate) fn bean_type(&self) -> &BeanType {
        &self.ty
    }
}

/// Strips the module path and the generic arguments from a type name
pub(crate) fn short_type_name(full_name: &'static str) -> &'static str {
    let base = full_name
        .split('<')
        .next()
        .unwrap_or(full_name);
    base.rsplit("::")
        .next()
        .unwrap_or(base)
}

/// A `value_beans!` macro that implements [`Bean`] for plain value types
/// (configuration structs, strings, numbers) that have no injectable fields.
///
/// Injecting into such a bean fails with [`Error::UnsupportedTarget`],
/// and the container skips the injection step for it during startup.
///
/// # Example
/// ```ignore
/// use ioc::{value_beans, Container, Scope};
///
/// #[derive(Default)]
/// struct AppConfig {
///     max_products: usize,
/// }
///
/// value_beans! {
///     AppConfig
/// };
///
/// let container = Container::new();
/// container.register("config", AppConfig { max_products: 10 }, Scope::Singleton)?;
/// ```
#[macro_export]
macro_rules! value_beans {
    ($($name:ident)*) => {
        $(impl $crate::Bean for $name {
            #[inline]
            fn describe(descriptor: &mut $crate::Descriptor<Self>) {
                descriptor.opaque();
            }
        })*
    };
}

value_beans! {
    String
    bool
    char
    i8 i16 i32 i64 i128 isize
    u8 u16 u32 u64 u128 usize
    f32 f64
}
