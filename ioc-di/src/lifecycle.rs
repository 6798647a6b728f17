//! Startup state machine, instance creation and circular dependency detection

use crate::{
    bean::Instance,
    container::Container,
    error::Error,
    injector::Resolve,
    resolver,
    scope::Scope
};
use std::{
    any::TypeId,
    cell::RefCell,
    fmt::{self, Display, Formatter}
};

/// Startup phase of a [`Container`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Beans can be registered, nothing can be retrieved yet
    #[default]
    NotInitialized,

    /// Singletons are being created and wired
    InjectionPhase,

    /// Post-construct hooks are running
    PostConstructPhase,

    /// All singletons are ready
    Initialized,
}

impl Display for Phase {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Phase::NotInitialized => f.write_str("not initialized"),
            Phase::InjectionPhase => f.write_str("injection"),
            Phase::PostConstructPhase => f.write_str("post-construct"),
            Phase::Initialized => f.write_str("initialized"),
        }
    }
}

thread_local! {
    static RESOLVING: RefCell<Vec<(usize, String)>> = const { RefCell::new(Vec::new()) };
}

/// Keeps a bean on the resolution path of the current thread while it is being created
#[derive(Debug)]
pub(crate) struct ResolutionGuard {
    container: usize,
    bean: String,
}

impl ResolutionGuard {
    /// Pushes `bean` onto the resolution path of `container`,
    /// failing if it is already there.
    pub(crate) fn enter(container: usize, bean: &str) -> Result<Self, Error> {
        RESOLVING.with_borrow_mut(|path| {
            let start = path
                .iter()
                .position(|(id, name)| *id == container && name == bean);
            if let Some(start) = start {
                let mut cycle = path[start..]
                    .iter()
                    .filter(|(id, _)| *id == container)
                    .map(|(_, name)| name.clone())
                    .collect::<Vec<_>>();
                cycle.push(bean.into());
                return Err(Error::CircularDependency { bean: bean.into(), path: cycle });
            }
            path.push((container, bean.into()));
            Ok(Self { container, bean: bean.into() })
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLVING.with_borrow_mut(|path| {
            let entry = path
                .iter()
                .rposition(|(id, name)| *id == self.container && *name == self.bean);
            if let Some(entry) = entry {
                path.remove(entry);
            }
        });
    }
}

/// Resolves field dependencies through the public retrieval path of a container
#[derive(Debug)]
pub(crate) struct Lookup<'a> {
    container: &'a Container,
}

impl<'a> Lookup<'a> {
    #[inline]
    pub(crate) fn new(container: &'a Container) -> Self {
        Self { container }
    }
}

impl Resolve for Lookup<'_> {
    #[inline]
    fn by_name(&self, name: &str) -> Result<Instance, Error> {
        self.container.get_safe(name)
    }

    fn by_capability(&self, capability: TypeId, capability_name: &'static str) -> Result<Instance, Error> {
        let name = {
            let state = self.container.read();
            if state.phase == Phase::NotInitialized {
                return Err(Error::ContainerNotReady);
            }
            let created_only = state.phase == Phase::InjectionPhase;
            resolver::by_capability(&state.registry, capability, capability_name, created_only)?
                .name()
                .to_owned()
        };
        self.container.get_safe(&name)
    }
}

impl Container {
    /// Initializes the container: creates and wires every singleton,
    /// then runs their post-construct hooks.
    ///
    /// Succeeds at most once. On failure the container goes back to
    /// [`Phase::NotInitialized`], keeping the instances that were already created.
    pub fn init(&self) -> Result<(), Error> {
        let singletons = {
            let mut state = self.write();
            if state.phase != Phase::NotInitialized {
                #[cfg(feature = "tracing")]
                tracing::warn!(phase = %state.phase, "container already initialized");
                return Err(Error::AlreadyInitialized);
            }

            #[cfg(feature = "tracing")]
            tracing::info!(beans = state.registry.len(), "initializing container");

            state.phase = Phase::InjectionPhase;
            state.registry.singletons()
        };

        let result = self.run_phases(&singletons);

        let mut state = self.write();
        match result {
            Ok(()) => {
                state.phase = Phase::Initialized;

                #[cfg(feature = "tracing")]
                tracing::info!(beans = state.registry.len(), "container initialized");

                Ok(())
            }
            Err(err) => {
                state.phase = Phase::NotInitialized;

                #[cfg(feature = "tracing")]
                tracing::error!(error = %err, "container initialization failed");

                Err(err)
            }
        }
    }

    fn run_phases(&self, singletons: &[String]) -> Result<(), Error> {
        #[cfg(feature = "tracing")]
        tracing::info!(phase = %Phase::InjectionPhase, "entering phase");

        for name in singletons {
            self.ensure_created(name)?;
        }
        for name in singletons {
            self.ensure_injected(name)?;
        }

        self.write().phase = Phase::PostConstructPhase;

        #[cfg(feature = "tracing")]
        tracing::info!(phase = %Phase::PostConstructPhase, "entering phase");

        for name in singletons {
            self.ensure_initialized(name)?;
        }
        Ok(())
    }

    /// Resolves a bean while singletons are being wired
    pub(crate) fn resolve_during_injection(&self, name: &str) -> Result<Instance, Error> {
        let scope = {
            let state = self.read();
            let definition = resolver::by_name(&state.registry, name)?;
            if definition.is_injected()
                && let Some(instance) = definition.instance() {
                return Ok(instance);
            }
            definition.scope()
        };
        match scope {
            Scope::Singleton => self.ensure_injected(name),
            Scope::Prototype => self.create_prototype(name),
        }
    }

    /// Creates a new instance of a prototype: create, inject, post-construct.
    /// The instance is never stored.
    pub(crate) fn create_prototype(&self, name: &str) -> Result<Instance, Error> {
        let _guard = ResolutionGuard::enter(self.id(), name)?;
        let definition = self.read().registry.get(name)?.clone();

        #[cfg(feature = "tracing")]
        tracing::debug!(bean = name, "creating prototype instance");

        let value = definition
            .source()
            .create()
            .map_err(|source| Error::FactoryError { bean: name.into(), source })?;
        let instance = definition.wrap(value);

        self.wire(&instance)?;
        self.post_construct(&instance)?;
        Ok(instance)
    }

    /// Creates the singleton instance of a bean unless it already exists
    fn ensure_created(&self, name: &str) -> Result<Instance, Error> {
        let _guard = ResolutionGuard::enter(self.id(), name)?;
        self.create_singleton(name)
    }

    /// Creates and wires a singleton unless it has already been wired
    fn ensure_injected(&self, name: &str) -> Result<Instance, Error> {
        {
            let state = self.read();
            let definition = state.registry.get(name)?;
            if definition.is_injected()
                && let Some(instance) = definition.instance() {
                return Ok(instance);
            }
        }

        let _guard = ResolutionGuard::enter(self.id(), name)?;
        let instance = self.create_singleton(name)?;
        self.wire(&instance)?;

        self.write().registry.get_mut(name)?.mark_injected();
        Ok(instance)
    }

    /// Runs the post-construct hook of a singleton unless it has already run
    fn ensure_initialized(&self, name: &str) -> Result<(), Error> {
        let ready = {
            let state = self.read();
            let definition = state.registry.get(name)?;
            if definition.is_initialized() {
                return Ok(());
            }
            definition
                .instance()
                .filter(|_| definition.is_injected())
        };
        let instance = match ready {
            Some(instance) => instance,
            None => self.ensure_injected(name)?,
        };

        self.post_construct(&instance)?;

        self.write().registry.get_mut(name)?.mark_initialized();
        Ok(())
    }

    /// Creates the singleton instance without touching the resolution path.
    ///
    /// The factory runs without holding the lock. If another thread stored
    /// an instance in the meantime, that one wins.
    fn create_singleton(&self, name: &str) -> Result<Instance, Error> {
        let source = {
            let state = self.read();
            let definition = state.registry.get(name)?;
            if let Some(instance) = definition.instance() {
                return Ok(instance);
            }
            definition.source().clone()
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(bean = name, "creating singleton instance");

        let value = source
            .create()
            .map_err(|source| Error::FactoryError { bean: name.into(), source })?;

        let mut state = self.write();
        Ok(state.registry.get_mut(name)?.set_instance(value))
    }

    /// Injects the fields of a record bean
    fn wire(&self, instance: &Instance) -> Result<(), Error> {
        let bean_type = instance.bean_type();
        if !bean_type.is_record() {
            return Ok(());
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(bean = instance.name(), "injecting dependencies");

        bean_type
            .inject(instance.value(), &Lookup::new(self))
            .map_err(|err| err.in_bean(instance.name()))
    }

    fn post_construct(&self, instance: &Instance) -> Result<(), Error> {
        let Some(result) = instance.bean_type().post_construct(instance.value()) else {
            return Ok(());
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(bean = instance.name(), "post-construct hook called");

        result.map_err(|source| Error::PostConstructError {
            bean: instance.name().into(),
            source,
        })
    }
}
