//! Fills the injected fields of a target

use crate::{
    bean::Instance,
    error::Error,
    inject::{FieldSpec, Target}
};
use std::any::TypeId;

/// Source of dependencies for the field injector
pub(crate) trait Resolve {
    /// Resolves a bean by its exact name
    fn by_name(&self, name: &str) -> Result<Instance, Error>;

    /// Resolves the only bean that provides a capability
    fn by_capability(&self, capability: TypeId, capability_name: &'static str) -> Result<Instance, Error>;
}

/// What to do with a field whose slot is already filled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Filled {
    /// Keep the dependency, as when wiring resumes after a failed startup
    Keep,

    /// Resolve it again; a different instance fails with `UnassignableField`
    Resolve,
}

/// Injects every field of `target` described by `fields`.
///
/// An optional field whose dependency can't be resolved stays empty,
/// unless the failure is a circular dependency.
pub(crate) fn inject_fields<T>(
    target: &T,
    fields: &[FieldSpec<T>],
    resolve: &dyn Resolve,
    filled: Filled
) -> Result<(), Error> {
    for field in fields {
        if filled == Filled::Keep && field.is_filled(target) {
            #[cfg(feature = "tracing")]
            tracing::trace!(field = field.name(), "field already injected");
            continue;
        }

        let resolved = match field.target() {
            Target::Name(name) => resolve.by_name(name),
            Target::Capability(id, name) => resolve.by_capability(id, name),
        };
        let instance = match resolved {
            Ok(instance) => instance,
            Err(err) if field.is_optional() && err.is_skippable() => {
                #[cfg(feature = "tracing")]
                tracing::trace!(field = field.name(), error = %err, "optional dependency skipped");
                continue;
            }
            Err(err) => return Err(err.in_field(field.name())),
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(field = field.name(), bean = instance.name(), "injecting field");

        field
            .assign(target, &instance)
            .map_err(|err| err.in_field(field.name()))?;
    }
    Ok(())
}
