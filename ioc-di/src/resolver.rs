//! Finds bean definitions by name or by capability

use crate::{
    error::Error,
    registry::{BeanDefinition, Registry}
};
use std::any::TypeId;

/// Finds a bean by its exact name
#[inline]
pub(crate) fn by_name<'a>(registry: &'a Registry, name: &str) -> Result<&'a BeanDefinition, Error> {
    registry.get(name)
}

/// Finds the only bean that provides `capability`.
///
/// With `created_only` set, beans without an instance are not considered.
pub(crate) fn by_capability<'a>(
    registry: &'a Registry,
    capability: TypeId,
    capability_name: &'static str,
    created_only: bool
) -> Result<&'a BeanDefinition, Error> {
    let mut candidates = registry
        .iter()
        .filter(|definition| definition.provides_id(capability))
        .filter(|definition| !created_only || definition.has_instance());

    let Some(first) = candidates.next() else {
        return Err(Error::NoCandidate(capability_name));
    };
    let rest = candidates.collect::<Vec<_>>();
    if rest.is_empty() {
        return Ok(first);
    }

    let mut names = std::iter::once(first)
        .chain(rest)
        .map(|definition| definition.name().to_owned())
        .collect::<Vec<_>>();
    names.sort_unstable();
    Err(Error::AmbiguousCandidate { capability: capability_name, candidates: names })
}
