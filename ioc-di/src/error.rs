//! Describes dependency injection errors

use std::{
    error::Error as StdError,
    fmt::{self, Display, Formatter}
};

/// A boxed error produced by user code (factories and post-construct hooks)
pub type BoxError = Box<
    dyn StdError
    + Send
    + Sync
>;

/// Errors reported by the container
#[derive(Debug)]
pub enum Error {
    /// A bean with the same name is already registered
    DuplicateName(String),

    /// A required registration input is empty
    NilInput(&'static str),

    /// A bean name uses the reserved category separator
    InvalidName(String),

    /// The container has already been initialized (or is being initialized)
    AlreadyInitialized,

    /// The container has not been initialized yet
    ContainerNotReady,

    /// There is no bean with this name
    BeanNotFound(String),

    /// No bean provides the requested capability
    NoCandidate(&'static str),

    /// More than one bean provides the requested capability
    AmbiguousCandidate {
        /// Requested capability
        capability: &'static str,
        /// Names of all the matching beans
        candidates: Vec<String>,
    },

    /// The resolved bean can't be viewed as the requested capability
    CapabilityMismatch {
        /// Name of the resolved bean
        bean: String,
        /// Requested capability
        capability: &'static str,
    },

    /// The field already holds a different instance
    UnassignableField(&'static str),

    /// The target is not a record-like type and has no injectable fields
    UnsupportedTarget(&'static str),

    /// A bean factory returned an error
    FactoryError {
        /// Bean that was being created
        bean: String,
        /// Error returned by the factory
        source: BoxError,
    },

    /// The bean is already being created on the current resolution path
    CircularDependency {
        /// Bean that was re-entered
        bean: String,
        /// Resolution path, starting and ending with `bean`
        path: Vec<String>,
    },

    /// A post-construct hook returned an error
    PostConstructError {
        /// Bean whose hook failed
        bean: String,
        /// Error returned by the hook
        source: BoxError,
    },

    /// An error that happened while wiring a bean
    Bean {
        /// Bean that was being wired
        bean: String,
        /// Underlying error
        source: Box<Error>,
    },

    /// An error that happened while injecting a field
    Field {
        /// Field that was being injected
        field: &'static str,
        /// Underlying error
        source: Box<Error>,
    },
}

/// Kind of [`Error`], regardless of how deep it has been wrapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::DuplicateName`]
    DuplicateName,
    /// See [`Error::NilInput`]
    NilInput,
    /// See [`Error::InvalidName`]
    InvalidName,
    /// See [`Error::AlreadyInitialized`]
    AlreadyInitialized,
    /// See [`Error::ContainerNotReady`]
    ContainerNotReady,
    /// See [`Error::BeanNotFound`]
    BeanNotFound,
    /// See [`Error::NoCandidate`]
    NoCandidate,
    /// See [`Error::AmbiguousCandidate`]
    AmbiguousCandidate,
    /// See [`Error::CapabilityMismatch`]
    CapabilityMismatch,
    /// See [`Error::UnassignableField`]
    UnassignableField,
    /// See [`Error::UnsupportedTarget`]
    UnsupportedTarget,
    /// See [`Error::FactoryError`]
    FactoryError,
    /// See [`Error::CircularDependency`]
    CircularDependency,
    /// See [`Error::PostConstructError`]
    PostConstructError,
}

impl Error {
    /// Returns the kind of the root cause, looking through the bean and field context
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DuplicateName(_) => ErrorKind::DuplicateName,
            Error::NilInput(_) => ErrorKind::NilInput,
            Error::InvalidName(_) => ErrorKind::InvalidName,
            Error::AlreadyInitialized => ErrorKind::AlreadyInitialized,
            Error::ContainerNotReady => ErrorKind::ContainerNotReady,
            Error::BeanNotFound(_) => ErrorKind::BeanNotFound,
            Error::NoCandidate(_) => ErrorKind::NoCandidate,
            Error::AmbiguousCandidate { .. } => ErrorKind::AmbiguousCandidate,
            Error::CapabilityMismatch { .. } => ErrorKind::CapabilityMismatch,
            Error::UnassignableField(_) => ErrorKind::UnassignableField,
            Error::UnsupportedTarget(_) => ErrorKind::UnsupportedTarget,
            Error::FactoryError { .. } => ErrorKind::FactoryError,
            Error::CircularDependency { .. } => ErrorKind::CircularDependency,
            Error::PostConstructError { .. } => ErrorKind::PostConstructError,
            Error::Bean { source, .. } | Error::Field { source, .. } => source.kind(),
        }
    }

    /// Returns the innermost bean name this error refers to, if any
    pub fn bean(&self) -> Option<&str> {
        match self {
            Error::Bean { bean, source } => source.bean().or(Some(bean.as_str())),
            Error::Field { source, .. } => source.bean(),
            Error::DuplicateName(bean)
            | Error::InvalidName(bean)
            | Error::BeanNotFound(bean)
            | Error::CapabilityMismatch { bean, .. }
            | Error::FactoryError { bean, .. }
            | Error::CircularDependency { bean, .. }
            | Error::PostConstructError { bean, .. } => Some(bean.as_str()),
            _ => None,
        }
    }

    /// Returns `true` if this error means that a dependency is simply absent
    /// and may be skipped for an optional field
    #[inline]
    pub(crate) fn is_skippable(&self) -> bool {
        self.kind() != ErrorKind::CircularDependency
    }

    #[inline]
    pub(crate) fn in_bean(self, bean: &str) -> Self {
        Error::Bean { bean: bean.into(), source: Box::new(self) }
    }

    #[inline]
    pub(crate) fn in_field(self, field: &'static str) -> Self {
        Error::Field { field, source: Box::new(self) }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::DuplicateName(name) => write!(f, "bean with name '{name}' already exists"),
            Error::NilInput(what) => write!(f, "missing registration input: {what}"),
            Error::InvalidName(name) => write!(f, "invalid bean name '{name}': ':' is reserved for categories"),
            Error::AlreadyInitialized => write!(f, "container already initialized"),
            Error::ContainerNotReady => write!(f, "container not initialized, call init() first"),
            Error::BeanNotFound(name) => write!(f, "bean with name '{name}' not found"),
            Error::NoCandidate(capability) => write!(f, "no bean candidate found for {capability}"),
            Error::AmbiguousCandidate { capability, candidates } => write!(
                f,
                "multiple bean candidates found for {capability}: {}",
                candidates.join(", ")
            ),
            Error::CapabilityMismatch { bean, capability } => write!(f, "bean '{bean}' does not provide {capability}"),
            Error::UnassignableField(field) => write!(f, "field '{field}' already holds a different instance"),
            Error::UnsupportedTarget(type_name) => write!(f, "can only inject into record types, got {type_name}"),
            Error::FactoryError { bean, source } => write!(f, "error creating instance for bean '{bean}': {source}"),
            Error::CircularDependency { bean, path } => write!(
                f,
                "circular dependency detected for bean '{bean}': {}",
                path.join(" -> ")
            ),
            Error::PostConstructError { bean, source } => write!(f, "error initializing bean '{bean}': {source}"),
            Error::Bean { bean, source } => write!(f, "error wiring bean '{bean}': {source}"),
            Error::Field { field, source } => write!(f, "error injecting field '{field}': {source}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::FactoryError { source, .. } | Error::PostConstructError { source, .. } => Some(source.as_ref()),
            Error::Bean { source, .. } | Error::Field { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};
    use std::error::Error as StdError;

    #[test]
    fn it_formats_circular_dependency() {
        let err = Error::CircularDependency {
            bean: "a".into(),
            path: vec!["a".into(), "b".into(), "a".into()],
        };

        assert_eq!(err.to_string(), "circular dependency detected for bean 'a': a -> b -> a");
    }

    #[test]
    fn it_looks_through_context_for_kind() {
        let err = Error::BeanNotFound("repo".into())
            .in_field("repo")
            .in_bean("service");

        assert_eq!(err.kind(), ErrorKind::BeanNotFound);
        assert_eq!(err.bean(), Some("repo"));
        assert_eq!(
            err.to_string(),
            "error wiring bean 'service': error injecting field 'repo': bean with name 'repo' not found"
        );
    }

    #[test]
    fn it_reports_outer_bean_when_root_has_none() {
        let err = Error::NoCandidate("dyn Cache")
            .in_field("cache")
            .in_bean("service");

        assert_eq!(err.kind(), ErrorKind::NoCandidate);
        assert_eq!(err.bean(), Some("service"));
    }

    #[test]
    fn it_exposes_factory_cause_as_source() {
        let err = Error::FactoryError {
            bean: "db".into(),
            source: "connection refused".into(),
        };

        assert_eq!(err.source().unwrap().to_string(), "connection refused");
        assert_eq!(err.to_string(), "error creating instance for bean 'db': connection refused");
    }

    #[test]
    fn it_never_skips_circular_dependency() {
        let cycle = Error::CircularDependency { bean: "a".into(), path: vec![] }.in_bean("b");
        let missing = Error::BeanNotFound("a".into());

        assert!(!cycle.is_skippable());
        assert!(missing.is_skippable());
    }
}
