//! Error types for testplan
//!
//! Provides error handling for:
//! - Method registration (shape, multiplicity, priority, CSV arguments)
//! - Construction of handlers and test-class instances
//! - Plan execution
//! - Runner-level wrapping of all of the above

use crate::marker::MarkerCategory;
use crate::plan::Phase;
use crate::value::ParamType;

/// Boxed error returned by method bodies, constructors and factories
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A handler rejected a method
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// Second suite-scoped hook on the same class
    #[error("only one {marker} method is allowed: {method} (already registered: {existing})")]
    DuplicateSuiteHook {
        /// Hook category
        marker: MarkerCategory,
        /// Rejected method
        method: String,
        /// Method registered first
        existing: String,
    },

    /// Two markers of the same category on one method
    #[error("{marker} declared more than once on: {method}")]
    DuplicateMarker {
        /// Repeated category
        marker: MarkerCategory,
        /// Rejected method
        method: String,
    },

    /// Hook requires an associated function
    #[error("{marker} method must be static: {method}")]
    MustBeStatic {
        /// Hook category
        marker: MarkerCategory,
        /// Rejected method
        method: String,
    },

    /// Hook requires an instance method
    #[error("{marker} method must not be static: {method}")]
    MustNotBeStatic {
        /// Hook category
        marker: MarkerCategory,
        /// Rejected method
        method: String,
    },

    /// Hook must not declare parameters
    #[error("{marker} method must have no parameters: {method} declares {count}")]
    MustHaveNoParameters {
        /// Hook category
        marker: MarkerCategory,
        /// Rejected method
        method: String,
        /// Declared parameter count
        count: usize,
    },

    /// `@Test` priority outside the accepted range
    #[error("@Test priority must be between {min} and {max}: {method} declares {priority}")]
    PriorityOutOfRange {
        /// Rejected method
        method: String,
        /// Declared priority
        priority: i32,
        /// Lowest accepted priority
        min: i32,
        /// Highest accepted priority
        max: i32,
    },

    /// `@CsvSource` token count differs from the parameter count
    #[error(
        "@CsvSource values count ({values}) doesn't match method parameters count ({params}) \
         in: {method}"
    )]
    ArgumentCountMismatch {
        /// Rejected method
        method: String,
        /// Parsed token count
        values: usize,
        /// Declared parameter count
        params: usize,
    },

    /// `@CsvSource` cannot produce a value for this parameter type
    #[error("unsupported parameter type {ty} at position {index} in: {method}")]
    UnsupportedParameterType {
        /// Rejected method
        method: String,
        /// Parameter position
        index: usize,
        /// Declared type
        ty: ParamType,
    },

    /// `@CsvSource` token does not parse as the parameter type
    #[error("cannot convert {token:?} to {ty} at position {index} in: {method}: {reason}")]
    InvalidValue {
        /// Rejected method
        method: String,
        /// Parameter position
        index: usize,
        /// Raw token
        token: String,
        /// Declared type
        ty: ParamType,
        /// Parser message
        reason: String,
    },

    /// A handler was given a marker of another category
    #[error("{handler} handler cannot register {method} for marker {marker}")]
    MarkerMismatch {
        /// Category of the handler
        handler: MarkerCategory,
        /// Method being registered
        method: String,
        /// Marker that was passed
        marker: String,
    },
}

impl RegistrationError {
    /// Name of the rejected method
    #[must_use]
    pub fn method(&self) -> &str {
        match self {
            Self::DuplicateSuiteHook { method, .. }
            | Self::DuplicateMarker { method, .. }
            | Self::MustBeStatic { method, .. }
            | Self::MustNotBeStatic { method, .. }
            | Self::MustHaveNoParameters { method, .. }
            | Self::PriorityOutOfRange { method, .. }
            | Self::ArgumentCountMismatch { method, .. }
            | Self::UnsupportedParameterType { method, .. }
            | Self::InvalidValue { method, .. }
            | Self::MarkerMismatch { method, .. } => method,
        }
    }
}

/// Something could not be instantiated
#[derive(Debug, thiserror::Error)]
pub enum ConstructionError {
    /// A handler factory failed
    #[error("failed to instantiate handler: {handler}")]
    HandlerInstantiation {
        /// Factory name
        handler: String,
        /// Factory error
        #[source]
        source: BoxError,
    },

    /// The test class declares no no-argument constructor
    #[error("test class {class} has no no-argument constructor")]
    MissingConstructor {
        /// Class name
        class: String,
    },

    /// The test-class constructor failed
    #[error("failed to instantiate test class: {class}")]
    ClassInstantiation {
        /// Class name
        class: String,
        /// Constructor error
        #[source]
        source: BoxError,
    },
}

/// Planning failed; no plan was produced
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// A handler rejected a method
    #[error("registration failed: {0}")]
    Registration(#[from] RegistrationError),

    /// The handler registry could not be built
    #[error("registry construction failed: {0}")]
    Construction(#[from] ConstructionError),
}

/// A plan step failed; the remaining steps were not run
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// Step returned an error
    #[error("step execution failed")]
    StepFailed {
        /// Label of the failing step
        step: String,
        /// Lifecycle phase of the failing step
        phase: Phase,
        /// Error returned by the step
        #[source]
        source: BoxError,
    },
}

impl ExecutionError {
    /// Label of the failing step
    #[must_use]
    pub fn step(&self) -> &str {
        match self {
            Self::StepFailed { step, .. } => step,
        }
    }
}

/// Runner-level failure, one per run
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The test class could not be instantiated
    #[error("test execution failed: {class}")]
    Construction {
        /// Class name
        class: String,
        /// Cause
        #[source]
        source: ConstructionError,
    },

    /// The plan could not be built
    #[error("test execution failed: {class}")]
    Planning {
        /// Class name
        class: String,
        /// Cause
        #[source]
        source: PlanError,
    },

    /// A step failed during execution
    #[error("test execution failed: {class}")]
    Execution {
        /// Class name
        class: String,
        /// Cause
        #[source]
        source: ExecutionError,
    },
}

impl RunError {
    /// Name of the class whose run failed
    #[must_use]
    pub fn class(&self) -> &str {
        match self {
            Self::Construction { class, .. }
            | Self::Planning { class, .. }
            | Self::Execution { class, .. } => class,
        }
    }
}

/// Configuration could not be loaded
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// I/O error
        #[source]
        source: std::io::Error,
    },

    /// TOML did not match the schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn registration_messages() {
        let dup = RegistrationError::DuplicateSuiteHook {
            marker: MarkerCategory::SuiteSetup,
            method: "second".into(),
            existing: "first".into(),
        };
        assert!(dup.to_string().starts_with("only one @BeforeSuite method is allowed"));
        assert_eq!(dup.method(), "second");

        let not_static = RegistrationError::MustBeStatic {
            marker: MarkerCategory::SuiteTeardown,
            method: "cleanup".into(),
        };
        assert_eq!(not_static.to_string(), "@AfterSuite method must be static: cleanup");

        let repeated = RegistrationError::DuplicateMarker {
            marker: MarkerCategory::TestMethod,
            method: "twice".into(),
        };
        assert_eq!(repeated.to_string(), "@Test declared more than once on: twice");
        assert_eq!(repeated.method(), "twice");
    }

    #[test]
    fn run_error_keeps_cause_chain() {
        let boom: BoxError = "Boom".into();
        let err = RunError::Execution {
            class: "FailingTest".into(),
            source: ExecutionError::StepFailed {
                step: "test".into(),
                phase: Phase::Test,
                source: boom,
            },
        };

        assert_eq!(err.to_string(), "test execution failed: FailingTest");
        let step = err.source().unwrap();
        assert_eq!(step.to_string(), "step execution failed");
        let root = step.source().unwrap();
        assert_eq!(root.to_string(), "Boom");
    }
}
