//! testplan core - annotation-driven test orchestration
//!
//! A test class declares methods carrying lifecycle markers (`@BeforeSuite`,
//! `@BeforeTest`, `@Test`, `@AfterTest`, `@AfterSuite`, `@CsvSource`). The
//! engine:
//! - Discovers one handler per marker category
//! - Validates and registers each marked method with its handler
//! - Collects executable steps from the handlers into an ordered [`Plan`]
//! - Executes the plan against a fresh instance of the class
//!
//! # Example
//!
//! ```rust
//! use testplan_core::prelude::*;
//!
//! #[derive(Default)]
//! struct Calculator {
//!     total: i32,
//! }
//!
//! let class = TestClass::new("Calculator")
//!     .with_default_constructor()
//!     .with_method(
//!         MethodDecl::instance("add", |c: &mut Calculator, args| {
//!             c.total += args.get::<i32>(0)? + args.get::<i32>(1)?;
//!             Ok(())
//!         })
//!         .params([ParamType::Int, ParamType::Int])
//!         .marked(Marker::test())
//!         .marked(Marker::csv("2, 3")),
//!     );
//!
//! let report = run_tests(&class)?;
//! assert_eq!(report.steps_executed, 1);
//! # Ok::<(), testplan_core::RunError>(())
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod capability;
pub mod class;
pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod marker;
pub mod plan;
pub mod planner;
pub mod registry;
pub mod runner;
pub mod value;

// Re-exports for convenience
pub use capability::{AnnotationHandler, ArgumentProvider, StepContributor};
pub use class::{
    MethodBody, MethodDecl, MethodId, MethodRef, MethodResult, TestClass, TestMethod, TestSuite,
};
pub use config::{EngineConfig, StepOrdering};
pub use context::{ContextKey, RunContext, ARGUMENT_PROVIDERS};
pub use error::{
    BoxError, ConfigError, ConstructionError, ExecutionError, PlanError, RegistrationError,
    RunError,
};
pub use marker::{Marker, MarkerCategory, DEFAULT_PRIORITY, MAX_PRIORITY, MIN_PRIORITY};
pub use plan::{ExecutionSummary, Phase, Plan, PlanStep};
pub use planner::{plan, Planner};
pub use registry::{HandlerFactory, HandlerRegistry};
pub use runner::{run_suite, run_tests, RunReport, Runner};
pub use value::{ArgError, ArgValue, Args, FromArg, ParamType};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for declaring and running test classes
    pub use crate::{
        plan, run_suite, run_tests, ArgValue, Args, EngineConfig, Marker, MethodDecl, ParamType,
        Plan, Planner, RunReport, Runner, StepOrdering, TestClass, TestSuite,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[derive(Default)]
    struct Journal {
        entries: Vec<String>,
    }

    fn log(
        name: &'static str,
    ) -> impl Fn(&mut Journal, &Args) -> MethodResult + Send + Sync + 'static {
        move |j: &mut Journal, _: &Args| {
            j.entries.push(name.to_string());
            Ok(())
        }
    }

    #[test]
    fn full_flow() {
        let class = TestClass::new("Journal")
            .with_default_constructor()
            .with_method(MethodDecl::associated("open", |_| Ok(())).marked(Marker::BeforeSuite))
            .with_method(MethodDecl::instance("prepare", log("prepare")).marked(Marker::BeforeTest))
            .with_method(MethodDecl::instance("write", log("write")).marked(Marker::test()));

        let plan = plan(&class).unwrap();
        assert_eq!(plan.labels(), vec!["open", "prepare", "write"]);

        let mut journal = Journal::default();
        plan.execute(&mut journal).unwrap();
        assert_eq!(journal.entries, vec!["prepare", "write"]);
    }

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
