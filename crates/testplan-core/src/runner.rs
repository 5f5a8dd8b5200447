//! Runner
//!
//! Instantiates a test class, plans it and executes the plan against the new
//! instance. Every failure comes back as one [`RunError`] naming the class,
//! with the underlying cause reachable through `source()`.

use crate::class::{TestClass, TestSuite};
use crate::config::EngineConfig;
use crate::error::{ConstructionError, RunError};
use crate::planner::Planner;
use crate::registry::HandlerFactory;
use serde::Serialize;
use std::fmt;
use std::time::Instant;

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Class name
    pub class: String,
    /// Steps in the plan
    pub steps_planned: usize,
    /// Steps run
    pub steps_executed: usize,
    /// Wall-clock time for construction, planning and execution
    pub elapsed_ms: u64,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}/{} steps passed in {}ms",
            self.class, self.steps_executed, self.steps_planned, self.elapsed_ms
        )
    }
}

/// Runs test classes
pub struct Runner<T> {
    planner: Planner<T>,
}

impl<T: 'static> Runner<T> {
    /// Runner with the built-in handlers and default configuration
    #[must_use]
    pub fn new() -> Self {
        Self {
            planner: Planner::new(),
        }
    }

    /// Runner with the built-in handlers
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            planner: Planner::with_config(config),
        }
    }

    /// Runner around an existing planner
    #[must_use]
    pub fn with_planner(planner: Planner<T>) -> Self {
        Self { planner }
    }

    /// Add a handler after the built-ins
    #[must_use]
    pub fn with_handler(self, factory: HandlerFactory<T>) -> Self {
        Self {
            planner: self.planner.with_handler(factory),
        }
    }

    /// Planner used for each run
    #[inline]
    #[must_use]
    pub fn planner(&self) -> &Planner<T> {
        &self.planner
    }

    /// Instantiate, plan and execute `class`
    ///
    /// # Errors
    /// - [`RunError::Construction`] when the class has no constructor or it fails
    /// - [`RunError::Planning`] when planning fails
    /// - [`RunError::Execution`] when a step fails
    pub fn run(&self, class: &TestClass<T>) -> Result<RunReport, RunError> {
        let start = Instant::now();
        let name = class.name().to_string();

        let result = self.run_inner(class, &name);
        match &result {
            Ok((_, executed)) => tracing::info!("{} passed: {} step(s)", name, executed),
            Err(e) => tracing::error!("{} failed: {}", name, error_chain(e)),
        }

        let (planned, executed) = result?;
        Ok(RunReport {
            class: name,
            steps_planned: planned,
            steps_executed: executed,
            elapsed_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        })
    }

    fn run_inner(&self, class: &TestClass<T>, name: &str) -> Result<(usize, usize), RunError> {
        let mut instance = match class.instantiate() {
            Some(Ok(instance)) => instance,
            Some(Err(source)) => {
                return Err(RunError::Construction {
                    class: name.to_string(),
                    source: ConstructionError::ClassInstantiation {
                        class: name.to_string(),
                        source,
                    },
                })
            }
            None => {
                return Err(RunError::Construction {
                    class: name.to_string(),
                    source: ConstructionError::MissingConstructor {
                        class: name.to_string(),
                    },
                })
            }
        };

        let plan = self.planner.plan(class).map_err(|source| RunError::Planning {
            class: name.to_string(),
            source,
        })?;

        let summary = plan.execute(&mut instance).map_err(|source| RunError::Execution {
            class: name.to_string(),
            source,
        })?;
        Ok((plan.len(), summary.steps_executed))
    }
}

impl<S: TestSuite> Runner<S> {
    /// Run the class `S` describes
    ///
    /// # Errors
    /// See [`Runner::run`].
    pub fn run_suite(&self) -> Result<RunReport, RunError> {
        self.run(&S::test_class())
    }
}

impl<T: 'static> Default for Runner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Runner<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner").field("planner", &self.planner).finish()
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Run `class` with the built-in handlers and default configuration
///
/// # Errors
/// See [`Runner::run`].
pub fn run_tests<T: 'static>(class: &TestClass<T>) -> Result<RunReport, RunError> {
    Runner::new().run(class)
}

/// Run the class a [`TestSuite`] type describes, with default configuration
///
/// # Errors
/// See [`Runner::run`].
pub fn run_suite<S: TestSuite>() -> Result<RunReport, RunError> {
    Runner::<S>::new().run_suite()
}
