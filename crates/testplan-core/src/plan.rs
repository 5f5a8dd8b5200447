//! Execution plans
//!
//! A [`Plan`] is the ordered, immutable list of [`PlanStep`]s produced for
//! one test class. It is bound to no instance; [`Plan::execute`] runs it
//! against one.
//!
//! # Failure semantics
//!
//! Execution stops at the first failing step. There is no per-test
//! isolation: a failing `@BeforeTest` step prevents the test it precedes and
//! every step after it.

use crate::class::{MethodRef, MethodResult};
use crate::error::ExecutionError;
use crate::value::Args;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Lifecycle slot a step belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Once, before all tests
    SuiteSetup,
    /// Before each test
    TestSetup,
    /// The test itself
    Test,
    /// After each test
    TestTeardown,
    /// Once, after all tests
    SuiteTeardown,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SuiteSetup => "suite-setup",
            Self::TestSetup => "test-setup",
            Self::Test => "test",
            Self::TestTeardown => "test-teardown",
            Self::SuiteTeardown => "suite-teardown",
        };
        f.write_str(name)
    }
}

/// Action performed by a step
pub type StepAction<T> = Arc<dyn Fn(&mut T) -> MethodResult + Send + Sync>;

/// One invokable unit of a plan
pub struct PlanStep<T> {
    phase: Phase,
    label: String,
    action: StepAction<T>,
}

impl<T> PlanStep<T> {
    /// Step from an arbitrary action
    pub fn new<F>(phase: Phase, label: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut T) -> MethodResult + Send + Sync + 'static,
    {
        Self {
            phase,
            label: label.into(),
            action: Arc::new(action),
        }
    }

    /// Step calling `method` with arguments resolved at plan-build time
    #[must_use]
    pub fn invoke(phase: Phase, method: MethodRef<T>, args: Args) -> Self
    where
        T: 'static,
    {
        let label = method.name().to_string();
        Self::new(phase, label, move |instance: &mut T| method.invoke(instance, &args))
    }

    /// Lifecycle slot
    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Human-readable label (the method name for built-in steps)
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run the step against `instance`
    ///
    /// # Errors
    /// Whatever the action returns.
    pub fn execute(&self, instance: &mut T) -> MethodResult {
        (self.action)(instance)
    }
}

impl<T> Clone for PlanStep<T> {
    fn clone(&self) -> Self {
        Self {
            phase: self.phase,
            label: self.label.clone(),
            action: Arc::clone(&self.action),
        }
    }
}

impl<T> fmt::Debug for PlanStep<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanStep")
            .field("phase", &self.phase)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for PlanStep<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.phase, self.label)
    }
}

/// Outcome of a successful plan execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExecutionSummary {
    /// Steps run
    pub steps_executed: usize,
    /// Wall-clock time in milliseconds
    pub execution_time_ms: u64,
}

/// Ordered, immutable sequence of steps
pub struct Plan<T> {
    steps: Vec<PlanStep<T>>,
}

impl<T> Plan<T> {
    /// Freeze a list of steps
    #[must_use]
    pub fn new(steps: Vec<PlanStep<T>>) -> Self {
        Self { steps }
    }

    /// Steps in execution order
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[PlanStep<T>] {
        &self.steps
    }

    /// Number of steps
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the plan has no steps
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step labels in execution order
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.steps.iter().map(PlanStep::label).collect()
    }

    /// Run every step in order against `instance`
    ///
    /// # Errors
    /// [`ExecutionError::StepFailed`] for the first failing step; later steps
    /// are not run.
    pub fn execute(&self, instance: &mut T) -> Result<ExecutionSummary, ExecutionError> {
        let start = Instant::now();

        for (index, step) in self.steps.iter().enumerate() {
            tracing::trace!("Executing step {}: {}", index, step);
            if let Err(source) = step.execute(instance) {
                tracing::debug!(
                    "Step {} failed, skipping {} remaining",
                    step,
                    self.steps.len() - index - 1
                );
                return Err(ExecutionError::StepFailed {
                    step: step.label.clone(),
                    phase: step.phase,
                    source,
                });
            }
        }

        Ok(ExecutionSummary {
            steps_executed: self.steps.len(),
            execution_time_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        })
    }
}

impl<T> Clone for Plan<T> {
    fn clone(&self) -> Self {
        Self {
            steps: self.steps.clone(),
        }
    }
}

impl<T> fmt::Debug for Plan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.steps).finish()
    }
}

impl<T> fmt::Display for Plan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            writeln!(f, "{:>3}. {}", i + 1, step)?;
        }
        Ok(())
    }
}
