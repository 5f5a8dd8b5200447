//! Planner
//!
//! Turns a [`TestClass`] into a [`Plan`]:
//!
//! 1. build a fresh [`RunContext`] and [`HandlerRegistry`]
//! 2. store the registry's argument providers in the context
//! 3. dispatch every marker of every method to the handler owning its category;
//!    a category may appear only once per method
//! 4. collect steps from every step contributor, in registry order
//! 5. assemble them according to [`StepOrdering`]
//!
//! Registry and context live for one call to [`Planner::plan`] only.

use crate::class::TestClass;
use crate::config::{EngineConfig, StepOrdering};
use crate::context::{RunContext, ARGUMENT_PROVIDERS};
use crate::error::{PlanError, RegistrationError};
use crate::handlers;
use crate::plan::{Phase, Plan, PlanStep};
use crate::registry::{HandlerFactory, HandlerRegistry};
use std::fmt;

/// Builds plans from test classes
pub struct Planner<T> {
    config: EngineConfig,
    factories: Vec<HandlerFactory<T>>,
}

impl<T: 'static> Planner<T> {
    /// Planner with the built-in handlers and default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Planner with the built-in handlers
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            factories: handlers::builtin(),
        }
    }

    /// Add a handler after the built-ins
    ///
    /// A handler for an already-owned category replaces the built-in one.
    #[must_use]
    pub fn with_handler(mut self, factory: HandlerFactory<T>) -> Self {
        self.factories.push(factory);
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Handler factories in discovery order
    #[inline]
    #[must_use]
    pub fn factories(&self) -> &[HandlerFactory<T>] {
        &self.factories
    }

    /// Build the handler registry used for one planning pass
    ///
    /// # Errors
    /// [`PlanError::Construction`] if a handler fails to instantiate.
    pub fn registry(&self) -> Result<HandlerRegistry<T>, PlanError> {
        Ok(HandlerRegistry::from_factories(&self.factories)?)
    }

    /// Plan `class`
    ///
    /// # Errors
    /// - [`PlanError::Construction`] if the registry cannot be built
    /// - [`PlanError::Registration`] for the first method a handler rejects, or
    ///   that carries two markers of the same category
    pub fn plan(&self, class: &TestClass<T>) -> Result<Plan<T>, PlanError> {
        let registry = self.registry()?;
        let mut ctx = RunContext::new();
        ctx.put(ARGUMENT_PROVIDERS, registry.argument_providers());

        for method in class.methods() {
            let mut seen = Vec::new();
            for marker in method.markers() {
                if let Some(category) = marker.category() {
                    if seen.contains(&category) {
                        return Err(RegistrationError::DuplicateMarker {
                            marker: category,
                            method: method.name().to_string(),
                        }
                        .into());
                    }
                    seen.push(category);
                }
                let Some(handler) = marker.category().and_then(|c| registry.get(c)) else {
                    tracing::warn!(
                        "No handler for marker {} on {}::{}, skipping",
                        marker,
                        class.name(),
                        method.name()
                    );
                    continue;
                };
                handler.handle(method, marker, &mut ctx)?;
            }
        }

        let contributions: Vec<Vec<PlanStep<T>>> = registry
            .step_contributors()
            .into_iter()
            .map(|c| {
                let steps = c.build_steps(&ctx);
                tracing::debug!("{} contributed {} step(s)", c.name(), steps.len());
                steps
            })
            .collect();

        let plan = Plan::new(assemble(self.config.ordering, contributions));
        tracing::info!(
            "Planned {} step(s) for {} ({} ordering)",
            plan.len(),
            class.name(),
            self.config.ordering
        );
        Ok(plan)
    }
}

/// Order contributor outputs into the final step list
///
/// With [`StepOrdering::Lifecycle`], test setup and teardown steps are
/// repeated around every test step and are dropped when there is no test.
fn assemble<T>(ordering: StepOrdering, contributions: Vec<Vec<PlanStep<T>>>) -> Vec<PlanStep<T>> {
    let steps = contributions.into_iter().flatten();
    if ordering == StepOrdering::Registry {
        return steps.collect();
    }

    let mut suite_setup = Vec::new();
    let mut test_setup = Vec::new();
    let mut tests = Vec::new();
    let mut test_teardown = Vec::new();
    let mut suite_teardown = Vec::new();
    for step in steps {
        match step.phase() {
            Phase::SuiteSetup => suite_setup.push(step),
            Phase::TestSetup => test_setup.push(step),
            Phase::Test => tests.push(step),
            Phase::TestTeardown => test_teardown.push(step),
            Phase::SuiteTeardown => suite_teardown.push(step),
        }
    }

    let per_test = test_setup.len() + 1 + test_teardown.len();
    let mut plan =
        Vec::with_capacity(suite_setup.len() + tests.len() * per_test + suite_teardown.len());
    plan.append(&mut suite_setup);
    for test in tests {
        plan.extend(test_setup.iter().cloned());
        plan.push(test);
        plan.extend(test_teardown.iter().cloned());
    }
    plan.append(&mut suite_teardown);
    plan
}

impl<T: 'static> Default for Planner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Planner<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Planner")
            .field("config", &self.config)
            .field("factories", &self.factories)
            .finish()
    }
}

/// Plan `class` with the built-in handlers and default configuration
///
/// # Errors
/// See [`Planner::plan`].
pub fn plan<T: 'static>(class: &TestClass<T>) -> Result<Plan<T>, PlanError> {
    Planner::new().plan(class)
}
