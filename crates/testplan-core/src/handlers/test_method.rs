//! `@Test` handler

use crate::capability::{expect_category, AnnotationHandler, StepContributor};
use crate::class::MethodRef;
use crate::context::RunContext;
use crate::error::RegistrationError;
use crate::marker::{Marker, MarkerCategory, DEFAULT_PRIORITY, MAX_PRIORITY, MIN_PRIORITY};
use crate::plan::{Phase, PlanStep};
use crate::value::Args;
use std::cmp::Reverse;
use std::sync::Arc;

/// Runs test methods, highest priority first
///
/// Arguments come from the argument providers stored in the run context; the
/// first provider with a non-empty answer wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestMethodHandler;

impl TestMethodHandler {
    fn resolve_args<T: 'static>(method: &MethodRef<T>, ctx: &RunContext<T>) -> Args {
        ctx.argument_providers()
            .iter()
            .find_map(|p| p.arguments_for(method, ctx).filter(|values| !values.is_empty()))
            .map_or_else(Args::empty, Args::new)
    }
}

impl<T: 'static> AnnotationHandler<T> for TestMethodHandler {
    fn category(&self) -> MarkerCategory {
        MarkerCategory::TestMethod
    }

    fn name(&self) -> &'static str {
        "TestMethodHandler"
    }

    fn handle(
        &self,
        method: &MethodRef<T>,
        marker: &Marker,
        ctx: &mut RunContext<T>,
    ) -> Result<(), RegistrationError> {
        expect_category(MarkerCategory::TestMethod, method, marker)?;

        let priority = marker.priority().unwrap_or(DEFAULT_PRIORITY);
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
            return Err(RegistrationError::PriorityOutOfRange {
                method: method.name().to_string(),
                priority,
                min: MIN_PRIORITY,
                max: MAX_PRIORITY,
            });
        }

        tracing::debug!("Registered @Test method {} (priority {})", method.name(), priority);
        ctx.add_method(MarkerCategory::TestMethod, Arc::clone(method));
        Ok(())
    }

    fn as_step_contributor(&self) -> Option<&dyn StepContributor<T>> {
        Some(self)
    }
}

impl<T: 'static> StepContributor<T> for TestMethodHandler {
    fn build_steps(&self, ctx: &RunContext<T>) -> Vec<PlanStep<T>> {
        let mut methods = ctx.methods_for(MarkerCategory::TestMethod).to_vec();
        // stable: equal priorities keep registration order
        methods.sort_by_key(|m| Reverse(m.priority().unwrap_or(DEFAULT_PRIORITY)));

        methods
            .into_iter()
            .map(|method| {
                let args = Self::resolve_args(&method, ctx);
                tracing::trace!("Test step {} with arguments {}", method.name(), args);
                PlanStep::invoke(Phase::Test, method, args)
            })
            .collect()
    }
}
