//! `@AfterTest` handler

use super::hook_steps;
use crate::capability::{expect_category, AnnotationHandler, StepContributor};
use crate::class::MethodRef;
use crate::context::RunContext;
use crate::error::RegistrationError;
use crate::marker::{Marker, MarkerCategory};
use crate::plan::{Phase, PlanStep};
use std::sync::Arc;

/// Runs methods after each test
///
/// No shape checks: static methods and declared parameters are accepted.
/// Steps are invoked with no arguments.
#[derive(Debug, Default, Clone, Copy)]
pub struct AfterTestHandler;

impl<T: 'static> AnnotationHandler<T> for AfterTestHandler {
    fn category(&self) -> MarkerCategory {
        MarkerCategory::TestTeardown
    }

    fn name(&self) -> &'static str {
        "AfterTestHandler"
    }

    fn handle(
        &self,
        method: &MethodRef<T>,
        marker: &Marker,
        ctx: &mut RunContext<T>,
    ) -> Result<(), RegistrationError> {
        expect_category(MarkerCategory::TestTeardown, method, marker)?;
        tracing::debug!("Registered @AfterTest method {}", method.name());
        ctx.add_method(MarkerCategory::TestTeardown, Arc::clone(method));
        Ok(())
    }

    fn as_step_contributor(&self) -> Option<&dyn StepContributor<T>> {
        Some(self)
    }
}

impl<T: 'static> StepContributor<T> for AfterTestHandler {
    fn build_steps(&self, ctx: &RunContext<T>) -> Vec<PlanStep<T>> {
        hook_steps(MarkerCategory::TestTeardown, Phase::TestTeardown, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{MethodDecl, TestClass};

    #[test]
    fn accepts_any_shape() {
        let class: TestClass<()> = TestClass::new("Teardown")
            .with_method(MethodDecl::instance("tidy", |_: &mut (), _| Ok(())))
            .with_method(MethodDecl::associated("flush", |_| Ok(())));
        let mut ctx = RunContext::new();
        for method in class.methods() {
            AfterTestHandler.handle(method, &Marker::AfterTest, &mut ctx).unwrap();
        }

        let steps = AfterTestHandler.build_steps(&ctx);
        let labels: Vec<&str> = steps.iter().map(PlanStep::label).collect();
        assert_eq!(labels, vec!["tidy", "flush"]);
        assert!(steps.iter().all(|s| s.phase() == Phase::TestTeardown));
    }
}
