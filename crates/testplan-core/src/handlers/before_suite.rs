//! `@BeforeSuite` handler

use super::{hook_steps, register_suite_hook};
use crate::capability::{expect_category, AnnotationHandler, StepContributor};
use crate::class::MethodRef;
use crate::context::RunContext;
use crate::error::RegistrationError;
use crate::marker::{Marker, MarkerCategory};
use crate::plan::{Phase, PlanStep};

/// Runs one static method once, before every other step
#[derive(Debug, Default, Clone, Copy)]
pub struct BeforeSuiteHandler;

impl<T: 'static> AnnotationHandler<T> for BeforeSuiteHandler {
    fn category(&self) -> MarkerCategory {
        MarkerCategory::SuiteSetup
    }

    fn name(&self) -> &'static str {
        "BeforeSuiteHandler"
    }

    fn handle(
        &self,
        method: &MethodRef<T>,
        marker: &Marker,
        ctx: &mut RunContext<T>,
    ) -> Result<(), RegistrationError> {
        expect_category(MarkerCategory::SuiteSetup, method, marker)?;
        register_suite_hook(MarkerCategory::SuiteSetup, method, ctx)
    }

    fn as_step_contributor(&self) -> Option<&dyn StepContributor<T>> {
        Some(self)
    }
}

impl<T: 'static> StepContributor<T> for BeforeSuiteHandler {
    fn build_steps(&self, ctx: &RunContext<T>) -> Vec<PlanStep<T>> {
        hook_steps(MarkerCategory::SuiteSetup, Phase::SuiteSetup, ctx)
    }
}
