//! Handler capabilities
//!
//! - [`AnnotationHandler`]: owns one marker category, validates and registers
//!   methods carrying it. Every handler implements it.
//! - [`StepContributor`]: optional; turns registered methods into plan steps.
//! - [`ArgumentProvider`]: optional; supplies call arguments for a method.
//!
//! Optional capabilities are discovered through the query methods on
//! [`AnnotationHandler`] (`as_step_contributor`, `into_argument_provider`),
//! which default to `None`.

use crate::class::MethodRef;
use crate::context::RunContext;
use crate::error::RegistrationError;
use crate::marker::{Marker, MarkerCategory};
use crate::plan::PlanStep;
use crate::value::ArgValue;
use std::sync::Arc;

/// Contract every marker handler implements
pub trait AnnotationHandler<T>: Send + Sync {
    /// Marker category this handler owns
    fn category(&self) -> MarkerCategory;

    /// Handler name (for logs and listings)
    fn name(&self) -> &'static str;

    /// Validate `method` and record it
    ///
    /// `marker` is the marker of [`Self::category`] found on the method.
    ///
    /// # Errors
    /// [`RegistrationError`] when the method violates the category's rules;
    /// the planning pass is aborted.
    fn handle(
        &self,
        method: &MethodRef<T>,
        marker: &Marker,
        ctx: &mut RunContext<T>,
    ) -> Result<(), RegistrationError>;

    /// Step-contributor view of this handler
    fn as_step_contributor(&self) -> Option<&dyn StepContributor<T>> {
        None
    }

    /// Argument-provider view of this handler
    fn into_argument_provider(self: Arc<Self>) -> Option<Arc<dyn ArgumentProvider<T>>> {
        None
    }
}

/// Handler that emits plan steps for what it registered
pub trait StepContributor<T>: AnnotationHandler<T> {
    /// Steps in the order this handler wants them run
    fn build_steps(&self, ctx: &RunContext<T>) -> Vec<PlanStep<T>>;
}

/// Source of resolved call arguments
pub trait ArgumentProvider<T>: Send + Sync {
    /// Arguments for `method`; `None` or an empty list means no opinion
    fn arguments_for(&self, method: &MethodRef<T>, ctx: &RunContext<T>) -> Option<Vec<ArgValue>>;
}

/// Check that `marker` belongs to `handler`'s category
///
/// # Errors
/// [`RegistrationError::MarkerMismatch`] otherwise.
pub fn expect_category<T>(
    handler: MarkerCategory,
    method: &MethodRef<T>,
    marker: &Marker,
) -> Result<(), RegistrationError> {
    if marker.category() == Some(handler) {
        Ok(())
    } else {
        Err(RegistrationError::MarkerMismatch {
            handler,
            method: method.name().to_string(),
            marker: marker.to_string(),
        })
    }
}
