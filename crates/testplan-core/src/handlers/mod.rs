//! Built-in marker handlers
//!
//! One handler per [`MarkerCategory`]:
//!
//! | Handler | Marker | Steps |
//! |---|---|---|
//! | [`BeforeSuiteHandler`] | `@BeforeSuite` | once, before all tests |
//! | [`BeforeTestHandler`] | `@BeforeTest` | before each test |
//! | [`TestMethodHandler`] | `@Test` | one per test, by priority |
//! | [`AfterTestHandler`] | `@AfterTest` | after each test |
//! | [`AfterSuiteHandler`] | `@AfterSuite` | once, after all tests |
//! | [`CsvSourceHandler`] | `@CsvSource` | none; provides arguments |

mod after_suite;
mod after_test;
mod before_suite;
mod csv_source;
mod test_method;

pub use after_suite::AfterSuiteHandler;
pub use after_test::AfterTestHandler;
pub use before_suite::BeforeSuiteHandler;
pub use before_test::BeforeTestHandler;
pub use csv_source::{parse_csv, CsvSourceHandler};
pub use test_method::TestMethodHandler;

use crate::class::MethodRef;
use crate::context::RunContext;
use crate::error::RegistrationError;
use crate::marker::MarkerCategory;
use crate::plan::{Phase, PlanStep};
use crate::registry::HandlerFactory;
use crate::value::Args;
use std::sync::Arc;

/// Factories for every built-in handler, in discovery order
#[must_use]
pub fn builtin<T: 'static>() -> Vec<HandlerFactory<T>> {
    vec![
        HandlerFactory::of::<BeforeSuiteHandler>(),
        HandlerFactory::of::<BeforeTestHandler>(),
        HandlerFactory::of::<TestMethodHandler>(),
        HandlerFactory::of::<AfterTestHandler>(),
        HandlerFactory::of::<AfterSuiteHandler>(),
        HandlerFactory::of::<CsvSourceHandler>(),
    ]
}

/// Register a suite-scoped hook: static, at most one per class
fn register_suite_hook<T: 'static>(
    category: MarkerCategory,
    method: &MethodRef<T>,
    ctx: &mut RunContext<T>,
) -> Result<(), RegistrationError> {
    if !method.is_static() {
        return Err(RegistrationError::MustBeStatic {
            marker: category,
            method: method.name().to_string(),
        });
    }
    if let Some(existing) = ctx.methods_for(category).first() {
        return Err(RegistrationError::DuplicateSuiteHook {
            marker: category,
            method: method.name().to_string(),
            existing: existing.name().to_string(),
        });
    }

    tracing::debug!("Registered {} method {}", category, method.name());
    ctx.add_method(category, Arc::clone(method));
    Ok(())
}

/// One no-argument step per method registered under `category`
fn hook_steps<T: 'static>(
    category: MarkerCategory,
    phase: Phase,
    ctx: &RunContext<T>,
) -> Vec<PlanStep<T>> {
    ctx.methods_for(category)
        .iter()
        .map(|m| PlanStep::invoke(phase, Arc::clone(m), Args::empty()))
        .collect()
}
