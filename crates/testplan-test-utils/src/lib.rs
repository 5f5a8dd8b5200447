//! Testing utilities for the testplan workspace
//!
//! Shared fixtures: a [`Trace`] that records invocations (including those of
//! static hooks, which get no instance), a [`Recorder`] instance type and
//! ready-made test classes.

#![allow(missing_docs)]

use parking_lot::Mutex;
use std::sync::Arc;
use testplan_core::{Args, Marker, MethodDecl, ParamType, TestClass};

/// Shared, clonable invocation log
#[derive(Debug, Clone, Default)]
pub struct Trace(Arc<Mutex<Vec<String>>>);

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: impl Into<String>) {
        self.0.lock().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

/// Instance type of the fixture classes
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub trace: Trace,
}

impl Recorder {
    pub fn new(trace: Trace) -> Self {
        Self { trace }
    }
}

fn event(name: &str, args: &Args) -> String {
    if args.is_empty() {
        name.to_string()
    } else {
        format!("{name}{args}")
    }
}

/// Class whose constructor hands every instance `trace`
pub fn recording_class(name: &str, trace: &Trace) -> TestClass<Recorder> {
    let trace = trace.clone();
    TestClass::new(name).with_constructor(move || Ok(Recorder::new(trace.clone())))
}

/// Static method recording its name
pub fn static_step(name: impl Into<String>, trace: &Trace) -> MethodDecl<Recorder> {
    let name = name.into();
    let trace = trace.clone();
    MethodDecl::associated(name.clone(), move |args| {
        trace.record(event(&name, args));
        Ok(())
    })
}

/// Instance method recording its name and arguments
pub fn instance_step(name: impl Into<String>) -> MethodDecl<Recorder> {
    let name = name.into();
    MethodDecl::instance(name.clone(), move |r: &mut Recorder, args| {
        r.trace.record(event(&name, args));
        Ok(())
    })
}

/// Instance method that records its name, then fails with `message`
pub fn failing_step(name: impl Into<String>, message: &'static str) -> MethodDecl<Recorder> {
    let name = name.into();
    MethodDecl::instance(name.clone(), move |r: &mut Recorder, _| {
        r.trace.record(name.as_str());
        Err(message.into())
    })
}

/// Suite hooks, one test setup and teardown, three tests with priorities 1, 10, 5
pub fn lifecycle_class(trace: &Trace) -> TestClass<Recorder> {
    recording_class("LifecycleTest", trace)
        .with_method(static_step("setup", trace).marked(Marker::BeforeSuite))
        .with_method(instance_step("reset").marked(Marker::BeforeTest))
        .with_method(instance_step("low").marked(Marker::test_with_priority(1)))
        .with_method(instance_step("high").marked(Marker::test_with_priority(10)))
        .with_method(instance_step("medium").marked(Marker::test()))
        .with_method(instance_step("tidy").marked(Marker::AfterTest))
        .with_method(static_step("cleanup", trace).marked(Marker::AfterSuite))
}

/// One CSV-driven test over every supported parameter type
pub fn csv_class(trace: &Trace) -> TestClass<Recorder> {
    recording_class("CsvTest", trace).with_method(
        instance_step("mixed")
            .params([ParamType::Int, ParamType::Text, ParamType::Float, ParamType::Bool])
            .marked(Marker::test())
            .marked(Marker::csv("42, hello, 2.5, true")),
    )
}

/// A test whose `@BeforeTest` fails with "Boom"
pub fn failing_setup_class(trace: &Trace) -> TestClass<Recorder> {
    recording_class("FailingSetupTest", trace)
        .with_method(failing_step("explode", "Boom").marked(Marker::BeforeTest))
        .with_method(instance_step("never").marked(Marker::test()))
        .with_method(static_step("cleanup", trace).marked(Marker::AfterSuite))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_is_shared_between_clones() {
        let trace = Trace::new();
        let other = trace.clone();
        other.record("a");
        trace.record("b");
        assert_eq!(trace.events(), vec!["a", "b"]);
        assert_eq!(other.len(), 2);
    }

    #[test]
    fn constructor_shares_trace() {
        let trace = Trace::new();
        let class = recording_class("Demo", &trace);
        let recorder = class.instantiate().unwrap().unwrap();
        recorder.trace.record("hello");
        assert_eq!(trace.events(), vec!["hello"]);
    }
}
