use pretty_assertions::assert_eq;
use proptest::prelude::*;
use testplan_core::{
    plan, EngineConfig, HandlerFactory, Marker, MarkerCategory, MethodDecl, Phase, PlanError,
    Planner, RegistrationError, StepOrdering, TestClass,
};
use testplan_test_utils::{
    instance_step, lifecycle_class, recording_class, static_step, Recorder, Trace,
};

fn registration_error(
    result: Result<testplan_core::Plan<Recorder>, PlanError>,
) -> RegistrationError {
    match result {
        Err(PlanError::Registration(e)) => e,
        other => panic!("expected registration error, got {other:?}"),
    }
}

#[test]
fn test_suite_hooks_frame_the_plan() {
    let trace = Trace::new();
    let plan = plan(&lifecycle_class(&trace)).unwrap();

    let steps = plan.steps();
    assert_eq!(steps.first().unwrap().phase(), Phase::SuiteSetup);
    assert_eq!(steps.first().unwrap().label(), "setup");
    assert_eq!(steps.last().unwrap().phase(), Phase::SuiteTeardown);
    assert_eq!(steps.last().unwrap().label(), "cleanup");
}

#[test]
fn test_lifecycle_plan_layout() {
    let trace = Trace::new();
    let plan = plan(&lifecycle_class(&trace)).unwrap();

    assert_eq!(
        plan.labels(),
        vec![
            "setup", "reset", "high", "tidy", "reset", "medium", "tidy", "reset", "low", "tidy",
            "cleanup"
        ]
    );
}

#[test]
fn test_registry_plan_layout() {
    let trace = Trace::new();
    let planner =
        Planner::with_config(EngineConfig::new().with_ordering(StepOrdering::Registry));
    let plan = planner.plan(&lifecycle_class(&trace)).unwrap();

    assert_eq!(
        plan.labels(),
        vec!["setup", "reset", "high", "medium", "low", "tidy", "cleanup"]
    );
}

#[test]
fn test_planning_runs_nothing() {
    let trace = Trace::new();
    plan(&lifecycle_class(&trace)).unwrap();
    assert!(trace.is_empty());
}

#[test]
fn test_second_before_suite_rejected() {
    let trace = Trace::new();
    let class = recording_class("TwoSetups", &trace)
        .with_method(static_step("setup_one", &trace).marked(Marker::BeforeSuite))
        .with_method(static_step("setup_two", &trace).marked(Marker::BeforeSuite));

    let err = registration_error(plan(&class));
    assert!(err.to_string().contains("only one"));
    assert_eq!(err.method(), "setup_two");
}

#[test]
fn test_instance_before_suite_rejected() {
    let trace = Trace::new();
    let class = recording_class("InstanceSetup", &trace)
        .with_method(instance_step("setup").marked(Marker::BeforeSuite));

    let err = registration_error(plan(&class));
    assert!(err.to_string().contains("must be static"));
}

#[test]
fn test_priority_out_of_range_rejected() {
    for priority in [0, 11] {
        let trace = Trace::new();
        let class = recording_class("BadPriority", &trace)
            .with_method(instance_step("bad").marked(Marker::test_with_priority(priority)));

        let err = registration_error(plan(&class));
        assert!(matches!(err, RegistrationError::PriorityOutOfRange { .. }));
    }
}

#[test]
fn test_before_test_with_parameters_rejected() {
    let trace = Trace::new();
    let class = recording_class("ParamSetup", &trace).with_method(
        instance_step("setup")
            .param(testplan_core::ParamType::Int)
            .marked(Marker::BeforeTest),
    );

    let err = registration_error(plan(&class));
    assert!(err.to_string().contains("must have no parameters"));
}

#[test]
fn test_repeated_test_marker_rejected() {
    let trace = Trace::new();
    let class = recording_class("Twice", &trace).with_method(
        instance_step("t")
            .marked(Marker::test_with_priority(3))
            .marked(Marker::test_with_priority(8)),
    );

    let err = registration_error(plan(&class));
    assert!(matches!(
        err,
        RegistrationError::DuplicateMarker { marker: MarkerCategory::TestMethod, .. }
    ));
    assert_eq!(err.to_string(), "@Test declared more than once on: t");
    assert!(trace.is_empty());
}

#[test]
fn test_distinct_categories_on_one_method_accepted() {
    let trace = Trace::new();
    let class = recording_class("Mixed", &trace).with_method(
        instance_step("t")
            .param(testplan_core::ParamType::Int)
            .marked(Marker::test_with_priority(3))
            .marked(Marker::csv("1")),
    );

    assert_eq!(plan(&class).unwrap().labels(), vec!["t"]);
}

#[test]
fn test_unknown_marker_is_ignored() {
    let trace = Trace::new();
    let class = recording_class("Custom", &trace)
        .with_method(instance_step("tagged").marked(Marker::custom("Tag")))
        .with_method(instance_step("checked").marked(Marker::test()));

    assert_eq!(plan(&class).unwrap().labels(), vec!["checked"]);
}

#[test]
fn test_failing_handler_factory_aborts_planning() {
    let trace = Trace::new();
    let planner = Planner::new().with_handler(HandlerFactory::new("Broken", || {
        Err("cannot construct".into())
    }));

    let err = planner.plan(&lifecycle_class(&trace)).unwrap_err();
    assert!(matches!(err, PlanError::Construction(_)));
}

#[test]
fn test_registry_view_matches_discovery() {
    let planner: Planner<Recorder> = Planner::new();
    let registry = planner.registry().unwrap();
    assert_eq!(registry.len(), MarkerCategory::ALL.len());
    assert_eq!(planner.factories().len(), MarkerCategory::ALL.len());
}

#[test]
fn test_plan_display() {
    let class: TestClass<Recorder> = TestClass::new("Display")
        .with_method(MethodDecl::associated("setup", |_| Ok(())).marked(Marker::BeforeSuite))
        .with_method(instance_step("check").marked(Marker::test()));

    assert_eq!(
        plan(&class).unwrap().to_string(),
        "  1. [suite-setup] setup\n  2. [test] check\n"
    );
}

fn priority_class(priorities: &[i32]) -> TestClass<Recorder> {
    let trace = Trace::new();
    priorities
        .iter()
        .enumerate()
        .fold(recording_class("Priorities", &trace), |class, (i, p)| {
            class.with_method(
                instance_step(format!("t{i}")).marked(Marker::test_with_priority(*p)),
            )
        })
}

proptest! {
    #[test]
    fn prop_tests_run_by_descending_priority(
        priorities in proptest::collection::vec(1..=10i32, 0..12)
    ) {
        let class = priority_class(&priorities);
        let plan = plan(&class).unwrap();

        let mut expected: Vec<(usize, i32)> = priorities.iter().copied().enumerate().collect();
        expected.sort_by_key(|(_, p)| std::cmp::Reverse(*p));
        let expected: Vec<String> = expected.iter().map(|(i, _)| format!("t{i}")).collect();

        prop_assert_eq!(plan.labels(), expected);
    }

    #[test]
    fn prop_lifecycle_wraps_every_test(
        tests in 0..6usize,
        setups in 0..3usize,
        teardowns in 0..3usize
    ) {
        let trace = Trace::new();
        let mut class = recording_class("Wrapped", &trace);
        for i in 0..setups {
            class =
                class.with_method(instance_step(format!("before{i}")).marked(Marker::BeforeTest));
        }
        for i in 0..tests {
            class =
                class.with_method(instance_step(format!("test{i}")).marked(Marker::test()));
        }
        for i in 0..teardowns {
            class =
                class.with_method(instance_step(format!("after{i}")).marked(Marker::AfterTest));
        }

        let plan = plan(&class).unwrap();
        prop_assert_eq!(plan.len(), tests * (setups + 1 + teardowns));

        for chunk in plan.steps().chunks(setups + 1 + teardowns) {
            let phases: Vec<Phase> = chunk.iter().map(|s| s.phase()).collect();
            let mut expected = vec![Phase::TestSetup; setups];
            expected.push(Phase::Test);
            expected.extend(vec![Phase::TestTeardown; teardowns]);
            prop_assert_eq!(phases, expected);
        }
    }
}
