//! Demo test suites run by the CLI

use testplan_core::prelude::*;

/// Every lifecycle hook around three prioritized tests
#[derive(Debug, Default)]
pub(crate) struct BasicTestSuite;

impl TestSuite for BasicTestSuite {
    fn test_class() -> TestClass<Self> {
        TestClass::new("BasicTestSuite")
            .with_default_constructor()
            .with_method(
                MethodDecl::associated("setup", |_| {
                    println!("[BeforeSuite] Global test setup");
                    Ok(())
                })
                .marked(Marker::BeforeSuite),
            )
            .with_method(
                MethodDecl::associated("cleanup", |_| {
                    println!("[AfterSuite] Global test cleanup");
                    Ok(())
                })
                .marked(Marker::AfterSuite),
            )
            .with_method(
                MethodDecl::instance("before_each", |_: &mut Self, _| {
                    println!("[BeforeTest] Preparing for test");
                    Ok(())
                })
                .marked(Marker::BeforeTest),
            )
            .with_method(
                MethodDecl::instance("after_each", |_: &mut Self, _| {
                    println!("[AfterTest] Cleaning up after test");
                    Ok(())
                })
                .marked(Marker::AfterTest),
            )
            .with_method(
                MethodDecl::instance("high_priority_test", |_: &mut Self, _| {
                    println!("[Test 10] High-priority logic executed");
                    Ok(())
                })
                .marked(Marker::test_with_priority(10)),
            )
            .with_method(
                MethodDecl::instance("low_priority_test", |_: &mut Self, _| {
                    println!("[Test 1] Low-priority logic executed");
                    Ok(())
                })
                .marked(Marker::test_with_priority(1)),
            )
            .with_method(
                MethodDecl::instance("default_priority_test", |_: &mut Self, _| {
                    println!("[Test 5] Default-priority logic executed");
                    Ok(())
                })
                .marked(Marker::test()),
            )
    }
}

/// Two tests fed from `@CsvSource`
#[derive(Debug, Default)]
pub(crate) struct CsvBasedTestSuite;

const CSV_PARAMS: [ParamType; 4] = [
    ParamType::Int,
    ParamType::Text,
    ParamType::Float,
    ParamType::Bool,
];

fn print_csv(label: &str, args: &Args) -> Result<(), testplan_core::BoxError> {
    println!(
        "[Test with Csv] {label} values: {}, {}, {:.2}, {}",
        args.get::<i32>(0)?,
        args.get::<String>(1)?,
        args.get::<f64>(2)?,
        args.get::<bool>(3)?
    );
    Ok(())
}

impl TestSuite for CsvBasedTestSuite {
    fn test_class() -> TestClass<Self> {
        TestClass::new("CsvBasedTestSuite")
            .with_default_constructor()
            .with_method(
                MethodDecl::instance("test_with_csv", |_: &mut Self, args| {
                    print_csv("Parsed", args)
                })
                    .params(CSV_PARAMS)
                    .marked(Marker::test_with_priority(7))
                    .marked(Marker::csv("42, Hello, 3.14, true")),
            )
            .with_method(
                MethodDecl::instance("another_csv_test", |_: &mut Self, args| {
                    print_csv("Another", args)
                })
                    .params(CSV_PARAMS)
                    .marked(Marker::test_with_priority(3))
                    .marked(Marker::csv("100,World,2.71,false")),
            )
    }
}
