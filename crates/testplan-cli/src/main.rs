//! `testplan` - run the built-in demo suites through the orchestration engine

mod suites;

use anyhow::{Context as _, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use suites::{BasicTestSuite, CsvBasedTestSuite};
use testplan_core::{
    EngineConfig, HandlerRegistry, Planner, RunReport, Runner, StepOrdering, TestSuite,
};
use tracing_subscriber::EnvFilter;

const SUITES: [&str; 2] = ["basic", "csv"];

fn cli() -> Command {
    let suite = Arg::new("suite")
        .long("suite")
        .default_value("all")
        .value_parser(["basic", "csv", "all"])
        .help("Demo suite to use");
    let ordering = Arg::new("ordering")
        .long("ordering")
        .value_parser(["lifecycle", "registry"])
        .help("How steps are assembled into the plan (overrides the config file)");
    let config = Arg::new("config")
        .long("config")
        .value_parser(value_parser!(std::path::PathBuf))
        .help("TOML configuration file");

    Command::new("testplan")
        .version(testplan_core::VERSION)
        .about("Annotation-driven test orchestration demo")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Run demo suites")
                .arg(suite.clone())
                .arg(ordering.clone())
                .arg(config.clone())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print reports as JSON"),
                ),
        )
        .subcommand(
            Command::new("plan")
                .about("Print the plan of demo suites without running it")
                .arg(suite)
                .arg(ordering)
                .arg(config),
        )
        .subcommand(Command::new("handlers").about("List discovered handlers"))
}

fn load_config(args: &ArgMatches) -> Result<EngineConfig> {
    let mut config = match args.get_one::<std::path::PathBuf>("config") {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(ordering) = args.get_one::<String>("ordering") {
        config.ordering = match ordering.as_str() {
            "registry" => StepOrdering::Registry,
            _ => StepOrdering::Lifecycle,
        };
    }
    Ok(config)
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn selected(args: &ArgMatches) -> Vec<&'static str> {
    match args.get_one::<String>("suite").map(String::as_str) {
        Some("basic") => vec!["basic"],
        Some("csv") => vec!["csv"],
        _ => SUITES.to_vec(),
    }
}

fn run_one<S: TestSuite>(config: &EngineConfig) -> Result<RunReport> {
    Ok(Runner::<S>::with_config(config.clone()).run_suite()?)
}

fn plan_one<S: TestSuite>(config: &EngineConfig) -> Result<String> {
    let class = S::test_class();
    let plan = Planner::with_config(config.clone()).plan(&class)?;
    Ok(format!("{} ({} steps)\n{}", class.name(), plan.len(), plan))
}

fn run(args: &ArgMatches) -> Result<bool> {
    let config = load_config(args)?;
    init_tracing(&config.log_filter);

    let json = args.get_flag("json");
    let mut reports = Vec::new();
    let mut failed = false;

    let suites = selected(args);
    tracing::debug!("Running {:?} with {} ordering", suites, config.ordering);
    for suite in suites {
        let result = match suite {
            "basic" => run_one::<BasicTestSuite>(&config),
            _ => run_one::<CsvBasedTestSuite>(&config),
        };
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                eprintln!("error: {e:#}");
                failed = true;
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!();
        for report in &reports {
            println!("{report}");
        }
    }
    Ok(!failed)
}

fn plan(args: &ArgMatches) -> Result<()> {
    let config = load_config(args)?;
    init_tracing(&config.log_filter);
    println!("Ordering: {}", config.ordering);

    for suite in selected(args) {
        let listing = match suite {
            "basic" => plan_one::<BasicTestSuite>(&config)?,
            _ => plan_one::<CsvBasedTestSuite>(&config)?,
        };
        println!();
        print!("{listing}");
    }
    Ok(())
}

fn handlers() -> Result<()> {
    let registry: HandlerRegistry<()> = HandlerRegistry::discover()?;

    println!("{:<20} {:<12} {:<8} {:<8}", "HANDLER", "MARKER", "STEPS", "ARGS");
    let yes_no = |flag: bool| if flag { "yes" } else { "no" };
    for (category, handler) in registry.handlers() {
        let provides = std::sync::Arc::clone(handler).into_argument_provider().is_some();
        println!(
            "{:<20} {:<12} {:<8} {:<8}",
            handler.name(),
            category.to_string(),
            yes_no(handler.as_step_contributor().is_some()),
            yes_no(provides)
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("run", args)) => {
            let passed = run(args)?;
            std::process::exit(if passed { 0 } else { 1 });
        }
        Some(("plan", args)) => plan(args),
        Some(("handlers", _)) => handlers(),
        _ => Ok(()),
    }
}
