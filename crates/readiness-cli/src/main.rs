use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, Command};
use readiness_cli::{build_driver, AppConfig, PromptSource, Script, ScriptSource};
use readiness_core::catalog::{all_sets, question_set};
use readiness_core::{Session, Stage};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("readiness")
        .version(readiness_cli::VERSION)
        .about("Business Personality & Readiness Assessment")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file (default: readiness.toml if present)"),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory generated reports are written to"),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("run").about("Run the assessment interactively"))
        .subcommand(
            Command::new("replay")
                .about("Replay a scripted session from a YAML file")
                .arg(
                    Arg::new("script")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Script file"),
                )
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .action(ArgAction::SetTrue)
                        .help("Fail on the first rejected step"),
                ),
        )
        .subcommand(
            Command::new("questions")
                .about("Print the question catalog as JSON")
                .arg(
                    Arg::new("stage")
                        .long("stage")
                        .value_parser(value_parser!(String))
                        .help("Only this stage (1, 1.5, 2-future, 2-starter, 2-owner, 3-owner)"),
                ),
        )
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    // stdout carries prompts and JSON output
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(matches: &clap::ArgMatches) -> anyhow::Result<AppConfig> {
    let (path, required) = match matches.get_one::<PathBuf>("config") {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from("readiness.toml"), false),
    };
    let mut config = AppConfig::load(&path, required)?.with_env()?;
    if let Some(dir) = matches.get_one::<PathBuf>("output-dir") {
        config.output_dir = dir.clone();
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    init_tracing(&config);

    match matches.subcommand() {
        Some(("run", _)) => {
            let driver = build_driver(&config);
            let stdin = std::io::stdin();
            let mut source = PromptSource::new(stdin.lock(), std::io::stdout());
            let summary = driver.run(&mut Session::new(), &mut source)?;
            tracing::info!(
                "Session ended on stage {} after {} completion(s)",
                summary.final_stage,
                summary.completed
            );
        }
        Some(("replay", args)) => {
            let Some(path) = args.get_one::<PathBuf>("script") else {
                anyhow::bail!("missing script path");
            };
            let script = Script::load(path)
                .with_context(|| format!("loading script {}", path.display()))?;
            let mut source = ScriptSource::new(script).strict(args.get_flag("strict"));
            let driver = build_driver(&config);
            let summary = driver.run(&mut Session::new(), &mut source)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            if !summary.final_stage.is_terminal() {
                tracing::warn!("Script ended on stage {}", summary.final_stage);
            }
        }
        Some(("questions", args)) => {
            let json = match args.get_one::<String>("stage") {
                Some(id) => {
                    let stage: Stage = id.parse()?;
                    let set = question_set(stage)
                        .with_context(|| format!("stage {stage} has no questions"))?;
                    serde_json::to_string_pretty(set)?
                }
                None => serde_json::to_string_pretty(&all_sets())?,
            };
            println!("{json}");
        }
        _ => {}
    }

    Ok(())
}
