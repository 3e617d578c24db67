//! `cubeviz` binary

use anyhow::Context as _;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use cubeviz_cli::commands;
use cubeviz_cli::{CubevizConfig, Source};
use cubeviz_recommend::Visual;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn source_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("source")
                .value_name("SOURCE")
                .value_parser(value_parser!(PathBuf))
                .required_unless_present("endpoint")
                .help("RDF file to load; the format follows from the extension"),
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .value_name("URL")
                .conflicts_with("source")
                .help("SPARQL endpoint to query instead of a file"),
        )
}

fn select_arg() -> Arg {
    Arg::new("select")
        .long("select")
        .value_name("URI")
        .action(ArgAction::Append)
        .help("Dimension element to keep; repeat to select several. An identifier several dimensions share is rejected")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

fn cli() -> Command {
    Command::new("cubeviz")
        .version(cubeviz_cli::VERSION)
        .about("Explore Linked Data Cubes and pick charts for them")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .subcommand(source_args(Command::new("import").about("Import a cube and summarize it")).arg(json_arg()))
        .subcommand(
            source_args(Command::new("recommend").about("Rank charts for a cube or a selection of it"))
                .arg(select_arg())
                .arg(json_arg()),
        )
        .subcommand(
            source_args(Command::new("convert").about("Print chart data as JSON"))
                .arg(
                    Arg::new("chart")
                        .long("chart")
                        .value_name("NAME")
                        .required(true)
                        .help("heatmap, pieChart, barChart or groupedStackedBar"),
                )
                .arg(
                    Arg::new("dimension")
                        .long("dimension")
                        .value_name("URI")
                        .help("Dimension to chart along"),
                )
                .arg(select_arg()),
        )
        .subcommand(source_args(Command::new("dump").about("Print every triple grouped by subject as JSON")))
}

fn init_tracing(config: &CubevizConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new(cubeviz_cli::config::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn source(args: &ArgMatches) -> anyhow::Result<Source> {
    if let Some(url) = args.get_one::<String>("endpoint") {
        return Ok(Source::Endpoint(url.clone()));
    }
    args.get_one::<PathBuf>("source")
        .cloned()
        .map(Source::File)
        .context("either SOURCE or --endpoint is required")
}

fn selection(args: &ArgMatches) -> Vec<String> {
    args.get_many::<String>("select")
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(matches: ArgMatches) -> anyhow::Result<()> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => CubevizConfig::from_file(path)?,
        None => CubevizConfig::default(),
    };
    init_tracing(&config);

    match matches.subcommand() {
        Some(("import", args)) => {
            let cube = commands::import(&source(args)?, &config).await?;
            let summary = commands::CubeSummary::of(&cube);
            if args.get_flag("json") {
                print_json(&summary)?;
            } else {
                print!("{summary}");
            }
        }
        Some(("recommend", args)) => {
            let cube = commands::import(&source(args)?, &config).await?;
            let report = commands::recommend(&cube, &selection(args), &config)?;
            if args.get_flag("json") {
                print_json(&report)?;
            } else {
                print!("{report}");
            }
        }
        Some(("convert", args)) => {
            let chart = args.get_one::<String>("chart").context("--chart is required")?;
            let mut visual = Visual::new(chart.as_str());
            if let Some(dimension) = args.get_one::<String>("dimension") {
                visual = visual.with_dimension(dimension.as_str());
            }
            let cube = commands::import(&source(args)?, &config).await?;
            print_json(&commands::convert(&cube, &selection(args), &visual)?)?;
        }
        Some(("dump", args)) => {
            print_json(&commands::dump(&source(args)?).await?)?;
        }
        _ => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(cli().get_matches()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "command failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
