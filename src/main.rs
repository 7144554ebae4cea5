use addtree::{
    Expr, Integer, Sum,
    error::{Error, Result},
    eval,
};
use clap::{
    Arg, ArgAction, ArgMatches, Command, crate_name, crate_version, error::ErrorKind,
    value_parser,
};
use clap_complete::{Shell, generate};
use std::io::{self, Write};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    if let Err(error) = run() {
        match error {
            Error::Clap(error) => {
                error.print().expect("error writing error");
                match error.kind() {
                    ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                        std::process::exit(0)
                    }
                    _ => std::process::exit(1),
                }
            }
            _ => {
                eprintln!("{error}");
                std::process::exit(1);
            }
        }
    }
}

fn command() -> Command {
    Command::new(crate_name!())
        .version(crate_version!())
        .about("Builds integer addition trees and evaluates them")
        .disable_colored_help(true)
        .disable_help_subcommand(true)
        .arg(
            Arg::new("show")
                .short('s')
                .long("show")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("print the expression next to its value"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("raise log verbosity (-v info, -vv debug, -vvv trace)"),
        )
        .subcommand(Command::new("demo").about("evaluate (6 + 7) + (7 + 1)"))
        .subcommand(
            Command::new("sum").about("evaluate a left-leaning sum").arg(
                Arg::new("values")
                    .required(true)
                    .num_args(1..)
                    .allow_negative_numbers(true)
                    .value_parser(value_parser!(Integer))
                    .help("integers to add"),
            ),
        )
        .subcommand(
            Command::new("completions").arg(
                Arg::new("shell")
                    .required(true)
                    .value_parser(value_parser!(Shell))
                    .help("target shell"),
            ),
        )
}

fn run() -> Result<()> {
    let matches = command().try_get_matches()?;
    let (name, sub_matches) = matches.subcommand().unwrap_or(("demo", &matches));

    setup_logging(sub_matches.get_count("verbose"));
    let show = sub_matches.get_flag("show");

    match name {
        "demo" => demo_cmd(show),
        "sum" => sum_cmd(values(sub_matches), show),
        "completions" => {
            if let Some(shell) = sub_matches.get_one::<Shell>("shell") {
                completions_cmd(*shell);
            }
            Ok(())
        }
        _ => unreachable!(),
    }
}

fn values(matches: &ArgMatches) -> Vec<Integer> {
    matches
        .get_many::<Integer>("values")
        .into_iter()
        .flatten()
        .copied()
        .collect()
}

fn demo_cmd(show: bool) -> Result<()> {
    let a1 = Sum::from_integers(6, 7);
    let b1 = Sum::from_integers(7, 1);
    let expr = Expr::from(a1.add(b1));
    info!(%expr, "built demo expression");

    let value = eval::evaluate(&expr)?;
    report(&expr, value, show)
}

fn sum_cmd(values: Vec<Integer>, show: bool) -> Result<()> {
    let Some(expr) = Expr::chain(values) else {
        return Err(command()
            .error(ErrorKind::TooFewValues, "sum needs at least one value")
            .into());
    };
    info!(%expr, "built sum expression");

    let value = eval::evaluate(&expr)?;
    report(&expr, value, show)
}

fn completions_cmd(shell: Shell) {
    debug!(?shell, "generating completions");
    generate(shell, &mut command(), crate_name!(), &mut io::stdout());
}

fn report(expr: &Expr, value: Integer, show: bool) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if show {
        writeln!(stdout, "{expr} = {value}")?;
    } else {
        writeln!(stdout, "{value}")?;
    }
    Ok(())
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // RUST_LOG wins over -v when set
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer().with_writer(io::stderr).with_target(true);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();
}
