use std::{fmt::Display, fs::File, str::FromStr, sync::Mutex};

use anyhow::{Context, bail};
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use serde::Serialize;
use workbench_lib::{
    automaton::{Mode, Snapshot},
    config::{GeneralConfig, LoggerConfig, WorkbenchConfig},
    logger::LogLevel,
    pda, simulation, tm,
    transducer::{run_mealy, run_moore},
    transform::{
        complete::complete,
        elimination::fa_to_regex,
        grammar::fa_to_grammar,
        minimize::minimize,
        product::{BooleanOperation, combine, combine_with_regex, complement},
        subset::subset_construction,
        thompson::thompson,
    },
};

/// What to do with the loaded automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Simulate the automaton on `--input` with the engine of its mode.
    Run,
    Subset,
    Minimize,
    /// Build an NFA from `--regex`. Needs no automaton file.
    Thompson,
    Eliminate,
    /// Combine with `--with` or `--regex` using `--operation`.
    Combine,
    Complete,
    Grammar,
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "run" => Ok(Operation::Run),
            "subset" | "determinize" => Ok(Operation::Subset),
            "minimize" => Ok(Operation::Minimize),
            "thompson" => Ok(Operation::Thompson),
            "eliminate" | "regex" => Ok(Operation::Eliminate),
            "combine" | "product" => Ok(Operation::Combine),
            "complete" => Ok(Operation::Complete),
            "grammar" => Ok(Operation::Grammar),
            _ => Err(format!("Invalid operation: {}", s)),
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Run => write!(f, "run"),
            Operation::Subset => write!(f, "subset"),
            Operation::Minimize => write!(f, "minimize"),
            Operation::Thompson => write!(f, "thompson"),
            Operation::Eliminate => write!(f, "eliminate"),
            Operation::Combine => write!(f, "combine"),
            Operation::Complete => write!(f, "complete"),
            Operation::Grammar => write!(f, "grammar"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "Automata Workbench")]
#[command(version = "0.1")]
#[command(about = "Simulate and transform finite automata, PDAs, TMs and transducers", long_about = None)]
struct Args {
    /// JSON snapshot of the automaton.
    file: Option<String>,

    #[arg(short = 'x', long, default_value_t = Operation::Run)]
    op: Operation,

    #[arg(short, long, default_value = "")]
    input: String,

    #[arg(short, long)]
    regex: Option<String>,

    /// JSON snapshot of the second operand of `combine`.
    #[arg(short, long)]
    with: Option<String>,

    #[arg(short, long, default_value_t = BooleanOperation::Union)]
    operation: BooleanOperation,

    #[arg(short, long)]
    config: Option<String>,

    /// Overrides the mode stored in the snapshot for `run`.
    #[arg(short, long)]
    mode: Option<Mode>,
}

fn init_logging(config: &LoggerConfig) -> anyhow::Result<()> {
    if !*config.get_enabled() {
        return Ok(());
    }

    let level: tracing::Level = (*config.get_log_level()).into();

    if *config.get_log_file() {
        std::fs::create_dir_all("./logs")?;
        let path = format!(
            "./logs/workbench_run_{}.txt",
            Local::now().format("%Y-%m-%d_%H-%M-%S")
        );
        let file = File::create(&path).with_context(|| format!("could not create {path}"))?;

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .init();
    }

    Ok(())
}

fn load(path: Option<&str>) -> anyhow::Result<Snapshot> {
    let Some(path) = path else {
        bail!("this operation needs an automaton file");
    };
    let json = std::fs::read_to_string(path).with_context(|| format!("could not read {path}"))?;
    Ok(Snapshot::from_json(&json)?)
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_verdict(accepted: bool) {
    let verdict = if accepted {
        "accepted".bright_green()
    } else {
        "rejected".bright_red()
    };
    eprintln!("[{}] {}", LogLevel::Info.tag(), verdict);
}

#[derive(Serialize)]
struct FiniteRun<'a> {
    input: &'a str,
    accepted: bool,
}

fn run(snapshot: &Snapshot, input: &str, config: &WorkbenchConfig) -> anyhow::Result<()> {
    let automaton = &snapshot.automaton;

    match snapshot.mode {
        Mode::Dfa | Mode::Nfa => {
            let accepted = simulation::run(automaton, input, snapshot.mode)?;
            print_json(&FiniteRun { input, accepted })?;
            print_verdict(accepted);
        }
        Mode::Pda => {
            let outcome = pda::run(automaton, input, &config.pda)?;
            print_json(&outcome)?;
            eprintln!("[{}] {}", LogLevel::Info.tag(), outcome.status);
            print_verdict(outcome.accepted);
        }
        Mode::Tm => {
            let outcome = tm::run(automaton, input, &config.tm)?;
            print_json(&outcome)?;
            eprintln!("[{}] {}", LogLevel::Info.tag(), outcome.status);
        }
        Mode::Mealy => print_json(&run_mealy(automaton, input)?)?,
        Mode::Moore => print_json(&run_moore(automaton, input)?)?,
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = WorkbenchConfig::from_optional_file(args.config)?;
    init_logging(config.logger())?;

    tracing::info!(operation = %args.op, "starting");

    match args.op {
        Operation::Run => {
            let mut snapshot = load(args.file.as_deref())?;
            if let Some(mode) = args.mode {
                snapshot.mode = mode;
            }
            run(&snapshot, &args.input, &config)?
        }
        Operation::Subset => {
            print_json(&subset_construction(&load(args.file.as_deref())?.automaton)?)?
        }
        Operation::Minimize => print_json(&minimize(&load(args.file.as_deref())?.automaton)?)?,
        Operation::Thompson => {
            let Some(regex) = args.regex else {
                bail!("thompson needs --regex");
            };
            print_json(&thompson(&regex)?)?
        }
        Operation::Eliminate => print_json(&fa_to_regex(&load(args.file.as_deref())?.automaton)?)?,
        Operation::Combine => {
            let a = load(args.file.as_deref())?.automaton;
            let result = match (args.operation, args.with, args.regex) {
                (BooleanOperation::Complement, _, _) => complement(&a)?,
                (operation, Some(with), _) => {
                    combine(&a, &load(Some(&with))?.automaton, operation)?
                }
                (operation, None, Some(regex)) => combine_with_regex(&a, &regex, operation)?,
                (operation, None, None) => bail!("{operation} needs --with or --regex"),
            };
            print_json(&result)?
        }
        Operation::Complete => print_json(&complete(&load(args.file.as_deref())?.automaton)?)?,
        Operation::Grammar => {
            let grammar = fa_to_grammar(&load(args.file.as_deref())?.automaton)?;
            eprint!("{grammar}");
            print_json(&grammar)?
        }
    }

    Ok(())
}
