//! Command-line front end: proves inequalities and simplifies terms.

use std::{fmt::Display, str::FromStr};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use inequality_prover::{
    simplify::{evaluate, simplify},
    Budget, Problem, ProofOutcome, Proposition, RuleSet, Solution, Term,
};
use serde::Serialize;
use tracing::info;

/// Proves polynomial-style inequalities over the reals by forward chaining.
#[derive(Parser)]
#[command(name = "prover")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Log every admitted fact
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prove an inequality such as "0<=x^2+y^2"
    Prove {
        /// Goal inequality
        goal: String,

        /// Assumption, may be repeated
        #[arg(short = 'a', long = "assume")]
        assume: Vec<String>,

        /// Maximum number of deduced facts
        #[arg(long)]
        max_steps: Option<usize>,

        /// Time limit in milliseconds
        #[arg(long)]
        time_limit_ms: Option<f64>,
    },

    /// Simplify a term to its normal form
    Simplify {
        /// Term such as "2*x+3*x-x"
        term: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("invalid output format: {s}, must be 'text' or 'json'")),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Serialize)]
struct SimplifyReport {
    term: String,
    simplified: String,
    value: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Prove {
            goal,
            assume,
            max_steps,
            time_limit_ms,
        } => prove_command(&goal, &assume, max_steps, time_limit_ms, cli.format),
        Commands::Simplify { term } => simplify_command(&term, cli.format),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("inequality_prover=debug,prover=debug,info")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn prove_command(
    goal: &str,
    assume: &[String],
    max_steps: Option<usize>,
    time_limit_ms: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    let goal: Proposition = goal
        .parse()
        .with_context(|| format!("failed to parse goal '{goal}'"))?;
    let assumptions = assume
        .iter()
        .map(|assumption| {
            assumption
                .parse()
                .with_context(|| format!("failed to parse assumption '{assumption}'"))
        })
        .collect::<Result<Vec<Proposition>>>()?;
    let problem = Problem::new(goal, assumptions).context("invalid problem")?;

    let budget = Budget {
        max_steps,
        time_limit_ms,
    };
    info!(%problem, ?budget, "proving");

    let mut solution = Solution::new(&problem);
    let outcome = solution.prove(&RuleSet::default(), budget);
    let report = solution.report(outcome);

    match format {
        OutputFormat::Text => {
            for line in &report.history {
                println!("{line}");
            }
            println!();
            print!("{solution}");
            println!();
            println!("{}", report.outcome);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if outcome != ProofOutcome::Proved {
        std::process::exit(1);
    }
    Ok(())
}

fn simplify_command(term: &str, format: OutputFormat) -> Result<()> {
    let parsed: Term = term
        .parse()
        .with_context(|| format!("failed to parse term '{term}'"))?;
    let simplified = simplify(&parsed).with_context(|| format!("cannot simplify '{parsed}'"))?;
    let value = evaluate(&parsed).ok().map(|value| value.to_string());

    let report = SimplifyReport {
        term: parsed.to_string(),
        simplified: simplified.to_string(),
        value,
    };
    match format {
        OutputFormat::Text => println!("{}", report.simplified),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
