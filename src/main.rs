//! compost-grade: grade a compost reading from the command line.
//!
//! ```text
//!   compost-grade assess -t 45 -m 46 -p 7 --odor-category none
//!   compost-grade --rules my_table.json check
//! ```
//!
//! Log output goes to stderr; `RUST_LOG` overrides `--log-level`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use tracing_subscriber::EnvFilter;

use compost_fuzzy::config::{EngineConfig, fingerprint_hex};
use compost_fuzzy::ports::{BundledTable, RuleTableSource};
use compost_fuzzy::{Engine, Error, OdorCategory, Reading};

#[derive(Parser)]
#[command(name = "compost-grade", version)]
#[command(about = "Fuzzy compost maturity grading")]
struct Cli {
    /// Rule table (JSON). Defaults to the bundled table.
    #[arg(short, long, global = true)]
    rules: Option<PathBuf>,

    /// Use the bundled continuous ammonia-ppm table.
    #[arg(long, global = true, conflicts_with = "rules")]
    ammonia_ppm: bool,

    /// Print machine-readable JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Log level when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score and label one reading.
    Assess {
        /// Pile temperature (°C).
        #[arg(short, long, allow_negative_numbers = true)]
        temperature: f32,
        /// Moisture content (%).
        #[arg(short, long, allow_negative_numbers = true)]
        moisture: f32,
        /// Acidity (pH).
        #[arg(short, long, allow_negative_numbers = true)]
        ph: f32,
        /// Odor as a raw level on the table's odor axis.
        #[arg(
            long,
            allow_negative_numbers = true,
            conflicts_with = "odor_category",
            required_unless_present = "odor_category"
        )]
        odor: Option<f32>,
        /// Odor as a category.
        #[arg(long, value_enum)]
        odor_category: Option<OdorArg>,
        /// Show fuzzified degrees, fired rules and aggregation.
        #[arg(long)]
        explain: bool,
    },
    /// Validate a rule table and print its fingerprint.
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum OdorArg {
    None,
    Moderate,
    Putrid,
}

impl From<OdorArg> for OdorCategory {
    fn from(arg: OdorArg) -> Self {
        match arg {
            OdorArg::None => Self::None,
            OdorArg::Moderate => Self::Moderate,
            OdorArg::Putrid => Self::Putrid,
        }
    }
}

// ── File adapter ──────────────────────────────────────────────

struct FileTable<'a>(&'a Path);

impl RuleTableSource for FileTable<'_> {
    fn load(&self) -> compost_fuzzy::Result<EngineConfig> {
        let bytes = std::fs::read(self.0)
            .map_err(|e| Error::Source(format!("{}: {e}", self.0.display())))?;
        Ok(EngineConfig::from_json_slice(&bytes)?)
    }
}

fn load_table(cli: &Cli) -> Result<EngineConfig> {
    let config = match (&cli.rules, cli.ammonia_ppm) {
        (Some(path), _) => FileTable(path).load(),
        (None, true) => BundledTable::AmmoniaPpm.load(),
        (None, false) => BundledTable::Default.load(),
    };
    config.context("loading rule table")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_table(&cli)?;
    let engine = Engine::new(&config).with_context(|| format!("rule table '{}' rejected", config.name))?;

    match cli.command {
        Command::Check => {
            let fp = fingerprint_hex(engine.fingerprint());
            if cli.json {
                let out = serde_json::json!({
                    "name": engine.name(),
                    "rules": engine.rule_count(),
                    "fingerprint": fp,
                });
                println!("{out}");
            } else {
                println!("{}: ok ({} rules, sha256 {fp})", engine.name(), engine.rule_count());
            }
        }
        Command::Assess {
            temperature,
            moisture,
            ph,
            odor,
            odor_category,
            explain,
        } => {
            let reading = match (odor, odor_category) {
                (Some(level), None) => Reading::new(temperature, moisture, ph, level),
                (None, Some(cat)) => Reading::with_category(temperature, moisture, ph, cat.into()),
                _ => bail!("give exactly one of --odor or --odor-category"),
            };
            info!("assessing {reading:?} with table '{}'", engine.name());

            if explain {
                let ev = engine.evaluate(&reading);
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&ev)?);
                } else {
                    print_explain(&ev);
                }
            } else {
                let a = engine.assess(&reading);
                if cli.json {
                    println!("{}", serde_json::to_string(&a)?);
                } else {
                    println!("{:.2} {}", a.score, a.label);
                }
            }
        }
    }
    Ok(())
}

fn print_explain(ev: &compost_fuzzy::Evaluation) {
    for var in &ev.inputs {
        let terms: Vec<String> = var.terms.iter().map(|(t, d)| format!("{t}={d:.3}")).collect();
        println!("{:<12} {}", var.variable.name(), terms.join(" "));
    }
    match ev.odor_category {
        Some(cat) => println!("odor         level={:.2} category={cat}", ev.odor_level),
        None => println!("odor         level={:.2}", ev.odor_level),
    }
    println!("hazard       {:.3}", ev.hazard);
    for (id, strength) in &ev.fired {
        println!("rule #{id:<5} {strength:.3}");
    }
    let agg: Vec<String> = ev.aggregated.iter().map(|(m, d)| format!("{m}={d:.3}")).collect();
    println!("aggregated   {}", agg.join(" "));
    if ev.used_fallback {
        println!("(no rule fired, fallback score)");
    }
    println!("{:.2} {}", ev.assessment.score, ev.assessment.label);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn negative_readings_parse() {
        let cli = Cli::try_parse_from([
            "compost-grade", "assess", "-t", "-5", "-m", "-5", "-p", "-1", "--odor", "-0.5",
        ])
        .unwrap();
        match cli.command {
            Command::Assess {
                temperature,
                moisture,
                ph,
                odor,
                ..
            } => {
                assert_eq!(temperature, -5.0);
                assert_eq!(moisture, -5.0);
                assert_eq!(ph, -1.0);
                assert_eq!(odor, Some(-0.5));
            }
            Command::Check => panic!("parsed as check"),
        }
    }

    #[test]
    fn odor_needs_exactly_one_form() {
        let base = ["compost-grade", "assess", "-t", "45", "-m", "46", "-p", "7"];
        assert!(Cli::try_parse_from(base).is_err());
        let both = base.iter().chain(&["--odor", "1.5", "--odor-category", "none"]);
        assert!(Cli::try_parse_from(both).is_err());
        let category = base.iter().chain(&["--odor-category", "putrid"]);
        assert!(Cli::try_parse_from(category).is_ok());
    }
}
