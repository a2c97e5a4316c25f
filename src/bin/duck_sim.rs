//! One-shot front end for the duck simulator.
//!
//! Each invocation loads the catalog (explicit `--catalog`, `DUCKSIM_CATALOG`,
//! the bundled file, or the built-in roster), applies a single command, and
//! prints the outcome as plain text or, with `--json`, as one JSON document.
//! Overrides only live for the duration of the process.

use anyhow::{Context, Result, bail};
use ducksim::{BehaviorCategory, Performance, Simulator, init_tracing, load_simulator};
use serde_json::json;
use std::env;
use std::fmt::Write as _;
use std::path::PathBuf;

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse(env::args().skip(1))?;
    let mut simulator = load_simulator(cli.catalog.as_deref())?;
    let output = execute_command(&mut simulator, &cli.command, cli.json)?;
    print!("{output}");
    Ok(())
}

#[derive(Debug)]
struct Cli {
    catalog: Option<PathBuf>,
    json: bool,
    command: Command,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Ducks,
    Behaviors(Option<String>),
    Perform {
        duck: String,
        category: String,
    },
    Override {
        duck: String,
        category: String,
        implementation: String,
    },
    Simulate,
}

impl Cli {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut catalog = None;
        let mut json = false;
        let mut positional = Vec::new();

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--catalog" => {
                    let value = args
                        .next()
                        .with_context(|| "--catalog requires a path argument")?;
                    catalog = Some(PathBuf::from(value));
                }
                "--json" => json = true,
                "--help" | "-h" => usage(0),
                other if other.starts_with("--") => bail!("Unknown option: {other}"),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let Some(name) = positional.next() else {
            usage(1);
        };
        let rest: Vec<String> = positional.collect();
        let command = match (name.as_str(), rest.as_slice()) {
            ("ducks", []) => Command::Ducks,
            ("behaviors", []) => Command::Behaviors(None),
            ("behaviors", [category]) => Command::Behaviors(Some(category.clone())),
            ("perform", [duck, category]) => Command::Perform {
                duck: duck.clone(),
                category: category.clone(),
            },
            ("override", [duck, category, implementation]) => Command::Override {
                duck: duck.clone(),
                category: category.clone(),
                implementation: implementation.clone(),
            },
            ("simulate", []) => Command::Simulate,
            ("ducks" | "behaviors" | "perform" | "override" | "simulate", _) => {
                bail!("Wrong number of arguments for '{name}' (see --help)")
            }
            (other, _) => bail!("Unknown command: {other}"),
        };

        Ok(Self {
            catalog,
            json,
            command,
        })
    }
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: duck-sim [--catalog PATH] [--json] <command>\n\nCommands:\n  ducks                          List ducks and their current behaviors.\n  behaviors [CATEGORY]            List behavior implementations (optionally for one category).\n  perform DUCK CATEGORY           Execute a duck's current behavior.\n  override DUCK CATEGORY IMPL     Swap a duck's behavior, then execute it.\n  simulate                        Perform everything, fit duck 0 with a rocket, perform again.\n\nDUCK is an index or label; CATEGORY is an index or one of quack, swim, fly.\n\nEnvironment:\n  DUCKSIM_CATALOG   Catalog file used when --catalog is absent.\n  DUCKSIM_LOG       tracing filter for stderr logs (default: warn).\n\nExamples:\n  duck-sim perform MallardDuck fly\n  duck-sim --json override 0 fly rocket_powered"
    );
    std::process::exit(code);
}

fn execute_command(simulator: &mut Simulator, command: &Command, json: bool) -> Result<String> {
    let mut out = String::new();
    match command {
        Command::Ducks => {
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&simulator.snapshot())?)?;
            } else {
                render_ducks(simulator, &mut out)?;
            }
        }
        Command::Behaviors(filter) => {
            let category = filter
                .as_deref()
                .map(BehaviorCategory::resolve)
                .transpose()?;
            let registry = simulator.catalog().registry();
            let listed: Vec<_> = registry
                .iter()
                .filter(|behavior| category.is_none_or(|c| behavior.category() == c))
                .collect();
            if json {
                let entries: Vec<_> = listed
                    .iter()
                    .map(|behavior| {
                        json!({
                            "name": behavior.name(),
                            "category": behavior.category(),
                            "message": behavior.execute(),
                        })
                    })
                    .collect();
                writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
            } else {
                for behavior in listed {
                    writeln!(
                        out,
                        "{:<6} {:<16} {}",
                        behavior.category(),
                        behavior.name(),
                        behavior.execute()
                    )?;
                }
            }
        }
        Command::Perform { duck, category } => {
            let index = simulator.catalog().resolve_duck(duck)?;
            let category = BehaviorCategory::resolve(category)?;
            let result = simulator.execute(index, category)?;
            render_result(simulator, index, category, &result, json, &mut out)?;
        }
        Command::Override {
            duck,
            category,
            implementation,
        } => {
            let index = simulator.catalog().resolve_duck(duck)?;
            let category = BehaviorCategory::resolve(category)?;
            simulator.override_behavior(index, category, implementation)?;
            let result = simulator.execute(index, category)?;
            render_result(simulator, index, category, &result, json, &mut out)?;
        }
        Command::Simulate => {
            let before = simulator.perform_all()?;
            simulator.override_behavior(0, BehaviorCategory::Fly, "rocket_powered")?;
            let after = simulator.perform_all()?;
            if json {
                let report = json!({ "before": before, "after": after });
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                writeln!(out, "before")?;
                render_performances(&before, &mut out)?;
                writeln!(out, "\nafter fitting {} with a rocket", label_of(simulator, 0))?;
                render_performances(&after, &mut out)?;
            }
        }
    }
    Ok(out)
}

fn label_of(simulator: &Simulator, index: usize) -> &str {
    simulator.catalog().label(index).unwrap_or("?")
}

fn render_ducks(simulator: &Simulator, out: &mut String) -> Result<()> {
    for (index, duck) in simulator.list_entities().iter().enumerate() {
        let bindings = simulator
            .list_categories()
            .iter()
            .map(|category| {
                let name = duck.behavior(*category).map(|b| b.name()).unwrap_or("-");
                let marker = if duck.is_overridden(*category) { "*" } else { "" };
                format!("{category}={name}{marker}")
            })
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{index}  {:<12} {bindings}", duck.label())?;
    }
    Ok(())
}

fn render_result(
    simulator: &Simulator,
    index: usize,
    category: BehaviorCategory,
    result: &str,
    json: bool,
    out: &mut String,
) -> Result<()> {
    let label = label_of(simulator, index);
    if json {
        let value = json!({
            "duck": label,
            "category": category,
            "overridden": simulator.is_overridden(index, category)?,
            "result": result,
        });
        writeln!(out, "{}", serde_json::to_string(&value)?)?;
    } else {
        writeln!(out, "{result}")?;
    }
    Ok(())
}

fn render_performances(performances: &[Performance], out: &mut String) -> Result<()> {
    for performance in performances {
        writeln!(
            out,
            "  {:<12} {:<6} {}",
            performance.duck, performance.category, performance.result
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli> {
        Cli::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_flags_and_override_command() {
        let cli = parse(&["--json", "override", "0", "fly", "rocket_powered"]).unwrap();
        assert!(cli.json);
        assert_eq!(
            cli.command,
            Command::Override {
                duck: "0".into(),
                category: "fly".into(),
                implementation: "rocket_powered".into(),
            }
        );
    }

    #[test]
    fn rejects_wrong_arity() {
        assert!(parse(&["perform", "0"]).is_err());
        assert!(parse(&["dance"]).is_err());
    }

    #[test]
    fn override_command_reports_new_result() {
        let mut simulator = Simulator::standard();
        let command = Command::Override {
            duck: "MallardDuck".into(),
            category: "fly".into(),
            implementation: "rocket_powered".into(),
        };
        let out = execute_command(&mut simulator, &command, false).unwrap();
        assert_eq!(out, "I'm flying with a rocket!\n");
    }
}
