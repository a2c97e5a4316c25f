//! Replays taps on the duck picker screen from stdin.
//!
//! Each input line is `SECTION ROW`, where SECTION is a position or one of
//! `duck`, `behavior`, `simulate`. Notices produced by behavior taps are
//! printed one per line; `--table` prints the screen layout first and
//! `--verbose` also reports selections and rocket upgrades.

use anyhow::{Context, Result, anyhow, bail};
use ducksim::{Session, TableSection, Tap, init_tracing, load_simulator};
use std::env;
use std::fmt;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse()?;
    let simulator = load_simulator(cli.catalog.as_deref())?;
    let mut session = Session::new(simulator);

    let mut output = String::new();
    if cli.table {
        render_table(&session, &mut output)?;
    }
    let stdin = io::stdin();
    replay(
        &mut session,
        BufReader::new(stdin.lock()),
        &mut output,
        cli.verbose,
    )?;
    print!("{output}");
    Ok(())
}

struct Cli {
    catalog: Option<PathBuf>,
    table: bool,
    verbose: bool,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut cli = Cli {
            catalog: None,
            table: false,
            verbose: false,
        };
        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--catalog" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--catalog requires a path argument"))?;
                    cli.catalog = Some(PathBuf::from(value));
                }
                "--table" => cli.table = true,
                "--verbose" | "-v" => cli.verbose = true,
                "--help" | "-h" => usage(0),
                other => bail!("Unknown argument: {other}"),
            }
        }
        Ok(cli)
    }
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: duck-session [--catalog PATH] [--table] [--verbose] < taps\n\nEach line of input is 'SECTION ROW'. Blank lines and lines starting with '#' are skipped.\n\nExample:\n  printf 'duck 0\\nbehavior fly\\nsimulate 0\\nbehavior fly\\n' | duck-session"
    );
    std::process::exit(code);
}

fn render_table(session: &Session, writer: &mut impl fmt::Write) -> fmt::Result {
    for section in TableSection::ALL {
        writeln!(writer, "[{}]", section.title())?;
        for row in 0..session.row_count(section) {
            writeln!(writer, "  {row}: {}", session.row_text(section, row).unwrap_or(""))?;
        }
    }
    Ok(())
}

/// Apply every tap read from `reader` and render the outcome into `writer`.
fn replay<R: BufRead, W: fmt::Write>(
    session: &mut Session,
    reader: R,
    writer: &mut W,
    verbose: bool,
) -> Result<()> {
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (section, row) = parse_tap(session, trimmed)
            .with_context(|| format!("line {}: '{trimmed}'", idx + 1))?;
        let tap = session
            .select(section, row)
            .with_context(|| format!("line {}: '{trimmed}'", idx + 1))?;
        match tap {
            Tap::Performed(notice) => writeln!(writer, "{}", notice.message)?,
            Tap::DuckSelected(index) if verbose => {
                let label = session.selected_duck().map(|d| d.label()).unwrap_or("?");
                writeln!(writer, "selected {index} ({label})")?;
            }
            Tap::RocketFitted(index) if verbose => {
                writeln!(writer, "rocket fitted to duck {index}")?;
            }
            Tap::Ignored if verbose => writeln!(writer, "ignored")?,
            _ => {}
        }
    }
    Ok(())
}

// Behavior rows may also be named by category so scripts read naturally.
fn parse_tap(session: &Session, line: &str) -> Result<(TableSection, usize)> {
    let mut parts = line.split_whitespace();
    let (Some(section_token), Some(row_token), None) = (parts.next(), parts.next(), parts.next())
    else {
        bail!("expected 'SECTION ROW'");
    };

    let section = TableSection::resolve(section_token)
        .ok_or_else(|| anyhow!("unknown section '{section_token}'"))?;
    let row = match row_token.parse::<usize>() {
        Ok(row) => row,
        Err(_) => match section {
            TableSection::Behavior => ducksim::BehaviorCategory::resolve(row_token)?.index(),
            TableSection::Duck => session.simulator().catalog().position(row_token)?,
            TableSection::Simulate => bail!("simulate row must be a number"),
        },
    };
    Ok((section, row))
}
