//! dashboard-runner: headless runner for the food-donation dashboard queries.
//!
//! Usage:
//!   dashboard-runner --data-dir ./data --all
//!   dashboard-runner --db dataset.db --query 4 --from 2025-03-01 --to 2025-03-31
//!   dashboard-runner --data-dir ./data --query 3 --city Lyon --json
//!   dashboard-runner --data-dir ./data --export-db dataset.db
//!   dashboard-runner --data-dir ./data --ipc-mode

use anyhow::Result;
use chrono::NaiveDate;
use foodshare_core::{
    config::EngineConfig,
    engine::{DashboardEngine, Overview},
    filter::{DateRange, FilterContext, FilterDomain},
    source::{DataSource, JsonDirSource},
    store::DatasetDb,
    table::{QueryOutput, QueryResult, ResultTable},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetFilters,
    Overview,
    RunQuery {
        id: u32,
        #[serde(default)]
        city: Option<String>,
        #[serde(default)]
        from: Option<NaiveDate>,
        #[serde(default)]
        to: Option<NaiveDate>,
    },
    Quit,
}

#[derive(serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcResponse<'a> {
    Filters(&'a FilterDomain),
    Overview(&'a Overview),
    Query(&'a QueryResult),
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let as_json = args.iter().any(|a| a == "--json");
    let run_all = args.iter().any(|a| a == "--all");
    let query_id: Option<u32> = parse_arg(&args, "--query");
    let db = flag_value(&args, "--db");
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");
    let city = flag_value(&args, "--city");
    let from: Option<NaiveDate> = parse_arg(&args, "--from");
    let to: Option<NaiveDate> = parse_arg(&args, "--to");

    let config = match flag_value(&args, "--config") {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let source: Box<dyn DataSource> = match db {
        Some(path) => Box::new(DatasetDb::open(path)?),
        None => Box::new(JsonDirSource::new(data_dir)),
    };

    if !ipc_mode && !as_json {
        println!("Food donation dashboard: dashboard-runner");
        println!("  source:  {}", source.name());
        println!();
    }

    let engine = DashboardEngine::load(source.as_ref(), config)?;

    if let Some(path) = flag_value(&args, "--export-db") {
        let out = DatasetDb::open(path)?;
        out.migrate()?;
        out.import(engine.dataset().tables())?;
        if !ipc_mode && !as_json {
            println!("Exported dataset to {path}");
        }
    }

    if ipc_mode {
        return run_ipc_loop(&engine);
    }

    let ctx = build_context(&engine, city, from, to);
    let results = match query_id {
        Some(id) if !run_all => vec![engine.run_query(id, &ctx)?],
        _ => engine.run_all(&ctx),
    };

    if as_json {
        for result in &results {
            println!("{}", serde_json::to_string(result)?);
        }
    } else {
        print_summary(&engine.overview(), &ctx);
        for result in &results {
            print_result(result);
        }
    }

    Ok(())
}

fn run_ipc_loop(engine: &DashboardEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Unknown or malformed command: {}", buffer.trim());
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetFilters => {
                let domain = engine.filter_domain();
                write_response(&mut stdout, &IpcResponse::Filters(&domain))?;
            }
            IpcCommand::Overview => {
                let overview = engine.overview();
                write_response(&mut stdout, &IpcResponse::Overview(&overview))?;
            }
            IpcCommand::RunQuery { id, city, from, to } => {
                let ctx = build_context(engine, city.as_deref(), from, to);
                match engine.run_query(id, &ctx) {
                    Ok(result) => write_response(&mut stdout, &IpcResponse::Query(&result))?,
                    Err(e) => write_error(&mut stdout, &e.to_string())?,
                }
            }
        }
    }
    Ok(())
}

fn write_response(out: &mut impl Write, response: &IpcResponse<'_>) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string(response)?)?;
    out.flush()?;
    Ok(())
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(out, "{}", err_json)?;
    out.flush()?;
    Ok(())
}

/// A half-open selection takes its missing end from the claim date bounds.
fn build_context(
    engine: &DashboardEngine,
    city: Option<&str>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> FilterContext {
    let bounds = engine.filter_domain().date_bounds;
    let range = match (from, to) {
        (None, None) => None,
        (Some(start), Some(end)) => Some(DateRange::new(start, end)),
        (Some(start), None) => Some(DateRange::new(
            start,
            bounds.map_or(NaiveDate::MAX, |b| b.end),
        )),
        (None, Some(end)) => Some(DateRange::new(
            bounds.map_or(NaiveDate::MIN, |b| b.start),
            end,
        )),
    };
    FilterContext::new(city, range)
}

fn print_summary(overview: &Overview, ctx: &FilterContext) {
    println!("=== OVERVIEW ===");
    println!("  providers:      {}", overview.total_providers);
    println!("  receivers:      {}", overview.total_receivers);
    println!("  listings:       {}", overview.total_listings);
    println!("  total quantity: {}", overview.total_quantity);
    println!("  city:           {}", ctx.city().unwrap_or("All"));
    match ctx.date_range() {
        Some(r) => println!("  claim dates:    {} .. {}", r.start, r.end),
        None => println!("  claim dates:    any"),
    }
    println!();
}

fn print_result(result: &QueryResult) {
    println!("=== {} ===", result.title);
    match &result.output {
        QueryOutput::Scalar(metric) => println!("  {}: {}", metric.label, metric.value),
        QueryOutput::Table(table) if table.is_empty() => println!("  (no rows)"),
        QueryOutput::Table(table) => print_table(table),
    }
    println!();
}

fn print_table(table: &ResultTable) {
    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|v| v.to_string()).collect())
        .collect();
    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(String::len)
                .fold(name.len(), usize::max)
        })
        .collect();

    let header: Vec<String> = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(name, w)| format!("{name:<w$}"))
        .collect();
    println!("  {}", header.join(" | "));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    println!("  {}", rule.join("-+-"));
    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect();
        println!("  {}", line.join(" | "));
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// A flag whose value does not parse is ignored with a warning.
fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    let value = flag_value(args, flag)?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log::warn!("Ignoring {flag} {value:?}: not a valid value");
            None
        }
    }
}
