//! Calculator Suite CLI
//!
//! Runs calculators from the command line, one at a time or in batches

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use calculator_suite::calculators::AmortizationScheduleCalculator;
use calculator_suite::{
    CalculationOutcome, CalculationRequest, CalculatorKind, CalculatorRunner, FormFields,
    Guardrails,
};

#[derive(Debug, Parser)]
#[command(name = "calculator_suite", version, about = "Closed-form calculators")]
struct Cli {
    /// Guardrails JSON file (defaults to $CALC_GUARDRAILS, then built-in values)
    #[arg(long, global = true)]
    guardrails: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every calculator
    List,

    /// Run one calculator
    Run {
        calculator: CalculatorKind,

        /// Field value as key=value; repeatable
        #[arg(short, long = "field", value_parser = parse_key_val)]
        fields: Vec<(String, String)>,

        /// JSON object of fields; --field values override it
        #[arg(long)]
        fields_json: Option<PathBuf>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run every row of a CSV (or a JSON array of requests) and write the results
    Batch {
        input: PathBuf,

        /// Output CSV path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the month-by-month amortization schedule as CSV
    Schedule {
        #[arg(short, long = "field", value_parser = parse_key_val)]
        fields: Vec<(String, String)>,

        #[arg(short, long, default_value = "amortization_schedule.csv")]
        output: PathBuf,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{}`", s))
}

/// One line of batch output
#[derive(Debug, Serialize)]
struct BatchOutputRow<'a> {
    id: &'a str,
    calculator: &'a str,
    status: &'a str,
    label: &'a str,
    value: &'a str,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let guardrails = match &cli.guardrails {
        Some(path) => Guardrails::from_json_path(path)?,
        None => Guardrails::from_env()?,
    };
    let runner = CalculatorRunner::with_guardrails(guardrails);

    match cli.command {
        Command::List => {
            for kind in CalculatorKind::ALL {
                println!("{:<24} {}", kind.slug(), kind.title());
            }
        }
        Command::Run {
            calculator,
            fields,
            fields_json,
            json,
        } => {
            let mut form = match fields_json {
                Some(path) => {
                    let file = File::open(&path)
                        .with_context(|| format!("Failed to open {}", path.display()))?;
                    serde_json::from_reader(BufReader::new(file))
                        .with_context(|| format!("Invalid fields JSON in {}", path.display()))?
                }
                None => FormFields::new(),
            };
            form.merge(FormFields::from_pairs(fields));

            let outcome = runner.run(calculator, &form);
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_outcome(calculator, &outcome);
            }
        }
        Command::Batch { input, output } => run_batch(&runner, &input, output)?,
        Command::Schedule { fields, output } => {
            let form = FormFields::from_pairs(fields);
            let schedule = AmortizationScheduleCalculator
                .schedule(&form, runner.guardrails())?;
            let summary = schedule.summary()?;

            let mut writer = csv::Writer::from_path(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            for row in &schedule.rows {
                writer.serialize(row)?;
            }
            writer.flush()?;

            println!("Scheduled payment: {:.2}", schedule.scheduled_payment);
            println!("Periods:           {}", summary.periods);
            println!("Total paid:        {:.2}", summary.total_paid);
            println!("Total interest:    {:.2}", summary.total_interest);
            println!("Interest saved:    {:.2}", summary.interest_saved);
            println!("Wrote {} rows to {}", schedule.rows.len(), output.display());
        }
    }

    Ok(())
}

fn print_outcome(kind: CalculatorKind, outcome: &CalculationOutcome) {
    println!("{}", kind.title());
    println!("{}", "-".repeat(kind.title().len()));
    match outcome {
        CalculationOutcome::Ok { fields } => {
            for line in fields {
                println!("{}: {}", line.label, line.value);
            }
        }
        CalculationOutcome::Error { message } => println!("Error: {}", message),
        CalculationOutcome::Skipped => println!("Nothing to calculate: a required field is missing."),
    }
}

/// Load batch requests from JSON (an array of requests) or CSV (a `calculator`
/// column, an optional `id` column and one column per field; blank cells are unbound)
fn load_requests(input: &Path) -> Result<Vec<CalculationRequest>> {
    let is_json = input
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        let file =
            File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
        return serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Invalid request JSON in {}", input.display()));
    }

    let mut reader = csv::Reader::from_path(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let headers = reader.headers()?.clone();
    if !headers.iter().any(|h| h == "calculator") {
        bail!("{} has no `calculator` column", input.display());
    }

    let mut requests = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let mut id = None;
        let mut calculator = None;
        let mut pairs = Vec::new();

        for (header, cell) in headers.iter().zip(record.iter()) {
            match header {
                "id" => id = Some(cell.to_string()),
                "calculator" => calculator = Some(cell),
                _ if cell.trim().is_empty() => {}
                _ => pairs.push((header.to_string(), cell.to_string())),
            }
        }

        let calculator: CalculatorKind = calculator
            .unwrap_or_default()
            .parse()
            .map_err(|e: String| anyhow::anyhow!("row {}: {}", i + 1, e))?;
        requests.push(CalculationRequest {
            id,
            calculator,
            fields: FormFields::from_pairs(pairs),
        });
    }

    Ok(requests)
}

fn run_batch(runner: &CalculatorRunner, input: &Path, output: Option<PathBuf>) -> Result<()> {
    let start = Instant::now();
    let requests = load_requests(input)?;
    log::info!("Loaded {} requests from {}", requests.len(), input.display());

    let responses = runner.run_batch(&requests);

    let sink: Box<dyn io::Write> = match &output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };
    let mut writer = csv::Writer::from_writer(sink);

    for (i, response) in responses.iter().enumerate() {
        let fallback_id = (i + 1).to_string();
        let id = response.id.as_deref().unwrap_or(&fallback_id);
        let calculator = response.calculator.slug();
        let status = response.outcome.status();

        match &response.outcome {
            CalculationOutcome::Ok { fields } => {
                for line in fields {
                    writer.serialize(BatchOutputRow {
                        id,
                        calculator,
                        status,
                        label: &line.label,
                        value: &line.value,
                    })?;
                }
            }
            CalculationOutcome::Error { message } => writer.serialize(BatchOutputRow {
                id,
                calculator,
                status,
                label: "message",
                value: message,
            })?,
            CalculationOutcome::Skipped => writer.serialize(BatchOutputRow {
                id,
                calculator,
                status,
                label: "",
                value: "",
            })?,
        }
    }
    writer.flush()?;

    if let Some(path) = output {
        println!(
            "Wrote {} results to {} in {:?}",
            responses.len(),
            path.display(),
            start.elapsed()
        );
    }
    Ok(())
}
