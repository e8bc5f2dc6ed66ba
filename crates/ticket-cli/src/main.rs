mod client;
mod presenter;

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use ticket_form::{
    FieldStore, FieldValue, Step, StepDefinition, StepValidation, TicketId, TicketService,
    TicketType, UserRole, Wizard, assemble, definition, draft_schema, is_known_field, names,
    validate_step,
};
use tracing_subscriber::EnvFilter;

use crate::client::{DryRunService, HttpTicketService};
use crate::presenter::{Verbosity, WizardPresenter};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Ticket creation tooling for the Peerlend marketplace",
    long_about = "Walks the four-step ticket form in a text shell and submits the draft to the marketplace API or a dry-run file"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Walk the four-step form interactively and submit the ticket.
    Wizard {
        /// Role to open the wizard with; picks the default ticket direction.
        #[arg(long, value_enum, default_value = "borrower")]
        role: RoleArg,
        /// Marketplace API base URL; falls back to PEERLEND_API_URL.
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,
        /// Write the draft to a file (or stdout) instead of calling the API.
        #[arg(long)]
        dry_run: bool,
        /// Output path for the dry-run draft.
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        /// Print status labels, field lists, and error kinds.
        #[arg(long)]
        verbose: bool,
        /// How step transitions are printed.
        #[arg(long, value_enum, default_value = "text")]
        format: SnapshotFormat,
    },
    /// Validate a JSON file of field values step by step.
    Check {
        /// JSON object mapping field names to values.
        #[arg(long, value_name = "FILE")]
        values: PathBuf,
        /// Check a single step (1-4) instead of all four.
        #[arg(long, value_name = "STEP")]
        step: Option<u8>,
    },
    /// Assemble the submission payload from a JSON file of field values.
    Draft {
        /// JSON object mapping field names to values.
        #[arg(long, value_name = "FILE")]
        values: PathBuf,
        /// Role that decides the ticket direction when the file names none.
        #[arg(long, value_enum, default_value = "borrower")]
        role: RoleArg,
        /// Output path for the draft JSON; stdout when omitted.
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Print the JSON schema of the submission payload.
    Schema,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoleArg {
    Lender,
    Borrower,
    Both,
}

impl RoleArg {
    fn role(self) -> UserRole {
        match self {
            RoleArg::Lender => UserRole::Lender,
            RoleArg::Borrower => UserRole::Borrower,
            RoleArg::Both => UserRole::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SnapshotFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match Cli::parse().command {
        Command::Wizard {
            role,
            api_url,
            dry_run,
            out,
            verbose,
            format,
        } => run_wizard(role.role(), api_url, dry_run, out, verbose, format).await,
        Command::Check { values, step } => run_check(&values, step),
        Command::Draft { values, role, out } => run_draft(&values, role.role(), out),
        Command::Schema => run_schema(),
    }
}

async fn run_wizard(
    role: UserRole,
    api_url: Option<String>,
    dry_run: bool,
    out: Option<PathBuf>,
    verbose: bool,
    format: SnapshotFormat,
) -> CliResult<()> {
    let service = build_service(api_url, dry_run, out)?;
    let mut presenter = WizardPresenter::new(
        Verbosity::from_verbose(verbose),
        matches!(format, SnapshotFormat::Json),
    );

    let mut wizard = Wizard::open(role);
    presenter.show_header(wizard.role(), wizard.ticket_type());

    loop {
        let definition = wizard.current_definition();
        presenter.show_step(definition, &wizard.snapshot());

        match fill_step(&mut wizard, definition)? {
            StepInput::Filled => {}
            StepInput::Back => {
                wizard.back();
                continue;
            }
            StepInput::Cancelled => {
                wizard.cancel();
                presenter.show_cancelled();
                return Ok(());
            }
        }

        if wizard.step().is_last() {
            presenter.show_summary(wizard.store());
            match confirm_submit(&mut wizard, service.as_ref(), &presenter).await? {
                SubmitOutcome::Created(ticket_id) => {
                    presenter.show_success(&ticket_id);
                    return Ok(());
                }
                SubmitOutcome::Back => {
                    wizard.back();
                }
                SubmitOutcome::Cancelled => {
                    wizard.cancel();
                    presenter.show_cancelled();
                    return Ok(());
                }
            }
        } else {
            wizard.next();
            if let Some(error) = wizard.error() {
                presenter.show_error(error);
            }
        }
    }
}

fn build_service(
    api_url: Option<String>,
    dry_run: bool,
    out: Option<PathBuf>,
) -> CliResult<Box<dyn TicketService>> {
    if dry_run {
        return Ok(Box::new(DryRunService::new(out)));
    }
    let base = match api_url.or_else(|| env::var("PEERLEND_API_URL").ok()) {
        Some(base) => base,
        None => {
            return Err(
                "no API base URL; pass --api-url, set PEERLEND_API_URL, or use --dry-run".into(),
            );
        }
    };
    Ok(Box::new(HttpTicketService::new(&base)?))
}

enum StepInput {
    Filled,
    Back,
    Cancelled,
}

/// Prompt every visible field of the step, current values as defaults.
fn fill_step(wizard: &mut Wizard, definition: &StepDefinition) -> CliResult<StepInput> {
    for field in definition.fields {
        if skip_field(wizard, field) {
            continue;
        }
        match prompt_field(wizard, field)? {
            FieldInput::Set(value) => wizard.set_field(field, value),
            FieldInput::Back => return Ok(StepInput::Back),
            FieldInput::Cancel => return Ok(StepInput::Cancelled),
        }
    }
    Ok(StepInput::Filled)
}

/// Fields the current answers make irrelevant. Earlier answers in the same
/// step decide this, so the toggle and warranty prompts come first in the
/// step tables.
fn skip_field(wizard: &Wizard, field: &str) -> bool {
    match field {
        names::TICKET_TYPE => !wizard.role().can_choose_ticket_type(),
        names::MIN_AMOUNT
        | names::MAX_AMOUNT
        | names::MIN_INTEREST_RATE
        | names::MAX_INTEREST_RATE
        | names::MIN_TERM_MONTHS
        | names::MAX_TERM_MONTHS => !wizard.store().flag(names::FLEXIBLE_TERMS),
        names::WARRANTY_DESCRIPTION | names::WARRANTY_VALUE => {
            wizard.store().text(names::WARRANTY_TYPE) == "none"
        }
        _ => false,
    }
}

#[derive(Debug, PartialEq)]
enum FieldInput {
    Set(FieldValue),
    Back,
    Cancel,
}

const TICKET_TYPE_CHOICES: &[&str] = &["lending_offer", "borrowing_request"];
const LOAN_TYPE_CHOICES: &[&str] = &["personal", "business", "education", "vehicle", "home"];
const WARRANTY_TYPE_CHOICES: &[&str] = &["none", "property", "vehicle", "guarantor"];

fn prompt_field(wizard: &Wizard, field: &str) -> CliResult<FieldInput> {
    let store = wizard.store();
    match field {
        names::FLEXIBLE_TERMS | names::IS_PUBLIC => prompt_flag(field, store.flag(field)),
        names::TICKET_TYPE => prompt_choice(field, store.text(field), TICKET_TYPE_CHOICES),
        names::LOAN_TYPE => prompt_choice(field, store.text(field), LOAN_TYPE_CHOICES),
        names::WARRANTY_TYPE => prompt_choice(field, store.text(field), WARRANTY_TYPE_CHOICES),
        _ => prompt_text(field, store.text(field)),
    }
}

fn prompt_text(field: &str, current: &str) -> CliResult<FieldInput> {
    let default = if current.is_empty() {
        None
    } else {
        Some(current)
    };
    let line = prompt_line(&field_label(field), default)?;
    Ok(match navigation(&line) {
        Some(input) => input,
        None => FieldInput::Set(FieldValue::text(line)),
    })
}

fn prompt_flag(field: &str, current: bool) -> CliResult<FieldInput> {
    let label = format!("{} (y/n)", field_label(field));
    let hint = if current { "Y" } else { "N" };
    loop {
        let line = prompt_line(&label, Some(hint))?;
        if let Some(input) = navigation(&line) {
            return Ok(input);
        }
        match parse_flag(&line) {
            Some(flag) => return Ok(FieldInput::Set(FieldValue::Bool(flag))),
            None => println!("Invalid answer '{}'. Expected yes or no.", line),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

fn prompt_choice(field: &str, current: &str, choices: &[&str]) -> CliResult<FieldInput> {
    let label = format!("{} ({})", field_label(field), choices.join("/"));
    loop {
        let line = prompt_line(&label, Some(current))?;
        if let Some(input) = navigation(&line) {
            return Ok(input);
        }
        if let Some(choice) = choices.iter().find(|choice| choice.eq_ignore_ascii_case(&line)) {
            return Ok(FieldInput::Set(FieldValue::text(*choice)));
        }
        println!("Choose one of: {}.", choices.join(", "));
    }
}

fn navigation(line: &str) -> Option<FieldInput> {
    if line.eq_ignore_ascii_case("/back") {
        Some(FieldInput::Back)
    } else if line.eq_ignore_ascii_case("/cancel") {
        Some(FieldInput::Cancel)
    } else {
        None
    }
}

fn field_label(field: &str) -> String {
    let mut label = field.replace('_', " ");
    if let Some(first) = label.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    label
}

fn prompt_line(prompt: &str, default: Option<&str>) -> CliResult<String> {
    let mut stdout = io::stdout();
    match default {
        Some(default) if !default.is_empty() => write!(stdout, "{} [{}]: ", prompt, default)?,
        _ => write!(stdout, "{}: ", prompt)?,
    }
    stdout.flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Err("input closed before the form was finished".into());
    }
    let answer = line.trim();
    if answer.is_empty()
        && let Some(default) = default
    {
        return Ok(default.to_string());
    }
    Ok(answer.to_string())
}

enum SubmitOutcome {
    Created(TicketId),
    Back,
    Cancelled,
}

async fn confirm_submit(
    wizard: &mut Wizard,
    service: &dyn TicketService,
    presenter: &WizardPresenter,
) -> CliResult<SubmitOutcome> {
    loop {
        let answer = prompt_line("Submit this ticket? (y = submit, b = back, c = cancel)", None)?;
        match answer.to_lowercase().as_str() {
            "y" | "yes" => {
                if let Some(ticket_id) = wizard.submit(service).await {
                    return Ok(SubmitOutcome::Created(ticket_id));
                }
                if let Some(error) = wizard.error() {
                    presenter.show_error(error);
                }
            }
            "b" | "back" | "/back" => return Ok(SubmitOutcome::Back),
            "c" | "cancel" | "/cancel" => return Ok(SubmitOutcome::Cancelled),
            other => println!("Invalid answer '{}'. Expected y, b, or c.", other),
        }
    }
}

fn run_check(values_path: &Path, step: Option<u8>) -> CliResult<()> {
    let store = load_store(values_path, TicketType::BorrowingRequest)?;
    let selected = match step {
        Some(number) => {
            let step = Step::from_number(number)
                .ok_or_else(|| format!("no step {}; expected 1-4", number))?;
            vec![step]
        }
        None => Step::ALL.to_vec(),
    };

    let mut failed = false;
    for step in selected {
        let title = definition(step).title;
        match validate_step(&store, step) {
            StepValidation::Valid => println!("step {} ({}): ok", step.number(), title),
            StepValidation::Invalid(reason) => {
                failed = true;
                println!("step {} ({}): {}", step.number(), title, reason);
            }
        }
    }

    if failed {
        return Err("one or more steps failed validation".into());
    }
    Ok(())
}

fn run_draft(values_path: &Path, role: UserRole, out: Option<PathBuf>) -> CliResult<()> {
    let store = load_store(values_path, role.default_ticket_type())?;
    for step in Step::ALL {
        if let StepValidation::Invalid(reason) = validate_step(&store, step) {
            let title = definition(step).title;
            return Err(format!("step {} ({}): {}", step.number(), title, reason).into());
        }
    }

    let ticket_type = store
        .text(names::TICKET_TYPE)
        .parse()
        .unwrap_or_else(|_| role.default_ticket_type());
    let draft = assemble(&store, ticket_type);
    match out {
        Some(path) => write_json(&path, &draft)?,
        None => println!("{}", serde_json::to_string_pretty(&draft)?),
    }
    Ok(())
}

fn run_schema() -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(&draft_schema())?);
    Ok(())
}

/// Overlay a JSON object of field values onto a store of defaults. JSON
/// numbers land as their literal text so the engine's text-based presence
/// rules see them the same way typed input would.
fn load_store(path: &Path, default_type: TicketType) -> CliResult<FieldStore> {
    let contents = fs::read_to_string(path)?;
    let values: BTreeMap<String, Value> = serde_json::from_str(&contents)?;
    let mut store = FieldStore::with_defaults(default_type);
    for (name, value) in values {
        if !is_known_field(&name) {
            return Err(format!("unknown field '{}'", name).into());
        }
        let value = field_value(&name, value)?;
        store.set(&name, value);
    }
    Ok(store)
}

fn field_value(name: &str, value: Value) -> CliResult<FieldValue> {
    match value {
        Value::String(text) => Ok(FieldValue::Text(text)),
        Value::Bool(flag) => Ok(FieldValue::Bool(flag)),
        Value::Number(number) => Ok(FieldValue::text(number.to_string())),
        Value::Null => Ok(FieldValue::text("")),
        other => Err(format!("field '{}' has unsupported value {}", name, other).into()),
    }
}

fn write_json(path: &Path, value: &impl Serialize) -> io::Result<()> {
    let contents = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    fs::write(path, contents)
}
