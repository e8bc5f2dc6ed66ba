use ticket_form::{
    ClassifiedError, FieldStore, FieldValue, StepDefinition, TicketId, TicketType, UserRole,
    WizardSnapshot, definitions,
};

/// Controls how much wizard state gets printed between prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Prompts, errors, and the final summary only.
    Clean,
    /// Also prints status labels, field lists, and error kinds.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Renders wizard progress to the terminal.
pub struct WizardPresenter {
    verbosity: Verbosity,
    json_snapshots: bool,
    header_printed: bool,
}

impl WizardPresenter {
    pub fn new(verbosity: Verbosity, json_snapshots: bool) -> Self {
        WizardPresenter {
            verbosity,
            json_snapshots,
            header_printed: false,
        }
    }

    /// One-time banner naming the role and the ticket direction it opens with.
    pub fn show_header(&mut self, role: UserRole, ticket_type: TicketType) {
        if self.header_printed {
            return;
        }
        self.header_printed = true;
        println!("Peerlend ticket wizard");
        println!(
            "Opening a {} draft as {}. Answer '/back' or '/cancel' at any prompt.",
            ticket_type.as_str(),
            role.as_str()
        );
    }

    pub fn show_step(&self, definition: &StepDefinition, snapshot: &WizardSnapshot) {
        if self.json_snapshots {
            println!("{}", snapshot.to_json());
            return;
        }
        println!();
        println!("Step {}/4: {}", definition.step.number(), definition.title);
        if self.verbosity.is_verbose() {
            println!("  status: {}", snapshot.status.as_str());
            println!("  fields: {}", definition.fields.join(", "));
        }
    }

    pub fn show_error(&self, error: &ClassifiedError) {
        println!("Error: {}", error.message);
        if self.verbosity.is_verbose() {
            println!("  kind: {}", error.kind.localization_key());
        }
    }

    /// Review listing printed before the submit prompt. Text fields that are
    /// still blank stay out of the listing; flags always show.
    pub fn show_summary(&self, store: &FieldStore) {
        println!();
        println!("Review:");
        for definition in definitions() {
            for field in definition.fields {
                let shown = display_value(store, field);
                if !shown.is_empty() {
                    println!("  {}: {}", field, shown);
                }
            }
        }
    }

    pub fn show_success(&self, ticket_id: &TicketId) {
        println!("Ticket created: {}", ticket_id.0);
    }

    pub fn show_cancelled(&self) {
        println!("Cancelled; nothing was created.");
    }
}

fn display_value(store: &FieldStore, field: &str) -> String {
    match store.get(field) {
        Some(FieldValue::Text(text)) => text.trim().to_string(),
        Some(FieldValue::Bool(flag)) => flag.to_string(),
        Some(FieldValue::Number(Some(number))) => number.to_string(),
        _ => String::new(),
    }
}
