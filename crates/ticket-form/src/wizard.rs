use serde_json::{Value, json};

use crate::classify::{self, ClassifiedError};
use crate::draft::{self, TicketDraft};
use crate::fields::{FieldStore, FieldValue, TicketType, UserRole, names};
use crate::service::{ServiceError, TicketId, TicketService};
use crate::steps::{self, Step, StepDefinition};
use crate::validate::{self, StepValidation};

/// Wizard lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStatus {
    InProgress,
    Submitting,
    Closed(CloseReason),
}

/// Why a wizard reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Success,
    Cancelled,
}

impl WizardStatus {
    /// Label used in snapshots and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStatus::InProgress => "in_progress",
            WizardStatus::Submitting => "submitting",
            WizardStatus::Closed(CloseReason::Success) => "closed_success",
            WizardStatus::Closed(CloseReason::Cancelled) => "closed_cancelled",
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, WizardStatus::Submitting)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, WizardStatus::Closed(_))
    }
}

/// Read-only view exposed to the presentation layer after every operation.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardSnapshot {
    pub step: Step,
    pub status: WizardStatus,
    pub submitting: bool,
    pub error: Option<ClassifiedError>,
    pub ticket_type: TicketType,
}

impl WizardSnapshot {
    /// JSON rendering for hosts that embed the wizard behind a JSON boundary.
    pub fn to_json(&self) -> Value {
        json!({
            "step": self.step.number(),
            "status": self.status.as_str(),
            "submitting": self.submitting,
            "error": match &self.error {
                Some(error) => json!({
                    "kind": error.kind,
                    "key": error.kind.localization_key(),
                    "message": error.message,
                    "source": error.source,
                }),
                None => Value::Null,
            },
            "ticket_type": self.ticket_type.as_str(),
        })
    }
}

/// Multi-step ticket creation controller.
///
/// One instance per open wizard. All operations run synchronously on the
/// caller's loop; the create call inside [`Wizard::submit`] is the only
/// suspension point, and the submitting status is the sole guard against
/// a second in-flight create.
#[derive(Debug)]
pub struct Wizard {
    role: UserRole,
    store: FieldStore,
    step: Step,
    status: WizardStatus,
    error: Option<ClassifiedError>,
}

impl Wizard {
    /// Open a fresh wizard for the given role.
    pub fn open(role: UserRole) -> Self {
        Wizard {
            role,
            store: FieldStore::with_defaults(role.default_ticket_type()),
            step: Step::BasicInfo,
            status: WizardStatus::InProgress,
            error: None,
        }
    }

    /// Reset to step 1 with default field values, as on a fresh open.
    pub fn reopen(&mut self) {
        self.store.reset();
        self.step = Step::BasicInfo;
        self.status = WizardStatus::InProgress;
        self.error = None;
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn status(&self) -> WizardStatus {
        self.status
    }

    pub fn error(&self) -> Option<&ClassifiedError> {
        self.error.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.status.is_submitting()
    }

    /// Current field values, for presentation.
    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    /// Ticket direction, read from the step-1 selector field.
    pub fn ticket_type(&self) -> TicketType {
        self.store
            .text(names::TICKET_TYPE)
            .parse()
            .unwrap_or_else(|_| self.role.default_ticket_type())
    }

    /// Write one field. Ignored while submitting or closed.
    ///
    /// A stale error stays visible until the next transition attempt;
    /// edits alone never clear it.
    pub fn set_field(&mut self, name: &str, value: FieldValue) {
        if self.status != WizardStatus::InProgress {
            return;
        }
        if !steps::is_known_field(name) {
            tracing::warn!(field = name, "setting a field no step lists");
        }
        self.store.set(name, value);
    }

    /// Validate the current step and advance past it.
    ///
    /// On a failing step the reason becomes the current error and the step
    /// does not change.
    pub fn next(&mut self) {
        if self.status != WizardStatus::InProgress {
            return;
        }
        match validate::validate_step(&self.store, self.step) {
            StepValidation::Valid => {
                self.error = None;
                if let Some(next) = self.step.next() {
                    tracing::debug!(step = next.number(), "advanced to step");
                    self.step = next;
                }
            }
            StepValidation::Invalid(reason) => {
                tracing::debug!(step = self.step.number(), "step validation failed");
                self.error = Some(classify::classify_local(reason));
            }
        }
    }

    /// Go back one step without validating. No-op at step 1.
    pub fn back(&mut self) {
        if self.status != WizardStatus::InProgress {
            return;
        }
        if let Some(previous) = self.step.previous() {
            self.error = None;
            self.step = previous;
        }
    }

    /// Start a submission: assemble the draft and enter the submitting state.
    ///
    /// Returns the draft to send, or `None` when the wizard is not at the
    /// final step or a submission is already in flight. The caller must
    /// resolve every started submission through [`Wizard::finish_submit`].
    pub fn begin_submit(&mut self) -> Option<TicketDraft> {
        if self.status != WizardStatus::InProgress || !self.step.is_last() {
            return None;
        }
        self.status = WizardStatus::Submitting;
        self.error = None;
        Some(draft::assemble(&self.store, self.ticket_type()))
    }

    /// Resolve the in-flight submission with the create call's outcome.
    ///
    /// Success closes the wizard and discards the field values; rejection
    /// classifies the failure, keeps every field intact, and returns the
    /// wizard to step 4 so the user can resubmit.
    pub fn finish_submit(&mut self, outcome: Result<TicketId, ServiceError>) {
        if self.status != WizardStatus::Submitting {
            return;
        }
        match outcome {
            Ok(ticket_id) => {
                tracing::debug!(ticket_id = %ticket_id.0, "ticket created");
                self.status = WizardStatus::Closed(CloseReason::Success);
                self.store.reset();
            }
            Err(error) => {
                self.error = Some(classify::classify_remote(error.detail()));
                self.status = WizardStatus::InProgress;
            }
        }
    }

    /// Assemble, send, and resolve a submission against the given service.
    pub async fn submit(&mut self, service: &dyn TicketService) -> Option<TicketId> {
        let draft = self.begin_submit()?;
        let outcome = service.create_ticket(&draft).await;
        let ticket_id = match &outcome {
            Ok(id) => Some(id.clone()),
            Err(_) => None,
        };
        self.finish_submit(outcome);
        ticket_id
    }

    /// Close the wizard and discard the field values. No-op while submitting
    /// or already closed.
    pub fn cancel(&mut self) {
        if self.status != WizardStatus::InProgress {
            return;
        }
        self.status = WizardStatus::Closed(CloseReason::Cancelled);
        self.store.reset();
    }

    /// Definition of the step the wizard is currently on.
    pub fn current_definition(&self) -> &'static StepDefinition {
        steps::definition(self.step)
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            step: self.step,
            status: self.status,
            submitting: self.status.is_submitting(),
            error: self.error.clone(),
            ticket_type: self.ticket_type(),
        }
    }
}
