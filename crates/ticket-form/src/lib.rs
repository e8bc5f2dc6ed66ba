#![allow(missing_docs)]

pub mod classify;
pub mod draft;
pub mod fields;
pub mod service;
pub mod steps;
pub mod validate;
pub mod wizard;

pub use classify::{ClassifiedError, ErrorKind, MatchSource, classify_local, classify_remote};
pub use draft::{OptionalTerms, TicketDraft, assemble, draft_schema};
pub use fields::{FieldStore, FieldValue, TicketType, UserRole, names};
pub use service::{ServiceError, TicketId, TicketService};
pub use steps::{Step, StepDefinition, definition, definitions, is_known_field};
pub use validate::{StepValidation, validate_step};
pub use wizard::{CloseReason, Wizard, WizardSnapshot, WizardStatus};
