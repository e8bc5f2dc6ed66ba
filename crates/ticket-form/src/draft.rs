use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fields::{FieldStore, TicketType, names};

/// Submission payload for the create-ticket operation.
///
/// Built exactly once, at submit time, and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketDraft {
    pub ticket_type: TicketType,
    pub title: String,
    pub description: String,
    pub amount: f64,
    pub interest_rate: f64,
    pub term_months: u32,
    pub loan_type: String,
    pub loan_purpose: String,
    pub warranty_type: String,
    pub flexible_terms: bool,
    pub is_public: bool,
    pub optional: OptionalTerms,
}

/// Terms included only when the matching input is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptionalTerms {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_term_months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_term_months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_location: Option<String>,
}

/// Build the submission payload from the current field values.
///
/// Assembly trusts that step validation already passed: a required numeric
/// that no longer parses falls back to zero instead of failing. Optional
/// fields are presence-tested on the raw text, independent of whether the
/// flexible-terms toggle is on.
pub fn assemble(store: &FieldStore, ticket_type: TicketType) -> TicketDraft {
    TicketDraft {
        ticket_type,
        title: store.text(names::TITLE).trim().to_string(),
        description: store.text(names::DESCRIPTION).trim().to_string(),
        amount: store.number(names::AMOUNT).unwrap_or_default(),
        interest_rate: store.number(names::INTEREST_RATE).unwrap_or_default(),
        term_months: whole_months(store, names::TERM_MONTHS).unwrap_or_default(),
        loan_type: store.text(names::LOAN_TYPE).trim().to_string(),
        loan_purpose: store.text(names::LOAN_PURPOSE).trim().to_string(),
        warranty_type: store.text(names::WARRANTY_TYPE).trim().to_string(),
        flexible_terms: store.flag(names::FLEXIBLE_TERMS),
        is_public: store.flag(names::IS_PUBLIC),
        optional: OptionalTerms {
            min_amount: optional_number(store, names::MIN_AMOUNT),
            max_amount: optional_number(store, names::MAX_AMOUNT),
            min_interest_rate: optional_number(store, names::MIN_INTEREST_RATE),
            max_interest_rate: optional_number(store, names::MAX_INTEREST_RATE),
            min_term_months: optional_months(store, names::MIN_TERM_MONTHS),
            max_term_months: optional_months(store, names::MAX_TERM_MONTHS),
            warranty_description: optional_text(store, names::WARRANTY_DESCRIPTION),
            warranty_value: optional_number(store, names::WARRANTY_VALUE),
            requirements: optional_text(store, names::REQUIREMENTS),
            preferred_location: optional_text(store, names::PREFERRED_LOCATION),
        },
    }
}

/// JSON schema describing the submission payload.
pub fn draft_schema() -> Value {
    serde_json::to_value(schema_for!(TicketDraft)).unwrap_or(Value::Null)
}

fn optional_text(store: &FieldStore, name: &str) -> Option<String> {
    let text = store.text(name).trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn optional_number(store: &FieldStore, name: &str) -> Option<f64> {
    if store.text(name).trim().is_empty() {
        None
    } else {
        store.number(name)
    }
}

fn optional_months(store: &FieldStore, name: &str) -> Option<u32> {
    if store.text(name).trim().is_empty() {
        None
    } else {
        whole_months(store, name)
    }
}

fn whole_months(store: &FieldStore, name: &str) -> Option<u32> {
    store
        .integer(name)
        .and_then(|months| u32::try_from(months).ok())
}
