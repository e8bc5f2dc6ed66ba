use crate::fields::{FieldStore, names};
use crate::steps::{self, Step};

/// Outcome of validating a single step.
///
/// Rules run in a fixed order and the first failing rule's message is the
/// result; at most one reason is ever surfaced at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepValidation {
    Valid,
    Invalid(String),
}

impl StepValidation {
    pub fn invalid(reason: impl Into<String>) -> Self {
        StepValidation::Invalid(reason.into())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, StepValidation::Valid)
    }

    /// Failure reason, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            StepValidation::Valid => None,
            StepValidation::Invalid(reason) => Some(reason),
        }
    }
}

/// Validate one step against the current field values.
pub fn validate_step(store: &FieldStore, step: Step) -> StepValidation {
    (steps::definition(step).validate)(store)
}

pub(crate) fn validate_basic_info(store: &FieldStore) -> StepValidation {
    let title_length = store.text(names::TITLE).chars().count();
    if !(10..=200).contains(&title_length) {
        return StepValidation::invalid(format!(
            "title must be between 10 and 200 characters (got {})",
            title_length
        ));
    }

    let description_length = store.text(names::DESCRIPTION).chars().count();
    if description_length < 50 {
        return StepValidation::invalid(format!(
            "description must be at least 50 characters (got {})",
            description_length
        ));
    }

    StepValidation::Valid
}

pub(crate) fn validate_financial_terms(store: &FieldStore) -> StepValidation {
    let amount = match store.number(names::AMOUNT) {
        Some(value) if value > 0.0 => value,
        _ => return StepValidation::invalid("amount must be a number greater than zero"),
    };

    match store.number(names::INTEREST_RATE) {
        Some(rate) if (0.0..=100.0).contains(&rate) => {}
        _ => return StepValidation::invalid("interest rate must be between 0 and 100"),
    }

    match store.integer(names::TERM_MONTHS) {
        Some(term) if (1..=360).contains(&term) => {}
        _ => {
            return StepValidation::invalid(
                "term must be a whole number of months between 1 and 360",
            );
        }
    }

    // Range bounds are only checked while flexible terms are on; an
    // unparseable bound never fails here, the comparison just does not fire.
    if store.flag(names::FLEXIBLE_TERMS) {
        if !store.text(names::MIN_AMOUNT).trim().is_empty()
            && let Some(minimum) = store.number(names::MIN_AMOUNT)
            && minimum > amount
        {
            return StepValidation::invalid("minimum amount cannot exceed the amount");
        }
        if !store.text(names::MAX_AMOUNT).trim().is_empty()
            && let Some(maximum) = store.number(names::MAX_AMOUNT)
            && maximum < amount
        {
            return StepValidation::invalid("maximum amount cannot be below the amount");
        }
    }

    StepValidation::Valid
}

pub(crate) fn validate_loan_details(store: &FieldStore) -> StepValidation {
    let purpose_length = store.text(names::LOAN_PURPOSE).chars().count();
    if purpose_length < 20 {
        return StepValidation::invalid(format!(
            "loan purpose must be at least 20 characters (got {})",
            purpose_length
        ));
    }

    if store.text(names::WARRANTY_TYPE) != "none"
        && store.text(names::WARRANTY_VALUE).trim().is_empty()
    {
        return StepValidation::invalid("warranty value is required when a warranty is selected");
    }

    StepValidation::Valid
}

// The review step confirms and submits; nothing blocks here.
pub(crate) fn validate_additional_details(_store: &FieldStore) -> StepValidation {
    StepValidation::Valid
}
