use serde::{Deserialize, Serialize};

use crate::fields::{FieldStore, names};
use crate::validate::{
    StepValidation, validate_additional_details, validate_basic_info, validate_financial_terms,
    validate_loan_details,
};

/// Ordered wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    BasicInfo,
    FinancialTerms,
    LoanDetails,
    AdditionalDetails,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::BasicInfo,
        Step::FinancialTerms,
        Step::LoanDetails,
        Step::AdditionalDetails,
    ];

    /// One-based position used in displays and snapshots.
    pub fn number(&self) -> u8 {
        match self {
            Step::BasicInfo => 1,
            Step::FinancialTerms => 2,
            Step::LoanDetails => 3,
            Step::AdditionalDetails => 4,
        }
    }

    pub fn from_number(number: u8) -> Option<Step> {
        Step::ALL.into_iter().find(|step| step.number() == number)
    }

    /// Step after this one, if any.
    pub fn next(&self) -> Option<Step> {
        Step::from_number(self.number() + 1)
    }

    /// Step before this one, if any.
    pub fn previous(&self) -> Option<Step> {
        match self {
            Step::BasicInfo => None,
            other => Step::from_number(other.number() - 1),
        }
    }

    pub fn is_last(&self) -> bool {
        matches!(self, Step::AdditionalDetails)
    }
}

/// Static description of one wizard step.
#[derive(Debug, Clone, Copy)]
pub struct StepDefinition {
    pub step: Step,
    pub title: &'static str,
    pub fields: &'static [&'static str],
    pub validate: fn(&FieldStore) -> StepValidation,
}

static DEFINITIONS: [StepDefinition; 4] = [
    StepDefinition {
        step: Step::BasicInfo,
        title: "Basic info",
        fields: &[names::TICKET_TYPE, names::TITLE, names::DESCRIPTION],
        validate: validate_basic_info,
    },
    StepDefinition {
        step: Step::FinancialTerms,
        title: "Financial terms",
        fields: &[
            names::AMOUNT,
            names::INTEREST_RATE,
            names::TERM_MONTHS,
            names::FLEXIBLE_TERMS,
            names::MIN_AMOUNT,
            names::MAX_AMOUNT,
            names::MIN_INTEREST_RATE,
            names::MAX_INTEREST_RATE,
            names::MIN_TERM_MONTHS,
            names::MAX_TERM_MONTHS,
        ],
        validate: validate_financial_terms,
    },
    StepDefinition {
        step: Step::LoanDetails,
        title: "Loan details",
        fields: &[
            names::LOAN_TYPE,
            names::LOAN_PURPOSE,
            names::WARRANTY_TYPE,
            names::WARRANTY_DESCRIPTION,
            names::WARRANTY_VALUE,
        ],
        validate: validate_loan_details,
    },
    StepDefinition {
        step: Step::AdditionalDetails,
        title: "Additional details",
        fields: &[
            names::REQUIREMENTS,
            names::PREFERRED_LOCATION,
            names::IS_PUBLIC,
        ],
        validate: validate_additional_details,
    },
];

/// The fixed four-step ticket form, in order.
pub fn definitions() -> &'static [StepDefinition; 4] {
    &DEFINITIONS
}

/// Definition backing the given step.
pub fn definition(step: Step) -> &'static StepDefinition {
    &DEFINITIONS[step.number() as usize - 1]
}

/// Whether any step lists the field.
pub fn is_known_field(name: &str) -> bool {
    DEFINITIONS
        .iter()
        .any(|definition| definition.fields.contains(&name))
}
