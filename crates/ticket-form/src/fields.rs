use std::collections::BTreeMap;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Canonical field names used across the four wizard steps.
pub mod names {
    pub const TICKET_TYPE: &str = "ticket_type";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const AMOUNT: &str = "amount";
    pub const INTEREST_RATE: &str = "interest_rate";
    pub const TERM_MONTHS: &str = "term_months";
    pub const FLEXIBLE_TERMS: &str = "flexible_terms";
    pub const MIN_AMOUNT: &str = "min_amount";
    pub const MAX_AMOUNT: &str = "max_amount";
    pub const MIN_INTEREST_RATE: &str = "min_interest_rate";
    pub const MAX_INTEREST_RATE: &str = "max_interest_rate";
    pub const MIN_TERM_MONTHS: &str = "min_term_months";
    pub const MAX_TERM_MONTHS: &str = "max_term_months";
    pub const LOAN_TYPE: &str = "loan_type";
    pub const LOAN_PURPOSE: &str = "loan_purpose";
    pub const WARRANTY_TYPE: &str = "warranty_type";
    pub const WARRANTY_DESCRIPTION: &str = "warranty_description";
    pub const WARRANTY_VALUE: &str = "warranty_value";
    pub const REQUIREMENTS: &str = "requirements";
    pub const PREFERRED_LOCATION: &str = "preferred_location";
    pub const IS_PUBLIC: &str = "is_public";

    /// Every field name, in step order.
    pub const ALL: &[&str] = &[
        TICKET_TYPE,
        TITLE,
        DESCRIPTION,
        AMOUNT,
        INTEREST_RATE,
        TERM_MONTHS,
        FLEXIBLE_TERMS,
        MIN_AMOUNT,
        MAX_AMOUNT,
        MIN_INTEREST_RATE,
        MAX_INTEREST_RATE,
        MIN_TERM_MONTHS,
        MAX_TERM_MONTHS,
        LOAN_TYPE,
        LOAN_PURPOSE,
        WARRANTY_TYPE,
        WARRANTY_DESCRIPTION,
        WARRANTY_VALUE,
        REQUIREMENTS,
        PREFERRED_LOCATION,
        IS_PUBLIC,
    ];
}

/// Marketplace ticket direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TicketType {
    LendingOffer,
    BorrowingRequest,
}

impl TicketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::LendingOffer => "lending_offer",
            TicketType::BorrowingRequest => "borrowing_request",
        }
    }
}

impl FromStr for TicketType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "lending_offer" => Ok(TicketType::LendingOffer),
            "borrowing_request" => Ok(TicketType::BorrowingRequest),
            other => Err(format!("unknown ticket type '{}'", other)),
        }
    }
}

/// Caller role the wizard is opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Lender,
    Borrower,
    Both,
}

impl UserRole {
    /// Ticket direction preselected when the wizard opens.
    pub fn default_ticket_type(&self) -> TicketType {
        match self {
            UserRole::Lender => TicketType::LendingOffer,
            UserRole::Borrower | UserRole::Both => TicketType::BorrowingRequest,
        }
    }

    /// Whether the role gets the direction selector at step 1.
    pub fn can_choose_ticket_type(&self) -> bool {
        matches!(self, UserRole::Both)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Lender => "lender",
            UserRole::Borrower => "borrower",
            UserRole::Both => "both",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "lender" => Ok(UserRole::Lender),
            "borrower" => Ok(UserRole::Borrower),
            "both" => Ok(UserRole::Both),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Raw field content as captured from an input control.
///
/// Numeric fields are stored as their literal text so partially typed
/// values ("12.", "") stay representable; interpretation happens at
/// validation and assembly time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(Option<f64>),
    Bool(bool),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Finite numeric reading of the value, if it has one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Text(text) => parse_number(text),
            FieldValue::Number(value) => value.filter(|number| number.is_finite()),
            FieldValue::Bool(_) => None,
        }
    }

    /// Integer reading of the value; fractional input has none.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Text(text) => parse_integer(text),
            FieldValue::Number(value) => value
                .filter(|number| number.is_finite() && number.fract() == 0.0)
                .map(|number| number as i64),
            FieldValue::Bool(_) => None,
        }
    }
}

pub(crate) fn parse_number(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

pub(crate) fn parse_integer(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

/// Flat name-to-value map holding the wizard's current inputs.
///
/// The store performs no validation; it is the single mutable source of
/// truth the validators and the assembler read from.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldStore {
    values: BTreeMap<String, FieldValue>,
    default_type: TicketType,
}

impl FieldStore {
    /// Create a store with every known field at its default value.
    pub fn with_defaults(default_type: TicketType) -> Self {
        let mut store = FieldStore {
            values: BTreeMap::new(),
            default_type,
        };
        store.reset();
        store
    }

    /// Restore every known field to its default value.
    pub fn reset(&mut self) {
        self.values.clear();
        for (name, value) in default_values(self.default_type) {
            self.values.insert(name.to_string(), value);
        }
    }

    pub fn set(&mut self, name: &str, value: FieldValue) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Raw text of a field; empty for unset or non-text fields.
    pub fn text(&self, name: &str) -> &str {
        match self.values.get(name) {
            Some(FieldValue::Text(text)) => text,
            _ => "",
        }
    }

    /// Finite numeric reading of a field, if it parses.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(FieldValue::as_number)
    }

    /// Integer reading of a field; fractional or unparseable input has none.
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(FieldValue::as_integer)
    }

    /// Boolean reading of a field; anything but an explicit true is false.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(FieldValue::Bool(true)))
    }
}

fn default_values(default_type: TicketType) -> Vec<(&'static str, FieldValue)> {
    let mut defaults = vec![(
        names::TICKET_TYPE,
        FieldValue::text(default_type.as_str()),
    )];
    for name in names::ALL {
        let value = match *name {
            names::TICKET_TYPE => continue,
            names::FLEXIBLE_TERMS => FieldValue::Bool(false),
            names::IS_PUBLIC => FieldValue::Bool(true),
            names::LOAN_TYPE => FieldValue::text("personal"),
            names::WARRANTY_TYPE => FieldValue::text("none"),
            _ => FieldValue::text(""),
        };
        defaults.push((name, value));
    }
    defaults
}
