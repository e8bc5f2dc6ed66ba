use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Canonical failure categories surfaced to the display layer.
///
/// The same categories cover ticket creation, deal creation, and account
/// registration failures; the classifier is shared, not per screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    EmailAlreadyExists,
    UsernameTaken,
    PasswordWeak,
    PasswordMismatch,
    ServerError,
    RequestFailed,
}

impl ErrorKind {
    /// Stable key the localization table is indexed by.
    pub fn localization_key(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "error.validation",
            ErrorKind::EmailAlreadyExists => "error.email_exists",
            ErrorKind::UsernameTaken => "error.username_taken",
            ErrorKind::PasswordWeak => "error.password_weak",
            ErrorKind::PasswordMismatch => "error.password_mismatch",
            ErrorKind::ServerError => "error.server_error",
            ErrorKind::RequestFailed => "error.request_failed",
        }
    }

    /// English message used when a canonical kind replaces the raw text.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "please review the highlighted field",
            ErrorKind::EmailAlreadyExists => "an account with this email already exists",
            ErrorKind::UsernameTaken => "this username is already taken",
            ErrorKind::PasswordWeak => "password must contain at least one uppercase letter",
            ErrorKind::PasswordMismatch => "passwords do not match",
            ErrorKind::ServerError => {
                "the server could not process the request, please try again later"
            }
            ErrorKind::RequestFailed => "request failed, please try again",
        }
    }
}

/// Which classifier pass produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Local,
    Exact,
    Keyword,
    Status,
    Fallback,
}

/// A failure normalized for display and logging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub message: String,
    pub source: MatchSource,
}

/// Known raw server strings, matched verbatim before any heuristic runs.
const EXACT_MATCHES: &[(&str, ErrorKind)] = &[
    (
        "An account with this email already exists",
        ErrorKind::EmailAlreadyExists,
    ),
    (
        "A user with this username already exists",
        ErrorKind::UsernameTaken,
    ),
    (
        "Password must contain at least one uppercase letter",
        ErrorKind::PasswordWeak,
    ),
    ("Passwords do not match", ErrorKind::PasswordMismatch),
    ("Network Error", ErrorKind::RequestFailed),
];

/// Keyword pairs tested case-insensitively, in order; first match wins.
const KEYWORD_MATCHES: &[(&str, &str, ErrorKind)] = &[
    ("email", "exists", ErrorKind::EmailAlreadyExists),
    ("username", "taken", ErrorKind::UsernameTaken),
    ("password", "uppercase", ErrorKind::PasswordWeak),
    ("passwords", "match", ErrorKind::PasswordMismatch),
];

static STATUS_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)status code\s*(\d{3})").expect("status code pattern"));

/// Wrap a local validation failure without rewriting it.
pub fn classify_local(reason: impl Into<String>) -> ClassifiedError {
    ClassifiedError {
        kind: ErrorKind::Validation,
        message: reason.into(),
        source: MatchSource::Local,
    }
}

/// Normalize a raw remote failure message into a canonical kind.
pub fn classify_remote(raw: &str) -> ClassifiedError {
    let result = classify_raw(raw);
    tracing::debug!(kind = ?result.kind, source = ?result.source, "classified remote failure");
    result
}

fn classify_raw(raw: &str) -> ClassifiedError {
    for (known, kind) in EXACT_MATCHES {
        if raw == *known {
            return canonical(*kind, MatchSource::Exact);
        }
    }

    let lowered = raw.to_lowercase();
    for (first, second, kind) in KEYWORD_MATCHES {
        if lowered.contains(first) && lowered.contains(second) {
            return canonical(*kind, MatchSource::Keyword);
        }
    }

    if let Some(captures) = STATUS_CODE.captures(raw)
        && let Some(code) = captures.get(1)
        && let Ok(code) = code.as_str().parse::<u16>()
    {
        let kind = if (500..600).contains(&code) {
            ErrorKind::ServerError
        } else {
            ErrorKind::RequestFailed
        };
        return canonical(kind, MatchSource::Status);
    }

    if raw.is_empty() {
        return canonical(ErrorKind::RequestFailed, MatchSource::Fallback);
    }

    ClassifiedError {
        kind: ErrorKind::RequestFailed,
        message: raw.to_string(),
        source: MatchSource::Fallback,
    }
}

fn canonical(kind: ErrorKind, source: MatchSource) -> ClassifiedError {
    ClassifiedError {
        kind,
        message: kind.default_message().to_string(),
        source,
    }
}
