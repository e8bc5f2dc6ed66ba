use ticket_form::{ErrorKind, MatchSource, classify_local, classify_remote};

#[test]
fn exact_match_beats_keyword_heuristic() {
    let classified = classify_remote("An account with this email already exists");
    assert_eq!(classified.kind, ErrorKind::EmailAlreadyExists);
    assert_eq!(classified.source, MatchSource::Exact);
}

#[test]
fn keyword_rules_match_case_insensitively() {
    let cases = [
        ("Email already EXISTS for this user", ErrorKind::EmailAlreadyExists),
        ("That USERNAME was taken yesterday", ErrorKind::UsernameTaken),
        ("password needs an UPPERCASE letter", ErrorKind::PasswordWeak),
        ("the two passwords don't match", ErrorKind::PasswordMismatch),
    ];
    for (raw, kind) in cases {
        let classified = classify_remote(raw);
        assert_eq!(classified.kind, kind, "message {:?}", raw);
        assert_eq!(classified.source, MatchSource::Keyword, "message {:?}", raw);
        assert_eq!(classified.message, kind.default_message());
    }
}

#[test]
fn keyword_rules_run_before_the_status_pass() {
    let classified = classify_remote("Request failed with status code 409: username taken");
    assert_eq!(classified.kind, ErrorKind::UsernameTaken);
    assert_eq!(classified.source, MatchSource::Keyword);
}

#[test]
fn network_error_maps_to_the_generic_message() {
    let classified = classify_remote("Network Error");
    assert_eq!(classified.kind, ErrorKind::RequestFailed);
    assert_eq!(classified.source, MatchSource::Exact);
    assert_eq!(classified.message, ErrorKind::RequestFailed.default_message());
}

#[test]
fn server_status_codes_map_to_server_error() {
    let classified = classify_remote("Request failed with status code 503");
    assert_eq!(classified.kind, ErrorKind::ServerError);
    assert_eq!(classified.source, MatchSource::Status);

    let classified = classify_remote("Request failed with status code 404");
    assert_eq!(classified.kind, ErrorKind::RequestFailed);
    assert_eq!(classified.source, MatchSource::Status);
}

#[test]
fn unknown_messages_pass_through_verbatim() {
    let classified = classify_remote("Quota exhausted for this region");
    assert_eq!(classified.kind, ErrorKind::RequestFailed);
    assert_eq!(classified.source, MatchSource::Fallback);
    assert_eq!(classified.message, "Quota exhausted for this region");
}

#[test]
fn padded_messages_never_match_the_exact_table() {
    let raw = " A user with this username already exists ";
    let classified = classify_remote(raw);
    assert_eq!(classified.kind, ErrorKind::RequestFailed);
    assert_eq!(classified.source, MatchSource::Fallback);
    assert_eq!(classified.message, raw);

    let blank = classify_remote("   ");
    assert_eq!(blank.source, MatchSource::Fallback);
    assert_eq!(blank.message, "   ");
}

#[test]
fn empty_messages_fall_back_to_the_generic_message() {
    let classified = classify_remote("");
    assert_eq!(classified.kind, ErrorKind::RequestFailed);
    assert_eq!(classified.source, MatchSource::Fallback);
    assert_eq!(classified.message, ErrorKind::RequestFailed.default_message());
}

#[test]
fn local_failures_pass_through_unchanged() {
    let classified = classify_local("title must be between 10 and 200 characters (got 5)");
    assert_eq!(classified.kind, ErrorKind::Validation);
    assert_eq!(classified.source, MatchSource::Local);
    assert_eq!(
        classified.message,
        "title must be between 10 and 200 characters (got 5)"
    );
}

#[test]
fn localization_keys_are_stable() {
    assert_eq!(ErrorKind::EmailAlreadyExists.localization_key(), "error.email_exists");
    assert_eq!(ErrorKind::RequestFailed.localization_key(), "error.request_failed");
    assert_eq!(ErrorKind::Validation.localization_key(), "error.validation");
}
