use ticket_form::{
    FieldStore, FieldValue, Step, StepValidation, TicketType, definitions, names, validate_step,
};

fn valid_store() -> FieldStore {
    let mut store = FieldStore::with_defaults(TicketType::LendingOffer);
    store.set(names::TITLE, FieldValue::text("Working capital loan offer"));
    store.set(
        names::DESCRIPTION,
        FieldValue::text(
            "Short-term financing for established small businesses with stable monthly revenue.",
        ),
    );
    store.set(names::AMOUNT, FieldValue::text("50000"));
    store.set(names::INTEREST_RATE, FieldValue::text("8.5"));
    store.set(names::TERM_MONTHS, FieldValue::text("24"));
    store.set(
        names::LOAN_PURPOSE,
        FieldValue::text("Inventory purchases ahead of the holiday season."),
    );
    store
}

fn message(result: StepValidation) -> String {
    result.message().expect("expected a failing step").to_string()
}

#[test]
fn step_one_rejects_short_title() {
    let mut store = valid_store();
    store.set(names::TITLE, FieldValue::text("short"));
    let result = validate_step(&store, Step::BasicInfo);
    assert_eq!(
        message(result),
        "title must be between 10 and 200 characters (got 5)"
    );
}

#[test]
fn step_one_title_boundaries_are_inclusive() {
    let mut store = valid_store();

    store.set(names::TITLE, FieldValue::text("a".repeat(9)));
    assert!(!validate_step(&store, Step::BasicInfo).is_valid());

    store.set(names::TITLE, FieldValue::text("a".repeat(10)));
    assert!(validate_step(&store, Step::BasicInfo).is_valid());

    store.set(names::TITLE, FieldValue::text("a".repeat(200)));
    assert!(validate_step(&store, Step::BasicInfo).is_valid());

    store.set(names::TITLE, FieldValue::text("a".repeat(201)));
    assert!(!validate_step(&store, Step::BasicInfo).is_valid());
}

#[test]
fn step_one_rejects_short_description() {
    let mut store = valid_store();
    store.set(names::DESCRIPTION, FieldValue::text("b".repeat(49)));
    let result = validate_step(&store, Step::BasicInfo);
    assert_eq!(
        message(result),
        "description must be at least 50 characters (got 49)"
    );

    store.set(names::DESCRIPTION, FieldValue::text("b".repeat(50)));
    assert!(validate_step(&store, Step::BasicInfo).is_valid());
}

#[test]
fn step_two_accepts_plain_terms_regardless_of_range_fields() {
    let mut store = valid_store();
    store.set(names::MIN_AMOUNT, FieldValue::text("60000"));
    store.set(names::MAX_AMOUNT, FieldValue::text("10"));
    assert!(validate_step(&store, Step::FinancialTerms).is_valid());
}

#[test]
fn step_two_rejects_bad_amounts() {
    let mut store = valid_store();
    for bad in ["", "0", "-5", "abc", "NaN", "inf"] {
        store.set(names::AMOUNT, FieldValue::text(bad));
        let result = validate_step(&store, Step::FinancialTerms);
        assert_eq!(
            result.message(),
            Some("amount must be a number greater than zero"),
            "amount {:?} should fail",
            bad
        );
    }
}

#[test]
fn step_two_interest_rate_bounds_are_inclusive() {
    let mut store = valid_store();

    for good in ["0", "100", "8.5"] {
        store.set(names::INTEREST_RATE, FieldValue::text(good));
        assert!(validate_step(&store, Step::FinancialTerms).is_valid());
    }

    for bad in ["-1", "100.5", "rate"] {
        store.set(names::INTEREST_RATE, FieldValue::text(bad));
        let result = validate_step(&store, Step::FinancialTerms);
        assert_eq!(
            result.message(),
            Some("interest rate must be between 0 and 100"),
            "rate {:?} should fail",
            bad
        );
    }
}

#[test]
fn step_two_term_must_be_a_whole_month_count() {
    let mut store = valid_store();

    for good in ["1", "360", "24"] {
        store.set(names::TERM_MONTHS, FieldValue::text(good));
        assert!(validate_step(&store, Step::FinancialTerms).is_valid());
    }

    for bad in ["0", "361", "12.5", "two years"] {
        store.set(names::TERM_MONTHS, FieldValue::text(bad));
        let result = validate_step(&store, Step::FinancialTerms);
        assert_eq!(
            result.message(),
            Some("term must be a whole number of months between 1 and 360"),
            "term {:?} should fail",
            bad
        );
    }
}

#[test]
fn step_two_flexible_minimum_cannot_exceed_amount() {
    let mut store = valid_store();
    store.set(names::FLEXIBLE_TERMS, FieldValue::Bool(true));
    store.set(names::MIN_AMOUNT, FieldValue::text("60000"));
    let result = validate_step(&store, Step::FinancialTerms);
    assert_eq!(result.message(), Some("minimum amount cannot exceed the amount"));

    store.set(names::MIN_AMOUNT, FieldValue::text("40000"));
    assert!(validate_step(&store, Step::FinancialTerms).is_valid());
}

#[test]
fn step_two_flexible_maximum_cannot_be_below_amount() {
    let mut store = valid_store();
    store.set(names::FLEXIBLE_TERMS, FieldValue::Bool(true));
    store.set(names::MAX_AMOUNT, FieldValue::text("40000"));
    let result = validate_step(&store, Step::FinancialTerms);
    assert_eq!(result.message(), Some("maximum amount cannot be below the amount"));

    store.set(names::MAX_AMOUNT, FieldValue::text("60000"));
    assert!(validate_step(&store, Step::FinancialTerms).is_valid());
}

#[test]
fn step_two_skips_unparseable_range_bounds() {
    let mut store = valid_store();
    store.set(names::FLEXIBLE_TERMS, FieldValue::Bool(true));
    store.set(names::MIN_AMOUNT, FieldValue::text("a lot"));
    store.set(names::MAX_AMOUNT, FieldValue::text("even more"));
    assert!(validate_step(&store, Step::FinancialTerms).is_valid());
}

#[test]
fn step_three_rejects_short_purpose() {
    let mut store = valid_store();
    store.set(names::LOAN_PURPOSE, FieldValue::text("Too short"));
    let result = validate_step(&store, Step::LoanDetails);
    assert_eq!(
        message(result),
        "loan purpose must be at least 20 characters (got 9)"
    );
}

#[test]
fn step_three_requires_a_value_for_selected_warranty() {
    let mut store = valid_store();
    store.set(names::WARRANTY_TYPE, FieldValue::text("property"));
    let result = validate_step(&store, Step::LoanDetails);
    assert_eq!(
        result.message(),
        Some("warranty value is required when a warranty is selected")
    );

    store.set(names::WARRANTY_VALUE, FieldValue::text("100000"));
    assert!(validate_step(&store, Step::LoanDetails).is_valid());
}

#[test]
fn step_three_accepts_no_warranty_without_value() {
    let store = valid_store();
    assert!(validate_step(&store, Step::LoanDetails).is_valid());
}

#[test]
fn step_four_never_blocks() {
    let store = FieldStore::with_defaults(TicketType::BorrowingRequest);
    assert!(validate_step(&store, Step::AdditionalDetails).is_valid());
}

#[test]
fn defaults_cover_every_step_field() {
    let store = FieldStore::with_defaults(TicketType::LendingOffer);
    for definition in definitions() {
        for field in definition.fields {
            assert!(
                store.get(field).is_some(),
                "field {:?} has no default",
                field
            );
        }
    }
    let step_field_count: usize = definitions()
        .iter()
        .map(|definition| definition.fields.len())
        .sum();
    assert_eq!(step_field_count, names::ALL.len());
}

#[test]
fn defaults_match_the_documented_table() {
    let store = FieldStore::with_defaults(TicketType::LendingOffer);
    assert_eq!(store.text(names::TICKET_TYPE), "lending_offer");
    assert_eq!(store.text(names::TITLE), "");
    assert_eq!(store.text(names::LOAN_TYPE), "personal");
    assert_eq!(store.text(names::WARRANTY_TYPE), "none");
    assert!(!store.flag(names::FLEXIBLE_TERMS));
    assert!(store.flag(names::IS_PUBLIC));
}
