//! Action dispatcher tests: duplicate-submission guard and draft
//! preservation.

use routesaathi::application::dispatch::{validate_draft, ActionDispatcher, ActionState};
use routesaathi::domain::error::FleetError;

#[test]
fn duplicate_submission_is_rejected() {
    let dispatcher: ActionDispatcher<u32> = ActionDispatcher::new();

    dispatcher.begin(5, "first draft").unwrap();
    assert!(dispatcher.is_submitting(&5));

    let err = dispatcher.begin(5, "second draft").unwrap_err();
    assert!(matches!(err, FleetError::Conflict(_)));

    // The first submission is unaffected: still submitting, draft intact.
    assert!(dispatcher.is_submitting(&5));
    assert_eq!(dispatcher.draft(&5).as_deref(), Some("first draft"));
}

#[test]
fn independent_targets_do_not_conflict() {
    let dispatcher: ActionDispatcher<u32> = ActionDispatcher::new();

    dispatcher.begin(1, "to ramesh").unwrap();
    dispatcher.begin(2, "to suresh").unwrap();

    assert!(dispatcher.is_submitting(&1));
    assert!(dispatcher.is_submitting(&2));
}

#[test]
fn success_returns_to_idle_and_clears_draft() {
    let dispatcher: ActionDispatcher<u32> = ActionDispatcher::new();

    dispatcher.begin(1, "route update").unwrap();
    dispatcher.succeed(&1);

    assert_eq!(dispatcher.state(&1), ActionState::Idle);
    assert_eq!(dispatcher.draft(&1), None);

    // The target can submit again.
    assert!(dispatcher.begin(1, "again").is_ok());
}

#[test]
fn failure_returns_to_idle_but_preserves_draft() {
    let dispatcher: ActionDispatcher<u32> = ActionDispatcher::new();

    dispatcher.begin(1, "please reroute via BTM Layout").unwrap();
    let preserved = dispatcher.fail(&1);

    // No retyping: the draft comes back and stays readable.
    assert_eq!(preserved.as_deref(), Some("please reroute via BTM Layout"));
    assert_eq!(dispatcher.state(&1), ActionState::Idle);
    assert_eq!(
        dispatcher.draft(&1).as_deref(),
        Some("please reroute via BTM Layout")
    );

    // And the user may retry immediately.
    assert!(dispatcher.begin(1, "please reroute via BTM Layout").is_ok());
}

#[test]
fn empty_input_is_rejected_before_any_network() {
    let err = validate_draft("   ", "message").unwrap_err();
    assert!(matches!(err, FleetError::Validation(_)));

    let ok = validate_draft("  breakdown near Hebbal  ", "message").unwrap();
    assert_eq!(ok, "breakdown near Hebbal");
}
