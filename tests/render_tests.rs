//! Renderer tests: loading, empty and error states must be distinct, and
//! rendering never mutates or fetches anything.

use routesaathi::application::controller::{ViewSnapshot, ViewStateController};
use routesaathi::domain::error::FleetError;
use routesaathi::domain::model::{Bus, BusStatus, Conductor, Message};
use routesaathi::presentation::render::{
    bus_view_to_csv, render_bus_board, render_conductor_roster, render_recent_messages,
    RenderOptions,
};
use routesaathi::presentation::theme::Theme;

fn plain() -> (Theme, RenderOptions) {
    // Keep assertions byte-stable regardless of the test terminal
    colored::control::set_override(false);
    (Theme::from_name("depot"), RenderOptions { enable_emoji: false })
}

fn bus(number: &str) -> Bus {
    Bus {
        number: number.to_string(),
        conductor_id: None,
        conductor: "Ramesh Kumar".to_string(),
        route: "335E".to_string(),
        location: "Silk Board Junction".to_string(),
        status: BusStatus::OnTime,
        status_text: "On-Time".to_string(),
        load: "85%".to_string(),
        load_class: "badge-warning".to_string(),
    }
}

#[test]
fn loading_state_renders_distinctly() {
    let (theme, opts) = plain();
    let ctrl: ViewStateController<Bus> = ViewStateController::new();

    let out = render_bus_board(&ctrl.snapshot(), &theme, &opts);
    assert!(out.contains("Loading"));
    assert!(!out.contains("No buses"));
}

#[test]
fn empty_state_shows_guidance_not_a_blank_list() {
    let (theme, opts) = plain();
    let mut ctrl: ViewStateController<Bus> = ViewStateController::new();
    let ticket = ctrl.begin_reload();
    ctrl.complete_reload(ticket, Ok(vec![]));

    let out = render_bus_board(&ctrl.snapshot(), &theme, &opts);
    assert!(out.contains("No buses are reporting right now"));
    assert!(!out.contains("Loading"));
}

#[test]
fn error_state_shows_failure_and_retry_affordance() {
    let (theme, opts) = plain();
    let mut ctrl: ViewStateController<Bus> = ViewStateController::new();
    let ticket = ctrl.begin_reload();
    ctrl.complete_reload(ticket, Err(FleetError::server(503, "maintenance window")));

    let out = render_bus_board(&ctrl.snapshot(), &theme, &opts);
    assert!(out.contains("maintenance window"));
    assert!(out.contains("retry"));
    // An unavailable page must not look like an empty or stale list.
    assert!(!out.contains("No buses"));
    assert!(!out.contains("KA-01"));
}

#[test]
fn ready_state_renders_rows() {
    let (theme, opts) = plain();
    let mut ctrl: ViewStateController<Bus> = ViewStateController::new();
    let ticket = ctrl.begin_reload();
    ctrl.complete_reload(ticket, Ok(vec![bus("KA-01-F-4532"), bus("KA-01-F-8934")]));

    let out = render_bus_board(&ctrl.snapshot(), &theme, &opts);
    assert!(out.contains("KA-01-F-4532"));
    assert!(out.contains("KA-01-F-8934"));
    assert!(out.contains("2 buses"));
}

#[test]
fn filtered_out_view_reads_differently_from_empty_collection() {
    let (theme, opts) = plain();

    // Non-empty cache, but nothing passes the filter.
    let snapshot: ViewSnapshot<'_, Bus> = ViewSnapshot::Ready(vec![]);
    let out = render_bus_board(&snapshot, &theme, &opts);
    assert!(out.contains("No buses match the current filters"));
    assert!(!out.contains("No buses are reporting"));
}

#[test]
fn roster_marks_unread_and_selection() {
    let (theme, opts) = plain();
    let mut ctrl: ViewStateController<Conductor> = ViewStateController::new();
    let ticket = ctrl.begin_reload();
    ctrl.complete_reload(
        ticket,
        Ok(vec![Conductor {
            id: 1,
            name: "Ramesh Kumar".to_string(),
            bus_number: "KA-01-F-4532".to_string(),
            route: "335E".to_string(),
            online: true,
            unread: 2,
        }]),
    );
    ctrl.select(1).unwrap();

    let out = render_conductor_roster(&ctrl.snapshot(), ctrl.active_key().copied(), &theme, &opts);
    assert!(out.contains("Ramesh Kumar"));
    assert!(out.contains("[2 unread]"));
    assert!(out.contains("▸"));
    // Emoji disabled: presence falls back to a plain marker.
    assert!(out.contains("[on]"));
}

#[test]
fn messages_empty_state_has_guidance() {
    let (theme, _) = plain();
    let mut ctrl: ViewStateController<Message> = ViewStateController::new();
    let ticket = ctrl.begin_reload();
    ctrl.complete_reload(ticket, Ok(vec![]));

    let out = render_recent_messages(&ctrl.snapshot(), &theme);
    assert!(out.contains("No recent messages"));
}

#[test]
fn csv_export_covers_the_current_view() {
    let rows = vec![bus("KA-01-F-4532")];
    let view: Vec<&Bus> = rows.iter().collect();

    let csv = bus_view_to_csv(&view);
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("number,conductor,route,location,status,load")
    );
    assert_eq!(
        lines.next(),
        Some("KA-01-F-4532,Ramesh Kumar,335E,Silk Board Junction,On-Time,85%")
    );
}
