//! Filter criteria tests: purity, predicates, the `all` sentinel.

use routesaathi::application::controller::ViewStateController;
use routesaathi::application::filter::FilterCriteria;
use routesaathi::domain::model::{Bus, BusStatus, Conductor};

fn bus(number: &str, route: &str, status: BusStatus) -> Bus {
    Bus {
        number: number.to_string(),
        conductor_id: None,
        conductor: "Ramesh Kumar".to_string(),
        route: route.to_string(),
        location: "Silk Board Junction".to_string(),
        status,
        status_text: "On-Time".to_string(),
        load: "85%".to_string(),
        load_class: "badge-warning".to_string(),
    }
}

fn roster() -> Vec<Conductor> {
    vec![
        Conductor {
            id: 1,
            name: "Anand".to_string(),
            bus_number: "KA-01-F-4532".to_string(),
            route: "335E".to_string(),
            online: true,
            unread: 2,
        },
        Conductor {
            id: 2,
            name: "Bhaskar".to_string(),
            bus_number: "KA-01-F-8934".to_string(),
            route: "G4".to_string(),
            online: false,
            unread: 0,
        },
    ]
}

#[test]
fn search_is_case_insensitive_substring() {
    let mut ctrl: ViewStateController<Conductor> = ViewStateController::new();
    let ticket = ctrl.begin_reload();
    ctrl.complete_reload(ticket, Ok(roster()));

    let view = ctrl.project(&FilterCriteria::new().with_search("a"));
    // Both names contain an 'a'; narrow further.
    assert_eq!(view.len(), 2);

    let view = ctrl.project(&FilterCriteria::new().with_search("ANAND"));
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].id, 1);
}

#[test]
fn project_is_pure_and_stable() {
    let mut ctrl: ViewStateController<Conductor> = ViewStateController::new();
    let ticket = ctrl.begin_reload();
    ctrl.complete_reload(ticket, Ok(roster()));

    let criteria = FilterCriteria::new().with_search("ka-01");
    let first: Vec<u32> = ctrl.project(&criteria).iter().map(|c| c.id).collect();
    let second: Vec<u32> = ctrl.project(&criteria).iter().map(|c| c.id).collect();

    // Same cache, same criteria: identical ordered output.
    assert_eq!(first, second);
    // And the cache itself is untouched.
    assert_eq!(ctrl.cache().len(), 2);
}

#[test]
fn route_and_status_are_equality_predicates() {
    let buses = vec![
        bus("KA-01-F-4532", "335E", BusStatus::OnTime),
        bus("KA-01-F-8934", "G4", BusStatus::Delayed),
        bus("KA-01-F-6789", "335E", BusStatus::Delayed),
    ];

    let mut ctrl: ViewStateController<Bus> = ViewStateController::new();
    let ticket = ctrl.begin_reload();
    ctrl.complete_reload(ticket, Ok(buses));

    let view = ctrl.project(&FilterCriteria::new().with_route("335E"));
    assert_eq!(view.len(), 2);

    let view = ctrl.project(&FilterCriteria::new().with_status("delay"));
    assert_eq!(view.len(), 2);

    let view = ctrl.project(
        &FilterCriteria::new()
            .with_route("335E")
            .with_status("delay"),
    );
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].number, "KA-01-F-6789");
}

#[test]
fn all_sentinel_and_empty_string_match_everything() {
    let buses = vec![
        bus("KA-01-F-4532", "335E", BusStatus::OnTime),
        bus("KA-01-F-8934", "G4", BusStatus::Delayed),
    ];

    let mut ctrl: ViewStateController<Bus> = ViewStateController::new();
    let ticket = ctrl.begin_reload();
    ctrl.complete_reload(ticket, Ok(buses));

    let view = ctrl.project(&FilterCriteria::new().with_route("all").with_status(""));
    assert_eq!(view.len(), 2);

    assert!(FilterCriteria::new().is_empty());
}

#[test]
fn conductor_online_maps_to_status_predicate() {
    let mut ctrl: ViewStateController<Conductor> = ViewStateController::new();
    let ticket = ctrl.begin_reload();
    ctrl.complete_reload(ticket, Ok(roster()));

    let view = ctrl.project(&FilterCriteria::new().with_status("online"));
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].id, 1);

    let view = ctrl.project(&FilterCriteria::new().with_status("offline"));
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].id, 2);
}
