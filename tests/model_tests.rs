//! Wire-format tests: the serde mappings must accept exactly what the
//! backend emits.

use routesaathi::domain::model::{
    Bus, BusStatus, Conductor, Message, MessageId, Priority, Recommendation, Role, StatsBundle,
};
use routesaathi::domain::traits::Keyed;

#[test]
fn conductor_uses_camel_case_wire_names() {
    let json = r#"{
        "id": 1,
        "name": "Ramesh Kumar",
        "busNumber": "KA-01-F-4532",
        "route": "335E",
        "online": true,
        "unread": 2
    }"#;

    let conductor: Conductor = serde_json::from_str(json).unwrap();
    assert_eq!(conductor.bus_number, "KA-01-F-4532");
    assert_eq!(conductor.key(), 1);

    // And it serializes back with the same names.
    let round = serde_json::to_value(&conductor).unwrap();
    assert!(round.get("busNumber").is_some());
    assert!(round.get("bus_number").is_none());
}

#[test]
fn bus_status_accepts_the_three_wire_values() {
    let json = r#"{
        "number": "KA-01-F-8934",
        "conductor": "Suresh Babu",
        "route": "G4",
        "location": "Whitefield Main Road",
        "status": "delay",
        "statusText": "Delayed",
        "load": "92%",
        "loadClass": "badge-danger"
    }"#;

    let bus: Bus = serde_json::from_str(json).unwrap();
    assert_eq!(bus.status, BusStatus::Delayed);
    assert_eq!(bus.status_text, "Delayed");
    // conductor_id is absent from some payload variants
    assert_eq!(bus.conductor_id, None);

    assert!(serde_json::from_str::<Bus>(&json.replace("delay", "teleporting")).is_err());
}

#[test]
fn message_id_is_integer_or_token() {
    let seeded = r#"{
        "id": 3,
        "from": "conductor",
        "to": "coordinator",
        "busNumber": "KA-01-F-8934",
        "message": "Bus breakdown on Route G4 near Electronic City",
        "timestamp": "2025-12-02T09:30:00Z",
        "read": false
    }"#;
    let posted = r#"{
        "id": "9f8e7d6c5b4a",
        "from": "coordinator",
        "to": "conductor",
        "message": "Acknowledged",
        "timestamp": "2025-12-02T09:31:00Z"
    }"#;

    let seeded: Message = serde_json::from_str(seeded).unwrap();
    assert_eq!(seeded.id, Some(MessageId::Seq(3)));

    let posted: Message = serde_json::from_str(posted).unwrap();
    assert_eq!(posted.id, Some(MessageId::Token("9f8e7d6c5b4a".to_string())));
    // busNumber and read are optional on the wire
    assert_eq!(posted.bus_number, None);
    assert!(!posted.read);
}

#[test]
fn recommendation_priority_is_upper_case_on_the_wire() {
    let json = r#"{
        "priority": "HIGH",
        "route": "Kempegowda BS → Electronic City (335E)",
        "currentBuses": 6,
        "recommendedBuses": 8,
        "change": "+2",
        "reason": "High passenger footfall, 115% avg occupancy",
        "impact": "Reduce wait time by 8 mins"
    }"#;

    let rec: Recommendation = serde_json::from_str(json).unwrap();
    assert_eq!(rec.priority, Priority::High);
    assert_eq!(rec.current_buses, 6);
    assert_eq!(rec.key(), rec.route);
}

#[test]
fn stats_bundle_tolerates_missing_sections() {
    let json = r#"{
        "dashboard_stats": {
            "totalBuses": 24,
            "pendingMessages": 3
        }
    }"#;

    let bundle: StatsBundle = serde_json::from_str(json).unwrap();
    assert_eq!(bundle.dashboard_stats.total_buses, 24);
    assert_eq!(bundle.dashboard_stats.pending_messages, 3);
    // Unlisted tiles default to zero; alerts and routes may be absent.
    assert_eq!(bundle.dashboard_stats.ml_suggestions, 0);
    assert!(bundle.alerts.is_empty());
    assert!(bundle.routes.is_empty());
}

#[test]
fn role_parses_case_insensitively() {
    assert_eq!("Coordinator".parse::<Role>().unwrap(), Role::Coordinator);
    assert_eq!("conductor".parse::<Role>().unwrap(), Role::Conductor);
    assert!("driver".parse::<Role>().is_err());
}
