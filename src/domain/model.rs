use crate::domain::traits::{Filterable, Keyed};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// User role, gates which pages a session may open
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Coordinator,
    Conductor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Coordinator => "coordinator",
            Role::Conductor => "conductor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "coordinator" => Ok(Role::Coordinator),
            "conductor" => Ok(Role::Conductor),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

// Chat roster entry (GET /api/communication/conductors)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conductor {
    pub id: u32,
    pub name: String,
    pub bus_number: String,
    pub route: String,
    pub online: bool,
    pub unread: u32,
}

// Live tracking entry (GET /api/buses)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bus {
    pub number: String,
    #[serde(default)]
    pub conductor_id: Option<u32>,
    pub conductor: String,
    pub route: String,
    pub location: String,
    pub status: BusStatus,
    pub status_text: String,
    pub load: String,
    pub load_class: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BusStatus {
    #[serde(rename = "ontime")]
    OnTime,
    #[serde(rename = "delay")]
    Delayed,
    #[serde(rename = "congestion")]
    Congestion,
}

impl BusStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusStatus::OnTime => "ontime",
            BusStatus::Delayed => "delay",
            BusStatus::Congestion => "congestion",
        }
    }
}

// Seed rows carry integer ids, rows created through POST /api/messages get
// opaque hex tokens from the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum MessageId {
    Seq(u64),
    Token(String),
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageId::Seq(n) => write!(f, "{}", n),
            MessageId::Token(t) => f.write_str(t),
        }
    }
}

// One chat/report message (GET /api/communication/messages)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: Option<MessageId>,
    #[serde(rename = "from")]
    pub from_role: String,
    #[serde(rename = "to")]
    pub to_role: String,
    #[serde(rename = "busNumber", default)]
    pub bus_number: Option<String>,
    pub message: String,
    pub timestamp: String,
    #[serde(default)]
    pub read: bool,
}

// POST /api/messages request body
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingMessage {
    #[serde(rename = "from")]
    pub from_role: String,
    #[serde(rename = "to")]
    pub to_role: String,
    #[serde(rename = "busNumber", skip_serializing_if = "Option::is_none")]
    pub bus_number: Option<String>,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendReceipt {
    pub status: String,
    #[serde(default)]
    pub id: Option<MessageId>,
}

// ML reallocation suggestion (GET /api/ai/recommendations)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub priority: Priority,
    pub route: String,
    pub current_buses: u32,
    pub recommended_buses: u32,
    pub change: String,
    pub reason: String,
    pub impact: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "LOW")]
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyReceipt {
    pub status: String,
    pub message: String,
}

// GET /api/dashboard/stats bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsBundle {
    pub dashboard_stats: DashboardStats,
    #[serde(default)]
    pub alerts: Vec<Alert>,
    #[serde(default)]
    pub routes: Vec<RouteSummary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub total_buses: u32,
    #[serde(default)]
    pub low_demand_routes: u32,
    #[serde(default)]
    pub high_demand_routes: u32,
    #[serde(default)]
    pub pending_messages: u32,
    #[serde(default)]
    pub ml_suggestions: u32,
    #[serde(default)]
    pub congestion_alerts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub id: String,
    pub name: String,
    pub active_buses: u32,
    pub load_status: String,
    pub load_class: String,
}

// POST /api/auth/login
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "userRole")]
    pub user_role: Role,
    pub username: String,
}

// What the session store persists between invocations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub user_role: Role,
    pub username: String,
    pub login_time: String,
    pub token: String,
}

// ---- identity + filter feeds ----

impl Keyed for Conductor {
    type Key = u32;

    fn key(&self) -> u32 {
        self.id
    }
}

impl Keyed for Bus {
    type Key = String;

    fn key(&self) -> String {
        self.number.clone()
    }
}

impl Keyed for Recommendation {
    type Key = String;

    fn key(&self) -> String {
        self.route.clone()
    }
}

impl Keyed for Message {
    type Key = MessageId;

    fn key(&self) -> MessageId {
        // Seed rows without an id fall back to the timestamp token
        self.id
            .clone()
            .unwrap_or_else(|| MessageId::Token(self.timestamp.clone()))
    }
}

impl Filterable for Conductor {
    fn route(&self) -> Option<&str> {
        Some(&self.route)
    }

    fn status(&self) -> Option<&str> {
        Some(if self.online { "online" } else { "offline" })
    }

    fn haystack(&self) -> String {
        format!("{} {} {}", self.name, self.bus_number, self.route)
    }
}

impl Filterable for Bus {
    fn route(&self) -> Option<&str> {
        Some(&self.route)
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn haystack(&self) -> String {
        format!(
            "{} {} {} {}",
            self.number, self.conductor, self.route, self.location
        )
    }
}

impl Filterable for Recommendation {
    fn route(&self) -> Option<&str> {
        Some(&self.route)
    }

    fn status(&self) -> Option<&str> {
        Some(self.priority.as_str())
    }

    fn haystack(&self) -> String {
        format!("{} {} {}", self.route, self.reason, self.impact)
    }
}

impl Filterable for Message {
    fn haystack(&self) -> String {
        let bus = self.bus_number.as_deref().unwrap_or("");
        format!("{} {} {} {}", self.from_role, self.to_role, bus, self.message)
    }
}
