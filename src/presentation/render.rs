//! Pure projections from controller state to terminal output.
//!
//! Nothing in this module performs I/O: every function takes a snapshot
//! (plus theme/options) and returns the `String` to print. Loading, empty
//! and error states render distinctly; an error always carries a retry
//! affordance and an empty collection always carries guidance instead of
//! a blank list.

use crate::application::controller::ViewSnapshot;
use crate::domain::error::FleetError;
use crate::domain::model::{
    Alert, Bus, Conductor, Message, Recommendation, StatsBundle,
};
use crate::presentation::theme::Theme;
use std::fmt::Write;

pub struct RenderOptions {
    pub enable_emoji: bool,
}

pub fn loading_line(theme: &Theme) -> String {
    format!("{}\n", (theme.muted)("Loading ..."))
}

pub fn error_block(err: &FleetError, theme: &Theme) -> String {
    let mut out = String::new();
    writeln!(out, "{} {}", (theme.danger)("✘"), (theme.value)(&err.to_string())).ok();
    writeln!(out, "  {}", (theme.muted)("Data is unavailable. Run the command again to retry.")).ok();
    out
}

pub fn empty_block(hint: &str, theme: &Theme) -> String {
    format!("{}\n", (theme.muted)(hint))
}

fn separator(theme: &Theme) -> String {
    (theme.line)(&"⸺".repeat(40))
}

// ---- bus tracking ----

pub fn render_bus_board(
    snapshot: &ViewSnapshot<'_, Bus>,
    theme: &Theme,
    opts: &RenderOptions,
) -> String {
    let mut out = String::new();
    writeln!(out, "{}", (theme.title)("Live Bus Tracking")).ok();

    match snapshot {
        ViewSnapshot::Loading => out.push_str(&loading_line(theme)),
        ViewSnapshot::Unavailable(err) => out.push_str(&error_block(err, theme)),
        ViewSnapshot::Empty => {
            out.push_str(&empty_block(
                "No buses are reporting right now. Check back once the fleet is on the road.",
                theme,
            ));
        }
        ViewSnapshot::Ready(rows) if rows.is_empty() => {
            out.push_str(&empty_block("No buses match the current filters.", theme));
        }
        ViewSnapshot::Ready(rows) => {
            writeln!(
                out,
                "  {:<2} {:<14} {:<16} {:<7} {:<24} {:<12} {}",
                "",
                (theme.heading)("Bus"),
                (theme.heading)("Conductor"),
                (theme.heading)("Route"),
                (theme.heading)("Location"),
                (theme.heading)("Status"),
                (theme.heading)("Load"),
            )
            .ok();
            writeln!(out, "  {}", separator(theme)).ok();
            for bus in rows {
                let badge = theme.badge(&bus.load_class);
                writeln!(
                    out,
                    "  {:<2} {:<14} {:<16} {:<7} {:<24} {:<12} {}",
                    status_marker(bus.status, opts.enable_emoji),
                    (theme.accent)(&bus.number),
                    (theme.value)(&bus.conductor),
                    (theme.accent)(&bus.route),
                    (theme.value)(&bus.location),
                    badge(&bus.status_text),
                    badge(&bus.load),
                )
                .ok();
            }
            writeln!(out, "  {}", (theme.muted)(&format!("{} buses", rows.len()))).ok();
        }
    }

    out
}

fn status_marker(status: crate::domain::model::BusStatus, emoji: bool) -> &'static str {
    use crate::domain::model::BusStatus;
    if !emoji {
        return " ";
    }
    match status {
        BusStatus::OnTime => "🟢",
        BusStatus::Delayed => "🔴",
        BusStatus::Congestion => "🟡",
    }
}

/// The current bus view as CSV, for `--export`.
pub fn bus_view_to_csv(rows: &[&Bus]) -> String {
    let mut out = String::from("number,conductor,route,location,status,load\n");
    for bus in rows {
        writeln!(
            out,
            "{},{},{},{},{},{}",
            bus.number, bus.conductor, bus.route, bus.location, bus.status_text, bus.load
        )
        .ok();
    }
    out
}

// ---- conductor roster ----

pub fn render_conductor_roster(
    snapshot: &ViewSnapshot<'_, Conductor>,
    active: Option<u32>,
    theme: &Theme,
    opts: &RenderOptions,
) -> String {
    let mut out = String::new();
    writeln!(out, "{}", (theme.title)("Conductors")).ok();

    match snapshot {
        ViewSnapshot::Loading => out.push_str(&loading_line(theme)),
        ViewSnapshot::Unavailable(err) => out.push_str(&error_block(err, theme)),
        ViewSnapshot::Empty => {
            out.push_str(&empty_block(
                "No conductors are registered yet. Conductors appear here once they log in.",
                theme,
            ));
        }
        ViewSnapshot::Ready(rows) if rows.is_empty() => {
            out.push_str(&empty_block("No conductors match the search.", theme));
        }
        ViewSnapshot::Ready(rows) => {
            for conductor in rows {
                let marker = presence_marker(conductor.online, opts.enable_emoji);
                let selected = if active == Some(conductor.id) { "▸ " } else { "  " };
                let mut line = format!(
                    "{}{} {} {}",
                    selected,
                    marker,
                    (theme.heading)(&conductor.name),
                    (theme.muted)(&format!(
                        "Bus: {} | Route: {}",
                        conductor.bus_number, conductor.route
                    )),
                );
                if conductor.unread > 0 {
                    line.push(' ');
                    line.push_str(&(theme.danger)(&format!("[{} unread]", conductor.unread)));
                }
                writeln!(out, "{}", line).ok();
            }
        }
    }

    out
}

fn presence_marker(online: bool, emoji: bool) -> String {
    match (online, emoji) {
        (true, true) => "🟢".to_string(),
        (false, true) => "🔴".to_string(),
        (true, false) => "[on]".to_string(),
        (false, false) => "[off]".to_string(),
    }
}

/// Chat-style thread for the selected conductor: the messages whose bus
/// number matches theirs, oldest first.
pub fn render_conversation(
    conductor: &Conductor,
    messages: &[&Message],
    theme: &Theme,
) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "{} {}",
        (theme.title)(&conductor.name),
        (theme.muted)(&format!("{} | Route {}", conductor.bus_number, conductor.route)),
    )
    .ok();
    writeln!(out, "  {}", separator(theme)).ok();

    if messages.is_empty() {
        out.push_str(&empty_block("No messages yet. Start the conversation!", theme));
        return out;
    }

    for msg in messages {
        let style = if msg.from_role == "coordinator" {
            theme.accent
        } else {
            theme.value
        };
        writeln!(
            out,
            "  {} {}",
            style(&format!("{}:", msg.from_role)),
            (theme.value)(&msg.message),
        )
        .ok();
        writeln!(out, "    {}", (theme.muted)(&msg.timestamp)).ok();
    }

    out
}

// ---- recent messages ----

pub fn render_recent_messages(
    snapshot: &ViewSnapshot<'_, Message>,
    theme: &Theme,
) -> String {
    let mut out = String::new();
    writeln!(out, "{}", (theme.title)("Recent Messages")).ok();

    match snapshot {
        ViewSnapshot::Loading => out.push_str(&loading_line(theme)),
        ViewSnapshot::Unavailable(err) => out.push_str(&error_block(err, theme)),
        ViewSnapshot::Empty => {
            out.push_str(&empty_block("No recent messages.", theme));
        }
        ViewSnapshot::Ready(rows) if rows.is_empty() => {
            out.push_str(&empty_block("No messages match the search.", theme));
        }
        ViewSnapshot::Ready(rows) => {
            for msg in rows {
                let direction = if msg.from_role == "coordinator" {
                    "Sent to"
                } else {
                    "Received from"
                };
                let bus = msg.bus_number.as_deref().unwrap_or("fleet");
                writeln!(
                    out,
                    "  {} {}",
                    (theme.heading)(&format!("{} {}", direction, bus)),
                    if msg.read {
                        String::new()
                    } else {
                        (theme.danger)("●")
                    },
                )
                .ok();
                writeln!(out, "    {}", (theme.value)(&msg.message)).ok();
                writeln!(out, "    {}", (theme.muted)(&msg.timestamp)).ok();
            }
        }
    }

    out
}

// ---- ML recommendations ----

pub fn render_recommendations(
    snapshot: &ViewSnapshot<'_, Recommendation>,
    theme: &Theme,
) -> String {
    let mut out = String::new();
    writeln!(out, "{}", (theme.title)("ML Route Recommendations")).ok();

    match snapshot {
        ViewSnapshot::Loading => out.push_str(&loading_line(theme)),
        ViewSnapshot::Unavailable(err) => out.push_str(&error_block(err, theme)),
        ViewSnapshot::Empty => {
            out.push_str(&empty_block(
                "No recommendations right now. The model publishes new suggestions as demand shifts.",
                theme,
            ));
        }
        ViewSnapshot::Ready(rows) if rows.is_empty() => {
            out.push_str(&empty_block("No recommendations match the filters.", theme));
        }
        ViewSnapshot::Ready(rows) => {
            writeln!(
                out,
                "  {:<8} {:<44} {:>7} {:>11} {:>7}",
                (theme.heading)("Priority"),
                (theme.heading)("Route"),
                (theme.heading)("Current"),
                (theme.heading)("Recommended"),
                (theme.heading)("Change"),
            )
            .ok();
            writeln!(out, "  {}", separator(theme)).ok();
            for rec in rows {
                writeln!(
                    out,
                    "  {:<8} {:<44} {:>7} {:>11} {:>7}",
                    priority_badge(rec, theme),
                    (theme.value)(&rec.route),
                    rec.current_buses,
                    rec.recommended_buses,
                    change_badge(rec, theme),
                )
                .ok();
                writeln!(
                    out,
                    "           {} {}",
                    (theme.muted)(&rec.reason),
                    (theme.info)(&format!("→ {}", rec.impact)),
                )
                .ok();
            }
        }
    }

    out
}

fn priority_badge(rec: &Recommendation, theme: &Theme) -> String {
    use crate::domain::model::Priority;
    let style = match rec.priority {
        Priority::High => theme.danger,
        Priority::Medium => theme.warn,
        Priority::Low => theme.info,
    };
    style(rec.priority.as_str())
}

fn change_badge(rec: &Recommendation, theme: &Theme) -> String {
    let style = if rec.change.starts_with('+') {
        theme.ok
    } else if rec.change.starts_with('-') {
        theme.danger
    } else {
        theme.info
    };
    style(&rec.change)
}

// ---- coordinator dashboard ----

pub fn render_dashboard(bundle: &StatsBundle, theme: &Theme, opts: &RenderOptions) -> String {
    let stats = &bundle.dashboard_stats;
    let mut out = String::new();
    writeln!(out, "{}", (theme.title)("Coordinator Dashboard")).ok();

    let tiles = [
        ("Total Buses", stats.total_buses),
        ("Low Demand Routes", stats.low_demand_routes),
        ("High Demand Routes", stats.high_demand_routes),
        ("Pending Messages", stats.pending_messages),
        ("ML Suggestions", stats.ml_suggestions),
        ("Congestion Alerts", stats.congestion_alerts),
    ];
    for (label, value) in tiles {
        writeln!(
            out,
            "  {:<20} {}",
            (theme.label)(label),
            (theme.accent)(&value.to_string()),
        )
        .ok();
    }

    if !bundle.alerts.is_empty() {
        writeln!(out).ok();
        writeln!(out, "{}", (theme.heading)("Alerts")).ok();
        for alert in &bundle.alerts {
            writeln!(out, "  {}", format_alert(alert, theme, opts.enable_emoji)).ok();
        }
    }

    if !bundle.routes.is_empty() {
        writeln!(out).ok();
        writeln!(out, "{}", (theme.heading)("Routes")).ok();
        writeln!(
            out,
            "  {:<7} {:<36} {:>6} {:<8}",
            (theme.heading)("Route"),
            (theme.heading)("Name"),
            (theme.heading)("Buses"),
            (theme.heading)("Load"),
        )
        .ok();
        writeln!(out, "  {}", separator(theme)).ok();
        for route in &bundle.routes {
            let badge = theme.badge(&route.load_class);
            writeln!(
                out,
                "  {:<7} {:<36} {:>6} {:<8}",
                (theme.accent)(&route.id),
                (theme.value)(&route.name),
                route.active_buses,
                badge(&route.load_status),
            )
            .ok();
        }
    }

    out
}

fn format_alert(alert: &Alert, theme: &Theme, emoji: bool) -> String {
    let style = match alert.kind.as_str() {
        "danger" => theme.danger,
        "warning" => theme.warn,
        "success" => theme.ok,
        _ => theme.info,
    };
    let prefix = if emoji { "⚠" } else { "!" };
    format!(
        "{} {} {}",
        style(prefix),
        (theme.value)(&alert.message),
        (theme.muted)(&alert.time),
    )
}
