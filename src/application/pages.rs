//! Per-page orchestration: composes the controller, the HTTP API and the
//! renderers for each CLI command. Effects (printing, file writes, the
//! watch loop) live here; the controller and renderers stay pure.

use crate::application::controller::{
    MutateOutcome, ReloadOutcome, ViewStateController,
};
use crate::application::dispatch::{validate_draft, ActionDispatcher};
use crate::application::filter::FilterCriteria;
use crate::application::session::require_role;
use crate::domain::error::FleetError;
use crate::domain::model::{
    Bus, Conductor, Message, OutgoingMessage, Recommendation, Role,
};
use crate::domain::traits::{CollectionSource, Filterable, Keyed};
use crate::presentation::render::{self, RenderOptions};
use crate::presentation::theme::Theme;
use crate::state::AppState;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::debug;

pub struct PageContext {
    pub theme: Theme,
    pub render: RenderOptions,
    pub json: bool,
}

/// One full reload cycle: issue a ticket, fetch, complete. The controller
/// decides whether the response is still the latest and may discard it.
pub async fn reload<T, S>(ctrl: &mut ViewStateController<T>, source: &S) -> ReloadOutcome
where
    T: Keyed + Filterable + Clone,
    S: CollectionSource<T> + ?Sized,
{
    let ticket = ctrl.begin_reload();
    let result = source.fetch().await;
    ctrl.complete_reload(ticket, result)
}

fn fetch_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn clear_screen() {
    // ANSI escape sequence: clear screen and move cursor to top-left
    print!("\x1B[2J\x1B[1;1H");
    std::io::Write::flush(&mut std::io::stdout()).ok();
}

// ---- coordinator dashboard ----

pub async fn show_dashboard(state: &AppState, ctx: &PageContext) -> Result<(), FleetError> {
    require_role(state, Role::Coordinator).await?;

    let pb = fetch_spinner("Loading dashboard ...");
    let result = state.api.dashboard_stats().await;
    pb.finish_and_clear();

    match result {
        Ok(bundle) => {
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&bundle)?);
            } else {
                print!("{}", render::render_dashboard(&bundle, &ctx.theme, &ctx.render));
            }
        }
        Err(err) => print!("{}", render::error_block(&err, &ctx.theme)),
    }

    Ok(())
}

// ---- live bus tracking ----

pub async fn show_buses(
    state: &AppState,
    ctx: &PageContext,
    criteria: FilterCriteria,
    watch_secs: Option<u64>,
    export_path: Option<&Path>,
    mut shutdown: oneshot::Receiver<()>,
) -> Result<(), FleetError> {
    require_role(state, Role::Coordinator).await?;

    let mut ctrl: ViewStateController<Bus> = ViewStateController::new();
    ctrl.set_filter(criteria);

    let pb = fetch_spinner("Fetching fleet positions ...");
    reload(&mut ctrl, &state.api).await;
    pb.finish_and_clear();

    print_bus_view(&ctrl, ctx)?;

    if let Some(path) = export_path {
        let csv = render::bus_view_to_csv(&ctrl.view());
        tokio::fs::write(path, csv).await?;
        println!("Exported current view to {}", path.display());
    }

    let Some(secs) = watch_secs else {
        return Ok(());
    };

    // Refresh loop. Ctrl-C closes the controller so a response still in
    // flight cannot touch the cache after teardown.
    let mut ticker = tokio::time::interval(Duration::from_secs(secs.max(1)));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    ticker.tick().await; // first tick fires immediately

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let outcome = reload(&mut ctrl, &state.api).await;
                debug!(?outcome, "watch reload");
                clear_screen();
                print_bus_view(&ctrl, ctx)?;
            }
            _ = &mut shutdown => {
                ctrl.close();
                println!("{}", (ctx.theme.muted)("Stopped tracking."));
                break;
            }
        }
    }

    Ok(())
}

fn print_bus_view(ctrl: &ViewStateController<Bus>, ctx: &PageContext) -> Result<(), FleetError> {
    if ctx.json {
        let rows: Vec<&Bus> = ctrl.view();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!(
            "{}",
            render::render_bus_board(&ctrl.snapshot(), &ctx.theme, &ctx.render)
        );
    }
    Ok(())
}

// ---- conductor roster / chat threads ----

pub async fn show_conductors(
    state: &AppState,
    ctx: &PageContext,
    criteria: FilterCriteria,
    thread_with: Option<u32>,
) -> Result<(), FleetError> {
    require_role(state, Role::Coordinator).await?;

    let mut ctrl: ViewStateController<Conductor> = ViewStateController::new();
    ctrl.set_filter(criteria);

    let pb = fetch_spinner("Loading roster ...");
    reload(&mut ctrl, &state.api).await;
    pb.finish_and_clear();

    if let Some(id) = thread_with {
        // The conductor may have dropped off the roster since the id was
        // observed; a stale selection is an error, not a crash.
        ctrl.select(id)?;
    }

    if ctx.json {
        let rows: Vec<&Conductor> = ctrl.view();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    print!(
        "{}",
        render::render_conductor_roster(
            &ctrl.snapshot(),
            ctrl.active_key().copied(),
            &ctx.theme,
            &ctx.render,
        )
    );

    if let Some(conductor) = ctrl.active_record() {
        let messages = state.api.messages().await;
        match messages {
            Ok(all) => {
                // Thread view: this conductor's bus, oldest first.
                let mut thread: Vec<&Message> = all
                    .iter()
                    .filter(|m| m.bus_number.as_deref() == Some(conductor.bus_number.as_str()))
                    .collect();
                thread.reverse();
                println!();
                print!("{}", render::render_conversation(conductor, &thread, &ctx.theme));
            }
            Err(err) => print!("{}", render::error_block(&err, &ctx.theme)),
        }
    }

    Ok(())
}

pub async fn show_messages(state: &AppState, ctx: &PageContext) -> Result<(), FleetError> {
    require_role(state, Role::Coordinator).await?;

    let mut ctrl: ViewStateController<Message> = ViewStateController::new();

    let pb = fetch_spinner("Loading messages ...");
    reload(&mut ctrl, &state.api).await;
    pb.finish_and_clear();

    if ctx.json {
        let rows: Vec<&Message> = ctrl.view();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!(
            "{}",
            render::render_recent_messages(&ctrl.snapshot(), &ctx.theme)
        );
    }

    Ok(())
}

// ---- messaging mutations ----

/// Coordinator → conductor direct message.
///
/// Pessimistic flow: validate, resolve the target against a fresh roster,
/// claim the per-key mutation slot, POST, then refetch the thread. On
/// failure the draft is reprinted so nothing has to be retyped.
pub async fn send_to_conductor(
    state: &AppState,
    ctx: &PageContext,
    conductor_id: u32,
    draft: &str,
) -> Result<(), FleetError> {
    let session = require_role(state, Role::Coordinator).await?;
    let text = validate_draft(draft, "message")?;

    let mut ctrl: ViewStateController<Conductor> = ViewStateController::new();
    reload(&mut ctrl, &state.api).await;
    ctrl.select(conductor_id)?;
    let conductor = ctrl
        .active_record()
        .cloned()
        .ok_or_else(|| FleetError::NotFound(format!("conductor {} left the roster", conductor_id)))?;

    let dispatcher: ActionDispatcher<u32> = ActionDispatcher::new();
    dispatcher.begin(conductor_id, text.clone())?;
    let ticket = ctrl.begin_mutate(conductor_id)?;

    let outgoing = OutgoingMessage {
        from_role: session.user_role.to_string(),
        to_role: Role::Conductor.to_string(),
        bus_number: Some(conductor.bus_number.clone()),
        message: text,
        timestamp: Utc::now().to_rfc3339(),
    };

    match state.api.send_message(&outgoing).await {
        Ok(receipt) => {
            ctrl.complete_mutate(ticket, Ok(None));
            dispatcher.succeed(&conductor_id);
            println!(
                "{} {}",
                (ctx.theme.ok)("✔"),
                (ctx.theme.value)(&format!(
                    "Message sent to {} ({})",
                    conductor.name, receipt.status
                )),
            );
            // Reconcile: show the authoritative thread.
            show_conductors(state, ctx, FilterCriteria::default(), Some(conductor_id)).await
        }
        Err(err) => {
            let outcome = ctrl.complete_mutate(ticket, Err(err));
            let preserved = dispatcher.fail(&conductor_id);
            if let MutateOutcome::Failed(err) = outcome {
                print!("{}", render::error_block(&err, &ctx.theme));
            }
            if let Some(draft) = preserved {
                println!("{}", (ctx.theme.muted)(&format!("Draft preserved: {}", draft)));
            }
            Ok(())
        }
    }
}

/// Conductor → coordinator message (also used for issue reports).
pub async fn send_to_coordinator(
    state: &AppState,
    ctx: &PageContext,
    draft: &str,
) -> Result<(), FleetError> {
    let session = require_role(state, Role::Conductor).await?;
    let text = validate_draft(draft, "message")?;

    let outgoing = OutgoingMessage {
        from_role: session.user_role.to_string(),
        to_role: Role::Coordinator.to_string(),
        bus_number: own_bus_number(state, &session.username).await,
        message: text.clone(),
        timestamp: Utc::now().to_rfc3339(),
    };

    match state.api.send_message(&outgoing).await {
        Ok(_) => {
            println!(
                "{} {}",
                (ctx.theme.ok)("✔"),
                (ctx.theme.value)("Message sent to coordinator"),
            );
            Ok(())
        }
        Err(err) => {
            print!("{}", render::error_block(&err, &ctx.theme));
            println!("{}", (ctx.theme.muted)(&format!("Draft preserved: {}", text)));
            Ok(())
        }
    }
}

// Canned quick-issue reports, as the conductor dashboard offered them
static QUICK_ISSUES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            "breakdown",
            "Vehicle breakdown reported. Immediate assistance required.",
        ),
        (
            "traffic",
            "Experiencing heavy traffic. Significant delay expected.",
        ),
        ("accident", "Accident on route. Emergency services notified."),
        (
            "crowding",
            "Heavy passenger crowding. Additional buses may be needed.",
        ),
    ])
});

pub async fn report_issue(
    state: &AppState,
    ctx: &PageContext,
    issue_type: &str,
    note: Option<&str>,
) -> Result<(), FleetError> {
    let body = match note {
        Some(note) => {
            let note = validate_draft(note, "description")?;
            format!("[ISSUE: {}] {}", issue_type.to_uppercase(), note)
        }
        None => {
            let canned = QUICK_ISSUES.get(issue_type).ok_or_else(|| {
                FleetError::Validation(format!(
                    "unknown issue type: {} (expected one of breakdown, traffic, accident, crowding)",
                    issue_type
                ))
            })?;
            format!("[URGENT: {}] {}", issue_type.to_uppercase(), canned)
        }
    };

    send_to_coordinator(state, ctx, &body).await
}

pub async fn broadcast(
    state: &AppState,
    ctx: &PageContext,
    draft: &str,
    route: Option<&str>,
) -> Result<(), FleetError> {
    require_role(state, Role::Coordinator).await?;
    let mut text = validate_draft(draft, "broadcast message")?;
    if let Some(route) = route {
        text = format!("[Route {}] {}", route, text);
    }

    match state.api.broadcast(&text).await {
        Ok(receipt) => {
            println!(
                "{} {}",
                (ctx.theme.ok)("✔"),
                (ctx.theme.value)(&receipt.status),
            );
            Ok(())
        }
        Err(err) => {
            print!("{}", render::error_block(&err, &ctx.theme));
            println!("{}", (ctx.theme.muted)(&format!("Draft preserved: {}", text)));
            Ok(())
        }
    }
}

async fn own_bus_number(state: &AppState, username: &str) -> Option<String> {
    // Best effort: the roster is the only place the API exposes the
    // conductor → bus assignment.
    let roster = state.api.conductors().await.ok()?;
    roster
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(username))
        .map(|c| c.bus_number.clone())
}

// ---- ML recommendations ----

pub async fn show_recommendations(
    state: &AppState,
    ctx: &PageContext,
    criteria: FilterCriteria,
) -> Result<(), FleetError> {
    require_role(state, Role::Coordinator).await?;

    let mut ctrl: ViewStateController<Recommendation> = ViewStateController::new();
    ctrl.set_filter(criteria);

    let pb = fetch_spinner("Loading recommendations ...");
    reload(&mut ctrl, &state.api).await;
    pb.finish_and_clear();

    if ctx.json {
        let rows: Vec<&Recommendation> = ctrl.view();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!(
            "{}",
            render::render_recommendations(&ctrl.snapshot(), &ctx.theme)
        );
    }

    Ok(())
}

/// Apply one recommendation, addressed by route (exact or unambiguous
/// substring). The route key is claimed for the duration of the request;
/// afterwards the table is refetched rather than patched locally.
pub async fn apply_recommendation(
    state: &AppState,
    ctx: &PageContext,
    route_query: &str,
) -> Result<(), FleetError> {
    require_role(state, Role::Coordinator).await?;
    let route_query = validate_draft(route_query, "route")?;

    let mut ctrl: ViewStateController<Recommendation> = ViewStateController::new();
    let pb = fetch_spinner("Loading recommendations ...");
    reload(&mut ctrl, &state.api).await;
    pb.finish_and_clear();

    let route = resolve_route(&ctrl, &route_query)?;
    apply_one(state, ctx, &mut ctrl, &route).await?;

    // Pessimistic reconciliation: re-render from a fresh fetch.
    reload(&mut ctrl, &state.api).await;
    print!(
        "{}",
        render::render_recommendations(&ctrl.snapshot(), &ctx.theme)
    );
    Ok(())
}

/// Apply every recommendation with a non-zero change, one at a time; the
/// per-key discipline holds because each route is claimed before its
/// request and released on completion.
pub async fn apply_all_recommendations(
    state: &AppState,
    ctx: &PageContext,
) -> Result<(), FleetError> {
    require_role(state, Role::Coordinator).await?;

    let mut ctrl: ViewStateController<Recommendation> = ViewStateController::new();
    let pb = fetch_spinner("Loading recommendations ...");
    reload(&mut ctrl, &state.api).await;
    pb.finish_and_clear();

    let routes: Vec<String> = ctrl
        .view()
        .iter()
        .filter(|r| r.change != "0")
        .map(|r| r.route.clone())
        .collect();

    if routes.is_empty() {
        println!("{}", (ctx.theme.muted)("Nothing to apply: allocations are already optimal."));
        return Ok(());
    }

    let mut applied = 0usize;
    for route in &routes {
        if apply_one(state, ctx, &mut ctrl, route).await.is_ok() {
            applied += 1;
        }
    }

    println!(
        "{}",
        (ctx.theme.heading)(&format!("{}/{} routes updated.", applied, routes.len())),
    );

    reload(&mut ctrl, &state.api).await;
    print!(
        "{}",
        render::render_recommendations(&ctrl.snapshot(), &ctx.theme)
    );
    Ok(())
}

async fn apply_one(
    state: &AppState,
    ctx: &PageContext,
    ctrl: &mut ViewStateController<Recommendation>,
    route: &str,
) -> Result<(), FleetError> {
    let ticket = ctrl.begin_mutate(route.to_string())?;

    match state.api.apply_recommendation(route).await {
        Ok(receipt) => {
            ctrl.complete_mutate(ticket, Ok(None));
            println!(
                "{} {}",
                (ctx.theme.ok)("✔"),
                (ctx.theme.value)(&receipt.message),
            );
            Ok(())
        }
        Err(err) => match ctrl.complete_mutate(ticket, Err(err)) {
            MutateOutcome::Failed(err) => {
                print!("{}", render::error_block(&err, &ctx.theme));
                Err(err)
            }
            _ => Ok(()),
        },
    }
}

fn resolve_route(
    ctrl: &ViewStateController<Recommendation>,
    query: &str,
) -> Result<String, FleetError> {
    let view = ctrl.view();
    let needle = query.to_lowercase();
    let matches: Vec<&&Recommendation> = view
        .iter()
        .filter(|r| r.route.to_lowercase().contains(&needle))
        .collect();

    match matches.as_slice() {
        [] => Err(FleetError::NotFound(format!(
            "no recommendation for a route matching '{}'",
            query
        ))),
        [one] => Ok(one.route.clone()),
        many => Err(FleetError::Validation(format!(
            "'{}' matches {} routes; be more specific",
            query,
            many.len()
        ))),
    }
}
