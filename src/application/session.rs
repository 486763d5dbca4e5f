use crate::application::dispatch::validate_draft;
use crate::domain::error::FleetError;
use crate::domain::model::{LoginRequest, Role, Session};
use crate::domain::traits::SessionStore;
use crate::state::AppState;
use chrono::Utc;
use tracing::debug;

/// Authenticate against the API and persist the session.
///
/// The store is only written after the server accepts the credentials; a
/// rejected login surfaces the server's detail message and leaves any
/// previous session untouched.
pub async fn login(
    state: &AppState,
    username: &str,
    password: &str,
    role: Role,
) -> Result<Session, FleetError> {
    let username = validate_draft(username, "username")?;
    let password = validate_draft(password, "password")?;

    let request = LoginRequest {
        username,
        password,
        role,
    };
    let response = state.api.login(&request).await?;

    let session = Session {
        user_role: response.user_role,
        username: response.username,
        login_time: Utc::now().to_rfc3339(),
        token: response.token,
    };
    state.sessions.save(&session).await?;
    debug!(role = %session.user_role, "session persisted");

    Ok(session)
}

pub async fn logout(state: &AppState) -> Result<(), FleetError> {
    state.sessions.clear().await
}

pub async fn current_session(state: &AppState) -> Result<Option<Session>, FleetError> {
    state.sessions.load().await
}

/// Gate a page command on the persisted role, the way the web pages
/// redirected to the login screen on a missing or mismatched `userRole`.
pub async fn require_role(state: &AppState, role: Role) -> Result<Session, FleetError> {
    match state.sessions.load().await? {
        Some(session) if session.user_role == role => Ok(session),
        Some(session) => Err(FleetError::Session(format!(
            "this command requires the {} role (logged in as {})",
            role, session.user_role
        ))),
        None => Err(FleetError::Session(
            "not logged in. Run `saathi login` first".to_string(),
        )),
    }
}
