//! Session store tests: persistence round-trip and the failed-login
//! guarantee that the store is never written on a rejected attempt.

use routesaathi::application::session;
use routesaathi::domain::model::{Role, Session};
use routesaathi::domain::traits::SessionStore;
use routesaathi::infrastructure::config::Config;
use routesaathi::infrastructure::storage::session::SqliteSessionStore;
use routesaathi::state::AppState;
use std::path::PathBuf;

fn temp_db(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "saathi_test_{}_{}.db",
        std::process::id(),
        name
    ));
    let _ = std::fs::remove_file(&path);
    path
}

fn sample_session() -> Session {
    Session {
        user_role: Role::Coordinator,
        username: "coordinator".to_string(),
        login_time: "2025-12-02T10:00:00Z".to_string(),
        token: "mock_token_coordinator".to_string(),
    }
}

#[tokio::test]
async fn empty_store_has_no_session() {
    let store = SqliteSessionStore::open(&temp_db("empty")).await.unwrap();
    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn save_then_load_round_trips() {
    let store = SqliteSessionStore::open(&temp_db("roundtrip")).await.unwrap();

    let session = sample_session();
    store.save(&session).await.unwrap();

    let loaded = store.load().await.unwrap().unwrap();
    assert_eq!(loaded, session);
}

#[tokio::test]
async fn save_replaces_previous_session() {
    let store = SqliteSessionStore::open(&temp_db("replace")).await.unwrap();

    store.save(&sample_session()).await.unwrap();

    let conductor = Session {
        user_role: Role::Conductor,
        username: "conductor".to_string(),
        login_time: "2025-12-02T11:00:00Z".to_string(),
        token: "mock_token_conductor".to_string(),
    };
    store.save(&conductor).await.unwrap();

    let loaded = store.load().await.unwrap().unwrap();
    assert_eq!(loaded.user_role, Role::Conductor);
    assert_eq!(loaded.username, "conductor");
}

#[tokio::test]
async fn clear_drops_the_session() {
    let store = SqliteSessionStore::open(&temp_db("clear")).await.unwrap();

    store.save(&sample_session()).await.unwrap();
    store.clear().await.unwrap();

    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn failed_login_leaves_store_untouched() {
    let store = SqliteSessionStore::open(&temp_db("failed_login"))
        .await
        .unwrap();
    store.save(&sample_session()).await.unwrap();

    // Nothing listens on the discard port, so the login attempt fails at
    // the transport before anything could be persisted.
    let config = Config {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 2,
        ..Config::default()
    };
    let state = AppState::new(store, config).unwrap();

    let result = session::login(&state, "coordinator", "wrong", Role::Coordinator).await;
    assert!(result.is_err());

    let loaded = state.sessions.load().await.unwrap().unwrap();
    assert_eq!(loaded, sample_session());
}

#[tokio::test]
async fn role_gate_requires_a_session() {
    let store = SqliteSessionStore::open(&temp_db("gate")).await.unwrap();
    let state = AppState::new(store, Config::default()).unwrap();

    // No session at all.
    assert!(session::require_role(&state, Role::Coordinator).await.is_err());

    // Wrong role.
    state.sessions.save(&sample_session()).await.unwrap();
    assert!(session::require_role(&state, Role::Conductor).await.is_err());

    // Matching role.
    let session = session::require_role(&state, Role::Coordinator).await.unwrap();
    assert_eq!(session.username, "coordinator");
}
