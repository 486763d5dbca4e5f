use crate::domain::error::FleetError;
use crate::domain::model::Session;
use crate::domain::traits::SessionStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use tokio_rusqlite::Connection;

// Same keys the web client kept in localStorage
const KEY_ROLE: &str = "userRole";
const KEY_USERNAME: &str = "username";
const KEY_LOGIN_TIME: &str = "loginTime";
const KEY_TOKEN: &str = "token";

pub async fn init_session_db(db_path: &Path) -> Result<Connection, FleetError> {
    let db = Connection::open(db_path.to_path_buf()).await?;

    db.call(|conn| {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS session (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(())
    })
    .await?;

    Ok(db)
}

/// SQLite-backed key-value session store.
pub struct SqliteSessionStore {
    conn: Connection,
}

impl SqliteSessionStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub async fn open(db_path: &Path) -> Result<Self, FleetError> {
        Ok(Self::new(init_session_db(db_path).await?))
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn load(&self) -> Result<Option<Session>, FleetError> {
        let rows: Vec<(String, String)> = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT key, value FROM session")?;
                let rows = stmt.query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?;
                let rows = rows.collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;

        let mut map: HashMap<String, String> = rows.into_iter().collect();

        // Presence of userRole is what gates page access
        let Some(role_raw) = map.remove(KEY_ROLE) else {
            return Ok(None);
        };
        let user_role = crate::domain::model::Role::from_str(&role_raw)
            .map_err(FleetError::Session)?;

        Ok(Some(Session {
            user_role,
            username: map.remove(KEY_USERNAME).unwrap_or_default(),
            login_time: map.remove(KEY_LOGIN_TIME).unwrap_or_default(),
            token: map.remove(KEY_TOKEN).unwrap_or_default(),
        }))
    }

    async fn save(&self, session: &Session) -> Result<(), FleetError> {
        let now = chrono::Utc::now().timestamp();
        let entries = vec![
            (KEY_ROLE.to_string(), session.user_role.to_string()),
            (KEY_USERNAME.to_string(), session.username.clone()),
            (KEY_LOGIN_TIME.to_string(), session.login_time.clone()),
            (KEY_TOKEN.to_string(), session.token.clone()),
        ];

        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(
                        "INSERT OR REPLACE INTO session (key, value, updated_at)
                         VALUES (?, ?, ?)",
                    )?;
                    for (key, value) in entries {
                        stmt.execute(tokio_rusqlite::params![key, value, now])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), FleetError> {
        self.conn
            .call(|conn| {
                conn.execute("DELETE FROM session", [])?;
                Ok(())
            })
            .await?;

        Ok(())
    }
}
