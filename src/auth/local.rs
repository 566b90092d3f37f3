// 🗄️ Local Auth Provider - Users, sessions and email confirmations in SQLite
//
// No mail is sent. A confirmation "email" is a row in `email_confirmations`
// plus an info log line carrying the link; the CLI `confirm` command and the
// `/auth/verified` page consume the token.

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::password::{generate_token, hash_password, verify_password, PasswordHash};
use super::{AuthError, AuthProvider, Session, User, UserMetadata, VERIFIED_PATH};
use crate::db::{self, format_timestamp, parse_timestamp, Event};
use crate::validation::{is_valid_email, MIN_PASSWORD_LEN};

/// How long a confirmation link stays valid
pub const CONFIRMATION_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq)]
pub struct LocalAuthSettings {
    pub session_ttl: Duration,
    pub hash_rounds: u32,
    pub min_password_len: usize,
}

impl Default for LocalAuthSettings {
    fn default() -> Self {
        LocalAuthSettings {
            session_ttl: Duration::hours(168),
            hash_rounds: 10_000,
            min_password_len: MIN_PASSWORD_LEN,
        }
    }
}

impl LocalAuthSettings {
    /// Cheap hashing for tests
    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        LocalAuthSettings {
            hash_rounds: 1_000,
            ..Default::default()
        }
    }
}

/// An unconsumed confirmation link
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConfirmation {
    pub token: String,
    pub email: String,
    pub redirect_to: Option<String>,
    pub sent_at: DateTime<Utc>,
}

impl PendingConfirmation {
    /// Link as it would appear in the email
    pub fn link(&self) -> String {
        let base = self.redirect_to.as_deref().unwrap_or(VERIFIED_PATH);
        format!("{}?token={}", base, self.token)
    }
}

pub struct LocalAuthProvider {
    conn: Mutex<Connection>,
    settings: LocalAuthSettings,
}

struct UserRow {
    user: User,
    password: PasswordHash,
}

const USER_COLUMNS: &str = "id, email, password_hash, password_salt, password_rounds, \
                            metadata, email_confirmed_at, created_at";

fn user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    let metadata: String = row.get(5)?;
    let confirmed_at: Option<String> = row.get(6)?;
    let created_at: String = row.get(7)?;

    Ok(UserRow {
        user: User {
            id: row.get(0)?,
            email: row.get(1)?,
            metadata: serde_json::from_str(&metadata).map_err(|err| {
                rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(err))
            })?,
            email_confirmed_at: confirmed_at.as_deref().map(parse_timestamp).transpose()?,
            created_at: parse_timestamp(&created_at)?,
        },
        password: PasswordHash {
            hash: row.get(2)?,
            salt: row.get(3)?,
            rounds: row.get(4)?,
        },
    })
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl LocalAuthProvider {
    /// Open (or create) a database file
    pub fn open(path: &Path, settings: LocalAuthSettings) -> anyhow::Result<Self> {
        let conn = db::open(path)?;
        tracing::info!(path = %path.display(), "auth database opened");
        Ok(Self::with_connection(conn, settings))
    }

    pub fn in_memory(settings: LocalAuthSettings) -> Result<Self, AuthError> {
        let conn = Connection::open_in_memory()?;
        db::setup_database(&conn)?;
        Ok(Self::with_connection(conn, settings))
    }

    fn with_connection(conn: Connection, settings: LocalAuthSettings) -> Self {
        LocalAuthProvider {
            conn: Mutex::new(conn),
            settings,
        }
    }

    pub fn settings(&self) -> &LocalAuthSettings {
        &self.settings
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, AuthError> {
        self.conn
            .lock()
            .map_err(|_| AuthError::Storage("auth connection lock poisoned".to_string()))
    }

    /// The confirmation link last sent to `email`, if still unconsumed
    pub fn pending_confirmation(&self, email: &str) -> Result<Option<PendingConfirmation>, AuthError> {
        let conn = self.lock()?;
        let pending = conn
            .query_row(
                "SELECT token, email, redirect_to, sent_at FROM email_confirmations WHERE email = ?1",
                params![normalize_email(email)],
                |row| {
                    let sent_at: String = row.get(3)?;
                    Ok(PendingConfirmation {
                        token: row.get(0)?,
                        email: row.get(1)?,
                        redirect_to: row.get(2)?,
                        sent_at: parse_timestamp(&sent_at)?,
                    })
                },
            )
            .optional()?;
        Ok(pending)
    }

    /// Remove expired sessions
    pub fn purge_expired(&self) -> Result<usize, AuthError> {
        let conn = self.lock()?;
        Ok(db::purge_expired_sessions(&conn, Utc::now())?)
    }

    fn find_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>, AuthError> {
        let sql = format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS);
        Ok(conn.query_row(&sql, params![email], user_row).optional()?)
    }

    fn find_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>, AuthError> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        Ok(conn.query_row(&sql, params![id], user_row).optional()?)
    }

    /// Replace any pending confirmation for the user with a fresh token
    fn send_confirmation(
        conn: &Connection,
        user: &User,
        redirect_to: Option<&str>,
    ) -> Result<PendingConfirmation, AuthError> {
        let pending = PendingConfirmation {
            token: generate_token(),
            email: user.email.clone(),
            redirect_to: redirect_to.map(str::to_string),
            sent_at: Utc::now(),
        };

        conn.execute(
            "INSERT INTO email_confirmations (token, user_id, email, redirect_to, sent_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id) DO UPDATE SET
                token = excluded.token,
                email = excluded.email,
                redirect_to = excluded.redirect_to,
                sent_at = excluded.sent_at",
            params![
                pending.token,
                user.id,
                pending.email,
                pending.redirect_to,
                format_timestamp(pending.sent_at),
            ],
        )?;

        tracing::info!(email = %pending.email, link = %pending.link(), "confirmation email queued");
        Ok(pending)
    }

    fn record(conn: &Connection, event_type: &str, user_id: &str) {
        let event = Event::new(event_type, user_id, serde_json::json!({}));
        if let Err(err) = db::insert_event(conn, &event) {
            tracing::warn!(%err, event_type, "failed to record auth event");
        }
    }

    fn session_for(conn: &Connection, access_token: &str, now: DateTime<Utc>) -> Result<Option<Session>, AuthError> {
        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT user_id, expires_at FROM sessions WHERE access_token = ?1",
                params![access_token],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((user_id, expires_at)) = row else {
            return Ok(None);
        };

        let expires_at = parse_timestamp(&expires_at)?;
        if expires_at <= now {
            conn.execute("DELETE FROM sessions WHERE access_token = ?1", params![access_token])?;
            return Ok(None);
        }

        Ok(Self::find_by_id(conn, &user_id)?.map(|row| Session {
            access_token: access_token.to_string(),
            user: row.user,
            expires_at,
        }))
    }
}

impl AuthProvider for LocalAuthProvider {
    fn get_session(&self, access_token: &str) -> Result<Option<Session>, AuthError> {
        let conn = self.lock()?;
        Self::session_for(&conn, access_token, Utc::now())
    }

    fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = normalize_email(email);

        // Hash verification runs without the connection lock held
        let row = {
            let conn = self.lock()?;
            Self::find_by_email(&conn, &email)?
        };
        let Some(row) = row else {
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(password, &row.password) {
            return Err(AuthError::InvalidCredentials);
        }
        if !row.user.is_confirmed() {
            return Err(AuthError::EmailNotConfirmed);
        }

        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.settings.session_ttl)
            .ok_or_else(|| AuthError::Storage("session lifetime out of range".to_string()))?;
        let session = Session {
            access_token: generate_token(),
            user: row.user,
            expires_at,
        };

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sessions (access_token, user_id, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                session.access_token,
                session.user.id,
                format_timestamp(now),
                format_timestamp(session.expires_at),
            ],
        )?;
        Self::record(&conn, "signed_in", &session.user.id);

        Ok(session)
    }

    fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: UserMetadata,
        redirect_to: Option<&str>,
    ) -> Result<User, AuthError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < self.settings.min_password_len {
            return Err(AuthError::WeakPassword {
                min_length: self.settings.min_password_len,
            });
        }

        let hashed = hash_password(password, self.settings.hash_rounds);

        let conn = self.lock()?;
        if Self::find_by_email(&conn, &email)?.is_some() {
            return Err(AuthError::UserAlreadyRegistered);
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            metadata: metadata.normalized(),
            email_confirmed_at: None,
            created_at: Utc::now(),
        };

        conn.execute(
            "INSERT INTO users (id, email, password_hash, password_salt, password_rounds, metadata, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user.id,
                user.email,
                hashed.hash,
                hashed.salt,
                hashed.rounds,
                serde_json::to_string(&user.metadata)?,
                format_timestamp(user.created_at),
            ],
        )?;
        Self::record(&conn, "user_registered", &user.id);
        Self::send_confirmation(&conn, &user, redirect_to)?;

        Ok(user)
    }

    fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let conn = self.lock()?;
        let user_id: Option<String> = conn
            .query_row(
                "SELECT user_id FROM sessions WHERE access_token = ?1",
                params![access_token],
                |row| row.get(0),
            )
            .optional()?;

        conn.execute("DELETE FROM sessions WHERE access_token = ?1", params![access_token])?;
        if let Some(user_id) = user_id {
            Self::record(&conn, "signed_out", &user_id);
        }
        Ok(())
    }

    fn resend_confirmation(&self, email: &str, redirect_to: Option<&str>) -> Result<(), AuthError> {
        let conn = self.lock()?;
        let email = normalize_email(email);

        // Unknown addresses succeed silently so the form can't probe for accounts
        let Some(row) = Self::find_by_email(&conn, &email)? else {
            tracing::debug!("resend requested for unknown email");
            return Ok(());
        };
        if row.user.is_confirmed() {
            return Err(AuthError::AlreadyConfirmed);
        }

        Self::send_confirmation(&conn, &row.user, redirect_to)?;
        Ok(())
    }

    fn confirm_email(&self, token: &str) -> Result<User, AuthError> {
        let conn = self.lock()?;
        let pending: Option<(String, String)> = conn
            .query_row(
                "SELECT user_id, sent_at FROM email_confirmations WHERE token = ?1",
                params![token],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((user_id, sent_at)) = pending else {
            return Err(AuthError::InvalidConfirmationToken);
        };

        let now = Utc::now();
        if parse_timestamp(&sent_at)? + Duration::hours(CONFIRMATION_TTL_HOURS) <= now {
            conn.execute("DELETE FROM email_confirmations WHERE token = ?1", params![token])?;
            return Err(AuthError::InvalidConfirmationToken);
        }

        conn.execute(
            "UPDATE users SET email_confirmed_at = ?1 WHERE id = ?2",
            params![format_timestamp(now), user_id],
        )?;
        conn.execute("DELETE FROM email_confirmations WHERE token = ?1", params![token])?;
        Self::record(&conn, "email_confirmed", &user_id);

        Self::find_by_id(&conn, &user_id)?
            .map(|row| row.user)
            .ok_or(AuthError::InvalidConfirmationToken)
    }

    fn update_user(&self, access_token: &str, metadata: UserMetadata) -> Result<User, AuthError> {
        let conn = self.lock()?;
        let Some(session) = Self::session_for(&conn, access_token, Utc::now())? else {
            return Err(AuthError::SessionExpired);
        };

        conn.execute(
            "UPDATE users SET metadata = ?1 WHERE id = ?2",
            params![serde_json::to_string(&metadata)?, session.user.id],
        )?;
        Self::record(&conn, "profile_updated", &session.user.id);

        Ok(User {
            metadata,
            ..session.user
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
