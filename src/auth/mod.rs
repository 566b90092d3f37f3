// 🔐 Authentication - Provider seam and per-client session context
//
// The site never talks to an identity backend directly. Everything goes
// through `AuthProvider`, and pages use `AuthContext`, which keeps the
// client's current session and turns provider results into
// `AuthOutcome { success, error }` values the pages can display.
//
// `LocalAuthProvider` (SQLite) is the shipped implementation.

pub mod local;
pub mod password;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::messages::{self, Locale};

pub use local::{LocalAuthProvider, LocalAuthSettings, PendingConfirmation};

/// Path the confirmation link points at
pub const VERIFIED_PATH: &str = "/auth/verified";

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid login credentials")]
    InvalidCredentials,
    #[error("email not confirmed")]
    EmailNotConfirmed,
    #[error("user already registered")]
    UserAlreadyRegistered,
    #[error("password must be at least {min_length} characters")]
    WeakPassword { min_length: usize },
    #[error("invalid email address")]
    InvalidEmail,
    #[error("no user signed in")]
    NotSignedIn,
    #[error("session expired")]
    SessionExpired,
    #[error("invalid or expired confirmation token")]
    InvalidConfirmationToken,
    #[error("email already confirmed")]
    AlreadyConfirmed,
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for AuthError {
    fn from(err: rusqlite::Error) -> Self {
        AuthError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::Storage(err.to_string())
    }
}

// ============================================================================
// USER + SESSION
// ============================================================================

/// Free-form profile data stored with the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserMetadata {
    pub fn with_name(name: &str) -> Self {
        UserMetadata {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    /// A given `name` is mirrored into `display_name`
    pub fn normalized(mut self) -> Self {
        if let Some(name) = &self.name {
            self.display_name = Some(name.clone());
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub metadata: UserMetadata,
    pub email_confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_confirmed(&self) -> bool {
        self.email_confirmed_at.is_some()
    }

    /// Name for greetings: profile name if set, else the email address
    pub fn display_label(&self) -> &str {
        self.metadata
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

// ============================================================================
// PROVIDER TRAIT
// ============================================================================

/// An identity backend. Implementations must be shareable across request
/// handlers.
pub trait AuthProvider: Send + Sync {
    /// Session for an access token; `Ok(None)` if unknown or expired
    fn get_session(&self, access_token: &str) -> Result<Option<Session>, AuthError>;

    fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Create an unconfirmed user and send a confirmation link that leads
    /// to `redirect_to`
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: UserMetadata,
        redirect_to: Option<&str>,
    ) -> Result<User, AuthError>;

    fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;

    fn resend_confirmation(&self, email: &str, redirect_to: Option<&str>) -> Result<(), AuthError>;

    /// Consume a confirmation token and mark the email as confirmed
    fn confirm_email(&self, token: &str) -> Result<User, AuthError>;

    /// Replace the signed-in user's metadata
    fn update_user(&self, access_token: &str, metadata: UserMetadata) -> Result<User, AuthError>;
}

// ============================================================================
// OUTCOME
// ============================================================================

/// Result shape handed to pages: a success flag plus an optional error
#[derive(Debug, Clone, PartialEq)]
pub struct AuthOutcome {
    pub success: bool,
    pub error: Option<AuthError>,
}

impl AuthOutcome {
    pub fn ok() -> Self {
        AuthOutcome {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: AuthError) -> Self {
        AuthOutcome {
            success: false,
            error: Some(error),
        }
    }

    /// Translated error message, if the call failed
    pub fn message(&self, locale: Locale) -> Option<&'static str> {
        self.error
            .as_ref()
            .map(|error| messages::auth_error(locale, error))
    }
}

impl<T> From<Result<T, AuthError>> for AuthOutcome {
    fn from(result: Result<T, AuthError>) -> Self {
        match result {
            Ok(_) => AuthOutcome::ok(),
            Err(error) => AuthOutcome::failed(error),
        }
    }
}

// ============================================================================
// CONTEXT
// ============================================================================

/// One client's view of authentication: its session and the email it last
/// registered with (for "resend confirmation").
pub struct AuthContext<P: AuthProvider + ?Sized> {
    provider: Arc<P>,
    session: Option<Session>,
    last_registered_email: Option<String>,
    site_origin: Option<String>,
}

impl<P: AuthProvider + ?Sized> AuthContext<P> {
    pub fn new(provider: Arc<P>) -> Self {
        AuthContext {
            provider,
            session: None,
            last_registered_email: None,
            site_origin: None,
        }
    }

    /// Restore a context from a stored access token (e.g. a cookie).
    ///
    /// An unknown or expired token yields a signed-out context.
    pub fn restore(provider: Arc<P>, access_token: Option<&str>) -> Result<Self, AuthError> {
        let session = match access_token {
            Some(token) => provider.get_session(token)?,
            None => None,
        };
        let mut context = Self::new(provider);
        context.session = session;
        Ok(context)
    }

    /// Origin used to build confirmation links (`https://budgify.example`)
    pub fn with_site_origin(mut self, origin: &str) -> Self {
        self.site_origin = Some(origin.trim_end_matches('/').to_string());
        self
    }

    pub fn with_last_registered_email(mut self, email: Option<String>) -> Self {
        self.last_registered_email = email;
        self
    }

    fn redirect_url(&self) -> Option<String> {
        self.site_origin
            .as_ref()
            .map(|origin| format!("{}{}", origin, VERIFIED_PATH))
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|session| &session.user)
    }

    pub fn last_registered_email(&self) -> Option<&str> {
        self.last_registered_email.as_deref()
    }

    /// Re-check the held session with the provider and return it
    pub fn get_current_session(&mut self) -> Result<Option<Session>, AuthError> {
        let Some(current) = &self.session else {
            return Ok(None);
        };

        let refreshed = self.provider.get_session(&current.access_token)?;
        if refreshed.is_none() {
            tracing::debug!("held session is no longer valid");
        }
        self.session = refreshed.clone();
        Ok(refreshed)
    }

    pub fn sign_in(&mut self, email: &str, password: &str) -> AuthOutcome {
        match self.provider.sign_in_with_password(email, password) {
            Ok(session) => {
                tracing::info!(user_id = %session.user.id, "signed in");
                self.session = Some(session);
                AuthOutcome::ok()
            }
            Err(error) => {
                tracing::warn!(%error, "sign-in failed");
                AuthOutcome::failed(error)
            }
        }
    }

    pub fn sign_up(&mut self, email: &str, password: &str, metadata: UserMetadata) -> AuthOutcome {
        let redirect = self.redirect_url();
        match self
            .provider
            .sign_up(email, password, metadata.normalized(), redirect.as_deref())
        {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "registered");
                self.last_registered_email = Some(email.to_string());
                AuthOutcome::ok()
            }
            Err(error) => {
                tracing::warn!(%error, "registration failed");
                AuthOutcome::failed(error)
            }
        }
    }

    /// Sign out locally even if the provider call fails
    pub fn sign_out(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(error) = self.provider.sign_out(&session.access_token) {
                tracing::warn!(%error, "sign-out failed at provider");
            }
        }
    }

    pub fn resend_confirmation(&self, email: &str) -> AuthOutcome {
        let redirect = self.redirect_url();
        let result = self.provider.resend_confirmation(email, redirect.as_deref());
        if let Err(error) = &result {
            tracing::warn!(%error, "resending confirmation failed");
        }
        result.into()
    }

    /// Set the display name, keeping all other metadata
    pub fn update_profile(&mut self, display_name: Option<&str>) -> AuthOutcome {
        let Some(session) = &self.session else {
            return AuthOutcome::failed(AuthError::NotSignedIn);
        };

        let mut metadata = session.user.metadata.clone();
        if let Some(name) = display_name.map(str::trim).filter(|name| !name.is_empty()) {
            metadata.name = Some(name.to_string());
            metadata.display_name = Some(name.to_string());
        }

        match self.provider.update_user(&session.access_token, metadata) {
            Ok(user) => {
                if let Some(session) = self.session.as_mut() {
                    session.user = user;
                }
                AuthOutcome::ok()
            }
            Err(error) => {
                tracing::warn!(%error, "profile update failed");
                AuthOutcome::failed(error)
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> Arc<LocalAuthProvider> {
        Arc::new(LocalAuthProvider::in_memory(LocalAuthSettings::for_tests()).unwrap())
    }

    fn registered(provider: &Arc<LocalAuthProvider>, email: &str) {
        let mut ctx = AuthContext::new(provider.clone());
        assert!(ctx.sign_up(email, "geheim123", UserMetadata::with_name("Max")).success);
        let pending = provider.pending_confirmation(email).unwrap().unwrap();
        provider.confirm_email(&pending.token).unwrap();
    }

    #[test]
    fn test_sign_up_records_last_email_and_display_name() {
        let provider = provider();
        let mut ctx = AuthContext::new(provider.clone()).with_site_origin("http://localhost:3000/");

        let outcome = ctx.sign_up("max@example.com", "geheim123", UserMetadata::with_name("Max"));
        assert!(outcome.success);
        assert_eq!(ctx.last_registered_email(), Some("max@example.com"));

        let pending = provider.pending_confirmation("max@example.com").unwrap().unwrap();
        assert_eq!(
            pending.redirect_to.as_deref(),
            Some("http://localhost:3000/auth/verified")
        );

        let user = provider.confirm_email(&pending.token).unwrap();
        assert_eq!(user.metadata.display_name.as_deref(), Some("Max"));
    }

    #[test]
    fn test_sign_in_and_current_session() {
        let provider = provider();
        registered(&provider, "max@example.com");

        let mut ctx = AuthContext::new(provider.clone());
        assert!(ctx.get_current_session().unwrap().is_none());

        assert!(ctx.sign_in("max@example.com", "geheim123").success);
        let session = ctx.get_current_session().unwrap().unwrap();
        assert_eq!(session.user.email, "max@example.com");
        assert_eq!(ctx.user().map(|u| u.display_label()), Some("Max"));
    }

    #[test]
    fn test_failed_sign_in_is_translated() {
        let provider = provider();
        registered(&provider, "max@example.com");

        let mut ctx = AuthContext::new(provider);
        let outcome = ctx.sign_in("max@example.com", "falsch123");
        assert!(!outcome.success);
        assert_eq!(outcome.error, Some(AuthError::InvalidCredentials));
        assert_eq!(
            outcome.message(Locale::De),
            Some("Ungültige E-Mail-Adresse oder ungültiges Passwort.")
        );
        assert!(ctx.session().is_none());
    }

    #[test]
    fn test_sign_out_invalidates_token() {
        let provider = provider();
        registered(&provider, "max@example.com");

        let mut ctx = AuthContext::new(provider.clone());
        ctx.sign_in("max@example.com", "geheim123");
        let token = ctx.session().unwrap().access_token.clone();

        ctx.sign_out();
        assert!(ctx.session().is_none());
        assert!(provider.get_session(&token).unwrap().is_none());
    }

    #[test]
    fn test_restore_from_token() {
        let provider = provider();
        registered(&provider, "max@example.com");

        let mut ctx = AuthContext::new(provider.clone());
        ctx.sign_in("max@example.com", "geheim123");
        let token = ctx.session().unwrap().access_token.clone();

        let restored = AuthContext::restore(provider.clone(), Some(&token)).unwrap();
        assert_eq!(restored.user().map(|u| u.email.as_str()), Some("max@example.com"));

        let anonymous = AuthContext::restore(provider, Some("nope")).unwrap();
        assert!(anonymous.session().is_none());
    }

    #[test]
    fn test_update_profile_requires_session() {
        let mut ctx = AuthContext::new(provider());
        let outcome = ctx.update_profile(Some("Erika"));
        assert_eq!(outcome.error, Some(AuthError::NotSignedIn));
    }

    #[test]
    fn test_update_profile_keeps_other_metadata() {
        let provider = provider();
        let mut metadata = UserMetadata::with_name("Max");
        metadata
            .extra
            .insert("plan".to_string(), serde_json::json!("free"));

        let mut ctx = AuthContext::new(provider.clone());
        assert!(ctx.sign_up("max@example.com", "geheim123", metadata).success);
        let pending = provider.pending_confirmation("max@example.com").unwrap().unwrap();
        provider.confirm_email(&pending.token).unwrap();
        ctx.sign_in("max@example.com", "geheim123");

        assert!(ctx.update_profile(Some("Erika")).success);
        let user = ctx.user().unwrap();
        assert_eq!(user.metadata.name.as_deref(), Some("Erika"));
        assert_eq!(user.metadata.display_name.as_deref(), Some("Erika"));
        assert_eq!(user.metadata.extra.get("plan"), Some(&serde_json::json!("free")));
    }

    #[test]
    fn test_resend_confirmation_outcome() {
        let provider = provider();
        registered(&provider, "max@example.com");

        let ctx = AuthContext::new(provider);
        let outcome = ctx.resend_confirmation("max@example.com");
        assert_eq!(outcome.error, Some(AuthError::AlreadyConfirmed));
    }

    #[test]
    fn test_metadata_name_is_mirrored() {
        let metadata = UserMetadata::with_name("Max").normalized();
        assert_eq!(metadata.display_name.as_deref(), Some("Max"));
        assert_eq!(UserMetadata::default().normalized().display_name, None);
    }
}
