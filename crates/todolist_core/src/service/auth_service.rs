//! Sign-in / sign-up use-case service.
//!
//! # Responsibility
//! - Gate every auth request behind credential validation.
//! - Map API results into session updates or auth errors.
//!
//! # Invariants
//! - Invalid credentials never reach the network.
//! - The session is only written after the API returned a token.
//! - Remote failures are never retried.

use crate::api::{ApiError, TodoApi};
use crate::model::session::Session;
use crate::validation::{validate, ValidationErrors};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type AuthResult<T> = Result<T, AuthError>;

/// Which auth request to issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    SignIn,
    SignUp,
}

impl AuthAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SignIn => "sign_in",
            Self::SignUp => "sign_up",
        }
    }
}

/// Auth failure, split by channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Local validation failed; no request was issued.
    Invalid(ValidationErrors),
    /// The request was issued and failed.
    Remote(ApiError),
}

impl AuthError {
    /// Projection onto the sign form's two field slots.
    ///
    /// Remote failures put the same message in both slots, which is how the
    /// form displays request-level errors.
    pub fn field_errors(&self) -> ValidationErrors {
        match self {
            Self::Invalid(errors) => errors.clone(),
            Self::Remote(err) => ValidationErrors::both(err.message()),
        }
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(errors) => {
                let messages: Vec<&str> = [
                    errors.username_error.as_str(),
                    errors.password_error.as_str(),
                ]
                .into_iter()
                .filter(|message| !message.is_empty())
                .collect();
                write!(f, "invalid credentials: {}", messages.join(" / "))
            }
            Self::Remote(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Remote(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<ApiError> for AuthError {
    fn from(value: ApiError) -> Self {
        Self::Remote(value)
    }
}

/// Auth client over a `TodoApi` implementation.
pub struct AuthService<A: TodoApi> {
    api: Arc<A>,
}

impl<A: TodoApi> AuthService<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Validates and signs in, returning the issued token.
    pub async fn sign_in(&self, username: &str, password: &str) -> AuthResult<String> {
        self.request_token(AuthAction::SignIn, username, password)
            .await
    }

    /// Validates and registers, returning the issued token.
    pub async fn sign_up(&self, username: &str, password: &str) -> AuthResult<String> {
        self.request_token(AuthAction::SignUp, username, password)
            .await
    }

    /// Runs `action` and stores the resulting identity in `session`.
    ///
    /// The trimmed username is what gets submitted and stored. On failure
    /// the session is left untouched.
    pub async fn authenticate(
        &self,
        action: AuthAction,
        session: &mut Session,
        username: &str,
        password: &str,
    ) -> AuthResult<()> {
        let token = self.request_token(action, username, password).await?;
        session.set(token, username.trim());
        Ok(())
    }

    /// Clears the session.
    pub fn sign_out(&self, session: &mut Session) {
        if session.is_signed_in() {
            info!("event=sign_out module=auth status=ok");
        }
        session.clear();
    }

    async fn request_token(
        &self,
        action: AuthAction,
        username: &str,
        password: &str,
    ) -> AuthResult<String> {
        let errors = validate(username, password);
        if errors.has_errors() {
            info!(
                "event={} module=auth status=rejected reason=validation",
                action.as_str()
            );
            return Err(AuthError::Invalid(errors));
        }

        let (username, password) = (username.trim(), password.trim());
        let result = match action {
            AuthAction::SignIn => self.api.sign_in(username, password).await,
            AuthAction::SignUp => self.api.sign_up(username, password).await,
        };

        match result {
            Ok(token) => {
                info!("event={} module=auth status=ok", action.as_str());
                Ok(token)
            }
            Err(err) => {
                warn!(
                    "event={} module=auth status=error error={}",
                    action.as_str(),
                    err
                );
                Err(err.into())
            }
        }
    }
}
