//! Auth client
//!
//! Email and password authentication against the hub's auth endpoints.
//! A successful sign-in stores the access token on the shared REST
//! client and broadcasts the session on a watch channel.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::{ClientError, ClientResult, RestClient};

/// Authenticated user identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

/// Active session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    /// Unix timestamp the token expires at
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

/// Wire response of the token and signup endpoints
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_at: Option<i64>,
    user: Option<AuthUser>,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Auth client
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: RestClient,
    session_tx: Arc<watch::Sender<Option<Session>>>,
}

impl AuthClient {
    /// Create an auth client riding on an existing REST client
    pub fn new(http: RestClient) -> Self {
        let (session_tx, _) = watch::channel(None);
        Self {
            http,
            session_tx: Arc::new(session_tx),
        }
    }

    /// Current session, if signed in
    pub fn session(&self) -> Option<Session> {
        self.session_tx.borrow().clone()
    }

    /// Watch session changes (sign-in and sign-out)
    pub fn watch(&self) -> watch::Receiver<Option<Session>> {
        self.session_tx.subscribe()
    }

    /// Sign in with email and password
    pub async fn sign_in(&self, email: &str, password: &str) -> ClientResult<Session> {
        let response: TokenResponse = self
            .http
            .post(
                "auth/v1/token?grant_type=password",
                &Credentials { email, password },
            )
            .await?;
        let session = self.install(response)?;
        tracing::info!("Signed in as {}", session.user.email);
        Ok(session)
    }

    /// Register a new account.
    ///
    /// Hubs with email confirmation enabled return no token; the caller
    /// must confirm the address and sign in afterwards, so this returns
    /// `None` in that case.
    pub async fn sign_up(&self, email: &str, password: &str) -> ClientResult<Option<Session>> {
        let response: TokenResponse = self
            .http
            .post("auth/v1/signup", &Credentials { email, password })
            .await?;

        if response.access_token.is_none() {
            tracing::info!("Signed up {}, confirmation pending", email);
            return Ok(None);
        }
        Ok(Some(self.install(response)?))
    }

    /// Sign out. The local token is dropped even if the server call fails.
    pub async fn sign_out(&self) -> ClientResult<()> {
        let result = self.http.post_no_content("auth/v1/logout").await;
        self.http.clear_token();
        self.session_tx.send_replace(None);
        result
    }

    fn install(&self, response: TokenResponse) -> ClientResult<Session> {
        let access_token = response
            .access_token
            .ok_or_else(|| ClientError::InvalidResponse("Missing access token".to_string()))?;
        let user = response
            .user
            .ok_or_else(|| ClientError::InvalidResponse("Missing user".to_string()))?;

        let session = Session {
            access_token: access_token.clone(),
            expires_at: response.expires_at,
            user,
        };
        self.http.set_token(access_token);
        self.session_tx.send_replace(Some(session.clone()));
        Ok(session)
    }
}
