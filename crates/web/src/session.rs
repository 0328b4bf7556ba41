// Caller authentication against the external identity provider. The
// session token arrives as a bearer header and is introspected with a
// single outbound call; every failure mode collapses to an unauthorized
// request.

use std::time::Duration;

use actix_web::HttpRequest;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("missing or malformed Authorization header")]
    MissingToken,
    #[error("identity provider rejected the session")]
    Rejected,
    #[error("failed to reach the identity provider")]
    Transport(#[from] reqwest::Error),
}

/// Identity confirmed by the provider.
#[derive(Debug, Deserialize)]
pub struct SessionIdentity {
    pub user_id: String,
}

/// Thin client over the identity provider's session-introspection
/// endpoint.
#[derive(Clone)]
pub struct SessionClient {
    http: reqwest::Client,
    provider_url: String,
}

impl SessionClient {
    pub fn new(provider_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        // Explicit timeout so a stalled provider cannot hang issuance.
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, provider_url })
    }

    #[tracing::instrument(name = "Verify session with identity provider", skip(self, session_token))]
    pub async fn verify_session(
        &self,
        session_token: &str,
    ) -> Result<SessionIdentity, SessionError> {
        let url = format!("{}/v1/sessions/verify", self.provider_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(session_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SessionError::Rejected);
        }
        Ok(response.json::<SessionIdentity>().await?)
    }
}

/// Pull the bearer token out of the `Authorization` header.
pub fn bearer_token(request: &HttpRequest) -> Result<&str, SessionError> {
    request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or(SessionError::MissingToken)
}
