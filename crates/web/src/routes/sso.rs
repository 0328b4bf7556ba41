// The issuance endpoint. One request walks authenticate -> validate ->
// resolve key -> sign -> respond; every failure is terminal and mapped
// straight to a status code, nothing is retried.

use actix_web::{http::StatusCode, post, web, HttpRequest, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use sso_core::{
    build_sso_url, issuer, resolve_signing_key, IssueError, IssueRequest, KeyError, SigningKey,
    VerificationStatus,
};

use crate::configuration::SigningSettings;
use crate::session::{bearer_token, SessionClient, SessionError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequestBody {
    #[serde(flatten)]
    pub issue: IssueRequest,
    /// Raw or base64 PEM overriding the configured signing key.
    pub private_key: Option<String>,
    #[serde(default)]
    pub base64: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    token: String,
    sso_url: String,
    expires_in: u64,
    domain: String,
    // Serialized as null when no verification was requested.
    verification_status: Option<VerificationStatus>,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Unauthorized")]
    Unauthorized(#[source] SessionError),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error("Failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl From<IssueError> for TokenError {
    fn from(e: IssueError) -> Self {
        match e {
            IssueError::MissingProfileKey => {
                TokenError::Validation("Profile key is required".into())
            }
            IssueError::Signing(inner) => TokenError::Signing(inner),
        }
    }
}

impl ResponseError for TokenError {
    fn status_code(&self) -> StatusCode {
        match self {
            TokenError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            TokenError::Validation(_) => StatusCode::BAD_REQUEST,
            TokenError::Key(KeyError::NotConfigured { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            TokenError::Key(_) => StatusCode::BAD_REQUEST,
            TokenError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = serde_json::json!({ "error": self.to_string() });
        // Key-configuration failures carry a provenance hint.
        if let TokenError::Key(e) = self {
            body["privateKeySource"] = serde_json::json!(e.provenance());
        }
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[post("/api/sso/token")]
#[tracing::instrument(
    name = "Issue SSO token",
    skip(request, body, session_client, signing),
    fields(user_id = tracing::field::Empty, key_provenance = tracing::field::Empty)
)]
pub async fn issue_sso_token(
    request: HttpRequest,
    body: web::Bytes,
    session_client: web::Data<SessionClient>,
    signing: web::Data<SigningSettings>,
) -> Result<HttpResponse, TokenError> {
    let session_token = bearer_token(&request).map_err(TokenError::Unauthorized)?;
    let identity = session_client
        .verify_session(session_token)
        .await
        .map_err(TokenError::Unauthorized)?;
    tracing::Span::current().record("user_id", tracing::field::display(&identity.user_id));

    // Parsed only after the caller is authenticated.
    let body: TokenRequestBody = serde_json::from_slice(&body)
        .map_err(|e| TokenError::Validation(format!("Invalid JSON body: {}", e)))?;
    if body.issue.profile_key.trim().is_empty() {
        return Err(TokenError::Validation("Profile key is required".into()));
    }

    // A body-supplied key replaces the configured chain outright; an
    // invalid override fails the request instead of falling back.
    let key = match body.private_key.as_deref() {
        Some(raw) => SigningKey::from_request_body(raw, body.base64)?,
        None => resolve_signing_key(signing.get_ref())?,
    };
    tracing::Span::current().record(
        "key_provenance",
        tracing::field::display(key.provenance()),
    );

    let issued = issuer::issue(&body.issue, &key)?;
    let verification_status = match body.issue.verify {
        Some(true) => Some(issuer::self_verify(&issued.token, &key)),
        _ => None,
    };
    let sso_url = build_sso_url(&signing.sso_base_url, &issued.claims.domain, &issued.token);

    Ok(HttpResponse::Ok().json(TokenResponse {
        expires_in: issued.expires_in_secs(),
        domain: issued.claims.domain.clone(),
        token: issued.token,
        sso_url,
        verification_status,
    }))
}
