// Authenticated configuration-presence report. Only shape metadata
// (exists/length/preview) ever leaves the process, never secret values.

use std::time::{SystemTime, UNIX_EPOCH};

use actix_web::{get, web, HttpRequest, HttpResponse};
use secrecy::{ExposeSecret, Secret};

use crate::configuration::SigningSettings;
use crate::routes::TokenError;
use crate::session::{bearer_token, SessionClient};

fn presence(secret: Option<&Secret<String>>) -> serde_json::Value {
    match secret {
        Some(s) => serde_json::json!({
            "exists": true,
            "length": s.expose_secret().len(),
        }),
        None => serde_json::json!({ "exists": false, "length": 0 }),
    }
}

/// First and last few characters, enough to tell keys apart in support
/// conversations without revealing them.
fn preview(secret: Option<&Secret<String>>) -> serde_json::Value {
    match secret {
        Some(s) => {
            // Character boundaries, not byte offsets; keys are free-form
            // operator input.
            let chars: Vec<char> = s.expose_secret().chars().collect();
            if chars.len() < 12 {
                return serde_json::json!("set");
            }
            let head: String = chars[..8].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            serde_json::json!(format!("{}...{}", head, tail))
        }
        None => serde_json::json!("Not set"),
    }
}

#[get("/api/debug/config")]
#[tracing::instrument(name = "Report signing configuration", skip_all)]
pub async fn debug_config(
    request: HttpRequest,
    session_client: web::Data<SessionClient>,
    signing: web::Data<SigningSettings>,
) -> Result<HttpResponse, TokenError> {
    let session_token = bearer_token(&request).map_err(TokenError::Unauthorized)?;
    let identity = session_client
        .verify_session(session_token)
        .await
        .map_err(TokenError::Unauthorized)?;

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "timestamp": timestamp,
        "userId": identity.user_id,
        "signing": {
            "privateKey": presence(signing.private_key.as_ref()),
            "privateKeyBase64": presence(signing.private_key_base64.as_ref()),
            "privateKeyFile": signing.private_key_file.as_ref().map(|p| p.display().to_string()),
            "ssoBaseUrl": signing.sso_base_url,
        },
        "apiKey": {
            "exists": signing.api_key.is_some(),
            "length": signing.api_key.as_ref().map(|k| k.expose_secret().len()).unwrap_or(0),
            "preview": preview(signing.api_key.as_ref()),
        },
    })))
}
