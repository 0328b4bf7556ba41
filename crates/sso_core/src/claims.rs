use serde::{Deserialize, Serialize};

/// Caller-supplied inputs for one issuance. Mirrors the JSON request
/// body minus the key-override pair, which the handler peels off before
/// the issuer runs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    /// Required; the issuer rejects an empty value. Defaulted here so a
    /// missing field surfaces as a validation error with a stable
    /// message instead of a deserialization failure.
    #[serde(default)]
    pub profile_key: String,
    pub domain: Option<String>,
    /// Expiry window in minutes; clamped by the issuer.
    pub expires_in: Option<f64>,
    pub allowed_social: Option<Vec<String>>,
    pub redirect: Option<String>,
    pub logout: Option<bool>,
    pub email: Option<String>,
    pub verify: Option<bool>,
}

/// The signed payload. Optional fields that were not supplied are absent
/// from the token, not null.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SsoClaims {
    pub domain: String,
    pub profile_key: String,
    #[serde(rename = "iat")]
    pub issued_at: u64,
    #[serde(rename = "exp")]
    pub expires_at: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_social: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logout: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify: Option<bool>,
}
