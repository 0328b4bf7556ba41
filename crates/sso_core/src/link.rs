/// Compose the profile-linking SSO URL from the base endpoint, tenant
/// domain and issued token.
///
/// Both query values are percent-encoded. Compact JWTs and tenant
/// domains are URL-safe already, so this is a no-op for well-formed
/// inputs, but it keeps a hostile `domain` from smuggling extra query
/// parameters into the link.
pub fn build_sso_url(base: &str, domain: &str, token: &str) -> String {
    format!(
        "{}?domain={}&jwt={}",
        base,
        urlencoding::encode(domain),
        urlencoding::encode(token)
    )
}
