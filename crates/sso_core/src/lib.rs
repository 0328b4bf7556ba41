// Domain logic for the SSO token-issuance flow: signing-key resolution,
// claim assembly, RS256 signing and the profile-linking URL.

pub mod claims;
pub mod issuer;
pub mod key;
pub mod link;

pub use claims::{IssueRequest, SsoClaims};
pub use issuer::{issue, IssueError, IssuedToken, VerificationStatus, DEFAULT_DOMAIN};
pub use key::{resolve_signing_key, KeyError, KeyProvenance, KeySources, SigningKey};
pub use link::build_sso_url;
