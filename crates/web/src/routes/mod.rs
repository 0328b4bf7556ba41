mod debug;
mod health_check;
mod sso;

pub use debug::debug_config;
pub use health_check::*;
pub use sso::{issue_sso_token, TokenError};
