mod middleware;
mod token;

pub use middleware::{require_auth, AuthContext};
pub use token::{AuthClaims, TokenSigner};
