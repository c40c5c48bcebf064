mod context_store;
mod session;

pub use context_store::{load_auth_context, store_auth_context};
pub use session::{login_handler, logout_handler, me_handler};

/// Session key holding the serialized `AuthContext`.
pub const SESSION_AUTH_CONTEXT_KEY: &str = "auth_context";
