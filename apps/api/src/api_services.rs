mod backend;
mod sessions;
mod state_builder;

pub use backend::{BackendPorts, build_backend_ports};
pub use sessions::build_session_layer;
pub use state_builder::build_app_state;
