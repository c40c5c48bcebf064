//! Backend adapters for application ports.

#![forbid(unsafe_code)]

mod http_backend_client;
mod in_memory_backend;

pub use http_backend_client::{HttpBackendClient, HttpBackendConfig};
pub use in_memory_backend::{InMemoryAccount, InMemoryBackend};
