pub mod health;
pub mod metrics;
pub mod navigation;
pub mod pages;
pub mod permissions;
