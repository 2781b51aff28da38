pub mod auth;
pub mod encryption;
pub mod processor;
pub mod sanitize;
pub mod settings;
pub mod store;
pub mod vision;
