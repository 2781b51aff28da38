pub mod metadata;
pub mod process;
pub mod settings;
