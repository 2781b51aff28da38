//! Agent Photo
//!
//! This library provides the relay that forwards an editor image to a
//! vision-capable chat-completion model and returns alt text, a reflective
//! legend and three title options, together with the editor-side controller
//! that writes those results back into the document.

pub mod app_state;
pub mod config;
pub mod db;
pub mod editor;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
