//! Headless ad submission workflow for the ad builder page.
/// Form state, validation, submission controller and toasts.
pub mod ad_builder;
/// Advertisement backend collaborator and its HTTP implementation.
pub mod ad_gateway;
/// Application directory resolution.
pub mod app_dirs;
/// Persisted ad builder settings.
pub mod config;
mod http_client;
/// Tracing subscriber setup.
pub mod logging;
