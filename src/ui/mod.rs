//! GUI panels and application state.

pub mod app;
pub mod components;
pub mod setup_wizard;
pub mod staff_panel;

pub use app::App;
pub use setup_wizard::{SetupApp, SetupWizard};
