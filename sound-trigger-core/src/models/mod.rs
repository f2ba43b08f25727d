pub mod clip;
pub mod config;
pub mod error;
pub mod settings;
pub mod state;
pub mod status;
