pub mod app;
pub mod cli;
pub mod config;
pub mod panel;
pub mod plugin_loading;
