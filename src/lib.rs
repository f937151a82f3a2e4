pub mod commands;
pub mod config;
pub mod conversation;
pub mod dashboard;
pub mod logging;
pub mod ui;
