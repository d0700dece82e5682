pub mod analytics;
pub mod config;
pub mod controller;
pub mod conversation;
pub mod logging;
pub mod pipeline;
pub mod services;
pub mod ui;
