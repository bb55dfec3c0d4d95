pub mod api;
pub mod app;
pub mod chart;
pub mod commands;
pub mod config;
pub mod errors;
pub mod input;
pub mod logging;
pub mod models;
pub mod stats;
pub mod status;
pub mod tables;
pub mod ui;

#[cfg(test)]
mod test_util;

pub use api::{AdminApi, HttpAdminApi};
pub use app::{Dashboard, Event, Flow};
pub use config::DashboardConfig;
pub use errors::DashboardError;
