//! studex: an interactive console tool for exploring a tabular dataset of
//! student records.
//!
//! The dataset is loaded once into a [`table::StudentTable`], cleaned once
//! by [`clean::clean`], and then read-only for the rest of the session. The
//! [`menu::Session`] state machine routes text commands to the analysis
//! modules and hands chart specs to a [`chart::ChartBackend`].

pub mod chart;
pub mod clean;
pub mod cli;
pub mod config;
pub mod describe;
pub mod error;
pub mod menu;
pub mod render;
pub mod sample;
pub mod stats;
pub mod table;
pub mod tour;

pub use chart::{ChartBackend, ChartKind, ChartSpec};
pub use cli::{Args, StartupAction};
pub use config::{AppConfig, ConfigManager};
pub use error::AnalysisError;
pub use menu::{Console, MenuState, Session, StdConsole};
pub use render::PngBackend;
pub use table::{ColumnKind, ColumnRef, LoadOptions, StudentTable};

/// Application name used for the config directory and other app-specific paths
pub const APP_NAME: &str = "studex";
