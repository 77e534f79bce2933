pub mod account;
pub mod campaign;
pub mod config;
pub mod error;
pub mod forecast;
pub mod inventory;
pub mod line_item;
pub mod report;
pub mod targeting;

pub use config::AppConfig;
pub use error::{DspError, DspResult};
