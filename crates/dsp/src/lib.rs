//! DSP engine — authenticated access to the advertising API, line-item
//! planning, submission, forecasting and report polling.

pub mod clients;
pub mod forecast;
pub mod geo;
pub mod inventory;
pub mod planner;
pub mod reports;
pub mod session;
pub mod submission;
pub mod wire;

pub use clients::DspClient;
pub use session::{ApiRequest, Credentials, SessionManager};
pub use submission::CampaignStatus;
