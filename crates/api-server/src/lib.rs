#![warn(clippy::unwrap_used)]

pub mod campaign_rest;
pub mod rest;
pub mod server;
pub mod swagger;

pub use server::{router, ApiServer};
pub use swagger::ApiDoc;
