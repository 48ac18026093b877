pub mod access_code;
pub mod analytics;
pub mod barcode;
pub mod errors;
pub mod models;
pub mod notify;
pub mod policy;
pub mod store;
pub mod validation;
pub mod workflow;

pub use errors::{ConductError, ConductResult};
pub use workflow::Workflow;
