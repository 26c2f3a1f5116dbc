pub mod configuration;
pub mod inputs;
pub mod network;
pub mod query;
pub mod report;
