pub mod gateway;
pub mod orchestrator;
pub mod registry;
pub mod view;
