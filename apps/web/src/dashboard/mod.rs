pub mod feedback;
pub mod handlers;
pub mod orchestrator;
