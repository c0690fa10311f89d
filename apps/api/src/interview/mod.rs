pub mod analyzer;
pub mod decision;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod store;
