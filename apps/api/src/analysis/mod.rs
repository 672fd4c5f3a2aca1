pub mod handlers;
pub mod interpreter;
pub mod models;
pub mod pipeline;
pub mod prompts;
