pub mod aggregator;
pub mod ai_structs;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod extractor;
pub mod models;
pub mod naming;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod renamer;
pub mod resolver;
pub mod scratch;
pub mod utils;
pub mod validator;
