pub mod aggregate;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod record;
pub mod render;
pub mod validate;
