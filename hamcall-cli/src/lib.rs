pub mod app;
pub mod cli;
pub mod command;
pub mod render;
pub mod repl;
