pub mod action;
pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod errors;
pub mod fetch;
pub mod logging;
pub mod tui;

#[cfg(test)]
mod testing;
