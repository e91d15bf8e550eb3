//! Command-line front end for the quote service.

pub mod app;
pub mod cli;
pub mod config;
pub mod output;
