//! CLI module for the almanac command-line interface.
//!
//! Commands read appointment records from a JSON file and print the derived
//! month, day or week views.

mod commands;
mod output;
pub mod types;

pub use commands::*;
