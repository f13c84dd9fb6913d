//! # trendline-cli
//!
//! Command-line front end for a Trendline server. Subcommands talk to the
//! JSON API through [`trendline_client::TrendlineClient`]; the burndown
//! shown by `trendline show` is computed locally from the fetched record.
//!
//! Handlers take the output stream as a parameter and return an exit code,
//! so tests drive them against a mock server and inspect the text.

pub mod commands;
pub mod render;
