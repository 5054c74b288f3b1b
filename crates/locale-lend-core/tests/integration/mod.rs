//! Integration Tests Module
//!
//! End-to-end tests that feed document-store JSON through the commands.
//!
//! Test categories:
//! - `trust_flow`: user records to scores, levels and badges
//! - `ranking_flow`: item records to nearby and search listings
//! - `verification_flow`: one-time codes under a manual clock
//! - `config_flow`: configuration files and presets

mod config_flow;
mod ranking_flow;
mod verification_flow;
