//! CLI module for filecount
//!
//! `once`, `watch` and `serve` sample the monitored folder; `history` and
//! `config` are read-only.

pub mod context;
pub mod error;
pub mod output;
pub mod shutdown;

pub mod config;
pub mod history;
pub mod once;
pub mod serve;
pub mod watch;
