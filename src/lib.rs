// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

//! Commit message generation for staged git changes.
//!
//! The pipeline reduces a change set to fit a token budget, builds a prompt,
//! tries the configured LLM backends in order, and normalizes the reply.
//! A local heuristic answers when no backend does, so generation never fails.

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;

pub use app::App;
pub use cli::Cli;
pub use config::Config;
pub use error::{Error, Result};
pub use services::generator::{CommitGenerator, Generated};
