// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use clap::Parser;
use clap_complete::Shell;

#[derive(Parser, Debug, Default)]
#[command(name = "commitflow")]
#[command(version)]
#[command(about = "Commit staged changes with an AI-written message", long_about = None)]
pub struct Cli {
    /// Backend selection (auto, none, gemini, groq, openai)
    #[arg(short, long, env = "COMMITFLOW_PROVIDER")]
    pub provider: Option<String>,

    /// Model override
    #[arg(short, long, env = "COMMITFLOW_MODEL")]
    pub model: Option<String>,

    /// Conventional-commit subject (feat:, fix:, ...)
    #[arg(long, conflicts_with = "plain")]
    pub conventional: bool,

    /// Plain imperative subject without a type prefix
    #[arg(long)]
    pub plain: bool,

    /// Include an explanatory body
    #[arg(short, long)]
    pub body: bool,

    /// Stage all changes (git add -A) before generating
    #[arg(short, long)]
    pub all: bool,

    /// Auto-confirm and commit without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Print message only, don't commit
    #[arg(long)]
    pub dry_run: bool,

    /// Copy the message to the clipboard
    #[arg(long)]
    pub copy: bool,

    /// Always regenerate instead of reusing a cached message
    #[arg(long)]
    pub no_cache: bool,

    /// Show the prompt sent to the backend
    #[arg(long)]
    pub show_prompt: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate several candidate messages and pick one
    Suggest {
        /// Number of style variants to try
        #[arg(short = 'n', long, default_value_t = 3)]
        count: usize,
    },
    /// Initialize config file
    Init,
    /// Show current configuration
    Config,
    /// Check configuration, credentials and repository
    Doctor,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Store an API key in the system keychain
    #[cfg(feature = "secure-storage")]
    SetKey {
        /// gemini, groq or openai
        provider: String,
    },
    /// Check whether an API key is stored in the system keychain
    #[cfg(feature = "secure-storage")]
    GetKey {
        /// gemini, groq or openai
        provider: String,
    },
}
