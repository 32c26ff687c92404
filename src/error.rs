// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

// miette's Diagnostic derive generates code that triggers this false positive
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("No staged changes found")]
    #[diagnostic(
        code(commitflow::git::no_staged),
        help("Stage files with: git add <files>, or pass --all")
    )]
    NoStagedChanges,

    #[error("Not a git repository")]
    #[diagnostic(
        code(commitflow::git::not_repo),
        help("Run this command inside a git repository")
    )]
    NotAGitRepo,

    #[error("Merge in progress")]
    #[diagnostic(
        code(commitflow::git::merge),
        help("Complete or abort the merge: git merge --abort")
    )]
    MergeInProgress,

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error("Provider '{provider}' error: {message}")]
    #[diagnostic(code(commitflow::provider::error))]
    Provider { provider: String, message: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(commitflow::config::error))]
    Config(String),

    #[error("Git error: {0}")]
    #[diagnostic(code(commitflow::git::error))]
    Git(String),

    #[error("Clipboard error: {0}")]
    #[diagnostic(
        code(commitflow::clipboard::error),
        help("Run without --copy, or check that a clipboard is available")
    )]
    Clipboard(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),

    #[cfg(feature = "secure-storage")]
    #[error("Keyring error: {0}")]
    #[diagnostic(
        code(commitflow::keyring::error),
        help("Check your system keychain configuration")
    )]
    Keyring(String),
}

impl Error {
    pub(crate) fn provider(provider: &str, message: impl Into<String>) -> Self {
        Error::Provider {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}

impl From<dialoguer::Error> for Error {
    fn from(e: dialoguer::Error) -> Self {
        Error::Dialog(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
