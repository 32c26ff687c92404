// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use crate::config::{Config, ProviderChoice};

/// Style and backend settings for one generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub provider: ProviderChoice,
    pub model: Option<String>,
    pub conventional: bool,
    pub body: bool,
    pub temperature: f32,
    pub max_tokens: u32,
    pub verbose: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            provider: ProviderChoice::Auto,
            model: None,
            conventional: true,
            body: false,
            temperature: 0.3,
            max_tokens: 256,
            verbose: false,
        }
    }
}

impl GenerationOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            provider: config.provider,
            model: config.model.clone(),
            conventional: config.conventional,
            body: config.body,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
