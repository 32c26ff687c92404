// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::time::Duration;

use indexmap::IndexMap;
use sha2::{Digest, Sha256};
use tokio::time::Instant;
use tracing::debug;

use crate::config::CacheConfig;
use crate::domain::{CommitMessage, GenerationOptions};

/// Characters of the diff that contribute to the fingerprint
pub const FINGERPRINT_CHARS: usize = 1_000;

#[derive(Debug, Clone)]
struct CacheEntry {
    message: CommitMessage,
    used_local: bool,
    created_at: Instant,
}

/// A cached generation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub message: CommitMessage,
    pub used_local: bool,
}

/// Bounded, time-limited store of generated messages keyed by change
/// fingerprint. The oldest insertion is evicted first.
#[derive(Debug)]
pub struct ResponseCache {
    enabled: bool,
    max_entries: usize,
    ttl: Duration,
    entries: IndexMap<String, CacheEntry>,
}

impl ResponseCache {
    pub fn new(enabled: bool, max_entries: usize, ttl: Duration) -> Self {
        Self {
            enabled,
            max_entries: max_entries.max(1),
            ttl,
            entries: IndexMap::new(),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(
            config.enabled,
            config.max_entries,
            Duration::from_secs(config.ttl_secs),
        )
    }

    pub fn disabled() -> Self {
        Self::new(false, 1, Duration::ZERO)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// SHA-256 over the diff prefix and the formatting options.
    pub fn fingerprint(diff: &str, options: &GenerationOptions) -> String {
        let prefix: String = diff.chars().take(FINGERPRINT_CHARS).collect();

        let mut hasher = Sha256::new();
        hasher.update(prefix.as_bytes());
        hasher.update([0u8, options.conventional as u8, options.body as u8]);
        hex::encode(hasher.finalize())
    }

    /// Fresh entry for `key`, if any. Stale entries are left in place.
    pub fn get(&self, key: &str) -> Option<CachedResponse> {
        if !self.enabled {
            return None;
        }

        let entry = self.entries.get(key)?;
        if entry.created_at.elapsed() >= self.ttl {
            debug!(key, "cache entry expired");
            return None;
        }

        Some(CachedResponse {
            message: entry.message.clone(),
            used_local: entry.used_local,
        })
    }

    /// Store a result, replacing any entry under `key` and evicting the
    /// oldest insertions beyond capacity.
    pub fn put(&mut self, key: String, message: CommitMessage, used_local: bool) {
        if !self.enabled {
            return;
        }

        self.entries.shift_remove(&key);
        self.entries.insert(
            key,
            CacheEntry {
                message,
                used_local,
                created_at: Instant::now(),
            },
        );

        while self.entries.len() > self.max_entries {
            if let Some((evicted, _)) = self.entries.shift_remove_index(0) {
                debug!(key = %evicted, "evicted oldest cache entry");
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}
