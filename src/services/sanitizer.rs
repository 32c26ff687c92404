// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{CommitMessage, GenerationOptions};

/// Subject used when nothing usable survives cleaning
pub const DEFAULT_SUBJECT: &str = "Update project code";

static FENCE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(?:```|~~~).*$").unwrap());

static LINE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:(?:[-*+•>]|\d+[.)]|#{1,6})\s+)+").unwrap());

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*\n]+)\*\*|__([^_\n]+)__").unwrap());

static ITALIC_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\s][^*\n]*)\*").unwrap());

// `_word_` only when not part of an identifier like snake_case_name
static ITALIC_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^\w])_([^_\n]+)_([^\w]|$)").unwrap());

static EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Extended_Pictographic}\p{Emoji_Modifier}\u{FE0F}\u{200D}\u{20E3}]").unwrap()
});

static TAB_CR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\t\r]+").unwrap());

static PREAMBLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:here(?:'s|\s+is)[^:\n]*|(?:(?:suggested|proposed)\s+)?commit(?:\s+message)?)\s*:\s*",
    )
    .unwrap()
});

pub struct CommitSanitizer;

impl CommitSanitizer {
    /// Clean raw model output into a commit message. Never fails; applying it
    /// to its own output returns the same subject.
    pub fn sanitize(raw: &str, options: &GenerationOptions) -> CommitMessage {
        let lines = Self::clean_lines(raw);
        let subject = lines
            .first()
            .map(|first| Self::clean_subject(first))
            .filter(|s| !s.is_empty())
            .and_then(Self::settle_subject)
            .unwrap_or_else(|| DEFAULT_SUBJECT.to_string());

        let message = CommitMessage::new(subject);
        if !options.body {
            return message;
        }

        let body = lines.get(1..).unwrap_or_default().join("\n");
        message.with_body(body)
    }

    /// Every cleaning step, returning trimmed non-empty lines
    fn clean_lines(raw: &str) -> Vec<String> {
        let text = Self::strip_code(raw);
        let text = Self::strip_markers(&text);
        let text = Self::strip_emphasis(&text);
        let text = EMOJI.replace_all(&text, "");
        let text = TAB_CR.replace_all(&text, " ");

        text.lines()
            .map(Self::clean_line)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// One cleaning pass over a single candidate subject
    fn subject_pass(line: &str) -> Option<String> {
        Self::clean_lines(line)
            .first()
            .map(|first| Self::clean_subject(first))
            .filter(|s| !s.is_empty())
    }

    /// Repeat subject passes until the subject no longer changes. Every pass
    /// only removes characters or narrows whitespace, so this terminates.
    fn settle_subject(mut current: String) -> Option<String> {
        loop {
            let next = Self::subject_pass(&current)?;
            if next == current {
                return Some(current);
            }
            current = next;
        }
    }

    /// Drop fence lines and every backtick (inline code keeps its text)
    fn strip_code(raw: &str) -> String {
        FENCE_LINE.replace_all(raw, "").replace('`', "")
    }

    fn strip_markers(text: &str) -> String {
        text.lines()
            .map(|line| {
                let trimmed = line.trim_start();
                match LINE_MARKER.find(trimmed) {
                    Some(m) => &trimmed[m.end()..],
                    None => line,
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn strip_emphasis(text: &str) -> String {
        let text = BOLD.replace_all(text, "${1}${2}");
        let text = ITALIC_STAR.replace_all(&text, "${1}");
        ITALIC_UNDERSCORE
            .replace_all(&text, "${1}${2}${3}")
            .into_owned()
    }

    /// Trim and peel markers, preambles and wrapping quotes until stable
    fn clean_line(line: &str) -> &str {
        let mut current = line.trim();
        loop {
            let before = current.len();

            if let Some(m) = LINE_MARKER.find(current) {
                current = current[m.end()..].trim_start();
            }
            if let Some(m) = PREAMBLE.find(current) {
                current = current[m.end()..].trim_start();
            }
            current = strip_wrapping_quotes(current).trim();

            if current.len() == before {
                return current;
            }
        }
    }

    fn clean_subject(line: &str) -> String {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        collapsed
            .trim_end_matches([' ', ':', ',', '.', '!', ';'])
            .to_string()
    }
}

fn strip_wrapping_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}
