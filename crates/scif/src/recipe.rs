// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Recipe lexing, parsing and writing.
//!
//! A recipe is line oriented:
//!
//! ```text
//! # comment
//! %apprun hello-world
//!     echo "Hello World!"
//! %appenv hello-world
//!     THEBESTFRUIT=avocado
//! ```
//!
//! * a line whose first non-blank character is `#` is a comment
//! * a line whose first non-blank character is `%` opens a section: `%<kind> <app name>`,
//!   anything after a `#` on the header line is ignored
//! * every other non-blank line is a body line of the last opened section
//!
//! Blank lines are dropped from every section and body lines are otherwise
//! kept verbatim.

use crate::config::Configuration;
use crate::section::{AppSettings, SectionKind};
use crate::{Error, Result};

#[cfg(test)]
#[path = "./recipe_test.rs"]
mod recipe_test;

/// Kind of a single recipe line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Comment,
    Header,
    Body,
}

/// One lexed recipe line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// 1-based line number.
    pub line: usize,
}

/// Split recipe text into classified lines.
pub fn lex(text: &str) -> impl Iterator<Item = Token<'_>> {
    text.lines().enumerate().map(|(idx, line)| {
        let start = line.trim_start();
        let kind = if start.starts_with('#') {
            TokenKind::Comment
        } else if start.starts_with('%') {
            TokenKind::Header
        } else {
            TokenKind::Body
        };
        Token {
            kind,
            text: line,
            line: idx + 1,
        }
    })
}

/// A parsed `%<kind> <app>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Lower-cased kind as written, without the `%`.
    pub kind: String,
    pub app: String,
}

impl Header {
    /// Parse a header line, dropping any inline `#` comment.
    ///
    /// Only known section kinds need an app name.
    pub fn parse(text: &str, line: usize) -> Result<Self> {
        let text = text.split('#').next().unwrap_or_default();
        let mut words = text.split_whitespace();
        let kind = words
            .next()
            .unwrap_or_default()
            .trim_start_matches('%')
            .to_lowercase();
        let app = words.collect::<Vec<_>>().join(" ");
        let header = Self { kind, app };

        if header.app.is_empty() && header.section_kind().is_some() {
            return Err(Error::UnnamedSection {
                line,
                header: text.trim().to_string(),
            });
        }

        Ok(header)
    }

    /// The known section kind, if any.
    pub fn section_kind(&self) -> Option<SectionKind> {
        self.kind.parse().ok()
    }
}

/// Section currently collecting body lines.
struct OpenSection {
    kind: Option<SectionKind>,
    app: String,
    body: Vec<String>,
}

impl OpenSection {
    fn close(self, config: &mut Configuration) {
        let Some(kind) = self.kind else {
            return;
        };
        if self.body.is_empty() {
            return;
        }
        let settings = config.entry(&self.app);
        let lines = settings.section_mut(kind);
        if !lines.is_empty() {
            tracing::debug!("%{kind} {} defined again, replacing", self.app);
        }
        *lines = self.body;
    }
}

/// Parse recipe text into a configuration.
///
/// Unknown section kinds are skipped with a warning. The returned
/// configuration has not been through [`Configuration::finish_load`].
pub fn parse(text: &str) -> Result<Configuration> {
    let mut config = Configuration::default();
    let mut open: Option<OpenSection> = None;

    for token in lex(text) {
        match token.kind {
            TokenKind::Comment => continue,
            TokenKind::Header => {
                if let Some(section) = open.take() {
                    section.close(&mut config);
                }
                let header = Header::parse(token.text, token.line)?;
                let kind = header.section_kind();
                match kind {
                    Some(kind) => tracing::debug!("Found section {kind} for {}", header.app),
                    None => tracing::warn!(
                        "{} is not a valid section (line {}), skipping",
                        header.kind,
                        token.line
                    ),
                }
                if !header.app.is_empty() {
                    config.entry(&header.app);
                }
                open = Some(OpenSection {
                    kind,
                    app: header.app,
                    body: Vec::new(),
                });
            }
            TokenKind::Body => {
                if token.text.trim().is_empty() {
                    continue;
                }
                if let Some(section) = open.as_mut() {
                    section.body.push(token.text.to_string());
                }
            }
        }
    }

    if let Some(section) = open.take() {
        section.close(&mut config);
    }

    Ok(config)
}

/// Write the sections of one app back out as recipe text.
pub fn write_app(name: &str, settings: &AppSettings) -> String {
    let blocks: Vec<String> = settings
        .defined()
        .map(|(kind, lines)| {
            let mut block = kind.header(name);
            for line in lines {
                block.push('\n');
                block.push_str(line);
            }
            block.push('\n');
            block
        })
        .collect();
    blocks.join("\n")
}

/// Write a whole configuration back out as recipe text, using the sections
/// as they were declared.
pub fn write_recipe(config: &Configuration) -> String {
    config
        .names()
        .iter()
        .filter_map(|name| Some(write_app(name, config.declared(name)?)))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
