// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Entrypoint tokenizer.
//!
//! Recipes and `SCIF_ENTRYPOINT` cannot contain raw shell metacharacters,
//! so a small closed set of bracket tokens stands in for them:
//!
//! | token      | becomes |
//! |------------|---------|
//! | `[e]`      | `$`     |
//! | `[out]`    | `>`     |
//! | `[in]`     | `<`     |
//! | `[pipe]`   | `\|`    |
//! | `[append]` | `\|`    |
//!
//! `[append]` is an alias of `[pipe]`, not a distinct operator.

use crate::{Error, Result};

#[cfg(test)]
#[path = "./entrypoint_test.rs"]
mod entrypoint_test;

const SUBSTITUTIONS: [(&str, &str); 5] = [
    ("[e]", "$"),
    ("[out]", ">"),
    ("[in]", "<"),
    ("[pipe]", "|"),
    ("[append]", "|"),
];

/// Replace bracket tokens with the characters they stand for.
pub fn substitute(text: &str) -> String {
    SUBSTITUTIONS
        .iter()
        .fold(text.to_string(), |acc, (token, replacement)| {
            acc.replace(token, replacement)
        })
}

/// Substitute bracket tokens and split into words, honoring quotes.
///
/// Environment references are left untouched.
pub fn split_entrypoint(entrypoint: &str) -> Result<Vec<String>> {
    let substituted = substitute(entrypoint);
    shell_words::split(&substituted).map_err(|error| Error::InvalidEntrypoint {
        entrypoint: entrypoint.to_string(),
        error,
    })
}

/// Split an entrypoint string and expand environment references in each word,
/// reading variables from the current process.
pub fn parse_entrypoint(entrypoint: &str) -> Result<Vec<String>> {
    parse_entrypoint_with(entrypoint, |key| std::env::var(key).ok())
}

/// Like [`parse_entrypoint`] with an explicit variable lookup.
pub fn parse_entrypoint_with<F>(entrypoint: &str, lookup: F) -> Result<Vec<String>>
where
    F: FnMut(&str) -> Option<String>,
{
    let words = split_entrypoint(entrypoint)?;
    Ok(expand_all(words, lookup))
}

/// Apply substitution and environment expansion to already split tokens,
/// reading variables from the current process.
pub fn parse_entrypoint_list<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    parse_entrypoint_list_with(tokens, |key| std::env::var(key).ok())
}

/// Like [`parse_entrypoint_list`] with an explicit variable lookup.
pub fn parse_entrypoint_list_with<S, F>(tokens: &[S], lookup: F) -> Vec<String>
where
    S: AsRef<str>,
    F: FnMut(&str) -> Option<String>,
{
    let substituted = tokens.iter().map(|t| substitute(t.as_ref()));
    expand_all(substituted, lookup)
}

/// Expand `$NAME` and `${NAME}` in a single string. Unknown variables expand
/// to the empty string.
pub fn expand_with<F>(text: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    shellexpand::env_with_context_no_errors(text, |key| Some(lookup(key).unwrap_or_default()))
        .into_owned()
}

fn expand_all<I, F>(words: I, mut lookup: F) -> Vec<String>
where
    I: IntoIterator<Item = String>,
    F: FnMut(&str) -> Option<String>,
{
    words
        .into_iter()
        .map(|word| expand_with(&word, &mut lookup))
        .collect()
}
