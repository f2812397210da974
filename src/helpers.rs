use std::sync::LazyLock;

use itertools::{EitherOrBoth, Itertools};
use regex::Regex;
use similar::{capture_diff_slices, Algorithm, DiffOp};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};

// \w includes digits and "_"; subtracting "_" keeps letters and digits, does
// not split words at apostrophes.
static WORD_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w--_]+['’]*[\w--_]*").expect("valid word token pattern"));

// Unicode letters only. Digits and punctuation are not corpus tokens.
static CORPUS_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w--[\d_]]+").expect("valid corpus token pattern"));

static ACRONYM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{2,}$").expect("valid acronym pattern"));

/// Character count of a string. Bucket and pruning arithmetic is in
/// characters, never bytes.
pub(crate) fn len(s: &str) -> usize {
    s.chars().count()
}

pub(crate) fn remove(s: &str, index: usize) -> String {
    s.chars()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, ch)| ch)
        .collect()
}

pub(crate) fn slice(s: &str, start: usize, end: usize) -> String {
    s.chars().skip(start).take(end - start).collect()
}

pub(crate) fn suffix(s: &str, start: usize) -> String {
    s.chars().skip(start).collect()
}

pub(crate) fn at(s: &str, i: isize) -> Option<char> {
    if i < 0 {
        return None;
    }
    s.chars().nth(i as usize)
}

/// Normalize ligatures: "scientiﬁc" -> "scientific".
pub(crate) fn normalize_nfkc(input: &str) -> String {
    input.nfkc().collect()
}

/// Create a non-unique word list from sample text. Language independent
/// (works with non-latin scripts), does not split words at apostrophes.
pub fn parse_words(phrase: &str, preserve_case: bool, split_by_space: bool) -> Vec<String> {
    if split_by_space {
        return if preserve_case {
            phrase.split_whitespace().map(str::to_string).collect()
        } else {
            phrase
                .to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect()
        };
    }
    if preserve_case {
        WORD_TOKEN
            .find_iter(phrase)
            .map(|m| m.as_str().to_string())
            .collect()
    } else {
        WORD_TOKEN
            .find_iter(&phrase.to_lowercase())
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

pub(crate) fn corpus_tokens(line: &str) -> Vec<String> {
    CORPUS_TOKEN
        .find_iter(&line.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Whether the word reads as an acronym: at least two characters, all
/// uppercase letters or digits. With `match_any_term_with_digits` any term
/// containing a digit qualifies as well.
pub fn is_acronym(word: &str, match_any_term_with_digits: bool) -> bool {
    ACRONYM.is_match(word)
        || (match_any_term_with_digits && word.chars().any(|c| c.is_ascii_digit()))
}

/// Transfer casing between two texts of the same character length, one
/// character at a time.
pub fn case_transfer_matching(cased_text: &str, uncased_text: &str) -> Result<String> {
    if len(cased_text) != len(uncased_text) {
        return Err(Error::InvalidArgument(
            "'cased_text' and 'uncased_text' don't have the same length, \
             use case_transfer_similar() instead"
                .to_string(),
        ));
    }
    let mut result = String::with_capacity(uncased_text.len());
    for (cased, uncased) in cased_text.chars().zip(uncased_text.chars()) {
        if cased.is_uppercase() {
            result.extend(uncased.to_uppercase());
        } else {
            result.extend(uncased.to_lowercase());
        }
    }
    Ok(result)
}

/// Transfer casing between two similar texts of possibly different lengths.
///
/// The diff between the lowercased source and the target drives the
/// transfer: equal sections swap in the source text (casing and all),
/// deleted sections need nothing, inserted sections borrow the casing of
/// the neighboring source character, and replaced sections are transferred
/// character-wise, carrying the last seen case over any extra characters.
pub fn case_transfer_similar(cased_text: &str, uncased_text: &str) -> Result<String> {
    if uncased_text.is_empty() {
        return Ok(String::new());
    }
    if cased_text.is_empty() {
        return Err(Error::InvalidArgument(
            "'cased_text' cannot be empty".to_string(),
        ));
    }

    let cased: Vec<char> = cased_text.chars().collect();
    let cased_lower: Vec<char> = cased
        .iter()
        .map(|c| c.to_lowercase().next().unwrap_or(*c))
        .collect();
    let uncased: Vec<char> = uncased_text.chars().collect();

    let mut result = String::with_capacity(uncased_text.len());
    for op in capture_diff_slices(Algorithm::Myers, &cased_lower, &uncased) {
        match op {
            DiffOp::Equal { old_index, len, .. } => {
                result.extend(&cased[old_index..old_index + len]);
            }
            DiffOp::Delete { .. } => {}
            DiffOp::Insert {
                old_index,
                new_index,
                new_len,
            } => {
                // no character (or a space) to the left: borrow the casing
                // of the following character instead
                let anchor = if old_index == 0 || cased[old_index - 1] == ' ' {
                    cased.get(old_index)
                } else {
                    cased.get(old_index - 1)
                };
                let upper = anchor.is_some_and(|c| c.is_uppercase());
                for ch in &uncased[new_index..new_index + new_len] {
                    if upper {
                        result.extend(ch.to_uppercase());
                    } else {
                        result.extend(ch.to_lowercase());
                    }
                }
            }
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => {
                let cased_part = &cased[old_index..old_index + old_len];
                let uncased_part = &uncased[new_index..new_index + new_len];
                if old_len == new_len {
                    for (c, u) in cased_part.iter().zip(uncased_part.iter()) {
                        if c.is_uppercase() {
                            result.extend(u.to_uppercase());
                        } else {
                            result.extend(u.to_lowercase());
                        }
                    }
                } else {
                    // uneven replacement: transfer character-wise and carry
                    // the last casing over any extra target characters
                    let mut last_upper = false;
                    for pair in cased_part.iter().zip_longest(uncased_part.iter()) {
                        match pair {
                            EitherOrBoth::Both(c, u) => {
                                if c.is_uppercase() {
                                    result.extend(u.to_uppercase());
                                    last_upper = true;
                                } else {
                                    result.extend(u.to_lowercase());
                                    last_upper = false;
                                }
                            }
                            EitherOrBoth::Right(u) => {
                                if last_upper {
                                    result.extend(u.to_uppercase());
                                } else {
                                    result.extend(u.to_lowercase());
                                }
                            }
                            EitherOrBoth::Left(_) => {}
                        }
                    }
                }
            }
        }
    }
    Ok(result)
}
