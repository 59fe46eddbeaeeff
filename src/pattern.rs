//! Content-addressed output filenames.
//!
//! A [`FilenamePattern`] interpolates `[name]`, `[ext]`, `[hash]` and
//! `[hash:N]` tokens. The pattern is parsed once, so every pattern error is
//! reported before any resource is processed.
//!
//! Only one hash form is ever substituted: `[hash]` when the pattern contains
//! it anywhere, otherwise the first `[hash:N]` token. The form is chosen from
//! the pattern, but substitution runs over the name after `[name]` and `[ext]`
//! are filled in, so every occurrence of the chosen token is replaced, even
//! one carried in by the basename. Any other hash token stays verbatim.

use std::fmt;
use std::str::FromStr;

use md5::{Digest, Md5};

use crate::error::{PatternError, PipelineError};

/// Pattern used when none is configured
pub const DEFAULT_FILENAME_PATTERN: &str = "[name]-[hash:6].min.[ext]";

/// Length of the hex-encoded content digest (128-bit MD5)
pub const DIGEST_HEX_LEN: usize = 32;

const NAME_TOKEN: &str = "[name]";
const EXT_TOKEN: &str = "[ext]";
const FULL_HASH_TOKEN: &str = "[hash]";
const HASH_PREFIX: &str = "[hash:";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Name,
    Ext,
}

/// The hash token a pattern substitutes
#[derive(Debug, Clone, PartialEq, Eq)]
struct HashToken {
    text: String,
    /// `None` renders the full digest
    length: Option<usize>,
}

/// A validated output filename pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenamePattern {
    raw: String,
    segments: Vec<Segment>,
    hash: Option<HashToken>,
}

impl FilenamePattern {
    pub fn parse(pattern: &str) -> Result<Self, PipelineError> {
        let hash_token = hash_token(pattern).map_err(|source| PipelineError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = pattern;

        while let Some(ch) = rest.chars().next() {
            let matched = if rest.starts_with(NAME_TOKEN) {
                Some((Segment::Name, NAME_TOKEN.len()))
            } else if rest.starts_with(EXT_TOKEN) {
                Some((Segment::Ext, EXT_TOKEN.len()))
            } else {
                None
            };

            match matched {
                Some((segment, len)) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(segment);
                    rest = &rest[len..];
                }
                None => {
                    literal.push(ch);
                    rest = &rest[ch.len_utf8()..];
                }
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
            hash: hash_token,
        })
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True if minted names depend on content
    pub fn has_hash(&self) -> bool {
        self.hash.is_some()
    }

    /// Produce the output basename for `basename` with minified `content`
    pub fn mint(&self, basename: &str, content: &[u8]) -> String {
        let (name, ext) = split_basename(basename);

        let mut minted = String::with_capacity(self.raw.len() + basename.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => minted.push_str(text),
                Segment::Name => minted.push_str(name),
                Segment::Ext => minted.push_str(ext),
            }
        }

        match &self.hash {
            Some(HashToken { text, length }) => {
                let digest = content_digest(content);
                let hash = match length {
                    Some(length) => &digest[..*length],
                    None => digest.as_str(),
                };
                minted.replace(text.as_str(), hash)
            }
            None => minted,
        }
    }
}

impl Default for FilenamePattern {
    fn default() -> Self {
        Self {
            raw: DEFAULT_FILENAME_PATTERN.to_string(),
            segments: vec![
                Segment::Name,
                Segment::Literal("-[hash:6].min.".to_string()),
                Segment::Ext,
            ],
            hash: Some(HashToken {
                text: "[hash:6]".to_string(),
                length: Some(6),
            }),
        }
    }
}

impl FromStr for FilenamePattern {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FilenamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Select the hash token this pattern substitutes.
///
/// Validates only the selected token.
fn hash_token(pattern: &str) -> Result<Option<HashToken>, PatternError> {
    if pattern.contains(FULL_HASH_TOKEN) {
        return Ok(Some(HashToken {
            text: FULL_HASH_TOKEN.to_string(),
            length: None,
        }));
    }

    let Some(start) = pattern.find(HASH_PREFIX) else {
        return Ok(None);
    };
    let digits_start = start + HASH_PREFIX.len();
    let Some(close) = pattern[digits_start..].find(']') else {
        return Err(PatternError::Unterminated);
    };
    let digits = &pattern[digits_start..digits_start + close];

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PatternError::NotANumber(digits.to_string()));
    }
    let length: usize = digits
        .parse()
        .map_err(|_| PatternError::NotANumber(digits.to_string()))?;

    if length == 0 {
        return Err(PatternError::ZeroLength);
    }
    if length > DIGEST_HEX_LEN {
        return Err(PatternError::TooLong {
            requested: length,
            available: DIGEST_HEX_LEN,
        });
    }

    Ok(Some(HashToken {
        text: pattern[start..=digits_start + close].to_string(),
        length: Some(length),
    }))
}

/// Split a basename at its last `.` into name and extension.
///
/// Without a `.` the extension is empty.
pub fn split_basename(basename: &str) -> (&str, &str) {
    match basename.rfind('.') {
        Some(idx) => (&basename[..idx], &basename[idx + 1..]),
        None => (basename, ""),
    }
}

/// Lowercase hex MD5 of `content`
pub fn content_digest(content: &[u8]) -> String {
    hex::encode(Md5::digest(content))
}
