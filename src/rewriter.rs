//! Reference rewriting for HTML output.
//!
//! This is plain text substitution, not HTML-aware: any exact occurrence of a
//! registered basename is replaced, including occurrences in text content or
//! unrelated attributes. All basenames are matched in a single left-to-right
//! pass with longer basenames preferred, and replacement text is never
//! rescanned.

use std::borrow::Cow;
use std::collections::HashMap;

use regex::{Captures, Regex};

use crate::registry::RegistrySnapshot;

/// Rewrites original basenames to minted basenames
#[derive(Debug, Clone)]
pub struct HtmlRewriter {
    matcher: Option<Regex>,
    replacements: HashMap<String, String>,
}

impl HtmlRewriter {
    pub fn new(snapshot: &RegistrySnapshot) -> Result<Self, regex::Error> {
        if snapshot.is_empty() {
            return Ok(Self {
                matcher: None,
                replacements: HashMap::new(),
            });
        }

        // Alternation is leftmost-first, so snapshot order makes longer keys win
        let alternation = snapshot
            .iter()
            .map(|(original, _)| regex::escape(original))
            .collect::<Vec<_>>()
            .join("|");
        let matcher = Regex::new(&alternation)?;

        let replacements = snapshot
            .iter()
            .map(|(original, minted)| (original.to_string(), minted.to_string()))
            .collect();

        Ok(Self {
            matcher: Some(matcher),
            replacements,
        })
    }

    /// Replace every registered basename in `html`
    pub fn rewrite<'h>(&self, html: &'h str) -> Cow<'h, str> {
        let Some(matcher) = &self.matcher else {
            return Cow::Borrowed(html);
        };

        matcher.replace_all(html, |caps: &Captures| {
            let original = &caps[0];
            self.replacements
                .get(original)
                .cloned()
                .unwrap_or_else(|| original.to_string())
        })
    }
}
