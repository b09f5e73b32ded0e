//! Ordered, contiguously-numbered panel sequence.

use crate::error::Error;
use crate::model::Panel;
use serde::Serialize;

/// An ordered sequence of panels with contiguous ascending numbering.
///
/// A root storyboard starts at panel 1; a branch starts at
/// `root_len + 1`. A storyboard is created atomically as the output of one
/// generation call and is never edited in place — replacement is always
/// wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Storyboard {
    panels: Vec<Panel>,
}

impl Storyboard {
    /// Validate numbering and wrap the panels.
    ///
    /// Fails with [`Error::MalformedStoryboard`] when the sequence is empty,
    /// does not start at `expected_start`, or does not ascend by exactly 1.
    pub fn new(panels: Vec<Panel>, expected_start: u32) -> Result<Self, Error> {
        if panels.is_empty() {
            return Err(Error::MalformedStoryboard {
                detail: "storyboard contains no panels".to_string(),
            });
        }

        if panels[0].panel != expected_start {
            return Err(Error::MalformedStoryboard {
                detail: format!(
                    "numbering starts at {} (expected {})",
                    panels[0].panel, expected_start
                ),
            });
        }

        for pair in panels.windows(2) {
            if pair[1].panel != pair[0].panel + 1 {
                return Err(Error::MalformedStoryboard {
                    detail: format!(
                        "panel {} is followed by panel {} (expected {})",
                        pair[0].panel,
                        pair[1].panel,
                        pair[0].panel + 1
                    ),
                });
            }
        }

        Ok(Self { panels })
    }

    /// Build a storyboard by assigning fresh contiguous numbers `1..=n`.
    ///
    /// Used when the engine recombines panels locally (split-shot splicing);
    /// the incoming order is kept, only `panel` numbers are rewritten.
    pub fn renumbered(panels: Vec<Panel>) -> Result<Self, Error> {
        let panels = panels
            .into_iter()
            .zip(1u32..)
            .map(|(mut p, n)| {
                p.panel = n;
                p
            })
            .collect();
        Self::new(panels, 1)
    }

    /// First panel number.
    pub fn start(&self) -> u32 {
        self.panels[0].panel
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        // Construction rejects empty sequences; kept for API completeness.
        self.panels.is_empty()
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Root panels up to and including `index` — the ground-truth context
    /// slice handed to branch compilation.
    pub fn context_slice(&self, index: usize) -> &[Panel] {
        &self.panels[..=index]
    }
}

impl<'a> IntoIterator for &'a Storyboard {
    type Item = &'a Panel;
    type IntoIter = std::slice::Iter<'a, Panel>;

    fn into_iter(self) -> Self::IntoIter {
        self.panels.iter()
    }
}
