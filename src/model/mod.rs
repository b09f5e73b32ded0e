//! Storyboard data model.
//!
//! A [`Panel`] is one storyboard beat; a [`Storyboard`] is an ordered,
//! contiguously-numbered sequence of panels created atomically from one
//! generation call. Construction validates structural shape only — prose
//! content is never inspected here (consistency is the prompt compiler's
//! concern, enforced by instruction).

mod panel;
mod storyboard;

pub use panel::Panel;
pub use storyboard::Storyboard;
