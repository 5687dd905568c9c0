//! Normalization prompts.
//!
//! Each prompt module exposes a task name, a fixed system policy, and a
//! user-prompt renderer. The policy text is versioned configuration:
//! change it deliberately, in review, like any other contract change.

pub mod ingredients;
pub mod instructions;
