//! Pipeline stages for publishing a docs folder to a wiki.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and the rewriter stays free of any I/O.
//!
//! ## Data Flow
//!
//! ```text
//! git clone ──▶ discover ──▶ files (copy + rewrite) ──▶ git commit/push
//!               (glob)         │
//!                              └─ rewrite (pure)
//! ```
//!
//! 1. [`git`]     : clone the wiki, and later stage, commit and push
//! 2. [`discover`]: enumerate pages and images below the docs folder
//! 3. [`files`]   : copy images and write rewritten pages into the checkout
//! 4. [`rewrite`] : adjust image targets for the page's new location

pub mod discover;
pub mod files;
pub mod git;
pub mod rewrite;
