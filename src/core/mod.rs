//! Core logic – wire models, session bookkeeping, and highlighting.
//!
//! Nothing in this module depends on any TUI, terminal or HTTP crate.

pub mod highlight;
pub mod markup;
pub mod model;
pub mod sanitize;
pub mod session;
