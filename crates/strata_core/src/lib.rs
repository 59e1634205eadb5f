//! strata_core: shared utilities for the strata compiler.
//!
//! Source-text spans, line maps, and string interning used by every other
//! crate in the workspace.

pub mod intern;
pub mod text;

pub use intern::{InternedString, StringInterner};
pub use text::{LineMap, TextSpan};
