//! strata_binder: the declaration-binding pass.
//!
//! Walks each unit's syntax tree once and creates skeletal declarations and
//! unresolved symbols for every named construct, mirroring scope structure
//! (unit → module → class/interface/function → parameters/locals). The
//! checker assumes a declaration exists for any node it visits, and calls
//! back into [`Binder::bind_object_literal`] /
//! [`Binder::bind_function_expression`] for constructs that are only
//! discovered during resolution.

mod binder;
mod decl;
mod symbol;

pub use binder::Binder;
pub use decl::{DeclFlags, DeclKind, Declaration};
pub use symbol::{Symbol, SymbolFlags, SymbolState};
