//! strata_checker: type resolution and checking.
//!
//! One [`Checker`] drives five cooperating engines over a bound program:
//! the lazy symbol resolver, the type relation engine
//! (identity/subtype/assignability), generic specialization and inference,
//! overload resolution, and the statement-level checking pass. Types live
//! in a [`TypeTable`] arena and are referenced by `TypeId` handles, so the
//! recursive type graph needs no lifetimes and every structural comparison
//! can be memoized by id pair.

mod check;
mod checker;
mod context;
mod generics;
mod overload;
mod relate;
mod resolver;
mod types;

pub use check::CheckError;
pub use checker::Checker;
pub use context::ResolutionContext;
pub use types::{IndexSignature, Member, Param, Shape, Signature, Type, TypeKind, TypeTable};
