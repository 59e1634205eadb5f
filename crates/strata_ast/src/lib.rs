//! strata_ast: the syntax tree consumed by the binder and checker.
//!
//! Nodes live in a `Vec` arena owned by [`Ast`] and are referenced by
//! [`NodeId`] handles, which gives every node the stable identity the
//! resolver's per-node cache is keyed on. The producing parser is an
//! external collaborator; tests synthesize trees through [`builder`].

pub mod builder;
pub mod node;
pub mod types;

pub use builder::AstBuilder;
pub use node::{Ast, BinaryOp, FuncKind, Node, NodeKind, PrimTypeKind, UnaryOp};
pub use types::{DeclId, NodeFlags, NodeId, SymbolId, TypeId};
