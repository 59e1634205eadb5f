//! Resolution context.
//!
//! Everything position-dependent about a resolution request travels in one
//! immutable value. Contexts are extended by value on the way down the
//! tree, never mutated in place, so sibling subtrees cannot observe each
//! other's state.

use strata_ast::types::{DeclId, TypeId};

/// The lexical position a node is resolved at.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    /// Declaration whose scope chain name lookup starts from.
    pub enclosing: DeclId,
    /// Type of `this` here, when `this` is legal at all.
    pub this_type: Option<TypeId>,
    /// Instance type of the base class, inside members of a derived class.
    pub super_type: Option<TypeId>,
    /// Inside a static member (changes what `this` means and bans `super`
    /// property access).
    pub in_static: bool,
    /// Inside a constructor body.
    pub in_constructor: bool,
    /// Expected type imposed by the surrounding expression, used for
    /// contextual typing of unannotated function expressions.
    pub contextual_type: Option<TypeId>,
    /// Provisional resolution: diagnostics are suppressed and node types
    /// are not cached. Used while trying overload candidates.
    pub provisional: bool,
}

impl ResolutionContext {
    pub fn new(enclosing: DeclId) -> Self {
        Self {
            enclosing,
            this_type: None,
            super_type: None,
            in_static: false,
            in_constructor: false,
            contextual_type: None,
            provisional: false,
        }
    }

    pub fn with_scope(&self, enclosing: DeclId) -> Self {
        let mut ctx = self.clone();
        ctx.enclosing = enclosing;
        ctx
    }

    pub fn with_this(&self, this_type: Option<TypeId>, super_type: Option<TypeId>) -> Self {
        let mut ctx = self.clone();
        ctx.this_type = this_type;
        ctx.super_type = super_type;
        ctx
    }

    pub fn with_static(&self, in_static: bool) -> Self {
        let mut ctx = self.clone();
        ctx.in_static = in_static;
        ctx
    }

    pub fn with_constructor(&self, in_constructor: bool) -> Self {
        let mut ctx = self.clone();
        ctx.in_constructor = in_constructor;
        ctx
    }

    pub fn with_contextual_type(&self, contextual_type: Option<TypeId>) -> Self {
        let mut ctx = self.clone();
        ctx.contextual_type = contextual_type;
        ctx
    }

    pub fn provisional(&self) -> Self {
        let mut ctx = self.clone();
        ctx.provisional = true;
        ctx
    }
}
