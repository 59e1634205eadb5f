//! Handle types and flag sets shared across the compiler.
//!
//! The ids defined here index the arenas owned by the AST (`NodeId`), the
//! binder (`DeclId`, `SymbolId`), and the checker's type table (`TypeId`).
//! Keeping them in one crate lets the binder record a symbol's lazily
//! computed type without depending on the checker.

use std::fmt;

bitflags::bitflags! {
    /// Modifier flags recorded on syntax nodes by the producing parser.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u16 {
        const NONE      = 0;
        /// `export`-ed from its enclosing module.
        const EXPORTED  = 1 << 0;
        const PRIVATE   = 1 << 1;
        const STATIC    = 1 << 2;
        /// Declared in an ambient (`declare`) context; has no body/initializer.
        const AMBIENT   = 1 << 3;
        /// Optional parameter or member (`?`).
        const OPTIONAL  = 1 << 4;
        /// Rest parameter (`...`).
        const VARIADIC  = 1 << 5;
        /// Fat-arrow function expression; captures `this` lexically.
        const ARROW     = 1 << 6;
        const CONST     = 1 << 7;
        /// Constructor parameter declared with a visibility modifier, which
        /// makes it an instance property as well.
        const PROPERTY  = 1 << 8;
    }
}

/// Handle to a node in the [`crate::Ast`] arena.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const INVALID: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to a declaration in the binder's declaration arena.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DeclId(pub u32);

impl DeclId {
    pub const INVALID: DeclId = DeclId(u32::MAX);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to a symbol in the binder's symbol arena.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub const INVALID: SymbolId = SymbolId(u32::MAX);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to a type in the checker's type table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const INVALID: TypeId = TypeId(u32::MAX);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}
