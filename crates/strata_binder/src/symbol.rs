//! Symbols.
//!
//! A symbol is a named, kinded semantic entity. It is created unresolved at
//! binding time; the checker computes its type lazily on first use and the
//! state only ever moves forward. Re-entering a `Resolving` symbol is the
//! cycle signal the resolver uses to return a partial type instead of
//! recursing.

use strata_ast::types::{DeclId, SymbolId, TypeId};
use strata_core::intern::InternedString;

bitflags::bitflags! {
    /// What kind of entity a symbol names. A symbol can occupy the value
    /// and type spaces at once (a class does both).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SymbolFlags: u32 {
        const NONE           = 0;
        const VARIABLE       = 1 << 0;
        const FUNCTION       = 1 << 1;
        const CLASS          = 1 << 2;
        const INTERFACE      = 1 << 3;
        const ENUM           = 1 << 4;
        const ENUM_MEMBER    = 1 << 5;
        const MODULE         = 1 << 6;
        const PROPERTY       = 1 << 7;
        const METHOD         = 1 << 8;
        const CONSTRUCTOR    = 1 << 9;
        const GET_ACCESSOR   = 1 << 10;
        const SET_ACCESSOR   = 1 << 11;
        const PARAMETER      = 1 << 12;
        const TYPE_PARAMETER = 1 << 13;
        const OBJECT_LITERAL = 1 << 14;

        const ACCESSOR = Self::GET_ACCESSOR.bits() | Self::SET_ACCESSOR.bits();
        const VALUE = Self::VARIABLE.bits()
            | Self::FUNCTION.bits()
            | Self::CLASS.bits()
            | Self::ENUM.bits()
            | Self::ENUM_MEMBER.bits()
            | Self::MODULE.bits()
            | Self::PROPERTY.bits()
            | Self::METHOD.bits()
            | Self::ACCESSOR.bits()
            | Self::PARAMETER.bits()
            | Self::OBJECT_LITERAL.bits();
        const TYPE = Self::CLASS.bits()
            | Self::INTERFACE.bits()
            | Self::ENUM.bits()
            | Self::TYPE_PARAMETER.bits();
        /// Kinds that may merge with a later declaration of the same name.
        const MERGEABLE = Self::VARIABLE.bits()
            | Self::FUNCTION.bits()
            | Self::INTERFACE.bits()
            | Self::MODULE.bits()
            | Self::METHOD.bits()
            | Self::CONSTRUCTOR.bits()
            | Self::ACCESSOR.bits();
    }
}

/// Forward-only resolution state of a symbol.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SymbolState {
    Unresolved,
    /// Resolution has started; re-entry means a dependency cycle.
    Resolving,
    /// Mid-resolution and currently being specialized; generic recursion is
    /// tolerated against the partial type.
    ResolvingSpecialized,
    /// Resolution finished; `ty` is stable for the session.
    Resolved,
}

/// A named, kinded entity with a lazily computed type.
#[derive(Debug)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: InternedString,
    pub flags: SymbolFlags,
    /// Declarations contributing to this symbol, in binding order.
    pub declarations: Vec<DeclId>,
    pub state: SymbolState,
    /// The computed type: partial while `Resolving`, stable once `Resolved`.
    pub ty: Option<TypeId>,
}

impl Symbol {
    pub fn new(id: SymbolId, name: InternedString, flags: SymbolFlags) -> Self {
        Self {
            id,
            name,
            flags,
            declarations: Vec::new(),
            state: SymbolState::Unresolved,
            ty: None,
        }
    }

    pub fn is_value(&self) -> bool {
        self.flags.intersects(SymbolFlags::VALUE)
    }

    pub fn is_type(&self) -> bool {
        self.flags.intersects(SymbolFlags::TYPE)
    }

    /// The first declaration, present for every bound symbol.
    pub fn primary_decl(&self) -> DeclId {
        self.declarations[0]
    }
}
