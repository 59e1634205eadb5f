//! Declarations.
//!
//! A declaration records where and how a symbol is introduced. Declarations
//! form a tree mirroring scope structure; several declarations may
//! contribute to one symbol (overload groups, interface/module merging).

use strata_ast::types::{DeclId, NodeId, SymbolId};
use strata_core::intern::InternedString;
use strata_core::text::TextSpan;
use rustc_hash::FxHashMap;

bitflags::bitflags! {
    /// Modifier and bookkeeping flags on a declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DeclFlags: u16 {
        const NONE              = 0;
        const EXPORTED          = 1 << 0;
        const PRIVATE           = 1 << 1;
        const STATIC            = 1 << 2;
        const AMBIENT           = 1 << 3;
        const OPTIONAL          = 1 << 4;
        const VARIADIC          = 1 << 5;
        /// Fat-arrow function expression: `this` is captured lexically.
        const ARROW             = 1 << 6;
        const CONST             = 1 << 7;
        /// Constructor parameter that doubles as an instance property.
        const PARAM_PROPERTY    = 1 << 8;
        /// Function-like declaration with a body (vs an overload stub).
        const DEFINITION        = 1 << 9;
        /// Set by the checker when a nested function uses `this` and the
        /// emitted code must capture the enclosing `this`.
        const MUST_CAPTURE_THIS = 1 << 10;
        /// Derived class whose field initializers or parameter properties
        /// force `super()` to be the first constructor statement.
        const SUPER_MUST_BE_FIRST = 1 << 11;
    }
}

/// What sort of construct a declaration introduces.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DeclKind {
    Unit,
    Module,
    Class,
    Interface,
    Enum,
    EnumMember,
    Function,
    Method,
    Constructor,
    GetAccessor,
    SetAccessor,
    Variable,
    Field,
    Parameter,
    TypeParameter,
    /// Transient declaration for an object literal discovered mid-resolution.
    ObjectLiteral,
    ObjectLiteralMember,
    FunctionExpression,
}

impl DeclKind {
    /// Containers that introduce a lexical scope for `var` and nested
    /// function declarations.
    pub fn is_scope_container(self) -> bool {
        matches!(
            self,
            DeclKind::Unit
                | DeclKind::Module
                | DeclKind::Function
                | DeclKind::Method
                | DeclKind::Constructor
                | DeclKind::GetAccessor
                | DeclKind::SetAccessor
                | DeclKind::FunctionExpression
        )
    }

    /// Function-shaped declarations carrying parameters and a return type.
    pub fn is_function_like(self) -> bool {
        matches!(
            self,
            DeclKind::Function
                | DeclKind::Method
                | DeclKind::Constructor
                | DeclKind::GetAccessor
                | DeclKind::SetAccessor
                | DeclKind::FunctionExpression
        )
    }
}

/// A node in the declaration tree.
#[derive(Debug)]
pub struct Declaration {
    pub id: DeclId,
    pub name: Option<InternedString>,
    pub kind: DeclKind,
    pub flags: DeclFlags,
    pub span: TextSpan,
    /// The syntax node this declaration was created from.
    pub node: NodeId,
    pub parent: Option<DeclId>,
    pub children: Vec<DeclId>,
    /// The symbol this declaration contributes to.
    pub symbol: SymbolId,
    /// Lexically scoped names: parameters, type parameters, local variables,
    /// nested functions, nested types.
    pub locals: FxHashMap<InternedString, SymbolId>,
    /// Member names of container-like declarations: class/interface members,
    /// module exports, enum members, object-literal members.
    pub members: FxHashMap<InternedString, SymbolId>,
}

impl Declaration {
    pub fn new(id: DeclId, kind: DeclKind, node: NodeId, span: TextSpan) -> Self {
        Self {
            id,
            name: None,
            kind,
            flags: DeclFlags::NONE,
            span,
            node,
            parent: None,
            children: Vec::new(),
            symbol: SymbolId::INVALID,
            locals: FxHashMap::default(),
            members: FxHashMap::default(),
        }
    }

    pub fn is_exported(&self) -> bool {
        self.flags.contains(DeclFlags::EXPORTED)
    }

    pub fn is_private(&self) -> bool {
        self.flags.contains(DeclFlags::PRIVATE)
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(DeclFlags::STATIC)
    }
}
