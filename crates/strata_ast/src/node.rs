//! Syntax tree nodes.
//!
//! One closed [`NodeKind`] sum type covers declarations, statements,
//! expressions, and type annotations, so every dispatch over node kind in
//! the binder and checker is an exhaustive `match`. Child links are
//! [`NodeId`] handles into the owning [`Ast`] arena.

use crate::types::{NodeFlags, NodeId};
use strata_core::intern::InternedString;
use strata_core::text::TextSpan;

/// Binary operators, including assignment and relational forms.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    ShiftRightUnsigned,
    LogicalAnd,
    LogicalOr,
    Equals,
    NotEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    Assign,
    In,
    InstanceOf,
}

impl BinaryOp {
    /// Operators requiring number-or-enum operands on both sides.
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Subtract
                | BinaryOp::Multiply
                | BinaryOp::Divide
                | BinaryOp::Modulo
                | BinaryOp::BitAnd
                | BinaryOp::BitOr
                | BinaryOp::BitXor
                | BinaryOp::ShiftLeft
                | BinaryOp::ShiftRight
                | BinaryOp::ShiftRightUnsigned
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Equals
                | BinaryOp::NotEquals
                | BinaryOp::Less
                | BinaryOp::LessEquals
                | BinaryOp::Greater
                | BinaryOp::GreaterEquals
        )
    }
}

/// Unary operators, prefix and postfix.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UnaryOp {
    Negate,
    Positive,
    LogicalNot,
    BitNot,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
    TypeOf,
}

impl UnaryOp {
    /// Operators requiring a number-or-enum operand.
    pub fn is_arithmetic(self) -> bool {
        !matches!(self, UnaryOp::LogicalNot | UnaryOp::TypeOf)
    }

    /// Operators requiring a writable reference operand.
    pub fn is_increment(self) -> bool {
        matches!(
            self,
            UnaryOp::PreIncrement
                | UnaryOp::PreDecrement
                | UnaryOp::PostIncrement
                | UnaryOp::PostDecrement
        )
    }
}

/// Which callable form a function-shaped node declares.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FuncKind {
    Function,
    Method,
    Constructor,
    Getter,
    Setter,
    /// Inline function expression (fat-arrow when `NodeFlags::ARROW` is set).
    Expression,
}

/// Built-in type keywords.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrimTypeKind {
    Any,
    Number,
    String,
    Boolean,
    Void,
    Null,
    Undefined,
}

/// The payload of a syntax node.
#[derive(Debug, Clone)]
pub enum NodeKind {
    // ------------------------------------------------------------------
    // Structure and declarations
    // ------------------------------------------------------------------
    /// One source unit (file). The root of each tree handed to the binder.
    Unit { name: InternedString, statements: Vec<NodeId> },
    /// `module A { ... }` — an internal module/namespace.
    Module { name: InternedString, body: Vec<NodeId> },
    Class {
        name: InternedString,
        type_params: Vec<NodeId>,
        extends: Option<NodeId>,
        implements: Vec<NodeId>,
        members: Vec<NodeId>,
    },
    Interface {
        name: InternedString,
        type_params: Vec<NodeId>,
        extends: Vec<NodeId>,
        members: Vec<NodeId>,
    },
    Enum { name: InternedString, members: Vec<NodeId> },
    EnumMember { name: InternedString },
    /// Functions, methods, constructors, accessors, and inline function
    /// expressions, discriminated by `kind`. A `body` of `None` marks an
    /// overload stub (or ambient declaration).
    Func {
        name: Option<InternedString>,
        kind: FuncKind,
        type_params: Vec<NodeId>,
        params: Vec<NodeId>,
        return_ty: Option<NodeId>,
        body: Option<NodeId>,
    },
    Param { name: InternedString, ty: Option<NodeId>, init: Option<NodeId> },
    TypeParam { name: InternedString, constraint: Option<NodeId> },
    Var { name: InternedString, ty: Option<NodeId>, init: Option<NodeId> },
    /// Instance or static field of a class.
    Field { name: InternedString, ty: Option<NodeId>, init: Option<NodeId> },

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------
    Block { statements: Vec<NodeId> },
    ExprStmt { expr: NodeId },
    Return { expr: Option<NodeId> },
    If { cond: NodeId, then_branch: NodeId, else_branch: Option<NodeId> },
    While { cond: NodeId, body: NodeId },
    /// `for (index in target) body`
    ForIn { index: NodeId, target: NodeId, body: NodeId },
    Throw { expr: NodeId },

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------
    Ident { name: InternedString },
    NumberLit { value: f64 },
    StringLit { value: InternedString },
    BoolLit { value: bool },
    NullLit,
    UndefinedLit,
    ArrayLit { elements: Vec<NodeId> },
    ObjectLit { members: Vec<NodeId> },
    ObjectLitMember { name: InternedString, value: NodeId },
    /// `object.name`
    Member { object: NodeId, name: InternedString },
    /// `object[index]`
    Index { object: NodeId, index: NodeId },
    Call { target: NodeId, type_args: Vec<NodeId>, args: Vec<NodeId> },
    New { target: NodeId, type_args: Vec<NodeId>, args: Vec<NodeId> },
    Binary { op: BinaryOp, left: NodeId, right: NodeId },
    Unary { op: UnaryOp, operand: NodeId },
    Cond { cond: NodeId, then_expr: NodeId, else_expr: NodeId },
    Paren { expr: NodeId },
    /// `<T>expr` type assertion.
    Cast { ty: NodeId, expr: NodeId },
    This,
    Super,

    // ------------------------------------------------------------------
    // Type annotations
    // ------------------------------------------------------------------
    PrimType { prim: PrimTypeKind },
    /// A possibly module-qualified, possibly generic named type reference.
    TypeRef { name: Vec<InternedString>, type_args: Vec<NodeId> },
    ArrayType { element: NodeId },
    /// `(params) => ret` function type; lowers to an object type with one
    /// call signature.
    FuncType { params: Vec<NodeId>, return_ty: NodeId },
    /// `{ members }` structural type literal.
    ObjectType { members: Vec<NodeId> },
    PropertySig { name: InternedString, ty: Option<NodeId> },
    CallSig { type_params: Vec<NodeId>, params: Vec<NodeId>, return_ty: Option<NodeId> },
    ConstructSig { params: Vec<NodeId>, return_ty: Option<NodeId> },
    IndexSig { param: NodeId, return_ty: Option<NodeId> },
    /// A string-literal type position, e.g. a specialized overload parameter.
    StringLitType { value: InternedString },
}

/// A syntax node: identity, source span, modifier flags, payload.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub span: TextSpan,
    pub flags: NodeFlags,
    pub kind: NodeKind,
}

/// The node arena for one compilation session. All units share one arena so
/// a `NodeId` is unambiguous session-wide.
#[derive(Debug, Default)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    pub fn new() -> Self {
        Self { nodes: Vec::with_capacity(256) }
    }

    /// Allocate a node and return its handle.
    pub fn push(&mut self, span: TextSpan, flags: NodeFlags, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { id, span, flags, kind });
        id
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    #[inline]
    pub fn span(&self, id: NodeId) -> TextSpan {
        self.nodes[id.index()].span
    }

    #[inline]
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.nodes[id.index()].flags
    }

    /// Add modifier flags to an already-allocated node.
    pub fn add_flags(&mut self, id: NodeId, flags: NodeFlags) {
        self.nodes[id.index()].flags |= flags;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
