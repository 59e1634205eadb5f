//! Programmatic node construction.
//!
//! The parser is an external collaborator, so tests (and any embedder that
//! wants to synthesize code) build trees through this API. Every node gets
//! a distinct synthetic span, which keeps diagnostics addressable in tests.

use crate::node::{Ast, BinaryOp, FuncKind, NodeKind, PrimTypeKind, UnaryOp};
use crate::types::{NodeFlags, NodeId};
use strata_core::intern::{InternedString, StringInterner};
use strata_core::text::TextSpan;

/// Builds nodes into an [`Ast`] arena.
pub struct AstBuilder {
    ast: Ast,
    interner: StringInterner,
    next_pos: u32,
}

impl AstBuilder {
    pub fn new(interner: StringInterner) -> Self {
        Self { ast: Ast::new(), interner, next_pos: 0 }
    }

    pub fn finish(self) -> Ast {
        self.ast
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn name(&self, text: &str) -> InternedString {
        self.interner.intern(text)
    }

    fn next_span(&mut self) -> TextSpan {
        let span = TextSpan::new(self.next_pos, 1);
        self.next_pos += 1;
        span
    }

    /// Allocate a node with a fresh synthetic span.
    pub fn push(&mut self, kind: NodeKind) -> NodeId {
        let span = self.next_span();
        self.ast.push(span, NodeFlags::NONE, kind)
    }

    /// Allocate a node carrying modifier flags.
    pub fn push_flagged(&mut self, flags: NodeFlags, kind: NodeKind) -> NodeId {
        let span = self.next_span();
        self.ast.push(span, flags, kind)
    }

    /// Add flags to an existing node (e.g. mark a declaration exported).
    pub fn mark(&mut self, id: NodeId, flags: NodeFlags) -> NodeId {
        self.ast.add_flags(id, flags);
        id
    }

    // ------------------------------------------------------------------
    // Structure and declarations
    // ------------------------------------------------------------------

    pub fn unit(&mut self, name: &str, statements: Vec<NodeId>) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::Unit { name, statements })
    }

    pub fn module(&mut self, name: &str, body: Vec<NodeId>) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::Module { name, body })
    }

    pub fn class(
        &mut self,
        name: &str,
        extends: Option<NodeId>,
        implements: Vec<NodeId>,
        members: Vec<NodeId>,
    ) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::Class { name, type_params: vec![], extends, implements, members })
    }

    pub fn generic_class(
        &mut self,
        name: &str,
        type_params: Vec<NodeId>,
        extends: Option<NodeId>,
        implements: Vec<NodeId>,
        members: Vec<NodeId>,
    ) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::Class { name, type_params, extends, implements, members })
    }

    pub fn interface(&mut self, name: &str, extends: Vec<NodeId>, members: Vec<NodeId>) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::Interface { name, type_params: vec![], extends, members })
    }

    pub fn generic_interface(
        &mut self,
        name: &str,
        type_params: Vec<NodeId>,
        extends: Vec<NodeId>,
        members: Vec<NodeId>,
    ) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::Interface { name, type_params, extends, members })
    }

    pub fn enum_decl(&mut self, name: &str, members: &[&str]) -> NodeId {
        let member_ids: Vec<NodeId> = members
            .iter()
            .map(|m| {
                let name = self.name(m);
                self.push(NodeKind::EnumMember { name })
            })
            .collect();
        let name = self.name(name);
        self.push(NodeKind::Enum { name, members: member_ids })
    }

    pub fn func(
        &mut self,
        name: &str,
        params: Vec<NodeId>,
        return_ty: Option<NodeId>,
        body: Option<NodeId>,
    ) -> NodeId {
        let name = Some(self.name(name));
        self.push(NodeKind::Func {
            name,
            kind: FuncKind::Function,
            type_params: vec![],
            params,
            return_ty,
            body,
        })
    }

    pub fn generic_func(
        &mut self,
        name: &str,
        type_params: Vec<NodeId>,
        params: Vec<NodeId>,
        return_ty: Option<NodeId>,
        body: Option<NodeId>,
    ) -> NodeId {
        let name = Some(self.name(name));
        self.push(NodeKind::Func {
            name,
            kind: FuncKind::Function,
            type_params,
            params,
            return_ty,
            body,
        })
    }

    pub fn method(
        &mut self,
        name: &str,
        params: Vec<NodeId>,
        return_ty: Option<NodeId>,
        body: Option<NodeId>,
    ) -> NodeId {
        let name = Some(self.name(name));
        self.push(NodeKind::Func {
            name,
            kind: FuncKind::Method,
            type_params: vec![],
            params,
            return_ty,
            body,
        })
    }

    pub fn ctor(&mut self, params: Vec<NodeId>, body: Option<NodeId>) -> NodeId {
        self.push(NodeKind::Func {
            name: None,
            kind: FuncKind::Constructor,
            type_params: vec![],
            params,
            return_ty: None,
            body,
        })
    }

    pub fn getter(&mut self, name: &str, return_ty: Option<NodeId>, body: NodeId) -> NodeId {
        let name = Some(self.name(name));
        self.push(NodeKind::Func {
            name,
            kind: FuncKind::Getter,
            type_params: vec![],
            params: vec![],
            return_ty,
            body: Some(body),
        })
    }

    pub fn setter(&mut self, name: &str, param: NodeId, body: NodeId) -> NodeId {
        let name = Some(self.name(name));
        self.push(NodeKind::Func {
            name,
            kind: FuncKind::Setter,
            type_params: vec![],
            params: vec![param],
            return_ty: None,
            body: Some(body),
        })
    }

    pub fn func_expr(
        &mut self,
        params: Vec<NodeId>,
        return_ty: Option<NodeId>,
        body: NodeId,
    ) -> NodeId {
        self.push(NodeKind::Func {
            name: None,
            kind: FuncKind::Expression,
            type_params: vec![],
            params,
            return_ty,
            body: Some(body),
        })
    }

    pub fn arrow(&mut self, params: Vec<NodeId>, return_ty: Option<NodeId>, body: NodeId) -> NodeId {
        self.push_flagged(
            NodeFlags::ARROW,
            NodeKind::Func {
                name: None,
                kind: FuncKind::Expression,
                type_params: vec![],
                params,
                return_ty,
                body: Some(body),
            },
        )
    }

    pub fn param(&mut self, name: &str, ty: Option<NodeId>) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::Param { name, ty, init: None })
    }

    pub fn opt_param(&mut self, name: &str, ty: Option<NodeId>) -> NodeId {
        let name = self.name(name);
        self.push_flagged(NodeFlags::OPTIONAL, NodeKind::Param { name, ty, init: None })
    }

    pub fn rest_param(&mut self, name: &str, ty: Option<NodeId>) -> NodeId {
        let name = self.name(name);
        self.push_flagged(NodeFlags::VARIADIC, NodeKind::Param { name, ty, init: None })
    }

    /// A `public name: T` / `private name: T` constructor parameter property.
    pub fn property_param(&mut self, name: &str, ty: Option<NodeId>, private: bool) -> NodeId {
        let name = self.name(name);
        let mut flags = NodeFlags::PROPERTY;
        if private {
            flags |= NodeFlags::PRIVATE;
        }
        self.push_flagged(flags, NodeKind::Param { name, ty, init: None })
    }

    pub fn type_param(&mut self, name: &str, constraint: Option<NodeId>) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::TypeParam { name, constraint })
    }

    pub fn var(&mut self, name: &str, ty: Option<NodeId>, init: Option<NodeId>) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::Var { name, ty, init })
    }

    pub fn field(&mut self, name: &str, ty: Option<NodeId>, init: Option<NodeId>) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::Field { name, ty, init })
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    pub fn block(&mut self, statements: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::Block { statements })
    }

    pub fn expr_stmt(&mut self, expr: NodeId) -> NodeId {
        self.push(NodeKind::ExprStmt { expr })
    }

    pub fn ret(&mut self, expr: Option<NodeId>) -> NodeId {
        self.push(NodeKind::Return { expr })
    }

    pub fn if_stmt(&mut self, cond: NodeId, then_branch: NodeId, else_branch: Option<NodeId>) -> NodeId {
        self.push(NodeKind::If { cond, then_branch, else_branch })
    }

    pub fn while_stmt(&mut self, cond: NodeId, body: NodeId) -> NodeId {
        self.push(NodeKind::While { cond, body })
    }

    pub fn for_in(&mut self, index: NodeId, target: NodeId, body: NodeId) -> NodeId {
        self.push(NodeKind::ForIn { index, target, body })
    }

    pub fn throw(&mut self, expr: NodeId) -> NodeId {
        self.push(NodeKind::Throw { expr })
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    pub fn ident(&mut self, name: &str) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::Ident { name })
    }

    pub fn num(&mut self, value: f64) -> NodeId {
        self.push(NodeKind::NumberLit { value })
    }

    pub fn str(&mut self, value: &str) -> NodeId {
        let value = self.name(value);
        self.push(NodeKind::StringLit { value })
    }

    pub fn bool(&mut self, value: bool) -> NodeId {
        self.push(NodeKind::BoolLit { value })
    }

    pub fn null(&mut self) -> NodeId {
        self.push(NodeKind::NullLit)
    }

    pub fn undefined(&mut self) -> NodeId {
        self.push(NodeKind::UndefinedLit)
    }

    pub fn array(&mut self, elements: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::ArrayLit { elements })
    }

    pub fn object(&mut self, members: Vec<(&str, NodeId)>) -> NodeId {
        let member_ids: Vec<NodeId> = members
            .into_iter()
            .map(|(name, value)| {
                let name = self.name(name);
                self.push(NodeKind::ObjectLitMember { name, value })
            })
            .collect();
        self.push(NodeKind::ObjectLit { members: member_ids })
    }

    pub fn member(&mut self, object: NodeId, name: &str) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::Member { object, name })
    }

    pub fn index(&mut self, object: NodeId, index: NodeId) -> NodeId {
        self.push(NodeKind::Index { object, index })
    }

    pub fn call(&mut self, target: NodeId, args: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::Call { target, type_args: vec![], args })
    }

    pub fn generic_call(&mut self, target: NodeId, type_args: Vec<NodeId>, args: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::Call { target, type_args, args })
    }

    pub fn new_expr(&mut self, target: NodeId, args: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::New { target, type_args: vec![], args })
    }

    pub fn binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId) -> NodeId {
        self.push(NodeKind::Binary { op, left, right })
    }

    pub fn assign(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.push(NodeKind::Binary { op: BinaryOp::Assign, left, right })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: NodeId) -> NodeId {
        self.push(NodeKind::Unary { op, operand })
    }

    pub fn cond(&mut self, cond: NodeId, then_expr: NodeId, else_expr: NodeId) -> NodeId {
        self.push(NodeKind::Cond { cond, then_expr, else_expr })
    }

    pub fn paren(&mut self, expr: NodeId) -> NodeId {
        self.push(NodeKind::Paren { expr })
    }

    pub fn cast(&mut self, ty: NodeId, expr: NodeId) -> NodeId {
        self.push(NodeKind::Cast { ty, expr })
    }

    pub fn this(&mut self) -> NodeId {
        self.push(NodeKind::This)
    }

    pub fn super_expr(&mut self) -> NodeId {
        self.push(NodeKind::Super)
    }

    // ------------------------------------------------------------------
    // Type annotations
    // ------------------------------------------------------------------

    pub fn any_ty(&mut self) -> NodeId {
        self.push(NodeKind::PrimType { prim: PrimTypeKind::Any })
    }

    pub fn number_ty(&mut self) -> NodeId {
        self.push(NodeKind::PrimType { prim: PrimTypeKind::Number })
    }

    pub fn string_ty(&mut self) -> NodeId {
        self.push(NodeKind::PrimType { prim: PrimTypeKind::String })
    }

    pub fn boolean_ty(&mut self) -> NodeId {
        self.push(NodeKind::PrimType { prim: PrimTypeKind::Boolean })
    }

    pub fn void_ty(&mut self) -> NodeId {
        self.push(NodeKind::PrimType { prim: PrimTypeKind::Void })
    }

    pub fn type_ref(&mut self, name: &str) -> NodeId {
        let name = vec![self.name(name)];
        self.push(NodeKind::TypeRef { name, type_args: vec![] })
    }

    pub fn generic_type_ref(&mut self, name: &str, type_args: Vec<NodeId>) -> NodeId {
        let name = vec![self.name(name)];
        self.push(NodeKind::TypeRef { name, type_args })
    }

    /// A module-qualified reference like `A.B.T`.
    pub fn qualified_type_ref(&mut self, path: &[&str]) -> NodeId {
        let name = path.iter().map(|p| self.name(p)).collect();
        self.push(NodeKind::TypeRef { name, type_args: vec![] })
    }

    pub fn array_ty(&mut self, element: NodeId) -> NodeId {
        self.push(NodeKind::ArrayType { element })
    }

    pub fn func_ty(&mut self, params: Vec<NodeId>, return_ty: NodeId) -> NodeId {
        self.push(NodeKind::FuncType { params, return_ty })
    }

    pub fn object_ty(&mut self, members: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::ObjectType { members })
    }

    pub fn prop_sig(&mut self, name: &str, ty: Option<NodeId>) -> NodeId {
        let name = self.name(name);
        self.push(NodeKind::PropertySig { name, ty })
    }

    pub fn call_sig(&mut self, params: Vec<NodeId>, return_ty: Option<NodeId>) -> NodeId {
        self.push(NodeKind::CallSig { type_params: vec![], params, return_ty })
    }

    pub fn construct_sig(&mut self, params: Vec<NodeId>, return_ty: Option<NodeId>) -> NodeId {
        self.push(NodeKind::ConstructSig { params, return_ty })
    }

    pub fn index_sig(&mut self, param: NodeId, return_ty: Option<NodeId>) -> NodeId {
        self.push(NodeKind::IndexSig { param, return_ty })
    }

    pub fn string_lit_ty(&mut self, value: &str) -> NodeId {
        let value = self.name(value);
        self.push(NodeKind::StringLitType { value })
    }
}
