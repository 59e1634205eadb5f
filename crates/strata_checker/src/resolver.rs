//! Lazy type resolution.
//!
//! Symbols resolve on first use. A symbol moves `Unresolved -> Resolving ->
//! Resolved` (with a `ResolvingSpecialized` detour when a generic is
//! specialized mid-resolution) and never backward; re-entering a
//! `Resolving` symbol yields its partial type, or `any` when none has been
//! published yet. Class and interface resolution publishes an empty shell
//! before filling members, so cyclic references close onto the shell.

use crate::checker::Checker;
use crate::context::ResolutionContext;
use crate::types::{IndexSignature, Member, Param, Shape, Signature, TypeKind};
use strata_ast::node::{BinaryOp, FuncKind, NodeKind, PrimTypeKind, UnaryOp};
use strata_ast::types::{DeclId, NodeFlags, NodeId, SymbolId, TypeId};
use strata_binder::{DeclFlags, DeclKind, SymbolFlags, SymbolState};
use strata_core::intern::InternedString;
use strata_diagnostics::messages;
use tracing::trace;

impl Checker {
    // ========================================================================
    // Symbol resolution
    // ========================================================================

    /// The type of a symbol, computing it on first request.
    pub fn resolve_symbol(&mut self, symbol: SymbolId) -> TypeId {
        match self.binder.symbol(symbol).state {
            SymbolState::Resolved => self.binder.symbol(symbol).ty.unwrap_or(self.types.any_type),
            // Re-entry during resolution: hand back the partial type, or
            // any when nothing has been published yet.
            SymbolState::Resolving | SymbolState::ResolvingSpecialized => {
                self.binder.symbol(symbol).ty.unwrap_or(self.types.any_type)
            }
            SymbolState::Unresolved => {
                self.binder.symbol_mut(symbol).state = SymbolState::Resolving;
                let ty = self.compute_symbol_type(symbol);
                let entry = self.binder.symbol_mut(symbol);
                entry.ty = Some(ty);
                entry.state = SymbolState::Resolved;
                ty
            }
        }
    }

    fn compute_symbol_type(&mut self, symbol: SymbolId) -> TypeId {
        let flags = self.binder.symbol(symbol).flags;
        trace!(symbol = ?symbol, ?flags, "resolving symbol");
        if flags.contains(SymbolFlags::CLASS) {
            return self.resolve_class(symbol);
        }
        if flags.contains(SymbolFlags::INTERFACE) {
            return self.resolve_interface(symbol);
        }
        if flags.contains(SymbolFlags::ENUM) {
            return self.resolve_enum(symbol);
        }
        if flags.contains(SymbolFlags::ENUM_MEMBER) {
            let decl = self.binder.symbol(symbol).primary_decl();
            let parent = self.binder.decl(decl).parent.expect("enum member outside enum");
            let parent_symbol = self.binder.decl(parent).symbol;
            return self.resolve_symbol(parent_symbol);
        }
        if flags.contains(SymbolFlags::TYPE_PARAMETER) {
            return self.resolve_type_parameter(symbol);
        }
        if flags.intersects(SymbolFlags::ACCESSOR) {
            return self.resolve_accessor(symbol);
        }
        if flags.intersects(SymbolFlags::FUNCTION | SymbolFlags::METHOD | SymbolFlags::CONSTRUCTOR) {
            return self.resolve_function_group(symbol);
        }
        if flags.contains(SymbolFlags::MODULE) {
            return self.resolve_module(symbol);
        }
        if flags.intersects(SymbolFlags::VARIABLE | SymbolFlags::PARAMETER | SymbolFlags::PROPERTY) {
            return self.resolve_variable_like(symbol);
        }
        self.types.any_type
    }

    // ------------------------------------------------------------------
    // Classes and interfaces
    // ------------------------------------------------------------------

    fn resolve_class(&mut self, symbol: SymbolId) -> TypeId {
        let decl_id = self.binder.symbol(symbol).primary_decl();
        let node = self.binder.decl(decl_id).node;
        let NodeKind::Class { type_params, extends, implements, .. } = self.ast.kind(node).clone()
        else {
            return self.types.error_type;
        };

        // Publish the shell before touching anything that could recurse.
        let shell = self.types.add_for_symbol(
            symbol,
            TypeKind::Named {
                shape: Shape::default(),
                base_types: Vec::new(),
                type_params: Vec::new(),
                type_args: Vec::new(),
                is_class: true,
            },
        );
        self.binder.symbol_mut(symbol).ty = Some(shell);

        let tparams = self.resolve_type_param_list(&type_params);
        if let TypeKind::Named { type_params, .. } = &mut self.types.get_mut(shell).kind {
            *type_params = tparams;
        }

        let ctx = ResolutionContext::new(decl_id);
        let mut bases = Vec::new();
        if let Some(extends) = extends {
            let base = self.resolve_type_annotation(&ctx, extends);
            if self.base_is_class(base) {
                bases.push(base);
            } else if !self.types.is_error(base) {
                self.error_at(false, extends, &messages::A_CLASS_MAY_ONLY_EXTEND_ANOTHER_CLASS, &[]);
            }
        }
        for implement in &implements {
            let base = self.resolve_type_annotation(&ctx, *implement);
            if matches!(self.types.kind(base), TypeKind::Named { .. }) {
                bases.push(base);
            } else if !self.types.is_error(base) {
                self.error_at(
                    false,
                    *implement,
                    &messages::A_CLASS_MAY_ONLY_IMPLEMENT_A_CLASS_OR_INTERFACE,
                    &[],
                );
            }
        }
        if let TypeKind::Named { base_types, .. } = &mut self.types.get_mut(shell).kind {
            *base_types = bases;
        }

        // Members, statics, and constructors, in declaration order.
        let children = self.binder.decl(decl_id).children.clone();
        let mut instance = Shape::default();
        let mut statics = Shape::default();
        let mut ctor_decls: Vec<DeclId> = Vec::new();
        for child in children {
            let child_decl = self.binder.decl(child);
            let kind = child_decl.kind;
            let child_symbol = child_decl.symbol;
            match kind {
                DeclKind::Constructor => ctor_decls.push(child),
                DeclKind::Field | DeclKind::Method | DeclKind::GetAccessor | DeclKind::SetAccessor => {
                    let Some(name) = child_decl.name else { continue };
                    let is_static = child_decl.is_static();
                    let target = if is_static { &statics } else { &instance };
                    if target.members.contains_key(&name) {
                        continue;
                    }
                    let member = self.resolve_class_member(child_symbol);
                    if is_static {
                        statics.members.insert(name, member);
                    } else {
                        instance.members.insert(name, member);
                    }
                }
                _ => {}
            }
        }
        if let TypeKind::Named { shape, .. } = &mut self.types.get_mut(shell).kind {
            *shape = instance;
        }
        self.flush_pending_specializations(shell);

        // The class value: a constructor-function type carrying construct
        // signatures and static members.
        let tparams = match self.types.kind(shell) {
            TypeKind::Named { type_params, .. } => type_params.clone(),
            _ => Vec::new(),
        };
        let mut construct_signatures = Vec::new();
        for ctor in &ctor_decls {
            let mut sig = self.signature_of_decl(*ctor, None);
            sig.type_params = tparams.clone();
            sig.return_type = shell;
            construct_signatures.push(sig);
        }
        if construct_signatures.is_empty() {
            construct_signatures.push(Signature {
                type_params: tparams,
                params: Vec::new(),
                has_rest: false,
                return_type: shell,
                is_definition: true,
                specialized: false,
                decl: None,
            });
        }
        statics.construct_signatures = construct_signatures;
        let container = self.types.add_for_symbol(symbol, TypeKind::Object(statics));
        self.container_types.insert(symbol, container);
        shell
    }

    fn resolve_class_member(&mut self, symbol: SymbolId) -> Member {
        let ty = self.resolve_symbol(symbol);
        let decl_id = self.binder.symbol(symbol).primary_decl();
        let decl = self.binder.decl(decl_id);
        Member {
            ty,
            optional: decl.flags.contains(DeclFlags::OPTIONAL),
            private: decl.is_private(),
            origin: Some(decl_id),
        }
    }

    fn base_is_class(&self, base: TypeId) -> bool {
        matches!(self.types.kind(base), TypeKind::Named { is_class: true, .. })
    }

    fn resolve_interface(&mut self, symbol: SymbolId) -> TypeId {
        let decls = self.binder.symbol(symbol).declarations.clone();
        let shell = self.types.add_for_symbol(
            symbol,
            TypeKind::Named {
                shape: Shape::default(),
                base_types: Vec::new(),
                type_params: Vec::new(),
                type_args: Vec::new(),
                is_class: false,
            },
        );
        self.binder.symbol_mut(symbol).ty = Some(shell);

        // Merged declarations share the first declaration's type parameters.
        let first_node = self.binder.decl(decls[0]).node;
        if let NodeKind::Interface { type_params, .. } = self.ast.kind(first_node).clone() {
            let tparams = self.resolve_type_param_list(&type_params);
            if let TypeKind::Named { type_params, .. } = &mut self.types.get_mut(shell).kind {
                *type_params = tparams;
            }
        }

        let mut shape = Shape::default();
        let mut bases = Vec::new();
        for decl_id in decls {
            let node = self.binder.decl(decl_id).node;
            let NodeKind::Interface { extends, members, .. } = self.ast.kind(node).clone() else {
                continue;
            };
            let ctx = ResolutionContext::new(decl_id);
            for extend in &extends {
                let base = self.resolve_type_annotation(&ctx, *extend);
                if matches!(self.types.kind(base), TypeKind::Named { .. }) {
                    bases.push(base);
                } else if !self.types.is_error(base) {
                    self.error_at(
                        false,
                        *extend,
                        &messages::AN_INTERFACE_MAY_ONLY_EXTEND_A_CLASS_OR_INTERFACE,
                        &[],
                    );
                }
            }
            // Named members resolve through their symbols; bare signatures
            // come straight off the syntax.
            let children = self.binder.decl(decl_id).children.clone();
            for child in children {
                let child_decl = self.binder.decl(child);
                let Some(name) = child_decl.name else { continue };
                if !matches!(child_decl.kind, DeclKind::Field | DeclKind::Method) {
                    continue;
                }
                if shape.members.contains_key(&name) {
                    continue;
                }
                let child_symbol = child_decl.symbol;
                let member = self.resolve_class_member(child_symbol);
                shape.members.insert(name, member);
            }
            for member in &members {
                match self.ast.kind(*member).clone() {
                    NodeKind::CallSig { .. } => {
                        let sig = self.signature_of_sig_node(&ctx, *member);
                        shape.call_signatures.push(sig);
                    }
                    NodeKind::ConstructSig { .. } => {
                        let sig = self.signature_of_sig_node(&ctx, *member);
                        shape.construct_signatures.push(sig);
                    }
                    NodeKind::IndexSig { param, return_ty } => {
                        let key = match self.ast.kind(param) {
                            NodeKind::Param { ty: Some(ty), .. } => {
                                self.resolve_type_annotation(&ctx, *ty)
                            }
                            _ => self.types.string_type,
                        };
                        let value = match return_ty {
                            Some(return_ty) => self.resolve_type_annotation(&ctx, return_ty),
                            None => self.types.any_type,
                        };
                        shape.index_signatures.push(IndexSignature { key, value });
                    }
                    _ => {}
                }
            }
        }
        if let TypeKind::Named { shape: s, base_types, .. } = &mut self.types.get_mut(shell).kind {
            *s = shape;
            *base_types = bases;
        }
        self.flush_pending_specializations(shell);
        shell
    }

    fn resolve_type_param_list(&mut self, nodes: &[NodeId]) -> Vec<TypeId> {
        let decls: Vec<DeclId> =
            nodes.iter().filter_map(|&n| self.binder.decl_of_node(n)).collect();
        decls
            .into_iter()
            .map(|d| {
                let symbol = self.binder.decl(d).symbol;
                self.resolve_symbol(symbol)
            })
            .collect()
    }

    fn resolve_type_parameter(&mut self, symbol: SymbolId) -> TypeId {
        let decl_id = self.binder.symbol(symbol).primary_decl();
        let node = self.binder.decl(decl_id).node;
        let parent = self.binder.decl(decl_id).parent;
        let NodeKind::TypeParam { constraint, .. } = self.ast.kind(node).clone() else {
            return self.types.error_type;
        };
        // The type must exist before the constraint resolves, or a
        // constraint mentioning a sibling parameter would recurse forever.
        let ty = self.types.add_for_symbol(symbol, TypeKind::TypeParameter { constraint: None });
        self.binder.symbol_mut(symbol).ty = Some(ty);
        if let Some(constraint_node) = constraint {
            let ctx = ResolutionContext::new(parent.unwrap_or(decl_id));
            let constraint_ty = self.resolve_type_annotation(&ctx, constraint_node);
            if let TypeKind::TypeParameter { constraint } = &mut self.types.get_mut(ty).kind {
                *constraint = Some(constraint_ty);
            }
        }
        ty
    }

    // ------------------------------------------------------------------
    // Enums and modules
    // ------------------------------------------------------------------

    fn resolve_enum(&mut self, symbol: SymbolId) -> TypeId {
        let ty = self.types.add_for_symbol(symbol, TypeKind::Enum);
        self.binder.symbol_mut(symbol).ty = Some(ty);
        let decl_id = self.binder.symbol(symbol).primary_decl();
        let children = self.binder.decl(decl_id).children.clone();
        let mut shape = Shape::default();
        for child in children {
            let child_decl = self.binder.decl(child);
            if child_decl.kind != DeclKind::EnumMember {
                continue;
            }
            let Some(name) = child_decl.name else { continue };
            shape
                .members
                .insert(name, Member { ty, optional: false, private: false, origin: Some(child) });
        }
        // Reverse lookup: indexing an enum object by number yields the
        // member name.
        shape
            .index_signatures
            .push(IndexSignature { key: self.types.number_type, value: self.types.string_type });
        let container = self.types.add_for_symbol(symbol, TypeKind::Object(shape));
        self.container_types.insert(symbol, container);
        ty
    }

    fn resolve_module(&mut self, symbol: SymbolId) -> TypeId {
        let decls = self.binder.symbol(symbol).declarations.clone();
        let mut shape = Shape::default();
        for decl_id in decls {
            let exports: Vec<(InternedString, SymbolId)> =
                self.binder.decl(decl_id).members.iter().map(|(k, v)| (*k, *v)).collect();
            for (name, export) in exports {
                if shape.members.contains_key(&name) {
                    continue;
                }
                if !self.binder.symbol(export).is_value() {
                    continue;
                }
                let ty = self.value_type_of_symbol(export);
                shape
                    .members
                    .insert(name, Member { ty, optional: false, private: false, origin: None });
            }
        }
        let ty = self.types.add_for_symbol(symbol, TypeKind::Object(shape));
        self.container_types.insert(symbol, ty);
        ty
    }

    // ------------------------------------------------------------------
    // Functions, accessors, variables
    // ------------------------------------------------------------------

    fn resolve_function_group(&mut self, symbol: SymbolId) -> TypeId {
        let decls = self.binder.symbol(symbol).declarations.clone();
        let mut signatures: Vec<Signature> = Vec::new();
        for decl_id in decls {
            if !self.binder.decl(decl_id).kind.is_function_like() {
                continue;
            }
            signatures.push(self.signature_of_decl(decl_id, None));
        }
        let mut shape = Shape::default();
        shape.call_signatures = signatures;
        self.types.add_for_symbol(symbol, TypeKind::Object(shape))
    }

    fn resolve_accessor(&mut self, symbol: SymbolId) -> TypeId {
        let decls = self.binder.symbol(symbol).declarations.clone();
        // The getter's return annotation wins; a setter's parameter
        // annotation is the fallback. Symmetry is enforced by the checking
        // pass.
        for &decl_id in &decls {
            if self.binder.decl(decl_id).kind != DeclKind::GetAccessor {
                continue;
            }
            let node = self.binder.decl(decl_id).node;
            if let NodeKind::Func { return_ty: Some(return_ty), .. } = self.ast.kind(node).clone() {
                let ctx = ResolutionContext::new(decl_id);
                return self.resolve_type_annotation(&ctx, return_ty);
            }
        }
        for &decl_id in &decls {
            if self.binder.decl(decl_id).kind != DeclKind::SetAccessor {
                continue;
            }
            let node = self.binder.decl(decl_id).node;
            if let NodeKind::Func { params, .. } = self.ast.kind(node).clone() {
                if let Some(&param) = params.first() {
                    if let NodeKind::Param { ty: Some(ty), .. } = self.ast.kind(param).clone() {
                        let ctx = ResolutionContext::new(decl_id);
                        return self.resolve_type_annotation(&ctx, ty);
                    }
                }
            }
        }
        // Unannotated pair: infer from the getter body.
        for &decl_id in &decls {
            if self.binder.decl(decl_id).kind != DeclKind::GetAccessor {
                continue;
            }
            let sig = self.signature_of_decl(decl_id, None);
            return sig.return_type;
        }
        self.types.any_type
    }

    fn resolve_variable_like(&mut self, symbol: SymbolId) -> TypeId {
        let decl_id = self.binder.symbol(symbol).primary_decl();
        self.declared_type_of(decl_id)
    }

    /// The type a single variable-like declaration states or implies:
    /// annotation first, widened initializer second, `any` last.
    pub(crate) fn declared_type_of(&mut self, decl_id: DeclId) -> TypeId {
        let decl = self.binder.decl(decl_id);
        let node = decl.node;
        let scope = decl.parent.unwrap_or(decl_id);
        let ctx = ResolutionContext::new(scope);
        let (ty, init) = match self.ast.kind(node).clone() {
            NodeKind::Var { ty, init, .. }
            | NodeKind::Field { ty, init, .. }
            | NodeKind::Param { ty, init, .. } => (ty, init),
            NodeKind::PropertySig { ty, .. } => (ty, None),
            NodeKind::ObjectLitMember { value, .. } => (None, Some(value)),
            _ => (None, None),
        };
        if let Some(ty) = ty {
            return self.resolve_type_annotation(&ctx, ty);
        }
        if let Some(init) = init {
            let init_ty = self.resolve_expression(&ctx, init);
            return self.widen(init_ty);
        }
        self.types.any_type
    }

    /// Build a signature from a function-like declaration. `contextual`
    /// supplies parameter types for unannotated parameters of function
    /// expressions.
    pub(crate) fn signature_of_decl(
        &mut self,
        decl_id: DeclId,
        contextual: Option<&Signature>,
    ) -> Signature {
        let node = self.binder.decl(decl_id).node;
        let NodeKind::Func { type_params, params, return_ty, body, kind, .. } =
            self.ast.kind(node).clone()
        else {
            return Signature {
                type_params: Vec::new(),
                params: Vec::new(),
                has_rest: false,
                return_type: self.types.any_type,
                is_definition: false,
                specialized: false,
                decl: Some(decl_id),
            };
        };
        let ctx = ResolutionContext::new(decl_id);
        let tparams = self.resolve_type_param_list(&type_params);

        let mut sig_params = Vec::new();
        let mut has_rest = false;
        let mut specialized = false;
        for (i, &param) in params.iter().enumerate() {
            let NodeKind::Param { name, ty, init } = self.ast.kind(param).clone() else { continue };
            let flags = self.ast.flags(param);
            let rest = flags.contains(NodeFlags::VARIADIC);
            let optional = flags.contains(NodeFlags::OPTIONAL) || init.is_some();
            if rest {
                has_rest = true;
            }
            if let Some(ty) = ty {
                if matches!(self.ast.kind(ty), NodeKind::StringLitType { .. }) {
                    specialized = true;
                }
            }
            let param_ty = match ty {
                Some(ty) => self.resolve_type_annotation(&ctx, ty),
                None => match (contextual, init) {
                    (Some(contextual), _) => self
                        .param_type_at(contextual, i)
                        .unwrap_or(self.types.any_type),
                    (None, Some(init)) => {
                        let t = self.resolve_expression(&ctx, init);
                        self.widen(t)
                    }
                    (None, None) => self.types.any_type,
                },
            };
            // Record the parameter's type so body checking sees it.
            if let Some(param_decl) = self.binder.decl_of_node(param) {
                let param_symbol = self.binder.decl(param_decl).symbol;
                let entry = self.binder.symbol_mut(param_symbol);
                if entry.state == SymbolState::Unresolved {
                    entry.ty = Some(param_ty);
                    entry.state = SymbolState::Resolved;
                }
            }
            sig_params.push(Param { name, ty: param_ty, optional, rest });
        }

        let return_type = match return_ty {
            Some(return_ty) => self.resolve_type_annotation(&ctx, return_ty),
            None => match kind {
                FuncKind::Constructor | FuncKind::Setter => self.types.void_type,
                _ => match body {
                    Some(body) => self.infer_return_type(decl_id, body),
                    None => self.types.any_type,
                },
            },
        };

        Signature {
            type_params: tparams,
            params: sig_params,
            has_rest,
            return_type,
            is_definition: body.is_some(),
            specialized,
            decl: Some(decl_id),
        }
    }

    fn infer_return_type(&mut self, decl_id: DeclId, body: NodeId) -> TypeId {
        let mut returns = Vec::new();
        self.collect_return_exprs(body, &mut returns);
        if returns.is_empty() {
            return self.types.void_type;
        }
        let ctx = self.context_for_function(decl_id);
        let mut candidates = Vec::new();
        for expr in returns {
            let ty = self.resolve_expression(&ctx, expr);
            candidates.push(self.widen(ty));
        }
        self.best_common_type(&candidates).unwrap_or(self.types.any_type)
    }

    /// All return expressions of a body, skipping nested function bodies.
    fn collect_return_exprs(&self, node: NodeId, out: &mut Vec<NodeId>) {
        match self.ast.kind(node) {
            NodeKind::Return { expr: Some(expr) } => out.push(*expr),
            NodeKind::Return { expr: None } => {}
            NodeKind::Block { statements } => {
                for &s in statements {
                    self.collect_return_exprs(s, out);
                }
            }
            NodeKind::If { then_branch, else_branch, .. } => {
                self.collect_return_exprs(*then_branch, out);
                if let Some(else_branch) = else_branch {
                    self.collect_return_exprs(*else_branch, out);
                }
            }
            NodeKind::While { body, .. } | NodeKind::ForIn { body, .. } => {
                self.collect_return_exprs(*body, out);
            }
            _ => {}
        }
    }

    /// The resolution context for statements inside a function-like
    /// declaration: scope, `this`, `super`, and the static flag.
    pub(crate) fn context_for_function(&mut self, func: DeclId) -> ResolutionContext {
        let mut ctx = ResolutionContext::new(func);
        let decl = self.binder.decl(func);
        let is_static = decl.is_static();
        let is_ctor = decl.kind == DeclKind::Constructor;
        let class = self.binder.enclosing(func, |k| k == DeclKind::Class);
        if let Some(class) = class {
            let class_symbol = self.binder.decl(class).symbol;
            let instance = self.resolve_symbol(class_symbol);
            let this_type = if is_static {
                self.container_types.get(&class_symbol).copied()
            } else {
                Some(instance)
            };
            let super_type = if is_static {
                None
            } else {
                match self.types.kind(instance) {
                    TypeKind::Named { base_types, .. } => base_types
                        .iter()
                        .copied()
                        .find(|&b| self.base_is_class(b)),
                    _ => None,
                }
            };
            ctx = ctx.with_this(this_type, super_type).with_static(is_static).with_constructor(is_ctor);
        }
        ctx
    }

    // ========================================================================
    // Type annotations
    // ========================================================================

    pub(crate) fn resolve_type_annotation(&mut self, ctx: &ResolutionContext, node: NodeId) -> TypeId {
        if let Some(&cached) = self.node_types.get(&node) {
            return cached;
        }
        let ty = match self.ast.kind(node).clone() {
            NodeKind::PrimType { prim } => match prim {
                PrimTypeKind::Any => self.types.any_type,
                PrimTypeKind::Number => self.types.number_type,
                PrimTypeKind::String => self.types.string_type,
                PrimTypeKind::Boolean => self.types.boolean_type,
                PrimTypeKind::Void => self.types.void_type,
                PrimTypeKind::Null => self.types.null_type,
                PrimTypeKind::Undefined => self.types.undefined_type,
            },
            NodeKind::StringLitType { value } => self.string_literal_type(value),
            NodeKind::ArrayType { element } => {
                let element = self.resolve_type_annotation(ctx, element);
                self.types.add(TypeKind::Array { element })
            }
            NodeKind::FuncType { params, return_ty } => {
                let sig_ctx = ctx.clone();
                let sig_params = self.resolve_annotation_params(&sig_ctx, &params);
                let has_rest = sig_params.iter().any(|p| p.rest);
                let return_type = self.resolve_type_annotation(ctx, return_ty);
                let mut shape = Shape::default();
                shape.call_signatures.push(Signature {
                    type_params: Vec::new(),
                    params: sig_params,
                    has_rest,
                    return_type,
                    is_definition: true,
                    specialized: false,
                    decl: None,
                });
                self.types.add(TypeKind::Object(shape))
            }
            NodeKind::ObjectType { members } => {
                let shape = self.resolve_object_type_members(ctx, &members);
                self.types.add(TypeKind::Object(shape))
            }
            NodeKind::TypeRef { name, type_args } => {
                self.resolve_type_reference(ctx, node, &name, &type_args)
            }
            _ => self.types.error_type,
        };
        self.node_types.insert(node, ty);
        ty
    }

    fn resolve_annotation_params(&mut self, ctx: &ResolutionContext, params: &[NodeId]) -> Vec<Param> {
        params
            .iter()
            .filter_map(|&param| {
                let NodeKind::Param { name, ty, init } = self.ast.kind(param).clone() else {
                    return None;
                };
                let flags = self.ast.flags(param);
                let param_ty = match ty {
                    Some(ty) => self.resolve_type_annotation(ctx, ty),
                    None => self.types.any_type,
                };
                Some(Param {
                    name,
                    ty: param_ty,
                    optional: flags.contains(NodeFlags::OPTIONAL) || init.is_some(),
                    rest: flags.contains(NodeFlags::VARIADIC),
                })
            })
            .collect()
    }

    fn resolve_object_type_members(&mut self, ctx: &ResolutionContext, members: &[NodeId]) -> Shape {
        let mut shape = Shape::default();
        for &member in members {
            match self.ast.kind(member).clone() {
                NodeKind::PropertySig { name, ty } => {
                    let member_ty = match ty {
                        Some(ty) => self.resolve_type_annotation(ctx, ty),
                        None => self.types.any_type,
                    };
                    let optional = self.ast.flags(member).contains(NodeFlags::OPTIONAL);
                    shape.members.insert(
                        name,
                        Member { ty: member_ty, optional, private: false, origin: None },
                    );
                }
                NodeKind::CallSig { .. } => {
                    let sig = self.signature_of_sig_node(ctx, member);
                    shape.call_signatures.push(sig);
                }
                NodeKind::ConstructSig { .. } => {
                    let sig = self.signature_of_sig_node(ctx, member);
                    shape.construct_signatures.push(sig);
                }
                NodeKind::IndexSig { param, return_ty } => {
                    let key = match self.ast.kind(param) {
                        NodeKind::Param { ty: Some(ty), .. } => self.resolve_type_annotation(ctx, *ty),
                        _ => self.types.string_type,
                    };
                    let value = match return_ty {
                        Some(return_ty) => self.resolve_type_annotation(ctx, return_ty),
                        None => self.types.any_type,
                    };
                    shape.index_signatures.push(IndexSignature { key, value });
                }
                _ => {}
            }
        }
        shape
    }

    fn signature_of_sig_node(&mut self, ctx: &ResolutionContext, node: NodeId) -> Signature {
        let (params, return_ty) = match self.ast.kind(node).clone() {
            NodeKind::CallSig { params, return_ty, .. } => (params, return_ty),
            NodeKind::ConstructSig { params, return_ty } => (params, return_ty),
            _ => (Vec::new(), None),
        };
        let sig_params = self.resolve_annotation_params(ctx, &params);
        let has_rest = sig_params.iter().any(|p| p.rest);
        let return_type = match return_ty {
            Some(return_ty) => self.resolve_type_annotation(ctx, return_ty),
            None => self.types.any_type,
        };
        Signature {
            type_params: Vec::new(),
            params: sig_params,
            has_rest,
            return_type,
            is_definition: true,
            specialized: false,
            decl: None,
        }
    }

    fn resolve_type_reference(
        &mut self,
        ctx: &ResolutionContext,
        node: NodeId,
        name: &[InternedString],
        type_args: &[NodeId],
    ) -> TypeId {
        let symbol = match self.resolve_type_name(ctx, node, name) {
            Some(symbol) => symbol,
            None => return self.types.error_type,
        };
        let ty = self.resolve_symbol(symbol);
        if !type_args.is_empty() {
            let args: Vec<TypeId> =
                type_args.iter().map(|&a| self.resolve_type_annotation(ctx, a)).collect();
            return self.specialize(ctx.provisional, node, ty, args);
        }
        if self.types.is_unspecialized_generic(ty) {
            // A bare generic name outside its own declaration means "all
            // arguments any".
            if !self.within_declaration_of(ctx.enclosing, symbol) {
                return self.specialize_to_any(node, ty);
            }
        }
        ty
    }

    fn within_declaration_of(&self, from: DeclId, symbol: SymbolId) -> bool {
        let decls = &self.binder.symbol(symbol).declarations;
        let mut current = Some(from);
        while let Some(decl) = current {
            if decls.contains(&decl) {
                return true;
            }
            current = self.binder.decl(decl).parent;
        }
        false
    }

    fn resolve_type_name(
        &mut self,
        ctx: &ResolutionContext,
        node: NodeId,
        name: &[InternedString],
    ) -> Option<SymbolId> {
        if name.len() == 1 {
            let found = self.binder.resolve_name(ctx.enclosing, name[0], SymbolFlags::TYPE);
            if found.is_none() {
                let text = self.name_text(name[0]);
                let msg = if self
                    .binder
                    .resolve_name(ctx.enclosing, name[0], SymbolFlags::VALUE)
                    .is_some()
                {
                    &messages::NAME_0_DOES_NOT_REFER_TO_A_TYPE
                } else {
                    &messages::CANNOT_FIND_NAME_0
                };
                self.error_at(ctx.provisional, node, msg, &[&text]);
            }
            return found;
        }
        // A qualified name walks module members.
        let mut container =
            match self.binder.resolve_name(ctx.enclosing, name[0], SymbolFlags::MODULE) {
                Some(symbol) => symbol,
                None => {
                    let text = self.name_text(name[0]);
                    self.error_at(ctx.provisional, node, &messages::CANNOT_FIND_MODULE_0, &[&text]);
                    return None;
                }
            };
        for (i, &segment) in name[1..].iter().enumerate() {
            let last = i == name.len() - 2;
            let container_decl = self.binder.symbol(container).primary_decl();
            let found = self
                .binder
                .symbol(container)
                .declarations
                .iter()
                .find_map(|&d| self.binder.member_of(d, segment))
                .or_else(|| self.binder.member_of(container_decl, segment));
            let Some(found) = found else {
                let text = self.name_text(segment);
                let msg = if last { &messages::CANNOT_FIND_NAME_0 } else { &messages::CANNOT_FIND_MODULE_0 };
                self.error_at(ctx.provisional, node, msg, &[&text]);
                return None;
            };
            if last {
                if !self.binder.symbol(found).is_type() {
                    let text = self.name_text(segment);
                    self.error_at(
                        ctx.provisional,
                        node,
                        &messages::NAME_0_DOES_NOT_REFER_TO_A_TYPE,
                        &[&text],
                    );
                    return None;
                }
                return Some(found);
            }
            container = found;
        }
        None
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    pub(crate) fn resolve_expression(&mut self, ctx: &ResolutionContext, node: NodeId) -> TypeId {
        let context_sensitive = matches!(
            self.ast.kind(node),
            NodeKind::Func { .. } | NodeKind::ObjectLit { .. } | NodeKind::ArrayLit { .. }
        );
        let cacheable = !ctx.provisional && !(context_sensitive && ctx.contextual_type.is_some());
        if cacheable {
            if let Some(&cached) = self.node_types.get(&node) {
                return cached;
            }
        }
        let ty = self.compute_expression_type(ctx, node);
        if cacheable {
            self.node_types.insert(node, ty);
        }
        ty
    }

    fn compute_expression_type(&mut self, ctx: &ResolutionContext, node: NodeId) -> TypeId {
        match self.ast.kind(node).clone() {
            NodeKind::NumberLit { .. } => self.types.number_type,
            NodeKind::StringLit { value } => self.string_literal_type(value),
            NodeKind::BoolLit { .. } => self.types.boolean_type,
            NodeKind::NullLit => self.types.null_type,
            NodeKind::UndefinedLit => self.types.undefined_type,
            NodeKind::Ident { name } => self.resolve_identifier(ctx, node, name),
            NodeKind::Paren { expr } => self.resolve_expression(ctx, expr),
            NodeKind::This => self.resolve_this(ctx, node),
            NodeKind::Super => match ctx.super_type {
                Some(super_type) => super_type,
                None => {
                    self.error_at(
                        ctx.provisional,
                        node,
                        &messages::SUPER_PROPERTY_ACCESS_IS_ONLY_PERMITTED_IN_MEMBERS_OF_DERIVED_CLASSES,
                        &[],
                    );
                    self.types.error_type
                }
            },
            NodeKind::ArrayLit { elements } => self.resolve_array_literal(ctx, &elements),
            NodeKind::ObjectLit { .. } => self.resolve_object_literal(ctx, node),
            NodeKind::Func { .. } => self.resolve_function_expression(ctx, node),
            NodeKind::Member { object, name } => self.resolve_member_access(ctx, node, object, name),
            NodeKind::Index { object, index } => self.resolve_index_access(ctx, object, index),
            NodeKind::Call { .. } => self.resolve_call_expression(ctx, node),
            NodeKind::New { .. } => self.resolve_new_expression(ctx, node),
            NodeKind::Binary { op, left, right } => self.resolve_binary(ctx, node, op, left, right),
            NodeKind::Unary { op, operand } => self.resolve_unary(ctx, node, op, operand),
            NodeKind::Cond { cond, then_expr, else_expr } => {
                let plain = ctx.with_contextual_type(None);
                self.resolve_expression(&plain, cond);
                let t = self.resolve_expression(ctx, then_expr);
                let e = self.resolve_expression(ctx, else_expr);
                let (t, e) = (self.widen(t), self.widen(e));
                // Diverging branches take the contextual type when one is
                // imposed.
                self.best_common_type(&[t, e])
                    .or(ctx.contextual_type)
                    .unwrap_or(self.types.any_type)
            }
            NodeKind::Cast { ty, expr } => {
                let target = self.resolve_type_annotation(ctx, ty);
                let inner = ctx.with_contextual_type(Some(target));
                let source = self.resolve_expression(&inner, expr);
                // A cast must move along the assignability lattice in one
                // direction or the other.
                if !self.is_assignable(source, target) && !self.is_assignable(target, source) {
                    let source_text = self.type_to_string(source);
                    let target_text = self.type_to_string(target);
                    self.error_at(
                        ctx.provisional,
                        node,
                        &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1,
                        &[&source_text, &target_text],
                    );
                }
                target
            }
            _ => self.types.error_type,
        }
    }

    fn resolve_identifier(
        &mut self,
        ctx: &ResolutionContext,
        node: NodeId,
        name: InternedString,
    ) -> TypeId {
        let Some(symbol) = self.binder.resolve_name(ctx.enclosing, name, SymbolFlags::VALUE) else {
            let text = self.name_text(name);
            self.error_at(ctx.provisional, node, &messages::CANNOT_FIND_NAME_0, &[&text]);
            return self.types.error_type;
        };
        self.value_type_of_symbol(symbol)
    }

    /// The type of a symbol used as a value. Classes, enums, and modules
    /// yield their container types.
    pub(crate) fn value_type_of_symbol(&mut self, symbol: SymbolId) -> TypeId {
        let flags = self.binder.symbol(symbol).flags;
        if flags.intersects(SymbolFlags::CLASS | SymbolFlags::ENUM | SymbolFlags::MODULE) {
            self.resolve_symbol(symbol);
            if let Some(&container) = self.container_types.get(&symbol) {
                return container;
            }
        }
        self.resolve_symbol(symbol)
    }

    fn resolve_this(&mut self, ctx: &ResolutionContext, node: NodeId) -> TypeId {
        if let Some(this_type) = ctx.this_type {
            return this_type;
        }
        // Outside class members, `this` is any; directly in a module body
        // it is an error.
        let in_function = self
            .binder
            .enclosing(ctx.enclosing, |k| k.is_function_like())
            .is_some();
        if !in_function {
            let container = self.binder.enclosing(ctx.enclosing, |k| {
                matches!(k, DeclKind::Module | DeclKind::Unit)
            });
            if let Some(container) = container {
                if self.binder.decl(container).kind == DeclKind::Module {
                    self.error_at(
                        ctx.provisional,
                        node,
                        &messages::THIS_CANNOT_BE_REFERENCED_IN_MODULE_BODY,
                        &[],
                    );
                }
            }
        }
        self.types.any_type
    }

    fn resolve_array_literal(&mut self, ctx: &ResolutionContext, elements: &[NodeId]) -> TypeId {
        let contextual_element = ctx.contextual_type.and_then(|t| match self.types.kind(t) {
            TypeKind::Array { element } => Some(*element),
            _ => None,
        });
        let element_ctx = ctx.with_contextual_type(contextual_element);
        let mut elem_types = Vec::new();
        for &element in elements {
            let ty = self.resolve_expression(&element_ctx, element);
            elem_types.push((element, self.widen(ty)));
        }
        let candidates: Vec<TypeId> = elem_types.iter().map(|&(_, t)| t).collect();
        let element = if candidates.is_empty() {
            contextual_element.unwrap_or(self.types.any_type)
        } else {
            match self.best_common_type(&candidates) {
                Some(best) => best,
                // No common element type: the contextual element type is
                // imposed and each stray element reported against it.
                None => match contextual_element {
                    Some(imposed) => {
                        for &(element, ty) in &elem_types {
                            self.check_assignable(
                                ctx.provisional,
                                ty,
                                imposed,
                                element,
                                &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1,
                            );
                        }
                        imposed
                    }
                    None => self.types.any_type,
                },
            }
        };
        self.types.add(TypeKind::Array { element })
    }

    fn resolve_object_literal(&mut self, ctx: &ResolutionContext, node: NodeId) -> TypeId {
        let ast = std::mem::take(&mut self.ast);
        let decl = self.binder.bind_object_literal(&ast, node, ctx.enclosing);
        self.ast = ast;
        let NodeKind::ObjectLit { members } = self.ast.kind(node).clone() else {
            return self.types.error_type;
        };
        let contextual_shape = ctx.contextual_type.and_then(|t| self.apparent_shape(t));
        let mut shape = Shape::default();
        for member in members {
            let NodeKind::ObjectLitMember { name, value } = self.ast.kind(member).clone() else {
                continue;
            };
            let contextual_member = contextual_shape
                .as_ref()
                .and_then(|s| s.members.get(&name))
                .map(|m| m.ty);
            let member_ctx = ctx.with_contextual_type(contextual_member);
            let value_ty = self.resolve_expression(&member_ctx, value);
            let value_ty = self.widen(value_ty);
            let member_decl = self.binder.decl_of_node(member);
            shape.members.insert(
                name,
                Member { ty: value_ty, optional: false, private: false, origin: member_decl },
            );
        }
        let symbol = self.binder.decl(decl).symbol;
        let ty = self.types.add_for_symbol(symbol, TypeKind::Object(shape));
        let entry = self.binder.symbol_mut(symbol);
        entry.ty = Some(ty);
        entry.state = SymbolState::Resolved;
        ty
    }

    fn resolve_function_expression(&mut self, ctx: &ResolutionContext, node: NodeId) -> TypeId {
        let ast = std::mem::take(&mut self.ast);
        let decl = self.binder.bind_function_expression(&ast, node, ctx.enclosing);
        self.ast = ast;
        // Contextual typing applies when the expected type has exactly one
        // call signature.
        let contextual_sig = ctx.contextual_type.and_then(|t| {
            let shape = self.apparent_shape(t)?;
            if shape.call_signatures.len() == 1 {
                Some(shape.call_signatures[0].clone())
            } else {
                None
            }
        });
        let sig = self.signature_of_decl(decl, contextual_sig.as_ref());
        // An arrow that reads `this` forces its host function to capture it.
        if self.ast.flags(node).contains(NodeFlags::ARROW) {
            let body = match self.ast.kind(node) {
                NodeKind::Func { body: Some(body), .. } => Some(*body),
                _ => None,
            };
            if body.is_some_and(|b| self.expr_mentions_this(b)) {
                let host = self
                    .binder
                    .enclosing(ctx.enclosing, |k| k.is_function_like())
                    .filter(|&h| !self.ast.flags(self.binder.decl(h).node).contains(NodeFlags::ARROW));
                if let Some(host) = host {
                    self.binder.decl_mut(host).flags |= DeclFlags::MUST_CAPTURE_THIS;
                }
            }
        }
        let mut shape = Shape::default();
        shape.call_signatures.push(sig);
        let symbol = self.binder.decl(decl).symbol;
        self.types.add_for_symbol(symbol, TypeKind::Object(shape))
    }

    fn resolve_member_access(
        &mut self,
        ctx: &ResolutionContext,
        node: NodeId,
        object: NodeId,
        name: InternedString,
    ) -> TypeId {
        let plain = ctx.with_contextual_type(None);
        let object_ty = self.resolve_expression(&plain, object);
        if self.types.is_any(object_ty) || self.types.is_error(object_ty) {
            return object_ty;
        }
        let Some(member) = self.member_type(object_ty, name) else {
            let name_text = self.name_text(name);
            let object_text = self.type_to_string(object_ty);
            self.error_at(
                ctx.provisional,
                node,
                &messages::PROPERTY_0_DOES_NOT_EXIST_ON_TYPE_1,
                &[&name_text, &object_text],
            );
            return self.types.error_type;
        };
        if member.private && !self.private_access_allowed(ctx, member.origin) {
            let name_text = self.name_text(name);
            self.error_at(ctx.provisional, node, &messages::PROPERTY_0_IS_PRIVATE, &[&name_text]);
        }
        member.ty
    }

    /// Private members are accessible only lexically inside the class that
    /// declared them.
    fn private_access_allowed(&self, ctx: &ResolutionContext, origin: Option<DeclId>) -> bool {
        let Some(origin) = origin else { return true };
        let Some(owner) = self.binder.enclosing(origin, |k| k == DeclKind::Class) else {
            return true;
        };
        self.binder.enclosing(ctx.enclosing, |k| k == DeclKind::Class) == Some(owner)
            || {
                // Walk further out in case of nested classes.
                let mut current = Some(ctx.enclosing);
                let mut found = false;
                while let Some(decl) = current {
                    if decl == owner {
                        found = true;
                        break;
                    }
                    current = self.binder.decl(decl).parent;
                }
                found
            }
    }

    fn resolve_index_access(&mut self, ctx: &ResolutionContext, object: NodeId, index: NodeId) -> TypeId {
        let plain = ctx.with_contextual_type(None);
        let object_ty = self.resolve_expression(&plain, object);
        let index_ty = self.resolve_expression(&plain, index);
        if self.types.is_any(object_ty) || self.types.is_error(object_ty) {
            return self.types.any_type;
        }
        if let TypeKind::Array { element } = self.types.kind(object_ty) {
            let element = *element;
            if self.types.is_number_like(index_ty) || self.types.is_any(index_ty) {
                return element;
            }
        }
        if let Some(shape) = self.apparent_shape(object_ty) {
            let want_number = self.types.is_number_like(index_ty);
            for sig in &shape.index_signatures {
                if sig.key == self.types.number_type && want_number {
                    return sig.value;
                }
                if sig.key == self.types.string_type && !want_number {
                    return sig.value;
                }
            }
            // A string index signature also serves numeric keys.
            if want_number {
                if let Some(sig) =
                    shape.index_signatures.iter().find(|s| s.key == self.types.string_type)
                {
                    return sig.value;
                }
            }
        }
        self.types.any_type
    }

    // ------------------------------------------------------------------
    // Operators
    // ------------------------------------------------------------------

    fn resolve_binary(
        &mut self,
        ctx: &ResolutionContext,
        node: NodeId,
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    ) -> TypeId {
        let plain = ctx.with_contextual_type(None);
        match op {
            BinaryOp::Assign => {
                if !self.is_reference_expr(left) {
                    self.error_at(ctx.provisional, node, &messages::INVALID_ASSIGNMENT_TARGET, &[]);
                }
                let left_ty = self.resolve_expression(&plain, left);
                let right_ctx = ctx.with_contextual_type(Some(left_ty));
                let right_ty = self.resolve_expression(&right_ctx, right);
                self.check_assignable(
                    ctx.provisional,
                    right_ty,
                    left_ty,
                    node,
                    &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1,
                );
                right_ty
            }
            BinaryOp::Add => {
                let l = self.resolve_expression(&plain, left);
                let r = self.resolve_expression(&plain, right);
                if self.types.is_string_like(l) || self.types.is_string_like(r) {
                    self.types.string_type
                } else if self.types.is_number_like(l) && self.types.is_number_like(r) {
                    self.types.number_type
                } else if self.types.is_any(l)
                    || self.types.is_any(r)
                    || self.types.is_error(l)
                    || self.types.is_error(r)
                {
                    self.types.any_type
                } else {
                    let lt = self.type_to_string(l);
                    let rt = self.type_to_string(r);
                    self.error_at(
                        ctx.provisional,
                        node,
                        &messages::OPERATOR_0_CANNOT_BE_APPLIED_TO_TYPES_1_AND_2,
                        &["+", &lt, &rt],
                    );
                    self.types.error_type
                }
            }
            op if op.is_arithmetic() => {
                let l = self.resolve_expression(&plain, left);
                let r = self.resolve_expression(&plain, right);
                for operand in [l, r] {
                    if !self.arithmetic_operand_ok(operand) {
                        self.error_at(
                            ctx.provisional,
                            node,
                            &messages::ARITHMETIC_OPERAND_MUST_BE_OF_TYPE_ANY_NUMBER_OR_ENUM,
                            &[],
                        );
                    }
                }
                self.types.number_type
            }
            op if op.is_comparison() => {
                let l = self.resolve_expression(&plain, left);
                let r = self.resolve_expression(&plain, right);
                if !self.is_assignable(l, r) && !self.is_assignable(r, l) {
                    let op_text = binary_op_text(op);
                    let lt = self.type_to_string(l);
                    let rt = self.type_to_string(r);
                    self.error_at(
                        ctx.provisional,
                        node,
                        &messages::OPERATOR_0_CANNOT_BE_APPLIED_TO_TYPES_1_AND_2,
                        &[op_text, &lt, &rt],
                    );
                }
                self.types.boolean_type
            }
            BinaryOp::LogicalAnd => {
                self.resolve_expression(&plain, left);
                self.resolve_expression(ctx, right)
            }
            BinaryOp::LogicalOr => {
                let l = self.resolve_expression(&plain, left);
                let r = self.resolve_expression(ctx, right);
                let (l, r) = (self.widen(l), self.widen(r));
                self.best_common_type(&[l, r])
                    .or(ctx.contextual_type)
                    .unwrap_or(self.types.any_type)
            }
            BinaryOp::In => {
                let l = self.resolve_expression(&plain, left);
                let r = self.resolve_expression(&plain, right);
                if !(self.types.is_string_like(l)
                    || self.types.is_number_like(l)
                    || self.types.is_any(l)
                    || self.types.is_error(l))
                {
                    self.error_at(
                        ctx.provisional,
                        node,
                        &messages::LEFT_OPERAND_OF_IN_MUST_BE_STRING_NUMBER_OR_ANY,
                        &[],
                    );
                }
                if !(self.types.is_object_like(r)
                    || matches!(self.types.kind(r), TypeKind::TypeParameter { .. })
                    || self.types.is_any(r)
                    || self.types.is_error(r))
                {
                    self.error_at(
                        ctx.provisional,
                        node,
                        &messages::RIGHT_OPERAND_OF_IN_MUST_BE_AN_OBJECT_TYPE_PARAMETER_OR_ANY,
                        &[],
                    );
                }
                self.types.boolean_type
            }
            BinaryOp::InstanceOf => {
                self.resolve_expression(&plain, left);
                let r = self.resolve_expression(&plain, right);
                if !(self.types.is_object_like(r) || self.types.is_any(r) || self.types.is_error(r)) {
                    self.error_at(
                        ctx.provisional,
                        node,
                        &messages::RIGHT_OPERAND_OF_INSTANCEOF_MUST_BE_AN_OBJECT_TYPE_OR_ANY,
                        &[],
                    );
                }
                self.types.boolean_type
            }
            _ => {
                self.resolve_expression(&plain, left);
                self.resolve_expression(&plain, right);
                self.types.any_type
            }
        }
    }

    fn resolve_unary(
        &mut self,
        ctx: &ResolutionContext,
        node: NodeId,
        op: UnaryOp,
        operand: NodeId,
    ) -> TypeId {
        let plain = ctx.with_contextual_type(None);
        let operand_ty = self.resolve_expression(&plain, operand);
        match op {
            UnaryOp::LogicalNot => self.types.boolean_type,
            UnaryOp::TypeOf => self.types.string_type,
            op if op.is_increment() => {
                if !self.is_reference_expr(operand) {
                    self.error_at(
                        ctx.provisional,
                        node,
                        &messages::THE_OPERAND_OF_AN_INCREMENT_OR_DECREMENT_OPERATOR_MUST_BE_A_REFERENCE,
                        &[],
                    );
                }
                if !self.arithmetic_operand_ok(operand_ty) {
                    self.error_at(
                        ctx.provisional,
                        node,
                        &messages::ARITHMETIC_OPERAND_MUST_BE_OF_TYPE_ANY_NUMBER_OR_ENUM,
                        &[],
                    );
                }
                self.types.number_type
            }
            _ => {
                if !self.arithmetic_operand_ok(operand_ty) {
                    self.error_at(
                        ctx.provisional,
                        node,
                        &messages::ARITHMETIC_OPERAND_MUST_BE_OF_TYPE_ANY_NUMBER_OR_ENUM,
                        &[],
                    );
                }
                self.types.number_type
            }
        }
    }

    fn arithmetic_operand_ok(&self, ty: TypeId) -> bool {
        self.types.is_any(ty) || self.types.is_error(ty) || self.types.is_number_like(ty)
    }

    pub(crate) fn is_reference_expr(&self, node: NodeId) -> bool {
        matches!(
            self.ast.kind(node),
            NodeKind::Ident { .. } | NodeKind::Member { .. } | NodeKind::Index { .. }
        )
    }

    // ========================================================================
    // Shared type machinery
    // ========================================================================

    pub(crate) fn string_literal_type(&mut self, value: InternedString) -> TypeId {
        if let Some(&ty) = self.literal_string_types.get(&value) {
            return ty;
        }
        let ty = self.types.add(TypeKind::StringLiteral { value });
        self.literal_string_types.insert(value, ty);
        ty
    }

    /// Inference widening: string literals widen to string, null and
    /// undefined to any.
    pub(crate) fn widen(&self, ty: TypeId) -> TypeId {
        if let TypeKind::StringLiteral { .. } = self.types.kind(ty) {
            return self.types.string_type;
        }
        if ty == self.types.null_type || ty == self.types.undefined_type {
            return self.types.any_type;
        }
        ty
    }

    /// The first candidate every other candidate is assignable to; None
    /// when the candidates diverge and the caller must impose a type.
    pub fn best_common_type(&mut self, candidates: &[TypeId]) -> Option<TypeId> {
        let candidates: Vec<TypeId> =
            candidates.iter().copied().filter(|&c| !self.types.is_error(c)).collect();
        for &candidate in &candidates {
            if candidates.iter().all(|&other| self.is_assignable(other, candidate)) {
                return Some(candidate);
            }
        }
        None
    }

    /// The boxed form of a primitive: the matching globally declared
    /// interface, when the program declares one.
    pub(crate) fn boxed_type_of(&mut self, ty: TypeId) -> Option<TypeId> {
        let global = match self.types.kind(ty) {
            TypeKind::Intrinsic { name: "number" } => "Number",
            TypeKind::Intrinsic { name: "string" } => "String",
            TypeKind::Intrinsic { name: "boolean" } => "Boolean",
            TypeKind::StringLiteral { .. } => "String",
            TypeKind::Enum => "Number",
            _ => return None,
        };
        self.global_type(global)
    }

    fn global_type(&mut self, name: &'static str) -> Option<TypeId> {
        let interned = self.binder.interner().intern_static(name);
        let symbol = self.binder.global(interned)?;
        if !self.binder.symbol(symbol).is_type() {
            return None;
        }
        Some(self.resolve_symbol(symbol))
    }

    /// The structural view of `T[]`: the global `Array<T>` interface when
    /// declared, with a guaranteed numeric index signature and `length`.
    pub(crate) fn array_shape(&mut self, element: TypeId) -> Shape {
        let mut shape = match self.global_type("Array") {
            Some(generic) if self.types.is_unspecialized_generic(generic) => {
                let specialized = self.specialize(true, NodeId::INVALID, generic, vec![element]);
                self.apparent_shape_of_named(specialized)
            }
            _ => Shape::default(),
        };
        let length = self.binder.interner().intern_static("length");
        shape.members.entry(length).or_insert(Member {
            ty: self.types.number_type,
            optional: false,
            private: false,
            origin: None,
        });
        if !shape.index_signatures.iter().any(|s| s.key == self.types.number_type) {
            shape
                .index_signatures
                .push(IndexSignature { key: self.types.number_type, value: element });
        }
        shape
    }

    fn apparent_shape_of_named(&mut self, ty: TypeId) -> Shape {
        match self.types.kind(ty).clone() {
            TypeKind::Named { shape, .. } => shape,
            TypeKind::Object(shape) => shape,
            _ => Shape::default(),
        }
    }
}

fn binary_op_text(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Equals => "==",
        BinaryOp::NotEquals => "!=",
        BinaryOp::Less => "<",
        BinaryOp::LessEquals => "<=",
        BinaryOp::Greater => ">",
        BinaryOp::GreaterEquals => ">=",
        _ => "?",
    }
}
