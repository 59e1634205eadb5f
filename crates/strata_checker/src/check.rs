//! The statement-level checking pass.
//!
//! Drives resolution over every statement of a unit and enforces the rules
//! that are not part of expression typing itself: assignment compatibility
//! of initializers, agreement of split variable declarations, return
//! discipline, heritage compatibility, constructor super-call rules,
//! accessor symmetry, and visibility leakage from exported declarations.

use crate::checker::Checker;
use crate::context::ResolutionContext;
use crate::types::TypeKind;
use strata_ast::node::{FuncKind, NodeKind};
use strata_ast::types::{DeclId, NodeId, SymbolId, TypeId};
use strata_binder::{DeclFlags, DeclKind, SymbolFlags};
use strata_core::intern::InternedString;
use strata_diagnostics::{format_message, messages, Diagnostic};
use thiserror::Error;
use tracing::debug;

/// Unrecoverable failure of a checking entry point. Everything inside the
/// pass degrades to the error type instead; only a structural misuse of
/// the API surfaces here.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("unit '{0}' was not bound before checking")]
    UnboundUnit(String),
}

impl Checker {
    /// Check one bound unit. The unit must have gone through
    /// [`strata_binder::Binder::bind_unit`] first.
    pub fn check_unit(&mut self, unit: NodeId) -> Result<(), CheckError> {
        let NodeKind::Unit { name, statements } = self.ast.kind(unit).clone() else {
            return Err(CheckError::UnboundUnit("<not a unit>".to_string()));
        };
        let name_text = self.name_text(name);
        let Some(unit_decl) = self.binder.decl_of_node(unit) else {
            return Err(CheckError::UnboundUnit(name_text));
        };
        if !self.checked_units.insert(unit) {
            return Ok(());
        }
        self.current_unit = name_text;
        debug!(unit = %self.current_unit, "checking unit");
        let ctx = ResolutionContext::new(unit_decl);
        for stmt in statements {
            self.check_statement(&ctx, stmt);
        }
        Ok(())
    }

    // ========================================================================
    // Statements
    // ========================================================================

    pub(crate) fn check_statement(&mut self, ctx: &ResolutionContext, node: NodeId) {
        match self.ast.kind(node).clone() {
            NodeKind::Var { .. } => self.check_variable_declaration(ctx, node),
            NodeKind::Func { kind: FuncKind::Function, .. } => {
                if let Some(decl) = self.binder.decl_of_node(node) {
                    self.check_function_body(decl);
                    self.check_exported_function_surface(decl);
                }
            }
            NodeKind::Class { .. } => self.check_class(ctx, node),
            NodeKind::Interface { .. } => self.check_interface(node),
            NodeKind::Enum { .. } => {}
            NodeKind::Module { .. } => self.check_module(node),
            NodeKind::Block { statements } => {
                for stmt in statements {
                    self.check_statement(ctx, stmt);
                }
            }
            NodeKind::ExprStmt { expr } => {
                self.resolve_expression(ctx, expr);
            }
            NodeKind::Return { .. } => self.check_return(ctx, node),
            NodeKind::If { cond, then_branch, else_branch } => {
                self.resolve_expression(ctx, cond);
                self.check_statement(ctx, then_branch);
                if let Some(else_branch) = else_branch {
                    self.check_statement(ctx, else_branch);
                }
            }
            NodeKind::While { cond, body } => {
                self.resolve_expression(ctx, cond);
                self.check_statement(ctx, body);
            }
            NodeKind::ForIn { .. } => self.check_for_in(ctx, node),
            NodeKind::Throw { expr } => {
                self.resolve_expression(ctx, expr);
            }
            _ => {}
        }
    }

    fn check_variable_declaration(&mut self, ctx: &ResolutionContext, node: NodeId) {
        let NodeKind::Var { name, ty: annotation, init } = self.ast.kind(node).clone() else {
            return;
        };
        let Some(decl) = self.binder.decl_of_node(node) else { return };
        let symbol = self.binder.decl(decl).symbol;
        let declared = self.resolve_symbol(symbol);

        // Split declarations of one name must agree with the first.
        let primary = self.binder.symbol(symbol).primary_decl();
        if decl != primary {
            let own = self.declared_type_of(decl);
            if !self.is_identical(own, declared) {
                let name_text = self.name_text(name);
                let declared_text = self.type_to_string(declared);
                let own_text = self.type_to_string(own);
                self.error_at(
                    ctx.provisional,
                    node,
                    &messages::SUBSEQUENT_DECLARATIONS_OF_0_MUST_HAVE_TYPE_1_BUT_HERE_HAS_TYPE_2,
                    &[&name_text, &declared_text, &own_text],
                );
            }
        }

        if let Some(init) = init {
            let contextual = annotation.map(|_| declared);
            let init_ctx = ctx.with_contextual_type(contextual);
            let init_ty = self.resolve_expression(&init_ctx, init);
            self.check_assignable(
                ctx.provisional,
                init_ty,
                declared,
                init,
                &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1,
            );
        }

        if let Some(module) = self.exported_from_module(decl) {
            if let Some(leak) = self.private_type_violation(declared, module) {
                let name_text = self.name_text(name);
                let msg = match leak {
                    SurfaceLeak::PrivateType(_) => {
                        &messages::EXPORTED_VARIABLE_0_HAS_OR_IS_USING_PRIVATE_TYPE_1
                    }
                    SurfaceLeak::InaccessibleModule(_) => {
                        &messages::EXPORTED_VARIABLE_0_IS_USING_INACCESSIBLE_MODULE_1
                    }
                };
                self.error_at(ctx.provisional, node, msg, &[&name_text, leak.name()]);
            }
        }
    }

    fn check_return(&mut self, ctx: &ResolutionContext, node: NodeId) {
        let NodeKind::Return { expr } = self.ast.kind(node).clone() else { return };
        let declared = self
            .binder
            .enclosing(ctx.enclosing, |k| k.is_function_like())
            .and_then(|f| self.declared_return_type(f));
        let Some(expr) = expr else { return };
        let expr_ctx = ctx.with_contextual_type(declared);
        let expr_ty = self.resolve_expression(&expr_ctx, expr);
        if let Some(declared) = declared {
            self.check_assignable(
                ctx.provisional,
                expr_ty,
                declared,
                expr,
                &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1,
            );
        }
    }

    /// The annotated return type of a function-like declaration, if any.
    fn declared_return_type(&mut self, func: DeclId) -> Option<TypeId> {
        let node = self.binder.decl(func).node;
        let NodeKind::Func { return_ty: Some(return_ty), .. } = self.ast.kind(node).clone() else {
            return None;
        };
        let ctx = ResolutionContext::new(func);
        Some(self.resolve_type_annotation(&ctx, return_ty))
    }

    fn check_for_in(&mut self, ctx: &ResolutionContext, node: NodeId) {
        let NodeKind::ForIn { index, target, body } = self.ast.kind(node).clone() else { return };
        let index_ty = if let Some(decl) = self.binder.decl_of_node(index) {
            let symbol = self.binder.decl(decl).symbol;
            self.resolve_symbol(symbol)
        } else {
            self.resolve_expression(ctx, index)
        };
        let index_ok = self.types.is_any(index_ty)
            || self.types.is_error(index_ty)
            || index_ty == self.types.string_type
            || index_ty == self.types.number_type;
        if !index_ok {
            self.error_at(
                ctx.provisional,
                index,
                &messages::FOR_IN_INDEX_MUST_BE_OF_TYPE_STRING_NUMBER_OR_ANY,
                &[],
            );
        }
        self.resolve_expression(ctx, target);
        self.check_statement(ctx, body);
    }

    // ========================================================================
    // Functions
    // ========================================================================

    /// Check a function-like declaration: parameter defaults, body
    /// statements, and the non-void-must-return rule.
    pub(crate) fn check_function_body(&mut self, func: DeclId) {
        let node = self.binder.decl(func).node;
        let NodeKind::Func { name, params, return_ty, body, .. } = self.ast.kind(node).clone() else {
            return;
        };
        // Materialize the signature so parameter symbols carry types.
        let symbol = self.binder.decl(func).symbol;
        self.resolve_symbol(symbol);

        let fctx = self.context_for_function(func);
        for param in params {
            let NodeKind::Param { ty, init: Some(init), .. } = self.ast.kind(param).clone() else {
                continue;
            };
            let init_ty = self.resolve_expression(&fctx, init);
            if let Some(ty) = ty {
                let declared = self.resolve_type_annotation(&fctx, ty);
                self.check_assignable(
                    fctx.provisional,
                    init_ty,
                    declared,
                    init,
                    &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1,
                );
            }
        }

        let Some(body) = body else { return };
        self.check_statement(&fctx, body);

        if let Some(return_ty) = return_ty {
            let declared = self.resolve_type_annotation(&fctx, return_ty);
            let exempt = self.types.is_any(declared)
                || self.types.is_error(declared)
                || declared == self.types.void_type;
            if !exempt && !self.body_has_return_expr(body) && !self.body_is_single_throw(body) {
                let name_text = match name {
                    Some(name) => self.name_text(name),
                    None => "expression".to_string(),
                };
                self.error_at(
                    fctx.provisional,
                    node,
                    &messages::FUNCTION_0_DECLARED_A_NON_VOID_RETURN_TYPE_BUT_HAS_NO_RETURN_EXPRESSION,
                    &[&name_text],
                );
            }
        }
    }

    /// Whether the body yields a value on some path.
    fn body_has_return_expr(&self, node: NodeId) -> bool {
        match self.ast.kind(node) {
            NodeKind::Return { expr } => expr.is_some(),
            NodeKind::Block { statements } => {
                statements.iter().any(|&s| self.body_has_return_expr(s))
            }
            NodeKind::If { then_branch, else_branch, .. } => {
                self.body_has_return_expr(*then_branch)
                    || else_branch.is_some_and(|e| self.body_has_return_expr(e))
            }
            NodeKind::While { body, .. } | NodeKind::ForIn { body, .. } => {
                self.body_has_return_expr(*body)
            }
            _ => false,
        }
    }

    /// A body that is nothing but one `throw` never falls off the end, so
    /// the must-return rule does not apply to it.
    fn body_is_single_throw(&self, body: NodeId) -> bool {
        match self.ast.kind(body) {
            NodeKind::Throw { .. } => true,
            NodeKind::Block { statements } => {
                statements.len() == 1
                    && matches!(self.ast.kind(statements[0]), NodeKind::Throw { .. })
            }
            _ => false,
        }
    }

    // ========================================================================
    // Classes
    // ========================================================================

    fn check_class(&mut self, ctx: &ResolutionContext, node: NodeId) {
        let NodeKind::Class { name, extends, implements, members, .. } = self.ast.kind(node).clone()
        else {
            return;
        };
        let Some(decl) = self.binder.decl_of_node(node) else { return };
        let symbol = self.binder.decl(decl).symbol;
        let instance = self.resolve_symbol(symbol);
        let class_name = self.name_text(name);

        self.check_class_heritage(decl, instance, &class_name, extends, &implements);
        self.check_accessor_symmetry(decl);

        let has_base = match self.types.kind(instance) {
            TypeKind::Named { base_types, .. } => {
                base_types.first().is_some_and(|&b| self.base_is_class_type(b))
            }
            _ => false,
        };
        let has_initialized_fields = members.iter().any(|&m| {
            matches!(self.ast.kind(m), NodeKind::Field { init: Some(_), .. })
                && !self.ast.flags(m).contains(strata_ast::types::NodeFlags::STATIC)
        });
        let has_param_properties = self.binder.decl(decl).children.iter().any(|&c| {
            self.binder.decl(c).kind == DeclKind::Field
                && self.binder.decl(c).flags.contains(DeclFlags::PARAM_PROPERTY)
        });

        for &member in &members {
            match self.ast.kind(member).clone() {
                NodeKind::Field { init: Some(init), ty: _, .. } => {
                    let Some(field_decl) = self.binder.decl_of_node(member) else { continue };
                    let field_symbol = self.binder.decl(field_decl).symbol;
                    let declared = self.resolve_symbol(field_symbol);
                    let field_ctx = ctx.with_scope(decl).with_contextual_type(Some(declared));
                    let init_ty = self.resolve_expression(&field_ctx, init);
                    self.check_assignable(
                        ctx.provisional,
                        init_ty,
                        declared,
                        init,
                        &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1,
                    );
                    if self.expr_mentions_this(init) {
                        self.error_at(
                            ctx.provisional,
                            init,
                            &messages::THIS_CANNOT_BE_REFERENCED_IN_PROPERTY_INITIALIZER,
                            &[],
                        );
                    }
                }
                NodeKind::Func { kind, body, .. } => {
                    let Some(member_decl) = self.binder.decl_of_node(member) else { continue };
                    self.check_function_body(member_decl);
                    if kind == FuncKind::Constructor {
                        if let Some(body) = body {
                            self.check_constructor_rules(
                                member,
                                body,
                                has_base,
                                has_initialized_fields || has_param_properties,
                            );
                        }
                    }
                }
                _ => {}
            }
        }

        if let Some(module) = self.exported_from_module(decl) {
            self.check_exported_class_surface(decl, instance, &class_name, module);
        }
    }

    fn base_is_class_type(&self, base: TypeId) -> bool {
        matches!(self.types.kind(base), TypeKind::Named { is_class: true, .. })
    }

    fn check_class_heritage(
        &mut self,
        decl: DeclId,
        instance: TypeId,
        class_name: &str,
        extends: Option<NodeId>,
        implements: &[NodeId],
    ) {
        let ctx = ResolutionContext::new(decl);
        if let Some(extends) = extends {
            let base = self.resolve_type_annotation(&ctx, extends);
            if self.base_is_class_type(base) {
                self.check_override_compatibility(extends, instance, base, class_name);
            }
        }
        for &implement in implements {
            let iface = self.resolve_type_annotation(&ctx, implement);
            if !matches!(self.types.kind(iface), TypeKind::Named { .. }) {
                continue;
            }
            if let Some(detail) = self.implementation_gap(instance, iface) {
                let iface_text = self.type_to_string(iface);
                let diag = Diagnostic::with_location(
                    self.current_unit.clone(),
                    self.ast.span(implement),
                    &messages::CLASS_0_INCORRECTLY_IMPLEMENTS_INTERFACE_1,
                    &[class_name, &iface_text],
                )
                .with_detail(0, detail);
                self.diagnostics.add(diag);
            }
        }
    }

    /// Every member a derived class redeclares must stay the same kind of
    /// member and keep an assignable type.
    fn check_override_compatibility(
        &mut self,
        node: NodeId,
        instance: TypeId,
        base: TypeId,
        class_name: &str,
    ) {
        let own = match self.types.kind(instance) {
            TypeKind::Named { shape, .. } => shape.clone(),
            _ => return,
        };
        let Some(base_shape) = self.apparent_shape(base) else { return };
        for (name, member) in &own.members {
            let Some(base_member) = base_shape.members.get(name) else { continue };
            let own_is_method = self.member_is_method(member.origin);
            let base_is_method = self.member_is_method(base_member.origin);
            if own_is_method != base_is_method {
                let member_text = self.name_text(*name);
                let base_text = self.type_to_string(base);
                self.error_at(
                    false,
                    node,
                    &messages::CLASS_0_DEFINES_MEMBER_1_AS_A_DIFFERENT_KIND_THAN_BASE_TYPE_2,
                    &[class_name, &member_text, &base_text],
                );
                continue;
            }
            let (member_ty, base_ty) = (member.ty, base_member.ty);
            if !self.is_assignable(member_ty, base_ty) {
                let base_text = self.type_to_string(base);
                let member_text = self.name_text(*name);
                let diag = Diagnostic::with_location(
                    self.current_unit.clone(),
                    self.ast.span(node),
                    &messages::CLASS_0_INCORRECTLY_EXTENDS_BASE_CLASS_1,
                    &[class_name, &base_text],
                )
                .with_detail(
                    0,
                    format_message(
                        messages::TYPES_OF_PROPERTY_0_ARE_INCOMPATIBLE.message,
                        &[&member_text],
                    ),
                );
                self.diagnostics.add(diag);
            }
        }
    }

    fn member_is_method(&self, origin: Option<DeclId>) -> bool {
        origin.is_some_and(|d| self.binder.decl(d).kind == DeclKind::Method)
    }

    /// The first member an implementing class is missing or mistypes, as a
    /// detail line; None when the interface is satisfied. Only what the
    /// class actually provides counts: its own members and the extends
    /// chain, never the implements clause under test.
    fn implementation_gap(&mut self, instance: TypeId, iface: TypeId) -> Option<String> {
        let iface_shape = self.apparent_shape(iface)?;
        for (name, iface_member) in &iface_shape.members {
            match self.class_side_member(instance, *name, 0) {
                None if !iface_member.optional => {
                    let name_text = self.name_text(*name);
                    let instance_text = self.type_to_string(instance);
                    return Some(format_message(
                        messages::PROPERTY_0_IS_MISSING_IN_TYPE_1.message,
                        &[&name_text, &instance_text],
                    ));
                }
                Some(member) => {
                    let (member_ty, iface_ty) = (member.ty, iface_member.ty);
                    if !self.is_assignable(member_ty, iface_ty) {
                        let name_text = self.name_text(*name);
                        return Some(format_message(
                            messages::TYPES_OF_PROPERTY_0_ARE_INCOMPATIBLE.message,
                            &[&name_text],
                        ));
                    }
                }
                None => {}
            }
        }
        None
    }

    /// A member as the class side declares it: own shape first, then base
    /// classes, ignoring implemented interfaces.
    fn class_side_member(
        &mut self,
        instance: TypeId,
        name: InternedString,
        depth: u32,
    ) -> Option<crate::types::Member> {
        if depth > 8 {
            return None;
        }
        let TypeKind::Named { shape, base_types, .. } = self.types.kind(instance).clone() else {
            return None;
        };
        if let Some(member) = shape.members.get(&name) {
            return Some(member.clone());
        }
        for base in base_types {
            if !self.base_is_class_type(base) {
                continue;
            }
            if let Some(member) = self.class_side_member(base, name, depth + 1) {
                return Some(member);
            }
        }
        None
    }

    fn check_accessor_symmetry(&mut self, class_decl: DeclId) {
        let member_symbols: Vec<_> =
            self.binder.decl(class_decl).members.values().copied().collect();
        for symbol in member_symbols {
            let flags = self.binder.symbol(symbol).flags;
            if !flags.contains(SymbolFlags::GET_ACCESSOR) || !flags.contains(SymbolFlags::SET_ACCESSOR)
            {
                continue;
            }
            let decls = self.binder.symbol(symbol).declarations.clone();
            let getter = decls.iter().copied().find(|&d| self.binder.decl(d).kind == DeclKind::GetAccessor);
            let setter = decls.iter().copied().find(|&d| self.binder.decl(d).kind == DeclKind::SetAccessor);
            let (Some(getter), Some(setter)) = (getter, setter) else { continue };

            let getter_ty = self.accessor_value_type(getter);
            let setter_ty = self.accessor_value_type(setter);
            let name = self.binder.symbol(symbol).name;
            if let (Some(getter_ty), Some(setter_ty)) = (getter_ty, setter_ty) {
                if !self.is_identical(getter_ty, setter_ty) {
                    let name_text = self.name_text(name);
                    let node = self.binder.decl(getter).node;
                    self.error_at(
                        false,
                        node,
                        &messages::GETTER_AND_SETTER_TYPES_DO_NOT_AGREE,
                        &[&name_text],
                    );
                }
            }
            if self.binder.decl(getter).is_private() != self.binder.decl(setter).is_private() {
                let name_text = self.name_text(name);
                let node = self.binder.decl(getter).node;
                self.error_at(
                    false,
                    node,
                    &messages::GETTER_AND_SETTER_VISIBILITY_DOES_NOT_AGREE,
                    &[&name_text],
                );
            }
        }
    }

    /// The value type one accessor declaration states: getter return
    /// annotation or setter parameter annotation.
    fn accessor_value_type(&mut self, decl: DeclId) -> Option<TypeId> {
        let node = self.binder.decl(decl).node;
        let NodeKind::Func { kind, params, return_ty, .. } = self.ast.kind(node).clone() else {
            return None;
        };
        let ctx = ResolutionContext::new(decl);
        match kind {
            FuncKind::Getter => {
                let return_ty = return_ty?;
                Some(self.resolve_type_annotation(&ctx, return_ty))
            }
            FuncKind::Setter => {
                let &param = params.first()?;
                let NodeKind::Param { ty: Some(ty), .. } = self.ast.kind(param).clone() else {
                    return None;
                };
                Some(self.resolve_type_annotation(&ctx, ty))
            }
            _ => None,
        }
    }

    fn check_constructor_rules(
        &mut self,
        ctor_node: NodeId,
        body: NodeId,
        has_base: bool,
        super_must_be_first: bool,
    ) {
        if !has_base {
            return;
        }
        let mut super_calls = Vec::new();
        self.collect_super_calls(body, &mut super_calls);
        if super_calls.is_empty() {
            self.error_at(
                false,
                ctor_node,
                &messages::DERIVED_CLASS_CONSTRUCTOR_MUST_CONTAIN_SUPER_CALL,
                &[],
            );
            return;
        }
        if super_must_be_first && !self.first_statement_is_super_call(body) {
            self.error_at(
                false,
                ctor_node,
                &messages::SUPER_CALL_MUST_BE_FIRST_STATEMENT_IN_CONSTRUCTOR,
                &[],
            );
        }
        for &call in &super_calls {
            if let NodeKind::Call { args, .. } = self.ast.kind(call).clone() {
                for arg in args {
                    if self.expr_mentions_this(arg) {
                        self.error_at(
                            false,
                            arg,
                            &messages::THIS_CANNOT_BE_REFERENCED_IN_CONSTRUCTOR_ARGUMENTS,
                            &[],
                        );
                    }
                }
            }
        }
    }

    fn first_statement_is_super_call(&self, body: NodeId) -> bool {
        let NodeKind::Block { statements } = self.ast.kind(body) else { return false };
        let Some(&first) = statements.first() else { return false };
        let NodeKind::ExprStmt { expr } = self.ast.kind(first) else { return false };
        matches!(
            self.ast.kind(*expr),
            NodeKind::Call { target, .. } if matches!(self.ast.kind(*target), NodeKind::Super)
        )
    }

    fn collect_super_calls(&self, node: NodeId, out: &mut Vec<NodeId>) {
        match self.ast.kind(node) {
            NodeKind::Call { target, args, .. } => {
                if matches!(self.ast.kind(*target), NodeKind::Super) {
                    out.push(node);
                }
                self.collect_super_calls(*target, out);
                for &arg in args {
                    self.collect_super_calls(arg, out);
                }
            }
            NodeKind::Block { statements } => {
                for &s in statements {
                    self.collect_super_calls(s, out);
                }
            }
            NodeKind::ExprStmt { expr } | NodeKind::Paren { expr } | NodeKind::Throw { expr } => {
                self.collect_super_calls(*expr, out);
            }
            NodeKind::Return { expr: Some(expr) } => self.collect_super_calls(*expr, out),
            NodeKind::If { cond, then_branch, else_branch } => {
                self.collect_super_calls(*cond, out);
                self.collect_super_calls(*then_branch, out);
                if let Some(else_branch) = else_branch {
                    self.collect_super_calls(*else_branch, out);
                }
            }
            NodeKind::While { cond, body } => {
                self.collect_super_calls(*cond, out);
                self.collect_super_calls(*body, out);
            }
            NodeKind::Binary { left, right, .. } => {
                self.collect_super_calls(*left, out);
                self.collect_super_calls(*right, out);
            }
            _ => {}
        }
    }

    /// Whether an expression mentions `this`, not counting nested
    /// non-arrow function bodies (those rebind `this`).
    pub(crate) fn expr_mentions_this(&self, node: NodeId) -> bool {
        match self.ast.kind(node) {
            NodeKind::This => true,
            NodeKind::Func { body, .. } => {
                self.ast.flags(node).contains(strata_ast::types::NodeFlags::ARROW)
                    && body.is_some_and(|b| self.expr_mentions_this(b))
            }
            NodeKind::Paren { expr } | NodeKind::ExprStmt { expr } | NodeKind::Throw { expr } => {
                self.expr_mentions_this(*expr)
            }
            NodeKind::Cast { expr, .. } => self.expr_mentions_this(*expr),
            NodeKind::Member { object, .. } => self.expr_mentions_this(*object),
            NodeKind::Index { object, index } => {
                self.expr_mentions_this(*object) || self.expr_mentions_this(*index)
            }
            NodeKind::Call { target, args, .. } | NodeKind::New { target, args, .. } => {
                self.expr_mentions_this(*target) || args.iter().any(|&a| self.expr_mentions_this(a))
            }
            NodeKind::Binary { left, right, .. } => {
                self.expr_mentions_this(*left) || self.expr_mentions_this(*right)
            }
            NodeKind::Unary { operand, .. } => self.expr_mentions_this(*operand),
            NodeKind::Cond { cond, then_expr, else_expr } => {
                self.expr_mentions_this(*cond)
                    || self.expr_mentions_this(*then_expr)
                    || self.expr_mentions_this(*else_expr)
            }
            NodeKind::ArrayLit { elements } => elements.iter().any(|&e| self.expr_mentions_this(e)),
            NodeKind::ObjectLit { members } => members.iter().any(|&m| self.expr_mentions_this(m)),
            NodeKind::ObjectLitMember { value, .. } => self.expr_mentions_this(*value),
            NodeKind::Block { statements } => {
                statements.iter().any(|&s| self.expr_mentions_this(s))
            }
            NodeKind::Return { expr: Some(expr) } => self.expr_mentions_this(*expr),
            _ => false,
        }
    }

    // ========================================================================
    // Interfaces and modules
    // ========================================================================

    fn check_interface(&mut self, node: NodeId) {
        let NodeKind::Interface { name, extends, .. } = self.ast.kind(node).clone() else { return };
        let Some(decl) = self.binder.decl_of_node(node) else { return };
        let symbol = self.binder.decl(decl).symbol;
        let instance = self.resolve_symbol(symbol);
        let own = match self.types.kind(instance) {
            TypeKind::Named { shape, .. } => shape.clone(),
            _ => return,
        };
        let ctx = ResolutionContext::new(decl);
        // An extending interface may not change an inherited member's type.
        for extend in extends {
            let base = self.resolve_type_annotation(&ctx, extend);
            let Some(base_shape) = self.apparent_shape(base) else { continue };
            for (member_name, member) in &own.members {
                let Some(base_member) = base_shape.members.get(member_name) else { continue };
                let (member_ty, base_ty) = (member.ty, base_member.ty);
                if !self.is_identical(member_ty, base_ty) {
                    let name_text = self.name_text(name);
                    let base_text = self.type_to_string(base);
                    let member_text = self.name_text(*member_name);
                    let diag = Diagnostic::with_location(
                        self.current_unit.clone(),
                        self.ast.span(extend),
                        &messages::INTERFACE_0_INCORRECTLY_EXTENDS_INTERFACE_1,
                        &[&name_text, &base_text],
                    )
                    .with_detail(
                        0,
                        format_message(
                            messages::TYPES_OF_PROPERTY_0_ARE_INCOMPATIBLE.message,
                            &[&member_text],
                        ),
                    );
                    self.diagnostics.add(diag);
                }
            }
        }
    }

    fn check_module(&mut self, node: NodeId) {
        let NodeKind::Module { body, .. } = self.ast.kind(node).clone() else { return };
        let Some(decl) = self.binder.decl_of_node(node) else { return };
        let ctx = ResolutionContext::new(decl);
        for stmt in body {
            self.check_statement(&ctx, stmt);
        }
    }

    // ========================================================================
    // Visibility leakage
    // ========================================================================

    /// The module an exported declaration publishes from, when visibility
    /// leakage applies to it at all.
    fn exported_from_module(&self, decl: DeclId) -> Option<DeclId> {
        if !self.binder.decl(decl).is_exported() {
            return None;
        }
        let parent = self.binder.decl(decl).parent?;
        self.binder
            .enclosing(parent, |k| k == DeclKind::Module)
    }

    fn check_exported_function_surface(&mut self, func: DeclId) {
        let Some(module) = self.exported_from_module(func) else { return };
        let node = self.binder.decl(func).node;
        let NodeKind::Func { name, params, return_ty, .. } = self.ast.kind(node).clone() else {
            return;
        };
        let func_name = match name {
            Some(name) => self.name_text(name),
            None => "expression".to_string(),
        };
        let ctx = ResolutionContext::new(func);
        for param in params {
            let NodeKind::Param { name: param_name, ty: Some(ty), .. } = self.ast.kind(param).clone()
            else {
                continue;
            };
            let param_ty = self.resolve_type_annotation(&ctx, ty);
            if let Some(leak) = self.private_type_violation(param_ty, module) {
                let param_text = self.name_text(param_name);
                let msg = match leak {
                    SurfaceLeak::PrivateType(_) => {
                        &messages::PARAMETER_0_OF_EXPORTED_1_HAS_OR_IS_USING_PRIVATE_TYPE_2
                    }
                    SurfaceLeak::InaccessibleModule(_) => {
                        &messages::PARAMETER_0_OF_EXPORTED_1_IS_USING_INACCESSIBLE_MODULE_2
                    }
                };
                self.error_at(false, param, msg, &[&param_text, &func_name, leak.name()]);
            }
        }
        if let Some(return_ty) = return_ty {
            let ret = self.resolve_type_annotation(&ctx, return_ty);
            if let Some(leak) = self.private_type_violation(ret, module) {
                let msg = match leak {
                    SurfaceLeak::PrivateType(_) => {
                        &messages::RETURN_TYPE_OF_EXPORTED_0_HAS_OR_IS_USING_PRIVATE_TYPE_1
                    }
                    SurfaceLeak::InaccessibleModule(_) => {
                        &messages::RETURN_TYPE_OF_EXPORTED_0_IS_USING_INACCESSIBLE_MODULE_1
                    }
                };
                self.error_at(false, return_ty, msg, &[&func_name, leak.name()]);
            }
        }
    }

    fn check_exported_class_surface(
        &mut self,
        decl: DeclId,
        instance: TypeId,
        class_name: &str,
        module: DeclId,
    ) {
        // Extends/implements clauses are part of the public surface.
        let bases = match self.types.kind(instance) {
            TypeKind::Named { base_types, .. } => base_types.clone(),
            _ => Vec::new(),
        };
        let class_node = self.binder.decl(decl).node;
        for base in bases {
            if let Some(leak) = self.private_type_violation(base, module) {
                self.error_at(
                    false,
                    class_node,
                    &messages::EXTENDS_CLAUSE_OF_EXPORTED_0_HAS_OR_IS_USING_PRIVATE_TYPE_1,
                    &[class_name, leak.name()],
                );
            }
        }
        let members: Vec<(InternedString, TypeId, bool, Option<DeclId>)> =
            match self.types.kind(instance) {
                TypeKind::Named { shape, .. } => shape
                    .members
                    .iter()
                    .map(|(n, m)| (*n, m.ty, m.private, m.origin))
                    .collect(),
                _ => Vec::new(),
            };
        for (member_name, member_ty, private, origin) in members {
            if private {
                continue;
            }
            if let Some(leak) = self.private_type_violation(member_ty, module) {
                let member_text = self.name_text(member_name);
                let node = origin.map(|d| self.binder.decl(d).node).unwrap_or(class_node);
                let msg = match leak {
                    SurfaceLeak::PrivateType(_) => {
                        &messages::PROPERTY_0_OF_EXPORTED_1_HAS_OR_IS_USING_PRIVATE_TYPE_2
                    }
                    SurfaceLeak::InaccessibleModule(_) => {
                        &messages::PROPERTY_0_OF_EXPORTED_1_IS_USING_INACCESSIBLE_MODULE_2
                    }
                };
                self.error_at(false, node, msg, &[&member_text, class_name, leak.name()]);
            }
        }
    }

    /// A way the public surface of `module` reaches something it does not
    /// export, found from `ty`'s structure.
    fn private_type_violation(&mut self, ty: TypeId, module: DeclId) -> Option<SurfaceLeak> {
        self.private_type_violation_depth(ty, module, 0)
    }

    fn private_type_violation_depth(
        &mut self,
        ty: TypeId,
        module: DeclId,
        depth: u32,
    ) -> Option<SurfaceLeak> {
        if depth > 4 {
            return None;
        }
        match self.types.kind(ty).clone() {
            TypeKind::Array { element } => {
                self.private_type_violation_depth(element, module, depth + 1)
            }
            TypeKind::Named { type_args, .. } => {
                if let Some(symbol) = self.types.symbol_of(ty) {
                    if let Some(leak) = self.symbol_leak_from(symbol, module) {
                        return Some(leak);
                    }
                }
                for arg in type_args {
                    if let Some(found) = self.private_type_violation_depth(arg, module, depth + 1) {
                        return Some(found);
                    }
                }
                None
            }
            TypeKind::Enum => {
                let symbol = self.types.symbol_of(ty)?;
                self.symbol_leak_from(symbol, module)
            }
            _ => None,
        }
    }

    /// How `symbol` escapes the export surface of `module`, if it does.
    /// A type declared directly in `module` but not exported is a private
    /// type; a type reached only through a non-exported nested module is
    /// an inaccessible-module leak, named after that module.
    fn symbol_leak_from(&self, symbol: SymbolId, module: DeclId) -> Option<SurfaceLeak> {
        let primary = self.binder.symbol(symbol).primary_decl();
        // Modules enclosing the declaration, nearest first, up to `module`.
        let mut chain = Vec::new();
        let mut current = self.binder.decl(primary).parent;
        let mut inside = false;
        while let Some(decl_id) = current {
            let decl = self.binder.decl(decl_id);
            if decl_id == module {
                inside = true;
                break;
            }
            if decl.kind == DeclKind::Module {
                chain.push(decl_id);
            }
            current = decl.parent;
        }
        if !inside {
            return None;
        }
        for &nested in chain.iter().rev() {
            if !self.binder.decl(nested).is_exported() {
                let name = self
                    .binder
                    .decl(nested)
                    .name
                    .unwrap_or(self.binder.symbol(self.binder.decl(nested).symbol).name);
                return Some(SurfaceLeak::InaccessibleModule(self.name_text(name)));
            }
        }
        if !self.binder.decl(primary).is_exported() {
            let name = self.binder.symbol(symbol).name;
            return Some(SurfaceLeak::PrivateType(self.name_text(name)));
        }
        None
    }
}

/// A reference from an exported surface to something its module keeps
/// internal.
enum SurfaceLeak {
    PrivateType(String),
    InaccessibleModule(String),
}

impl SurfaceLeak {
    fn name(&self) -> &str {
        match self {
            SurfaceLeak::PrivateType(name) | SurfaceLeak::InaccessibleModule(name) => name,
        }
    }
}
