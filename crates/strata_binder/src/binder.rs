//! The binding pass.
//!
//! Creates skeletal declarations and unresolved symbols for every named
//! construct in a unit, wiring up the scope tree the resolver walks for
//! name lookup. Object literals and inline function expressions are not
//! pre-created; the resolver requests them through the `bind_*` entry
//! points when it reaches them.

use crate::decl::{DeclFlags, DeclKind, Declaration};
use crate::symbol::{Symbol, SymbolFlags, SymbolState};
use strata_ast::node::{Ast, FuncKind, NodeKind};
use strata_ast::types::{DeclId, NodeFlags, NodeId, SymbolId};
use strata_core::intern::{InternedString, StringInterner};
use strata_diagnostics::{messages, Diagnostic, DiagnosticCollection};
use rustc_hash::FxHashMap;
use tracing::trace;

/// Which of a container's two name tables a symbol is declared into.
#[derive(Copy, Clone, Eq, PartialEq)]
enum Table {
    Locals,
    Members,
}

/// Owns the declaration and symbol arenas for one compilation session.
pub struct Binder {
    interner: StringInterner,
    decls: Vec<Declaration>,
    symbols: Vec<Symbol>,
    /// Declaration created from each bound syntax node.
    node_decl: FxHashMap<NodeId, DeclId>,
    /// Unit-level names, shared by every unit in the batch.
    globals: FxHashMap<InternedString, SymbolId>,
    diagnostics: DiagnosticCollection,
}

impl Binder {
    pub fn new(interner: StringInterner) -> Self {
        Self {
            interner,
            decls: Vec::with_capacity(128),
            symbols: Vec::with_capacity(128),
            node_decl: FxHashMap::default(),
            globals: FxHashMap::default(),
            diagnostics: DiagnosticCollection::new(),
        }
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    // ========================================================================
    // Arena access
    // ========================================================================

    #[inline]
    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id.index()]
    }

    #[inline]
    pub fn decl_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.decls[id.index()]
    }

    #[inline]
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    #[inline]
    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    /// The declaration created from `node`, if the node has been bound.
    pub fn decl_of_node(&self, node: NodeId) -> Option<DeclId> {
        self.node_decl.get(&node).copied()
    }

    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    // ========================================================================
    // Name lookup
    // ========================================================================

    /// Walk the enclosing-declaration chain looking for `name` with one of
    /// the `meaning` flags, falling back to the batch-wide globals.
    pub fn resolve_name(&self, from: DeclId, name: InternedString, meaning: SymbolFlags) -> Option<SymbolId> {
        let mut current = Some(from);
        while let Some(decl_id) = current {
            let decl = self.decl(decl_id);
            if let Some(&symbol) = decl.locals.get(&name) {
                if self.symbol(symbol).flags.intersects(meaning) {
                    return Some(symbol);
                }
            }
            current = decl.parent;
        }
        self.globals
            .get(&name)
            .copied()
            .filter(|&s| self.symbol(s).flags.intersects(meaning))
    }

    /// Look up a member of a container declaration (class, interface,
    /// module, enum, object literal).
    pub fn member_of(&self, container: DeclId, name: InternedString) -> Option<SymbolId> {
        self.decl(container).members.get(&name).copied()
    }

    /// Look up a batch-wide global by name.
    pub fn global(&self, name: InternedString) -> Option<SymbolId> {
        self.globals.get(&name).copied()
    }

    /// The nearest enclosing declaration of one of the given kinds.
    pub fn enclosing(&self, from: DeclId, pred: impl Fn(DeclKind) -> bool) -> Option<DeclId> {
        let mut current = Some(from);
        while let Some(decl_id) = current {
            let decl = self.decl(decl_id);
            if pred(decl.kind) {
                return Some(decl_id);
            }
            current = decl.parent;
        }
        None
    }

    // ========================================================================
    // Declaration/symbol creation
    // ========================================================================

    fn create_decl(&mut self, ast: &Ast, kind: DeclKind, node: NodeId, parent: Option<DeclId>) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        let mut decl = Declaration::new(id, kind, node, ast.span(node));
        decl.parent = parent;
        self.decls.push(decl);
        if let Some(parent) = parent {
            self.decl_mut(parent).children.push(id);
        }
        self.node_decl.insert(node, id);
        id
    }

    fn create_symbol(&mut self, name: InternedString, flags: SymbolFlags) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol::new(id, name, flags));
        id
    }

    /// Declare `decl` as `name` in the chosen table of `container`, merging
    /// with an existing symbol when the kinds allow it.
    fn declare(
        &mut self,
        container: DeclId,
        table: Table,
        name: InternedString,
        flags: SymbolFlags,
        decl: DeclId,
    ) -> SymbolId {
        let existing = match table {
            Table::Locals => self.decl(container).locals.get(&name).copied(),
            Table::Members => self.decl(container).members.get(&name).copied(),
        };

        let symbol = match existing {
            Some(existing) => {
                let prior = self.symbol(existing).flags;
                let merges = (prior & SymbolFlags::MERGEABLE).intersects(flags)
                    || (prior.intersects(SymbolFlags::ACCESSOR) && flags.intersects(SymbolFlags::ACCESSOR));
                if !merges {
                    let text = self.interner.resolve(name).to_string();
                    self.diagnostics
                        .add(Diagnostic::new(&messages::DUPLICATE_IDENTIFIER_0, &[&text]));
                }
                self.symbol_mut(existing).flags |= flags;
                existing
            }
            None => {
                let symbol = self.create_symbol(name, flags);
                match table {
                    Table::Locals => {
                        self.decl_mut(container).locals.insert(name, symbol);
                    }
                    Table::Members => {
                        self.decl_mut(container).members.insert(name, symbol);
                    }
                }
                symbol
            }
        };

        self.symbol_mut(symbol).declarations.push(decl);
        let d = self.decl_mut(decl);
        d.name = Some(name);
        d.symbol = symbol;
        symbol
    }

    fn decl_flags_of(&self, ast: &Ast, node: NodeId) -> DeclFlags {
        let node_flags = ast.flags(node);
        let mut flags = DeclFlags::NONE;
        if node_flags.contains(NodeFlags::EXPORTED) {
            flags |= DeclFlags::EXPORTED;
        }
        if node_flags.contains(NodeFlags::PRIVATE) {
            flags |= DeclFlags::PRIVATE;
        }
        if node_flags.contains(NodeFlags::STATIC) {
            flags |= DeclFlags::STATIC;
        }
        if node_flags.contains(NodeFlags::AMBIENT) {
            flags |= DeclFlags::AMBIENT;
        }
        if node_flags.contains(NodeFlags::OPTIONAL) {
            flags |= DeclFlags::OPTIONAL;
        }
        if node_flags.contains(NodeFlags::VARIADIC) {
            flags |= DeclFlags::VARIADIC;
        }
        if node_flags.contains(NodeFlags::ARROW) {
            flags |= DeclFlags::ARROW;
        }
        if node_flags.contains(NodeFlags::CONST) {
            flags |= DeclFlags::CONST;
        }
        if node_flags.contains(NodeFlags::PROPERTY) {
            flags |= DeclFlags::PARAM_PROPERTY;
        }
        flags
    }

    // ========================================================================
    // Unit binding
    // ========================================================================

    /// Bind one source unit, creating its declaration subtree. Unit-level
    /// names are also published to the batch-wide global table.
    pub fn bind_unit(&mut self, ast: &Ast, unit: NodeId) -> DeclId {
        let NodeKind::Unit { name, statements } = ast.kind(unit) else {
            panic!("bind_unit called on a non-unit node");
        };
        let name = *name;
        let statements = statements.clone();
        trace!(unit = self.interner.resolve(name), "binding unit");

        let unit_decl = self.create_decl(ast, DeclKind::Unit, unit, None);
        self.decl_mut(unit_decl).name = Some(name);
        for stmt in statements {
            self.bind_statement(ast, stmt, unit_decl);
        }

        // Publish unit-level names globally; the batch behaves like one
        // shared script scope.
        let locals: Vec<(InternedString, SymbolId)> =
            self.decl(unit_decl).locals.iter().map(|(k, v)| (*k, *v)).collect();
        for (name, symbol) in locals {
            self.globals.entry(name).or_insert(symbol);
        }
        unit_decl
    }

    fn bind_statement(&mut self, ast: &Ast, node: NodeId, container: DeclId) {
        match ast.kind(node) {
            NodeKind::Var { .. } => {
                self.bind_variable(ast, node, container, DeclKind::Variable);
            }
            NodeKind::Func { kind: FuncKind::Function, .. } => {
                self.bind_function_like(ast, node, container, DeclKind::Function, Table::Locals);
            }
            NodeKind::Class { .. } => {
                self.bind_class(ast, node, container);
            }
            NodeKind::Interface { .. } => {
                self.bind_interface(ast, node, container);
            }
            NodeKind::Enum { .. } => {
                self.bind_enum(ast, node, container);
            }
            NodeKind::Module { .. } => {
                self.bind_module(ast, node, container);
            }
            NodeKind::Block { statements } => {
                let statements = statements.clone();
                for stmt in statements {
                    self.bind_statement(ast, stmt, container);
                }
            }
            NodeKind::If { then_branch, else_branch, .. } => {
                let (then_branch, else_branch) = (*then_branch, *else_branch);
                self.bind_statement(ast, then_branch, container);
                if let Some(else_branch) = else_branch {
                    self.bind_statement(ast, else_branch, container);
                }
            }
            NodeKind::While { body, .. } => {
                let body = *body;
                self.bind_statement(ast, body, container);
            }
            NodeKind::ForIn { index, body, .. } => {
                let (index, body) = (*index, *body);
                if matches!(ast.kind(index), NodeKind::Var { .. }) {
                    self.bind_variable(ast, index, container, DeclKind::Variable);
                }
                self.bind_statement(ast, body, container);
            }
            // Expression-bearing statements introduce no declarations at
            // bind time; literals inside them are bound on demand.
            NodeKind::ExprStmt { .. } | NodeKind::Return { .. } | NodeKind::Throw { .. } => {}
            _ => {}
        }
    }

    fn bind_variable(&mut self, ast: &Ast, node: NodeId, container: DeclId, kind: DeclKind) -> DeclId {
        let name = match ast.kind(node) {
            NodeKind::Var { name, .. } | NodeKind::Field { name, .. } => *name,
            NodeKind::Param { name, .. } => *name,
            _ => panic!("bind_variable on non-variable node"),
        };
        let decl = self.create_decl(ast, kind, node, Some(container));
        self.decl_mut(decl).flags = self.decl_flags_of(ast, node);
        let (flags, table) = match kind {
            DeclKind::Variable => (SymbolFlags::VARIABLE, Table::Locals),
            DeclKind::Field => (SymbolFlags::PROPERTY, Table::Members),
            DeclKind::Parameter => (SymbolFlags::PARAMETER, Table::Locals),
            _ => unreachable!(),
        };
        self.declare(container, table, name, flags, decl);
        decl
    }

    fn bind_type_params(&mut self, ast: &Ast, type_params: &[NodeId], container: DeclId) {
        for &tp in type_params {
            let NodeKind::TypeParam { name, .. } = ast.kind(tp) else { continue };
            let name = *name;
            let decl = self.create_decl(ast, DeclKind::TypeParameter, tp, Some(container));
            self.declare(container, Table::Locals, name, SymbolFlags::TYPE_PARAMETER, decl);
        }
    }

    fn bind_params(&mut self, ast: &Ast, params: &[NodeId], func_decl: DeclId) {
        for &param in params {
            let decl = self.create_decl(ast, DeclKind::Parameter, param, Some(func_decl));
            self.decl_mut(decl).flags = self.decl_flags_of(ast, param);
            let NodeKind::Param { name, .. } = ast.kind(param) else { continue };
            let name = *name;
            self.declare(func_decl, Table::Locals, name, SymbolFlags::PARAMETER, decl);
        }
    }

    /// Bind a function-shaped declaration: the decl itself, its type
    /// parameters and parameters, and the statements of its body.
    fn bind_function_like(
        &mut self,
        ast: &Ast,
        node: NodeId,
        container: DeclId,
        kind: DeclKind,
        table: Table,
    ) -> DeclId {
        let NodeKind::Func { name, type_params, params, body, kind: func_kind, .. } = ast.kind(node)
        else {
            panic!("bind_function_like on non-function node");
        };
        let name = *name;
        let type_params = type_params.clone();
        let params = params.clone();
        let body = *body;
        let func_kind = *func_kind;

        let decl = self.create_decl(ast, kind, node, Some(container));
        let mut flags = self.decl_flags_of(ast, node);
        if body.is_some() {
            flags |= DeclFlags::DEFINITION;
        }
        self.decl_mut(decl).flags = flags;

        if let Some(name) = name {
            let symbol_flags = match func_kind {
                FuncKind::Function => SymbolFlags::FUNCTION,
                FuncKind::Method => SymbolFlags::METHOD,
                FuncKind::Getter => SymbolFlags::PROPERTY | SymbolFlags::GET_ACCESSOR,
                FuncKind::Setter => SymbolFlags::PROPERTY | SymbolFlags::SET_ACCESSOR,
                FuncKind::Constructor | FuncKind::Expression => SymbolFlags::FUNCTION,
            };
            self.declare(container, table, name, symbol_flags, decl);
        } else if kind == DeclKind::Constructor {
            let ctor_name = self.interner.intern_static("constructor");
            self.declare(container, Table::Members, ctor_name, SymbolFlags::CONSTRUCTOR, decl);
        } else {
            // Anonymous function expression: give it a symbol with no table
            // entry so resolution state still has somewhere to live.
            let anon = self.interner.intern_static("__function");
            let symbol = self.create_symbol(anon, SymbolFlags::FUNCTION);
            self.symbol_mut(symbol).declarations.push(decl);
            self.decl_mut(decl).symbol = symbol;
        }

        self.bind_type_params(ast, &type_params, decl);
        self.bind_params(ast, &params, decl);
        if let Some(body) = body {
            self.bind_statement(ast, body, decl);
        }
        decl
    }

    fn bind_class(&mut self, ast: &Ast, node: NodeId, container: DeclId) -> DeclId {
        let NodeKind::Class { name, type_params, members, .. } = ast.kind(node) else {
            panic!("bind_class on non-class node");
        };
        let name = *name;
        let type_params = type_params.clone();
        let members = members.clone();

        let decl = self.create_decl(ast, DeclKind::Class, node, Some(container));
        self.decl_mut(decl).flags = self.decl_flags_of(ast, node);
        self.declare(container, Table::Locals, name, SymbolFlags::CLASS, decl);
        self.bind_type_params(ast, &type_params, decl);

        for member in members {
            match ast.kind(member) {
                NodeKind::Field { .. } => {
                    self.bind_variable(ast, member, decl, DeclKind::Field);
                }
                NodeKind::Func { kind, .. } => {
                    let member_kind = match kind {
                        FuncKind::Constructor => DeclKind::Constructor,
                        FuncKind::Getter => DeclKind::GetAccessor,
                        FuncKind::Setter => DeclKind::SetAccessor,
                        _ => DeclKind::Method,
                    };
                    let bound = self.bind_function_like(ast, member, decl, member_kind, Table::Members);
                    // Constructor parameter properties double as fields.
                    if member_kind == DeclKind::Constructor {
                        self.bind_param_properties(ast, bound, decl);
                    }
                }
                _ => {}
            }
        }
        decl
    }

    /// Create instance-field declarations for `public`/`private` constructor
    /// parameters.
    fn bind_param_properties(&mut self, ast: &Ast, ctor: DeclId, class: DeclId) {
        let NodeKind::Func { params, .. } = ast.kind(self.decl(ctor).node) else { return };
        let params = params.clone();
        for param in params {
            if !ast.flags(param).contains(NodeFlags::PROPERTY) {
                continue;
            }
            let NodeKind::Param { name, .. } = ast.kind(param) else { continue };
            let name = *name;
            let field = DeclId(self.decls.len() as u32);
            let mut field_decl = Declaration::new(field, DeclKind::Field, param, ast.span(param));
            field_decl.parent = Some(class);
            field_decl.flags = self.decl_flags_of(ast, param) | DeclFlags::PARAM_PROPERTY;
            self.decls.push(field_decl);
            self.decl_mut(class).children.push(field);
            self.declare(class, Table::Members, name, SymbolFlags::PROPERTY, field);
        }
    }

    fn bind_interface(&mut self, ast: &Ast, node: NodeId, container: DeclId) -> DeclId {
        let NodeKind::Interface { name, type_params, members, .. } = ast.kind(node) else {
            panic!("bind_interface on non-interface node");
        };
        let name = *name;
        let type_params = type_params.clone();
        let members = members.clone();

        let decl = self.create_decl(ast, DeclKind::Interface, node, Some(container));
        self.decl_mut(decl).flags = self.decl_flags_of(ast, node);
        self.declare(container, Table::Locals, name, SymbolFlags::INTERFACE, decl);
        self.bind_type_params(ast, &type_params, decl);

        for member in members {
            match ast.kind(member) {
                NodeKind::PropertySig { name, .. } => {
                    let name = *name;
                    let member_decl = self.create_decl(ast, DeclKind::Field, member, Some(decl));
                    self.decl_mut(member_decl).flags = self.decl_flags_of(ast, member);
                    self.declare(decl, Table::Members, name, SymbolFlags::PROPERTY, member_decl);
                }
                NodeKind::Func { kind: FuncKind::Method, .. } => {
                    self.bind_function_like(ast, member, decl, DeclKind::Method, Table::Members);
                }
                // Call/construct/index signatures contribute to the type
                // shape directly; they introduce no member name.
                _ => {}
            }
        }
        decl
    }

    fn bind_enum(&mut self, ast: &Ast, node: NodeId, container: DeclId) -> DeclId {
        let NodeKind::Enum { name, members } = ast.kind(node) else {
            panic!("bind_enum on non-enum node");
        };
        let name = *name;
        let members = members.clone();

        let decl = self.create_decl(ast, DeclKind::Enum, node, Some(container));
        self.decl_mut(decl).flags = self.decl_flags_of(ast, node);
        self.declare(container, Table::Locals, name, SymbolFlags::ENUM, decl);

        for member in members {
            let NodeKind::EnumMember { name } = ast.kind(member) else { continue };
            let name = *name;
            let member_decl = self.create_decl(ast, DeclKind::EnumMember, member, Some(decl));
            self.declare(decl, Table::Members, name, SymbolFlags::ENUM_MEMBER, member_decl);
        }
        decl
    }

    fn bind_module(&mut self, ast: &Ast, node: NodeId, container: DeclId) -> DeclId {
        let NodeKind::Module { name, body } = ast.kind(node) else {
            panic!("bind_module on non-module node");
        };
        let name = *name;
        let body = body.clone();

        let decl = self.create_decl(ast, DeclKind::Module, node, Some(container));
        self.decl_mut(decl).flags = self.decl_flags_of(ast, node);
        self.declare(container, Table::Locals, name, SymbolFlags::MODULE, decl);

        for stmt in body {
            self.bind_statement(ast, stmt, decl);
        }

        // Exported declarations are also visible as members of the module.
        let exported: Vec<(InternedString, SymbolId)> = self
            .decl(decl)
            .locals
            .iter()
            .filter(|(_, &symbol)| {
                let s = self.symbol(symbol);
                s.declarations
                    .iter()
                    .any(|&d| self.decl(d).flags.contains(DeclFlags::EXPORTED))
            })
            .map(|(k, v)| (*k, *v))
            .collect();
        for (name, symbol) in exported {
            self.decl_mut(decl).members.insert(name, symbol);
        }
        decl
    }

    // ========================================================================
    // On-demand binding
    // ========================================================================

    /// Bind an object literal discovered during resolution, creating a
    /// transient container declaration and one member declaration per
    /// property. Idempotent per node.
    pub fn bind_object_literal(&mut self, ast: &Ast, node: NodeId, parent: DeclId) -> DeclId {
        if let Some(existing) = self.decl_of_node(node) {
            return existing;
        }
        let NodeKind::ObjectLit { members } = ast.kind(node) else {
            panic!("bind_object_literal on non-object-literal node");
        };
        let members = members.clone();

        let decl = self.create_decl(ast, DeclKind::ObjectLiteral, node, Some(parent));
        let anon = self.interner.intern_static("__object");
        let symbol = self.create_symbol(anon, SymbolFlags::OBJECT_LITERAL);
        self.symbol_mut(symbol).declarations.push(decl);
        self.decl_mut(decl).symbol = symbol;

        for member in members {
            let NodeKind::ObjectLitMember { name, .. } = ast.kind(member) else { continue };
            let name = *name;
            let member_decl = self.create_decl(ast, DeclKind::ObjectLiteralMember, member, Some(decl));
            self.declare(decl, Table::Members, name, SymbolFlags::PROPERTY, member_decl);
        }
        decl
    }

    /// Bind an inline function expression discovered during resolution.
    /// Idempotent per node.
    pub fn bind_function_expression(&mut self, ast: &Ast, node: NodeId, parent: DeclId) -> DeclId {
        if let Some(existing) = self.decl_of_node(node) {
            return existing;
        }
        self.bind_function_like(ast, node, parent, DeclKind::FunctionExpression, Table::Locals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_ast::AstBuilder;

    fn bind(build: impl FnOnce(&mut AstBuilder) -> NodeId) -> (Ast, Binder, DeclId) {
        let interner = StringInterner::new();
        let mut b = AstBuilder::new(interner.clone());
        let unit = build(&mut b);
        let ast = b.finish();
        let mut binder = Binder::new(interner);
        let unit_decl = binder.bind_unit(&ast, unit);
        (ast, binder, unit_decl)
    }

    #[test]
    fn test_bind_variable() {
        let (_, binder, unit) = bind(|b| {
            let init = b.num(1.0);
            let v = b.var("x", None, Some(init));
            b.unit("test", vec![v])
        });
        let name = binder.interner().intern("x");
        let symbol = binder.resolve_name(unit, name, SymbolFlags::VALUE).unwrap();
        assert!(binder.symbol(symbol).flags.contains(SymbolFlags::VARIABLE));
        assert_eq!(binder.symbol(symbol).state, SymbolState::Unresolved);
    }

    #[test]
    fn test_function_overloads_share_symbol() {
        let (_, binder, unit) = bind(|b| {
            let p1 = b.number_ty();
            let param1 = b.param("a", Some(p1));
            let stub = b.func("f", vec![param1], None, None);
            let p2 = b.string_ty();
            let param2 = b.param("a", Some(p2));
            let body = b.block(vec![]);
            let def = b.func("f", vec![param2], None, Some(body));
            b.unit("test", vec![stub, def])
        });
        let name = binder.interner().intern("f");
        let symbol = binder.resolve_name(unit, name, SymbolFlags::VALUE).unwrap();
        assert_eq!(binder.symbol(symbol).declarations.len(), 2);
    }

    #[test]
    fn test_class_members_not_lexically_visible() {
        let (_, binder, unit) = bind(|b| {
            let ty = b.number_ty();
            let field = b.field("x", Some(ty), None);
            let class = b.class("C", None, vec![], vec![field]);
            b.unit("test", vec![class])
        });
        let x = binder.interner().intern("x");
        assert!(binder.resolve_name(unit, x, SymbolFlags::VALUE).is_none());
        let c = binder.interner().intern("C");
        let class_symbol = binder.resolve_name(unit, c, SymbolFlags::TYPE).unwrap();
        let class_decl = binder.symbol(class_symbol).primary_decl();
        assert!(binder.member_of(class_decl, x).is_some());
    }

    #[test]
    fn test_param_property_creates_field() {
        let (_, binder, unit) = bind(|b| {
            let ty = b.number_ty();
            let param = b.property_param("radius", Some(ty), true);
            let body = b.block(vec![]);
            let ctor = b.ctor(vec![param], Some(body));
            let class = b.class("Circle", None, vec![], vec![ctor]);
            b.unit("test", vec![class])
        });
        let c = binder.interner().intern("Circle");
        let class_symbol = binder.resolve_name(unit, c, SymbolFlags::TYPE).unwrap();
        let class_decl = binder.symbol(class_symbol).primary_decl();
        let radius = binder.interner().intern("radius");
        let field = binder.member_of(class_decl, radius).unwrap();
        assert!(binder.symbol(field).flags.contains(SymbolFlags::PROPERTY));
    }

    #[test]
    fn test_interface_merging() {
        let (_, binder, unit) = bind(|b| {
            let t1 = b.number_ty();
            let m1 = b.prop_sig("a", Some(t1));
            let i1 = b.interface("I", vec![], vec![m1]);
            let t2 = b.string_ty();
            let m2 = b.prop_sig("b", Some(t2));
            let i2 = b.interface("I", vec![], vec![m2]);
            b.unit("test", vec![i1, i2])
        });
        let name = binder.interner().intern("I");
        let symbol = binder.resolve_name(unit, name, SymbolFlags::TYPE).unwrap();
        assert_eq!(binder.symbol(symbol).declarations.len(), 2);
    }

    #[test]
    fn test_object_literal_bound_on_demand() {
        let (ast, mut binder, unit) = bind(|b| {
            let value = b.num(1.0);
            let obj = b.object(vec![("a", value)]);
            let v = b.var("o", None, Some(obj));
            b.unit("test", vec![v])
        });
        // Find the object literal node: it is the initializer of `o`.
        let name = binder.interner().intern("o");
        let symbol = binder.resolve_name(unit, name, SymbolFlags::VALUE).unwrap();
        let var_decl = binder.symbol(symbol).primary_decl();
        let NodeKind::Var { init: Some(obj_node), .. } = *ast.kind(binder.decl(var_decl).node) else {
            panic!("expected var with initializer");
        };
        assert!(binder.decl_of_node(obj_node).is_none());
        let obj_decl = binder.bind_object_literal(&ast, obj_node, var_decl);
        assert_eq!(binder.decl_of_node(obj_node), Some(obj_decl));
        // Second call is a no-op returning the same declaration.
        assert_eq!(binder.bind_object_literal(&ast, obj_node, var_decl), obj_decl);
    }
}
