//! The checker core.
//!
//! One `Checker` owns the syntax arena, the binder's declaration/symbol
//! tables, the type arena, and every cache. The engines are split across
//! sibling modules as `impl Checker` blocks: `resolver` (lazy symbol and
//! expression typing), `relate` (identity/subtype/assignability),
//! `generics` (specialization and inference), `overload` (call
//! resolution), and `check` (the statement-level pass).

use crate::types::{TypeKind, TypeTable};
use strata_ast::node::Ast;
use strata_ast::types::{NodeId, SymbolId, TypeId};
use strata_binder::Binder;
use strata_core::intern::InternedString;
use strata_diagnostics::{Diagnostic, DiagnosticCollection, DiagnosticMessage};
use rustc_hash::{FxHashMap, FxHashSet};

/// Recursion cap for type stringification; self-referential types would
/// otherwise print forever.
const MAX_TYPE_TO_STRING_DEPTH: u32 = 10;

/// The type checker: resolves types on demand and reports type errors.
pub struct Checker {
    pub types: TypeTable,
    pub(crate) ast: Ast,
    pub(crate) binder: Binder,
    pub(crate) diagnostics: DiagnosticCollection,
    /// Resolved type of each expression and annotation node. Not written
    /// during provisional resolution.
    pub(crate) node_types: FxHashMap<NodeId, TypeId>,
    /// Relation caches, one per relation. An in-progress pair holds an
    /// optimistic `true` so recursive types terminate.
    pub(crate) identity_cache: FxHashMap<(TypeId, TypeId), bool>,
    pub(crate) subtype_cache: FxHashMap<(TypeId, TypeId), bool>,
    pub(crate) assignable_cache: FxHashMap<(TypeId, TypeId), bool>,
    /// Specializations, keyed by generic type and exact argument list.
    pub(crate) specializations: FxHashMap<(TypeId, Vec<TypeId>), TypeId>,
    /// Value-side types of containers: class constructor-function types,
    /// enum objects, module objects.
    pub(crate) container_types: FxHashMap<SymbolId, TypeId>,
    /// Name of the unit the checking pass is currently inside, for
    /// diagnostic locations.
    pub(crate) current_unit: String,
    /// Units the checking pass already ran over. Re-checking a unit is a
    /// no-op rather than a duplicate batch of diagnostics.
    pub(crate) checked_units: FxHashSet<NodeId>,
    /// One string-literal type per distinct literal value.
    pub(crate) literal_string_types: FxHashMap<InternedString, TypeId>,
    /// Specializations requested while their generic was still mid
    /// resolution. The generic's shape was empty at that point; these are
    /// re-substituted once the generic finishes.
    pub(crate) pending_specializations: Vec<(TypeId, Vec<TypeId>, TypeId)>,
    /// Count of diagnostics suppressed by provisional resolution. Overload
    /// resolution compares deltas of this counter to prefer a candidate
    /// whose arguments resolved cleanly.
    pub(crate) provisional_errors: u32,
}

impl Checker {
    pub fn new(ast: Ast, binder: Binder) -> Self {
        Self {
            types: TypeTable::new(),
            ast,
            binder,
            diagnostics: DiagnosticCollection::new(),
            node_types: FxHashMap::default(),
            identity_cache: FxHashMap::default(),
            subtype_cache: FxHashMap::default(),
            assignable_cache: FxHashMap::default(),
            specializations: FxHashMap::default(),
            container_types: FxHashMap::default(),
            current_unit: String::new(),
            checked_units: FxHashSet::default(),
            literal_string_types: FxHashMap::default(),
            pending_specializations: Vec::new(),
            provisional_errors: 0,
        }
    }

    pub fn binder(&self) -> &Binder {
        &self.binder
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        let mut diags = self.binder.take_diagnostics();
        diags.extend(std::mem::take(&mut self.diagnostics));
        diags.sort();
        diags
    }

    pub(crate) fn error(&mut self, provisional: bool, msg: &DiagnosticMessage, args: &[&str]) {
        if provisional {
            self.provisional_errors += 1;
        } else {
            self.diagnostics.add(Diagnostic::new(msg, args));
        }
    }

    pub(crate) fn error_at(
        &mut self,
        provisional: bool,
        node: NodeId,
        msg: &DiagnosticMessage,
        args: &[&str],
    ) {
        if provisional {
            self.provisional_errors += 1;
            return;
        }
        let span = self.ast.span(node);
        let unit = self.unit_name_of(node);
        self.diagnostics.add(Diagnostic::with_location(unit, span, msg, args));
    }

    fn unit_name_of(&self, _node: NodeId) -> String {
        // Units share one node arena; the session records which unit a
        // diagnostic belongs to when it runs the pass per unit.
        self.current_unit.clone()
    }

    pub(crate) fn name_text(&self, name: InternedString) -> String {
        self.binder.interner().resolve(name).to_string()
    }

    // ========================================================================
    // Type stringification
    // ========================================================================

    /// Render a type for diagnostics.
    pub fn type_to_string(&self, ty: TypeId) -> String {
        self.type_to_string_depth(ty, 0)
    }

    fn type_to_string_depth(&self, ty: TypeId, depth: u32) -> String {
        if depth > MAX_TYPE_TO_STRING_DEPTH {
            return "...".to_string();
        }
        match self.types.kind(ty) {
            TypeKind::Intrinsic { name } => (*name).to_string(),
            TypeKind::StringLiteral { value } => format!("\"{}\"", self.name_text(*value)),
            TypeKind::Enum => self.symbol_name_of(ty),
            TypeKind::Array { element } => {
                format!("{}[]", self.type_to_string_depth(*element, depth + 1))
            }
            TypeKind::TypeParameter { .. } => self.symbol_name_of(ty),
            TypeKind::Named { type_args, .. } => {
                let base = self.symbol_name_of(ty);
                if type_args.is_empty() {
                    base
                } else {
                    let args: Vec<String> = type_args
                        .iter()
                        .map(|&a| self.type_to_string_depth(a, depth + 1))
                        .collect();
                    format!("{}<{}>", base, args.join(", "))
                }
            }
            TypeKind::Object(shape) => {
                if shape.members.is_empty() && shape.call_signatures.len() == 1 {
                    let sig = &shape.call_signatures[0];
                    let params: Vec<String> = sig
                        .params
                        .iter()
                        .map(|p| {
                            format!(
                                "{}: {}",
                                self.name_text(p.name),
                                self.type_to_string_depth(p.ty, depth + 1)
                            )
                        })
                        .collect();
                    return format!(
                        "({}) => {}",
                        params.join(", "),
                        self.type_to_string_depth(sig.return_type, depth + 1)
                    );
                }
                if shape.is_empty() {
                    return "{}".to_string();
                }
                let members: Vec<String> = shape
                    .members
                    .iter()
                    .map(|(name, m)| {
                        format!(
                            "{}: {};",
                            self.name_text(*name),
                            self.type_to_string_depth(m.ty, depth + 1)
                        )
                    })
                    .collect();
                format!("{{ {} }}", members.join(" "))
            }
        }
    }

    fn symbol_name_of(&self, ty: TypeId) -> String {
        match self.types.symbol_of(ty) {
            Some(symbol) => self.name_text(self.binder.symbol(symbol).name),
            None => "<anonymous>".to_string(),
        }
    }
}
