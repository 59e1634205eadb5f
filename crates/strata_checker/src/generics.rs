//! Generic specialization and type argument inference.
//!
//! Specialization is memoized by (generic, argument list). The specialized
//! type's shell is allocated and entered into the cache before any member
//! is substituted, so self-referential generics (`List<T>` whose members
//! mention `List<T>`) close back onto the shell instead of recursing.

use crate::checker::Checker;
use crate::types::{Param, Shape, Signature, TypeKind};
use strata_ast::types::{NodeId, TypeId};
use strata_diagnostics::messages;
use rustc_hash::FxHashMap;
use tracing::trace;

/// Substitution from type-parameter types to their arguments.
type TypeMap = FxHashMap<TypeId, TypeId>;

impl Checker {
    // ========================================================================
    // Specialization
    // ========================================================================

    /// Specialize a generic named type to concrete arguments. Reports on a
    /// non-generic target, an arity mismatch, or a violated constraint;
    /// always returns a usable type.
    pub(crate) fn specialize(
        &mut self,
        provisional: bool,
        node: NodeId,
        target: TypeId,
        args: Vec<TypeId>,
    ) -> TypeId {
        let TypeKind::Named { type_params, .. } = self.types.kind(target) else {
            let text = self.type_to_string(target);
            self.error_at(provisional, node, &messages::TYPE_0_IS_NOT_GENERIC, &[&text]);
            return self.types.error_type;
        };
        let type_params = type_params.clone();
        if type_params.is_empty() {
            let text = self.type_to_string(target);
            self.error_at(provisional, node, &messages::TYPE_0_IS_NOT_GENERIC, &[&text]);
            return self.types.error_type;
        }
        if args.len() != type_params.len() {
            self.error_at(
                provisional,
                node,
                &messages::EXPECTED_0_TYPE_ARGUMENTS_BUT_GOT_1,
                &[&type_params.len().to_string(), &args.len().to_string()],
            );
            return self.types.error_type;
        }

        if let Some(&cached) = self.specializations.get(&(target, args.clone())) {
            return cached;
        }

        let map: TypeMap = type_params.iter().copied().zip(args.iter().copied()).collect();

        // Constraints are checked against the fully substituted form, so a
        // constraint may mention sibling type parameters.
        for (&tp, &arg) in type_params.iter().zip(args.iter()) {
            let TypeKind::TypeParameter { constraint: Some(constraint) } = *self.types.kind(tp) else {
                continue;
            };
            let constraint = self.instantiate(constraint, &map);
            if !self.is_assignable(arg, constraint) {
                let arg_text = self.type_to_string(arg);
                let constraint_text = self.type_to_string(constraint);
                let param_text = self.type_to_string(tp);
                self.error_at(
                    provisional,
                    node,
                    &messages::TYPE_0_DOES_NOT_SATISFY_CONSTRAINT_1_FOR_TYPE_PARAMETER_2,
                    &[&arg_text, &constraint_text, &param_text],
                );
            }
        }

        trace!(target = ?target, args = ?args, "specializing generic type");

        let TypeKind::Named { is_class, .. } = *self.types.kind(target) else { unreachable!() };
        let symbol = self.types.symbol_of(target);
        // Shell first: enter the cache before substituting members.
        let shell = self.types.add(TypeKind::Named {
            shape: Shape::default(),
            base_types: Vec::new(),
            type_params: Vec::new(),
            type_args: args.clone(),
            is_class,
        });
        if let Some(symbol) = symbol {
            self.types.get_mut(shell).symbol = Some(symbol);
        }
        self.specializations.insert((target, args.clone()), shell);

        // If the generic itself is still mid-resolution its shape is
        // incomplete; defer substitution until it finishes.
        if let Some(symbol) = symbol {
            use strata_binder::SymbolState;
            let state = self.binder.symbol(symbol).state;
            if state == SymbolState::Resolving || state == SymbolState::ResolvingSpecialized {
                self.binder.symbol_mut(symbol).state = SymbolState::ResolvingSpecialized;
                self.pending_specializations.push((target, args, shell));
                return shell;
            }
        }
        let TypeKind::Named { shape, base_types, .. } = self.types.kind(target).clone() else {
            unreachable!()
        };
        let new_shape = self.instantiate_shape(&shape, &map);
        let new_bases: Vec<TypeId> = base_types.iter().map(|&b| self.instantiate(b, &map)).collect();
        let TypeKind::Named { shape, base_types, .. } = &mut self.types.get_mut(shell).kind else {
            unreachable!()
        };
        *shape = new_shape;
        *base_types = new_bases;
        shell
    }

    /// Re-substitute the shapes of specializations that were requested
    /// while `generic` was still resolving.
    pub(crate) fn flush_pending_specializations(&mut self, generic: TypeId) {
        let mut pending = Vec::new();
        self.pending_specializations.retain(|entry| {
            if entry.0 == generic {
                pending.push(entry.clone());
                false
            } else {
                true
            }
        });
        for (target, args, shell) in pending {
            let TypeKind::Named { shape, base_types, type_params, .. } =
                self.types.kind(target).clone()
            else {
                continue;
            };
            let map: TypeMap = type_params.iter().copied().zip(args.iter().copied()).collect();
            let new_shape = self.instantiate_shape(&shape, &map);
            let new_bases: Vec<TypeId> =
                base_types.iter().map(|&b| self.instantiate(b, &map)).collect();
            let TypeKind::Named { shape, base_types, .. } = &mut self.types.get_mut(shell).kind
            else {
                continue;
            };
            *shape = new_shape;
            *base_types = new_bases;
        }
    }

    /// Specialize a generic with `any` for every type parameter, the form
    /// used when a raw generic name appears where a type is needed.
    pub(crate) fn specialize_to_any(&mut self, node: NodeId, target: TypeId) -> TypeId {
        let TypeKind::Named { type_params, .. } = self.types.kind(target) else {
            return target;
        };
        let count = type_params.len();
        if count == 0 {
            return target;
        }
        let args = vec![self.types.any_type; count];
        self.specialize(false, node, target, args)
    }

    // ========================================================================
    // Substitution
    // ========================================================================

    pub(crate) fn instantiate(&mut self, ty: TypeId, map: &TypeMap) -> TypeId {
        if map.is_empty() {
            return ty;
        }
        if let Some(&mapped) = map.get(&ty) {
            return mapped;
        }
        match self.types.kind(ty).clone() {
            TypeKind::Intrinsic { .. }
            | TypeKind::StringLiteral { .. }
            | TypeKind::Enum
            | TypeKind::TypeParameter { .. } => ty,
            TypeKind::Array { element } => {
                let new_element = self.instantiate(element, map);
                if new_element == element {
                    ty
                } else {
                    self.types.add(TypeKind::Array { element: new_element })
                }
            }
            TypeKind::Object(shape) => {
                if !self.shape_mentions(&shape, map) {
                    return ty;
                }
                let new_shape = self.instantiate_shape(&shape, map);
                self.types.add(TypeKind::Object(new_shape))
            }
            TypeKind::Named { type_params, type_args, .. } => {
                if !type_args.is_empty() {
                    // A specialization: substitute into its arguments and
                    // re-specialize the underlying generic.
                    let generic = self.generic_of(ty);
                    let new_args: Vec<TypeId> =
                        type_args.iter().map(|&a| self.instantiate(a, map)).collect();
                    if new_args == type_args {
                        return ty;
                    }
                    return self.specialize(true, NodeId::INVALID, generic, new_args);
                }
                if !type_params.is_empty() {
                    // A raw generic mentioned inside its own body stands for
                    // the current instantiation.
                    let new_args: Vec<TypeId> =
                        type_params.iter().map(|&p| self.instantiate(p, map)).collect();
                    if new_args == type_params {
                        return ty;
                    }
                    return self.specialize(true, NodeId::INVALID, ty, new_args);
                }
                ty
            }
        }
    }

    pub(crate) fn instantiate_shape(&mut self, shape: &Shape, map: &TypeMap) -> Shape {
        let mut new_shape = Shape::default();
        for (name, member) in &shape.members {
            let mut member = member.clone();
            member.ty = self.instantiate(member.ty, map);
            new_shape.members.insert(*name, member);
        }
        new_shape.call_signatures =
            shape.call_signatures.iter().map(|s| self.instantiate_signature(s, map)).collect();
        new_shape.construct_signatures =
            shape.construct_signatures.iter().map(|s| self.instantiate_signature(s, map)).collect();
        new_shape.index_signatures = shape
            .index_signatures
            .iter()
            .map(|i| crate::types::IndexSignature { key: i.key, value: self.instantiate(i.value, map) })
            .collect();
        new_shape
    }

    pub(crate) fn instantiate_signature(&mut self, sig: &Signature, map: &TypeMap) -> Signature {
        // A signature's own type parameters shadow the outer substitution.
        let mut map = map.clone();
        for tp in &sig.type_params {
            map.remove(tp);
        }
        Signature {
            type_params: sig.type_params.clone(),
            params: sig
                .params
                .iter()
                .map(|p| Param { ty: self.instantiate(p.ty, &map), ..p.clone() })
                .collect(),
            has_rest: sig.has_rest,
            return_type: self.instantiate(sig.return_type, &map),
            is_definition: sig.is_definition,
            specialized: sig.specialized,
            decl: sig.decl,
        }
    }

    /// Whether any type the shape reaches directly is in the substitution's
    /// domain. Cheap pre-check that keeps substitution from copying shapes
    /// it would not change.
    fn shape_mentions(&self, shape: &Shape, map: &TypeMap) -> bool {
        let mentions = |ty: TypeId| self.type_mentions(ty, map, 0);
        shape.members.values().any(|m| mentions(m.ty))
            || shape.call_signatures.iter().any(|s| {
                s.params.iter().any(|p| mentions(p.ty)) || mentions(s.return_type)
            })
            || shape.construct_signatures.iter().any(|s| {
                s.params.iter().any(|p| mentions(p.ty)) || mentions(s.return_type)
            })
            || shape.index_signatures.iter().any(|i| mentions(i.value))
    }

    fn type_mentions(&self, ty: TypeId, map: &TypeMap, depth: u32) -> bool {
        if map.contains_key(&ty) {
            return true;
        }
        if depth > 8 {
            // Deep shapes are substituted unconditionally rather than
            // scanned further.
            return true;
        }
        match self.types.kind(ty) {
            TypeKind::Array { element } => self.type_mentions(*element, map, depth + 1),
            TypeKind::Named { type_args, .. } => {
                type_args.iter().any(|&a| self.type_mentions(a, map, depth + 1))
            }
            TypeKind::Object(shape) => {
                shape.members.values().any(|m| self.type_mentions(m.ty, map, depth + 1))
                    || shape.call_signatures.iter().any(|s| {
                        s.params.iter().any(|p| self.type_mentions(p.ty, map, depth + 1))
                            || self.type_mentions(s.return_type, map, depth + 1)
                    })
            }
            _ => false,
        }
    }

    /// The unspecialized generic a specialization was produced from.
    fn generic_of(&mut self, ty: TypeId) -> TypeId {
        match self.types.symbol_of(ty) {
            Some(symbol) => self.resolve_symbol(symbol),
            None => ty,
        }
    }

    // ========================================================================
    // Inference
    // ========================================================================

    /// Infer type arguments for a generic signature from the supplied
    /// argument types. A parameter with no usable candidates infers `any`.
    pub(crate) fn infer_type_arguments(&mut self, sig: &Signature, arg_types: &[TypeId]) -> Vec<TypeId> {
        let mut candidates: FxHashMap<TypeId, Vec<TypeId>> = FxHashMap::default();
        for tp in &sig.type_params {
            candidates.insert(*tp, Vec::new());
        }
        for (i, &arg) in arg_types.iter().enumerate() {
            let Some(param_ty) = self.param_type_at(sig, i) else { break };
            self.infer_from(param_ty, arg, &mut candidates, 0);
        }
        sig.type_params
            .iter()
            .map(|tp| {
                let found = candidates.get(tp).cloned().unwrap_or_default();
                match self.best_common_type(&found) {
                    Some(best) => self.widen(best),
                    None => self.types.any_type,
                }
            })
            .collect()
    }

    fn infer_from(
        &mut self,
        param: TypeId,
        arg: TypeId,
        candidates: &mut FxHashMap<TypeId, Vec<TypeId>>,
        depth: u32,
    ) {
        if depth > 16 {
            return;
        }
        if let Some(found) = candidates.get_mut(&param) {
            found.push(arg);
            return;
        }
        match (self.types.kind(param).clone(), self.types.kind(arg).clone()) {
            (TypeKind::Array { element: p }, TypeKind::Array { element: a }) => {
                self.infer_from(p, a, candidates, depth + 1);
            }
            (TypeKind::Named { type_args: p_args, .. }, TypeKind::Named { type_args: a_args, .. })
                if self.types.symbol_of(param).is_some()
                    && self.types.symbol_of(param) == self.types.symbol_of(arg) =>
            {
                for (&p, &a) in p_args.iter().zip(a_args.iter()) {
                    self.infer_from(p, a, candidates, depth + 1);
                }
            }
            (TypeKind::Object(p_shape), _) => {
                let Some(a_shape) = self.apparent_shape(arg) else { return };
                for (name, pm) in &p_shape.members {
                    if let Some(am) = a_shape.members.get(name) {
                        self.infer_from(pm.ty, am.ty, candidates, depth + 1);
                    }
                }
                for (ps, asig) in p_shape.call_signatures.iter().zip(&a_shape.call_signatures) {
                    for (pp, ap) in ps.params.iter().zip(&asig.params) {
                        self.infer_from(pp.ty, ap.ty, candidates, depth + 1);
                    }
                    self.infer_from(ps.return_type, asig.return_type, candidates, depth + 1);
                }
            }
            _ => {}
        }
    }

    pub(crate) fn param_type_at(&mut self, sig: &Signature, i: usize) -> Option<TypeId> {
        if i < sig.params.len() {
            let p = &sig.params[i];
            if p.rest {
                return Some(self.element_type_of(p.ty));
            }
            return Some(p.ty);
        }
        if sig.has_rest {
            let p = sig.params.last()?;
            return Some(self.element_type_of(p.ty));
        }
        None
    }
}
