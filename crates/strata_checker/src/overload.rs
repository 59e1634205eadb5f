//! Call and overload resolution.
//!
//! Candidates are filtered by arity, then tried in two phases: an exact
//! phase where every argument is identical to its parameter, and a
//! conversion phase where assignability suffices. A non-empty exact
//! bucket evicts the conversion bucket. Within a bucket the survivors are
//! ranked pairwise: an identical-parameter match wins, then a
//! string-literal parameter matched exactly, then the narrower parameter
//! list, then a clean argument pass for the earlier candidate; a pair no
//! rule separates makes the call ambiguous, and the earlier candidate
//! stands. Arguments are typed provisionally while trying candidates;
//! only the chosen signature's contextual types are applied for real, so
//! rejected candidates leave no diagnostics and no cache entries behind.

use crate::checker::Checker;
use crate::context::ResolutionContext;
use crate::types::{Signature, TypeKind};
use strata_ast::node::NodeKind;
use strata_ast::types::{NodeId, TypeId};
use strata_diagnostics::messages;
use rustc_hash::FxHashMap;
use tracing::trace;

/// Result of trying one candidate signature against the argument list.
struct CandidateMatch {
    /// The signature with type parameters substituted away.
    sig: Signature,
    /// Type arguments that were inferred (None when explicit or
    /// non-generic).
    inferred: Option<Vec<TypeId>>,
    /// Argument types as they resolved under this candidate's contextual
    /// parameter types.
    arg_types: Vec<TypeId>,
    /// Diagnostics that would have been produced while typing the
    /// arguments under this candidate.
    suppressed_errors: u32,
}

/// Outcome of ranking two matched candidates.
#[derive(Copy, Clone, Eq, PartialEq)]
enum Preference {
    First,
    Second,
    Neither,
}

impl Checker {
    // ========================================================================
    // Call-site entry points
    // ========================================================================

    pub(crate) fn resolve_call_expression(&mut self, ctx: &ResolutionContext, node: NodeId) -> TypeId {
        let NodeKind::Call { target, type_args, args } = self.ast.kind(node).clone() else {
            return self.types.error_type;
        };
        if matches!(self.ast.kind(target), NodeKind::Super) {
            return self.resolve_super_call(ctx, node, &args);
        }
        let plain = ctx.with_contextual_type(None);
        let target_ty = self.resolve_expression(&plain, target);
        if self.types.is_any(target_ty) || self.types.is_error(target_ty) {
            self.resolve_args_plainly(ctx, &args);
            return self.types.any_type;
        }
        let type_arg_tys: Vec<TypeId> =
            type_args.iter().map(|&a| self.resolve_type_annotation(ctx, a)).collect();
        let signatures = self
            .apparent_shape(target_ty)
            .map(|s| s.call_signatures)
            .unwrap_or_default();
        if signatures.is_empty() {
            let text = self.type_to_string(target_ty);
            self.error_at(ctx.provisional, node, &messages::VALUE_OF_TYPE_0_IS_NOT_CALLABLE, &[&text]);
            self.resolve_args_plainly(ctx, &args);
            return self.types.error_type;
        }
        self.resolve_overload(ctx, node, signatures, &type_arg_tys, &args)
    }

    pub(crate) fn resolve_new_expression(&mut self, ctx: &ResolutionContext, node: NodeId) -> TypeId {
        let NodeKind::New { target, type_args, args } = self.ast.kind(node).clone() else {
            return self.types.error_type;
        };
        let plain = ctx.with_contextual_type(None);
        let target_ty = self.resolve_expression(&plain, target);
        if self.types.is_any(target_ty) || self.types.is_error(target_ty) {
            self.resolve_args_plainly(ctx, &args);
            return self.types.any_type;
        }
        let type_arg_tys: Vec<TypeId> =
            type_args.iter().map(|&a| self.resolve_type_annotation(ctx, a)).collect();
        let signatures = self
            .apparent_shape(target_ty)
            .map(|s| s.construct_signatures)
            .unwrap_or_default();
        if signatures.is_empty() {
            let text = self.type_to_string(target_ty);
            self.error_at(ctx.provisional, node, &messages::VALUE_OF_TYPE_0_IS_NOT_NEWABLE, &[&text]);
            self.resolve_args_plainly(ctx, &args);
            return self.types.error_type;
        }
        let instance = self.resolve_overload(ctx, node, signatures, &type_arg_tys, &args);
        // `new G<T>` on a generic class: the construct signature returns
        // the raw generic; substitute the type arguments through.
        if !type_arg_tys.is_empty() && self.types.is_unspecialized_generic(instance) {
            return self.specialize(ctx.provisional, node, instance, type_arg_tys);
        }
        if self.types.is_unspecialized_generic(instance) {
            return self.specialize_to_any(node, instance);
        }
        instance
    }

    fn resolve_super_call(&mut self, ctx: &ResolutionContext, node: NodeId, args: &[NodeId]) -> TypeId {
        let Some(base) = ctx.super_type.filter(|_| ctx.in_constructor) else {
            self.error_at(
                ctx.provisional,
                node,
                &messages::SUPER_CALLS_ARE_ONLY_PERMITTED_IN_CONSTRUCTORS_OF_DERIVED_CLASSES,
                &[],
            );
            self.resolve_args_plainly(ctx, args);
            return self.types.void_type;
        };
        let signatures = match self.types.symbol_of(base) {
            Some(symbol) => {
                self.resolve_symbol(symbol);
                self.container_types
                    .get(&symbol)
                    .copied()
                    .and_then(|c| self.apparent_shape(c))
                    .map(|s| s.construct_signatures)
                    .unwrap_or_default()
            }
            None => Vec::new(),
        };
        if signatures.is_empty() {
            self.resolve_args_plainly(ctx, args);
        } else {
            self.resolve_overload(ctx, node, signatures, &[], args);
        }
        self.types.void_type
    }

    fn resolve_args_plainly(&mut self, ctx: &ResolutionContext, args: &[NodeId]) {
        let plain = ctx.with_contextual_type(None);
        for &arg in args {
            self.resolve_expression(&plain, arg);
        }
    }

    // ========================================================================
    // Overload selection
    // ========================================================================

    fn resolve_overload(
        &mut self,
        ctx: &ResolutionContext,
        node: NodeId,
        signatures: Vec<Signature>,
        type_args: &[TypeId],
        args: &[NodeId],
    ) -> TypeId {
        // When overload stubs exist, the implementation signature is not a
        // candidate.
        let has_stubs = signatures.iter().any(|s| !s.is_definition);
        let mut candidates: Vec<Signature> = signatures
            .into_iter()
            .filter(|s| !has_stubs || !s.is_definition)
            .filter(|s| s.accepts_arg_count(args.len()))
            .collect();
        if candidates.is_empty() {
            self.error_at(ctx.provisional, node, &messages::NO_MATCHING_SIGNATURE_FOR_CALL, &[]);
            self.resolve_args_plainly(ctx, args);
            return self.types.error_type;
        }
        // Specialized signatures are tried first; otherwise declaration
        // order is preserved.
        candidates.sort_by_key(|s| !s.specialized);

        trace!(candidates = candidates.len(), args = args.len(), "resolving overload");

        // Exact phase, then conversion phase.
        for exact in [true, false] {
            let mut matches: Vec<CandidateMatch> = Vec::new();
            for candidate in &candidates {
                if let Some(matched) = self.try_candidate(ctx, candidate, type_args, args, exact) {
                    matches.push(matched);
                }
            }
            let mut matches = matches.into_iter();
            let Some(first) = matches.next() else { continue };
            let mut best = first;
            let mut ambiguous = false;
            for matched in matches {
                match self.prefer_candidate(&best, &matched) {
                    Preference::First => {}
                    Preference::Second => best = matched,
                    // No rule separates the pair; the earlier candidate
                    // stands, but the call is ambiguous.
                    Preference::Neither => ambiguous = true,
                }
            }
            if ambiguous {
                self.error_at(ctx.provisional, node, &messages::AMBIGUOUS_CALL_EXPRESSION, &[]);
            }
            return self.finalize_call(ctx, node, best, args);
        }

        let mut remaining = candidates.into_iter();
        if let (Some(sig), None) = (remaining.next(), remaining.next()) {
            // One candidate: produce per-argument diagnostics against it.
            let chosen = self.substitute_candidate(ctx, &sig, type_args, args);
            return self.finalize_call(ctx, node, chosen, args);
        }
        self.error_at(ctx.provisional, node, &messages::NO_MATCHING_SIGNATURE_FOR_CALL, &[]);
        self.resolve_args_plainly(ctx, args);
        self.types.error_type
    }

    /// Try one candidate: substitute its type parameters, then type each
    /// argument provisionally under the candidate's contextual types.
    fn try_candidate(
        &mut self,
        ctx: &ResolutionContext,
        candidate: &Signature,
        type_args: &[TypeId],
        args: &[NodeId],
        exact: bool,
    ) -> Option<CandidateMatch> {
        if !candidate.type_params.is_empty()
            && !type_args.is_empty()
            && type_args.len() != candidate.type_params.len()
        {
            return None;
        }
        let prepared = self.substitute_candidate(ctx, candidate, type_args, args);
        let before = self.provisional_errors;
        let mut arg_types = Vec::with_capacity(args.len());
        for (i, &arg) in args.iter().enumerate() {
            let Some(param_ty) = self.param_type_at(&prepared.sig, i) else { break };
            let arg_ctx = ctx.provisional().with_contextual_type(Some(param_ty));
            let arg_ty = self.resolve_expression(&arg_ctx, arg);
            let related = if exact {
                self.is_identical(arg_ty, param_ty)
            } else {
                self.is_assignable(arg_ty, param_ty)
            };
            if !related {
                return None;
            }
            arg_types.push(arg_ty);
        }
        let suppressed_errors = self.provisional_errors - before;
        Some(CandidateMatch { arg_types, suppressed_errors, ..prepared })
    }

    /// Rank a matched pair: identical-parameter match, then a string
    /// literal matched exactly, then the narrower parameter list, then a
    /// clean argument pass weighed against the later candidate only.
    fn prefer_candidate(&mut self, first: &CandidateMatch, second: &CandidateMatch) -> Preference {
        let first_identical = self.params_match_identically(first);
        let second_identical = self.params_match_identically(second);
        if first_identical != second_identical {
            return if first_identical { Preference::First } else { Preference::Second };
        }
        let first_literal = self.matches_literal_param(first);
        let second_literal = self.matches_literal_param(second);
        if first_literal != second_literal {
            return if first_literal { Preference::First } else { Preference::Second };
        }
        let first_narrower = self.params_narrower(first, second);
        let second_narrower = self.params_narrower(second, first);
        if first_narrower != second_narrower {
            return if first_narrower { Preference::First } else { Preference::Second };
        }
        if second.suppressed_errors > 0 {
            return Preference::First;
        }
        Preference::Neither
    }

    fn params_match_identically(&mut self, matched: &CandidateMatch) -> bool {
        for (i, &arg) in matched.arg_types.iter().enumerate() {
            let Some(param_ty) = self.param_type_at(&matched.sig, i) else { continue };
            if !self.is_identical(arg, param_ty) {
                return false;
            }
        }
        true
    }

    /// Whether some argument hit a string-literal parameter exactly.
    fn matches_literal_param(&mut self, matched: &CandidateMatch) -> bool {
        for (i, &arg) in matched.arg_types.iter().enumerate() {
            let Some(param_ty) = self.param_type_at(&matched.sig, i) else { continue };
            if matches!(self.types.kind(param_ty), TypeKind::StringLiteral { .. })
                && self.is_identical(arg, param_ty)
            {
                return true;
            }
        }
        false
    }

    /// Whether every compared parameter of `first` is a subtype of the
    /// corresponding parameter of `second`.
    fn params_narrower(&mut self, first: &CandidateMatch, second: &CandidateMatch) -> bool {
        let compared = first.arg_types.len().max(second.arg_types.len());
        for i in 0..compared {
            let (Some(fp), Some(sp)) =
                (self.param_type_at(&first.sig, i), self.param_type_at(&second.sig, i))
            else {
                continue;
            };
            if !self.is_subtype(fp, sp) {
                return false;
            }
        }
        true
    }

    /// Resolve a candidate's type parameters: explicit arguments when
    /// given, inference from the argument types otherwise.
    fn substitute_candidate(
        &mut self,
        ctx: &ResolutionContext,
        candidate: &Signature,
        type_args: &[TypeId],
        args: &[NodeId],
    ) -> CandidateMatch {
        if candidate.type_params.is_empty() {
            return CandidateMatch {
                sig: candidate.clone(),
                inferred: None,
                arg_types: Vec::new(),
                suppressed_errors: 0,
            };
        }
        let (final_args, inferred) = if !type_args.is_empty() {
            (type_args.to_vec(), None)
        } else {
            // The uninstantiated parameter type flows as the contextual
            // type, so a function-expression argument types its parameters
            // from the candidate before inference runs.
            let plain = ctx.provisional();
            let arg_tys: Vec<TypeId> = args
                .iter()
                .enumerate()
                .map(|(i, &a)| {
                    let contextual = self.param_type_at(candidate, i);
                    let arg_ctx = plain.with_contextual_type(contextual);
                    self.resolve_expression(&arg_ctx, a)
                })
                .collect();
            let inferred = self.infer_type_arguments(candidate, &arg_tys);
            (inferred.clone(), Some(inferred))
        };
        let map: FxHashMap<TypeId, TypeId> = candidate
            .type_params
            .iter()
            .copied()
            .zip(final_args.iter().copied())
            .collect();
        let mut sig = self.instantiate_signature(candidate, &map);
        // instantiate_signature shields a signature's own parameters from
        // the outer map; here they are exactly what we substitute.
        sig.params = candidate
            .params
            .iter()
            .map(|p| crate::types::Param { ty: self.instantiate(p.ty, &map), ..p.clone() })
            .collect();
        sig.return_type = self.instantiate(candidate.return_type, &map);
        sig.type_params = Vec::new();
        CandidateMatch { sig, inferred, arg_types: Vec::new(), suppressed_errors: 0 }
    }

    /// Apply the chosen signature for real: type the arguments with its
    /// contextual types, report argument mismatches, and check inferred
    /// type arguments against their constraints.
    fn finalize_call(
        &mut self,
        ctx: &ResolutionContext,
        node: NodeId,
        chosen: CandidateMatch,
        args: &[NodeId],
    ) -> TypeId {
        if let Some(inferred) = &chosen.inferred {
            self.check_inferred_constraints(ctx, node, &chosen, inferred);
        }
        for (i, &arg) in args.iter().enumerate() {
            let Some(param_ty) = self.param_type_at(&chosen.sig, i) else { break };
            let arg_ctx = ctx.with_contextual_type(Some(param_ty));
            let arg_ty = self.resolve_expression(&arg_ctx, arg);
            self.check_assignable(
                ctx.provisional,
                arg_ty,
                param_ty,
                arg,
                &messages::ARGUMENT_OF_TYPE_0_IS_NOT_ASSIGNABLE_TO_PARAMETER_OF_TYPE_1,
            );
        }
        chosen.sig.return_type
    }

    fn check_inferred_constraints(
        &mut self,
        ctx: &ResolutionContext,
        node: NodeId,
        chosen: &CandidateMatch,
        inferred: &[TypeId],
    ) {
        let Some(decl) = chosen.sig.decl else { return };
        let original = self.binder.decl(decl).symbol;
        // Re-read the declared type parameters off the original signature
        // group; the chosen signature has had them substituted away.
        let original_ty = self.binder.symbol(original).ty;
        let Some(original_ty) = original_ty else { return };
        let type_params: Vec<TypeId> = match self.types.kind(original_ty) {
            TypeKind::Object(shape) => shape
                .call_signatures
                .iter()
                .find(|s| s.decl == Some(decl))
                .map(|s| s.type_params.clone())
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        let map: FxHashMap<TypeId, TypeId> =
            type_params.iter().copied().zip(inferred.iter().copied()).collect();
        for (&tp, &arg) in type_params.iter().zip(inferred.iter()) {
            let TypeKind::TypeParameter { constraint: Some(constraint) } = *self.types.kind(tp) else {
                continue;
            };
            let constraint = self.instantiate(constraint, &map);
            if !self.is_assignable(arg, constraint) {
                let arg_text = self.type_to_string(arg);
                let constraint_text = self.type_to_string(constraint);
                let param_text = self.type_to_string(tp);
                self.error_at(
                    ctx.provisional,
                    node,
                    &messages::TYPE_0_DOES_NOT_SATISFY_CONSTRAINT_1_FOR_TYPE_PARAMETER_2,
                    &[&arg_text, &constraint_text, &param_text],
                );
            }
        }
    }
}
