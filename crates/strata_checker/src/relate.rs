//! The type relation engine.
//!
//! Three relations of increasing tolerance: identity, subtype,
//! assignability. Each is memoized by `(source, target)` pair; an
//! in-progress pair is entered into the cache as an optimistic `true`
//! before the structural walk recurses, so self-referential types
//! terminate and relate by assumption unless a concrete mismatch is found.

use crate::checker::Checker;
use crate::types::{IndexSignature, Member, Shape, Signature, TypeKind};
use strata_ast::types::{NodeId, TypeId};
use strata_core::intern::InternedString;
use strata_diagnostics::{format_message, messages, DiagnosticMessage};

/// Which relation a comparison runs under.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Relation {
    Identity,
    Subtype,
    Assignable,
}

impl Checker {
    // ========================================================================
    // Entry points
    // ========================================================================

    pub fn is_identical(&mut self, source: TypeId, target: TypeId) -> bool {
        self.relate(source, target, Relation::Identity)
    }

    pub fn is_subtype(&mut self, source: TypeId, target: TypeId) -> bool {
        self.relate(source, target, Relation::Subtype)
    }

    pub fn is_assignable(&mut self, source: TypeId, target: TypeId) -> bool {
        self.relate(source, target, Relation::Assignable)
    }

    /// Assignability check that reports a located diagnostic on failure,
    /// with one nested detail line naming the first mismatching member.
    pub(crate) fn check_assignable(
        &mut self,
        provisional: bool,
        source: TypeId,
        target: TypeId,
        node: NodeId,
        msg: &DiagnosticMessage,
    ) -> bool {
        if self.is_assignable(source, target) {
            return true;
        }
        if provisional {
            self.provisional_errors += 1;
        } else {
            let source_text = self.type_to_string(source);
            let target_text = self.type_to_string(target);
            let mut diag = strata_diagnostics::Diagnostic::with_location(
                self.current_unit.clone(),
                self.ast.span(node),
                msg,
                &[&source_text, &target_text],
            );
            if let Some(detail) = self.relation_failure_detail(source, target) {
                diag = diag.with_detail(0, detail);
            }
            self.diagnostics.add(diag);
        }
        false
    }

    // ========================================================================
    // The relation proper
    // ========================================================================

    pub(crate) fn relate(&mut self, source: TypeId, target: TypeId, rel: Relation) -> bool {
        if source == target {
            return true;
        }
        if self.types.is_error(source) || self.types.is_error(target) {
            return true;
        }

        if rel == Relation::Identity {
            return self.relate_identical(source, target);
        }

        // Everything relates into any; a dynamic source converts but is
        // not a subtype of a concrete type.
        if self.types.is_any(target) {
            return true;
        }
        if self.types.is_any(source) {
            return rel == Relation::Assignable;
        }
        // undefined is at the bottom; null sits just above it.
        if source == self.types.undefined_type {
            return true;
        }
        if source == self.types.null_type {
            return target != self.types.undefined_type;
        }
        // Nothing else converts to void, null, or undefined.
        if target == self.types.void_type
            || target == self.types.null_type
            || target == self.types.undefined_type
        {
            return false;
        }

        // String literal types narrow string.
        if let TypeKind::StringLiteral { .. } = self.types.kind(source) {
            if target == self.types.string_type {
                return true;
            }
        }

        // Enums interconvert with number: both ways for assignability, only
        // enum-to-number for subtyping.
        if let TypeKind::Enum = self.types.kind(source) {
            if target == self.types.number_type {
                return true;
            }
        }
        if let TypeKind::Enum = self.types.kind(target) {
            if source == self.types.number_type {
                return rel == Relation::Assignable;
            }
        }

        // A type parameter relates through its constraint chain.
        if let TypeKind::TypeParameter { constraint } = self.types.kind(source) {
            return match *constraint {
                Some(constraint) => self.relate(constraint, target, rel),
                None => false,
            };
        }
        if let TypeKind::TypeParameter { .. } = self.types.kind(target) {
            return false;
        }

        if !self.types.is_object_like(target) {
            return false;
        }

        // Structural comparison from here; memoized with an optimistic
        // sentinel so recursive shapes terminate.
        let key = (source, target);
        let cache = match rel {
            Relation::Subtype => &mut self.subtype_cache,
            Relation::Assignable => &mut self.assignable_cache,
            Relation::Identity => unreachable!(),
        };
        if let Some(&cached) = cache.get(&key) {
            return cached;
        }
        cache.insert(key, true);
        let result = self.relate_structurally(source, target, rel);
        let cache = match rel {
            Relation::Subtype => &mut self.subtype_cache,
            Relation::Assignable => &mut self.assignable_cache,
            Relation::Identity => unreachable!(),
        };
        cache.insert(key, result);
        result
    }

    fn relate_identical(&mut self, source: TypeId, target: TypeId) -> bool {
        // Identity has no absorption: distinct intrinsics, enums, literals,
        // and type parameters are simply different.
        match (self.types.kind(source).clone(), self.types.kind(target).clone()) {
            (TypeKind::Array { element: a }, TypeKind::Array { element: b }) => {
                self.relate(a, b, Relation::Identity)
            }
            (TypeKind::Named { type_args: a, .. }, TypeKind::Named { type_args: b, .. })
                if self.types.symbol_of(source).is_some()
                    && self.types.symbol_of(source) == self.types.symbol_of(target) =>
            {
                // Two specializations of one generic are identical exactly
                // when their arguments are.
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|(&x, &y)| self.relate(x, y, Relation::Identity))
            }
            (TypeKind::Object(_), TypeKind::Object(_))
            | (TypeKind::Object(_), TypeKind::Named { .. })
            | (TypeKind::Named { .. }, TypeKind::Object(_))
            | (TypeKind::Named { .. }, TypeKind::Named { .. }) => {
                let key = (source, target);
                if let Some(&cached) = self.identity_cache.get(&key) {
                    return cached;
                }
                self.identity_cache.insert(key, true);
                let result = self.shapes_identical(source, target);
                self.identity_cache.insert(key, result);
                result
            }
            _ => false,
        }
    }

    // ========================================================================
    // Structural walks
    // ========================================================================

    fn relate_structurally(&mut self, source: TypeId, target: TypeId, rel: Relation) -> bool {
        // Nominal fast path: a named type relates to any of its transitive
        // base types without a member walk.
        if self.derives_from(source, target) {
            return true;
        }

        if let (TypeKind::Array { element: s }, TypeKind::Array { element: t }) =
            (self.types.kind(source).clone(), self.types.kind(target).clone())
        {
            // Arrays are covariant.
            return self.relate(s, t, rel);
        }

        let target_shape = self.apparent_shape(target);
        let source_shape = self.apparent_shape(source);
        let (Some(target_shape), source_shape) = (target_shape, source_shape) else {
            return false;
        };
        let Some(source_shape) = source_shape else {
            // A primitive with no apparent shape still satisfies an empty
            // target shape.
            return target_shape.is_empty();
        };

        for (name, target_member) in &target_shape.members {
            match source_shape.members.get(name) {
                None => {
                    if !target_member.optional {
                        return false;
                    }
                }
                Some(source_member) => {
                    if !self.members_compatible(source_member, target_member, rel) {
                        return false;
                    }
                }
            }
        }

        for target_sig in &target_shape.call_signatures {
            if !source_shape
                .call_signatures
                .iter()
                .any(|s| self.signature_related(s, target_sig, rel))
            {
                return false;
            }
        }
        for target_sig in &target_shape.construct_signatures {
            if !source_shape
                .construct_signatures
                .iter()
                .any(|s| self.signature_related(s, target_sig, rel))
            {
                return false;
            }
        }
        for target_index in &target_shape.index_signatures {
            if !self.index_satisfied(&source_shape, target_index, rel) {
                return false;
            }
        }
        true
    }

    fn members_compatible(&mut self, source: &Member, target: &Member, rel: Relation) -> bool {
        // A required target member cannot be fed from an optional source.
        if source.optional && !target.optional {
            return false;
        }
        // Private members only relate when they share a declaration origin.
        if source.private || target.private {
            if source.private != target.private {
                return false;
            }
            if source.origin.is_none() || source.origin != target.origin {
                return false;
            }
        }
        self.relate(source.ty, target.ty, rel)
    }

    fn signature_related(&mut self, source: &Signature, target: &Signature, rel: Relation) -> bool {
        if rel == Relation::Identity {
            return self.signatures_identical(source, target);
        }
        // The source must accept every argument list the target accepts.
        if source.min_args() > target.params.len() && !target.has_rest {
            return false;
        }
        let target_arity = if target.has_rest {
            source.params.len().max(target.params.len())
        } else {
            target.params.len()
        };
        if !source.has_rest && target_arity > source.params.len() && target.min_args() > source.params.len() {
            return false;
        }

        let compared = source.params.len().min(target.params.len());
        for i in 0..compared {
            let sp = source.params[i].ty;
            let tp = target.params[i].ty;
            let sp = if source.params[i].rest { self.element_type_of(sp) } else { sp };
            let tp = if target.params[i].rest { self.element_type_of(tp) } else { tp };
            // Parameters are compared bivariantly.
            if !self.relate(sp, tp, Relation::Assignable) && !self.relate(tp, sp, Relation::Assignable) {
                return false;
            }
        }

        // Any return type satisfies a void-returning target.
        if target.return_type == self.types.void_type {
            return true;
        }
        self.relate(source.return_type, target.return_type, rel)
    }

    fn index_satisfied(&mut self, source: &Shape, target: &IndexSignature, rel: Relation) -> bool {
        source
            .index_signatures
            .iter()
            .any(|s| s.key == target.key && {
                let (sv, tv) = (s.value, target.value);
                self.relate_index_values(sv, tv, rel)
            })
    }

    fn relate_index_values(&mut self, source: TypeId, target: TypeId, rel: Relation) -> bool {
        self.relate(source, target, rel)
    }

    fn shapes_identical(&mut self, source: TypeId, target: TypeId) -> bool {
        let (Some(source_shape), Some(target_shape)) =
            (self.apparent_shape(source), self.apparent_shape(target))
        else {
            return false;
        };
        if source_shape.members.len() != target_shape.members.len()
            || source_shape.call_signatures.len() != target_shape.call_signatures.len()
            || source_shape.construct_signatures.len() != target_shape.construct_signatures.len()
            || source_shape.index_signatures.len() != target_shape.index_signatures.len()
        {
            return false;
        }
        for (name, sm) in &source_shape.members {
            let Some(tm) = target_shape.members.get(name) else { return false };
            if sm.optional != tm.optional || sm.private != tm.private {
                return false;
            }
            if sm.private && sm.origin != tm.origin {
                return false;
            }
            if !self.relate(sm.ty, tm.ty, Relation::Identity) {
                return false;
            }
        }
        for (s, t) in source_shape.call_signatures.iter().zip(&target_shape.call_signatures) {
            if !self.signatures_identical(s, t) {
                return false;
            }
        }
        for (s, t) in source_shape
            .construct_signatures
            .iter()
            .zip(&target_shape.construct_signatures)
        {
            if !self.signatures_identical(s, t) {
                return false;
            }
        }
        for (s, t) in source_shape.index_signatures.iter().zip(&target_shape.index_signatures) {
            if s.key != t.key || !self.relate(s.value, t.value, Relation::Identity) {
                return false;
            }
        }
        true
    }

    fn signatures_identical(&mut self, source: &Signature, target: &Signature) -> bool {
        if source.params.len() != target.params.len()
            || source.has_rest != target.has_rest
            || source.type_params.len() != target.type_params.len()
        {
            return false;
        }
        for (sp, tp) in source.params.iter().zip(&target.params) {
            if sp.optional != tp.optional || sp.rest != tp.rest {
                return false;
            }
            if !self.relate(sp.ty, tp.ty, Relation::Identity) {
                return false;
            }
        }
        self.relate(source.return_type, target.return_type, Relation::Identity)
    }

    // ========================================================================
    // Shape and hierarchy helpers
    // ========================================================================

    /// Whether `source` transitively lists `target` among its base types.
    pub(crate) fn derives_from(&mut self, source: TypeId, target: TypeId) -> bool {
        let TypeKind::Named { base_types, .. } = self.types.kind(source) else {
            return false;
        };
        let bases = base_types.clone();
        for base in bases {
            if base == target || self.derives_from(base, target) {
                return true;
            }
        }
        false
    }

    /// The structural content of a type as seen by member access and the
    /// relation walk: named types flattened with inherited members
    /// (derived wins), primitives boxed through their global interface.
    pub(crate) fn apparent_shape(&mut self, ty: TypeId) -> Option<Shape> {
        match self.types.kind(ty).clone() {
            TypeKind::Object(shape) => Some(shape),
            TypeKind::Named { shape, base_types, .. } => {
                let mut flat = shape;
                for base in base_types {
                    if let Some(base_shape) = self.apparent_shape(base) {
                        for (name, member) in base_shape.members {
                            flat.members.entry(name).or_insert(member);
                        }
                        flat.call_signatures.extend(base_shape.call_signatures);
                        flat.construct_signatures.extend(base_shape.construct_signatures);
                        flat.index_signatures.extend(base_shape.index_signatures);
                    }
                }
                Some(flat)
            }
            TypeKind::Array { element } => Some(self.array_shape(element)),
            TypeKind::Intrinsic { .. } | TypeKind::StringLiteral { .. } | TypeKind::Enum => {
                let boxed = self.boxed_type_of(ty)?;
                self.apparent_shape(boxed)
            }
            TypeKind::TypeParameter { constraint } => {
                let constraint = constraint?;
                self.apparent_shape(constraint)
            }
        }
    }

    /// The element type of an array type, or `any` for anything else.
    pub(crate) fn element_type_of(&self, ty: TypeId) -> TypeId {
        match self.types.kind(ty) {
            TypeKind::Array { element } => *element,
            _ => self.types.any_type,
        }
    }

    // ========================================================================
    // Failure explanation
    // ========================================================================

    /// The first concrete mismatch between two unrelated shapes, rendered
    /// as a detail line. Mirrors the walk order of the relation itself.
    fn relation_failure_detail(&mut self, source: TypeId, target: TypeId) -> Option<String> {
        let target_shape = self.apparent_shape(target)?;
        let source_shape = self.apparent_shape(source).unwrap_or_default();
        for (name, target_member) in &target_shape.members {
            match source_shape.members.get(name) {
                None if !target_member.optional => {
                    let name_text = self.name_text(*name);
                    let source_text = self.type_to_string(source);
                    return Some(format_message(
                        messages::PROPERTY_0_IS_MISSING_IN_TYPE_1.message,
                        &[&name_text, &source_text],
                    ));
                }
                Some(source_member) => {
                    if source_member.private != target_member.private
                        || (source_member.private && source_member.origin != target_member.origin)
                    {
                        let name_text = self.name_text(*name);
                        let source_text = self.type_to_string(source);
                        let target_text = self.type_to_string(target);
                        return Some(format_message(
                            messages::PROPERTY_0_HAS_DIFFERENT_VISIBILITY_IN_TYPES_1_AND_2.message,
                            &[&name_text, &source_text, &target_text],
                        ));
                    }
                    if !self.members_compatible_quiet(source_member.clone(), target_member.clone()) {
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
        let source_text = self.type_to_string(source);
        let target_text = self.type_to_string(target);
        if !target_shape.call_signatures.is_empty() && source_shape.call_signatures.is_empty() {
            return Some(format_message(
                messages::CALL_SIGNATURES_OF_TYPES_0_AND_1_ARE_INCOMPATIBLE.message,
                &[&source_text, &target_text],
            ));
        }
        if !target_shape.construct_signatures.is_empty() && source_shape.construct_signatures.is_empty() {
            return Some(format_message(
                messages::CONSTRUCT_SIGNATURES_OF_TYPES_0_AND_1_ARE_INCOMPATIBLE.message,
                &[&source_text, &target_text],
            ));
        }
        if !target_shape.index_signatures.is_empty() && source_shape.index_signatures.is_empty() {
            return Some(format_message(
                messages::INDEX_SIGNATURES_OF_TYPES_0_AND_1_ARE_INCOMPATIBLE.message,
                &[&source_text, &target_text],
            ));
        }
        None
    }

    fn members_compatible_quiet(&mut self, source: Member, target: Member) -> bool {
        self.members_compatible(&source, &target, Relation::Assignable)
    }

    /// Look up a member by name through the apparent shape.
    pub(crate) fn member_type(&mut self, ty: TypeId, name: InternedString) -> Option<Member> {
        self.apparent_shape(ty)?.members.get(&name).cloned()
    }
}
