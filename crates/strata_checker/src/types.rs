//! Type system representation.
//!
//! Types are stored in a [`TypeTable`] arena and referenced by `TypeId`.
//! This keeps the recursive type graph lifetime-free and gives every type a
//! stable identity the relation caches can key on.

use indexmap::IndexMap;
use strata_ast::types::{DeclId, SymbolId, TypeId};
use strata_core::intern::InternedString;

/// A type in the checked language's type system.
#[derive(Debug, Clone)]
pub struct Type {
    pub id: TypeId,
    /// The symbol this type was resolved from, if any. Named types carry
    /// one; anonymous structural types do not.
    pub symbol: Option<SymbolId>,
    pub kind: TypeKind,
}

/// The specific data for each type kind.
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// any, string, number, boolean, void, null, undefined, and the
    /// internal error type.
    Intrinsic { name: &'static str },
    /// A string-literal type, used by specialized overload signatures.
    StringLiteral { value: InternedString },
    /// An enum type. Identity comes from the symbol; the member list lives
    /// on the enum's declaration.
    Enum,
    /// `T[]`. Covariant in its element.
    Array { element: TypeId },
    /// A type parameter in scope of a generic declaration.
    TypeParameter { constraint: Option<TypeId> },
    /// An anonymous structural type: object literals, object type literals,
    /// function types.
    Object(Shape),
    /// A class or interface type, possibly generic, possibly a
    /// specialization of one.
    Named {
        shape: Shape,
        /// Resolved extends/implements types, base class first.
        base_types: Vec<TypeId>,
        /// Type parameters of the generic declaration (empty when not
        /// generic).
        type_params: Vec<TypeId>,
        /// Type arguments when this is a specialization (empty on the
        /// generic itself).
        type_args: Vec<TypeId>,
        is_class: bool,
    },
}

/// Structural content shared by object and named types.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    /// Members in declaration order.
    pub members: IndexMap<InternedString, Member>,
    pub call_signatures: Vec<Signature>,
    pub construct_signatures: Vec<Signature>,
    pub index_signatures: Vec<IndexSignature>,
}

impl Shape {
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
            && self.call_signatures.is_empty()
            && self.construct_signatures.is_empty()
            && self.index_signatures.is_empty()
    }
}

/// One named member of a shape.
#[derive(Debug, Clone)]
pub struct Member {
    pub ty: TypeId,
    pub optional: bool,
    pub private: bool,
    /// Declaration the member originated from. Private members relate only
    /// when they share an origin.
    pub origin: Option<DeclId>,
}

/// A call or construct signature.
#[derive(Debug, Clone)]
pub struct Signature {
    pub type_params: Vec<TypeId>,
    pub params: Vec<Param>,
    pub has_rest: bool,
    pub return_type: TypeId,
    /// Whether the declaring function had a body (vs an overload stub).
    pub is_definition: bool,
    /// Whether any parameter is typed with a string-literal type, marking
    /// this a specialized overload.
    pub specialized: bool,
    pub decl: Option<DeclId>,
}

impl Signature {
    /// Number of arguments that must be supplied.
    pub fn min_args(&self) -> usize {
        self.params.iter().filter(|p| !p.optional && !p.rest).count()
    }

    /// Whether `count` supplied arguments satisfy this signature's arity.
    pub fn accepts_arg_count(&self, count: usize) -> bool {
        if count < self.min_args() {
            return false;
        }
        self.has_rest || count <= self.params.len()
    }

    /// The parameter type matched against argument `i`, accounting for the
    /// rest parameter.
    pub fn param_type_at(&self, i: usize, element_of_rest: impl Fn(TypeId) -> TypeId) -> Option<TypeId> {
        if i < self.params.len() {
            let p = &self.params[i];
            if p.rest {
                return Some(element_of_rest(p.ty));
            }
            return Some(p.ty);
        }
        if self.has_rest {
            let p = self.params.last()?;
            return Some(element_of_rest(p.ty));
        }
        None
    }
}

/// A parameter in a signature.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: InternedString,
    pub ty: TypeId,
    pub optional: bool,
    pub rest: bool,
}

/// A string or number index signature.
#[derive(Debug, Clone)]
pub struct IndexSignature {
    /// Key type: the string or number intrinsic.
    pub key: TypeId,
    pub value: TypeId,
}

/// The type arena. Intrinsics are created up front at fixed ids.
#[derive(Debug)]
pub struct TypeTable {
    types: Vec<Type>,
    pub any_type: TypeId,
    pub string_type: TypeId,
    pub number_type: TypeId,
    pub boolean_type: TypeId,
    pub void_type: TypeId,
    pub null_type: TypeId,
    pub undefined_type: TypeId,
    /// Produced after an error has already been reported; relates to
    /// everything so one mistake does not cascade.
    pub error_type: TypeId,
}

impl TypeTable {
    pub fn new() -> Self {
        let mut table = Self {
            types: Vec::with_capacity(256),
            any_type: TypeId(0),
            string_type: TypeId(1),
            number_type: TypeId(2),
            boolean_type: TypeId(3),
            void_type: TypeId(4),
            null_type: TypeId(5),
            undefined_type: TypeId(6),
            error_type: TypeId(7),
        };
        table.create_intrinsic("any");
        table.create_intrinsic("string");
        table.create_intrinsic("number");
        table.create_intrinsic("boolean");
        table.create_intrinsic("void");
        table.create_intrinsic("null");
        table.create_intrinsic("undefined");
        table.create_intrinsic("error");
        table
    }

    fn create_intrinsic(&mut self, name: &'static str) -> TypeId {
        self.add(TypeKind::Intrinsic { name })
    }

    /// Allocate a type and return its handle.
    pub fn add(&mut self, kind: TypeKind) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(Type { id, symbol: None, kind });
        id
    }

    /// Allocate a type carrying its originating symbol.
    pub fn add_for_symbol(&mut self, symbol: SymbolId, kind: TypeKind) -> TypeId {
        let id = self.add(kind);
        self.types[id.index()].symbol = Some(symbol);
        id
    }

    #[inline]
    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: TypeId) -> &mut Type {
        &mut self.types[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: TypeId) -> &TypeKind {
        &self.types[id.index()].kind
    }

    pub fn symbol_of(&self, id: TypeId) -> Option<SymbolId> {
        self.types[id.index()].symbol
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    // ------------------------------------------------------------------
    // Classification helpers
    // ------------------------------------------------------------------

    pub fn is_any(&self, id: TypeId) -> bool {
        id == self.any_type
    }

    pub fn is_error(&self, id: TypeId) -> bool {
        id == self.error_type
    }

    /// The primitive types, null and undefined included.
    pub fn is_primitive(&self, id: TypeId) -> bool {
        matches!(self.kind(id), TypeKind::Intrinsic { .. } | TypeKind::StringLiteral { .. })
    }

    pub fn is_number_like(&self, id: TypeId) -> bool {
        id == self.number_type || matches!(self.kind(id), TypeKind::Enum)
    }

    pub fn is_string_like(&self, id: TypeId) -> bool {
        id == self.string_type || matches!(self.kind(id), TypeKind::StringLiteral { .. })
    }

    /// Object-like types: named types, anonymous shapes, arrays.
    pub fn is_object_like(&self, id: TypeId) -> bool {
        matches!(
            self.kind(id),
            TypeKind::Object(_) | TypeKind::Named { .. } | TypeKind::Array { .. }
        )
    }

    /// Whether a named type is generic and not yet specialized.
    pub fn is_unspecialized_generic(&self, id: TypeId) -> bool {
        matches!(
            self.kind(id),
            TypeKind::Named { type_params, type_args, .. }
                if !type_params.is_empty() && type_args.is_empty()
        )
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intrinsics_have_fixed_ids() {
        let table = TypeTable::new();
        assert_eq!(table.any_type, TypeId(0));
        assert!(matches!(table.kind(table.void_type), TypeKind::Intrinsic { name: "void" }));
        assert!(table.is_primitive(table.null_type));
        assert!(!table.is_object_like(table.number_type));
    }

    #[test]
    fn test_signature_arity() {
        let table = TypeTable::new();
        let name = InternedString::dummy();
        let sig = Signature {
            type_params: vec![],
            params: vec![
                Param { name, ty: table.number_type, optional: false, rest: false },
                Param { name, ty: table.string_type, optional: true, rest: false },
            ],
            has_rest: false,
            return_type: table.void_type,
            is_definition: true,
            specialized: false,
            decl: None,
        };
        assert_eq!(sig.min_args(), 1);
        assert!(sig.accepts_arg_count(1));
        assert!(sig.accepts_arg_count(2));
        assert!(!sig.accepts_arg_count(0));
        assert!(!sig.accepts_arg_count(3));
    }
}
