//! Interned type table.

use rustc_hash::FxHashMap;

use crate::{ClassId, TypeId};

/// Parameter and return types of a function type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionSig {
    pub params: Vec<TypeId>,
    /// `None` for functions that return no value.
    pub ret: Option<TypeId>,
}

/// A bound type.
///
/// Structural types (arrays, pointers, functions, prototypes) are interned,
/// so two equal `Type`s always share one [`TypeId`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Null,
    Bool,
    Number,
    String,
    /// Untyped property bag; any value converts to and from it.
    Dynamic,
    /// The top type.
    Object,
    Array(TypeId),
    Pointer(TypeId),
    Function(FunctionSig),
    Class(ClassId),
    /// The type of the shared prototype object of the wrapped type.
    Prototype(TypeId),
}

/// Storage for all types of one program.
#[derive(Clone, Debug)]
pub struct TypeTable {
    types: Vec<Type>,
    index: FxHashMap<Type, TypeId>,
}

impl TypeTable {
    /// Create a table holding the predefined types at their fixed ids.
    pub fn new() -> Self {
        let mut table = TypeTable {
            types: Vec::new(),
            index: FxHashMap::default(),
        };
        for ty in [
            Type::Null,
            Type::Bool,
            Type::Number,
            Type::String,
            Type::Dynamic,
            Type::Object,
        ] {
            table.intern(ty);
        }
        let dynamic_array = table.intern(Type::Array(TypeId::DYNAMIC));
        debug_assert_eq!(dynamic_array, TypeId::DYNAMIC_ARRAY);
        table
    }

    /// Return the id of `ty`, adding it if not yet present.
    pub fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(&id) = self.index.get(&ty) {
            return id;
        }
        let id = TypeId::from_len(self.types.len());
        self.types.push(ty.clone());
        self.index.insert(ty, id);
        id
    }

    /// Look up an already interned type.
    pub fn lookup(&self, ty: &Type) -> Option<TypeId> {
        self.index.get(ty).copied()
    }

    /// Get the type for an id.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this table.
    #[inline]
    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}
