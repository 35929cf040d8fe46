//! Typed indices into the program's symbol tables.

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(raw: u32) -> Self {
                $name(raw)
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            pub(crate) fn from_len(len: usize) -> Self {
                match u32::try_from(len) {
                    Ok(raw) => $name(raw),
                    Err(_) => panic!(concat!(stringify!($name), " table overflow")),
                }
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

define_id!(
    /// Index of a module in [`Program`](crate::Program).
    ModuleId
);
define_id!(
    /// Index of a class or interface.
    ClassId
);
define_id!(
    /// Index of a function: module functions, methods, constructors, and initializers.
    FunctionId
);
define_id!(
    /// Index of a member variable (module-level or class-level).
    VariableId
);
define_id!(
    /// Index of a local variable, parameter, or the `this`/`super` pseudo-locals.
    LocalId
);
define_id!(
    /// Index of a module export.
    ExportId
);
define_id!(
    /// Index into the program's [`TypeTable`](crate::TypeTable).
    TypeId
);

impl TypeId {
    pub const NULL: TypeId = TypeId(0);
    pub const BOOL: TypeId = TypeId(1);
    pub const NUMBER: TypeId = TypeId(2);
    pub const STRING: TypeId = TypeId(3);
    pub const DYNAMIC: TypeId = TypeId(4);
    pub const OBJECT: TypeId = TypeId(5);
    /// `dynamic[]`, the type of arrays lifted from host constants.
    pub const DYNAMIC_ARRAY: TypeId = TypeId(6);
}
