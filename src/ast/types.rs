use std::{
    fmt::Display,
    sync::atomic::{AtomicU32, Ordering},
};

use crate::Span;

static NEXT_TYPE_ID: AtomicU32 = AtomicU32::new(1);

/// Scalar types known to the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltInType {
    Void,
    Bool,
    Char,
    Int,
    Double,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    BuiltIn(BuiltInType),
    Pointer(Box<TypeSpecifier>),
    Array(Box<TypeSpecifier>, u32),
}

/// A syntactic type descriptor.
///
/// Every descriptor carries a unique `id`; the code generator memoizes the
/// resolved backend type under it, so a descriptor is resolved at most once.
#[derive(Debug, Clone)]
pub struct TypeSpecifier {
    pub kind: TypeKind,
    pub id: u32,
    pub span: Span,
}

impl PartialEq for TypeSpecifier {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl TypeSpecifier {
    pub fn new(kind: TypeKind, span: Span) -> Self {
        TypeSpecifier {
            kind,
            id: NEXT_TYPE_ID.fetch_add(1, Ordering::Relaxed),
            span,
        }
    }

    pub fn built_in(ty: BuiltInType, span: Span) -> Self {
        TypeSpecifier::new(TypeKind::BuiltIn(ty), span)
    }

    pub fn pointer_to(self, span: Span) -> Self {
        TypeSpecifier::new(TypeKind::Pointer(Box::new(self)), span)
    }

    pub fn array_of(self, size: u32, span: Span) -> Self {
        TypeSpecifier::new(TypeKind::Array(Box::new(self), size), span)
    }

    pub fn is_void(&self) -> bool {
        self.kind == TypeKind::BuiltIn(BuiltInType::Void)
    }
}

impl Display for BuiltInType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BuiltInType::Void => "void",
            BuiltInType::Bool => "bool",
            BuiltInType::Char => "char",
            BuiltInType::Int => "int",
            BuiltInType::Double => "double",
        };
        write!(f, "{}", name)
    }
}

impl Display for TypeSpecifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            TypeKind::BuiltIn(ty) => write!(f, "{}", ty),
            TypeKind::Pointer(element) => write!(f, "{}*", element),
            TypeKind::Array(element, size) => write!(f, "{}[{}]", element, size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        let int = TypeSpecifier::built_in(BuiltInType::Int, Span::null());
        let char_ptr = TypeSpecifier::built_in(BuiltInType::Char, Span::null()).pointer_to(Span::null());
        let matrix = TypeSpecifier::built_in(BuiltInType::Double, Span::null())
            .array_of(4, Span::null())
            .array_of(2, Span::null());

        assert_eq!(int.to_string(), "int");
        assert_eq!(char_ptr.to_string(), "char*");
        assert_eq!(matrix.to_string(), "double[4][2]");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = TypeSpecifier::built_in(BuiltInType::Int, Span::null());
        let b = TypeSpecifier::built_in(BuiltInType::Int, Span::null());

        assert_ne!(a.id, b.id);
        assert_eq!(a, b);
        assert!(TypeSpecifier::built_in(BuiltInType::Void, Span::null()).is_void());
    }
}
