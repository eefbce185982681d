//! Type catalog.
//!
//! Resolves syntactic type descriptors to LLVM types. Each descriptor is
//! resolved at most once; the result is cached under the descriptor's id.

use std::collections::HashMap;

use inkwell::{
    context::Context,
    types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum, FunctionType},
    values::BasicValueEnum,
    AddressSpace,
};

use crate::ast::types::{BuiltInType, TypeKind, TypeSpecifier};

/// A resolved type. `void` has no LLVM value type, so it is kept apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedType<'ctx> {
    Void,
    Basic(BasicTypeEnum<'ctx>),
}

impl<'ctx> ResolvedType<'ctx> {
    pub fn as_basic(&self) -> Option<BasicTypeEnum<'ctx>> {
        match self {
            ResolvedType::Void => None,
            ResolvedType::Basic(ty) => Some(*ty),
        }
    }

    pub fn fn_type(
        &self,
        context: &'ctx Context,
        params: &[BasicMetadataTypeEnum<'ctx>],
        is_var_args: bool,
    ) -> FunctionType<'ctx> {
        match self {
            ResolvedType::Void => context.void_type().fn_type(params, is_var_args),
            ResolvedType::Basic(ty) => ty.fn_type(params, is_var_args),
        }
    }

    pub fn name(&self) -> String {
        match self {
            ResolvedType::Void => String::from("void"),
            ResolvedType::Basic(ty) => describe(*ty),
        }
    }
}

pub struct TypeCatalog<'ctx> {
    context: &'ctx Context,
    cache: HashMap<u32, ResolvedType<'ctx>>,
}

impl<'ctx> TypeCatalog<'ctx> {
    pub fn new(context: &'ctx Context) -> Self {
        TypeCatalog {
            context,
            cache: HashMap::new(),
        }
    }

    /// Resolves a descriptor, consulting the cache first.
    pub fn resolve(&mut self, descriptor: &TypeSpecifier) -> ResolvedType<'ctx> {
        if let Some(resolved) = self.cache.get(&descriptor.id) {
            return *resolved;
        }

        let resolved = match &descriptor.kind {
            TypeKind::BuiltIn(ty) => self.resolve_built_in(*ty),
            TypeKind::Pointer(element) => {
                let element = self.resolve_element(element);
                ResolvedType::Basic(element.ptr_type(AddressSpace::default()).into())
            }
            TypeKind::Array(element, size) => {
                let element = self.resolve_element(element);
                ResolvedType::Basic(element.array_type(*size).into())
            }
        };

        log::trace!("resolved type `{}` to {}", name(descriptor), resolved.name());
        self.cache.insert(descriptor.id, resolved);
        resolved
    }

    /// Element types of composites; `void` elements are stored as bytes (`void*` is `i8*`).
    fn resolve_element(&mut self, element: &TypeSpecifier) -> BasicTypeEnum<'ctx> {
        match self.resolve(element) {
            ResolvedType::Void => self.context.i8_type().into(),
            ResolvedType::Basic(ty) => ty,
        }
    }

    fn resolve_built_in(&self, ty: BuiltInType) -> ResolvedType<'ctx> {
        match ty {
            BuiltInType::Void => ResolvedType::Void,
            BuiltInType::Bool => ResolvedType::Basic(self.context.bool_type().into()),
            BuiltInType::Char => ResolvedType::Basic(self.context.i8_type().into()),
            BuiltInType::Int => ResolvedType::Basic(self.context.i32_type().into()),
            BuiltInType::Double => ResolvedType::Basic(self.context.f64_type().into()),
        }
    }

    /// Number of descriptors resolved so far.
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }
}

/// Human readable name of a descriptor, for diagnostics.
pub fn name(descriptor: &TypeSpecifier) -> String {
    descriptor.to_string()
}

/// Names an LLVM type using source-level spelling where one exists.
pub fn describe(ty: BasicTypeEnum) -> String {
    match ty {
        BasicTypeEnum::IntType(int) => match int.get_bit_width() {
            1 => String::from("bool"),
            8 => String::from("char"),
            32 => String::from("int"),
            width => format!("i{}", width),
        },
        BasicTypeEnum::FloatType(_) => String::from("double"),
        other => other.print_to_string().to_string(),
    }
}

pub fn zero_value(ty: BasicTypeEnum) -> BasicValueEnum {
    match ty {
        BasicTypeEnum::ArrayType(t) => t.const_zero().into(),
        BasicTypeEnum::FloatType(t) => t.const_zero().into(),
        BasicTypeEnum::IntType(t) => t.const_zero().into(),
        BasicTypeEnum::PointerType(t) => t.const_null().into(),
        BasicTypeEnum::StructType(t) => t.const_zero().into(),
        BasicTypeEnum::VectorType(t) => t.const_zero().into(),
    }
}

pub fn undef_value(ty: BasicTypeEnum) -> BasicValueEnum {
    match ty {
        BasicTypeEnum::ArrayType(t) => t.get_undef().into(),
        BasicTypeEnum::FloatType(t) => t.get_undef().into(),
        BasicTypeEnum::IntType(t) => t.get_undef().into(),
        BasicTypeEnum::PointerType(t) => t.get_undef().into(),
        BasicTypeEnum::StructType(t) => t.get_undef().into(),
        BasicTypeEnum::VectorType(t) => t.get_undef().into(),
    }
}
