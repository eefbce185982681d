//! Unit tests for the code generator's building blocks.
//!
//! End-to-end compilation is covered by the tests in `tests/`.

use inkwell::{context::Context, types::BasicTypeEnum};

use crate::{
    ast::types::{BuiltInType, TypeSpecifier},
    errors::errors::ErrorImpl,
    Position, Span,
};

use super::{
    cast::{cast_to_bool, expect_type},
    compiler::{global_symbol, Compiler, GLOBALS_SCAFFOLD},
    emit::exit_status,
    scope::ScopeStack,
    types::{describe, ResolvedType, TypeCatalog},
};

fn int_type() -> TypeSpecifier {
    TypeSpecifier::built_in(BuiltInType::Int, Span::null())
}

#[test]
fn test_scope_lookup_walks_outwards() {
    let mut scopes: ScopeStack<i32> = ScopeStack::new();
    scopes.push("global");
    assert!(scopes.declare("x", 1));
    scopes.push("block");
    assert!(scopes.declare("y", 2));

    assert_eq!(scopes.lookup("x"), Some(1));
    assert_eq!(scopes.lookup("y"), Some(2));
    assert_eq!(scopes.lookup("z"), None);
}

#[test]
fn test_scope_shadowing() {
    let mut scopes: ScopeStack<i32> = ScopeStack::new();
    scopes.push("global");
    scopes.declare("x", 1);
    scopes.push("block");
    assert!(scopes.declare("x", 2));
    assert_eq!(scopes.lookup("x"), Some(2));

    let popped = scopes.pop().unwrap();
    assert_eq!(popped.label, "block");
    assert_eq!(popped.len(), 1);
    assert_eq!(scopes.lookup("x"), Some(1));
}

#[test]
fn test_scope_rejects_innermost_redefinition() {
    let mut scopes: ScopeStack<i32> = ScopeStack::new();
    scopes.push("global");
    assert!(scopes.declare("x", 1));
    assert!(!scopes.declare("x", 2));
    assert_eq!(scopes.lookup("x"), Some(1));
    assert!(scopes.is_declared_innermost("x"));
}

#[test]
fn test_scope_declare_without_scope() {
    let mut scopes: ScopeStack<i32> = ScopeStack::default();
    assert_eq!(scopes.depth(), 0);
    assert!(!scopes.declare("x", 1));
    assert!(scopes.pop().is_none());
}

#[test]
fn test_type_catalog_resolves_built_ins() {
    let context = Context::create();
    let mut types = TypeCatalog::new(&context);

    let cases = [
        (BuiltInType::Void, "void"),
        (BuiltInType::Bool, "bool"),
        (BuiltInType::Char, "char"),
        (BuiltInType::Int, "int"),
        (BuiltInType::Double, "double"),
    ];

    for (ty, expected) in cases {
        let resolved = types.resolve(&TypeSpecifier::built_in(ty, Span::null()));
        assert_eq!(resolved.name(), expected);
    }
    assert_eq!(
        types.resolve(&TypeSpecifier::built_in(BuiltInType::Void, Span::null())),
        ResolvedType::Void
    );
}

#[test]
fn test_type_catalog_composites() {
    let context = Context::create();
    let mut types = TypeCatalog::new(&context);

    let pointer = int_type().pointer_to(Span::null());
    let resolved = types.resolve(&pointer).as_basic().unwrap();
    assert!(resolved.is_pointer_type());

    let array = int_type().array_of(4, Span::null());
    let resolved = types.resolve(&array).as_basic().unwrap();
    assert_eq!(
        resolved,
        BasicTypeEnum::from(context.i32_type().array_type(4))
    );

    let void_pointer =
        TypeSpecifier::built_in(BuiltInType::Void, Span::null()).pointer_to(Span::null());
    let resolved = types.resolve(&void_pointer).as_basic().unwrap();
    assert_eq!(
        resolved,
        BasicTypeEnum::from(context.i8_type().ptr_type(inkwell::AddressSpace::default()))
    );
}

#[test]
fn test_type_catalog_memoizes_by_descriptor() {
    let context = Context::create();
    let mut types = TypeCatalog::new(&context);

    let descriptor = int_type();
    let first = types.resolve(&descriptor);
    let count = types.cached_count();
    let second = types.resolve(&descriptor);

    assert_eq!(first, second);
    assert_eq!(types.cached_count(), count);

    // A structurally equal descriptor is a distinct entry
    types.resolve(&int_type());
    assert_eq!(types.cached_count(), count + 1);
}

#[test]
fn test_describe_names() {
    let context = Context::create();
    assert_eq!(describe(context.bool_type().into()), "bool");
    assert_eq!(describe(context.i8_type().into()), "char");
    assert_eq!(describe(context.i32_type().into()), "int");
    assert_eq!(describe(context.i64_type().into()), "i64");
    assert_eq!(describe(context.f64_type().into()), "double");

    let pointer = context.i32_type().ptr_type(inkwell::AddressSpace::default());
    assert_eq!(describe(pointer.into()), "i32*");
}

#[test]
fn test_expect_type() {
    let context = Context::create();
    let int: BasicTypeEnum = context.i32_type().into();
    let value = context.i32_type().const_int(3, false).into();

    assert!(expect_type(int, value, &Position::null()).is_ok());

    let error = expect_type(context.f64_type().into(), value, &Position::null()).unwrap_err();
    match error.get_impl() {
        ErrorImpl::TypeMatchError { expected, received } => {
            assert_eq!(expected, "double");
            assert_eq!(received, "int");
        }
        other => panic!("expected a type match error, got {:?}", other),
    }
}

#[test]
fn test_cast_to_bool() {
    let context = Context::create();
    let compiler = Compiler::new(&context, "test");
    compiler.create_function("f", context.void_type().fn_type(&[], false), None);

    let flag = context.bool_type().const_int(1, false);
    let cast = cast_to_bool(&compiler, flag.into(), &Position::null()).unwrap();
    assert_eq!(cast, flag);

    let number = context.i32_type().const_int(7, false);
    let cast = cast_to_bool(&compiler, number.into(), &Position::null()).unwrap();
    assert_eq!(cast.get_type().get_bit_width(), 1);

    let error = cast_to_bool(
        &compiler,
        context.f64_type().const_float(1.0).into(),
        &Position::null(),
    )
    .unwrap_err();
    assert_eq!(error.get_error_name(), "CannotCastToBool");
}

#[test]
fn test_function_context_rejects_nesting() {
    let context = Context::create();
    let mut compiler = Compiler::new(&context, "test");
    let fn_type = context.void_type().fn_type(&[], false);
    let outer = compiler.create_function("outer", fn_type, None);
    let inner = compiler.create_function("inner", fn_type, None);

    compiler
        .enter_function(outer, ResolvedType::Void, &Position::null())
        .unwrap();
    let error = compiler
        .enter_function(inner, ResolvedType::Void, &Position::null())
        .unwrap_err();
    assert_eq!(error.get_error_name(), "NestedFunction");

    let left = compiler.leave_function().unwrap();
    assert_eq!(left.name(), "outer");
    assert!(compiler.current_return_type().is_none());
}

#[test]
fn test_exit_status_saturates() {
    assert_eq!(exit_status(0), 0);
    assert_eq!(exit_status(42), 42);
    assert_eq!(exit_status(255), 255);
    assert_eq!(exit_status(256), 255);
    assert_eq!(exit_status(1000), 255);
    assert_eq!(exit_status(-1), 0);
    assert_eq!(exit_status(i32::MIN), 0);
}

#[test]
fn test_generated_symbols_are_not_identifiers() {
    let identifier = regex::Regex::new("^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap();

    assert!(!identifier.is_match(GLOBALS_SCAFFOLD));
    assert!(!identifier.is_match(&global_symbol("x")));
    assert_eq!(global_symbol("counter"), ".global.counter");
}

#[test]
fn test_string_constant_keeps_every_byte() {
    let context = Context::create();
    let compiler = Compiler::new(&context, "test");

    let pointer = compiler.add_string_constant(b"ab\0cd\xff", ".str");
    assert_eq!(
        BasicTypeEnum::from(pointer.get_type()),
        BasicTypeEnum::from(context.i8_type().ptr_type(inkwell::AddressSpace::default()))
    );

    let global = compiler.module.get_global(".str").unwrap();
    assert!(global.is_constant());
    assert_eq!(
        global.get_initializer().map(|value| value.get_type()),
        Some(BasicTypeEnum::from(context.i8_type().array_type(7)))
    );
}
