//! Tests for the shape of generated modules and for semantic errors.

use std::rc::Rc;

use inkwell::{context::Context, module::Module, types::BasicTypeEnum, values::AnyValue};
use minic::{
    ast::ast::{Program, Stmt, Unit},
    compiler::{
        compiler::{compile, global_symbol, Compiler, GLOBALS_SCAFFOLD},
        stmt::{gen_function, gen_statement},
    },
    config::CodegenOptions,
    errors::errors::Error,
    lexer::lexer::tokenize,
    parser::parser::parse,
};

fn parse_source(source: &str) -> Program {
    let tokens = tokenize(source.to_string(), Some("test.c".to_string())).unwrap();
    parse(tokens, Rc::new("test.c".to_string())).unwrap()
}

/// Compiles `source` and hands the verified module to `check`.
fn with_module(source: &str, check: impl FnOnce(&Module)) {
    let program = parse_source(source);
    let context = Context::create();
    let compiled = compile(&program, &context, &CodegenOptions::default());
    match compiled {
        Ok(compiler) => check(&compiler.module),
        Err(error) => panic!("compilation failed: {:?}", error),
    }
}

fn compile_error(source: &str) -> Error {
    let program = parse_source(source);
    let context = Context::create();
    let compiled = compile(&program, &context, &CodegenOptions::default());
    let error = match compiled {
        Ok(compiler) => panic!("expected an error, got:\n{}", compiler.print_ir()),
        Err(error) => error,
    };
    error
}

fn block_names(module: &Module, function: &str) -> Vec<String> {
    module
        .get_function(function)
        .unwrap()
        .get_basic_blocks()
        .iter()
        .map(|block| block.get_name().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_every_block_ends_in_a_terminator() {
    let source = r#"
        int g = 1;
        int f(int x) {
            int y = 0;
            if (x > 0) { y = 1; } else { return 2; }
            for (int i = 0; i < x; i = i + 1) {
                if (i == 3) return i;
                { y = y + i; }
            }
            for (;;) { return y; }
        }
        void v() { ; }
        int main() { return f(g); }
    "#;

    with_module(source, |module| {
        for function in module.get_functions() {
            for block in function.get_basic_blocks() {
                let terminator = block.get_terminator();
                assert!(
                    terminator.is_some(),
                    "block `{}` is not terminated",
                    block.get_name().to_string_lossy()
                );
                assert_eq!(terminator, block.get_last_instruction());
            }
        }
    });
}

#[test]
fn test_if_block_names() {
    let source = "int f(int x) { if (x) return 1; else return 2; }";

    with_module(source, |module| {
        let names = block_names(module, "f");
        assert_eq!(names, vec!["entry", "then", "else", "merge"]);
    });
}

#[test]
fn test_for_block_names() {
    let source = "void f() { for (int i = 0; i < 3; i = i + 1) ; }";

    with_module(source, |module| {
        let names = block_names(module, "f");
        assert_eq!(
            names,
            vec!["entry", "for.init", "for.cond", "for.body", "for.inc", "for.end"]
        );
    });
}

#[test]
fn test_scaffold_is_removed() {
    with_module("int g = 3; int main() { return g; }", |module| {
        assert!(module.get_function(GLOBALS_SCAFFOLD).is_none());
        assert!(module.get_global(&global_symbol("g")).is_some());
    });
}

#[test]
fn test_reserved_looking_function_names() {
    let source = r#"
        int __minic_globals() { return 1; }
        int g = 2;
        int main() { return __minic_globals() + g; }
    "#;

    with_module(source, |module| {
        assert!(module.get_function("__minic_globals").is_some());
        assert!(module.get_function(GLOBALS_SCAFFOLD).is_none());
    });
}

#[test]
fn test_global_and_function_share_a_name() {
    let source = r#"
        int x = 1;
        int x() { return 2; }
        int main() { return x() + x; }
    "#;

    with_module(source, |module| {
        let function = module.get_function("x").unwrap();
        assert_eq!(function.count_params(), 0);
        assert!(module.get_global(&global_symbol("x")).is_some());
        assert!(module.get_function("x.1").is_none());
    });
}

#[test]
fn test_string_literals_do_not_shadow_functions() {
    let source = r#"
        void greet() { printString("hi"); }
        int str() { return 3; }
        int main() { greet(); return str(); }
    "#;

    with_module(source, |module| {
        assert!(module.get_function("str").is_some());
        assert!(module.get_function("str.1").is_none());
    });
}

#[test]
fn test_string_literals_keep_interior_bytes() {
    let source = r#"
        int main() {
            printString("ab\0cd\xff");
            return 0;
        }
    "#;

    with_module(source, |module| {
        let global = module.get_global(".str").unwrap();
        assert!(global.is_constant());

        // Six bytes plus the terminator
        let initializer = global.get_initializer().unwrap();
        assert_eq!(
            initializer.get_type(),
            BasicTypeEnum::from(module.get_context().i8_type().array_type(7))
        );
    });
}

#[test]
fn test_io_functions_registered() {
    with_module("int main() { return 0; }", |module| {
        for name in ["printf", "printBool", "printChar", "printInt", "printString"] {
            assert!(module.get_function(name).is_some(), "missing `{}`", name);
        }
        assert!(module.get_function("printf").unwrap().get_type().is_var_arg());
    });
}

#[test]
fn test_io_functions_can_be_disabled() {
    let program = parse_source("int main() { return 0; }");
    let context = Context::create();
    let options = CodegenOptions {
        register_io: false,
        ..CodegenOptions::default()
    };

    let compiler = compile(&program, &context, &options).unwrap();
    assert!(compiler.module.get_function("printInt").is_none());
    assert!(compiler.main_function.is_some());
}

#[test]
fn test_locals_are_allocated_in_entry_block() {
    let source = r#"
        int f(int a) {
            if (a) { int b = 1; return b; }
            for (int i = 0; i < 2; i = i + 1) { int c = i; }
            return a;
        }
    "#;

    with_module(source, |module| {
        let function = module.get_function("f").unwrap();
        let entry = function.get_first_basic_block().unwrap();
        let ir = function.print_to_string().to_string();

        let allocas = ir.matches("alloca").count();
        assert_eq!(allocas, 4);

        let mut entry_allocas = 0;
        let mut instruction = entry.get_first_instruction();
        while let Some(current) = instruction {
            if current.get_opcode() == inkwell::values::InstructionOpcode::Alloca {
                entry_allocas += 1;
            }
            instruction = current.get_next_instruction();
        }
        assert_eq!(entry_allocas, allocas);
    });
}

#[test]
fn test_implicit_returns() {
    let source = r#"
        void v() { }
        int f() { }
    "#;

    with_module(source, |module| {
        let v = module.get_function("v").unwrap().print_to_string().to_string();
        assert!(v.contains("ret void"));

        let f = module.get_function("f").unwrap().print_to_string().to_string();
        assert!(f.contains("ret i32 undef"));
    });
}

#[test]
fn test_variadic_arguments_are_promoted() {
    let source = r#"
        int main() {
            printf("%c %d\n", 'x', true);
            return 0;
        }
    "#;

    with_module(source, |module| {
        let ir = module
            .get_function("main")
            .unwrap()
            .print_to_string()
            .to_string();
        assert!(ir.contains("i32 120"));
        assert!(ir.contains("i32 1"));
    });
}

#[test]
fn test_redefinitions() {
    let error = compile_error("int x; int x;");
    assert_eq!(error.get_error_name(), "VariableAlreadyDeclared");

    let error = compile_error("int main() { int x; int x; return 0; }");
    assert_eq!(error.get_error_name(), "VariableAlreadyDeclared");

    let error = compile_error("int main() { int x; int y; int x; return 0; }");
    assert_eq!(error.get_error_name(), "VariableAlreadyDeclared");

    let error = compile_error("int main() { int x, x; return 0; }");
    assert_eq!(error.get_error_name(), "VariableAlreadyDeclared");

    let error = compile_error("int f(int a, int a) { return a; }");
    assert_eq!(error.get_error_name(), "VariableAlreadyDeclared");

    let error = compile_error("int f() { return 0; } int f() { return 1; }");
    assert_eq!(error.get_error_name(), "FunctionAlreadyDeclared");

    let error = compile_error("void printInt(int x) { }");
    assert_eq!(error.get_error_name(), "FunctionAlreadyDeclared");
}

#[test]
fn test_undefined_names() {
    let error = compile_error("int main() { return y; }");
    assert_eq!(error.get_error_name(), "VariableNotDeclared");

    let error = compile_error("int main() { { int x = 1; } return x; }");
    assert_eq!(error.get_error_name(), "VariableNotDeclared");

    let error = compile_error("int main() { return missing(); }");
    assert_eq!(error.get_error_name(), "FunctionNotDeclared");

    // The callee is resolved before its arguments
    let error = compile_error("int main() { return missing(y); }");
    assert_eq!(error.get_error_name(), "FunctionNotDeclared");

    // A variable is not callable
    let error = compile_error("int main() { int f = 1; return f(); }");
    assert_eq!(error.get_error_name(), "FunctionNotDeclared");
}

#[test]
fn test_invalid_assignment_target() {
    let error = compile_error("int main() { 1 = 2; return 0; }");
    assert_eq!(error.get_error_name(), "InvalidAssignmentTarget");

    let error = compile_error("int main() { int x; (x + 1) = 2; return 0; }");
    assert_eq!(error.get_error_name(), "InvalidAssignmentTarget");
}

#[test]
fn test_void_variables() {
    let error = compile_error("void x;");
    assert_eq!(error.get_error_name(), "VoidVariable");

    let error = compile_error("int main() { void x; return 0; }");
    assert_eq!(error.get_error_name(), "VoidVariable");

    let error = compile_error("int f(void x) { return 0; }");
    assert_eq!(error.get_error_name(), "VoidVariable");
}

#[test]
fn test_return_errors() {
    let error = compile_error("int main() { return; }");
    assert_eq!(error.get_error_name(), "MissingReturnValue");

    let error = compile_error("void f() { return 1; }");
    assert_eq!(error.get_error_name(), "TypeMatchError");

    let error = compile_error("int f() { return 1.5; }");
    assert_eq!(error.get_error_name(), "TypeMatchError");
}

#[test]
fn test_return_outside_function() {
    let program = parse_source("void f() { return; }");
    let statement: Stmt = match &program.units[0] {
        Unit::Function(func) => func.body.body[0].clone(),
        other => panic!("expected a function, got {:?}", other),
    };

    let context = Context::create();
    let mut compiler = Compiler::new(&context, "test");
    compiler.scopes.push("global");

    let error = gen_statement(&mut compiler, &statement).unwrap_err();
    assert_eq!(error.get_error_name(), "ReturnOutsideFunction");
}

#[test]
fn test_type_errors() {
    let error = compile_error("int main() { int x = 1.5; return x; }");
    assert_eq!(error.get_error_name(), "TypeMatchError");

    let error = compile_error("int main() { int x; x = 'a'; return x; }");
    assert_eq!(error.get_error_name(), "TypeMatchError");

    let error = compile_error("int main() { return 1 + 1.0; }");
    assert_eq!(error.get_error_name(), "TypeMatchError");

    let error = compile_error("int main() { bool a = true; bool b = a + a; return 0; }");
    assert_eq!(error.get_error_name(), "InvalidOperands");

    let error = compile_error("int main() { bool a = -true; return 0; }");
    assert_eq!(error.get_error_name(), "InvalidOperands");

    let error = compile_error("int main() { if (1.5) return 1; return 0; }");
    assert_eq!(error.get_error_name(), "CannotCastToBool");
}

#[test]
fn test_call_errors() {
    let functions = "int add(int a, int b) { return a + b; } void nothing() { } ";

    let error = compile_error(&format!("{}int main() {{ return add(1); }}", functions));
    assert_eq!(error.get_error_name(), "MissingArguments");

    let error = compile_error(&format!("{}int main() {{ return add(1, 2, 3); }}", functions));
    assert_eq!(error.get_error_name(), "UnexpectedArguments");

    let error = compile_error(&format!("{}int main() {{ return add(1, 'c'); }}", functions));
    assert_eq!(error.get_error_name(), "ArgumentTypeMatchError");

    let error = compile_error(&format!("{}int main() {{ int x = nothing(); return x; }}", functions));
    assert_eq!(error.get_error_name(), "VoidValue");
}

#[test]
fn test_not_implemented() {
    let error = compile_error("int a = 1; int b = a;");
    assert_eq!(error.get_error_name(), "NotImplementedError");

    let error = compile_error("int main() { int* p; p + p; return 0; }");
    assert_eq!(error.get_error_name(), "NotImplementedError");
}

#[test]
fn test_failed_function_is_removed() {
    let program = parse_source("int broken() { return y; }");
    let func = match &program.units[0] {
        Unit::Function(func) => func,
        other => panic!("expected a function, got {:?}", other),
    };

    let context = Context::create();
    let mut compiler = Compiler::new(&context, "test");
    compiler.scopes.push("global");

    let error = gen_function(&mut compiler, func).unwrap_err();
    assert_eq!(error.get_error_name(), "VariableNotDeclared");
    assert!(compiler.module.get_function("broken").is_none());
    assert!(compiler.function.is_none());
    assert_eq!(compiler.scopes.depth(), 1);
}

#[test]
fn test_error_positions() {
    let source = "int main() {\n    return y;\n}";
    let error = compile_error(source);
    let offset = source.find('y').unwrap() as u32;
    assert_eq!(error.get_position().0, offset);
}
