use crate::{
    runtime::{
        error::{ErrorKind, Phase},
        platform::BufferPlatform,
        registry::{Arity, Catalog, NativeFunction},
        value::Value,
    },
    Config, ExecState, Interpreter, ScriptError,
};
use std::{cell::RefCell, rc::Rc};

fn interpreter(source: &str, platform: Rc<BufferPlatform>) -> Interpreter {
    let catalog = Catalog::with_platform(platform);
    Interpreter::new(source, Config::default(), &catalog).expect("preprocess")
}

fn run(source: &str) -> (Result<(), ScriptError>, String) {
    run_with_input(source, &[])
}

fn run_with_input(source: &str, input: &[&str]) -> (Result<(), ScriptError>, String) {
    let platform = Rc::new(BufferPlatform::with_input(input.iter().copied()));
    let result = crate::run_source(source, Config::default(), platform.clone());
    (result, platform.output())
}

fn expect_output(source: &str, expected: &str) {
    let (result, output) = run(source);
    if let Err(err) = result {
        panic!("script failed: {err}\noutput so far:\n{output}");
    }
    assert_eq!(output, expected);
}

fn expect_error(source: &str) -> ScriptError {
    run(source).0.expect_err("script should fail")
}

#[test]
fn numeric_loop_runs_inclusive_range() {
    let source = "\
+include std
@n $i 2 5
!std print: ($i),
@b $i
!std print: (\"done\"), ($i),";
    expect_output(source, "2\n3\n4\n5\ndone 5\n");
}

#[test]
fn loop_counter_holds_upper_bound_after_loop() {
    let platform = Rc::new(BufferPlatform::new());
    let mut interp = interpreter("@n $i 1 4\n# body\n@b $i", platform);
    interp.run().unwrap();
    assert_eq!(interp.state(), ExecState::Halted);
    let counter = interp.variable("i").unwrap();
    assert_eq!(counter.data, Some(Value::Int(4)));
    assert!(counter.has_flag("loop"));
}

#[test]
fn loop_bounds_can_come_from_variables() {
    let source = "\
+include std
$n integer[] = (3)
@n $i 1 ($n)
!std print: ($i),
@b $i";
    expect_output(source, "1\n2\n3\n");
}

#[test]
fn nested_loops_reopen_inner_counter() {
    let source = "\
+include std
@n $i 1 2
@n $j 1 3
!std print: ($i), ($j),
@b $j
@b $i";
    expect_output(source, "1 1\n1 2\n1 3\n2 1\n2 2\n2 3\n");
}

#[test]
fn false_conditional_skips_block() {
    let source = "\
+include std
?if $gate | (1) > (2)
!std print: (\"inside\"),
!nomodule never: (1),
?end $gate
!std print: (\"after\"), ($?),";
    expect_output(source, "after false\n");
}

#[test]
fn true_conditional_runs_block() {
    let source = "\
+include std
?if $gate | (2) > (1)
!std print: (\"inside\"), ($?),
?end $gate
!std print: (\"after\"),";
    expect_output(source, "inside true\nafter\n");
}

#[test]
fn conditions_reduce_left_to_right() {
    let source = "\
+include std
?if $check | (1) < (2) + (0)
!std print: (\"taken\"),
?end $check";
    expect_output(source, "taken\n");
}

#[test]
fn conditional_inside_loop() {
    let source = "\
+include std
@n $i 1 3
?if $two | ($i) = (2)
!std print: (\"two\"),
?end $two
@b $i";
    expect_output(source, "two\n");
}

#[test]
fn conditional_without_end_is_eof() {
    let err = expect_error("# start\n?if $gate | false\n# body");
    assert_eq!(err.kind, ErrorKind::EndOfFile);
    assert_eq!(err.line, 2);
}

#[test]
fn constant_redefinition_halts_and_keeps_value() {
    let platform = Rc::new(BufferPlatform::new());
    let source = "\
+include std
$x integer[const] = (1)
$x integer[] = (2)
!std print: (\"unreachable\"),";
    let mut interp = interpreter(source, platform.clone());
    let err = interp.run().unwrap_err();
    assert_eq!(err.kind, ErrorKind::Assignment);
    assert_eq!(err.line, 3);
    assert_eq!(err.source_line, "$x integer[] = (2)");
    assert_eq!(interp.state(), ExecState::Failed);
    assert_eq!(interp.variable("x").unwrap().data, Some(Value::Int(1)));
    assert_eq!(platform.output(), "");
}

#[test]
fn unknown_module_is_name_error() {
    let err = expect_error("!nomodule foo: (1),");
    assert_eq!(err.kind, ErrorKind::Name);
    assert!(err.message.contains("nomodule"), "{}", err.message);
    assert_eq!(err.phase, Phase::Executing);
}

#[test]
fn unknown_function_is_name_error() {
    let err = expect_error("+include std\n!std shout: (1),");
    assert_eq!(err.kind, ErrorKind::Name);
    assert!(err.message.contains("std.shout"));
}

#[test]
fn fixed_arity_mismatch_is_type_error() {
    let err = expect_error("+include std\n!std input: (\"a\"), (\"b\"),");
    assert_eq!(err.kind, ErrorKind::Type);
    assert!(err.message.contains("expected 1 parameters, got 2"), "{}", err.message);
}

#[test]
fn variadic_minimum_is_enforced() {
    let platform = Rc::new(BufferPlatform::new());
    let mut interp = interpreter("!pair: (1),", platform);
    interp.register(
        "program",
        "pair",
        NativeFunction::new(Arity::Variadic { min: 2 }, |_| Ok(Value::Bool(true))),
    );
    let err = interp.run().unwrap_err();
    assert_eq!(err.kind, ErrorKind::Type);
    assert!(err.message.contains("at least 2"));
}

#[test]
fn variables_reach_callables_typed() {
    let platform = Rc::new(BufferPlatform::new());
    let mut interp = interpreter("$x integer[] = (5)\n!program print: ($x),", platform);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    interp.register(
        "program",
        "print",
        NativeFunction::new(Arity::Variadic { min: 0 }, move |args| {
            sink.borrow_mut().extend(args.iter().cloned());
            Ok(Value::Str(String::new()))
        }),
    );
    interp.run().unwrap();
    assert_eq!(*seen.borrow(), vec![Value::Int(5)]);
}

#[test]
fn replace_rewrites_later_statements() {
    let source = "\
+include std
+replace say !std print:
say (\"hi\"),";
    expect_output(source, "hi\n");
}

#[test]
fn nested_input_call_feeds_assignment() {
    let source = "\
+include std
$name string[] = (!std input: (\"who? \"),)
!std print: (\"hello\"), ($name),";
    let (result, output) = run_with_input(source, &["Ada"]);
    result.unwrap();
    assert_eq!(output, "who? hello Ada\n");
}

#[test]
fn closed_input_is_runtime_error() {
    let err = expect_error("+include std\n$name string[] = (!std input: (\"? \"),)");
    assert_eq!(err.kind, ErrorKind::Runtime);
    assert!(err.message.contains("std.input"));
}

#[test]
fn assignment_coerces_declared_type() {
    let source = "\
+include std
$d decimal[] = (3)
$s string[] = (4.5)
$b boolean[] = (0)
!std print: ($d), ($s), ($b),";
    expect_output(source, "3.0 4.5 false\n");
}

#[test]
fn assignment_type_errors() {
    let err = expect_error("$n integer[] = (\"many\")");
    assert_eq!(err.kind, ErrorKind::Type);
    let err = expect_error("$n integer[] = (1)\n$n string[] = (\"x\")");
    assert_eq!(err.kind, ErrorKind::Type);
    assert_eq!(err.line, 2);
}

#[test]
fn undefined_variable_is_name_error() {
    let err = expect_error("+include std\n!std print: ($ghost),");
    assert_eq!(err.kind, ErrorKind::Name);
    assert!(err.message.contains("ghost"));
}

#[test]
fn loopback_errors() {
    let err = expect_error("@b $i");
    assert_eq!(err.kind, ErrorKind::Name);
    let err = expect_error("$i integer[] = (1)\n@b $i");
    assert_eq!(err.kind, ErrorKind::Type);
}

#[test]
fn missing_colon_in_call_is_end_of_line() {
    let err = expect_error("+include std\n!std print (\"x\"),");
    assert_eq!(err.kind, ErrorKind::EndOfLine);
    assert_eq!(err.line, 2);
}

#[test]
fn unrecognised_line_is_syntax_error() {
    let err = expect_error("# fine\nprint hello");
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert_eq!(err.source_line, "print hello");
    assert!(err.to_string().contains("Line 2"));
}

#[test]
fn missing_include_fails_while_preprocessing() {
    let err = expect_error("+include nowhere\n!nowhere f: (1),");
    assert_eq!(err.kind, ErrorKind::ModuleNotFound);
    assert_eq!(err.phase, Phase::Preprocessing);
    assert_eq!(err.line, 1);
}

#[test]
fn bad_operator_in_condition() {
    let err = expect_error("?if $c | (1) % (2)\n?end $c");
    assert_eq!(err.kind, ErrorKind::Syntax);
    let err = expect_error("?if $c | (1) <\n?end $c");
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert!(err.message.contains("Insufficient logical arguments"));
}

#[test]
fn unclosed_assignment_value_halts() {
    for source in [
        "+include std\n$s string[] = (\"abc)\n!std print: ($s),",
        "+include std\n$s string[] = (\"abc\"\n!std print: ($s),",
    ] {
        let (result, output) = run(source);
        let err = result.expect_err("unclosed value should fail");
        assert_eq!(err.kind, ErrorKind::EndOfLine, "{source}");
        assert_eq!(err.line, 2);
        assert_eq!(output, "");
    }
}

#[test]
fn trailing_text_after_assignment_value_is_syntax_error() {
    let err = expect_error("$n integer[] = (5) junk");
    assert_eq!(err.kind, ErrorKind::Syntax);
}

#[test]
fn chained_comparisons_run_block() {
    let source = "\
+include std
?if $a | (1) < (2) < (3)
!std print: (\"a\"),
?end $a
?if $b | (1) < (2) = (1)
!std print: (\"b\"),
?end $b";
    expect_output(source, "a\nb\n");
}
