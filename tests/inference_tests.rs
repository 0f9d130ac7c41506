use marlin::ast::Structure;
use marlin::fmt::types::val_bindings;
use marlin::lexer::Token;
use marlin::parser::{ParseState, parse};
use marlin::types::error::TypeError;
use marlin::types::infer::infer_structure;

fn parse_source(source: &str) -> Structure {
    let tokens = Token::lex(source).expect("lexer should succeed");
    let mut state = ParseState::new(tokens);
    parse(&mut state).expect("parser should succeed")
}

fn infer_output(source: &str) -> String {
    let bindings = infer_structure(&parse_source(source)).expect("inference should succeed");
    val_bindings(&bindings)
}

fn infer_error(source: &str) -> TypeError {
    infer_structure(&parse_source(source)).expect_err("inference should fail")
}

#[test]
fn test_factorial() {
    let output = infer_output("let rec fac = fun n -> if n <= 1 then 1 else n * fac (n - 1)");
    assert_eq!(output, "val fac : int -> int\n");
}

#[test]
fn test_fibonacci() {
    let output = infer_output("let rec fib = fun n -> if n < 2 then n else fib (n - 1) + fib (n - 2)");
    assert_eq!(output, "val fib : int -> int\n");
}

#[test]
fn test_let_polymorphism() {
    let output = infer_output(
        r#"
        let id = fun x -> x
        let temp = (id 1, id true)
        "#,
    );
    assert_eq!(output, "val id : 'a -> 'a\nval temp : int * bool\n");
}

#[test]
fn test_fix_combinator() {
    let output = infer_output("let rec fix = fun f x -> f (fix f) x");
    assert_eq!(output, "val fix : (('a -> 'b) -> 'a -> 'b) -> 'a -> 'b\n");
}

#[test]
fn test_list_length() {
    let output = infer_output(
        "let rec len = fun xs -> match xs with | [] -> 0 | h :: t -> 1 + len t",
    );
    assert_eq!(output, "val len : 'a list -> int\n");
}

#[test]
fn test_map() {
    let output = infer_output(
        "let rec map = fun f xs -> match xs with | [] -> [] | h :: t -> f h :: map f t",
    );
    assert_eq!(output, "val map : ('a -> 'b) -> 'a list -> 'b list\n");
}

#[test]
fn test_tuple_destructuring_keeps_polymorphism() {
    // ext_by_pat assigns each pattern variable its own slice of the
    // generalized scheme, so f stays polymorphic.
    let output = infer_output(
        r#"
        let (f, s) = ((fun x -> x), 2)
        let a = f 1
        let b = f true
        "#,
    );
    assert_eq!(
        output,
        "val f : 'a -> 'a\nval s : int\nval a : int\nval b : bool\n"
    );
}

#[test]
fn test_cons_pattern_binds_element_types() {
    let output = infer_output("let f = fun l -> match l with | h :: t -> h + 1 | [] -> 0");
    assert_eq!(output, "val f : int list -> int\n");
}

#[test]
fn test_annotation_constrains() {
    let output = infer_output("let f = fun (x : int) -> x");
    assert_eq!(output, "val f : int -> int\n");
}

#[test]
fn test_annotation_variables_are_shared() {
    let output = infer_output("let pair = fun ((x, y) : 'a * 'a) -> x");
    // Both tuple components collapse onto the same annotation variable.
    assert_eq!(output, "val pair : 'a * 'a -> 'a\n");
}

#[test]
fn test_annotation_conflict_fails() {
    let error = infer_error(
        r#"
        let f = fun (x : int) -> x
        let bad = f true
        "#,
    );
    assert!(matches!(error, TypeError::UnificationFailed { .. }));
}

#[test]
fn test_mutual_recursion() {
    let output = infer_output(
        r#"
        let rec even = fun n -> if n = 0 then true else odd (n - 1)
        and odd = fun n -> if n = 0 then false else even (n - 1)
        "#,
    );
    assert_eq!(output, "val even : int -> bool\nval odd : int -> bool\n");
}

#[test]
fn test_string_and_bool_values() {
    let output = infer_output(
        r#"
        let s = "hello"
        let b = true && false
        "#,
    );
    assert_eq!(output, "val s : string\nval b : bool\n");
}

#[test]
fn test_unit_binding_introduces_no_vals() {
    let output = infer_output("let () = print_int 1");
    assert_eq!(output, "");
}

#[test]
fn test_top_level_expression_is_checked() {
    let error = infer_error("print_int true");
    assert!(matches!(error, TypeError::UnificationFailed { .. }));
}

#[test]
fn test_unbound_variable() {
    let error = infer_error("let x = y");
    assert!(matches!(error, TypeError::NoVariable { name, .. } if name == "y"));
}

#[test]
fn test_rec_tuple_pattern_not_implemented() {
    let error = infer_error("let rec (a, b) = (1, 2)");
    assert!(matches!(error, TypeError::NotImplemented { .. }));
}

#[test]
fn test_occurs_check() {
    let error = infer_error("let rec f = fun x -> x x");
    assert!(matches!(error, TypeError::OccursCheck { .. }));
}

#[test]
fn test_branch_mismatch() {
    let error = infer_error("let f = fun b -> if b then 1 else \"one\"");
    assert!(matches!(error, TypeError::UnificationFailed { .. }));
}

#[test]
fn test_condition_must_be_bool() {
    let error = infer_error("let f = fun n -> if n + 1 then 1 else 2");
    assert!(matches!(error, TypeError::UnificationFailed { .. }));
}

#[test]
fn test_heterogeneous_list_fails() {
    let error = infer_error("let l = 1 :: true :: []");
    assert!(matches!(error, TypeError::UnificationFailed { .. }));
}

#[test]
fn test_match_arms_must_agree() {
    let error = infer_error("let f = fun x -> match x with | 0 -> 1 | _ -> \"no\"");
    assert!(matches!(error, TypeError::UnificationFailed { .. }));
}

#[test]
fn test_shadowing_reports_both_vals() {
    let output = infer_output(
        r#"
        let x = 1
        let x = true
        "#,
    );
    assert_eq!(output, "val x : int\nval x : bool\n");
}

#[test]
fn test_deep_composition_through_pipeline() {
    // Polymorphic composition applied at two different types.
    let output = infer_output(
        r#"
        let compose = fun f g x -> f (g x)
        let inc = fun n -> n + 1
        let is_zero = fun n -> n = 0
        let check = compose is_zero inc
        "#,
    );
    assert_eq!(
        output,
        "val compose : ('a -> 'b) -> ('c -> 'a) -> 'c -> 'b\nval inc : int -> int\nval is_zero : int -> bool\nval check : int -> bool\n"
    );
}
