//! Checker integration tests.
//!
//! Each test builds a unit through the node builder, runs bind -> check,
//! and asserts on the reported diagnostic codes.

use strata_ast::builder::AstBuilder;
use strata_ast::node::{BinaryOp, UnaryOp};
use strata_ast::types::{NodeFlags, NodeId};
use strata_binder::Binder;
use strata_checker::Checker;
use strata_core::intern::StringInterner;
use strata_diagnostics::{messages, Diagnostic, DiagnosticMessage};

/// Bind and check one unit, returning its diagnostics.
fn check(build: impl FnOnce(&mut AstBuilder) -> NodeId) -> Vec<Diagnostic> {
    let interner = StringInterner::new();
    let mut b = AstBuilder::new(interner.clone());
    let unit = build(&mut b);
    let ast = b.finish();
    let mut binder = Binder::new(interner);
    binder.bind_unit(&ast, unit);
    let mut checker = Checker::new(ast, binder);
    checker.check_unit(unit).expect("unit was bound");
    checker.take_diagnostics().into_diagnostics()
}

fn codes(diags: &[Diagnostic]) -> Vec<u32> {
    diags.iter().map(|d| d.code).collect()
}

fn assert_clean(diags: &[Diagnostic]) {
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
}

fn assert_code(diags: &[Diagnostic], msg: &DiagnosticMessage) {
    assert!(
        diags.iter().any(|d| d.code == msg.code),
        "expected code {} in {:?}",
        msg.code,
        codes(diags)
    );
}

// ============================================================================
// Variables and assignability
// ============================================================================

#[test]
fn test_annotated_variable_with_matching_initializer() {
    let diags = check(|b| {
        let ty = b.number_ty();
        let init = b.num(42.0);
        let v = b.var("x", Some(ty), Some(init));
        b.unit("main", vec![v])
    });
    assert_clean(&diags);
}

#[test]
fn test_annotated_variable_with_mismatched_initializer() {
    let diags = check(|b| {
        let ty = b.number_ty();
        let init = b.str("nope");
        let v = b.var("x", Some(ty), Some(init));
        b.unit("main", vec![v])
    });
    assert_code(&diags, &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1);
}

#[test]
fn test_split_declarations_must_agree() {
    let diags = check(|b| {
        let ty = b.number_ty();
        let first = b.var("x", Some(ty), None);
        let ty = b.string_ty();
        let second = b.var("x", Some(ty), None);
        b.unit("main", vec![first, second])
    });
    assert_code(&diags, &messages::SUBSEQUENT_DECLARATIONS_OF_0_MUST_HAVE_TYPE_1_BUT_HERE_HAS_TYPE_2);
}

#[test]
fn test_split_declarations_with_same_type_are_fine() {
    let diags = check(|b| {
        let ty = b.number_ty();
        let first = b.var("x", Some(ty), None);
        let ty = b.number_ty();
        let second = b.var("x", Some(ty), None);
        b.unit("main", vec![first, second])
    });
    assert_clean(&diags);
}

#[test]
fn test_null_is_assignable_to_number() {
    let diags = check(|b| {
        let ty = b.number_ty();
        let init = b.null();
        let v = b.var("x", Some(ty), Some(init));
        b.unit("main", vec![v])
    });
    assert_clean(&diags);
}

#[test]
fn test_nothing_converts_to_void() {
    let diags = check(|b| {
        let ty = b.void_ty();
        let init = b.num(1.0);
        let v = b.var("x", Some(ty), Some(init));
        b.unit("main", vec![v])
    });
    assert_code(&diags, &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1);
}

#[test]
fn test_cannot_find_name() {
    let diags = check(|b| {
        let missing = b.ident("missing");
        let stmt = b.expr_stmt(missing);
        b.unit("main", vec![stmt])
    });
    assert_code(&diags, &messages::CANNOT_FIND_NAME_0);
}

#[test]
fn test_duplicate_class_names() {
    let diags = check(|b| {
        let first = b.class("C", None, vec![], vec![]);
        let second = b.class("C", None, vec![], vec![]);
        b.unit("main", vec![first, second])
    });
    assert_code(&diags, &messages::DUPLICATE_IDENTIFIER_0);
}

// ============================================================================
// Arrays and structural types
// ============================================================================

#[test]
fn test_array_literal_element_widening() {
    let diags = check(|b| {
        let elem = b.number_ty();
        let ty = b.array_ty(elem);
        let one = b.num(1.0);
        let two = b.num(2.0);
        let init = b.array(vec![one, two]);
        let v = b.var("xs", Some(ty), Some(init));
        b.unit("main", vec![v])
    });
    assert_clean(&diags);
}

#[test]
fn test_array_literal_element_mismatch() {
    let diags = check(|b| {
        let elem = b.string_ty();
        let ty = b.array_ty(elem);
        let one = b.num(1.0);
        let init = b.array(vec![one]);
        let v = b.var("xs", Some(ty), Some(init));
        b.unit("main", vec![v])
    });
    assert_code(&diags, &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1);
}

#[test]
fn test_array_literal_with_diverging_elements_takes_contextual_element() {
    let diags = check(|b| {
        // The elements share no best common type, so the annotated element
        // type is imposed and the stray element is reported against it.
        let elem = b.number_ty();
        let ty = b.array_ty(elem);
        let one = b.num(1.0);
        let stray = b.str("a");
        let init = b.array(vec![one, stray]);
        let v = b.var("xs", Some(ty), Some(init));
        b.unit("main", vec![v])
    });
    assert_eq!(codes(&diags), vec![messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1.code]);
}

#[test]
fn test_array_covariance() {
    let diags = check(|b| {
        let name_ty = b.string_ty();
        let name = b.field("name", Some(name_ty), None);
        let animal = b.class("Animal", None, vec![], vec![name]);
        let base = b.type_ref("Animal");
        let breed_ty = b.string_ty();
        let breed = b.field("breed", Some(breed_ty), None);
        let dog = b.class("Dog", Some(base), vec![], vec![breed]);

        let dog_ref = b.type_ref("Dog");
        let dogs_ty = b.array_ty(dog_ref);
        let dogs = b.var("dogs", Some(dogs_ty), None);
        let animal_ref = b.type_ref("Animal");
        let animals_ty = b.array_ty(animal_ref);
        let dogs_ref = b.ident("dogs");
        let animals = b.var("animals", Some(animals_ty), Some(dogs_ref));
        b.unit("main", vec![animal, dog, dogs, animals])
    });
    assert_clean(&diags);
}

#[test]
fn test_array_covariance_rejects_widening_direction() {
    let diags = check(|b| {
        let name_ty = b.string_ty();
        let name = b.field("name", Some(name_ty), None);
        let animal = b.class("Animal", None, vec![], vec![name]);
        let base = b.type_ref("Animal");
        let breed_ty = b.string_ty();
        let breed = b.field("breed", Some(breed_ty), None);
        let dog = b.class("Dog", Some(base), vec![], vec![breed]);

        let animal_ref = b.type_ref("Animal");
        let animals_ty = b.array_ty(animal_ref);
        let animals = b.var("animals", Some(animals_ty), None);
        let dog_ref = b.type_ref("Dog");
        let dogs_ty = b.array_ty(dog_ref);
        let animals_ref = b.ident("animals");
        let dogs = b.var("dogs", Some(dogs_ty), Some(animals_ref));
        b.unit("main", vec![animal, dog, animals, dogs])
    });
    assert_code(&diags, &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1);
}

#[test]
fn test_object_literal_against_structural_annotation() {
    let diags = check(|b| {
        let x_ty = b.number_ty();
        let x_sig = b.prop_sig("x", Some(x_ty));
        let ty = b.object_ty(vec![x_sig]);
        let one = b.num(1.0);
        let init = b.object(vec![("x", one)]);
        let v = b.var("p", Some(ty), Some(init));
        b.unit("main", vec![v])
    });
    assert_clean(&diags);
}

#[test]
fn test_object_literal_missing_required_member() {
    let diags = check(|b| {
        let x_ty = b.number_ty();
        let x_sig = b.prop_sig("x", Some(x_ty));
        let ty = b.object_ty(vec![x_sig]);
        let one = b.num(1.0);
        let init = b.object(vec![("y", one)]);
        let v = b.var("p", Some(ty), Some(init));
        b.unit("main", vec![v])
    });
    assert_code(&diags, &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1);
}

#[test]
fn test_string_index_signature_access() {
    let diags = check(|b| {
        let key_ty = b.string_ty();
        let key = b.param("key", Some(key_ty));
        let value_ty = b.number_ty();
        let sig = b.index_sig(key, Some(value_ty));
        let ty = b.object_ty(vec![sig]);
        let d = b.var("d", Some(ty), None);

        let n_ty = b.number_ty();
        let d_ref = b.ident("d");
        let k = b.str("k");
        let access = b.index(d_ref, k);
        let n = b.var("n", Some(n_ty), Some(access));
        b.unit("main", vec![d, n])
    });
    assert_clean(&diags);
}

// ============================================================================
// Functions, returns, contextual typing
// ============================================================================

#[test]
fn test_return_type_mismatch() {
    let diags = check(|b| {
        let ret_ty = b.number_ty();
        let bad = b.str("nope");
        let ret = b.ret(Some(bad));
        let body = b.block(vec![ret]);
        let f = b.func("f", vec![], Some(ret_ty), Some(body));
        b.unit("main", vec![f])
    });
    assert_code(&diags, &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1);
}

#[test]
fn test_non_void_function_must_return() {
    let diags = check(|b| {
        let ret_ty = b.number_ty();
        let body = b.block(vec![]);
        let f = b.func("f", vec![], Some(ret_ty), Some(body));
        b.unit("main", vec![f])
    });
    assert_code(
        &diags,
        &messages::FUNCTION_0_DECLARED_A_NON_VOID_RETURN_TYPE_BUT_HAS_NO_RETURN_EXPRESSION,
    );
}

#[test]
fn test_void_function_need_not_return() {
    let diags = check(|b| {
        let ret_ty = b.void_ty();
        let body = b.block(vec![]);
        let f = b.func("f", vec![], Some(ret_ty), Some(body));
        b.unit("main", vec![f])
    });
    assert_clean(&diags);
}

#[test]
fn test_body_of_a_single_throw_need_not_return() {
    let diags = check(|b| {
        let ret_ty = b.number_ty();
        let msg = b.str("unreachable");
        let thr = b.throw(msg);
        let body = b.block(vec![thr]);
        let f = b.func("f", vec![], Some(ret_ty), Some(body));
        b.unit("main", vec![f])
    });
    assert_clean(&diags);
}

#[test]
fn test_conditional_throw_does_not_satisfy_return() {
    let diags = check(|b| {
        // A throw behind a condition still leaves a path that falls off
        // the end without a value.
        let ret_ty = b.number_ty();
        let cond = b.bool(true);
        let msg = b.str("bad");
        let thr = b.throw(msg);
        let guard = b.if_stmt(cond, thr, None);
        let body = b.block(vec![guard]);
        let f = b.func("f", vec![], Some(ret_ty), Some(body));
        b.unit("main", vec![f])
    });
    assert_code(
        &diags,
        &messages::FUNCTION_0_DECLARED_A_NON_VOID_RETURN_TYPE_BUT_HAS_NO_RETURN_EXPRESSION,
    );
}

#[test]
fn test_inferred_return_type_flows_to_callers() {
    let diags = check(|b| {
        let one = b.num(1.0);
        let ret = b.ret(Some(one));
        let body = b.block(vec![ret]);
        let f = b.func("f", vec![], None, Some(body));

        let n_ty = b.number_ty();
        let f_ref = b.ident("f");
        let call = b.call(f_ref, vec![]);
        let n = b.var("n", Some(n_ty), Some(call));
        b.unit("main", vec![f, n])
    });
    assert_clean(&diags);
}

#[test]
fn test_function_expression_parameters_typed_from_context() {
    let diags = check(|b| {
        let p_ty = b.number_ty();
        let p = b.param("n", Some(p_ty));
        let ret = b.number_ty();
        let f_ty = b.func_ty(vec![p], ret);

        let x = b.param("x", None);
        let x_ref = b.ident("x");
        let ret_stmt = b.ret(Some(x_ref));
        let body = b.block(vec![ret_stmt]);
        let lambda = b.func_expr(vec![x], None, body);
        let f = b.var("f", Some(f_ty), Some(lambda));
        b.unit("main", vec![f])
    });
    assert_clean(&diags);
}

#[test]
fn test_argument_not_assignable_to_parameter() {
    let diags = check(|b| {
        let p_ty = b.number_ty();
        let p = b.param("n", Some(p_ty));
        let body = b.block(vec![]);
        let f = b.func("f", vec![p], None, Some(body));

        let f_ref = b.ident("f");
        let bad = b.str("nope");
        let call = b.call(f_ref, vec![bad]);
        let stmt = b.expr_stmt(call);
        b.unit("main", vec![f, stmt])
    });
    assert_code(&diags, &messages::ARGUMENT_OF_TYPE_0_IS_NOT_ASSIGNABLE_TO_PARAMETER_OF_TYPE_1);
}

#[test]
fn test_calling_a_non_callable_value() {
    let diags = check(|b| {
        let ty = b.number_ty();
        let n = b.var("n", Some(ty), None);
        let n_ref = b.ident("n");
        let call = b.call(n_ref, vec![]);
        let stmt = b.expr_stmt(call);
        b.unit("main", vec![n, stmt])
    });
    assert_code(&diags, &messages::VALUE_OF_TYPE_0_IS_NOT_CALLABLE);
}

// ============================================================================
// Overload resolution
// ============================================================================

/// f(x: number): string; f(x: string): number; f(x: any): any { ... }
fn overloaded_f(b: &mut AstBuilder) -> Vec<NodeId> {
    let p_ty = b.number_ty();
    let p = b.param("x", Some(p_ty));
    let ret = b.string_ty();
    let stub1 = b.func("f", vec![p], Some(ret), None);

    let p_ty = b.string_ty();
    let p = b.param("x", Some(p_ty));
    let ret = b.number_ty();
    let stub2 = b.func("f", vec![p], Some(ret), None);

    let p_ty = b.any_ty();
    let p = b.param("x", Some(p_ty));
    let ret = b.any_ty();
    let nil = b.null();
    let ret_stmt = b.ret(Some(nil));
    let body = b.block(vec![ret_stmt]);
    let implementation = b.func("f", vec![p], Some(ret), Some(body));

    vec![stub1, stub2, implementation]
}

#[test]
fn test_overload_selects_by_argument_type() {
    let diags = check(|b| {
        let mut stmts = overloaded_f(b);
        let s_ty = b.string_ty();
        let f_ref = b.ident("f");
        let one = b.num(1.0);
        let call = b.call(f_ref, vec![one]);
        stmts.push(b.var("s", Some(s_ty), Some(call)));

        let n_ty = b.number_ty();
        let f_ref = b.ident("f");
        let arg = b.str("a");
        let call = b.call(f_ref, vec![arg]);
        stmts.push(b.var("n", Some(n_ty), Some(call)));
        b.unit("main", stmts)
    });
    assert_clean(&diags);
}

#[test]
fn test_overload_result_type_is_the_selected_one() {
    let diags = check(|b| {
        let mut stmts = overloaded_f(b);
        // f(1) yields string, not number.
        let n_ty = b.number_ty();
        let f_ref = b.ident("f");
        let one = b.num(1.0);
        let call = b.call(f_ref, vec![one]);
        stmts.push(b.var("n", Some(n_ty), Some(call)));
        b.unit("main", stmts)
    });
    assert_code(&diags, &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1);
}

#[test]
fn test_implementation_signature_is_not_callable_when_stubs_exist() {
    let diags = check(|b| {
        let mut stmts = overloaded_f(b);
        let f_ref = b.ident("f");
        let bad = b.bool(true);
        let call = b.call(f_ref, vec![bad]);
        stmts.push(b.expr_stmt(call));
        b.unit("main", stmts)
    });
    assert_code(&diags, &messages::NO_MATCHING_SIGNATURE_FOR_CALL);
}

#[test]
fn test_specialized_signature_wins_for_literal_argument() {
    let diags = check(|b| {
        // g(kind: "a"): number; g(kind: string): string; g(kind: any): any {}
        let p_ty = b.string_lit_ty("a");
        let p = b.param("kind", Some(p_ty));
        let ret = b.number_ty();
        let stub1 = b.func("g", vec![p], Some(ret), None);

        let p_ty = b.string_ty();
        let p = b.param("kind", Some(p_ty));
        let ret = b.string_ty();
        let stub2 = b.func("g", vec![p], Some(ret), None);

        let p_ty = b.any_ty();
        let p = b.param("kind", Some(p_ty));
        let ret = b.any_ty();
        let nil = b.null();
        let ret_stmt = b.ret(Some(nil));
        let body = b.block(vec![ret_stmt]);
        let implementation = b.func("g", vec![p], Some(ret), Some(body));

        let n_ty = b.number_ty();
        let g_ref = b.ident("g");
        let lit = b.str("a");
        let call = b.call(g_ref, vec![lit]);
        let n = b.var("n", Some(n_ty), Some(call));

        let s_ty = b.string_ty();
        let g_ref = b.ident("g");
        let other = b.str("other");
        let call = b.call(g_ref, vec![other]);
        let s = b.var("s", Some(s_ty), Some(call));
        b.unit("main", vec![stub1, stub2, implementation, n, s])
    });
    assert_clean(&diags);
}

#[test]
fn test_overload_prefers_identical_parameter_match() {
    let diags = check(|b| {
        // h(v: Base): number; h(v: Derived): string; a Derived argument
        // matches both, but the Derived stub matches identically.
        let tag_ty = b.number_ty();
        let tag = b.field("tag", Some(tag_ty), None);
        let base = b.class("Base", None, vec![], vec![tag]);
        let base_ref = b.type_ref("Base");
        let extra_ty = b.string_ty();
        let extra = b.field("extra", Some(extra_ty), None);
        let derived = b.class("Derived", Some(base_ref), vec![], vec![extra]);

        let p_ty = b.type_ref("Base");
        let p = b.param("value", Some(p_ty));
        let ret = b.number_ty();
        let stub1 = b.func("h", vec![p], Some(ret), None);

        let p_ty = b.type_ref("Derived");
        let p = b.param("value", Some(p_ty));
        let ret = b.string_ty();
        let stub2 = b.func("h", vec![p], Some(ret), None);

        let p_ty = b.any_ty();
        let p = b.param("value", Some(p_ty));
        let ret = b.any_ty();
        let nil = b.null();
        let ret_stmt = b.ret(Some(nil));
        let body = b.block(vec![ret_stmt]);
        let implementation = b.func("h", vec![p], Some(ret), Some(body));

        let d_ty = b.type_ref("Derived");
        let d = b.var("d", Some(d_ty), None);
        let s_ty = b.string_ty();
        let h_ref = b.ident("h");
        let d_ref = b.ident("d");
        let call = b.call(h_ref, vec![d_ref]);
        let s = b.var("s", Some(s_ty), Some(call));
        b.unit("main", vec![base, derived, stub1, stub2, implementation, d, s])
    });
    assert_clean(&diags);
}

#[test]
fn test_untyped_argument_makes_the_call_ambiguous() {
    let diags = check(|b| {
        // An `any` argument converts to every stub and no ranking rule
        // separates them.
        let mut stmts = overloaded_f(b);
        let a = b.var("a", None, None);
        let f_ref = b.ident("f");
        let a_ref = b.ident("a");
        let call = b.call(f_ref, vec![a_ref]);
        stmts.push(a);
        stmts.push(b.expr_stmt(call));
        b.unit("main", stmts)
    });
    assert_code(&diags, &messages::AMBIGUOUS_CALL_EXPRESSION);
}

// ============================================================================
// Generics
// ============================================================================

#[test]
fn test_generic_function_inference() {
    let diags = check(|b| {
        let t = b.type_param("T", None);
        let p_ty = b.type_ref("T");
        let p = b.param("x", Some(p_ty));
        let ret_ty = b.type_ref("T");
        let x_ref = b.ident("x");
        let ret = b.ret(Some(x_ref));
        let body = b.block(vec![ret]);
        let identity = b.generic_func("identity", vec![t], vec![p], Some(ret_ty), Some(body));

        let n_ty = b.number_ty();
        let id_ref = b.ident("identity");
        let five = b.num(5.0);
        let call = b.call(id_ref, vec![five]);
        let n = b.var("n", Some(n_ty), Some(call));
        b.unit("main", vec![identity, n])
    });
    assert_clean(&diags);
}

#[test]
fn test_generic_function_inference_widens_literals() {
    let diags = check(|b| {
        let t = b.type_param("T", None);
        let p_ty = b.type_ref("T");
        let p = b.param("x", Some(p_ty));
        let ret_ty = b.type_ref("T");
        let x_ref = b.ident("x");
        let ret = b.ret(Some(x_ref));
        let body = b.block(vec![ret]);
        let identity = b.generic_func("identity", vec![t], vec![p], Some(ret_ty), Some(body));

        let s_ty = b.string_ty();
        let id_ref = b.ident("identity");
        let five = b.num(5.0);
        let call = b.call(id_ref, vec![five]);
        let s = b.var("s", Some(s_ty), Some(call));
        b.unit("main", vec![identity, s])
    });
    assert_code(&diags, &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1);
}

#[test]
fn test_function_expression_argument_drives_inference() {
    let diags = check(|b| {
        // apply<T>(cb: (x: number) => T): T called with an unannotated
        // function expression; the callback's inferred number return pins
        // T, so the result does not fit a string.
        let t = b.type_param("T", None);
        let x_ty = b.number_ty();
        let x = b.param("x", Some(x_ty));
        let t_ref = b.type_ref("T");
        let cb_ty = b.func_ty(vec![x], t_ref);
        let cb = b.param("cb", Some(cb_ty));
        let ret_ty = b.type_ref("T");
        let apply = b.generic_func("apply", vec![t], vec![cb], Some(ret_ty), None);

        let p = b.param("x", None);
        let x_ref = b.ident("x");
        let ret = b.ret(Some(x_ref));
        let body = b.block(vec![ret]);
        let cb_expr = b.func_expr(vec![p], None, body);
        let apply_ref = b.ident("apply");
        let call = b.call(apply_ref, vec![cb_expr]);
        let s_ty = b.string_ty();
        let s = b.var("s", Some(s_ty), Some(call));
        b.unit("main", vec![apply, s])
    });
    assert_code(&diags, &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1);
}

#[test]
fn test_generic_class_member_specialization() {
    let diags = check(|b| {
        let t = b.type_param("T", None);
        let value_ty = b.type_ref("T");
        let value = b.field("value", Some(value_ty), None);
        let boxed = b.generic_class("Box", vec![t], None, vec![], vec![value]);

        let elem = b.number_ty();
        let box_ty = b.generic_type_ref("Box", vec![elem]);
        let bx = b.var("bx", Some(box_ty), None);

        let n_ty = b.number_ty();
        let bx_ref = b.ident("bx");
        let access = b.member(bx_ref, "value");
        let n = b.var("n", Some(n_ty), Some(access));
        b.unit("main", vec![boxed, bx, n])
    });
    assert_clean(&diags);
}

#[test]
fn test_wrong_type_argument_count() {
    let diags = check(|b| {
        let t = b.type_param("T", None);
        let value_ty = b.type_ref("T");
        let value = b.field("value", Some(value_ty), None);
        let boxed = b.generic_class("Box", vec![t], None, vec![], vec![value]);

        let a = b.number_ty();
        let c = b.string_ty();
        let box_ty = b.generic_type_ref("Box", vec![a, c]);
        let bx = b.var("bx", Some(box_ty), None);
        b.unit("main", vec![boxed, bx])
    });
    assert_code(&diags, &messages::EXPECTED_0_TYPE_ARGUMENTS_BUT_GOT_1);
}

#[test]
fn test_type_argument_constraint_violation() {
    let diags = check(|b| {
        let len_ty = b.number_ty();
        let len = b.prop_sig("length", Some(len_ty));
        let has_length = b.interface("HasLength", vec![], vec![len]);

        let constraint = b.type_ref("HasLength");
        let t = b.type_param("T", Some(constraint));
        let value_ty = b.type_ref("T");
        let value = b.field("value", Some(value_ty), None);
        let tagged = b.generic_class("Tagged", vec![t], None, vec![], vec![value]);

        let arg = b.number_ty();
        let tagged_ty = b.generic_type_ref("Tagged", vec![arg]);
        let v = b.var("v", Some(tagged_ty), None);
        b.unit("main", vec![has_length, tagged, v])
    });
    assert_code(&diags, &messages::TYPE_0_DOES_NOT_SATISFY_CONSTRAINT_1_FOR_TYPE_PARAMETER_2);
}

#[test]
fn test_self_referential_generic_terminates() {
    let diags = check(|b| {
        let t = b.type_param("T", None);
        let head_ty = b.type_ref("T");
        let head = b.prop_sig("head", Some(head_ty));
        let elem = b.type_ref("T");
        let rest_ty = b.generic_type_ref("List", vec![elem]);
        let rest = b.prop_sig("rest", Some(rest_ty));
        let list = b.generic_interface("List", vec![t], vec![], vec![head, rest]);

        let elem = b.number_ty();
        let list_ty = b.generic_type_ref("List", vec![elem]);
        let l = b.var("l", Some(list_ty), None);

        let n_ty = b.number_ty();
        let l_ref = b.ident("l");
        let head_access = b.member(l_ref, "head");
        let n = b.var("n", Some(n_ty), Some(head_access));
        b.unit("main", vec![list, l, n])
    });
    assert_clean(&diags);
}

// ============================================================================
// Classes: construction, members, visibility
// ============================================================================

#[test]
fn test_class_construction_and_member_access() {
    let diags = check(|b| {
        let x_ty = b.number_ty();
        let x = b.field("x", Some(x_ty), None);
        let c = b.class("C", None, vec![], vec![x]);

        let c_ty = b.type_ref("C");
        let c_ref = b.ident("C");
        let instance = b.new_expr(c_ref, vec![]);
        let v = b.var("c", Some(c_ty), Some(instance));

        let n_ty = b.number_ty();
        let v_ref = b.ident("c");
        let access = b.member(v_ref, "x");
        let n = b.var("n", Some(n_ty), Some(access));
        b.unit("main", vec![c, v, n])
    });
    assert_clean(&diags);
}

#[test]
fn test_unknown_member_access() {
    let diags = check(|b| {
        let x_ty = b.number_ty();
        let x = b.field("x", Some(x_ty), None);
        let c = b.class("C", None, vec![], vec![x]);

        let c_ty = b.type_ref("C");
        let v = b.var("c", Some(c_ty), None);
        let v_ref = b.ident("c");
        let access = b.member(v_ref, "nope");
        let stmt = b.expr_stmt(access);
        b.unit("main", vec![c, v, stmt])
    });
    assert_code(&diags, &messages::PROPERTY_0_DOES_NOT_EXIST_ON_TYPE_1);
}

#[test]
fn test_private_member_access_outside_class() {
    let diags = check(|b| {
        let secret_ty = b.number_ty();
        let secret = b.field("secret", Some(secret_ty), None);
        b.mark(secret, NodeFlags::PRIVATE);
        let c = b.class("C", None, vec![], vec![secret]);

        let c_ty = b.type_ref("C");
        let v = b.var("c", Some(c_ty), None);
        let v_ref = b.ident("c");
        let access = b.member(v_ref, "secret");
        let stmt = b.expr_stmt(access);
        b.unit("main", vec![c, v, stmt])
    });
    assert_code(&diags, &messages::PROPERTY_0_IS_PRIVATE);
}

#[test]
fn test_private_member_access_inside_class() {
    let diags = check(|b| {
        let secret_ty = b.number_ty();
        let secret = b.field("secret", Some(secret_ty), None);
        b.mark(secret, NodeFlags::PRIVATE);
        let this_expr = b.this();
        let access = b.member(this_expr, "secret");
        let ret = b.ret(Some(access));
        let body = b.block(vec![ret]);
        let ret_ty = b.number_ty();
        let peek = b.method("peek", vec![], Some(ret_ty), Some(body));
        let c = b.class("C", None, vec![], vec![secret, peek]);
        b.unit("main", vec![c])
    });
    assert_clean(&diags);
}

#[test]
fn test_parameter_property_becomes_member() {
    let diags = check(|b| {
        let radius_ty = b.number_ty();
        let radius = b.property_param("radius", Some(radius_ty), false);
        let body = b.block(vec![]);
        let ctor = b.ctor(vec![radius], Some(body));
        let circle = b.class("Circle", None, vec![], vec![ctor]);

        let circle_ty = b.type_ref("Circle");
        let c = b.var("c", Some(circle_ty), None);
        let n_ty = b.number_ty();
        let c_ref = b.ident("c");
        let access = b.member(c_ref, "radius");
        let n = b.var("n", Some(n_ty), Some(access));
        b.unit("main", vec![circle, c, n])
    });
    assert_clean(&diags);
}

#[test]
fn test_this_in_property_initializer() {
    let diags = check(|b| {
        let x_ty = b.number_ty();
        let x = b.field("x", Some(x_ty), None);
        let y_ty = b.number_ty();
        let this_expr = b.this();
        let init = b.member(this_expr, "x");
        let y = b.field("y", Some(y_ty), Some(init));
        let c = b.class("C", None, vec![], vec![x, y]);
        b.unit("main", vec![c])
    });
    assert_code(&diags, &messages::THIS_CANNOT_BE_REFERENCED_IN_PROPERTY_INITIALIZER);
}

// ============================================================================
// Inheritance
// ============================================================================

#[test]
fn test_derived_constructor_must_call_super() {
    let diags = check(|b| {
        let base = b.class("A", None, vec![], vec![]);
        let base_ref = b.type_ref("A");
        let body = b.block(vec![]);
        let ctor = b.ctor(vec![], Some(body));
        let derived = b.class("B", Some(base_ref), vec![], vec![ctor]);
        b.unit("main", vec![base, derived])
    });
    assert_code(&diags, &messages::DERIVED_CLASS_CONSTRUCTOR_MUST_CONTAIN_SUPER_CALL);
}

#[test]
fn test_super_call_satisfies_derived_constructor() {
    let diags = check(|b| {
        let base = b.class("A", None, vec![], vec![]);
        let base_ref = b.type_ref("A");
        let sup = b.super_expr();
        let call = b.call(sup, vec![]);
        let stmt = b.expr_stmt(call);
        let body = b.block(vec![stmt]);
        let ctor = b.ctor(vec![], Some(body));
        let derived = b.class("B", Some(base_ref), vec![], vec![ctor]);
        b.unit("main", vec![base, derived])
    });
    assert_clean(&diags);
}

#[test]
fn test_super_must_be_first_with_initialized_fields() {
    let diags = check(|b| {
        let base = b.class("A", None, vec![], vec![]);
        let base_ref = b.type_ref("A");
        let x_ty = b.number_ty();
        let zero = b.num(0.0);
        let x = b.field("x", Some(x_ty), Some(zero));
        let one = b.num(1.0);
        let filler = b.expr_stmt(one);
        let sup = b.super_expr();
        let call = b.call(sup, vec![]);
        let super_stmt = b.expr_stmt(call);
        let body = b.block(vec![filler, super_stmt]);
        let ctor = b.ctor(vec![], Some(body));
        let derived = b.class("B", Some(base_ref), vec![], vec![x, ctor]);
        b.unit("main", vec![base, derived])
    });
    assert_code(&diags, &messages::SUPER_CALL_MUST_BE_FIRST_STATEMENT_IN_CONSTRUCTOR);
}

#[test]
fn test_super_call_outside_derived_constructor() {
    let diags = check(|b| {
        let sup = b.super_expr();
        let call = b.call(sup, vec![]);
        let stmt = b.expr_stmt(call);
        let body = b.block(vec![stmt]);
        let f = b.func("f", vec![], None, Some(body));
        b.unit("main", vec![f])
    });
    assert_code(&diags, &messages::SUPER_CALLS_ARE_ONLY_PERMITTED_IN_CONSTRUCTORS_OF_DERIVED_CLASSES);
}

#[test]
fn test_override_with_incompatible_type() {
    let diags = check(|b| {
        let x_ty = b.number_ty();
        let x = b.field("x", Some(x_ty), None);
        let base = b.class("A", None, vec![], vec![x]);
        let base_ref = b.type_ref("A");
        let x_ty = b.string_ty();
        let x = b.field("x", Some(x_ty), None);
        let derived = b.class("B", Some(base_ref), vec![], vec![x]);
        b.unit("main", vec![base, derived])
    });
    assert_code(&diags, &messages::CLASS_0_INCORRECTLY_EXTENDS_BASE_CLASS_1);
}

#[test]
fn test_override_changing_member_kind() {
    let diags = check(|b| {
        let ret_ty = b.void_ty();
        let body = b.block(vec![]);
        let m = b.method("m", vec![], Some(ret_ty), Some(body));
        let base = b.class("A", None, vec![], vec![m]);
        let base_ref = b.type_ref("A");
        let m_ty = b.number_ty();
        let m = b.field("m", Some(m_ty), None);
        let derived = b.class("B", Some(base_ref), vec![], vec![m]);
        b.unit("main", vec![base, derived])
    });
    assert_code(&diags, &messages::CLASS_0_DEFINES_MEMBER_1_AS_A_DIFFERENT_KIND_THAN_BASE_TYPE_2);
}

#[test]
fn test_class_may_only_extend_a_class() {
    let diags = check(|b| {
        let x_ty = b.number_ty();
        let x = b.prop_sig("x", Some(x_ty));
        let iface = b.interface("I", vec![], vec![x]);
        let base_ref = b.type_ref("I");
        let c = b.class("C", Some(base_ref), vec![], vec![]);
        b.unit("main", vec![iface, c])
    });
    assert_code(&diags, &messages::A_CLASS_MAY_ONLY_EXTEND_ANOTHER_CLASS);
}

#[test]
fn test_class_incorrectly_implements_interface() {
    let diags = check(|b| {
        let ret_ty = b.number_ty();
        let area = b.method("area", vec![], Some(ret_ty), None);
        let shape = b.interface("Shape", vec![], vec![area]);
        let shape_ref = b.type_ref("Shape");
        let square = b.class("Square", None, vec![shape_ref], vec![]);
        b.unit("main", vec![shape, square])
    });
    assert_code(&diags, &messages::CLASS_0_INCORRECTLY_IMPLEMENTS_INTERFACE_1);
}

#[test]
fn test_class_correctly_implements_interface() {
    let diags = check(|b| {
        let ret_ty = b.number_ty();
        let area = b.method("area", vec![], Some(ret_ty), None);
        let shape = b.interface("Shape", vec![], vec![area]);
        let shape_ref = b.type_ref("Shape");
        let ret_ty = b.number_ty();
        let one = b.num(1.0);
        let ret = b.ret(Some(one));
        let body = b.block(vec![ret]);
        let area_impl = b.method("area", vec![], Some(ret_ty), Some(body));
        let square = b.class("Square", None, vec![shape_ref], vec![area_impl]);
        b.unit("main", vec![shape, square])
    });
    assert_clean(&diags);
}

#[test]
fn test_implements_diagnostic_names_the_missing_member() {
    let diags = check(|b| {
        let ret_ty = b.number_ty();
        let area = b.method("area", vec![], Some(ret_ty), None);
        let shape = b.interface("Shape", vec![], vec![area]);
        let shape_ref = b.type_ref("Shape");
        let square = b.class("Square", None, vec![shape_ref], vec![]);
        b.unit("main", vec![shape, square])
    });
    let diag = diags
        .iter()
        .find(|d| d.code == messages::CLASS_0_INCORRECTLY_IMPLEMENTS_INTERFACE_1.code)
        .expect("implements failure was reported");
    assert!(
        diag.details.iter().any(|(_, text)| text.contains("'area'")),
        "details do not name the member: {:?}",
        diag.details
    );
}

#[test]
fn test_implements_satisfied_through_base_class() {
    let diags = check(|b| {
        let ret_ty = b.number_ty();
        let area = b.method("area", vec![], Some(ret_ty), None);
        let shape = b.interface("Shape", vec![], vec![area]);

        let ret_ty = b.number_ty();
        let one = b.num(1.0);
        let ret = b.ret(Some(one));
        let body = b.block(vec![ret]);
        let area_impl = b.method("area", vec![], Some(ret_ty), Some(body));
        let base = b.class("Base", None, vec![], vec![area_impl]);

        let base_ref = b.type_ref("Base");
        let shape_ref = b.type_ref("Shape");
        let square = b.class("Square", Some(base_ref), vec![shape_ref], vec![]);
        b.unit("main", vec![shape, base, square])
    });
    assert_clean(&diags);
}

#[test]
fn test_interface_extends_with_conflicting_member() {
    let diags = check(|b| {
        let x_ty = b.number_ty();
        let x = b.prop_sig("x", Some(x_ty));
        let base = b.interface("A", vec![], vec![x]);
        let base_ref = b.type_ref("A");
        let x_ty = b.string_ty();
        let x = b.prop_sig("x", Some(x_ty));
        let derived = b.interface("B", vec![base_ref], vec![x]);
        b.unit("main", vec![base, derived])
    });
    assert_code(&diags, &messages::INTERFACE_0_INCORRECTLY_EXTENDS_INTERFACE_1);
}

// ============================================================================
// Accessors
// ============================================================================

#[test]
fn test_accessor_types_must_agree() {
    let diags = check(|b| {
        let ret_ty = b.number_ty();
        let one = b.num(1.0);
        let ret = b.ret(Some(one));
        let get_body = b.block(vec![ret]);
        let getter = b.getter("size", Some(ret_ty), get_body);
        let p_ty = b.string_ty();
        let p = b.param("value", Some(p_ty));
        let set_body = b.block(vec![]);
        let setter = b.setter("size", p, set_body);
        let c = b.class("C", None, vec![], vec![getter, setter]);
        b.unit("main", vec![c])
    });
    assert_code(&diags, &messages::GETTER_AND_SETTER_TYPES_DO_NOT_AGREE);
}

#[test]
fn test_accessor_visibility_must_agree() {
    let diags = check(|b| {
        let ret_ty = b.number_ty();
        let one = b.num(1.0);
        let ret = b.ret(Some(one));
        let get_body = b.block(vec![ret]);
        let getter = b.getter("size", Some(ret_ty), get_body);
        let p_ty = b.number_ty();
        let p = b.param("value", Some(p_ty));
        let set_body = b.block(vec![]);
        let setter = b.setter("size", p, set_body);
        b.mark(setter, NodeFlags::PRIVATE);
        let c = b.class("C", None, vec![], vec![getter, setter]);
        b.unit("main", vec![c])
    });
    assert_code(&diags, &messages::GETTER_AND_SETTER_VISIBILITY_DOES_NOT_AGREE);
}

#[test]
fn test_matching_accessors_are_fine() {
    let diags = check(|b| {
        let ret_ty = b.number_ty();
        let one = b.num(1.0);
        let ret = b.ret(Some(one));
        let get_body = b.block(vec![ret]);
        let getter = b.getter("size", Some(ret_ty), get_body);
        let p_ty = b.number_ty();
        let p = b.param("value", Some(p_ty));
        let set_body = b.block(vec![]);
        let setter = b.setter("size", p, set_body);
        let c = b.class("C", None, vec![], vec![getter, setter]);
        b.unit("main", vec![c])
    });
    assert_clean(&diags);
}

// ============================================================================
// Enums
// ============================================================================

#[test]
fn test_enum_members_are_number_compatible() {
    let diags = check(|b| {
        let color = b.enum_decl("Color", &["Red", "Green", "Blue"]);
        let n_ty = b.number_ty();
        let color_ref = b.ident("Color");
        let red = b.member(color_ref, "Red");
        let n = b.var("n", Some(n_ty), Some(red));

        let color_ty = b.type_ref("Color");
        let one = b.num(1.0);
        let c = b.var("c", Some(color_ty), Some(one));
        b.unit("main", vec![color, n, c])
    });
    assert_clean(&diags);
}

#[test]
fn test_enum_rejects_string() {
    let diags = check(|b| {
        let color = b.enum_decl("Color", &["Red"]);
        let color_ty = b.type_ref("Color");
        let bad = b.str("Red");
        let c = b.var("c", Some(color_ty), Some(bad));
        b.unit("main", vec![color, c])
    });
    assert_code(&diags, &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1);
}

// ============================================================================
// Modules
// ============================================================================

#[test]
fn test_module_exported_member_access() {
    let diags = check(|b| {
        let x_ty = b.number_ty();
        let x = b.var("x", Some(x_ty), None);
        b.mark(x, NodeFlags::EXPORTED);
        let m = b.module("M", vec![x]);

        let n_ty = b.number_ty();
        let m_ref = b.ident("M");
        let access = b.member(m_ref, "x");
        let n = b.var("n", Some(n_ty), Some(access));
        b.unit("main", vec![m, n])
    });
    assert_clean(&diags);
}

#[test]
fn test_module_non_exported_member_is_invisible() {
    let diags = check(|b| {
        let x_ty = b.number_ty();
        let x = b.var("hidden", Some(x_ty), None);
        let m = b.module("M", vec![x]);

        let m_ref = b.ident("M");
        let access = b.member(m_ref, "hidden");
        let stmt = b.expr_stmt(access);
        b.unit("main", vec![m, stmt])
    });
    assert_code(&diags, &messages::PROPERTY_0_DOES_NOT_EXIST_ON_TYPE_1);
}

#[test]
fn test_qualified_type_reference() {
    let diags = check(|b| {
        let v_ty = b.number_ty();
        let v = b.prop_sig("v", Some(v_ty));
        let iface = b.interface("I", vec![], vec![v]);
        b.mark(iface, NodeFlags::EXPORTED);
        let m = b.module("M", vec![iface]);

        let a_ty = b.qualified_type_ref(&["M", "I"]);
        let a = b.var("a", Some(a_ty), None);
        let n_ty = b.number_ty();
        let a_ref = b.ident("a");
        let access = b.member(a_ref, "v");
        let n = b.var("n", Some(n_ty), Some(access));
        b.unit("main", vec![m, a, n])
    });
    assert_clean(&diags);
}

#[test]
fn test_exported_variable_leaking_private_type() {
    let diags = check(|b| {
        let v_ty = b.number_ty();
        let v = b.prop_sig("v", Some(v_ty));
        let hidden = b.interface("Hidden", vec![], vec![v]);
        let leak_ty = b.type_ref("Hidden");
        let leak = b.var("leak", Some(leak_ty), None);
        b.mark(leak, NodeFlags::EXPORTED);
        let m = b.module("M", vec![hidden, leak]);
        b.unit("main", vec![m])
    });
    assert_code(&diags, &messages::EXPORTED_VARIABLE_0_HAS_OR_IS_USING_PRIVATE_TYPE_1);
}

#[test]
fn test_exported_variable_of_exported_type_is_fine() {
    let diags = check(|b| {
        let v_ty = b.number_ty();
        let v = b.prop_sig("v", Some(v_ty));
        let public = b.interface("Public", vec![], vec![v]);
        b.mark(public, NodeFlags::EXPORTED);
        let ok_ty = b.type_ref("Public");
        let ok = b.var("ok", Some(ok_ty), None);
        b.mark(ok, NodeFlags::EXPORTED);
        let m = b.module("M", vec![public, ok]);
        b.unit("main", vec![m])
    });
    assert_clean(&diags);
}

// ============================================================================
// Operators and statements
// ============================================================================

#[test]
fn test_string_concatenation_with_number() {
    let diags = check(|b| {
        let s_ty = b.string_ty();
        let left = b.str("n = ");
        let right = b.num(1.0);
        let concat = b.binary(BinaryOp::Add, left, right);
        let s = b.var("s", Some(s_ty), Some(concat));
        b.unit("main", vec![s])
    });
    assert_clean(&diags);
}

#[test]
fn test_add_rejects_booleans() {
    let diags = check(|b| {
        let left = b.bool(true);
        let right = b.bool(false);
        let add = b.binary(BinaryOp::Add, left, right);
        let stmt = b.expr_stmt(add);
        b.unit("main", vec![stmt])
    });
    assert_code(&diags, &messages::OPERATOR_0_CANNOT_BE_APPLIED_TO_TYPES_1_AND_2);
}

#[test]
fn test_arithmetic_requires_numeric_operands() {
    let diags = check(|b| {
        let left = b.str("a");
        let right = b.num(2.0);
        let mul = b.binary(BinaryOp::Multiply, left, right);
        let stmt = b.expr_stmt(mul);
        b.unit("main", vec![stmt])
    });
    assert_code(&diags, &messages::ARITHMETIC_OPERAND_MUST_BE_OF_TYPE_ANY_NUMBER_OR_ENUM);
}

#[test]
fn test_comparison_of_unrelated_types() {
    let diags = check(|b| {
        let ty = b.boolean_ty();
        let flag = b.var("flag", Some(ty), None);
        let left = b.num(1.0);
        let right = b.bool(true);
        let cmp = b.binary(BinaryOp::Less, left, right);
        let cmp_stmt = b.expr_stmt(cmp);
        b.unit("main", vec![flag, cmp_stmt])
    });
    assert_code(&diags, &messages::OPERATOR_0_CANNOT_BE_APPLIED_TO_TYPES_1_AND_2);
}

#[test]
fn test_typeof_yields_string() {
    let diags = check(|b| {
        let n_ty = b.number_ty();
        let n = b.var("n", Some(n_ty), None);
        let s_ty = b.string_ty();
        let n_ref = b.ident("n");
        let type_of = b.unary(UnaryOp::TypeOf, n_ref);
        let s = b.var("s", Some(s_ty), Some(type_of));
        b.unit("main", vec![n, s])
    });
    assert_clean(&diags);
}

#[test]
fn test_assignment_to_non_reference() {
    let diags = check(|b| {
        let one = b.num(1.0);
        let two = b.num(2.0);
        let assign = b.assign(one, two);
        let stmt = b.expr_stmt(assign);
        b.unit("main", vec![stmt])
    });
    assert_code(&diags, &messages::INVALID_ASSIGNMENT_TARGET);
}

#[test]
fn test_assignment_type_mismatch() {
    let diags = check(|b| {
        let n_ty = b.number_ty();
        let n = b.var("n", Some(n_ty), None);
        let n_ref = b.ident("n");
        let bad = b.str("nope");
        let assign = b.assign(n_ref, bad);
        let stmt = b.expr_stmt(assign);
        b.unit("main", vec![n, stmt])
    });
    assert_code(&diags, &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1);
}

#[test]
fn test_for_in_index_must_be_stringlike() {
    let diags = check(|b| {
        let o_ty = b.any_ty();
        let o = b.var("o", Some(o_ty), None);
        let k_ty = b.boolean_ty();
        let k = b.var("k", Some(k_ty), None);
        let o_ref = b.ident("o");
        let body = b.block(vec![]);
        let loop_stmt = b.for_in(k, o_ref, body);
        b.unit("main", vec![o, loop_stmt])
    });
    assert_code(&diags, &messages::FOR_IN_INDEX_MUST_BE_OF_TYPE_STRING_NUMBER_OR_ANY);
}

#[test]
fn test_for_in_with_string_index() {
    let diags = check(|b| {
        let o_ty = b.any_ty();
        let o = b.var("o", Some(o_ty), None);
        let k_ty = b.string_ty();
        let k = b.var("k", Some(k_ty), None);
        let o_ref = b.ident("o");
        let body = b.block(vec![]);
        let loop_stmt = b.for_in(k, o_ref, body);
        b.unit("main", vec![o, loop_stmt])
    });
    assert_clean(&diags);
}

#[test]
fn test_cast_between_unrelated_types() {
    let diags = check(|b| {
        let target = b.number_ty();
        let expr = b.str("a");
        let cast = b.cast(target, expr);
        let stmt = b.expr_stmt(cast);
        b.unit("main", vec![stmt])
    });
    assert_code(&diags, &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1);
}

#[test]
fn test_cast_through_any() {
    let diags = check(|b| {
        let s_ty = b.string_ty();
        let s = b.var("s", Some(s_ty), None);
        let target = b.any_ty();
        let s_ref = b.ident("s");
        let cast = b.cast(target, s_ref);
        let n_ty = b.number_ty();
        let n = b.var("n", Some(n_ty), Some(cast));
        b.unit("main", vec![s, n])
    });
    assert_clean(&diags);
}

// ============================================================================
// Type relations
// ============================================================================

#[test]
fn test_any_converts_but_is_not_a_subtype() {
    let interner = StringInterner::new();
    let mut b = AstBuilder::new(interner.clone());
    let unit = b.unit("main", vec![]);
    let ast = b.finish();
    let mut binder = Binder::new(interner);
    binder.bind_unit(&ast, unit);
    let mut checker = Checker::new(ast, binder);
    let any = checker.types.any_type;
    let number = checker.types.number_type;
    assert!(checker.is_assignable(any, number));
    assert!(checker.is_assignable(number, any));
    assert!(checker.is_subtype(number, any));
    assert!(!checker.is_subtype(any, number));
    assert!(!checker.is_identical(any, number));
}

// ============================================================================
// Determinism
// ============================================================================

fn mixed_error_program(b: &mut AstBuilder) -> NodeId {
    let n_ty = b.number_ty();
    let bad = b.str("x");
    let v = b.var("n", Some(n_ty), Some(bad));
    let missing = b.ident("missing");
    let stmt = b.expr_stmt(missing);
    let left = b.bool(true);
    let right = b.bool(false);
    let add = b.binary(BinaryOp::Add, left, right);
    let add_stmt = b.expr_stmt(add);
    b.unit("main", vec![v, stmt, add_stmt])
}

#[test]
fn test_diagnostics_are_deterministic() {
    let first = check(mixed_error_program);
    let second = check(mixed_error_program);
    assert_eq!(codes(&first), codes(&second));
    let first_text: Vec<_> = first.iter().map(|d| d.message_text.clone()).collect();
    let second_text: Vec<_> = second.iter().map(|d| d.message_text.clone()).collect();
    assert_eq!(first_text, second_text);
}
