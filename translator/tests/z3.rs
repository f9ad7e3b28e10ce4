#![cfg(feature = "z3")]

use z3::{
    Config, Context,
    ast::{self, Ast},
};

use common::z3::{AstNode, SolveResult, WrappedSolver, parse_smtlib2};

use bvxlate::{
    OpKind, Script, SmtLibSink, Sort, Theory, TranslateError, Z3Sink, Z3Source,
    ops::Unsupported, translate,
};

fn no_vars<'a, 'ctx>() -> Vec<(&'a str, &'a AstNode<'ctx>)> {
    Vec::new()
}

/// `((a1 >> concat(0:24, a2)) ^ 1) & 1 == eax`
fn shift_formula(context: &Context) -> ast::Bool<'_> {
    let a1 = ast::BV::new_const(context, "a1", 32);
    let a2 = ast::BV::new_const(context, "a2", 8);
    let eax = ast::BV::new_const(context, "eax", 32);
    let one = ast::BV::from_u64(context, 1, 32);
    let amount = ast::BV::from_u64(context, 0, 24).concat(&a2);
    a1.bvlshr(&amount).bvxor(&one).bvand(&one)._eq(&eax)
}

fn translate_bool<'ctx>(formula: ast::Bool<'_>, target: &'ctx Context) -> ast::Bool<'ctx> {
    let translation = translate(&Z3Source::from(formula), &mut Z3Sink::new(target)).unwrap();
    translation.expr.as_bool().unwrap().clone()
}

fn assert_equivalent<'ctx>(
    context: &'ctx Context,
    left: &ast::Bool<'ctx>,
    right: &ast::Bool<'ctx>,
) {
    let solver = WrappedSolver::new(context);
    let differ = left.xor(right);
    assert!(solver.check(&[differ], no_vars()).is_unsat());
}

fn parse_assertions<'ctx>(context: &'ctx Context, text: &str) -> ast::Bool<'ctx> {
    let assertions = parse_smtlib2(context, text).unwrap();
    ast::Bool::and(context, &assertions.iter().collect::<Vec<_>>())
}

fn boolean_structure(context: &Context) -> ast::Bool<'_> {
    let p = ast::Bool::new_const(context, "p");
    let q = ast::Bool::new_const(context, "q");
    let x = ast::BV::new_const(context, "x", 8);
    let y = ast::BV::new_const(context, "y", 8);
    let z = ast::BV::new_const(context, "z", 8);
    let distinct = ast::Bool::and(
        context,
        &[&x._eq(&y).not(), &x._eq(&z).not(), &y._eq(&z).not()],
    );
    ast::Bool::or(
        context,
        &[&p.implies(&q), &p.xor(&q), &p.ite(&x, &y).bvugt(&z), &distinct],
    )
}

fn rotations(context: &Context) -> ast::Bool<'_> {
    let x = ast::BV::new_const(context, "x", 8);
    let n = ast::BV::new_const(context, "n", 8);
    let y = ast::BV::new_const(context, "y", 8);
    let rotated = x.bvrotl(&n).bvor(&x.bvrotr(&y));
    rotated
        .bvsmod(&y)
        .bvsle(&ast::BV::from_u64(context, 200, 8).bvneg())
}

#[test]
fn test_shift_formula_is_equivalent() {
    let source = Context::new(&Config::new());
    let target = Context::new(&Config::new());

    let formula = shift_formula(&source);
    let translation =
        translate(&Z3Source::from(formula.clone()), &mut Z3Sink::new(&target)).unwrap();
    assert_eq!(translation.symbols.len(), 3);

    let translated = translation.expr.as_bool().unwrap().clone();
    assert_equivalent(&target, &translated, &shift_formula(&target));

    let solver = WrappedSolver::new(&target);
    let vars = translation
        .symbols
        .iter()
        .map(|(name, symbol)| (name, &symbol.expr));
    match solver.check(&[translated], vars) {
        SolveResult::Sat(model) => {
            assert_eq!(
                model.keys().map(String::as_str).collect::<Vec<_>>(),
                ["a1", "a2", "eax"]
            );
            assert_eq!(model["a2"].size(), Some(8));
        }
        _ => panic!("Expected SAT result"),
    }

    let source_solver = WrappedSolver::new(&source);
    assert!(source_solver.check(&[formula], no_vars()).is_sat());
}

#[test]
fn test_signed_and_unsigned_comparisons_differ() {
    let source = Context::new(&Config::new());
    let target = Context::new(&Config::new());
    let a = ast::BV::from_u64(&source, 0b0101, 4);
    let b = ast::BV::from_u64(&source, 0b1101, 4);

    let solver = WrappedSolver::new(&target);
    // 5 < -3 does not hold, 5 < 13 does.
    let signed = translate_bool(a.bvslt(&b), &target);
    assert!(solver.check(&[signed], no_vars()).is_unsat());
    let unsigned = translate_bool(a.bvult(&b), &target);
    assert!(solver.check(&[unsigned], no_vars()).is_sat());

    let x = ast::BV::new_const(&source, "x", 4);
    let y = ast::BV::new_const(&source, "y", 4);
    let division = x.bvsdiv(&y)._eq(&x.bvudiv(&y));
    let translated = translate_bool(division, &target);
    let x = ast::BV::new_const(&target, "x", 4);
    let y = ast::BV::new_const(&target, "y", 4);
    assert_equivalent(&target, &translated, &x.bvsdiv(&y)._eq(&x.bvudiv(&y)));
    // Not a tautology: the two divisions disagree on negative operands.
    assert!(solver.check(&[translated.not()], no_vars()).is_sat());
}

#[test]
fn test_extraction_and_extension_widths() {
    let source = Context::new(&Config::new());
    let target = Context::new(&Config::new());
    let x = ast::BV::new_const(&source, "x", 32);
    let y = ast::BV::new_const(&source, "y", 8);

    let low = translate(&Z3Source::from(x.extract(7, 0)), &mut Z3Sink::new(&target)).unwrap();
    assert_eq!(low.expr.size(), Some(8));

    let wide = translate(&Z3Source::from(y.sign_ext(24)), &mut Z3Sink::new(&target)).unwrap();
    assert_eq!(wide.expr.size(), Some(32));

    let formula = ast::BV::from_u64(&source, 0x80, 8)
        .sign_ext(24)
        ._eq(&ast::BV::from_u64(&source, 0xFFFF_FF80, 32));
    let translated = translate_bool(formula, &target);
    let solver = WrappedSolver::new(&target);
    assert!(solver.check(&[translated.not()], no_vars()).is_unsat());
}

#[test]
fn test_boolean_structure() {
    let source = Context::new(&Config::new());
    let target = Context::new(&Config::new());
    let translated = translate_bool(boolean_structure(&source), &target);
    assert_equivalent(&target, &translated, &boolean_structure(&target));
}

#[test]
fn test_unsupported_operator_is_reported() {
    let source = Context::new(&Config::new());
    let target = Context::new(&Config::new());
    let x = ast::BV::new_const(&source, "x", 8);
    let y = ast::BV::new_const(&source, "y", 8);
    let formula = x.bvxnor(&y)._eq(&x);

    match translate(&Z3Source::from(formula), &mut Z3Sink::new(&target)) {
        Err(TranslateError::UnsupportedOperator { kind, .. }) => {
            assert_eq!(kind, OpKind::Unsupported(Unsupported::BvXnor))
        }
        Err(other) => panic!("Unexpected error: {other}"),
        Ok(_) => panic!("Expected an error"),
    }
}

#[test]
fn test_recognized_kinds_without_translation_are_unsupported() {
    let source = Context::new(&Config::new());
    let target = Context::new(&Config::new());
    let formula = parse_assertions(
        &source,
        "(declare-fun x () (_ BitVec 8))\n\
         (declare-fun y () (_ BitVec 8))\n\
         (assert (bvumul_noovfl x y))",
    );

    match translate(&Z3Source::from(formula), &mut Z3Sink::new(&target)) {
        Err(TranslateError::UnsupportedOperator { kind, form }) => {
            assert_eq!(kind, OpKind::Unsupported(Unsupported::Theory(Theory::BitVec)));
            assert!(form.contains("bvumul_noovfl"));
        }
        Err(other) => panic!("Unexpected error: {other}"),
        Ok(_) => panic!("Expected an error"),
    }
}

#[test]
fn test_parsed_rotation_by_literal() {
    let source = Context::new(&Config::new());
    let target = Context::new(&Config::new());
    let formula = parse_assertions(
        &source,
        "(declare-fun x () (_ BitVec 8))\n\
         (declare-fun y () (_ BitVec 8))\n\
         (assert (= ((_ rotate_left 3) x) y))",
    );

    let translated = translate_bool(formula, &target);
    let x = ast::BV::new_const(&target, "x", 8);
    let y = ast::BV::new_const(&target, "y", 8);
    let expected = x.bvrotl(&ast::BV::from_u64(&target, 3, 8))._eq(&y);
    assert_equivalent(&target, &translated, &expected);
}

#[test]
fn test_smtlib_output_is_equivalent() {
    let source = Context::new(&Config::new());
    let target = Context::new(&Config::new());
    let translation = translate(&Z3Source::from(rotations(&source)), &mut SmtLibSink).unwrap();
    assert_eq!(translation.expr.sort(), Sort::Bool);
    let script = Script::new(translation.expr, &translation.symbols);
    let parsed = parse_assertions(&target, &script.to_string());
    assert_equivalent(&target, &parsed, &rotations(&target));
}
