//! Tests scientifiques (campagne) : propriétés du pipeline de bout en bout.
//!
//! - précédence / associativité / désambiguïsation
//! - parenthèses (tolérance des "(" ouvertes, erreur sur ")" orpheline)
//! - domaines (division par zéro, factorielle, log…)
//! - fonctions : arité, imbrication, fermeture tolérante
//! - affichage : zéros finaux, notation ~, idempotence de la relecture

use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use rstest::rstest;

use super::erreurs::{CalcError, ConvertError, EvalError, LexError};
use super::evaluate_expression;

fn eval_ok(expr: &str) -> String {
    evaluate_expression(expr).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn eval_err(expr: &str) -> CalcError {
    match evaluate_expression(expr) {
        Ok(r) => panic!("erreur attendue pour expr={expr:?}, obtenu {r:?}"),
        Err(e) => e,
    }
}

fn assert_domaine(expr: &str, operation: &str) {
    match eval_err(expr) {
        CalcError::Eval(EvalError::Domaine { operation: o, .. }) => {
            assert_eq!(o, operation, "expr={expr:?}")
        }
        autre => panic!("erreur de domaine {operation:?} attendue pour {expr:?}, obtenu {autre:?}"),
    }
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Précédence / associativité ------------------------ */

#[rstest]
#[case("2+3*4", "14")]
#[case("(2+3)*4", "20")]
#[case("2^3^2", "512")]
#[case("8/4/2", "1")]
#[case("10-4-3", "3")]
#[case("2*3^2", "18")]
#[case("7\\2", "3")]
#[case("-7\\2", "-3")]
#[case("-7%3", "-1")]
#[case("7.5%2", "1.5")]
#[case("2+5p2", "22")]
#[case("5c2*2", "20")]
#[case("3¬27", "3")]
#[case("2¬16", "4")]
fn precedence_et_associativite(#[case] expr: &str, #[case] attendu: &str) {
    assert_eq!(eval_ok(expr), attendu, "expr={expr:?}");
}

/* ------------------------ Désambiguïsation ------------------------ */

#[rstest]
#[case("-3+5", "2")]
#[case("5- -3", "8")]
#[case("3!-1", "5")]
#[case("+4", "4")]
#[case("-(2+3)", "-5")]
#[case("2*-3", "-6")]
#[case("--2", "2")]
#[case("3!!", "720")]
#[case("-2^2", "4")]
fn unaire_ou_binaire(#[case] expr: &str, #[case] attendu: &str) {
    assert_eq!(eval_ok(expr), attendu, "expr={expr:?}");
}

/* ------------------------ Parenthèses ------------------------ */

#[test]
fn parentheses_ouvrantes_tolerees() {
    assert_eq!(eval_ok("(1+2"), "3");
    assert_eq!(eval_ok("((2*(3+1"), "8");
}

#[test]
fn parenthese_fermante_orpheline() {
    assert_eq!(
        eval_err(")1+2"),
        CalcError::Conversion(ConvertError::ParenthesesDesequilibrees)
    );
    assert_eq!(
        eval_err("1+2)"),
        CalcError::Conversion(ConvertError::ParenthesesDesequilibrees)
    );
}

/* ------------------------ Domaines ------------------------ */

#[rstest]
#[case("5/0", "/")]
#[case("5\\0", "\\")]
#[case("5%0", "%")]
#[case("(-1)!", "!")]
#[case("2.5!", "!")]
#[case("0^0", "^")]
#[case("2.5¬8", "¬")]
#[case("3p5", "p")]
#[case("log(0,10)", "log")]
#[case("log(10,-2)", "log")]
#[case("ln(-1)", "ln")]
#[case("arsin(2)", "arsin")]
#[case("arcos(-1.5)", "arcos")]
#[case("arcosh(0)", "arcosh")]
#[case("artanh(1)", "artanh")]
#[case("tan(pi/2)", "tan")]
#[case("tan(3*pi/2)", "tan")]
#[case("lcm(0, 3)", "lcm")]
#[case("hcf(2.5, 3)", "hcf")]
#[case("rand(1.5, 3)", "rand")]
#[case("quadp(1, 0, 1)", "quadp")]
fn erreurs_de_domaine(#[case] expr: &str, #[case] operation: &str) {
    assert_domaine(expr, operation);
}

#[test]
fn erreurs_moteur() {
    assert_eq!(eval_err("10^1000000"), CalcError::Eval(EvalError::Depassement));
    assert_eq!(eval_err("1~400"), CalcError::Eval(EvalError::NonFini));
    assert_eq!(eval_err("(-8)^(1/3)"), CalcError::Eval(EvalError::OperationInvalide));
    assert_eq!(eval_err("quadp(0, 1, 1)"), CalcError::Eval(EvalError::DivisionParZero));
}

#[test]
fn erreurs_lexicales() {
    assert_eq!(eval_err("2 # 3"), CalcError::Lex(LexError::JetonInvalide("#".into())));
    assert_eq!(eval_err("1, 2"), CalcError::Lex(LexError::VirguleHorsFonction));
    assert_eq!(
        eval_err("sin 1"),
        CalcError::Lex(LexError::ParentheseOuvranteManquante("sin".into()))
    );
}

#[test]
fn comptes_operandes() {
    assert_eq!(eval_err("2 3"), CalcError::Eval(EvalError::NombreOperandes));
    assert_eq!(eval_err("2*"), CalcError::Eval(EvalError::TropPeuOperandes));
    assert!(matches!(
        eval_err("quadp(1, 2)"),
        CalcError::Eval(EvalError::Arite { fonction: "quadp", attendu: 3, recu: 2 })
    ));
}

/* ------------------------ Fonctions ------------------------ */

#[rstest]
#[case("lcm(4,6)", "12")]
#[case("hcf(84, 36)", "12")]
#[case("abs(sin(0))", "0")]
#[case("abs(-2.5)", "2.5")]
#[case("ln(e)", "1")]
#[case("log(8, 2)", "3")]
#[case("sin(pi/6)", "0.5")]
#[case("cos(pi)", "-1")]
#[case("sin(pi)", "0")]
// l’opérande π/4 arrive arrondi à 15 décimales
#[case("tan(pi/4)", "0.999999999999999")]
#[case("artan(1)*4", "3.141592653589793")]
#[case("arsin(1)", "1.570796326794897")]
#[case("arcos(1)", "0")]
#[case("sinh(0)", "0")]
#[case("cosh(0)", "1")]
#[case("tanh(100)", "1")]
#[case("arsinh(0)", "0")]
#[case("arcosh(1)", "0")]
#[case("artanh(0)", "0")]
#[case("quadp(1, -3, 2)", "2")]
#[case("quadn(1, -3, 2)", "1")]
#[case("quadp(1, 2, 1)", "-1")]
#[case("abs(abs(abs(-7)))", "7")]
#[case("lcm(2*3, hcf(8, 12))", "12")]
#[case("2*abs(-3", "6")]
fn fonctions(#[case] expr: &str, #[case] attendu: &str) {
    assert_eq!(eval_ok(expr), attendu, "expr={expr:?}");
}

#[test]
fn alea_dans_les_bornes() {
    for _ in 0..20 {
        let r = eval_ok("rand(10, 5)");
        let v: i64 = r.parse().unwrap_or_else(|e| panic!("rand -> {r:?} : {e}"));
        assert!((5..=10).contains(&v), "rand(10, 5) = {v}");
    }
}

/* ------------------------ Affichage ------------------------ */

#[rstest]
#[case("1~3*2", "2000")]
#[case("2.5~1", "25")]
#[case("1~20", "1~20")]
#[case("-3~17*2", "-6~17")]
#[case("1/3", "0.333333333333333")]
#[case("2/3", "0.666666666666667")]
#[case("1/8", "0.125")]
#[case("0.1+0.2", "0.3")]
#[case("1~-16", "0")]
#[case("-1~-16", "0")]
#[case("2^64", "1.844674407370955~19")]
#[case("2^50", "1125899906842624")]
#[case("25!", "1.551121004333099~25")]
#[case("g*2", "19.6133")]
fn affichage(#[case] expr: &str, #[case] attendu: &str) {
    assert_eq!(eval_ok(expr), attendu, "expr={expr:?}");
}

#[test]
fn relecture_idempotente() {
    let start = Instant::now();
    for expr in [
        "1/7",
        "-2/3",
        "2^70",
        "pi*1~20",
        "e^-30",
        "phi",
        "tau/7",
        "1~-10/3",
        "123456789.987654321",
    ] {
        budget(start, Duration::from_secs(10));
        let Ok(une) = evaluate_expression(expr) else {
            continue;
        };
        let deux = eval_ok(&une);
        assert_eq!(deux, une, "expr={expr:?}");
        assert_eq!(eval_ok(&deux), deux, "expr={expr:?}");
    }
}
