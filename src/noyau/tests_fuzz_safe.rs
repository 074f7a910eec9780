//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - toute erreur doit appartenir à la taxonomie (jamais Interne, jamais de panique)
//! - invariant clé : un résultat affiché se relit à l’identique
//! - appels simultanés depuis plusieurs fils = mêmes résultats qu’en série

use std::time::{Duration, Instant};

use super::erreurs::CalcError;
use super::evaluate_expression;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    let entier = rng.pick(1000);
    match rng.pick(4) {
        0 => format!("{entier}"),
        1 => format!("{entier}.{}", rng.pick(100)),
        2 => format!("{}~{}", rng.pick(10), rng.pick(40) as i32 - 20),
        _ => format!(".{}", rng.pick(1000)),
    }
}

fn gen_atome(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 => "pi".to_string(),
        1 => "e".to_string(),
        2 => "phi".to_string(),
        _ => gen_nombre(rng),
    }
}

const BINAIRES: [&str; 8] = ["+", "-", "*", "/", "\\", "%", "^", "¬"];
const FONCTIONS_1: [&str; 14] = [
    "ln", "abs", "sin", "cos", "tan", "artan", "sinh", "cosh", "tanh", "arsinh", "arsin",
    "arcos", "arcosh", "artanh",
];
const FONCTIONS_2: [&str; 4] = ["log", "lcm", "hcf", "rand"];

fn gen_expr(rng: &mut Rng, profondeur: usize) -> String {
    if profondeur == 0 {
        return gen_atome(rng);
    }

    match rng.pick(8) {
        0 => gen_atome(rng),
        1 | 2 => {
            let op = BINAIRES[rng.pick(BINAIRES.len() as u32) as usize];
            format!(
                "({}{op}{})",
                gen_expr(rng, profondeur - 1),
                gen_expr(rng, profondeur - 1)
            )
        }
        3 => format!("-{}", gen_expr(rng, profondeur - 1)),
        4 => format!("({})!", rng.pick(12)),
        5 => {
            let f = FONCTIONS_1[rng.pick(FONCTIONS_1.len() as u32) as usize];
            format!("{f}({})", gen_expr(rng, profondeur - 1))
        }
        6 => {
            let f = FONCTIONS_2[rng.pick(FONCTIONS_2.len() as u32) as usize];
            format!(
                "{f}({}, {})",
                gen_expr(rng, profondeur - 1),
                gen_expr(rng, profondeur - 1)
            )
        }
        _ => {
            let a = rng.pick(5) as i32 - 2;
            format!("quadp({a}, {}, {})", rng.pick(20), rng.pick(5) as i32 - 4)
        }
    }
}

/// Bruit : caractères collés au hasard (doit échouer proprement, jamais paniquer).
fn gen_bruit(rng: &mut Rng) -> String {
    const ALPHABET: &[char] = &[
        '1', '2', '.', '~', '-', '+', '*', '/', '^', '!', '(', ')', ',', ' ', 'p', 'c', 's', 'i',
        'n', '¬', '%', '\\', '#', 'x',
    ];
    let n = 1 + rng.pick(12) as usize;
    (0..n)
        .map(|_| ALPHABET[rng.pick(ALPHABET.len() as u32) as usize])
        .collect()
}

fn verifie_erreur(expr: &str, e: &CalcError) {
    assert!(
        e.est_erreur_utilisateur(),
        "erreur hors taxonomie pour expr={expr:?} : {e}"
    );
    assert!(!e.to_string().is_empty());
}

/* ------------------------ Campagnes ------------------------ */

#[test]
fn fuzz_expressions_relecture_stable() {
    let start = Instant::now();
    let max = Duration::from_secs(20);
    let mut rng = Rng::new(0xC0FFEE);

    for _ in 0..300 {
        budget(start, max);
        let expr = gen_expr(&mut rng, 3);

        match evaluate_expression(&expr) {
            Ok(affiche) => {
                // la sortie est une entrée valide et stable
                let relu = evaluate_expression(&affiche)
                    .unwrap_or_else(|e| panic!("relecture de {affiche:?} (expr={expr:?}) : {e}"));
                assert_eq!(relu, affiche, "expr={expr:?}");
            }
            Err(e) => verifie_erreur(&expr, &e),
        }
    }
}

#[test]
fn fuzz_bruit_jamais_de_panique() {
    let start = Instant::now();
    let max = Duration::from_secs(10);
    let mut rng = Rng::new(42);

    for _ in 0..500 {
        budget(start, max);
        let expr = gen_bruit(&mut rng);
        if let Err(e) = evaluate_expression(&expr) {
            verifie_erreur(&expr, &e);
        }
    }
}

#[test]
fn deterministe_hors_rand() {
    let mut a = Rng::new(7);
    let mut b = Rng::new(7);

    for _ in 0..50 {
        let ea = gen_expr(&mut a, 2);
        let eb = gen_expr(&mut b, 2);
        assert_eq!(ea, eb);
        if ea.contains("rand") {
            continue;
        }
        assert_eq!(evaluate_expression(&ea), evaluate_expression(&eb), "expr={ea:?}");
    }
}

#[test]
fn imbrication_profonde_bornee() {
    // 40 niveaux : sous la borne par défaut
    let mut expr = "1".to_string();
    for _ in 0..40 {
        expr = format!("abs({expr})");
    }
    assert_eq!(evaluate_expression(&expr), Ok("1".to_string()));

    // au-delà : erreur propre, pas de débordement de pile
    let mut expr = "1".to_string();
    for _ in 0..100 {
        expr = format!("abs({expr})");
    }
    assert!(matches!(
        evaluate_expression(&expr),
        Err(CalcError::Lex(super::erreurs::LexError::TropProfond(_)))
    ));
}

#[test]
fn coin_equilibre() {
    // garde-fou : le générateur ne dégénère pas
    let mut rng = Rng::new(1);
    let faces = (0..1000).filter(|_| rng.coin()).count();
    assert!((300..700).contains(&faces), "faces={faces}");
}

#[test]
fn appels_concurrents_identiques_au_serie() {
    let start = Instant::now();
    let mut rng = Rng::new(0xBEEF);
    let exprs: Vec<String> = (0..40)
        .map(|_| gen_expr(&mut rng, 2))
        .filter(|e| !e.contains("rand"))
        .chain(["sin(pi/6)", "ln(e)", "1/3", "25!", "tan(pi/2)"].map(String::from))
        .collect();
    let serie: Vec<_> = exprs.iter().map(|e| evaluate_expression(e)).collect();

    std::thread::scope(|s| {
        let fils: Vec<_> = (0..6)
            .map(|k| {
                let exprs = &exprs;
                s.spawn(move || {
                    // chaque fil parcourt la liste depuis un point différent
                    (0..exprs.len())
                        .map(|i| (i + k * 7) % exprs.len())
                        .map(|i| (i, evaluate_expression(&exprs[i])))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for f in fils {
            let resultats = f.join().unwrap_or_else(|_| panic!("fil paniqué"));
            for (i, r) in resultats {
                assert_eq!(r, serie[i], "expr={:?}", exprs[i]);
            }
        }
    });
    budget(start, Duration::from_secs(30));
}
