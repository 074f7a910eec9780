// src/noyau/catalogue.rs
//
// Catalogue des symboles
// ----------------------
// Table immuable symbole -> descripteur :
// - opérateurs (précédence : plus petit = exécuté d’abord)
// - symboles ambigus (+ / -) : un descripteur unaire ET un binaire,
//   le lexeur choisit selon le jeton précédent
// - fonctions préfixes à nombre d’opérandes fixe
// - constantes (texte exact, converti en Nombre sans arrondi)
//
// Chaque opération vérifie son domaine et renvoie EvalError::Domaine
// (jamais de panique).

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::sync::OnceLock;

use num_bigint::{BigInt, RandBigInt};
use num_traits::{One, Zero};

use super::decimal::{Nombre, GARDE, PRECISION};
use super::erreurs::EvalError;
use super::transcendantes;

/* ------------------------ Descripteurs ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativite {
    Gauche,
    Droite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arite {
    Unaire,
    Binaire,
}

pub type Operation = fn(&[Nombre]) -> Result<Nombre, EvalError>;

#[derive(Debug)]
pub struct Operateur {
    pub symbole: &'static str,
    pub nom: &'static str,
    pub precedence: u8,
    pub associativite: Associativite,
    pub arite: Arite,
    pub operation: Operation,
}

impl Operateur {
    pub fn execute(&self, operandes: &[Nombre]) -> Result<Nombre, EvalError> {
        (self.operation)(operandes)
    }

    /// Unaire à droite : son opérande le suit (préfixe).
    pub fn est_prefixe(&self) -> bool {
        self.arite == Arite::Unaire && self.associativite == Associativite::Droite
    }
}

#[derive(Debug)]
pub struct Fonction {
    pub symbole: &'static str,
    pub nom: &'static str,
    pub nb_operandes: usize,
    pub operation: Operation,
}

#[derive(Clone, Copy, Debug)]
pub enum Entree {
    Operateur(&'static Operateur),
    Ambigu {
        unaire: &'static Operateur,
        binaire: &'static Operateur,
    },
    Fonction(&'static Fonction),
    Constante(&'static str),
}

/* ------------------------ Opérateurs ------------------------ */

use Arite::{Binaire, Unaire};
use Associativite::{Droite, Gauche};

macro_rules! operateur {
    ($ident:ident, $sym:expr, $nom:expr, $prec:expr, $assoc:expr, $arite:expr, $op:expr) => {
        static $ident: Operateur = Operateur {
            symbole: $sym,
            nom: $nom,
            precedence: $prec,
            associativite: $assoc,
            arite: $arite,
            operation: $op,
        };
    };
}

operateur!(POSITIF, "+", "Positif (+)", 1, Droite, Unaire, op_positif);
operateur!(NEGATIF, "-", "Négatif (-)", 1, Droite, Unaire, op_negatif);
operateur!(FACTORIELLE, "!", "Factorielle (!)", 1, Gauche, Unaire, op_factorielle);

operateur!(ADDITION, "+", "Addition (+)", 4, Gauche, Binaire, op_addition);
operateur!(SOUSTRACTION, "-", "Soustraction (-)", 4, Gauche, Binaire, op_soustraction);
operateur!(MULTIPLICATION, "*", "Multiplication (*)", 3, Gauche, Binaire, op_multiplication);
operateur!(DIVISION, "/", "Division (/)", 3, Gauche, Binaire, op_division);
operateur!(DIVISION_ENTIERE, "\\", "Division entière (\\)", 3, Gauche, Binaire, op_division_entiere);
operateur!(MODULO, "%", "Modulo (%)", 3, Gauche, Binaire, op_modulo);
operateur!(PUISSANCE, "^", "Puissance (^)", 2, Droite, Binaire, op_puissance);
operateur!(RACINE, "¬", "Racine (r¬x)", 2, Droite, Binaire, op_racine);
operateur!(PERMUTATIONS, "p", "Permutations (nPr)", 0, Gauche, Binaire, op_permutations);
operateur!(COMBINAISONS, "c", "Combinaisons (nCr)", 0, Gauche, Binaire, op_combinaisons);

/* ------------------------ Fonctions ------------------------ */

macro_rules! fonction {
    ($ident:ident, $sym:expr, $nom:expr, $n:expr, $op:expr) => {
        static $ident: Fonction = Fonction {
            symbole: $sym,
            nom: $nom,
            nb_operandes: $n,
            operation: $op,
        };
    };
}

fonction!(LN, "ln", "Logarithme népérien : ln(x)", 1, f_ln);
fonction!(LOG, "log", "Logarithme en base b : log(x, b)", 2, f_log);
fonction!(ABS, "abs", "Valeur absolue : abs(x)", 1, f_abs);
fonction!(PPCM, "lcm", "Plus petit commun multiple : lcm(a, b)", 2, f_ppcm);
fonction!(PGCD, "hcf", "Plus grand commun diviseur : hcf(a, b)", 2, f_pgcd);
fonction!(ALEA, "rand", "Entier aléatoire entre a et b inclus : rand(a, b)", 2, f_alea);
fonction!(QUADP, "quadp", "Racine (+√) de ax²+bx+c : quadp(a, b, c)", 3, f_quadp);
fonction!(QUADN, "quadn", "Racine (−√) de ax²+bx+c : quadn(a, b, c)", 3, f_quadn);
fonction!(SIN, "sin", "Sinus (radians)", 1, f_sin);
fonction!(COS, "cos", "Cosinus (radians)", 1, f_cos);
fonction!(TAN, "tan", "Tangente (radians)", 1, f_tan);
fonction!(ARSIN, "arsin", "Arc sinus", 1, f_arsin);
fonction!(ARCOS, "arcos", "Arc cosinus", 1, f_arcos);
fonction!(ARTAN, "artan", "Arc tangente", 1, f_artan);
fonction!(SINH, "sinh", "Sinus hyperbolique", 1, f_sinh);
fonction!(COSH, "cosh", "Cosinus hyperbolique", 1, f_cosh);
fonction!(TANH, "tanh", "Tangente hyperbolique", 1, f_tanh);
fonction!(ARSINH, "arsinh", "Argument sinus hyperbolique", 1, f_arsinh);
fonction!(ARCOSH, "arcosh", "Argument cosinus hyperbolique", 1, f_arcosh);
fonction!(ARTANH, "artanh", "Argument tangente hyperbolique", 1, f_artanh);

/* ------------------------ Table ------------------------ */

/// Ordre d’affichage de l’aide.
static ENTREES: &[(&str, Entree)] = &[
    ("+", Entree::Ambigu { unaire: &POSITIF, binaire: &ADDITION }),
    ("-", Entree::Ambigu { unaire: &NEGATIF, binaire: &SOUSTRACTION }),
    ("*", Entree::Operateur(&MULTIPLICATION)),
    ("/", Entree::Operateur(&DIVISION)),
    ("\\", Entree::Operateur(&DIVISION_ENTIERE)),
    ("%", Entree::Operateur(&MODULO)),
    ("^", Entree::Operateur(&PUISSANCE)),
    ("¬", Entree::Operateur(&RACINE)),
    ("!", Entree::Operateur(&FACTORIELLE)),
    ("p", Entree::Operateur(&PERMUTATIONS)),
    ("c", Entree::Operateur(&COMBINAISONS)),
    ("ln", Entree::Fonction(&LN)),
    ("log", Entree::Fonction(&LOG)),
    ("abs", Entree::Fonction(&ABS)),
    ("lcm", Entree::Fonction(&PPCM)),
    ("hcf", Entree::Fonction(&PGCD)),
    ("rand", Entree::Fonction(&ALEA)),
    ("quadp", Entree::Fonction(&QUADP)),
    ("quadn", Entree::Fonction(&QUADN)),
    ("sin", Entree::Fonction(&SIN)),
    ("cos", Entree::Fonction(&COS)),
    ("tan", Entree::Fonction(&TAN)),
    ("arsin", Entree::Fonction(&ARSIN)),
    ("arcos", Entree::Fonction(&ARCOS)),
    ("artan", Entree::Fonction(&ARTAN)),
    ("sinh", Entree::Fonction(&SINH)),
    ("cosh", Entree::Fonction(&COSH)),
    ("tanh", Entree::Fonction(&TANH)),
    ("arsinh", Entree::Fonction(&ARSINH)),
    ("arcosh", Entree::Fonction(&ARCOSH)),
    ("artanh", Entree::Fonction(&ARTANH)),
    ("pi", Entree::Constante("3.14159265358979323846264338327950288")),
    ("tau", Entree::Constante("6.28318530717958647692528676655900576")),
    ("e", Entree::Constante("2.71828182845904523536028747135266249")),
    ("g", Entree::Constante("9.80665")),
    ("phi", Entree::Constante("1.61803398874989484820458683436563811")),
];

fn table() -> &'static HashMap<&'static str, Entree> {
    static TABLE: OnceLock<HashMap<&'static str, Entree>> = OnceLock::new();
    TABLE.get_or_init(|| ENTREES.iter().copied().collect())
}

pub fn cherche(symbole: &str) -> Option<Entree> {
    table().get(symbole).copied()
}

/// Aide lisible : opérateurs, fonctions, constantes.
pub fn instructions() -> String {
    let mut texte = String::new();

    texte.push_str("Opérateurs :\n");
    for (_, entree) in ENTREES {
        match entree {
            Entree::Ambigu { unaire, binaire } => {
                ligne_operateur(&mut texte, binaire);
                ligne_operateur(&mut texte, unaire);
            }
            Entree::Operateur(op) => ligne_operateur(&mut texte, op),
            _ => {}
        }
    }

    texte.push_str("\nFonctions :\n");
    for (_, entree) in ENTREES {
        if let Entree::Fonction(f) = entree {
            let _ = writeln!(texte, "  {:<6} {} ({} opérande(s))", f.symbole, f.nom, f.nb_operandes);
        }
    }

    texte.push_str("\nConstantes :\n");
    for (symbole, entree) in ENTREES {
        if let Entree::Constante(valeur) = entree {
            let _ = writeln!(texte, "  {symbole:<6} {valeur}");
        }
    }

    texte.push_str("\nNotation : 1~3 = 1000, 2.5~-2 = 0.025 ; angles en radians.\n");
    texte
}

fn ligne_operateur(texte: &mut String, op: &Operateur) {
    let _ = writeln!(texte, "  {:<6} {} [précédence {}]", op.symbole, op.nom, op.precedence);
}

/* ------------------------ Helpers domaine ------------------------ */

/// Les opérandes arrivent déjà comptés (évaluateur / appel de fonction).
fn args<const N: usize>(ops: &[Nombre]) -> Result<&[Nombre; N], EvalError> {
    ops.try_into().map_err(|_| EvalError::NombreOperandes)
}

fn entier_naturel(x: &Nombre) -> bool {
    x.est_entier() && !x.est_negatif()
}

/// Au-delà, un entier n’est plus représenté exactement dans le contexte.
fn entier_borne(op: &'static str, ops: &[Nombre], x: &Nombre) -> Result<BigInt, EvalError> {
    if x.exposant_ajuste() >= PRECISION as i64 {
        return Err(EvalError::domaine(op, ops, "Nombre entier trop grand"));
    }
    x.en_entier()
        .ok_or_else(|| EvalError::domaine(op, ops, "Doit être un nombre entier"))
}

/* ------------------------ Arithmétique ------------------------ */

fn op_positif(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x] = args::<1>(ops)?;
    Ok(x.clone())
}

fn op_negatif(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x] = args::<1>(ops)?;
    Ok(x.neg())
}

fn op_addition(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x, y] = args::<2>(ops)?;
    x.add(y)
}

fn op_soustraction(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x, y] = args::<2>(ops)?;
    x.sub(y)
}

fn op_multiplication(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x, y] = args::<2>(ops)?;
    x.mul(y)
}

fn diviseur_non_nul(op: &'static str, ops: &[Nombre], y: &Nombre) -> Result<(), EvalError> {
    if y.est_zero() {
        return Err(EvalError::domaine(op, ops, "Impossible de diviser par 0"));
    }
    Ok(())
}

fn op_division(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x, y] = args::<2>(ops)?;
    diviseur_non_nul("/", ops, y)?;
    x.div(y)
}

fn op_division_entiere(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x, y] = args::<2>(ops)?;
    diviseur_non_nul("\\", ops, y)?;
    x.div_entiere(y)
}

fn op_modulo(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x, y] = args::<2>(ops)?;
    diviseur_non_nul("%", ops, y)?;
    x.reste(y)
}

fn op_puissance(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x, y] = args::<2>(ops)?;
    if x.est_zero() && y.est_zero() {
        return Err(EvalError::domaine("^", ops, "0 puissance 0 est indéfini"));
    }
    x.puissance(y)
}

/// r¬x = x^(1/r)
fn op_racine(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [r, x] = args::<2>(ops)?;
    if !r.est_entier() || !r.est_positif() {
        return Err(EvalError::domaine("¬", ops, "L’indice de la racine doit être un entier positif"));
    }
    let exposant = Nombre::un().div(r)?;
    x.puissance(&exposant)
}

/* ------------------------ Combinatoire ------------------------ */

/// Plus grand n dont la factorielle reste sous EMAX.
const FACTORIELLE_MAX: i64 = 205_022;

fn factorielle(x: &Nombre) -> Result<Nombre, EvalError> {
    if *x > Nombre::from(FACTORIELLE_MAX) {
        return Err(EvalError::Depassement);
    }

    let un = Nombre::un();
    let mut produit = un.clone();
    let mut k = x.clone();

    while k > un {
        produit = produit.mul(&k)?;
        k = k.sub(&un)?;
    }
    Ok(produit)
}

fn op_factorielle(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x] = args::<1>(ops)?;
    if !entier_naturel(x) {
        return Err(EvalError::domaine(
            "!",
            ops,
            "La factorielle n’est définie que pour les entiers positifs ou nuls",
        ));
    }
    factorielle(x)
}

fn verifie_n_r(op: &'static str, ops: &[Nombre], n: &Nombre, r: &Nombre) -> Result<(), EvalError> {
    if !entier_naturel(n) || !entier_naturel(r) {
        return Err(EvalError::domaine(op, ops, "n et r doivent être des entiers positifs ou nuls"));
    }
    if r > n {
        return Err(EvalError::domaine(op, ops, "r doit être inférieur ou égal à n"));
    }
    Ok(())
}

/// nPr = n! / (n−r)!
fn op_permutations(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [n, r] = args::<2>(ops)?;
    verifie_n_r("p", ops, n, r)?;
    factorielle(n)?.div(&factorielle(&n.sub(r)?)?)
}

/// nCr = n! / (r! (n−r)!)
fn op_combinaisons(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [n, r] = args::<2>(ops)?;
    verifie_n_r("c", ops, n, r)?;
    let denominateur = factorielle(r)?.mul(&factorielle(&n.sub(r)?)?)?;
    factorielle(n)?.div(&denominateur)
}

/* ------------------------ Logarithmes / divers ------------------------ */

fn f_ln(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x] = args::<1>(ops)?;
    if !x.est_positif() {
        return Err(EvalError::domaine("ln", ops, "Le logarithme n’est défini que pour x > 0"));
    }
    transcendantes::ln(x, PRECISION)
}

fn f_log(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x, base] = args::<2>(ops)?;
    if !x.est_positif() || !base.est_positif() {
        return Err(EvalError::domaine(
            "log",
            ops,
            "Le nombre et la base doivent être strictement positifs",
        ));
    }
    if *base == Nombre::un() {
        return Err(EvalError::domaine("log", ops, "La base ne peut pas valoir 1"));
    }

    let travail = PRECISION + GARDE;
    let lx = transcendantes::ln(x, travail)?;
    let lb = transcendantes::ln(base, travail)?;
    lx.div(&lb)
}

fn f_abs(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x] = args::<1>(ops)?;
    Ok(x.abs())
}

/// Décomposition par divisions successives.
fn facteurs_premiers(
    op: &'static str,
    ops: &[Nombre],
    x: &Nombre,
) -> Result<BTreeMap<BigInt, u32>, EvalError> {
    if !x.est_positif() {
        return Err(EvalError::domaine(op, ops, "Doit être un entier strictement positif"));
    }
    let mut n = entier_borne(op, ops, x)?;

    let mut facteurs = BTreeMap::new();
    let mut d = BigInt::from(2);
    while &d * &d <= n {
        if (&n % &d).is_zero() {
            n /= &d;
            *facteurs.entry(d.clone()).or_insert(0) += 1;
        } else {
            d += 1u32;
        }
    }
    if n > BigInt::one() {
        *facteurs.entry(n).or_insert(0) += 1;
    }
    Ok(facteurs)
}

fn produit_facteurs(facteurs: &BTreeMap<BigInt, u32>) -> Result<Nombre, EvalError> {
    let produit = facteurs
        .iter()
        .fold(BigInt::one(), |acc, (p, e)| acc * p.pow(*e));
    Nombre::from(produit).arrondi_a(PRECISION)
}

fn f_ppcm(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [a, b] = args::<2>(ops)?;
    let mut facteurs = facteurs_premiers("lcm", ops, a)?;
    for (p, e) in facteurs_premiers("lcm", ops, b)? {
        let courant = facteurs.entry(p).or_insert(0);
        *courant = (*courant).max(e);
    }
    produit_facteurs(&facteurs)
}

fn f_pgcd(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [a, b] = args::<2>(ops)?;
    let fa = facteurs_premiers("hcf", ops, a)?;
    let fb = facteurs_premiers("hcf", ops, b)?;

    let communs = fa
        .into_iter()
        .filter_map(|(p, e)| fb.get(&p).map(|eb| (p, e.min(*eb))))
        .collect();
    produit_facteurs(&communs)
}

fn f_alea(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [a, b] = args::<2>(ops)?;
    let mut bas = entier_borne("rand", ops, a)?;
    let mut haut = entier_borne("rand", ops, b)?;
    if bas > haut {
        std::mem::swap(&mut bas, &mut haut);
    }

    let tirage = rand::thread_rng().gen_bigint_range(&bas, &(haut + 1u32));
    Ok(Nombre::from(tirage))
}

/// (−b ± √(b² − 4ac)) / 2a
fn quadratique(op: &'static str, ops: &[Nombre], positive: bool) -> Result<Nombre, EvalError> {
    let [a, b, c] = args::<3>(ops)?;
    let discriminant = b.mul(b)?.sub(&Nombre::from(4).mul(a)?.mul(c)?)?;
    if discriminant.est_negatif() {
        return Err(EvalError::domaine(op, ops, "Aucune solution réelle (discriminant négatif)"));
    }

    let racine = discriminant.racine_carree()?;
    let numerateur = if positive {
        b.neg().add(&racine)?
    } else {
        b.neg().sub(&racine)?
    };
    numerateur.div(&Nombre::from(2).mul(a)?)
}

fn f_quadp(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    quadratique("quadp", ops, true)
}

fn f_quadn(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    quadratique("quadn", ops, false)
}

/* ------------------------ Trigonométrie ------------------------ */

/// Au-delà de 10^1000, la réduction modulo 2π n’a plus de sens pratique.
const TRIG_AJUSTE_MAX: i64 = 1000;

/// |x mod π − π/2| ≤ 10^-15 => pôle de la tangente
/// (les arguments arrivent arrondis à 15 décimales).
const TOLERANCE_TANGENTE_EXP: i64 = -15;

fn argument_trig(op: &'static str, ops: &[Nombre], x: &Nombre) -> Result<(), EvalError> {
    if x.exposant_ajuste() >= TRIG_AJUSTE_MAX {
        return Err(EvalError::domaine(op, ops, "Argument trop grand pour une fonction trigonométrique"));
    }
    Ok(())
}

fn f_sin(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x] = args::<1>(ops)?;
    argument_trig("sin", ops, x)?;
    Ok(transcendantes::sin_cos(x, PRECISION)?.0)
}

fn f_cos(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x] = args::<1>(ops)?;
    argument_trig("cos", ops, x)?;
    Ok(transcendantes::sin_cos(x, PRECISION)?.1)
}

fn f_tan(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x] = args::<1>(ops)?;
    argument_trig("tan", ops, x)?;

    let tolerance = Nombre::depuis_parties(BigInt::one(), TOLERANCE_TANGENTE_EXP);
    let pole = EvalError::domaine("tan", ops, "La tangente est indéfinie pour les multiples impairs de π/2");

    if transcendantes::distance_pole_tangente(x, PRECISION)? <= tolerance {
        return Err(pole);
    }

    let travail = PRECISION + GARDE;
    let (s, c) = transcendantes::sin_cos(x, travail)?;
    if c.est_zero() {
        return Err(pole);
    }
    s.div(&c)
}

fn dans_moins_un_un(x: &Nombre) -> bool {
    x.abs() <= Nombre::un()
}

fn f_arsin(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x] = args::<1>(ops)?;
    if !dans_moins_un_un(x) {
        return Err(EvalError::domaine("arsin", ops, "Doit être compris entre -1 et 1"));
    }
    transcendantes::asin(x, PRECISION)
}

fn f_arcos(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x] = args::<1>(ops)?;
    if !dans_moins_un_un(x) {
        return Err(EvalError::domaine("arcos", ops, "Doit être compris entre -1 et 1"));
    }
    transcendantes::acos(x, PRECISION)
}

fn f_artan(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x] = args::<1>(ops)?;
    transcendantes::atan(x, PRECISION)
}

fn f_sinh(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x] = args::<1>(ops)?;
    transcendantes::sinh(x, PRECISION)
}

fn f_cosh(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x] = args::<1>(ops)?;
    transcendantes::cosh(x, PRECISION)
}

fn f_tanh(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x] = args::<1>(ops)?;
    transcendantes::tanh(x, PRECISION)
}

fn f_arsinh(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x] = args::<1>(ops)?;
    transcendantes::asinh(x, PRECISION)
}

fn f_arcosh(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x] = args::<1>(ops)?;
    if *x < Nombre::un() {
        return Err(EvalError::domaine("arcosh", ops, "Doit être supérieur ou égal à 1"));
    }
    transcendantes::acosh(x, PRECISION)
}

fn f_artanh(ops: &[Nombre]) -> Result<Nombre, EvalError> {
    let [x] = args::<1>(ops)?;
    if x.abs() >= Nombre::un() {
        return Err(EvalError::domaine("artanh", ops, "Doit être strictement compris entre -1 et 1"));
    }
    transcendantes::atanh(x, PRECISION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(s: &str) -> Nombre {
        s.parse().unwrap_or_else(|e| panic!("littéral {s:?} : {e}"))
    }

    fn operateur(symbole: &str) -> &'static Operateur {
        match cherche(symbole) {
            Some(Entree::Operateur(op)) => op,
            autre => panic!("{symbole:?} n’est pas un opérateur : {autre:?}"),
        }
    }

    fn fonction(symbole: &str) -> &'static Fonction {
        match cherche(symbole) {
            Some(Entree::Fonction(f)) => f,
            autre => panic!("{symbole:?} n’est pas une fonction : {autre:?}"),
        }
    }

    fn est_domaine(r: Result<Nombre, EvalError>, operation: &str) {
        match r {
            Err(EvalError::Domaine { operation: o, .. }) => assert_eq!(o, operation),
            autre => panic!("erreur de domaine {operation:?} attendue, obtenu {autre:?}"),
        }
    }

    #[test]
    fn symboles_ambigus() {
        match cherche("-") {
            Some(Entree::Ambigu { unaire, binaire }) => {
                assert_eq!(unaire.arite, Arite::Unaire);
                assert!(unaire.est_prefixe());
                assert_eq!(binaire.precedence, 4);
            }
            autre => panic!("'-' devrait être ambigu : {autre:?}"),
        }
        assert!(!operateur("!").est_prefixe());
        assert!(cherche("sqrt").is_none());
    }

    #[test]
    fn precedences() {
        assert_eq!(operateur("^").associativite, Associativite::Droite);
        assert!(operateur("p").precedence < operateur("^").precedence);
        assert_eq!(operateur("*").precedence, operateur("%").precedence);
    }

    #[test]
    fn constantes_exactes() {
        match cherche("pi") {
            Some(Entree::Constante(v)) => assert_eq!(n(v).to_string(), v),
            autre => panic!("pi : {autre:?}"),
        }
    }

    #[test]
    fn domaines_arithmetiques() {
        est_domaine(operateur("/").execute(&[Nombre::un(), Nombre::zero()]), "/");
        est_domaine(operateur("%").execute(&[Nombre::un(), Nombre::zero()]), "%");
        est_domaine(operateur("^").execute(&[Nombre::zero(), Nombre::zero()]), "^");
        est_domaine(operateur("¬").execute(&[n("2.5"), Nombre::from(8)]), "¬");
        est_domaine(operateur("!").execute(&[Nombre::from(-1)]), "!");
        est_domaine(operateur("c").execute(&[Nombre::from(3), Nombre::from(5)]), "c");
    }

    #[test]
    fn combinatoire() {
        assert_eq!(operateur("!").execute(&[Nombre::from(5)]).unwrap(), Nombre::from(120));
        assert_eq!(operateur("!").execute(&[Nombre::zero()]).unwrap(), Nombre::un());
        assert_eq!(
            operateur("p").execute(&[Nombre::from(5), Nombre::from(2)]).unwrap(),
            Nombre::from(20)
        );
        assert_eq!(
            operateur("c").execute(&[Nombre::from(5), Nombre::from(2)]).unwrap(),
            Nombre::from(10)
        );
        assert_eq!(
            operateur("!").execute(&[n("1~9")]),
            Err(EvalError::Depassement)
        );
    }

    #[test]
    fn racines() {
        let r = operateur("¬").execute(&[Nombre::from(3), Nombre::from(27)]).unwrap();
        assert_eq!(r.arrondi_decimales(20), Nombre::from(3));
    }

    #[test]
    fn ppcm_pgcd() {
        let ppcm = fonction("lcm");
        let pgcd = fonction("hcf");
        assert_eq!((ppcm.operation)(&[Nombre::from(4), Nombre::from(6)]).unwrap(), Nombre::from(12));
        assert_eq!((pgcd.operation)(&[Nombre::from(12), Nombre::from(18)]).unwrap(), Nombre::from(6));
        assert_eq!((pgcd.operation)(&[Nombre::from(7), Nombre::from(9)]).unwrap(), Nombre::un());
        est_domaine((ppcm.operation)(&[n("1.5"), Nombre::from(2)]), "lcm");
        est_domaine((pgcd.operation)(&[Nombre::zero(), Nombre::from(2)]), "hcf");
    }

    #[test]
    fn alea_inclusif_et_bornes_echangees() {
        let alea = fonction("rand");
        for _ in 0..50 {
            let v = (alea.operation)(&[Nombre::from(3), Nombre::from(1)]).unwrap();
            assert!(v >= Nombre::un() && v <= Nombre::from(3), "{v}");
        }
        est_domaine((alea.operation)(&[n("0.5"), Nombre::from(3)]), "rand");
    }

    #[test]
    fn quadratiques() {
        // x² − 3x + 2 = 0 -> 2 et 1
        let ops = [Nombre::un(), Nombre::from(-3), Nombre::from(2)];
        assert_eq!((fonction("quadp").operation)(&ops).unwrap(), Nombre::from(2));
        assert_eq!((fonction("quadn").operation)(&ops).unwrap(), Nombre::un());
        est_domaine(
            (fonction("quadp").operation)(&[Nombre::un(), Nombre::zero(), Nombre::un()]),
            "quadp",
        );
    }

    #[test]
    fn domaines_transcendants() {
        est_domaine((fonction("ln").operation)(&[Nombre::zero()]), "ln");
        est_domaine((fonction("log").operation)(&[Nombre::zero(), Nombre::from(10)]), "log");
        est_domaine((fonction("log").operation)(&[Nombre::from(5), Nombre::un()]), "log");
        est_domaine((fonction("arsin").operation)(&[n("1.5")]), "arsin");
        est_domaine((fonction("arcos").operation)(&[n("-1.01")]), "arcos");
        est_domaine((fonction("arcosh").operation)(&[n("0.5")]), "arcosh");
        est_domaine((fonction("artanh").operation)(&[Nombre::un()]), "artanh");
        est_domaine((fonction("tan").operation)(&[n("1.570796326794897")]), "tan");
        est_domaine((fonction("sin").operation)(&[n("1~1000")]), "sin");
    }

    #[test]
    fn log_en_base() {
        let r = (fonction("log").operation)(&[Nombre::from(1000), Nombre::from(10)]).unwrap();
        assert_eq!(r.arrondi_decimales(20), Nombre::from(3));
    }

    #[test]
    fn aide_complete() {
        let aide = instructions();
        for (symbole, _) in ENTREES {
            assert!(aide.contains(symbole), "{symbole:?} absent de l’aide");
        }
    }
}
