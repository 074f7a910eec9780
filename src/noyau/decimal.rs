// src/noyau/decimal.rs
//
// Décimal exact (sans flottants)
// ------------------------------
// Nombre = coeff × 10^exp, coeff : BigInt.
// - Forme normalisée : coeff sans zéro final (zéro = 0 × 10^0)
//   => l’égalité structurelle est l’égalité des valeurs.
// - Contexte : PRECISION chiffres significatifs, arrondi au pair (half-even).
// - Dépassement (exposant ajusté > EMAX) = erreur ; sous-dépassement = 0.
// - Littéraux et constantes : gardés exactement tels qu’écrits.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::erreurs::{EvalError, LexError};
use super::transcendantes;

/// Chiffres significatifs du contexte.
pub const PRECISION: u32 = 28;

/// Chiffres de garde pour les calculs intermédiaires (puissances, transcendantes).
pub const GARDE: u32 = 12;

pub const EMAX: i64 = 999_999;
pub const EMIN: i64 = -999_999;

/// Marqueur de notation scientifique, en entrée comme en sortie : 1~3 = 1000.
pub const MARQUEUR_EXPOSANT: char = '~';

/// Au-delà, un exposant entier ne tient plus dans l’exponentiation rapide.
const AJUSTE_EXPOSANT_ENTIER_MAX: i64 = 18;

/* ------------------------ Helpers BigInt ------------------------ */

pub(crate) fn pow10(n: u32) -> BigInt {
    BigInt::from(10).pow(n)
}

/// 10^n pour un écart d’exposants : négatif ou hors u32 = dépassement.
pub(crate) fn pow10_borne(n: i64) -> Result<BigInt, EvalError> {
    u32::try_from(n)
        .map(pow10)
        .map_err(|_| EvalError::Depassement)
}

pub(crate) fn nb_chiffres(c: &BigInt) -> i64 {
    if c.is_zero() {
        1
    } else {
        c.magnitude().to_str_radix(10).len() as i64
    }
}

/// n / d arrondi au pair (d > 0).
pub(crate) fn divise_arrondi(n: &BigInt, d: &BigInt) -> BigInt {
    let q = n / d;
    let r = n - &q * d;
    let double = r.abs() * 2u32;

    match double.cmp(d) {
        Ordering::Less => q,
        Ordering::Greater => q + n.signum(),
        Ordering::Equal => {
            if (&q % 2u32).is_zero() {
                q
            } else {
                q + n.signum()
            }
        }
    }
}

/* ------------------------ Nombre ------------------------ */

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Nombre {
    coeff: BigInt,
    exp: i64,
}

impl Nombre {
    fn normalise(coeff: BigInt, exp: i64) -> Nombre {
        if coeff.is_zero() {
            return Nombre { coeff, exp: 0 };
        }

        let chiffres = coeff.magnitude().to_str_radix(10);
        let zeros = chiffres.len() - chiffres.trim_end_matches('0').len();
        if zeros == 0 {
            return Nombre { coeff, exp };
        }

        let Ok(retire) = u32::try_from(zeros) else {
            return Nombre { coeff, exp };
        };
        Nombre {
            coeff: coeff / pow10(retire),
            exp: exp + zeros as i64,
        }
    }

    /// Arrondit coeff × 10^exp à `prec` chiffres significatifs.
    pub(crate) fn arrondi(coeff: BigInt, exp: i64, prec: u32) -> Result<Nombre, EvalError> {
        let chiffres = nb_chiffres(&coeff);
        let (coeff, exp) = if chiffres > prec as i64 {
            let retire = chiffres - prec as i64;
            (divise_arrondi(&coeff, &pow10_borne(retire)?), exp + retire)
        } else {
            (coeff, exp)
        };

        let n = Nombre::normalise(coeff, exp);
        if n.est_zero() {
            return Ok(n);
        }

        let ajuste = n.exposant_ajuste();
        if ajuste > EMAX {
            return Err(EvalError::Depassement);
        }
        if ajuste < EMIN - (prec as i64 - 1) {
            return Ok(Nombre::zero());
        }
        Ok(n)
    }

    pub(crate) fn depuis_parties(coeff: BigInt, exp: i64) -> Nombre {
        Nombre::normalise(coeff, exp)
    }

    pub(crate) fn parties(&self) -> (&BigInt, i64) {
        (&self.coeff, self.exp)
    }

    pub fn zero() -> Nombre {
        Nombre {
            coeff: BigInt::zero(),
            exp: 0,
        }
    }

    pub fn un() -> Nombre {
        Nombre {
            coeff: BigInt::one(),
            exp: 0,
        }
    }

    /// Arrondi au contexte d’un nombre existant.
    pub fn arrondi_a(&self, prec: u32) -> Result<Nombre, EvalError> {
        Nombre::arrondi(self.coeff.clone(), self.exp, prec)
    }

    /* ------------------------ Observateurs ------------------------ */

    pub fn est_zero(&self) -> bool {
        self.coeff.is_zero()
    }

    pub fn est_negatif(&self) -> bool {
        self.coeff.is_negative()
    }

    /// Strictement positif.
    pub fn est_positif(&self) -> bool {
        self.coeff.is_positive()
    }

    pub fn est_entier(&self) -> bool {
        self.exp >= 0
    }

    /// Exposant de la notation d.ddd × 10^n.
    pub fn exposant_ajuste(&self) -> i64 {
        self.exp + nb_chiffres(&self.coeff) - 1
    }

    pub fn en_entier(&self) -> Option<BigInt> {
        if self.exp < 0 {
            return None;
        }
        Some(&self.coeff * pow10_borne(self.exp).ok()?)
    }

    pub(crate) fn vers_rationnel(&self) -> Option<BigRational> {
        Some(if self.exp >= 0 {
            BigRational::from_integer(&self.coeff * pow10_borne(self.exp).ok()?)
        } else {
            BigRational::new(self.coeff.clone(), pow10_borne(-self.exp).ok()?)
        })
    }

    /// Conversion binaire (affichage seulement) : None si non fini.
    pub fn vers_f64(&self) -> Option<f64> {
        let ajuste = self.exposant_ajuste();
        if ajuste > 308 {
            return None;
        }
        if ajuste < -400 {
            return Some(0.0);
        }
        self.vers_rationnel()?.to_f64().filter(|f| f.is_finite())
    }

    /// × 10^k, exact.
    pub fn decale(&self, k: i64) -> Nombre {
        if self.est_zero() {
            return Nombre::zero();
        }
        Nombre {
            coeff: self.coeff.clone(),
            exp: self.exp + k,
        }
    }

    /// Arrondi au pair à `decimales` chiffres après la virgule (quantification).
    pub fn arrondi_decimales(&self, decimales: u32) -> Nombre {
        let cible = -(decimales as i64);
        if self.exp >= cible {
            return self.clone();
        }

        let retire = cible - self.exp;
        if retire > nb_chiffres(&self.coeff) + 1 {
            return Nombre::zero();
        }

        // hors u32 : plus de chiffres retirés que le coefficient n’en a
        let Ok(retire) = u32::try_from(retire) else {
            return Nombre::zero();
        };
        Nombre::normalise(divise_arrondi(&self.coeff, &pow10(retire)), cible)
    }

    /* ------------------------ Arithmétique (contexte) ------------------------ */

    pub fn neg(&self) -> Nombre {
        Nombre {
            coeff: -&self.coeff,
            exp: self.exp,
        }
    }

    pub fn abs(&self) -> Nombre {
        Nombre {
            coeff: self.coeff.abs(),
            exp: self.exp,
        }
    }

    pub fn add(&self, o: &Nombre) -> Result<Nombre, EvalError> {
        self.add_p(o, PRECISION)
    }

    pub fn sub(&self, o: &Nombre) -> Result<Nombre, EvalError> {
        self.add_p(&o.neg(), PRECISION)
    }

    pub fn mul(&self, o: &Nombre) -> Result<Nombre, EvalError> {
        self.mul_p(o, PRECISION)
    }

    pub fn div(&self, o: &Nombre) -> Result<Nombre, EvalError> {
        self.div_p(o, PRECISION)
    }

    pub fn puissance(&self, o: &Nombre) -> Result<Nombre, EvalError> {
        self.puissance_p(o, PRECISION)
    }

    pub fn racine_carree(&self) -> Result<Nombre, EvalError> {
        self.racine_carree_p(PRECISION)
    }

    pub(crate) fn add_p(&self, o: &Nombre, prec: u32) -> Result<Nombre, EvalError> {
        if self.est_zero() {
            return o.arrondi_a(prec);
        }
        if o.est_zero() {
            return self.arrondi_a(prec);
        }

        let (grand, petit) = if self.exposant_ajuste() >= o.exposant_ajuste() {
            (self, o)
        } else {
            (o, self)
        };
        let petit = absorbe(grand, petit, prec).unwrap_or_else(|| petit.clone());

        let e = grand.exp.min(petit.exp);
        let c = &grand.coeff * pow10_borne(grand.exp - e)?
            + &petit.coeff * pow10_borne(petit.exp - e)?;
        Nombre::arrondi(c, e, prec)
    }

    pub(crate) fn sub_p(&self, o: &Nombre, prec: u32) -> Result<Nombre, EvalError> {
        self.add_p(&o.neg(), prec)
    }

    pub(crate) fn mul_p(&self, o: &Nombre, prec: u32) -> Result<Nombre, EvalError> {
        Nombre::arrondi(&self.coeff * &o.coeff, self.exp + o.exp, prec)
    }

    pub(crate) fn div_p(&self, o: &Nombre, prec: u32) -> Result<Nombre, EvalError> {
        if o.est_zero() {
            return Err(EvalError::DivisionParZero);
        }
        if self.est_zero() {
            return Ok(Nombre::zero());
        }

        // quotient entier d’au moins prec+1 chiffres, puis chiffre “collant” si reste
        let da = nb_chiffres(&self.coeff);
        let db = nb_chiffres(&o.coeff);
        let decalage = (prec as i64 + 1 + db - da).max(0);

        let num = self.coeff.abs() * pow10_borne(decalage)?;
        let den = o.coeff.abs();
        let mut q = &num / &den;
        let reste = num - &q * &den;
        let mut exp = self.exp - o.exp - decalage;

        if !reste.is_zero() {
            q = q * 10u32 + 1u32;
            exp -= 1;
        }
        if self.est_negatif() != o.est_negatif() {
            q = -q;
        }
        Nombre::arrondi(q, exp, prec)
    }

    /// Quotient entier tronqué vers zéro (x \ y).
    pub fn div_entiere(&self, o: &Nombre) -> Result<Nombre, EvalError> {
        let q = self.quotient_tronque(o)?;
        Nombre::arrondi(q, 0, PRECISION)
    }

    /// Reste du signe du dividende : x − y × (x \ y).
    pub fn reste(&self, o: &Nombre) -> Result<Nombre, EvalError> {
        let q = self.quotient_tronque(o)?;
        if q.is_zero() {
            return self.arrondi_a(PRECISION);
        }

        let e = self.exp.min(o.exp);
        let x = &self.coeff * pow10_borne(self.exp - e)?;
        let y = &o.coeff * pow10_borne(o.exp - e)?;
        Nombre::arrondi(x - y * q, e, PRECISION)
    }

    fn quotient_tronque(&self, o: &Nombre) -> Result<BigInt, EvalError> {
        if o.est_zero() {
            return Err(EvalError::DivisionParZero);
        }
        if self.est_zero() || self.exposant_ajuste() < o.exposant_ajuste() {
            return Ok(BigInt::zero());
        }
        // quotient entier hors contexte : division impossible
        if self.exposant_ajuste() - o.exposant_ajuste() > PRECISION as i64 {
            return Err(EvalError::OperationInvalide);
        }

        let e = self.exp.min(o.exp);
        let x = &self.coeff * pow10_borne(self.exp - e)?;
        let y = &o.coeff * pow10_borne(o.exp - e)?;
        let q = x / y;

        if nb_chiffres(&q) > PRECISION as i64 {
            return Err(EvalError::OperationInvalide);
        }
        Ok(q)
    }

    pub(crate) fn puissance_p(&self, y: &Nombre, prec: u32) -> Result<Nombre, EvalError> {
        if y.est_zero() {
            if self.est_zero() {
                return Err(EvalError::OperationInvalide);
            }
            return Ok(Nombre::un());
        }
        if self.est_zero() {
            // 0^négatif = infini
            return if y.est_negatif() {
                Err(EvalError::Depassement)
            } else {
                Ok(Nombre::zero())
            };
        }

        if y.est_entier() {
            return self.puissance_entiere(y, prec);
        }

        if self.est_negatif() {
            return Err(EvalError::OperationInvalide);
        }
        if *self == Nombre::un() {
            return Ok(Nombre::un());
        }

        // x^y = exp(y·ln x)
        let travail = prec + GARDE;
        let l = transcendantes::ln(self, travail)?;
        let p = l.mul_p(y, travail)?;
        transcendantes::exp(&p, travail)?.arrondi_a(prec)
    }

    fn puissance_entiere(&self, y: &Nombre, prec: u32) -> Result<Nombre, EvalError> {
        let un = Nombre::un();
        let module = self.abs().cmp(&un);

        // exposant gigantesque : seul |x| = 1 reste fini et non nul
        if y.exposant_ajuste() > AJUSTE_EXPOSANT_ENTIER_MAX {
            let pair = y.exp > 0 || (&y.coeff % 2u32).is_zero();
            return match (module, y.est_negatif()) {
                (Ordering::Equal, _) if self.est_negatif() && !pair => Ok(un.neg()),
                (Ordering::Equal, _) => Ok(un),
                (Ordering::Greater, false) | (Ordering::Less, true) => Err(EvalError::Depassement),
                _ => Ok(Nombre::zero()),
            };
        }

        let travail = prec + GARDE;
        let mut base = if y.est_negatif() {
            un.div_p(self, travail)?
        } else {
            self.clone()
        };
        let mut e = match y.en_entier() {
            Some(e) => e.abs(),
            None => return Err(EvalError::OperationInvalide),
        };

        // exponentiation rapide
        let mut acc = un;
        while !e.is_zero() {
            if (&e % 2u32).is_one() {
                acc = acc.mul_p(&base, travail)?;
            }
            e >>= 1;
            if !e.is_zero() {
                base = base.mul_p(&base, travail)?;
            }
        }

        acc.arrondi_a(prec)
    }

    pub(crate) fn racine_carree_p(&self, prec: u32) -> Result<Nombre, EvalError> {
        if self.est_negatif() {
            return Err(EvalError::OperationInvalide);
        }
        if self.est_zero() {
            return Ok(Nombre::zero());
        }

        // coeff × 10^s avec (exp − s) pair et assez de chiffres pour prec+2 chiffres de racine
        let d = nb_chiffres(&self.coeff);
        let mut s = (2 * (prec as i64 + 2) - d).max(0);
        if (self.exp - s) % 2 != 0 {
            s += 1;
        }

        let n = &self.coeff * pow10_borne(s)?;
        let mut r = n.sqrt();
        let mut exp = (self.exp - s) / 2;

        if &r * &r != n {
            r = r * 10u32 + 1u32;
            exp -= 1;
        }
        Nombre::arrondi(r, exp, prec)
    }
}

/// Si `petit` est entièrement sous la position d’arrondi de `grand`,
/// le remplace par un témoin de même signe qui donne le même arrondi.
fn absorbe(grand: &Nombre, petit: &Nombre, prec: u32) -> Option<Nombre> {
    let p = grand
        .exp
        .min(grand.exposant_ajuste() - prec as i64 - 1);

    if petit.exposant_ajuste() < p - 1 {
        Some(Nombre {
            coeff: petit.coeff.signum(),
            exp: p - 2,
        })
    } else {
        None
    }
}

/* ------------------------ Conversions ------------------------ */

impl From<i64> for Nombre {
    fn from(v: i64) -> Self {
        Nombre::normalise(BigInt::from(v), 0)
    }
}

impl From<BigInt> for Nombre {
    fn from(v: BigInt) -> Self {
        Nombre::normalise(v, 0)
    }
}

/// Littéral : -?(\d*\.)?\d+(~[+-]?\d+)? , valeur exacte (aucun arrondi).
impl FromStr for Nombre {
    type Err = LexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalide = || LexError::NombreInvalide(s.to_string());
        let tous_chiffres = |t: &str| t.bytes().all(|b| b.is_ascii_digit());

        let (negatif, reste) = match s.strip_prefix('-') {
            Some(r) => (true, r),
            None => (false, s),
        };

        let (mantisse, exposant) = match reste.split_once(MARQUEUR_EXPOSANT) {
            Some((m, e)) => (m, Some(e)),
            None => (reste, None),
        };

        let (entiere, fraction) = match mantisse.split_once('.') {
            Some((i, f)) if !f.is_empty() => (i, f),
            Some(_) => return Err(invalide()),
            None if !mantisse.is_empty() => (mantisse, ""),
            None => return Err(invalide()),
        };
        if !tous_chiffres(entiere) || !tous_chiffres(fraction) {
            return Err(invalide());
        }

        let exposant: i64 = match exposant {
            None => 0,
            Some(e) => {
                let chiffres = e.strip_prefix(['+', '-']).unwrap_or(e);
                if chiffres.is_empty() || !tous_chiffres(chiffres) {
                    return Err(invalide());
                }
                let v: i64 = e.trim_start_matches('+').parse().map_err(|_| invalide())?;
                // au-delà, aucune opération ne peut rester dans le contexte
                if v.abs() > 1_000_000_000_000 {
                    return Err(invalide());
                }
                v
            }
        };

        let texte = format!("{entiere}{fraction}");
        let coeff = BigInt::parse_bytes(texte.as_bytes(), 10).ok_or_else(invalide)?;
        let coeff = if negatif { -coeff } else { coeff };

        Ok(Nombre::normalise(coeff, exposant - fraction.len() as i64))
    }
}

impl Ord for Nombre {
    fn cmp(&self, o: &Self) -> Ordering {
        let (sa, sb) = (self.coeff.sign(), o.coeff.sign());
        if sa != sb {
            return sa.cmp(&sb);
        }
        if sa == Sign::NoSign {
            return Ordering::Equal;
        }

        let modules = match self.exposant_ajuste().cmp(&o.exposant_ajuste()) {
            // même exposant ajusté : l’ordre des chiffres significatifs décide
            Ordering::Equal => {
                let a = self.coeff.magnitude().to_str_radix(10);
                let b = o.coeff.magnitude().to_str_radix(10);
                a.trim_end_matches('0').cmp(b.trim_end_matches('0'))
            }
            autre => autre,
        };

        if sa == Sign::Minus {
            modules.reverse()
        } else {
            modules
        }
    }
}

impl PartialOrd for Nombre {
    fn partial_cmp(&self, o: &Self) -> Option<Ordering> {
        Some(self.cmp(o))
    }
}

/// Forme exacte (messages d’erreur, journal) ; relisible par `from_str`.
impl fmt::Display for Nombre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chiffres = self.coeff.magnitude().to_str_radix(10);
        let signe = if self.est_negatif() { "-" } else { "" };
        let ajuste = self.exposant_ajuste();

        if self.exp >= 0 && ajuste < PRECISION as i64 {
            return write!(f, "{signe}{chiffres}{}", "0".repeat(self.exp as usize));
        }

        if self.exp < 0 && ajuste >= -6 {
            let point = chiffres.len() as i64 + self.exp;
            return if point > 0 {
                let (ent, frac) = chiffres.split_at(point as usize);
                write!(f, "{signe}{ent}.{frac}")
            } else {
                write!(f, "{signe}0.{}{chiffres}", "0".repeat((-point) as usize))
            };
        }

        let (tete, queue) = chiffres.split_at(1);
        if queue.is_empty() {
            write!(f, "{signe}{tete}{MARQUEUR_EXPOSANT}{ajuste}")
        } else {
            write!(f, "{signe}{tete}.{queue}{MARQUEUR_EXPOSANT}{ajuste}")
        }
    }
}
