// src/noyau/transcendantes.rs
//
// Fonctions transcendantes en virgule fixe (BigInt × 10^-w)
// ---------------------------------------------------------
// - π : Machin, atan(1/q) par série (entiers “scalés”).
// - ln : réduction m·2^j·10^k, puis 2·atanh((y−1)/(y+1)).
// - exp : x = k·ln10 + r, série de Taylor sur r/2^10, puis 10 carrés.
// - sin/cos : réduction modulo 2π avec π calculé à la taille de l’argument.
// - atan : trois demi-angles puis série.
// - Le reste (asin, sinh, artanh, …) se compose à partir de ces briques,
//   avec GARDE chiffres de marge avant l’arrondi final.
//
// Aucun cache : tout est recalculé à la précision demandée.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use super::decimal::{nb_chiffres, pow10, pow10_borne, Nombre, GARDE};
use super::erreurs::EvalError;

/// exp(x) déborde (ou s’annule) au-delà de cette borne.
const EXP_BORNE: i64 = 2_400_000;

/// Nombre de moitiés prises avant la série de exp.
const DEMIS: u32 = 10;

/// tanh(x) = ±1 au contexte dès |x| > 40.
const TANH_SATURATION: i64 = 40;

/* ------------------------ Virgule fixe ------------------------ */

fn vers_fixe(x: &Nombre, w: u32) -> Result<BigInt, EvalError> {
    let (c, e) = x.parties();
    let s = e + w as i64;
    Ok(if s >= 0 {
        c * pow10_borne(s)?
    } else if -s > nb_chiffres(c) {
        BigInt::zero()
    } else {
        c / pow10_borne(-s)?
    })
}

fn depuis_fixe(v: BigInt, w: u32, prec: u32) -> Result<Nombre, EvalError> {
    Nombre::arrondi(v, -(w as i64), prec)
}

/// atan(1/q) en entier scalé (troncature) :
/// atan(z) = z - z^3/3 + z^5/5 - ...
fn arctan_inv_fixe(q: u32, echelle: &BigInt) -> BigInt {
    let q = BigInt::from(q);

    let mut k: u32 = 0;
    let mut positif = true;

    // q^(2k+1)
    let mut q_puissance = q.clone();
    let mut somme = BigInt::zero();

    loop {
        let d = &q_puissance * (2 * k + 1);
        let terme = echelle / &d;
        if terme.is_zero() {
            break;
        }

        if positif {
            somme += &terme;
        } else {
            somme -= &terme;
        }

        q_puissance *= &q;
        q_puissance *= &q;

        positif = !positif;
        k += 1;
    }

    somme
}

/// π × 10^w (Machin) : π = 16 atan(1/5) − 4 atan(1/239)
fn pi_fixe(w: u32) -> BigInt {
    let marge = 10;
    let echelle = pow10(w + marge);

    let a = arctan_inv_fixe(5, &echelle);
    let b = arctan_inv_fixe(239, &echelle);

    (a * 16u32 - b * 4u32) / pow10(marge)
}

/// Σ z^(2k+1)/(2k+1), |z| petit.
fn atanh_fixe(z: &BigInt, s: &BigInt) -> BigInt {
    let z2 = z * z / s;
    let mut puissance = z.clone();
    let mut somme = z.clone();
    let mut k: u32 = 1;

    loop {
        puissance = &puissance * &z2 / s;
        k += 2;
        let terme = &puissance / k;
        if terme.is_zero() {
            break;
        }
        somme += terme;
    }
    somme
}

/// ln(y) pour y ∈ [0.5, 2] (scalé).
fn ln_fixe(y: &BigInt, s: &BigInt) -> BigInt {
    let z = (y - s) * s / (y + s);
    atanh_fixe(&z, s) * 2u32
}

fn ln2_fixe(s: &BigInt) -> BigInt {
    ln_fixe(&(s * 2u32), s)
}

/// ln 10 = 3 ln 2 + ln(5/4)
fn ln10_fixe(s: &BigInt) -> BigInt {
    ln2_fixe(s) * 3u32 + ln_fixe(&(s * 5u32 / 4u32), s)
}

fn exp_fixe(r: &BigInt, s: &BigInt) -> BigInt {
    let x = r / (1u32 << DEMIS);

    let mut terme = s.clone();
    let mut somme = s.clone();
    let mut k: u32 = 1;
    loop {
        terme = &terme * &x / s / k;
        if terme.is_zero() {
            break;
        }
        somme += &terme;
        k += 1;
    }

    for _ in 0..DEMIS {
        somme = &somme * &somme / s;
    }
    somme
}

/// (sin r, cos r), r réduit dans [−π, π].
fn sin_cos_fixe(r: &BigInt, s: &BigInt) -> (BigInt, BigInt) {
    // terme n = r^n / n!
    let mut terme = s.clone();
    let mut sin = BigInt::zero();
    let mut cos = s.clone();
    let mut n: u32 = 1;

    loop {
        terme = &terme * r / s / n;
        if terme.is_zero() {
            break;
        }
        match n % 4 {
            1 => sin += &terme,
            2 => cos -= &terme,
            3 => sin -= &terme,
            _ => cos += &terme,
        }
        n += 1;
    }
    (sin, cos)
}

/// atan(z), |z| ≤ 1 (scalé).
fn atan_fixe(z: &BigInt, s: &BigInt) -> BigInt {
    // demi-angle : atan z = 2 atan(z / (1 + √(1+z²)))
    let mut z = z.clone();
    for _ in 0..3 {
        let z2 = &z * &z / s;
        let rad = ((s + z2) * s).sqrt();
        z = &z * s / (s + rad);
    }

    let z2 = &z * &z / s;
    let mut puissance = z.clone();
    let mut somme = z.clone();
    let mut k: u32 = 1;
    let mut positif = false;

    loop {
        puissance = &puissance * &z2 / s;
        k += 2;
        let terme = &puissance / k;
        if terme.is_zero() {
            break;
        }
        if positif {
            somme += terme;
        } else {
            somme -= terme;
        }
        positif = !positif;
    }

    somme * 8u32
}

/* ------------------------ Briques (Nombre) ------------------------ */

pub(crate) fn pi(prec: u32) -> Result<Nombre, EvalError> {
    let w = prec + GARDE;
    depuis_fixe(pi_fixe(w), w, prec)
}

pub(crate) fn ln(x: &Nombre, prec: u32) -> Result<Nombre, EvalError> {
    if !x.est_positif() {
        return Err(EvalError::OperationInvalide);
    }

    // x = m × 10^k, m ∈ [1, 10)
    let (c, e) = x.parties();
    let d = nb_chiffres(c);
    let k = e + d - 1;

    let w = prec + GARDE + nb_chiffres(&BigInt::from(k)) as u32;
    let s = pow10(w);

    let decale = w as i64 - (d - 1);
    let mut m = if decale >= 0 {
        c * pow10_borne(decale)?
    } else {
        c / pow10_borne(-decale)?
    };

    // m ∈ (0.75, 1.5]
    let seuil = &s * 3u32 / 2u32;
    let mut j: u32 = 0;
    while m > seuil {
        m /= 2u32;
        j += 1;
    }

    let mut l = ln_fixe(&m, &s);
    if j > 0 {
        l += ln2_fixe(&s) * j;
    }
    if k != 0 {
        l += ln10_fixe(&s) * k;
    }
    depuis_fixe(l, w, prec)
}

pub(crate) fn exp(x: &Nombre, prec: u32) -> Result<Nombre, EvalError> {
    if x.est_zero() {
        return Ok(Nombre::un());
    }

    let borne = Nombre::from(EXP_BORNE);
    if *x > borne {
        return Err(EvalError::Depassement);
    }
    if *x < borne.neg() {
        return Ok(Nombre::zero());
    }

    let w = prec + GARDE + 8;
    let s = pow10(w);
    let xf = vers_fixe(x, w)?;
    let l10 = ln10_fixe(&s);

    // k = ⌊x / ln10⌋, r ∈ [0, ln10)
    let mut k = &xf / &l10;
    if (&xf - &k * &l10).is_negative() {
        k -= 1;
    }
    let r = &xf - &k * &l10;

    let v = exp_fixe(&r, &s);
    let k = k.to_i64().ok_or(EvalError::Depassement)?;
    Nombre::arrondi(v, k - w as i64, prec)
}

/// (sin x, cos x). L’appelant borne la magnitude de x.
pub(crate) fn sin_cos(x: &Nombre, prec: u32) -> Result<(Nombre, Nombre), EvalError> {
    if x.est_zero() {
        return Ok((Nombre::zero(), Nombre::un()));
    }

    let w = prec + GARDE;
    let extra = x.exposant_ajuste().max(0) as u32 + 1;
    let wx = w + extra;

    let xf = vers_fixe(x, wx)?;
    let pi = pi_fixe(wx);
    let deux_pi = &pi * 2u32;

    let mut r = xf % &deux_pi;
    if r > pi {
        r -= &deux_pi;
    } else if r < -&pi {
        r += &deux_pi;
    }
    let r = r / pow10(extra);

    let (sin, cos) = sin_cos_fixe(&r, &pow10(w));
    Ok((depuis_fixe(sin, w, prec)?, depuis_fixe(cos, w, prec)?))
}

/// | (|x| mod π) − π/2 | : distance au pôle le plus proche de la tangente.
pub(crate) fn distance_pole_tangente(x: &Nombre, prec: u32) -> Result<Nombre, EvalError> {
    let w = prec + GARDE;
    let extra = x.exposant_ajuste().max(0) as u32 + 1;
    let wx = w + extra;

    let pi = pi_fixe(wx);
    let r = vers_fixe(&x.abs(), wx)? % &pi;
    let d = (r - &pi / 2u32).abs();

    depuis_fixe(d / pow10(extra), w, prec)
}

pub(crate) fn atan(x: &Nombre, prec: u32) -> Result<Nombre, EvalError> {
    if x.est_zero() {
        return Ok(Nombre::zero());
    }

    let w = prec + GARDE;
    let s = pow10(w);
    let un = Nombre::un();
    let module = x.abs();

    let a = if module > un {
        // atan x = π/2 − atan(1/x)
        let demi_pi = pi_fixe(w) / 2u32;
        if x.exposant_ajuste() > w as i64 {
            demi_pi
        } else {
            let inverse = un.div_p(&module, w)?;
            demi_pi - atan_fixe(&vers_fixe(&inverse, w)?, &s)
        }
    } else {
        atan_fixe(&vers_fixe(&module, w)?, &s)
    };

    let a = if x.est_negatif() { -a } else { a };
    depuis_fixe(a, w, prec)
}

/* ------------------------ Compositions ------------------------ */

/// |x| ≤ 1
pub(crate) fn asin(x: &Nombre, prec: u32) -> Result<Nombre, EvalError> {
    let w = prec + GARDE;
    let un = Nombre::un();

    if x.abs() == un {
        let demi_pi = pi(w)?.div_p(&Nombre::from(2), w)?;
        let r = if x.est_negatif() { demi_pi.neg() } else { demi_pi };
        return r.arrondi_a(prec);
    }

    // asin x = atan(x / √(1 − x²))
    let racine = un.sub_p(&x.mul_p(x, w)?, w)?.racine_carree_p(w)?;
    atan(&x.div_p(&racine, w)?, prec)
}

/// |x| ≤ 1
pub(crate) fn acos(x: &Nombre, prec: u32) -> Result<Nombre, EvalError> {
    let w = prec + GARDE;
    let demi_pi = pi(w)?.div_p(&Nombre::from(2), w)?;
    demi_pi.sub_p(&asin(x, w)?, w)?.arrondi_a(prec)
}

pub(crate) fn sinh(x: &Nombre, prec: u32) -> Result<Nombre, EvalError> {
    let w = prec + GARDE;
    let ex = exp(&x.abs(), w)?;
    let emx = Nombre::un().div_p(&ex, w)?;
    let r = ex.sub_p(&emx, w)?.div_p(&Nombre::from(2), w)?;

    let r = if x.est_negatif() { r.neg() } else { r };
    r.arrondi_a(prec)
}

pub(crate) fn cosh(x: &Nombre, prec: u32) -> Result<Nombre, EvalError> {
    let w = prec + GARDE;
    let ex = exp(&x.abs(), w)?;
    let emx = Nombre::un().div_p(&ex, w)?;
    ex.add_p(&emx, w)?.div_p(&Nombre::from(2), w)?.arrondi_a(prec)
}

pub(crate) fn tanh(x: &Nombre, prec: u32) -> Result<Nombre, EvalError> {
    let un = Nombre::un();
    let r = if x.abs() > Nombre::from(TANH_SATURATION) {
        un
    } else {
        // (e^2|x| − 1) / (e^2|x| + 1)
        let w = prec + GARDE;
        let e2 = exp(&x.abs().mul_p(&Nombre::from(2), w)?, w)?;
        e2.sub_p(&un, w)?.div_p(&e2.add_p(&un, w)?, w)?
    };

    let r = if x.est_negatif() { r.neg() } else { r };
    r.arrondi_a(prec)
}

pub(crate) fn asinh(x: &Nombre, prec: u32) -> Result<Nombre, EvalError> {
    if x.est_zero() {
        return Ok(Nombre::zero());
    }

    let w = prec + GARDE;
    let a = x.abs();
    let r = if a.exposant_ajuste() > w as i64 {
        // √(a²+1) ≈ a
        ln(&a.mul_p(&Nombre::from(2), w)?, w)?
    } else {
        let racine = a.mul_p(&a, w)?.add_p(&Nombre::un(), w)?.racine_carree_p(w)?;
        ln(&a.add_p(&racine, w)?, w)?
    };

    let r = if x.est_negatif() { r.neg() } else { r };
    r.arrondi_a(prec)
}

/// x ≥ 1
pub(crate) fn acosh(x: &Nombre, prec: u32) -> Result<Nombre, EvalError> {
    let w = prec + GARDE;
    if x.exposant_ajuste() > w as i64 {
        return ln(&x.mul_p(&Nombre::from(2), w)?, w)?.arrondi_a(prec);
    }

    let racine = x.mul_p(x, w)?.sub_p(&Nombre::un(), w)?.racine_carree_p(w)?;
    ln(&x.add_p(&racine, w)?, w)?.arrondi_a(prec)
}

/// |x| < 1 : ½ ln((1+x)/(1−x))
pub(crate) fn atanh(x: &Nombre, prec: u32) -> Result<Nombre, EvalError> {
    let w = prec + GARDE;
    let un = Nombre::un();
    let q = un.add_p(x, w)?.div_p(&un.sub_p(x, w)?, w)?;
    ln(&q, w)?.div_p(&Nombre::from(2), w)?.arrondi_a(prec)
}
