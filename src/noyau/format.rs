// src/noyau/format.rs
//
// Affichage canonique du résultat
// -------------------------------
// - non fini en binaire (> f64::MAX) : erreur "trop grand pour être affiché"
// - arrondi au pair à `decimales` chiffres après la virgule
// - zéros finaux et point orphelin supprimés, "-0" -> "0"
// - |x| ≥ 10^16 : notation scientifique avec le marqueur ~ (2.5~20)
//
// La sortie est relisible telle quelle par le lexeur, et la relire
// redonne le même affichage.

use num_traits::Signed;

use super::decimal::{Nombre, MARQUEUR_EXPOSANT};
use super::erreurs::EvalError;

/// Exposant ajusté à partir duquel on passe en notation scientifique.
const SEUIL_SCIENTIFIQUE: i64 = 16;

/// Écriture positionnelle avec exactement `decimales` chiffres après la virgule.
/// `n` doit déjà être quantifié (exposant ≥ −decimales).
fn ecrit_fixe(n: &Nombre, decimales: u32) -> String {
    let (coeff, exp) = n.parties();
    let signe = if coeff.is_negative() { "-" } else { "" };
    let d = decimales as usize;

    let mut chiffres = coeff.magnitude().to_str_radix(10);
    chiffres.push_str(&"0".repeat((exp + decimales as i64).max(0) as usize));
    if chiffres.len() <= d {
        chiffres = format!("{}{chiffres}", "0".repeat(d + 1 - chiffres.len()));
    }

    let (entiere, fraction) = chiffres.split_at(chiffres.len() - d);
    if fraction.is_empty() {
        format!("{signe}{entiere}")
    } else {
        format!("{signe}{entiere}.{fraction}")
    }
}

/// "2.500" -> "2.5", "3.000" -> "3", "-0" -> "0"
fn nettoie(texte: &str) -> String {
    let t = if texte.contains('.') {
        texte.trim_end_matches('0').trim_end_matches('.')
    } else {
        texte
    };

    if t == "-0" {
        "0".to_string()
    } else {
        t.to_string()
    }
}

pub fn format_resultat(n: &Nombre, decimales: u32) -> Result<String, EvalError> {
    if n.vers_f64().is_none() {
        return Err(EvalError::NonFini);
    }

    let arrondi = n.arrondi_decimales(decimales);
    if arrondi.est_zero() || arrondi.exposant_ajuste() < SEUIL_SCIENTIFIQUE {
        return Ok(nettoie(&ecrit_fixe(&arrondi, decimales)));
    }

    // mantisse ∈ [1, 10)
    let mut exposant = n.exposant_ajuste();
    let mut mantisse = n.decale(-exposant).arrondi_decimales(decimales);
    if mantisse.abs() >= Nombre::from(10) {
        mantisse = mantisse.decale(-1);
        exposant += 1;
    }

    Ok(format!(
        "{}{MARQUEUR_EXPOSANT}{exposant}",
        nettoie(&ecrit_fixe(&mantisse, decimales))
    ))
}
