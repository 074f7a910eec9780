//! Noyau décimal exact
//!
//! Organisation interne :
//! - decimal.rs        : Nombre (BigInt × 10^exp), contexte 28 chiffres, arrondi au pair
//! - transcendantes.rs : ln, exp, trig, hyperboliques en virgule fixe (π de Machin)
//! - catalogue.rs      : table immuable des opérateurs, fonctions, constantes
//! - jetons.rs         : lexeur (unaire/binaire, régions de fonctions)
//! - rpn.rs            : shunting-yard + pile d’évaluation
//! - format.rs         : affichage canonique (15 décimales, marqueur ~)
//! - eval.rs           : pipeline complet + sous-évaluation des opérandes
//! - erreurs.rs        : LexError / ConvertError / EvalError / CalcError
//! - reglages.rs       : décimales affichées, profondeur maximale

pub mod catalogue;
pub mod decimal;
pub mod erreurs;
pub mod eval;
pub mod format;
pub mod jetons;
pub mod reglages;
pub mod rpn;
pub mod transcendantes;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use decimal::Nombre;
pub use erreurs::{CalcError, ConvertError, EvalError, LexError};
pub use eval::{evaluate_expression, evaluate_expression_avec, DemarcheNoyau, Pipeline};
pub use reglages::Reglages;
