//! Calculatrice décimale
//!
//! - `noyau` : lexeur, shunting-yard, pile RPN, catalogue, affichage
//! - `app`   : terminal interactif (mémoire, commandes)

pub mod app;
pub mod noyau;

pub use noyau::{evaluate_expression, evaluate_expression_avec, CalcError, Reglages};
