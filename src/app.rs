// src/app.rs
//
// Calculatrice décimale : module App (racine)
// ------------------------------------------
// Rôle:
// - Déclarer les sous-modules (memoire.rs + etat.rs + vue.rs)
// - Ré-exporter AppCalc (pour main.rs: use calculatrice_decimale::app::AppCalc;)
// - Lancer la boucle interactive sur stdin/stdout

pub mod etat;
pub mod memoire;
pub mod vue;

use std::io;

use thiserror::Error;

use crate::noyau::{CalcError, Reglages};

// Ré-exports pratiques
pub use etat::{AppCalc, CalculError, SaisieError};
pub use memoire::{Memoire, MemoireError, Souvenir};

/// Échecs qui arrêtent le terminal (jamais une faute de saisie).
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Entrée/sortie : {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Noyau(#[from] CalcError),
}

/// Terminal interactif sur l’entrée et la sortie standard.
pub fn lance(reglages: Reglages) -> Result<(), AppError> {
    let mut app = AppCalc::new(reglages);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    app.boucle(stdin.lock(), &mut stdout)
}
