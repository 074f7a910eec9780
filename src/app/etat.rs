//! src/app/etat.rs
//!
//! État du terminal (sans entrée/sortie).
//!
//! Rôle : contenir l’état de la calculatrice (entrée, dernier résultat, erreur,
//! mémoire, réglages) et préparer la saisie avant de la confier au noyau.
//!
//! Contrats :
//! - Le noyau ne voit jamais la mémoire : `ans` et `m<k>` sont remplacés ici.
//! - Seuls les mots entiers sont remplacés (`lcm`, `tanh`… restent intacts).
//! - Un calcul réussi est enregistré (texte après substitution), un calcul raté
//!   ne touche pas la mémoire.

use thiserror::Error;

use super::memoire::{Memoire, MemoireError};
use crate::noyau::{CalcError, DemarcheNoyau, Pipeline, Reglages};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaisieError {
    #[error("Aucun calcul en mémoire")]
    MemoireVide,

    #[error("Numéro de mémoire manquant après 'm'")]
    ReferenceManquante,

    #[error("Référence mémoire invalide : '{0}'")]
    ReferenceInvalide(String),

    #[error(transparent)]
    Memoire(#[from] MemoireError),
}

/// Échec d’un calcul vu du terminal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculError {
    #[error(transparent)]
    Saisie(#[from] SaisieError),

    #[error(transparent)]
    Noyau(#[from] CalcError),
}

impl CalculError {
    pub fn est_erreur_utilisateur(&self) -> bool {
        match self {
            CalculError::Saisie(_) => true,
            CalculError::Noyau(e) => e.est_erreur_utilisateur(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppCalc {
    // --- entrée utilisateur ---
    pub entree: String,

    // --- sorties ---
    pub resultat: String,
    pub erreur: String,
    pub demarche: DemarcheNoyau,

    // --- historique + paramètres ---
    pub memoire: Memoire,
    pub reglages: Reglages,
}

impl AppCalc {
    pub fn new(reglages: Reglages) -> Self {
        Self {
            reglages,
            ..Self::default()
        }
    }

    /// Substitue la mémoire, évalue, puis enregistre en cas de succès.
    pub fn calcule(&mut self, expr: &str) -> Result<String, CalculError> {
        self.entree = expr.to_string();

        match self.evalue(expr) {
            Ok((texte, affiche, demarche)) => {
                self.erreur.clear();
                self.resultat = affiche.clone();
                self.demarche = demarche;
                // ans / m<k> déjà remplacés
                self.memoire.enregistre(texte, affiche.clone());
                Ok(affiche)
            }
            Err(e) => {
                // on garde le dernier résultat, seule la démarche est invalide
                self.erreur = e.to_string();
                self.demarche = DemarcheNoyau::default();
                Err(e)
            }
        }
    }

    /// (texte substitué, affichage, démarche)
    fn evalue(&self, expr: &str) -> Result<(String, String, DemarcheNoyau), CalculError> {
        let texte = substitue_memoire(expr, &self.memoire)?;
        let (affiche, demarche) = Pipeline::new(&self.reglages).execute_avec_demarche(&texte)?;
        Ok((texte, affiche, demarche))
    }

    /// Vide l’historique (commande `effacer`).
    pub fn efface_memoire(&mut self) {
        self.memoire.efface();
    }
}

/// Remplace les mots `ans` et `m<k>` par la réponse correspondante, entre parenthèses.
pub fn substitue_memoire(expr: &str, memoire: &Memoire) -> Result<String, SaisieError> {
    let mut sortie = String::with_capacity(expr.len());
    let mut mot = String::new();

    for c in expr.chars().chain(std::iter::once(' ')) {
        if c.is_alphanumeric() || c == '_' {
            mot.push(c);
            continue;
        }
        if !mot.is_empty() {
            sortie.push_str(&remplace_mot(&mot, memoire)?);
            mot.clear();
        }
        sortie.push(c);
    }

    // sentinelle retirée
    sortie.pop();
    Ok(sortie)
}

fn remplace_mot(mot: &str, memoire: &Memoire) -> Result<String, SaisieError> {
    let n = if mot.eq_ignore_ascii_case("ans") {
        1
    } else if let Some(k) = mot.strip_prefix(['m', 'M']) {
        if k.is_empty() {
            return Err(SaisieError::ReferenceManquante);
        }
        if !k.chars().all(|c| c.is_ascii_digit()) {
            // autre mot (ex. une fonction future) : le noyau tranchera
            return Ok(mot.to_string());
        }
        k.parse::<usize>()
            .map_err(|_| SaisieError::ReferenceInvalide(mot.to_string()))?
    } else {
        return Ok(mot.to_string());
    };

    if memoire.is_empty() {
        return Err(SaisieError::MemoireVide);
    }
    let souvenir = memoire.element(n)?;
    Ok(format!("({})", souvenir.reponse))
}
