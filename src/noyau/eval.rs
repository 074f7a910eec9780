//! Noyau : évaluation (pipeline réel)
//!
//! tokenize -> RPN -> pile -> affichage
//!
//! Les opérandes de fonctions repassent par ce même pipeline : le lexeur
//! reçoit la capacité `SousEvaluateur` (ici : un `Pipeline` d’un niveau
//! plus profond) au lieu d’appeler une fonction globale.

use log::debug;

use super::erreurs::{CalcError, LexError};
use super::format::format_resultat;
use super::jetons::{format_jetons, tokenize};
use super::reglages::Reglages;
use super::rpn::{eval_rpn, to_rpn};

/// Évalue un texte d’opérande et renvoie son affichage canonique.
pub trait SousEvaluateur {
    fn evalue(&self, expr: &str) -> Result<String, CalcError>;
}

/// Trace d’un calcul (mode verbeux du terminal).
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct DemarcheNoyau {
    pub jetons: String,
    pub rpn: String,
    pub brut: String,
}

/// Pipeline complet à une profondeur d’imbrication donnée.
#[derive(Clone, Copy, Debug)]
pub struct Pipeline<'r> {
    reglages: &'r Reglages,
    profondeur: usize,
}

impl<'r> Pipeline<'r> {
    pub fn new(reglages: &'r Reglages) -> Self {
        Self {
            reglages,
            profondeur: 0,
        }
    }

    pub fn execute(&self, expr: &str) -> Result<String, CalcError> {
        self.execute_avec_demarche(expr).map(|(affiche, _)| affiche)
    }

    pub fn execute_avec_demarche(&self, expr: &str) -> Result<(String, DemarcheNoyau), CalcError> {
        let p = self.profondeur;

        // 1) Jetons (fonctions déjà évaluées)
        let jetons = tokenize(expr, self)?;
        let jetons_txt = format_jetons(&jetons);
        debug!("[{p}] jetons : {jetons_txt}");

        // 2) RPN
        let rpn = to_rpn(jetons)?;
        let rpn_txt = format_jetons(&rpn);
        debug!("[{p}] rpn : {rpn_txt}");

        // 3) Pile
        let brut = eval_rpn(rpn)?;
        debug!("[{p}] brut : {brut}");

        // 4) Affichage
        let affiche = format_resultat(&brut, self.reglages.decimales())?;
        debug!("[{p}] résultat : {affiche}");

        Ok((
            affiche,
            DemarcheNoyau {
                jetons: jetons_txt,
                rpn: rpn_txt,
                brut: brut.to_string(),
            },
        ))
    }
}

impl SousEvaluateur for Pipeline<'_> {
    fn evalue(&self, expr: &str) -> Result<String, CalcError> {
        let profondeur = self.profondeur + 1;
        if profondeur > self.reglages.profondeur_max() {
            return Err(LexError::TropProfond(self.reglages.profondeur_max()).into());
        }

        Pipeline {
            reglages: self.reglages,
            profondeur,
        }
        .execute(expr)
    }
}

/// API publique : évalue une expression avec les réglages par défaut.
pub fn evaluate_expression(expr: &str) -> Result<String, CalcError> {
    evaluate_expression_avec(expr, &Reglages::default())
}

pub fn evaluate_expression_avec(expr: &str, reglages: &Reglages) -> Result<String, CalcError> {
    Pipeline::new(reglages).execute(expr)
}
