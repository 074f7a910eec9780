// src/noyau/erreurs.rs
//
// Taxonomie des erreurs du noyau
// ------------------------------
// - LexError     : jetons (symbole inconnu, virgule hors fonction, délimiteurs)
// - ConvertError : shunting-yard (parenthèses fermantes en trop)
// - EvalError    : pile RPN, arité, domaines numériques, moteur décimal, affichage
// - Interne      : tout le reste = défaut du programme, pas de l’entrée

use thiserror::Error;

use super::decimal::Nombre;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Jeton invalide : '{0}'")]
    JetonInvalide(String),

    #[error("Nombre invalide : '{0}'")]
    NombreInvalide(String),

    #[error("Les virgules ne sont autorisées qu’à l’intérieur des fonctions")]
    VirguleHorsFonction,

    #[error("Les fonctions doivent être immédiatement suivies de parenthèses ({0})")]
    ParentheseOuvranteManquante(String),

    #[error("Les fonctions doivent se terminer par une parenthèse fermante ({0})")]
    ParentheseFermanteManquante(String),

    #[error("Imbrication de fonctions trop profonde (maximum {0})")]
    TropProfond(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("Trop de parenthèses fermantes ou pas assez de parenthèses ouvrantes")]
    ParenthesesDesequilibrees,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("Trop peu d’opérandes ou trop d’opérateurs")]
    TropPeuOperandes,

    #[error("Trop d’opérandes ou trop peu d’opérateurs")]
    NombreOperandes,

    #[error("{attendu} opérande(s) requis dans l’appel de la fonction {fonction} ({recu} fourni(s))")]
    Arite {
        fonction: &'static str,
        attendu: usize,
        recu: usize,
    },

    /// Précondition d’une opération violée (table du catalogue).
    #[error("En effectuant {operation} avec {operandes} : {message}")]
    Domaine {
        operation: &'static str,
        operandes: String,
        message: String,
    },

    #[error("Division par zéro")]
    DivisionParZero,

    #[error("Nombre trop grand")]
    Depassement,

    #[error("Opération invalide")]
    OperationInvalide,

    /// Résultat non fini au moment de l’affichage.
    #[error("Nombre trop grand pour être affiché")]
    NonFini,
}

impl EvalError {
    pub fn domaine(
        operation: &'static str,
        operandes: &[Nombre],
        message: impl Into<String>,
    ) -> Self {
        let operandes = operandes
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        EvalError::Domaine {
            operation,
            operandes,
            message: message.into(),
        }
    }
}

/// Erreur publique du pipeline : la première erreur rencontrée, telle quelle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Conversion(#[from] ConvertError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    /// Hors taxonomie : bug du noyau, à ne pas présenter comme une faute de saisie.
    #[error("Erreur interne : {0}")]
    Interne(String),
}

impl CalcError {
    pub fn est_erreur_utilisateur(&self) -> bool {
        !matches!(self, CalcError::Interne(_))
    }
}
