// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> valeur
// Objectif:
// - Convertir une suite de Jeton en RPN (postfix)
// - Puis l’exécuter sur une pile de Nombre
//
// Règles:
// - Précédence : plus petit = exécuté d’abord. On dépile le sommet tant que
//   sommet.precedence < op.precedence, ou égalité et sommet associatif à gauche.
// - ")" sans "(" correspondante : erreur.
// - "(" restées ouvertes en fin de texte : ignorées.
//
// NOTE:
// - Les appels de fonction ont déjà été remplacés par leur valeur au lexage ;
//   en recevoir un ici est un défaut interne.

use log::trace;

use super::catalogue::{Arite, Associativite, Operateur};
use super::decimal::Nombre;
use super::erreurs::{CalcError, ConvertError, EvalError};
use super::jetons::Jeton;

/// Le sommet de pile doit-il sortir avant d’empiler `op` ?
fn sort_avant(sommet: &Operateur, op: &Operateur) -> bool {
    sommet.precedence < op.precedence
        || (sommet.precedence == op.precedence && sommet.associativite == Associativite::Gauche)
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   jetons: [2, +, 3, *, 4]
///   rpn:    [2, 3, 4, *, +]
pub fn to_rpn(jetons: Vec<Jeton>) -> Result<Vec<Jeton>, CalcError> {
    let mut sortie: Vec<Jeton> = Vec::with_capacity(jetons.len());
    let mut pile: Vec<Jeton> = Vec::new();

    for jeton in jetons {
        match jeton {
            Jeton::Nombre(_) => sortie.push(jeton),

            Jeton::Operateur(op) => {
                while let Some(Jeton::Operateur(sommet)) = pile.last() {
                    if !sort_avant(sommet, op) {
                        break;
                    }
                    if let Some(j) = pile.pop() {
                        sortie.push(j);
                    }
                }
                pile.push(jeton);
            }

            Jeton::ParOuvrante => pile.push(jeton),

            Jeton::ParFermante => loop {
                match pile.pop() {
                    Some(Jeton::ParOuvrante) => break,
                    Some(j) => sortie.push(j),
                    None => return Err(ConvertError::ParenthesesDesequilibrees.into()),
                }
            },

            Jeton::Fonction(appel) => {
                return Err(CalcError::Interne(format!(
                    "appel de fonction non résolu avant conversion : {}",
                    appel.nom()
                )))
            }
        }
    }

    // "(" non refermées : silencieusement ignorées
    while let Some(j) = pile.pop() {
        if !matches!(j, Jeton::ParOuvrante) {
            sortie.push(j);
        }
    }

    Ok(sortie)
}

/// Exécute une RPN : une seule pile de nombres, un résultat exactement.
pub fn eval_rpn(rpn: Vec<Jeton>) -> Result<Nombre, CalcError> {
    let mut pile: Vec<Nombre> = Vec::new();

    for jeton in rpn {
        match jeton {
            Jeton::Nombre(n) => pile.push(n),

            Jeton::Operateur(op) => {
                let operandes = match op.arite {
                    Arite::Unaire => vec![pile.pop().ok_or(EvalError::TropPeuOperandes)?],
                    Arite::Binaire => {
                        let droite = pile.pop().ok_or(EvalError::TropPeuOperandes)?;
                        let gauche = pile.pop().ok_or(EvalError::TropPeuOperandes)?;
                        vec![gauche, droite]
                    }
                };

                let resultat = op.execute(&operandes)?;
                trace!("{} {:?} = {resultat}", op.symbole, operandes);
                pile.push(resultat);
            }

            autre => {
                return Err(CalcError::Interne(format!(
                    "jeton inattendu dans la RPN : {autre}"
                )))
            }
        }
    }

    let resultat = pile.pop().ok_or(EvalError::NombreOperandes)?;
    if !pile.is_empty() {
        return Err(EvalError::NombreOperandes.into());
    }
    Ok(resultat)
}
