// src/app/vue.rs
//
// Vue (terminal ligne à ligne)
// ----------------------------
// Objectifs :
// - Même AppCalc (etat.rs) que le mode une-ligne de main.rs
// - Ligne vide = quitter
// - Commandes : aide, memoire, effacer, demarche
// - Toute autre ligne = expression
// - Erreur utilisateur : message affiché, la boucle continue
// - Erreur interne : journalisée, la boucle s’arrête

use std::io::{BufRead, Write};

use log::{trace, warn};

use super::etat::{AppCalc, CalculError};
use super::AppError;
use crate::noyau::catalogue;

const INVITE: &str = "> ";

const BIENVENUE: &str = "Calculatrice décimale. Tapez 'aide' pour la liste des opérations, \
                         une ligne vide pour quitter.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Commande {
    Quitter,
    Aide,
    Memoire,
    Effacer,
    Demarche,
    Calcul,
}

impl Commande {
    fn depuis(ligne: &str) -> Self {
        match ligne.to_lowercase().as_str() {
            "" => Commande::Quitter,
            "aide" | "instructions" => Commande::Aide,
            "memoire" | "mémoire" | "memory" => Commande::Memoire,
            "effacer" | "clear" => Commande::Effacer,
            "demarche" | "démarche" => Commande::Demarche,
            _ => Commande::Calcul,
        }
    }
}

impl AppCalc {
    /// Boucle interactive : lit `entree` jusqu’à une ligne vide ou la fin du flux.
    pub fn boucle<R: BufRead, W: Write>(&mut self, entree: R, sortie: &mut W) -> Result<(), AppError> {
        writeln!(sortie, "{BIENVENUE}")?;

        let mut lignes = entree.lines();
        loop {
            write!(sortie, "{INVITE}")?;
            sortie.flush()?;

            let Some(ligne) = lignes.next() else {
                break;
            };
            let ligne = ligne?;
            let ligne = ligne.trim();
            trace!("ligne : {ligne:?}");

            match Commande::depuis(ligne) {
                Commande::Quitter => break,
                Commande::Aide => write!(sortie, "{}", catalogue::instructions())?,
                Commande::Memoire => self.affiche_memoire(sortie)?,
                Commande::Effacer => {
                    self.efface_memoire();
                    writeln!(sortie, "Mémoire effacée")?;
                }
                Commande::Demarche => self.affiche_demarche(sortie)?,
                Commande::Calcul => self.affiche_calcul(ligne, sortie)?,
            }
        }
        Ok(())
    }

    fn affiche_calcul<W: Write>(&mut self, ligne: &str, sortie: &mut W) -> Result<(), AppError> {
        match self.calcule(ligne) {
            Ok(affiche) => writeln!(sortie, "{affiche}")?,
            Err(e) if e.est_erreur_utilisateur() => writeln!(sortie, "{e}")?,
            Err(CalculError::Noyau(e)) => {
                warn!("défaut interne sur {ligne:?} : {e}");
                return Err(AppError::Noyau(e));
            }
            Err(e) => writeln!(sortie, "{e}")?,
        }
        Ok(())
    }

    fn affiche_memoire<W: Write>(&self, sortie: &mut W) -> Result<(), AppError> {
        if self.memoire.is_empty() {
            writeln!(sortie, "Mémoire vide")?;
            return Ok(());
        }
        for (i, s) in self.memoire.recents(None).enumerate() {
            writeln!(sortie, "{}: {} = {}", i + 1, s.expression, s.reponse)?;
        }
        Ok(())
    }

    fn affiche_demarche<W: Write>(&self, sortie: &mut W) -> Result<(), AppError> {
        if self.demarche.rpn.is_empty() {
            writeln!(sortie, "Aucune démarche (pas encore de calcul réussi)")?;
            return Ok(());
        }
        writeln!(sortie, "Jetons : {}", self.demarche.jetons)?;
        writeln!(sortie, "RPN    : {}", self.demarche.rpn)?;
        writeln!(sortie, "Brut   : {}", self.demarche.brut)?;
        Ok(())
    }
}
