// src/app/memoire.rs
//
// Mémoire des calculs (côté appelant, jamais dans le noyau)
// --------------------------------------------------------
// - une entrée = (expression saisie, réponse affichée)
// - indexation 1 = plus récent
// - aucune limite de taille imposée ici

use std::collections::VecDeque;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoireError {
    #[error("Les références mémoire commencent à 1")]
    NonPositif,

    #[error("Mémoire {demande} demandée, seulement {len} calcul(s) enregistré(s)")]
    HorsBornes { demande: usize, len: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Souvenir {
    pub expression: String,
    pub reponse: String,
}

/// Historique, le plus récent en tête.
#[derive(Clone, Debug, Default)]
pub struct Memoire {
    entrees: VecDeque<Souvenir>,
}

impl Memoire {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enregistre(&mut self, expression: impl Into<String>, reponse: impl Into<String>) {
        self.entrees.push_front(Souvenir {
            expression: expression.into(),
            reponse: reponse.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.entrees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entrees.is_empty()
    }

    /// n-ième calcul le plus récent (1 = dernier).
    pub fn element(&self, n: usize) -> Result<&Souvenir, MemoireError> {
        if n == 0 {
            return Err(MemoireError::NonPositif);
        }
        self.entrees.get(n - 1).ok_or(MemoireError::HorsBornes {
            demande: n,
            len: self.len(),
        })
    }

    /// Les `n` plus récents (tous si `None` ou si n dépasse la taille).
    pub fn recents(&self, n: Option<usize>) -> impl Iterator<Item = &Souvenir> {
        let n = n.unwrap_or(usize::MAX).min(self.len());
        self.entrees.iter().take(n)
    }

    pub fn efface(&mut self) {
        self.entrees.clear();
    }
}
