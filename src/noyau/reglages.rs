// src/noyau/reglages.rs
//
// Réglages du noyau (bornés, jamais d’état global)
// - decimales     : chiffres après la virgule à l’affichage
// - profondeur_max : imbrication maximale des appels de fonctions

use super::decimal::PRECISION;

pub const DECIMALES_DEFAUT: u32 = 15;
pub const DECIMALES_MAX: u32 = PRECISION;

pub const PROFONDEUR_DEFAUT: usize = 64;
pub const PROFONDEUR_MAX: usize = 256;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reglages {
    decimales: u32,
    profondeur_max: usize,
}

impl Default for Reglages {
    fn default() -> Self {
        Self {
            decimales: DECIMALES_DEFAUT,
            profondeur_max: PROFONDEUR_DEFAUT,
        }
    }
}

impl Reglages {
    pub fn decimales(&self) -> u32 {
        self.decimales
    }

    pub fn set_decimales(&mut self, d: u32) {
        self.decimales = d.min(DECIMALES_MAX);
    }

    pub fn profondeur_max(&self) -> usize {
        self.profondeur_max
    }

    pub fn set_profondeur_max(&mut self, p: usize) {
        self.profondeur_max = p.clamp(1, PROFONDEUR_MAX);
    }
}
