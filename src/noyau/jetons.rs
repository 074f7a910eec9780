// src/noyau/jetons.rs
//
// Lexeur
// ------
// - Lexèmes (priorité fixe) : espaces, nombre (\d*\.)?\d+(~[+-]?\d+)?,
//   mot [a-z]+, parenthèse, virgule, autre caractère isolé.
// - + / - : unaire ou binaire selon le jeton précédent.
// - Fonction : région délimitée par ses parenthèses ; chaque opérande
//   (virgule de profondeur 1 ou parenthèse fermante finale) repasse par
//   tout le pipeline via le SousEvaluateur, puis l’appel est remplacé
//   par son résultat.
// - Fin de texte dans une fonction ouverte : parenthèses fermantes ajoutées.

use std::fmt;
use std::str::FromStr;

use log::trace;

use super::catalogue::{self, Arite, Entree, Fonction, Operateur};
use super::decimal::{Nombre, MARQUEUR_EXPOSANT};
use super::erreurs::{CalcError, EvalError, LexError};
use super::eval::SousEvaluateur;

#[derive(Clone, Debug)]
pub enum Jeton {
    Nombre(Nombre),
    /// Unaire ou binaire : l’arité est portée par le descripteur.
    Operateur(&'static Operateur),
    ParOuvrante,
    ParFermante,
    /// Vit seulement pendant la lecture de ses opérandes.
    Fonction(AppelFonction),
}

/* ------------------------ Appel de fonction ------------------------ */

#[derive(Clone, Debug)]
pub struct AppelFonction {
    fonction: &'static Fonction,
    operandes: Vec<Nombre>,
}

impl AppelFonction {
    pub fn new(fonction: &'static Fonction) -> Self {
        Self {
            fonction,
            operandes: Vec::with_capacity(fonction.nb_operandes),
        }
    }

    pub fn nom(&self) -> &'static str {
        self.fonction.symbole
    }

    pub fn operandes(&self) -> &[Nombre] {
        &self.operandes
    }

    /// Jamais plus d’opérandes que le descripteur n’en demande.
    pub fn ajoute_operande(&mut self, n: Nombre) -> Result<(), EvalError> {
        if self.operandes.len() >= self.fonction.nb_operandes {
            return Err(self.erreur_arite(self.operandes.len() + 1));
        }
        self.operandes.push(n);
        Ok(())
    }

    /// Calcule l’appel ; exige exactement le bon nombre d’opérandes.
    pub fn finalise(self) -> Result<Nombre, EvalError> {
        if self.operandes.len() != self.fonction.nb_operandes {
            return Err(self.erreur_arite(self.operandes.len()));
        }
        (self.fonction.operation)(&self.operandes)
    }

    fn erreur_arite(&self, recu: usize) -> EvalError {
        EvalError::Arite {
            fonction: self.fonction.symbole,
            attendu: self.fonction.nb_operandes,
            recu,
        }
    }
}

/* ------------------------ Lexèmes ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Categorie {
    Espace,
    Nombre,
    Mot,
    Parenthese,
    Virgule,
    Autre,
}

#[derive(Clone, Copy, Debug)]
struct Lexeme {
    categorie: Categorie,
    debut: usize,
    fin: usize,
}

fn avance_tant_que(chars: &[char], mut i: usize, predicat: impl Fn(char) -> bool) -> usize {
    while i < chars.len() && predicat(chars[i]) {
        i += 1;
    }
    i
}

/// Fin du littéral numérique commençant en `debut`, s’il y en a un.
fn fin_nombre(chars: &[char], debut: usize) -> Option<usize> {
    let chiffres = |i: usize| avance_tant_que(chars, i, |c| c.is_ascii_digit());

    // (\d*\.)?\d+
    let apres_entier = chiffres(debut);
    let mut fin = if chars.get(apres_entier) == Some(&'.') {
        let apres_fraction = chiffres(apres_entier + 1);
        if apres_fraction > apres_entier + 1 {
            apres_fraction
        } else if apres_entier > debut {
            apres_entier
        } else {
            return None;
        }
    } else if apres_entier > debut {
        apres_entier
    } else {
        return None;
    };

    // (~[+-]?\d+)?
    if chars.get(fin) == Some(&MARQUEUR_EXPOSANT) {
        let mut i = fin + 1;
        if matches!(chars.get(i), Some('+' | '-')) {
            i += 1;
        }
        let apres = chiffres(i);
        if apres > i {
            fin = apres;
        }
    }

    Some(fin)
}

fn lexeme_suivant(chars: &[char], debut: usize) -> Lexeme {
    let c = chars[debut];

    let (categorie, fin) = if c.is_whitespace() {
        (Categorie::Espace, avance_tant_que(chars, debut, char::is_whitespace))
    } else if let Some(fin) = fin_nombre(chars, debut) {
        (Categorie::Nombre, fin)
    } else if c.is_ascii_lowercase() {
        (
            Categorie::Mot,
            avance_tant_que(chars, debut, |c| c.is_ascii_lowercase()),
        )
    } else if c == '(' || c == ')' {
        (Categorie::Parenthese, debut + 1)
    } else if c == ',' {
        (Categorie::Virgule, debut + 1)
    } else {
        (Categorie::Autre, debut + 1)
    };

    Lexeme {
        categorie,
        debut,
        fin,
    }
}

/* ------------------------ Classification ------------------------ */

/// Règle de désambiguïsation : unaire en tête, après "(", après un
/// opérateur binaire ou après un unaire préfixe.
pub fn doit_etre_unaire(precedent: Option<&Jeton>) -> bool {
    match precedent {
        None | Some(Jeton::ParOuvrante) => true,
        Some(Jeton::Operateur(op)) => op.arite == Arite::Binaire || op.est_prefixe(),
        _ => false,
    }
}

fn identifie(
    texte: &str,
    categorie: Categorie,
    precedent: Option<&Jeton>,
) -> Result<Jeton, CalcError> {
    match categorie {
        Categorie::Nombre => Ok(Jeton::Nombre(Nombre::from_str(texte)?)),
        Categorie::Parenthese if texte == "(" => Ok(Jeton::ParOuvrante),
        Categorie::Parenthese => Ok(Jeton::ParFermante),
        Categorie::Virgule => Err(LexError::VirguleHorsFonction.into()),
        _ => match catalogue::cherche(texte) {
            Some(Entree::Ambigu { unaire, binaire }) => Ok(Jeton::Operateur(
                if doit_etre_unaire(precedent) {
                    unaire
                } else {
                    binaire
                },
            )),
            Some(Entree::Operateur(op)) => Ok(Jeton::Operateur(op)),
            Some(Entree::Fonction(f)) => Ok(Jeton::Fonction(AppelFonction::new(f))),
            Some(Entree::Constante(valeur)) => Nombre::from_str(valeur)
                .map(Jeton::Nombre)
                .map_err(|e| CalcError::Interne(format!("constante {texte} : {e}"))),
            None => Err(LexError::JetonInvalide(texte.to_string()).into()),
        },
    }
}

/* ------------------------ Région de fonction ------------------------ */

struct RegionFonction {
    nom: &'static str,
    profondeur: i64,
    /// Début de l’opérande courant : sa "(" ou sa ",".
    debut_operande: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Delimiteur {
    Virgule,
    Fin,
}

/// "(x," / ",x," / ",x)" / "(x)" -> "x"
fn valide_operande<'a>(brut: &'a str, nom: &str) -> Result<&'a str, LexError> {
    brut.trim()
        .strip_prefix(|c: char| c == '(' || c == ',')
        .ok_or_else(|| LexError::ParentheseOuvranteManquante(nom.to_string()))?
        .strip_suffix(|c: char| c == ',' || c == ')')
        .ok_or_else(|| LexError::ParentheseFermanteManquante(nom.to_string()))
}

fn ajoute_operande(
    jetons: &mut [Jeton],
    brut: &str,
    nom: &str,
    sous_eval: &dyn SousEvaluateur,
) -> Result<(), CalcError> {
    let texte = valide_operande(brut, nom)?;
    trace!("opérande de {nom} : {texte:?}");

    let affiche = sous_eval.evalue(texte)?;
    let valeur = Nombre::from_str(&affiche)
        .map_err(|e| CalcError::Interne(format!("résultat intermédiaire illisible : {e}")))?;

    match jetons.last_mut() {
        Some(Jeton::Fonction(appel)) => Ok(appel.ajoute_operande(valeur)?),
        _ => Err(CalcError::Interne(format!("appel de {nom} introuvable"))),
    }
}

/// Remplace l’appel (dernier jeton) par son résultat.
fn finalise_fonction(jetons: &mut Vec<Jeton>) -> Result<(), CalcError> {
    match jetons.pop() {
        Some(Jeton::Fonction(appel)) => {
            let valeur = appel.finalise()?;
            jetons.push(Jeton::Nombre(valeur));
            Ok(())
        }
        autre => Err(CalcError::Interne(format!(
            "appel de fonction attendu en fin de jetons, trouvé {autre:?}"
        ))),
    }
}

/* ------------------------ Tokenisation ------------------------ */

/// Tokenise une expression (insensible à la casse, espaces de bord ignorés).
/// Les opérandes de fonctions sont évalués par `sous_eval`.
pub fn tokenize(texte: &str, sous_eval: &dyn SousEvaluateur) -> Result<Vec<Jeton>, CalcError> {
    let mut chars: Vec<char> = texte.trim().to_lowercase().chars().collect();
    let mut jetons: Vec<Jeton> = Vec::new();
    let mut region: Option<RegionFonction> = None;
    let mut pos = 0;

    while pos < chars.len() {
        let lexeme = lexeme_suivant(&chars, pos);
        pos = lexeme.fin;

        if lexeme.categorie != Categorie::Espace {
            let texte: String = chars[lexeme.debut..lexeme.fin].iter().collect();
            trace!("lexème {:?} {texte:?}", lexeme.categorie);

            let mut fermer = false;
            match region.as_mut() {
                None => {
                    let jeton = identifie(&texte, lexeme.categorie, jetons.last())?;
                    if let Jeton::Fonction(appel) = &jeton {
                        region = Some(RegionFonction {
                            nom: appel.nom(),
                            profondeur: 0,
                            debut_operande: pos,
                        });
                    }
                    jetons.push(jeton);
                }

                // dans une fonction : seules parenthèses et virgules délimitent
                Some(r) => {
                    let delimiteur = match (lexeme.categorie, texte.as_str()) {
                        (Categorie::Parenthese, "(") => {
                            r.profondeur += 1;
                            None
                        }
                        (Categorie::Parenthese, _) => {
                            r.profondeur -= 1;
                            (r.profondeur <= 0).then_some(Delimiteur::Fin)
                        }
                        (Categorie::Virgule, _) if r.profondeur == 1 => Some(Delimiteur::Virgule),
                        _ if r.profondeur <= 0 => {
                            return Err(LexError::ParentheseOuvranteManquante(r.nom.to_string()).into())
                        }
                        _ => None,
                    };

                    if let Some(d) = delimiteur {
                        let brut: String = chars[r.debut_operande..pos].iter().collect();
                        r.debut_operande = pos - 1;
                        ajoute_operande(&mut jetons, &brut, r.nom, sous_eval)?;
                        fermer = d == Delimiteur::Fin;
                    }
                }
            }

            if fermer {
                region = None;
                finalise_fonction(&mut jetons)?;
            }
        }

        // fermeture tolérante
        if pos >= chars.len() {
            if let Some(r) = &region {
                if r.profondeur > 0 {
                    trace!("{} parenthèse(s) ajoutée(s) pour {}", r.profondeur, r.nom);
                    chars.extend(std::iter::repeat(')').take(r.profondeur as usize));
                }
            }
        }
    }

    // nom de fonction sans parenthèse jusqu’à la fin
    if let Some(r) = region {
        return Err(LexError::ParentheseOuvranteManquante(r.nom.to_string()).into());
    }

    Ok(jetons)
}

/* ------------------------ Affichage ------------------------ */

impl fmt::Display for Jeton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Jeton::Nombre(n) => write!(f, "{n}"),
            Jeton::Operateur(op) if op.est_prefixe() => {
                write!(f, "{}u", op.symbole)
            }
            Jeton::Operateur(op) => write!(f, "{}", op.symbole),
            Jeton::ParOuvrante => write!(f, "("),
            Jeton::ParFermante => write!(f, ")"),
            Jeton::Fonction(appel) => write!(f, "{}[{}]", appel.nom(), appel.operandes().len()),
        }
    }
}

/// Format utilitaire (journal / démarche) : liste de jetons en texte.
pub fn format_jetons(jetons: &[Jeton]) -> String {
    jetons
        .iter()
        .map(|j| j.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
