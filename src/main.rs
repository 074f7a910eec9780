// src/main.rs
//
// Calculatrice décimale : point d’entrée terminal
// -----------------------------------------------
// But:
// - `calculatrice 2*(3+4)`  : une évaluation, résultat sur stdout
// - `calculatrice`          : boucle interactive (ligne vide = quitter)
//
// Codes de sortie:
// - 0 : succès
// - 1 : erreur de saisie (message sur stderr)
// - 2 : erreur interne ou d’entrée/sortie

use std::process::ExitCode;

use clap::Parser;
use log::{info, warn};

use calculatrice_decimale::app::{self, AppCalc};
use calculatrice_decimale::Reglages;

/// Calculatrice décimale exacte (28 chiffres significatifs)
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Expression à évaluer (sinon : mode interactif)
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    expression: Vec<String>,

    /// Chiffres après la virgule à l’affichage (0 à 28)
    #[arg(long, default_value_t = 15)]
    decimales: u32,

    /// Imbrication maximale des appels de fonctions
    #[arg(long, default_value_t = 64)]
    profondeur_max: usize,

    /// Journal détaillé (étapes du pipeline)
    #[arg(short, long)]
    verbeux: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // RUST_LOG d’abord, --verbeux l’emporte
    let mut journal =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if args.verbeux {
        journal.filter_level(log::LevelFilter::Debug);
    }
    journal.init();

    let mut reglages = Reglages::default();
    reglages.set_decimales(args.decimales);
    reglages.set_profondeur_max(args.profondeur_max);
    info!("réglages : {reglages:?}");

    if args.expression.is_empty() {
        return match app::lance(reglages) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{e}");
                ExitCode::from(2)
            }
        };
    }

    let expr = args.expression.join(" ");
    let mut app = AppCalc::new(reglages);
    match app.calcule(&expr) {
        Ok(affiche) => {
            println!("{affiche}");
            ExitCode::SUCCESS
        }
        Err(e) if e.est_erreur_utilisateur() => {
            eprintln!("{e}");
            ExitCode::from(1)
        }
        Err(e) => {
            warn!("défaut interne sur {expr:?} : {e}");
            eprintln!("{e}");
            ExitCode::from(2)
        }
    }
}
