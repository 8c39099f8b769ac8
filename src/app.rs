// src/app.rs
//
// Calculatrice RPN : module App (racine)
// --------------------------------------
// Rôle :
// - Déclarer les sous-modules (config.rs + etat.rs + vue.rs)
// - Ré-exporter AppCalc (pour main.rs : use crate::app::AppCalc;)
// - Boucle de lecture : une ligne lue => une action => les lignes de la vue
//
// La boucle est générique (BufRead / Write) : stdin/stdout en vrai, tampons en test.

pub mod config;
pub mod etat;
pub mod vue;

// Ré-export pratique : `use crate::app::AppCalc;`
pub use etat::{Action, AppCalc};

use std::io::{self, BufRead, Write};

/// Traite les lignes jusqu’à `:quit` ou la fin de l’entrée.
pub fn run<I: BufRead, O: Write>(app: &mut AppCalc, entree: I, sortie: &mut O) -> io::Result<()> {
    for ligne in entree.lines() {
        let action = app.handle_line(&ligne?);
        match action {
            Action::Quitter => break,
            Action::AfficherPaquets => {
                for l in app.lignes_paquets() {
                    writeln!(sortie, "{l}")?;
                }
            }
            Action::Continuer | Action::AfficherPile => {}
        }
        for l in app.lignes_vue(action == Action::AfficherPile) {
            writeln!(sortie, "{l}")?;
        }
        sortie.flush()?;
    }
    Ok(())
}
