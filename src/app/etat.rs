//! src/app/etat.rs
//!
//! État de la calculatrice en ligne de commande (sans affichage).
//!
//! Rôle : contenir la saisie en cours, la file d’erreurs et le moteur RPN,
//! et traduire chaque ligne lue en action moteur.
//!
//! Contrats :
//! - Une ligne (espaces de bord retirés) = une touche : opérateur connu => appliqué,
//!   `:commande` => action, sinon saisie poussée.
//! - Les erreurs ne sortent jamais d’ici : elles attendent dans la file (FIFO).
//! - Aucun affichage ici (voir vue.rs).

use std::collections::VecDeque;

use crate::noyau::format::Renderer;
use crate::noyau::rpn::{ErrorReporter, RpnEngine};

use super::config::{CalcConfig, ConfigResult};

/* ------------------------ File d’erreurs ------------------------ */

/// Messages en attente, rendus dans l’ordre d’arrivée.
#[derive(Clone, Debug, Default)]
pub struct ErrorQueue {
    messages: VecDeque<String>,
}

impl ErrorQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vide la file, du plus ancien au plus récent.
    pub fn drain(&mut self) -> Vec<String> {
        self.messages.drain(..).collect()
    }
}

impl ErrorReporter for ErrorQueue {
    fn report(&mut self, message: &str) {
        self.messages.push_back(message.to_string());
    }
}

/* ------------------------ Commandes ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Continuer,
    /// `:stack` : la vue affiche toute la pile.
    AfficherPile,
    /// `:packs` : la vue liste les paquets et leur état.
    AfficherPaquets,
    Quitter,
}

/* ------------------------ État ------------------------ */

#[derive(Debug)]
pub struct AppCalc {
    // --- saisie en cours (pas encore poussée) ---
    pub entree: String,

    moteur: RpnEngine<ErrorQueue>,

    // --- affichage (séparateur + style choisis par l’utilisateur) ---
    rendu: Renderer,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self {
            entree: String::new(),
            moteur: RpnEngine::with_default_packs(ErrorQueue::new()),
            rendu: Renderer::default(),
        }
    }
}

impl AppCalc {
    pub fn new(config: &CalcConfig) -> ConfigResult<Self> {
        let (operators, constants) = config.registries()?;
        Ok(Self {
            entree: String::new(),
            moteur: RpnEngine::new(operators, constants, ErrorQueue::new()),
            rendu: Renderer::new(config.display.clone()),
        })
    }

    pub fn moteur(&self) -> &RpnEngine<ErrorQueue> {
        &self.moteur
    }

    pub fn moteur_mut(&mut self) -> &mut RpnEngine<ErrorQueue> {
        &mut self.moteur
    }

    pub fn rendu(&self) -> &Renderer {
        &self.rendu
    }

    pub fn erreurs_mut(&mut self) -> &mut ErrorQueue {
        self.moteur.reporter_mut()
    }

    /// `:cancel` : effacer seulement la saisie (la pile ne bouge pas).
    pub fn clear_entree(&mut self) {
        self.entree.clear();
    }

    /// Traite une ligne lue. Les échecs sont déjà dans la file d’erreurs.
    pub fn handle_line(&mut self, ligne: &str) -> Action {
        let ligne = ligne.trim();

        // commandes à argument : `:enable <paquet>`, `:disable <paquet>`
        match ligne.split_once(char::is_whitespace) {
            Some((":enable", nom)) => {
                let _ = self.moteur.enable_pack(nom.trim());
                return Action::Continuer;
            }
            Some((":disable", nom)) => {
                let _ = self.moteur.disable_pack(nom.trim());
                return Action::Continuer;
            }
            _ => {}
        }

        match ligne {
            ":quit" | ":q" => return Action::Quitter,
            ":stack" => return Action::AfficherPile,
            ":packs" => return Action::AfficherPaquets,
            ":unpush" => {
                let _ = self.moteur.unpush();
            }
            ":clear" => self.moteur.clear(&mut self.entree),
            ":cancel" => self.clear_entree(),
            sym if self.moteur.operators().contains(sym) => {
                let _ = self.moteur.apply_operator(&mut self.entree, sym);
            }
            saisie => {
                self.entree = saisie.to_string();
                let _ = self.moteur.push_pending_entry(&mut self.entree);
            }
        }
        Action::Continuer
    }
}
