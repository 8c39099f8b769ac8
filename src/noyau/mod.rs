//! Noyau RPN
//!
//! Organisation interne :
//! - erreurs.rs    : taxonomie des erreurs (lecture, évaluation, moteur)
//! - nombre.rs     : Num / Base + lecture des nombres + noyaux numériques
//! - format.rs     : rendu (entiers par base, styles de flottants)
//! - expr.rs       : arbre d’expression immuable (évaluer, simplifier, rendre, sérialiser)
//! - registre.rs   : registres de paquets (vue fusionnée paresseuse)
//! - paquets.rs    : paquets fournis (Builtin, Trigonometry, Computer, constantes)
//! - pile.rs       : pile d’opérandes
//! - rpn.rs        : moteur RPN
//! - historique.rs : persistance de la pile

pub mod erreurs;
pub mod expr;
pub mod format;
pub mod historique;
pub mod nombre;
pub mod paquets;
pub mod pile;
pub mod registre;
pub mod rpn;

#[cfg(test)]
mod tests_scenarios;

#[cfg(test)]
mod tests_proprietes;
