// src/noyau/erreurs.rs
//
// Taxonomie des erreurs du noyau.
// - ParseError  : saisie illisible (nombre / nom de variable)
// - EvalError   : évaluation impossible (variable libre, domaine, arité)
// - EngineError : erreurs vues à la frontière du moteur RPN (pile, paquets, historique)
//
// Toutes sont récupérées par le moteur : elles ne font jamais planter le process.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("impossible de lire « {0} » comme un nombre")]
    CannotParseNumber(String),

    #[error("caractères invalides dans « {0} »")]
    InvalidVariableName(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("variable non liée : {0}")]
    UnboundVariable(String),

    #[error("erreur de domaine : {0}")]
    Domain(String),

    #[error("{symbol} attend {expected} argument(s), reçu {got}")]
    Arity {
        symbol: String,
        expected: usize,
        got: usize,
    },
}

impl EvalError {
    pub(crate) fn domaine(msg: impl Into<String>) -> Self {
        EvalError::Domain(msg.into())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("pas assez d'arguments : la pile en a {have} mais {op_symbol} en demande {need}")]
    InsufficientArguments {
        have: usize,
        need: usize,
        op_symbol: String,
    },

    #[error("opérateur inconnu : {0}")]
    UnknownOperator(String),

    #[error("la pile est vide")]
    EmptyStack,

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("séquence invalide : {produced} entrée(s) reconstruite(s) au lieu d’une")]
    MalformedSequence { produced: usize },

    #[error("séquence trop longue : {len} jetons (max {max})")]
    SequenceTooLong { len: usize, max: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("paquet introuvable : {0}")]
    UnknownPack(String),
}
