// src/noyau/rpn.rs
//
// Moteur RPN : pile d’opérandes + registres + rapporteur d’erreurs.
//
// Règles :
// - La saisie en cours n’appartient pas au moteur : elle est passée à chaque appel
//   (trait PendingEntry), le moteur ne garde aucune référence vers elle.
// - Toute opération publique qui échoue laisse la pile intacte, signale le message
//   au rapporteur (ErrorReporter) et renvoie l’erreur.
// - Lecture d’une saisie : nombre -> constante (nom exact) -> variable [A-Za-z0-9]+.
//
// NOTE:
// - Une saisie contenant un espace est rejetée ET reste effacée (comportement visible).

use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::{debug, warn};

use super::erreurs::{EngineError, ParseError, RegistryError};
use super::expr::{Node, Operator};
use super::format::Renderer;
use super::nombre::parse_number;
use super::paquets;
use super::pile::Stack;
use super::registre::{ConstantRegistry, OperatorRegistry};

/// Jetons au plus par séquence rejouée : l’arbre reconstruit reste peu profond
/// (évaluation, rendu et libération sont récursifs).
pub const MAX_JETONS_SEQUENCE: usize = 2048;

/* ------------------------ Collaborateurs ------------------------ */

/// Texte saisi mais pas encore poussé.
pub trait PendingEntry {
    /// Rend le texte et vide la saisie.
    fn take(&mut self) -> String;
    fn clear(&mut self);
    fn restore(&mut self, text: String);
}

impl PendingEntry for String {
    fn take(&mut self) -> String {
        std::mem::take(self)
    }

    fn clear(&mut self) {
        String::clear(self);
    }

    fn restore(&mut self, text: String) {
        *self = text;
    }
}

pub trait ErrorReporter {
    fn report(&mut self, message: &str);
}

/// Collecte simple : chaque message est gardé dans l’ordre.
impl ErrorReporter for Vec<String> {
    fn report(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

/* ------------------------ Moteur ------------------------ */

#[derive(Debug)]
pub struct RpnEngine<R: ErrorReporter> {
    stack: Stack,
    operators: OperatorRegistry,
    constants: ConstantRegistry,
    /// Rendu des jetons sérialisés : configuration par défaut, sans séparateur.
    serialiseur: Renderer,
    reporter: R,
}

impl<R: ErrorReporter> RpnEngine<R> {
    pub fn new(operators: OperatorRegistry, constants: ConstantRegistry, reporter: R) -> Self {
        Self {
            stack: Stack::new(),
            operators,
            constants,
            serialiseur: Renderer::default(),
            reporter,
        }
    }

    /// Moteur avec tous les paquets fournis activés.
    pub fn with_default_packs(reporter: R) -> Self {
        let (operators, constants) = paquets::default_registries();
        Self::new(operators, constants, reporter)
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn operators(&self) -> &OperatorRegistry {
        &self.operators
    }

    pub fn reporter_mut(&mut self) -> &mut R {
        &mut self.reporter
    }

    /* ------------------------ Paquets ------------------------ */

    /// Active le paquet `name` dans chaque registre qui le connaît.
    pub fn enable_pack(&mut self, name: &str) -> Result<(), EngineError> {
        self.verifier_paquet(name)?;
        if self.operators.has_pack(name) {
            self.operators.enable(name)?;
        }
        if self.constants.has_pack(name) {
            self.constants.enable(name)?;
        }
        Ok(())
    }

    pub fn disable_pack(&mut self, name: &str) -> Result<(), EngineError> {
        self.verifier_paquet(name)?;
        self.operators.disable(name);
        self.constants.disable(name);
        Ok(())
    }

    /// Paquets connus (opérateurs et constantes confondus), triés, avec leur état.
    pub fn packs(&self) -> Vec<(String, bool)> {
        let mut etats: BTreeMap<&str, bool> = BTreeMap::new();
        for nom in self.operators.pack_names() {
            *etats.entry(nom).or_default() |= self.operators.is_enabled(nom);
        }
        for nom in self.constants.pack_names() {
            *etats.entry(nom).or_default() |= self.constants.is_enabled(nom);
        }
        etats
            .into_iter()
            .map(|(nom, actif)| (nom.to_string(), actif))
            .collect()
    }

    fn verifier_paquet(&mut self, name: &str) -> Result<(), EngineError> {
        if self.operators.has_pack(name) || self.constants.has_pack(name) {
            return Ok(());
        }
        let e = RegistryError::UnknownPack(name.to_string()).into();
        Err(self.signaler(e))
    }

    /* ------------------------ Pile ------------------------ */

    /// Feuille correspondant à un texte : nombre, constante, puis variable.
    pub fn parse_value(&self, text: &str) -> Result<Node, ParseError> {
        if let Ok((num, base)) = parse_number(text) {
            return Ok(Node::value(num, base));
        }
        if let Some(def) = self.constants.get(text) {
            return Ok(Node::constant(text, def.clone()));
        }
        if is_nom_variable(text) {
            return Ok(Node::variable(text));
        }
        Err(ParseError::InvalidVariableName(text.to_string()))
    }

    /// Pousse la saisie en cours. Ok(false) si elle était vide.
    pub fn push_pending_entry(
        &mut self,
        entry: &mut impl PendingEntry,
    ) -> Result<bool, EngineError> {
        let text = entry.take();
        match self.pousser_texte(&text) {
            Ok(pousse) => Ok(pousse),
            Err(e) => {
                restaurer_sauf_espaces(entry, text);
                Err(self.signaler(e))
            }
        }
    }

    /// Pousse la saisie en cours puis applique `symbol` aux `arity` noeuds du sommet.
    pub fn apply_operator(
        &mut self,
        entry: &mut impl PendingEntry,
        symbol: &str,
    ) -> Result<(), EngineError> {
        let Some(op) = self.operators.get(symbol).cloned() else {
            return Err(self.signaler(EngineError::UnknownOperator(symbol.to_string())));
        };

        let text = entry.take();
        let pousse = match self.pousser_texte(&text) {
            Ok(p) => p,
            Err(e) => {
                restaurer_sauf_espaces(entry, text);
                return Err(self.signaler(e));
            }
        };

        if let Err(e) = combiner(&mut self.stack, op) {
            // combiner a remis ses arguments : reste la saisie poussée par cet appel
            if pousse {
                self.stack.pop();
                entry.restore(text);
            }
            return Err(self.signaler(e));
        }
        Ok(())
    }

    /// Défait la dernière combinaison : le sommet est remplacé par ses enfants.
    pub fn unpush(&mut self) -> Result<(), EngineError> {
        let Some(sommet) = self.stack.pop() else {
            return Err(self.signaler(EngineError::EmptyStack));
        };
        debug!(enfants = sommet.children().len(), "unpush");
        for enfant in sommet.children() {
            self.stack.push(enfant.clone());
        }
        Ok(())
    }

    pub fn clear(&mut self, entry: &mut impl PendingEntry) {
        self.stack.clear();
        entry.clear();
        debug!("pile effacée");
    }

    /// Une séquence de jetons par entrée, du bas vers le sommet.
    pub fn serialize_stack(&self) -> Vec<Vec<String>> {
        self.stack
            .iter()
            .map(|n| n.serialize(&self.serialiseur))
            .collect()
    }

    /// Rejoue chaque séquence. Une séquence fautive est signalée puis ignorée ;
    /// les suivantes sont quand même chargées. Renvoie le nombre de séquences rejetées.
    pub fn deserialize_stack<S: AsRef<str>>(&mut self, sequences: &[Vec<S>]) -> usize {
        let mut rejets = 0;
        for seq in sequences {
            if let Err(e) = self.deserialize_entry(seq) {
                self.signaler(e);
                rejets += 1;
            }
        }
        rejets
    }

    /// Rejoue une séquence post-ordre et pousse l’entrée qu’elle reconstruit.
    ///
    /// La séquence est rejouée à part : elle ne voit pas la pile existante et doit
    /// produire exactement une entrée. En cas d’échec la pile n’a pas bougé et
    /// l’erreur est renvoyée sans être signalée.
    pub fn deserialize_entry<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<(), EngineError> {
        if tokens.len() > MAX_JETONS_SEQUENCE {
            return Err(EngineError::SequenceTooLong {
                len: tokens.len(),
                max: MAX_JETONS_SEQUENCE,
            });
        }

        let mut locale = Stack::new();
        for tok in tokens {
            let tok = tok.as_ref();
            match self.operators.get(tok).cloned() {
                Some(op) => combiner(&mut locale, op)?,
                None => locale.push(self.parse_value(tok)?),
            }
        }

        match locale.pop() {
            Some(entree) if locale.is_empty() => {
                self.stack.push(entree);
                Ok(())
            }
            reste => Err(EngineError::MalformedSequence {
                produced: locale.len() + usize::from(reste.is_some()),
            }),
        }
    }

    /* ------------------------ Interne (sans signalement) ------------------------ */

    fn pousser_texte(&mut self, text: &str) -> Result<bool, EngineError> {
        if text.is_empty() {
            return Ok(false);
        }
        let node = self.parse_value(text)?;
        debug!(saisie = text, "push");
        self.stack.push(node);
        Ok(true)
    }

    fn signaler(&mut self, e: EngineError) -> EngineError {
        let msg = e.to_string();
        warn!(erreur = %msg, "opération refusée");
        self.reporter.report(&msg);
        e
    }
}

/// Remplace les `arity` noeuds du sommet par l’application de `op`.
/// En cas d’échec les arguments retirés sont remis : `pile` n’a pas bougé.
fn combiner(pile: &mut Stack, op: Rc<Operator>) -> Result<(), EngineError> {
    let have = pile.len();
    let Some(args) = pile.pop_n(op.arity) else {
        return Err(EngineError::InsufficientArguments {
            have,
            need: op.arity,
            op_symbol: op.symbol.clone(),
        });
    };

    let symbole = op.symbol.clone();
    match Node::function(op, args.clone()) {
        Ok(node) => {
            debug!(op = %symbole, "opérateur appliqué");
            pile.push(node);
            Ok(())
        }
        Err(e) => {
            for a in args {
                pile.push(a);
            }
            Err(e.into())
        }
    }
}

fn is_nom_variable(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_alphanumeric())
}

fn restaurer_sauf_espaces(entry: &mut impl PendingEntry, text: String) {
    if !text.chars().any(char::is_whitespace) {
        entry.restore(text);
    }
}
