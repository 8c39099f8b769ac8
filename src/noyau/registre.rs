// src/noyau/registre.rs
//
// Registres alimentés par des « paquets » (opérateurs, constantes).
// - Pack<T>     : nom + enregistrements explicites (symbole -> valeur)
// - Registry<T> : paquets connus, paquets actifs, vue fusionnée
//
// La vue fusionnée est calculée à la première lecture puis gardée en cache ;
// toute activation / désactivation / ajout de paquet l’invalide.
// Recherche : correspondance exacte de la chaîne.

use std::cell::OnceCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use tracing::debug;

use super::erreurs::RegistryError;
use super::expr::Operator;
use super::nombre::Num;

#[derive(Clone, Debug)]
pub struct Pack<T> {
    name: String,
    entries: Vec<(String, T)>,
}

pub type OperatorPack = Pack<Rc<Operator>>;
pub type ConstantPack = Pack<Num>;

impl<T> Pack<T> {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Vec::new(),
        }
    }

    pub fn register(mut self, key: &str, value: T) -> Self {
        self.entries.push((key.to_string(), value));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Pack<Rc<Operator>> {
    /// Enregistre un opérateur sous son propre symbole.
    pub fn operator(self, op: Operator) -> Self {
        let symbole = op.symbol.clone();
        self.register(&symbole, Rc::new(op))
    }
}

#[derive(Debug)]
pub struct Registry<T> {
    packs: BTreeMap<String, Pack<T>>,
    enabled: Vec<String>,
    merged: OnceCell<HashMap<String, T>>,
}

pub type OperatorRegistry = Registry<Rc<Operator>>;
pub type ConstantRegistry = Registry<Num>;

impl<T: Clone> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Registry<T> {
    pub fn new() -> Self {
        Self {
            packs: BTreeMap::new(),
            enabled: Vec::new(),
            merged: OnceCell::new(),
        }
    }

    /// Ajoute (ou remplace) un paquet. Il n’est pas activé.
    pub fn add_pack(&mut self, pack: Pack<T>) {
        debug!(pack = pack.name(), entrees = pack.entries.len(), "paquet ajouté");
        self.packs.insert(pack.name.clone(), pack);
        self.invalider();
    }

    pub fn enable(&mut self, name: &str) -> Result<(), RegistryError> {
        if !self.packs.contains_key(name) {
            return Err(RegistryError::UnknownPack(name.to_string()));
        }
        if !self.is_enabled(name) {
            self.enabled.push(name.to_string());
            debug!(pack = name, "paquet activé");
        }
        self.invalider();
        Ok(())
    }

    pub fn disable(&mut self, name: &str) {
        self.enabled.retain(|n| n != name);
        debug!(pack = name, "paquet désactivé");
        self.invalider();
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.iter().any(|n| n == name)
    }

    pub fn has_pack(&self, name: &str) -> bool {
        self.packs.contains_key(name)
    }

    pub fn pack_names(&self) -> Vec<&str> {
        self.packs.keys().map(String::as_str).collect()
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.merged().get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.merged().contains_key(key)
    }

    fn invalider(&mut self) {
        self.merged.take();
    }

    /// Union des paquets actifs ; un paquet activé plus tard masque les précédents.
    fn merged(&self) -> &HashMap<String, T> {
        self.merged.get_or_init(|| {
            let mut vue = HashMap::new();
            for nom in &self.enabled {
                if let Some(pack) = self.packs.get(nom) {
                    for (cle, valeur) in &pack.entries {
                        vue.insert(cle.clone(), valeur.clone());
                    }
                }
            }
            debug!(entrees = vue.len(), "vue fusionnée reconstruite");
            vue
        })
    }
}
