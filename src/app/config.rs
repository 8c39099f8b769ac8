//! src/app/config.rs
//!
//! Configuration de la calculatrice (TOML).
//!
//! Ordre de priorité : défauts < fichier < variables d’environnement < options CLI.
//! - fichier par défaut : <config_dir>/calc/config.toml (absent => défauts)
//! - CALC_FLOAT_STYLE, CALC_SEPARATOR, CALC_HISTORY
//!
//! Contrats :
//! - Un séparateur de chiffres ne contient ni chiffre ni espace (sinon l’affichage serait ambigu).
//! - Seuls les paquets fournis peuvent être activés.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::noyau::format::{FloatStyle, RenderConfig};
use crate::noyau::paquets;
use crate::noyau::registre::{ConstantRegistry, OperatorRegistry};

const DOSSIER: &str = "calc";
const FICHIER_CONFIG: &str = "config.toml";
const FICHIER_HISTORIQUE: &str = "history.txt";

pub const ENV_FLOAT_STYLE: &str = "CALC_FLOAT_STYLE";
pub const ENV_SEPARATOR: &str = "CALC_SEPARATOR";
pub const ENV_HISTORY: &str = "CALC_HISTORY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("lecture de la configuration : {0}")]
    Io(#[from] io::Error),

    #[error("configuration TOML illisible : {0}")]
    Toml(#[from] toml::de::Error),

    #[error("écriture TOML impossible : {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("configuration invalide : {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Paquets activés au démarrage, dans l’ordre d’activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacksConfig {
    pub operators: Vec<String>,
    pub constants: Vec<String>,
}

impl Default for PacksConfig {
    fn default() -> Self {
        Self {
            operators: vec![
                paquets::BUILTIN.to_string(),
                paquets::TRIGONOMETRY.to_string(),
                paquets::COMPUTER.to_string(),
            ],
            constants: vec![paquets::BUILTIN.to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub enabled: bool,
    /// None : <data_dir>/calc/history.txt
    pub path: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalcConfig {
    pub display: RenderConfig,
    pub packs: PacksConfig,
    pub history: HistoryConfig,
}

impl CalcConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(DOSSIER).join(FICHIER_CONFIG))
    }

    /// Charge la configuration, applique l’environnement puis valide.
    ///
    /// Chemin explicite : le fichier doit exister. Chemin par défaut absent : défauts.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(p) => Self::load_from_file(p)?,
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::load_from_file(&p)?,
                _ => Self::default(),
            },
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let contenu = fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&contenu)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path.as_ref(), toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        self.apply_overrides(|cle| env::var(cle).ok())
    }

    /// Surcharges lues par `lire` (l’environnement en production).
    pub fn apply_overrides(&mut self, lire: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        if let Some(val) = lire(ENV_FLOAT_STYLE) {
            self.display.float_style = val
                .parse::<FloatStyle>()
                .map_err(ConfigError::Validation)?;
        }
        if let Some(val) = lire(ENV_SEPARATOR) {
            self.display.group_separator = Some(val).filter(|s| !s.is_empty());
        }
        if let Some(val) = lire(ENV_HISTORY) {
            self.history.path = Some(PathBuf::from(val));
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(sep) = &self.display.group_separator {
            if sep.chars().any(|c| c.is_ascii_digit() || c.is_whitespace()) {
                return Err(ConfigError::Validation(format!(
                    "séparateur « {sep} » : ni chiffre ni espace"
                )));
            }
        }

        let ops = paquets::operator_registry();
        for nom in &self.packs.operators {
            if !ops.has_pack(nom) {
                return Err(ConfigError::Validation(format!(
                    "paquet d’opérateurs inconnu : {nom}"
                )));
            }
        }
        let consts = paquets::constant_registry();
        for nom in &self.packs.constants {
            if !consts.has_pack(nom) {
                return Err(ConfigError::Validation(format!(
                    "paquet de constantes inconnu : {nom}"
                )));
            }
        }
        Ok(())
    }

    /// Registres avec les paquets configurés activés (dans l’ordre du fichier).
    pub fn registries(&self) -> ConfigResult<(OperatorRegistry, ConstantRegistry)> {
        let mut ops = paquets::operator_registry();
        for nom in &self.packs.operators {
            ops.enable(nom)
                .map_err(|e| ConfigError::Validation(e.to_string()))?;
        }
        let mut consts = paquets::constant_registry();
        for nom in &self.packs.constants {
            consts
                .enable(nom)
                .map_err(|e| ConfigError::Validation(e.to_string()))?;
        }
        Ok((ops, consts))
    }

    /// Fichier d’historique effectif ; None si l’historique est désactivé.
    pub fn history_path(&self) -> Option<PathBuf> {
        if !self.history.enabled {
            return None;
        }
        self.history
            .path
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(DOSSIER).join(FICHIER_HISTORIQUE)))
    }
}
