// src/noyau/format.rs
//
// Registre de rendu : (Num, Base) -> texte affiché.
// - Entiers : un rendu par base (table remplaçable), groupement optionnel par 3
// - Réels   : style configurable (simple, fixe, ingénieur, scientifique)
// - Complexes : "<re>+<im>j", réduit à un seul terme si l’autre vaut exactement 0
//
// Pur : la configuration est fixée à la construction, aucun état ne change ensuite.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_complex::Complex64;
use num_traits::Signed;
use serde::{Deserialize, Serialize};

use super::nombre::{Base, Num};

/// Largeur des groupes de chiffres, identique pour toutes les bases.
const LARGEUR_GROUPE: usize = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatStyle {
    #[default]
    Plain,
    Fixed,
    Engineering,
    Scientific,
}

impl FromStr for FloatStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" => Ok(FloatStyle::Plain),
            "fixed" => Ok(FloatStyle::Fixed),
            "engineering" | "eng" => Ok(FloatStyle::Engineering),
            "scientific" | "sci" => Ok(FloatStyle::Scientific),
            autre => Err(format!("style de flottant inconnu : {autre}")),
        }
    }
}

impl fmt::Display for FloatStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FloatStyle::Plain => "plain",
            FloatStyle::Fixed => "fixed",
            FloatStyle::Engineering => "engineering",
            FloatStyle::Scientific => "scientific",
        };
        f.write_str(s)
    }
}

/// Options reconnues par le rendu.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub float_style: FloatStyle,
    #[serde(default)]
    pub group_separator: Option<String>,
}

pub type IntRenderer = fn(&BigInt, Option<&str>) -> String;

#[derive(Clone)]
pub struct Renderer {
    entiers: BTreeMap<Base, IntRenderer>,
    float_style: FloatStyle,
    separateur: Option<String>,
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("bases", &self.entiers.keys().collect::<Vec<_>>())
            .field("float_style", &self.float_style)
            .field("separateur", &self.separateur)
            .finish()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new(RenderConfig::default())
    }
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            entiers: BTreeMap::new(),
            float_style: config.float_style,
            separateur: config.group_separator.filter(|s| !s.is_empty()),
        }
        // binaire : pas de rendu dédié, il passe par l’hexadécimal
        .with_int_renderer(Base::Bin, render_int_hex)
        .with_int_renderer(Base::Oct, render_int_oct)
        .with_int_renderer(Base::Dec, render_int_dec)
        .with_int_renderer(Base::Hex, render_int_hex)
    }

    /// Remplace le rendu des entiers d’une base.
    pub fn with_int_renderer(mut self, base: Base, rendu: IntRenderer) -> Self {
        self.entiers.insert(base, rendu);
        self
    }

    pub fn render(&self, num: &Num, base: Base) -> String {
        match num {
            Num::Int(n) => {
                let rendu = self
                    .entiers
                    .get(&base)
                    .copied()
                    .unwrap_or(render_int_dec as IntRenderer);
                rendu(n, self.separateur.as_deref())
            }
            Num::Real(x) => self.render_real(*x),
            Num::Complex(z) => self.render_complex(*z),
        }
    }

    pub fn render_real(&self, x: f64) -> String {
        if !x.is_finite() {
            return format_simple(x);
        }
        match self.float_style {
            FloatStyle::Plain => format_simple(x),
            FloatStyle::Fixed => format_fixe(x),
            FloatStyle::Engineering => format_ingenieur(x),
            FloatStyle::Scientific => format!("{x:e}"),
        }
    }

    pub fn render_complex(&self, z: Complex64) -> String {
        if z.re == 0.0 {
            return format!("{}j", self.render_real(z.im));
        }
        if z.im == 0.0 {
            return self.render_real(z.re);
        }
        let re = self.render_real(z.re);
        let im = self.render_real(z.im);
        if im.starts_with('-') {
            format!("{re}{im}j")
        } else {
            format!("{re}+{im}j")
        }
    }
}

/* ------------------------ Entiers ------------------------ */

fn signe(n: &BigInt) -> &'static str {
    if n.is_negative() {
        "-"
    } else {
        ""
    }
}

pub fn render_int_dec(n: &BigInt, sep: Option<&str>) -> String {
    let chiffres = n.magnitude().to_str_radix(10);
    format!("{}{}", signe(n), grouper(&chiffres, sep))
}

pub fn render_int_hex(n: &BigInt, sep: Option<&str>) -> String {
    let chiffres = n.magnitude().to_str_radix(16);
    format!("{}0x{}", signe(n), grouper(&chiffres, sep))
}

pub fn render_int_oct(n: &BigInt, sep: Option<&str>) -> String {
    let chiffres = n.magnitude().to_str_radix(8);
    format!("{}0o{}", signe(n), grouper(&chiffres, sep))
}

/// "1234567" -> "1,234,567" (groupes comptés depuis les poids faibles).
fn grouper(chiffres: &str, sep: Option<&str>) -> String {
    let Some(sep) = sep else {
        return chiffres.to_string();
    };

    let tete = chiffres.len() % LARGEUR_GROUPE;
    let mut parts: Vec<&str> = Vec::with_capacity(chiffres.len() / LARGEUR_GROUPE + 1);
    if tete > 0 {
        parts.push(&chiffres[..tete]);
    }
    let mut i = tete;
    while i < chiffres.len() {
        parts.push(&chiffres[i..i + LARGEUR_GROUPE]);
        i += LARGEUR_GROUPE;
    }
    parts.join(sep)
}

/* ------------------------ Réels ------------------------ */

/// Forme la plus courte relisible comme un réel ("1.0", "1e16", "inf").
fn format_simple(x: f64) -> String {
    format!("{x:?}")
}

/// Notation positionnelle, jamais d’exposant.
fn format_fixe(x: f64) -> String {
    let mut s = format!("{x}");
    if !s.contains('.') {
        s.push_str(".0");
    }
    s
}

/// Exposant multiple de 3 : 12345.0 -> "12.345e3", 0.01234 -> "12.34e-3".
fn format_ingenieur(x: f64) -> String {
    let sci = format!("{:e}", x.abs());
    let Some((mantisse, exp)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return sci;
    };

    let e3 = exp.div_euclid(3) * 3;
    let decalage = (exp - e3) as usize;

    let mut chiffres: String = mantisse.chars().filter(|c| *c != '.').collect();
    while chiffres.len() < decalage + 1 {
        chiffres.push('0');
    }
    let (entier, frac) = chiffres.split_at(decalage + 1);

    let signe = if x.is_sign_negative() { "-" } else { "" };
    if frac.is_empty() {
        format!("{signe}{entier}e{e3}")
    } else {
        format!("{signe}{entier}.{frac}e{e3}")
    }
}
