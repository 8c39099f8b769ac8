// src/noyau/nombre.rs
//
// Valeurs numériques + lecture des saisies.
// - Num  : entier exact (BigInt), réel (f64), complexe (Complex64)
// - Base : 2/8/10/16, sert UNIQUEMENT à l’affichage des entiers
// - parse_number : texte -> (Num, Base), premier format qui réussit
// - noyaux numériques : promotion entier -> réel -> complexe par filtrage du variant
//
// Les erreurs de domaine remontent (EvalError::Domain), jamais de coercition silencieuse.

use num_bigint::BigInt;
use num_complex::Complex64;
use num_traits::{FromPrimitive, Signed, ToPrimitive, Zero};

use super::erreurs::{EvalError, ParseError};

/// Garde-fou : taille max (en bits) d’un résultat de puissance entière.
const MAX_BITS_PUISSANCE: u64 = 1 << 20;

/// Garde-fou : factorielle bornée (anti-gel).
const MAX_FACTORIELLE: u64 = 20_000;

#[derive(Clone, Debug, PartialEq)]
pub enum Num {
    Int(BigInt),
    Real(f64),
    Complex(Complex64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Base {
    Bin,
    Oct,
    Dec,
    Hex,
}

impl Base {
    pub fn radix(self) -> u32 {
        match self {
            Base::Bin => 2,
            Base::Oct => 8,
            Base::Dec => 10,
            Base::Hex => 16,
        }
    }

    /// Préfixe reconnu en tête de saisie (sensible à la casse, comme à l’écran).
    fn depuis_prefixe(text: &str) -> Option<Base> {
        match text.get(..2)? {
            "0x" => Some(Base::Hex),
            "0o" => Some(Base::Oct),
            "0b" => Some(Base::Bin),
            _ => None,
        }
    }
}

impl From<i64> for Num {
    fn from(n: i64) -> Self {
        Num::Int(BigInt::from(n))
    }
}

impl From<f64> for Num {
    fn from(x: f64) -> Self {
        Num::Real(x)
    }
}

impl From<Complex64> for Num {
    fn from(z: Complex64) -> Self {
        Num::Complex(z)
    }
}

impl Num {
    pub fn is_int(&self) -> bool {
        matches!(self, Num::Int(_))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Num::Int(n) => n.is_zero(),
            Num::Real(x) => *x == 0.0,
            Num::Complex(z) => z.is_zero(),
        }
    }

    pub fn as_real(&self) -> Result<f64, EvalError> {
        match self {
            Num::Int(n) => n
                .to_f64()
                .filter(|x| x.is_finite())
                .ok_or_else(|| EvalError::domaine("entier trop grand pour un flottant")),
            Num::Real(x) => Ok(*x),
            Num::Complex(_) => Err(EvalError::domaine("argument complexe non supporté")),
        }
    }

    pub fn as_complex(&self) -> Result<Complex64, EvalError> {
        match self {
            Num::Complex(z) => Ok(*z),
            _ => Ok(Complex64::new(self.as_real()?, 0.0)),
        }
    }

    fn as_int(&self, op: &str) -> Result<&BigInt, EvalError> {
        match self {
            Num::Int(n) => Ok(n),
            _ => Err(EvalError::domaine(format!("{op} : entier attendu"))),
        }
    }
}

/* ------------------------ Lecture des saisies ------------------------ */

/// Lit un nombre saisi. Ordre (premier succès gagne) :
/// 1) entier préfixé 0x / 0o / 0b (signe '-' accepté devant : "-0x1f", forme affichée)
/// 2) entier décimal ("010" => 10)
/// 3) flottant
/// 4) complexe (a, bj, a+bj, a-bj, éventuellement entre parenthèses)
///
/// Tout espace fait échouer la lecture.
pub fn parse_number(text: &str) -> Result<(Num, Base), ParseError> {
    let (negatif, corps) = match text.strip_prefix('-') {
        Some(reste) => (true, reste),
        None => (false, text),
    };
    if let Some(base) = Base::depuis_prefixe(corps) {
        let chiffres = &corps[2..];
        if !chiffres.starts_with(['+', '-']) {
            if let Some(n) = parse_entier(chiffres, base.radix()) {
                return Ok((Num::Int(if negatif { -n } else { n }), base));
            }
        }
    }

    if let Some(n) = parse_entier(text, 10) {
        return Ok((Num::Int(n), Base::Dec));
    }

    if let Ok(x) = text.parse::<f64>() {
        return Ok((Num::Real(x), Base::Dec));
    }

    if let Some(z) = parse_complexe(text) {
        return Ok((Num::Complex(z), Base::Dec));
    }

    Err(ParseError::CannotParseNumber(text.to_string()))
}

fn parse_entier(text: &str, radix: u32) -> Option<BigInt> {
    if text.is_empty() || text.contains(|c: char| c.is_whitespace() || c == '_') {
        return None;
    }
    BigInt::parse_bytes(text.as_bytes(), radix)
}

fn parse_complexe(text: &str) -> Option<Complex64> {
    let s = text
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(text);
    if s.is_empty() || s.contains(char::is_whitespace) {
        return None;
    }

    let Some(sans_j) = s.strip_suffix('j').or_else(|| s.strip_suffix('J')) else {
        return s.parse::<f64>().ok().map(|re| Complex64::new(re, 0.0));
    };

    // séparateur réel/imaginaire : dernier signe qui n’est ni en tête ni après un exposant
    let octets = sans_j.as_bytes();
    let coupe = (1..octets.len())
        .rev()
        .find(|&i| matches!(octets[i], b'+' | b'-') && !matches!(octets[i - 1], b'e' | b'E'));

    let (re_txt, im_txt) = match coupe {
        Some(i) => (&sans_j[..i], &sans_j[i..]),
        None => ("", sans_j),
    };

    let re = if re_txt.is_empty() {
        0.0
    } else {
        re_txt.parse::<f64>().ok()?
    };
    let im = match im_txt {
        "" | "+" => 1.0,
        "-" => -1.0,
        t => t.parse::<f64>().ok()?,
    };
    Some(Complex64::new(re, im))
}

/* ------------------------ Promotion ------------------------ */

enum Paire<'a> {
    Entiers(&'a BigInt, &'a BigInt),
    Reels(f64, f64),
    Complexes(Complex64, Complex64),
}

fn promouvoir<'a>(a: &'a Num, b: &'a Num) -> Result<Paire<'a>, EvalError> {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => Ok(Paire::Entiers(x, y)),
        (Num::Complex(_), _) | (_, Num::Complex(_)) => {
            Ok(Paire::Complexes(a.as_complex()?, b.as_complex()?))
        }
        _ => Ok(Paire::Reels(a.as_real()?, b.as_real()?)),
    }
}

/* ------------------------ Arithmétique ------------------------ */

pub fn add(a: &Num, b: &Num) -> Result<Num, EvalError> {
    Ok(match promouvoir(a, b)? {
        Paire::Entiers(x, y) => Num::Int(x + y),
        Paire::Reels(x, y) => reel_verifie("+", x, y, x + y)?,
        Paire::Complexes(x, y) => Num::Complex(x + y),
    })
}

pub fn sub(a: &Num, b: &Num) -> Result<Num, EvalError> {
    Ok(match promouvoir(a, b)? {
        Paire::Entiers(x, y) => Num::Int(x - y),
        Paire::Reels(x, y) => reel_verifie("-", x, y, x - y)?,
        Paire::Complexes(x, y) => Num::Complex(x - y),
    })
}

pub fn mul(a: &Num, b: &Num) -> Result<Num, EvalError> {
    Ok(match promouvoir(a, b)? {
        Paire::Entiers(x, y) => Num::Int(x * y),
        Paire::Reels(x, y) => reel_verifie("*", x, y, x * y)?,
        Paire::Complexes(x, y) => Num::Complex(x * y),
    })
}

/// Division « vraie » : jamais entière (3/2 = 1.5).
pub fn div(a: &Num, b: &Num) -> Result<Num, EvalError> {
    if b.is_zero() {
        return Err(EvalError::domaine("division par zéro"));
    }
    Ok(match promouvoir(a, b)? {
        Paire::Entiers(_, _) => {
            let (x, y) = (a.as_real()?, b.as_real()?);
            reel_verifie("/", x, y, x / y)?
        }
        Paire::Reels(x, y) => reel_verifie("/", x, y, x / y)?,
        Paire::Complexes(x, y) => Num::Complex(x / y),
    })
}

pub fn pow(a: &Num, b: &Num) -> Result<Num, EvalError> {
    match promouvoir(a, b)? {
        Paire::Entiers(x, y) => {
            if y.is_negative() {
                if x.is_zero() {
                    return Err(EvalError::domaine("zéro élevé à une puissance négative"));
                }
                return Ok(Num::Real(a.as_real()?.powf(b.as_real()?)));
            }
            let e = y
                .to_u32()
                .ok_or_else(|| EvalError::domaine("exposant trop grand"))?;
            if x.bits() > 1 && x.bits().saturating_mul(u64::from(e)) > MAX_BITS_PUISSANCE {
                return Err(EvalError::domaine("résultat trop grand"));
            }
            Ok(Num::Int(x.pow(e)))
        }
        Paire::Reels(x, y) => {
            if x == 0.0 && y < 0.0 {
                return Err(EvalError::domaine("zéro élevé à une puissance négative"));
            }
            if x < 0.0 && y.fract() != 0.0 {
                // base négative, exposant fractionnaire : résultat complexe
                return Ok(Num::Complex(
                    Complex64::new(x, 0.0).powc(Complex64::new(y, 0.0)),
                ));
            }
            reel_verifie("**", x, y, x.powf(y))
        }
        Paire::Complexes(x, y) => {
            if y.is_zero() {
                return Ok(Num::Complex(Complex64::new(1.0, 0.0)));
            }
            if x.is_zero() {
                if y.im != 0.0 || y.re < 0.0 {
                    return Err(EvalError::domaine(
                        "zéro élevé à une puissance négative ou complexe",
                    ));
                }
                return Ok(Num::Complex(Complex64::zero()));
            }
            Ok(Num::Complex(x.powc(y)))
        }
    }
}

/// Opération sur deux réels finis : un résultat NaN ou infini est un dépassement.
fn reel_verifie(op: &str, x: f64, y: f64, res: f64) -> Result<Num, EvalError> {
    if x.is_finite() && y.is_finite() && !res.is_finite() {
        return Err(EvalError::domaine(format!("{op} : dépassement")));
    }
    Ok(Num::Real(res))
}

/// Division entière « plancher » (le quotient est arrondi vers -∞).
pub fn floor_div(a: &Num, b: &Num) -> Result<Num, EvalError> {
    if b.is_zero() {
        return Err(EvalError::domaine("division entière par zéro"));
    }
    match promouvoir(a, b)? {
        Paire::Entiers(x, y) => Ok(Num::Int(div_plancher_bigint(x, y))),
        Paire::Reels(x, y) => reel_verifie("//", x, y, (x / y).floor()),
        Paire::Complexes(_, _) => Err(EvalError::domaine("pas de division entière complexe")),
    }
}

/// Modulo avec le signe du diviseur (-7 % 3 = 2, 7 % -3 = -2).
pub fn modulo(a: &Num, b: &Num) -> Result<Num, EvalError> {
    if b.is_zero() {
        return Err(EvalError::domaine("modulo par zéro"));
    }
    match promouvoir(a, b)? {
        Paire::Entiers(x, y) => Ok(Num::Int(mod_plancher_bigint(x, y))),
        Paire::Reels(x, y) => {
            let mut r = x % y;
            if r != 0.0 && (r < 0.0) != (y < 0.0) {
                r += y;
            }
            Ok(Num::Real(r))
        }
        Paire::Complexes(_, _) => Err(EvalError::domaine("pas de modulo complexe")),
    }
}

fn div_plancher_bigint(x: &BigInt, y: &BigInt) -> BigInt {
    let q = x / y;
    let r = x % y;
    if !r.is_zero() && (r.is_negative() != y.is_negative()) {
        q - 1u32
    } else {
        q
    }
}

fn mod_plancher_bigint(x: &BigInt, y: &BigInt) -> BigInt {
    let r = x % y;
    if !r.is_zero() && (r.is_negative() != y.is_negative()) {
        r + y
    } else {
        r
    }
}

/* ------------------------ Opérations binaires (entiers seulement) ------------------------ */

pub fn bit_and(a: &Num, b: &Num) -> Result<Num, EvalError> {
    Ok(Num::Int(a.as_int("&")? & b.as_int("&")?))
}

pub fn bit_or(a: &Num, b: &Num) -> Result<Num, EvalError> {
    Ok(Num::Int(a.as_int("|")? | b.as_int("|")?))
}

pub fn bit_xor(a: &Num, b: &Num) -> Result<Num, EvalError> {
    Ok(Num::Int(a.as_int("^")? ^ b.as_int("^")?))
}

/// Complément à deux : ~x = -x - 1
pub fn bit_not(a: &Num) -> Result<Num, EvalError> {
    Ok(Num::Int(!a.as_int("~")?.clone()))
}

/* ------------------------ Fonctions unaires ------------------------ */

pub fn abs(a: &Num) -> Result<Num, EvalError> {
    Ok(match a {
        Num::Int(n) => Num::Int(n.abs()),
        Num::Real(x) => Num::Real(x.abs()),
        Num::Complex(z) => Num::Real(z.norm()),
    })
}

pub fn sq(a: &Num) -> Result<Num, EvalError> {
    mul(a, a)
}

pub fn sqrt(a: &Num) -> Result<Num, EvalError> {
    match a {
        Num::Complex(z) => Ok(Num::Complex(z.sqrt())),
        _ => {
            let x = a.as_real()?;
            if x < 0.0 {
                return Err(EvalError::domaine("racine carrée d'un négatif"));
            }
            Ok(Num::Real(x.sqrt()))
        }
    }
}

pub fn factorial(a: &Num) -> Result<Num, EvalError> {
    let n = a.as_int("!")?;
    if n.is_negative() {
        return Err(EvalError::domaine("factorielle d'un négatif"));
    }
    let n = n
        .to_u64()
        .filter(|&n| n <= MAX_FACTORIELLE)
        .ok_or_else(|| EvalError::domaine("factorielle trop grande"))?;
    let acc = (2..=n).fold(BigInt::from(1u32), |acc, k| acc * k);
    Ok(Num::Int(acc))
}

pub fn ceil(a: &Num) -> Result<Num, EvalError> {
    arrondi(a, "ceil", f64::ceil)
}

pub fn floor(a: &Num) -> Result<Num, EvalError> {
    arrondi(a, "floor", f64::floor)
}

fn arrondi(a: &Num, nom: &str, f: fn(f64) -> f64) -> Result<Num, EvalError> {
    match a {
        Num::Int(n) => Ok(Num::Int(n.clone())),
        Num::Real(x) => BigInt::from_f64(f(*x))
            .map(Num::Int)
            .ok_or_else(|| EvalError::domaine(format!("{nom} : valeur non finie"))),
        Num::Complex(_) => Err(EvalError::domaine(format!("{nom} : argument complexe"))),
    }
}

/// Conversion de base : la valeur ne change pas, seul l’affichage change.
pub fn identity(a: &Num) -> Result<Num, EvalError> {
    Ok(a.clone())
}

/* ------------------------ Transcendantes (réel ou complexe) ------------------------ */

/// Choisit la version réelle ou complexe selon le variant de l’argument.
pub fn real_or_complex(
    a: &Num,
    nom: &str,
    reel: fn(f64) -> f64,
    complexe: fn(Complex64) -> Complex64,
) -> Result<Num, EvalError> {
    match a {
        Num::Complex(z) => Ok(Num::Complex(complexe(*z))),
        _ => {
            let x = a.as_real()?;
            verifier_reel(nom, x, reel(x))
        }
    }
}

/// Toujours dans le domaine complexe (asinh, acosh, atanh).
pub fn complex_only(a: &Num, complexe: fn(Complex64) -> Complex64) -> Result<Num, EvalError> {
    Ok(Num::Complex(complexe(a.as_complex()?)))
}

pub fn real_only(a: &Num, nom: &str, reel: fn(f64) -> f64) -> Result<Num, EvalError> {
    if let Num::Complex(_) = a {
        return Err(EvalError::domaine(format!("{nom} : argument complexe")));
    }
    let x = a.as_real()?;
    verifier_reel(nom, x, reel(x))
}

fn verifier_reel(nom: &str, arg: f64, res: f64) -> Result<Num, EvalError> {
    if res.is_nan() && !arg.is_nan() {
        return Err(EvalError::domaine(format!("{nom}({arg}) hors domaine")));
    }
    if res.is_infinite() && arg.is_finite() {
        return Err(EvalError::domaine(format!("{nom}({arg}) : dépassement")));
    }
    Ok(Num::Real(res))
}
