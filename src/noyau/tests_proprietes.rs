//! Tests propriétés : invariants vérifiés sur des entrées générées.
//!
//! But : balayer beaucoup de cas sans faire chauffer la machine.
//! - RNG déterministe (seed fixe)
//! - tailles bornées (profondeur de pile, nombre d’opérations)
//! - budget temps global
//! - les refus du moteur (domaine, arité) font partie du jeu : la pile doit rester intacte

use std::time::{Duration, Instant};

use num_bigint::BigInt;
use pretty_assertions::assert_eq;

use super::erreurs::EngineError;
use super::format::Renderer;
use super::nombre::{parse_number, Base, Num};
use super::rpn::RpnEngine;

type Moteur = RpnEngine<Vec<String>>;

/* ------------------------ Tirages reproductibles ------------------------ */

/// Congruence linéaire (constantes de Knuth / PCG) : une graine donne toujours
/// les mêmes saisies, un échec se rejoue donc à l’identique.
#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    /// Bits de poids fort : les bits bas d’une congruence sont peu aléatoires.
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    /// Indice dans 0..n (0 si n = 0).
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
    /// Un symbole ou une saisie parmi une liste fixe.
    fn choose<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.pick(items.len() as u32) as usize]
    }
}

/* ------------------------ Budget temps ------------------------ */

/// Une campagne qui dépasse `max` échoue au lieu de bloquer la suite de tests
/// (puissances ou factorielles géantes glissées dans une pile générée).
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("campagne trop lente : {max:?} dépassé après {:?}", start.elapsed());
    }
}

/* ------------------------ Générateurs ------------------------ */

/// Opérateurs sans risque d’explosion (pas de **, sq ni !).
const OPS_CONCRETS: &[&str] = &[
    "+", "-", "*", "/", "//", "%", "&", "|", "^", "~", "abs", "sqrt", "floor", "ceil",
    "hex", "oct", "dec", "sin", "cos", "atan",
];

fn gen_entier(rng: &mut Rng) -> String {
    let n = i64::from(rng.pick(2000)) - 1000;
    match rng.pick(4) {
        0 => format!("{:#x}", n.unsigned_abs()),
        1 => format!("{:#o}", n.unsigned_abs()),
        _ => n.to_string(),
    }
}

fn gen_feuille(rng: &mut Rng, variables: bool) -> String {
    match rng.pick(if variables { 5 } else { 4 }) {
        0 => format!("{}.{}", rng.pick(100), rng.pick(1000)),
        1 => rng.choose(&["pi", "e"]).to_string(),
        4 => rng.choose(&["x", "y", "z1"]).to_string(),
        _ => gen_entier(rng),
    }
}

/// Rejoue `pas` actions aléatoires ; les refus sont attendus et ignorés.
fn gen_pile(rng: &mut Rng, pas: usize, variables: bool) -> Moteur {
    let mut m = RpnEngine::with_default_packs(Vec::new());
    for _ in 0..pas {
        let mut saisie = String::new();
        if m.stack().len() < 2 || rng.pick(3) == 0 {
            saisie = gen_feuille(rng, variables);
            let _ = m.push_pending_entry(&mut saisie);
        } else {
            let _ = m.apply_operator(&mut saisie, rng.choose(OPS_CONCRETS));
        }
    }
    m
}

fn rendus(m: &Moteur) -> Vec<String> {
    let r = Renderer::default();
    m.stack().iter().map(|n| n.render(&r)).collect()
}

/* ------------------------ Tests ------------------------ */

#[test]
fn prop_lecture_rendu_aller_retour_entiers() {
    let t0 = Instant::now();
    let max = Duration::from_millis(250);
    let r = Renderer::default();
    let mut rng = Rng::new(0xC0FFEE_u64);

    for _ in 0..500 {
        budget(t0, max);

        let mut n = BigInt::from(rng.next_u32()) * BigInt::from(rng.next_u32());
        if rng.coin() {
            n = -n;
        }
        let base = match rng.pick(3) {
            0 => Base::Hex,
            1 => Base::Oct,
            _ => Base::Dec,
        };
        let num = Num::Int(n);
        let texte = r.render(&num, base);
        assert_eq!(parse_number(&texte), Ok((num, base)), "texte={texte:?}");
    }
}

#[test]
fn prop_lecture_rendu_aller_retour_reels() {
    let t0 = Instant::now();
    let max = Duration::from_millis(250);
    let r = Renderer::default();
    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..500 {
        budget(t0, max);

        let x = f64::from(rng.next_u32()) / f64::from(rng.pick(1_000_000) + 1)
            * if rng.coin() { -1.0 } else { 1.0 };
        let texte = r.render_real(x);
        match parse_number(&texte) {
            Ok((Num::Real(y), Base::Dec)) => assert_eq!(y, x, "texte={texte:?}"),
            autre => panic!("texte={texte:?} relu en {autre:?}"),
        }
    }
}

#[test]
fn prop_simplifier_preserve_la_valeur() {
    let t0 = Instant::now();
    let max = Duration::from_millis(400);
    let mut rng = Rng::new(0x5EED_u64);

    let mut vus = 0usize;
    for _ in 0..60 {
        budget(t0, max);

        let m = gen_pile(&mut rng, 25, false);
        for n in m.stack() {
            let attendu = n.evaluate().unwrap_or_else(|e| panic!("arbre concret: {e}"));
            assert_eq!(n.simplify().evaluate(), Ok(attendu));
            vus += 1;
        }
    }
    assert!(vus > 100, "trop peu d’arbres vus: {vus}");
}

#[test]
fn prop_simplifier_idempotent() {
    let t0 = Instant::now();
    let max = Duration::from_millis(400);
    let mut rng = Rng::new(0xFACADE_u64);

    for _ in 0..60 {
        budget(t0, max);

        let m = gen_pile(&mut rng, 25, true);
        for n in m.stack() {
            let s = n.simplify();
            assert_eq!(s.simplify(), s);
        }
    }
}

#[test]
fn prop_pile_aller_retour() {
    let t0 = Instant::now();
    let max = Duration::from_millis(400);
    let mut rng = Rng::new(0xD1CE_u64);

    for _ in 0..60 {
        budget(t0, max);

        let m = gen_pile(&mut rng, 30, true);
        let sequences = m.serialize_stack();

        let mut copie: Moteur = RpnEngine::with_default_packs(Vec::new());
        assert_eq!(copie.deserialize_stack(&sequences), 0, "{sequences:?}");
        assert_eq!(rendus(&copie), rendus(&m));
    }
}

#[test]
fn prop_arguments_insuffisants_pile_intacte() {
    let t0 = Instant::now();
    let max = Duration::from_millis(250);
    let mut rng = Rng::new(0xA11CE_u64);

    for _ in 0..200 {
        budget(t0, max);

        let mut m: Moteur = RpnEngine::with_default_packs(Vec::new());
        if rng.coin() {
            let mut saisie = gen_feuille(&mut rng, true);
            let _ = m.push_pending_entry(&mut saisie);
        }
        let avant = m.stack().clone();
        let signales = m.reporter_mut().len();

        let op = rng.choose(&["+", "*", "//", "&", "%"]);
        let mut saisie = String::new();
        match m.apply_operator(&mut saisie, op) {
            Err(EngineError::InsufficientArguments { have, need, .. }) => {
                assert_eq!((have, need), (avant.len(), 2));
            }
            autre => panic!("op={op} attendu InsufficientArguments, reçu {autre:?}"),
        }
        assert_eq!(m.stack(), &avant);
        assert_eq!(m.reporter_mut().len(), signales + 1);
    }
}
