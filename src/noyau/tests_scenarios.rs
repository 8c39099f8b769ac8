//! Tests scénarios : séquences de touches réelles, du point de vue de l’utilisateur.
//!
//! Chaque test rejoue une saisie (pousser / appliquer / défaire) et vérifie
//! la pile, le rendu et les messages signalés.

use pretty_assertions::assert_eq;

use super::erreurs::{EngineError, ParseError};
use super::format::Renderer;
use super::nombre::{parse_number, Base, Num};
use super::rpn::RpnEngine;

type Moteur = RpnEngine<Vec<String>>;

fn moteur() -> Moteur {
    RpnEngine::with_default_packs(Vec::new())
}

/// Rejoue une ligne de jetons comme au clavier : opérateur => appliquer, sinon pousser.
fn taper(m: &mut Moteur, ligne: &str) {
    let mut saisie = String::new();
    for t in ligne.split_whitespace() {
        if m.operators().contains(t) {
            m.apply_operator(&mut saisie, t)
                .unwrap_or_else(|e| panic!("ligne={ligne:?} jeton={t:?} err={e}"));
        } else {
            saisie = t.to_string();
            m.push_pending_entry(&mut saisie)
                .unwrap_or_else(|e| panic!("ligne={ligne:?} jeton={t:?} err={e}"));
        }
    }
}

fn pile_rendue(m: &Moteur) -> Vec<String> {
    let r = Renderer::default();
    m.stack().iter().map(|n| n.render(&r)).collect()
}

fn sommet(m: &Moteur) -> Num {
    m.stack()
        .peek()
        .expect("pile vide")
        .evaluate()
        .unwrap_or_else(|e| panic!("évaluation: {e}"))
}

/* ------------------------ Scénarios de base ------------------------ */

#[test]
fn scn_addition_rendue_puis_evaluee() {
    let mut m = moteur();
    taper(&mut m, "3 4 +");
    assert_eq!(pile_rendue(&m), vec!["(3 + 4)"]);
    assert_eq!(sommet(&m), Num::from(7));

    let simplifie = m.stack().peek().unwrap().simplify();
    assert_eq!(simplifie.render(&Renderer::default()), "7");
}

#[test]
fn scn_carre() {
    let mut m = moteur();
    taper(&mut m, "2 sq");
    assert_eq!(sommet(&m), Num::from(4));
    assert_eq!(pile_rendue(&m), vec!["sq(2)"]);
}

#[test]
fn scn_plus_sur_pile_vide() {
    let mut m = moteur();
    let mut saisie = String::new();
    assert_eq!(
        m.apply_operator(&mut saisie, "+"),
        Err(EngineError::InsufficientArguments {
            have: 0,
            need: 2,
            op_symbol: "+".into()
        })
    );
    assert!(m.stack().is_empty());
    assert_eq!(m.reporter_mut().len(), 1);
}

#[test]
fn scn_unpush_restaure_l_ordre() {
    let mut m = moteur();
    taper(&mut m, "3 4 +");
    m.unpush().unwrap();
    assert_eq!(pile_rendue(&m), vec!["3", "4"]);
}

#[test]
fn scn_hexadecimal() {
    assert_eq!(parse_number("0x1F"), Ok((Num::from(31), Base::Hex)));

    let mut m = moteur();
    taper(&mut m, "0x1F");
    assert_eq!(pile_rendue(&m), vec!["0x1f"]);
}

#[test]
fn scn_espace_dans_la_saisie() {
    let mut m = moteur();
    taper(&mut m, "1");

    let mut saisie = " 2".to_string();
    assert_eq!(
        m.push_pending_entry(&mut saisie),
        Err(EngineError::Parse(ParseError::InvalidVariableName(" 2".into())))
    );
    assert!(saisie.is_empty(), "la saisie doit rester effacée");
    assert_eq!(pile_rendue(&m), vec!["1"]);
}

/* ------------------------ Scénarios étendus ------------------------ */

#[test]
fn scn_base_conservee_dans_le_calcul() {
    let mut m = moteur();
    taper(&mut m, "0x10 1 +");
    let r = Renderer::default();
    let top = m.stack().peek().unwrap();
    assert_eq!(top.render(&r), "(0x10 + 1)");
    assert_eq!(top.simplify().render(&r), "0x11");

    taper(&mut m, "dec");
    assert_eq!(m.stack().peek().unwrap().simplify().render(&r), "17");
}

#[test]
fn scn_variable_libre_simplification_partielle() {
    let mut m = moteur();
    taper(&mut m, "x 2 3 * +");
    let r = Renderer::default();
    let top = m.stack().peek().unwrap();
    assert_eq!(top.render(&r), "(x + (2 * 3))");
    assert_eq!(top.simplify().render(&r), "(x + 6)");
    assert!(top.evaluate().is_err());
}

#[test]
fn scn_fixites() {
    let mut m = moteur();
    taper(&mut m, "5 ! 6 ~ 7 abs");
    assert_eq!(pile_rendue(&m), vec!["5 !", "~ 6", "abs(7)"]);
}

#[test]
fn scn_constante_pi() {
    let mut m = moteur();
    taper(&mut m, "pi 2 /");
    assert_eq!(pile_rendue(&m), vec!["(pi / 2)"]);
    assert_eq!(sommet(&m), Num::Real(std::f64::consts::FRAC_PI_2));
}

#[test]
fn scn_domaine_refuse_sans_perte() {
    let mut m = moteur();
    taper(&mut m, "2");
    let mut saisie = String::new();
    assert!(m.apply_operator(&mut saisie, "asin").is_err());
    assert_eq!(pile_rendue(&m), vec!["2"]);
    assert_eq!(m.reporter_mut().len(), 1);
}

#[test]
fn scn_racine_negative_reelle_refusee_complexe_acceptee() {
    let mut m = moteur();
    taper(&mut m, "-4");
    let mut saisie = String::new();
    assert!(m.apply_operator(&mut saisie, "sqrt").is_err());

    taper(&mut m, "-4j sqrt");
    assert!(matches!(sommet(&m), Num::Complex(_)));
    assert_eq!(m.stack().len(), 2);
}

#[test]
fn scn_paquet_desactive() {
    let mut m = moteur();
    m.disable_pack("Computer").unwrap();
    let mut saisie = "5".to_string();
    assert_eq!(
        m.apply_operator(&mut saisie, "hex"),
        Err(EngineError::UnknownOperator("hex".into()))
    );
    m.enable_pack("Computer").unwrap();
    m.apply_operator(&mut saisie, "hex").unwrap();
    assert_eq!(pile_rendue(&m), vec!["hex(5)"]);
}

#[test]
fn scn_aller_retour_de_la_pile() {
    let mut m = moteur();
    taper(&mut m, "1 2 + x sin 0o17 2.5 -1.5e-3 * 3 ! pi");
    let sequences = m.serialize_stack();

    let mut copie = moteur();
    assert_eq!(copie.deserialize_stack(&sequences), 0);
    assert_eq!(pile_rendue(&copie), pile_rendue(&m));
}
