// src/noyau/paquets.rs
//
// Paquets fournis avec la calculatrice, enregistrés explicitement (pas de découverte).
// - Builtin      : + - * / ** abs sq sqrt !
// - Trigonometry : exp log, trig directe/inverse/hyperbolique, deg rad
// - Computer     : hex oct dec, ceil floor, // % & | ^ ~
// - constantes Builtin : pi, e

use num_complex::Complex64;

use super::expr::{Fixity, Operator};
use super::nombre::{self as n, Base, Num};
use super::registre::{ConstantPack, ConstantRegistry, OperatorPack, OperatorRegistry};

pub const BUILTIN: &str = "Builtin";
pub const TRIGONOMETRY: &str = "Trigonometry";
pub const COMPUTER: &str = "Computer";

pub fn builtin() -> OperatorPack {
    use Fixity::*;

    OperatorPack::new(BUILTIN)
        .operator(Operator::new("+", Infix, 2, |a| n::add(&a[0], &a[1])))
        .operator(Operator::new("-", Infix, 2, |a| n::sub(&a[0], &a[1])))
        .operator(Operator::new("*", Infix, 2, |a| n::mul(&a[0], &a[1])))
        .operator(Operator::new("/", Infix, 2, |a| n::div(&a[0], &a[1])))
        .operator(Operator::new("**", Infix, 2, |a| n::pow(&a[0], &a[1])))
        .operator(Operator::new("abs", Function, 1, |a| n::abs(&a[0])))
        .operator(Operator::new("sq", Function, 1, |a| n::sq(&a[0])))
        .operator(Operator::new("sqrt", Function, 1, |a| n::sqrt(&a[0])))
        .operator(Operator::new("!", Postfix, 1, |a| n::factorial(&a[0])))
}

pub fn trigonometry() -> OperatorPack {
    use Fixity::Function;

    OperatorPack::new(TRIGONOMETRY)
        .operator(Operator::new("exp", Function, 1, |a| {
            n::real_or_complex(&a[0], "exp", f64::exp, Complex64::exp)
        }))
        .operator(Operator::new("log", Function, 1, |a| {
            n::real_or_complex(&a[0], "log", f64::ln, Complex64::ln)
        }))
        .operator(Operator::new("sin", Function, 1, |a| {
            n::real_or_complex(&a[0], "sin", f64::sin, Complex64::sin)
        }))
        .operator(Operator::new("cos", Function, 1, |a| {
            n::real_or_complex(&a[0], "cos", f64::cos, Complex64::cos)
        }))
        .operator(Operator::new("tan", Function, 1, |a| {
            n::real_or_complex(&a[0], "tan", f64::tan, Complex64::tan)
        }))
        .operator(Operator::new("asin", Function, 1, |a| {
            n::real_or_complex(&a[0], "asin", f64::asin, Complex64::asin)
        }))
        .operator(Operator::new("acos", Function, 1, |a| {
            n::real_or_complex(&a[0], "acos", f64::acos, Complex64::acos)
        }))
        .operator(Operator::new("atan", Function, 1, |a| {
            n::real_or_complex(&a[0], "atan", f64::atan, Complex64::atan)
        }))
        .operator(Operator::new("sinh", Function, 1, |a| {
            n::real_or_complex(&a[0], "sinh", f64::sinh, Complex64::sinh)
        }))
        .operator(Operator::new("cosh", Function, 1, |a| {
            n::real_or_complex(&a[0], "cosh", f64::cosh, Complex64::cosh)
        }))
        .operator(Operator::new("tanh", Function, 1, |a| {
            n::real_or_complex(&a[0], "tanh", f64::tanh, Complex64::tanh)
        }))
        // réciproques hyperboliques : toujours en complexe
        .operator(Operator::new("asinh", Function, 1, |a| {
            n::complex_only(&a[0], Complex64::asinh)
        }))
        .operator(Operator::new("acosh", Function, 1, |a| {
            n::complex_only(&a[0], Complex64::acosh)
        }))
        .operator(Operator::new("atanh", Function, 1, |a| {
            n::complex_only(&a[0], Complex64::atanh)
        }))
        .operator(Operator::new("deg", Function, 1, |a| {
            n::real_only(&a[0], "deg", f64::to_degrees)
        }))
        .operator(Operator::new("rad", Function, 1, |a| {
            n::real_only(&a[0], "rad", f64::to_radians)
        }))
}

pub fn computer() -> OperatorPack {
    use Fixity::*;

    OperatorPack::new(COMPUTER)
        .operator(Operator::base_conversion("hex", Base::Hex))
        .operator(Operator::base_conversion("oct", Base::Oct))
        .operator(Operator::base_conversion("dec", Base::Dec))
        .operator(Operator::new("ceil", Function, 1, |a| n::ceil(&a[0])))
        .operator(Operator::new("floor", Function, 1, |a| n::floor(&a[0])))
        .operator(Operator::new("//", Infix, 2, |a| n::floor_div(&a[0], &a[1])))
        .operator(Operator::new("%", Infix, 2, |a| n::modulo(&a[0], &a[1])))
        .operator(Operator::new("&", Infix, 2, |a| n::bit_and(&a[0], &a[1])))
        .operator(Operator::new("|", Infix, 2, |a| n::bit_or(&a[0], &a[1])))
        .operator(Operator::new("^", Infix, 2, |a| n::bit_xor(&a[0], &a[1])))
        .operator(Operator::new("~", Prefix, 1, |a| n::bit_not(&a[0])))
}

pub fn constants() -> ConstantPack {
    ConstantPack::new(BUILTIN)
        .register("pi", Num::Real(std::f64::consts::PI))
        .register("e", Num::Real(std::f64::consts::E))
}

/// Registre d’opérateurs connaissant tous les paquets fournis (aucun activé).
pub fn operator_registry() -> OperatorRegistry {
    let mut reg = OperatorRegistry::new();
    reg.add_pack(builtin());
    reg.add_pack(trigonometry());
    reg.add_pack(computer());
    reg
}

pub fn constant_registry() -> ConstantRegistry {
    let mut reg = ConstantRegistry::new();
    reg.add_pack(constants());
    reg
}

/// Tous les paquets fournis, activés.
pub fn default_registries() -> (OperatorRegistry, ConstantRegistry) {
    let mut ops = operator_registry();
    for nom in [BUILTIN, TRIGONOMETRY, COMPUTER] {
        // paquets ajoutés juste au-dessus : l’activation ne peut pas échouer
        let _ = ops.enable(nom);
    }
    let mut consts = constant_registry();
    let _ = consts.enable(BUILTIN);
    (ops, consts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::erreurs::EvalError;

    fn appliquer(symbole: &str, args: &[Num]) -> Result<Num, EvalError> {
        let (ops, _) = default_registries();
        let op = ops.get(symbole).unwrap_or_else(|| panic!("{symbole} absent"));
        op.call(args)
    }

    #[test]
    fn tous_les_symboles_sont_actifs() {
        let (ops, consts) = default_registries();
        for s in [
            "+", "-", "*", "/", "**", "abs", "sq", "sqrt", "!", "exp", "log", "sin", "cos", "tan",
            "asin", "acos", "atan", "sinh", "cosh", "tanh", "asinh", "acosh", "atanh", "deg",
            "rad", "hex", "oct", "dec", "ceil", "floor", "//", "%", "&", "|", "^", "~",
        ] {
            assert!(ops.contains(s), "opérateur manquant : {s}");
        }
        assert!(consts.contains("pi"));
        assert!(consts.contains("e"));
    }

    #[test]
    fn arites_et_fixites() {
        let (ops, _) = default_registries();
        let plus = ops.get("+").unwrap();
        assert_eq!((plus.arity, plus.fixity), (2, Fixity::Infix));
        let tilde = ops.get("~").unwrap();
        assert_eq!((tilde.arity, tilde.fixity), (1, Fixity::Prefix));
        let fact = ops.get("!").unwrap();
        assert_eq!((fact.arity, fact.fixity), (1, Fixity::Postfix));
        assert_eq!(ops.get("hex").unwrap().base, Some(Base::Hex));
    }

    #[test]
    fn calculs_de_base() {
        assert_eq!(appliquer("sq", &[Num::from(2)]), Ok(Num::from(4)));
        assert_eq!(appliquer("**", &[Num::from(2), Num::from(8)]), Ok(Num::from(256)));
        assert_eq!(appliquer("!", &[Num::from(6)]), Ok(Num::from(720)));
        assert_eq!(appliquer("%", &[Num::from(-7), Num::from(3)]), Ok(Num::from(2)));
        assert_eq!(appliquer("deg", &[Num::Real(std::f64::consts::PI)]), Ok(Num::Real(180.0)));
    }

    #[test]
    fn arite_verifiee_a_l_appel() {
        assert!(matches!(
            appliquer("+", &[Num::from(1)]),
            Err(EvalError::Arity { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn acosh_toujours_complexe() {
        assert!(matches!(appliquer("acosh", &[Num::from(1)]), Ok(Num::Complex(_))));
    }
}
