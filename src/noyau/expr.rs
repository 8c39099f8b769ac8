// src/noyau/expr.rs
//
// Arbre d’expression immuable.
// - Value    : nombre concret (+ base d’affichage)
// - Constant : nom lié à une définition fixe (pi, e)
// - Variable : symbole libre, jamais évaluable
// - Function : opérateur + enfants (arité fixe), partagé via Rc
//
// IMPORTANT :
// - Un noeud n’est jamais modifié : toute “édition” construit un nouveau noeud.
// - Function::children.len() == op.arity, garanti par Node::function (seul constructeur).
// - simplify() ne doit jamais “inventer” une valeur pour une Variable.

use std::fmt;
use std::rc::Rc;

use num_complex::Complex64;

use super::erreurs::EvalError;
use super::format::Renderer;
use super::nombre::{Base, Num};

/* ------------------------ Définition d’opérateur ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fixity {
    Function,
    Prefix,
    Infix,
    Postfix,
}

/// Fonction pure : `arity` arguments évalués -> un résultat.
pub type OpFn = fn(&[Num]) -> Result<Num, EvalError>;

#[derive(Clone)]
pub struct Operator {
    pub symbol: String,
    pub fixity: Fixity,
    pub arity: usize,
    /// Some(b) : opérateur de conversion de base, impose b à son résultat.
    pub base: Option<Base>,
    pub apply: OpFn,
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("symbol", &self.symbol)
            .field("fixity", &self.fixity)
            .field("arity", &self.arity)
            .field("base", &self.base)
            .finish()
    }
}

impl Operator {
    pub fn new(symbol: &str, fixity: Fixity, arity: usize, apply: OpFn) -> Self {
        Self {
            symbol: symbol.to_string(),
            fixity,
            arity,
            base: None,
            apply,
        }
    }

    /// hex / oct / dec : identité sur la valeur, change la base d’affichage.
    pub fn base_conversion(symbol: &str, base: Base) -> Self {
        Self {
            symbol: symbol.to_string(),
            fixity: Fixity::Function,
            arity: 1,
            base: Some(base),
            apply: |a| super::nombre::identity(&a[0]),
        }
    }

    pub fn call(&self, args: &[Num]) -> Result<Num, EvalError> {
        if args.len() != self.arity {
            return Err(EvalError::Arity {
                symbol: self.symbol.clone(),
                expected: self.arity,
                got: args.len(),
            });
        }
        (self.apply)(args)
    }
}

/* ------------------------ Noeuds ------------------------ */

#[derive(Clone, Debug)]
pub enum Node {
    Value { num: Num, base: Base },
    Constant { name: String, definition: Num },
    Variable { name: String },
    Function(Rc<Call>),
}

#[derive(Debug)]
pub struct Call {
    op: Rc<Operator>,
    children: Vec<Node>,
}

impl Call {
    pub fn op(&self) -> &Operator {
        &self.op
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        use Node::*;
        match (self, other) {
            (Value { num: a, base: ba }, Value { num: b, base: bb }) => a == b && ba == bb,
            (Constant { name: a, .. }, Constant { name: b, .. }) => a == b,
            (Variable { name: a }, Variable { name: b }) => a == b,
            (Function(a), Function(b)) => {
                Rc::ptr_eq(a, b)
                    || (a.op.symbol == b.op.symbol
                        && a.op.arity == b.op.arity
                        && a.children == b.children)
            }
            _ => false,
        }
    }
}

impl Node {
    /// Feuille concrète. Réels et complexes sont toujours affichés en base 10.
    pub fn value(num: Num, base: Base) -> Node {
        let base = if num.is_int() { base } else { Base::Dec };
        Node::Value { num, base }
    }

    pub fn constant(name: &str, definition: Num) -> Node {
        Node::Constant {
            name: name.to_string(),
            definition,
        }
    }

    pub fn variable(name: &str) -> Node {
        Node::Variable {
            name: name.to_string(),
        }
    }

    /// Construit un noeud fonction.
    ///
    /// Échoue si l’arité ne correspond pas, ou si le noeud est entièrement concret
    /// et que son évaluation lève une erreur de domaine (ex: 1/0, asin(2)).
    /// Une variable libre n’empêche jamais la construction.
    pub fn function(op: Rc<Operator>, children: Vec<Node>) -> Result<Node, EvalError> {
        if children.len() != op.arity {
            return Err(EvalError::Arity {
                symbol: op.symbol.clone(),
                expected: op.arity,
                got: children.len(),
            });
        }

        let node = Node::Function(Rc::new(Call { op, children }));
        match node.evaluate() {
            Ok(_) | Err(EvalError::UnboundVariable(_)) => Ok(node),
            Err(e) => Err(e),
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Function(call) => &call.children,
            _ => &[],
        }
    }

    pub fn operator(&self) -> Option<&Operator> {
        match self {
            Node::Function(call) => Some(&call.op),
            _ => None,
        }
    }

    /// Base d’affichage : imposée par un opérateur de conversion, sinon héritée du 1er enfant.
    pub fn base(&self) -> Base {
        match self {
            Node::Value { base, .. } => *base,
            Node::Constant { .. } | Node::Variable { .. } => Base::Dec,
            Node::Function(call) => call
                .op
                .base
                .or_else(|| call.children.first().map(Node::base))
                .unwrap_or(Base::Dec),
        }
    }

    pub fn evaluate(&self) -> Result<Num, EvalError> {
        match self {
            Node::Value { num, .. } => Ok(num.clone()),
            Node::Constant { definition, .. } => Ok(definition.clone()),
            Node::Variable { name } => Err(EvalError::UnboundVariable(name.clone())),
            Node::Function(call) => {
                let args = call
                    .children
                    .iter()
                    .map(Node::evaluate)
                    .collect::<Result<Vec<_>, _>>()?;
                call.op.call(&args)
            }
        }
    }

    /// Remplace tout sous-arbre concret par sa valeur ; garde la structure autour des variables.
    /// Idempotent. Ne peut pas échouer : une erreur de domaine laisse le noeud tel quel.
    pub fn simplify(&self) -> Node {
        match self {
            Node::Value { .. } | Node::Variable { .. } => self.clone(),
            Node::Constant { definition, .. } => Node::value(definition.clone(), Base::Dec),
            Node::Function(call) => {
                let enfants: Vec<Node> = call.children.iter().map(Node::simplify).collect();

                let valeurs: Option<Vec<Num>> = enfants
                    .iter()
                    .map(|e| match e {
                        Node::Value { num, .. } => Some(num.clone()),
                        _ => None,
                    })
                    .collect();

                if let Some(args) = valeurs {
                    if let Ok(res) = call.op.call(&args) {
                        return Node::value(res, self.base());
                    }
                }

                Node::Function(Rc::new(Call {
                    op: Rc::clone(&call.op),
                    children: enfants,
                }))
            }
        }
    }

    /// Affichage selon la fixité :
    /// sym(a, b) | sym a | a sym | (a sym b)
    pub fn render(&self, rendu: &Renderer) -> String {
        match self {
            Node::Value { num, base } => rendu.render(num, *base),
            Node::Constant { name, .. } | Node::Variable { name } => name.clone(),
            Node::Function(call) => {
                let args: Vec<String> = call.children.iter().map(|c| c.render(rendu)).collect();
                let sym = &call.op.symbol;
                match (call.op.fixity, args.as_slice()) {
                    (Fixity::Prefix, [a]) => format!("{sym} {a}"),
                    (Fixity::Postfix, [a]) => format!("{a} {sym}"),
                    (Fixity::Infix, [a, b]) => format!("({a} {sym} {b})"),
                    _ => format!("{sym}({})", args.join(", ")),
                }
            }
        }
    }

    /// Jetons post-ordre (enfants puis symbole) : c’est exactement l’ordre de rejeu RPN.
    pub fn serialize(&self, rendu: &Renderer) -> Vec<String> {
        let mut out = Vec::new();
        self.serialize_into(rendu, &mut out);
        out
    }

    fn serialize_into(&self, rendu: &Renderer, out: &mut Vec<String>) {
        match self {
            // complexe "plein" : partie réelle, partie imaginaire, puis "+"
            Node::Value {
                num: Num::Complex(z),
                ..
            } if z.re != 0.0 && z.im != 0.0 => {
                out.push(rendu.render_real(z.re));
                out.push(rendu.render_complex(Complex64::new(0.0, z.im)));
                out.push("+".to_string());
            }
            Node::Value { num, base } => out.push(rendu.render(num, *base)),
            Node::Constant { name, .. } | Node::Variable { name } => out.push(name.clone()),
            Node::Function(call) => {
                for enfant in &call.children {
                    enfant.serialize_into(rendu, out);
                }
                out.push(call.op.symbol.clone());
            }
        }
    }
}
