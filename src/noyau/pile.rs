// src/noyau/pile.rs
//
// Pile d’opérandes : Vec<Node>, sommet = dernier élément.

use super::expr::Node;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stack {
    items: Vec<Node>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: Node) {
        self.items.push(node);
    }

    pub fn pop(&mut self) -> Option<Node> {
        self.items.pop()
    }

    pub fn peek(&self) -> Option<&Node> {
        self.items.last()
    }

    /// Retire les `n` noeuds du sommet, dans l’ordre de la pile (bas -> haut).
    /// None (pile intacte) s’il y en a moins de `n`.
    pub fn pop_n(&mut self, n: usize) -> Option<Vec<Node>> {
        let reste = self.items.len().checked_sub(n)?;
        Some(self.items.split_off(reste))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Du bas vers le sommet.
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a Stack {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::nombre::{Base, Num};

    fn v(n: i64) -> Node {
        Node::value(Num::from(n), Base::Dec)
    }

    #[test]
    fn pop_n_garde_l_ordre() {
        let mut p = Stack::new();
        for n in [1, 2, 3] {
            p.push(v(n));
        }
        assert_eq!(p.pop_n(2), Some(vec![v(2), v(3)]));
        assert_eq!(p.len(), 1);
        assert_eq!(p.peek(), Some(&v(1)));
    }

    #[test]
    fn pop_n_trop_grand_ne_touche_rien() {
        let mut p = Stack::new();
        p.push(v(1));
        assert_eq!(p.pop_n(2), None);
        assert_eq!(p.len(), 1);
    }
}
