// src/app/vue.rs
//
// Vue texte
// ---------
// Après chaque ligne :
// - erreurs en attente, une par ligne ("erreur: <msg>"), dans l’ordre d’arrivée
// - saisie restée en attente (après un refus) : "\t> <saisie>"
// - sommet de pile : "\t= <équation>" puis "\t~= <forme simplifiée>"
//
// `:stack` affiche en plus toute la pile, du bas vers le sommet.
// `:packs` liste les paquets connus : "<nom> (actif)" / "<nom> (inactif)".

use super::etat::AppCalc;

impl AppCalc {
    /// Lignes à afficher après une action ; vide la file d’erreurs.
    pub fn lignes_vue(&mut self, pile_complete: bool) -> Vec<String> {
        let mut out: Vec<String> = self
            .erreurs_mut()
            .drain()
            .into_iter()
            .map(|m| format!("erreur: {m}"))
            .collect();

        if !self.entree.is_empty() {
            out.push(format!("\t> {}", self.entree));
        }

        let rendu = self.rendu();
        let pile = self.moteur().stack();

        if pile_complete {
            for (i, n) in pile.iter().enumerate() {
                out.push(format!("{i}: {}", n.render(rendu)));
            }
        }

        if let Some(sommet) = pile.peek() {
            out.push(format!("\t= {}", sommet.render(rendu)));
            out.push(format!("\t~= {}", sommet.simplify().render(rendu)));
        }
        out
    }

    pub fn lignes_paquets(&self) -> Vec<String> {
        self.moteur()
            .packs()
            .into_iter()
            .map(|(nom, actif)| {
                let etat = if actif { "actif" } else { "inactif" };
                format!("{nom} ({etat})")
            })
            .collect()
    }
}
