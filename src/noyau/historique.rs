// src/noyau/historique.rs
//
// Fichier d’historique : une entrée de pile par ligne, jetons séparés par une espace.
// - load : fichier absent => rien à charger (pas une erreur)
// - save : écrase le fichier, crée les répertoires parents

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use super::rpn::{ErrorReporter, RpnEngine};

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("historique {path} : {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HistoryError {
    fn io(path: &Path, source: io::Error) -> Self {
        HistoryError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Découpe le contenu d’un fichier en séquences de jetons (lignes vides ignorées).
pub fn parse_history(contenu: &str) -> Vec<Vec<&str>> {
    contenu
        .lines()
        .filter(|l| !l.is_empty())
        .map(|l| l.split(' ').filter(|t| !t.is_empty()).collect())
        .collect()
}

pub fn format_history(sequences: &[Vec<String>]) -> String {
    let mut out = String::new();
    for seq in sequences {
        out.push_str(&seq.join(" "));
        out.push('\n');
    }
    out
}

/// Charge l’historique dans le moteur. Renvoie le nombre de lignes rejetées.
pub fn load<R: ErrorReporter>(path: &Path, engine: &mut RpnEngine<R>) -> Result<usize, HistoryError> {
    let contenu = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(chemin = %path.display(), "pas d’historique");
            return Ok(0);
        }
        Err(e) => return Err(HistoryError::io(path, e)),
    };

    let sequences = parse_history(&contenu);
    let rejets = engine.deserialize_stack(&sequences);
    info!(
        chemin = %path.display(),
        lignes = sequences.len(),
        rejets,
        "historique chargé"
    );
    Ok(rejets)
}

pub fn save<R: ErrorReporter>(path: &Path, engine: &RpnEngine<R>) -> Result<(), HistoryError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| HistoryError::io(path, e))?;
    }
    let sequences = engine.serialize_stack();
    fs::write(path, format_history(&sequences)).map_err(|e| HistoryError::io(path, e))?;
    info!(chemin = %path.display(), entrees = sequences.len(), "historique enregistré");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::format::Renderer;
    use pretty_assertions::assert_eq;

    fn moteur() -> RpnEngine<Vec<String>> {
        RpnEngine::with_default_packs(Vec::new())
    }

    fn rendus(m: &RpnEngine<Vec<String>>) -> Vec<String> {
        let r = Renderer::default();
        m.stack().iter().map(|n| n.render(&r)).collect()
    }

    #[test]
    fn fichier_absent_pile_vide() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = moteur();
        assert_eq!(load(&dir.path().join("absent"), &mut m).unwrap(), 0);
        assert!(m.stack().is_empty());
        assert!(m.reporter_mut().is_empty());
    }

    #[test]
    fn aller_retour_fichier() {
        let dir = tempfile::tempdir().unwrap();
        let chemin = dir.path().join("sous").join("historique.txt");

        let mut m = moteur();
        let mut e = String::new();
        for t in ["3", "x", "+", "0x1F", "2.5", "sin"] {
            if m.operators().contains(t) {
                m.apply_operator(&mut e, t).unwrap();
            } else {
                e = t.to_string();
                m.push_pending_entry(&mut e).unwrap();
            }
        }
        save(&chemin, &m).unwrap();
        assert_eq!(
            fs::read_to_string(&chemin).unwrap(),
            "3 x +\n0x1f\n2.5 sin\n"
        );

        let mut copie = moteur();
        assert_eq!(load(&chemin, &mut copie).unwrap(), 0);
        assert_eq!(rendus(&copie), rendus(&m));
    }

    #[test]
    fn ligne_fautive_ignoree() {
        let dir = tempfile::tempdir().unwrap();
        let chemin = dir.path().join("h.txt");
        fs::write(&chemin, "1 2 +\n\n+\n4\n").unwrap();

        let mut m = moteur();
        assert_eq!(load(&chemin, &mut m).unwrap(), 1);
        assert_eq!(rendus(&m), vec!["(1 + 2)", "4"]);
        assert_eq!(m.reporter_mut().len(), 1);
    }

    #[test]
    fn decoupage_sur_espaces() {
        assert_eq!(
            parse_history("1 2 +\n\nx\n"),
            vec![vec!["1", "2", "+"], vec!["x"]]
        );
    }
}
