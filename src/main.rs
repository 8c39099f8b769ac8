// src/main.rs
//
// Calculatrice RPN : point d’entrée (ligne de commande)
// ----------------------------------------------------
// But :
// - Options CLI (clap) par-dessus la configuration (fichier + environnement)
// - Journal (tracing) sur stderr, stdout reste réservé aux résultats
// - Historique : chargé au démarrage, enregistré à la sortie
//
// Une ligne lue = une touche : un nombre / nom à pousser, un opérateur,
// ou une commande (:unpush, :clear, :cancel, :stack, :packs, :enable <paquet>,
// :disable <paquet>, :quit).

mod app;
mod noyau;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use app::config::CalcConfig;
use app::AppCalc;
use noyau::format::FloatStyle;
use noyau::historique;

/// Calculatrice RPN : les expressions se construisent sur une pile.
#[derive(Parser, Debug)]
#[command(name = "calc", version)]
#[command(about = "Calculatrice à notation polonaise inversée", long_about = None)]
struct Args {
    /// Fichier de configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fichier d’historique (remplace celui de la configuration)
    #[arg(long)]
    history: Option<PathBuf>,

    /// Ne charge ni n’enregistre l’historique
    #[arg(long)]
    no_history: bool,

    /// Style des flottants : plain, fixed, engineering, scientific
    #[arg(long)]
    float_style: Option<FloatStyle>,

    /// Séparateur de milliers (ex: ",")
    #[arg(long)]
    separator: Option<String>,

    /// Enregistre la configuration effective (fichier --config ou par défaut) puis quitte
    #[arg(long)]
    save_config: bool,

    /// Journal détaillé (debug) sur stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_journal(verbose: bool) {
    // RUST_LOG décide, sinon WARN (DEBUG avec -v)
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("warn"))
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Options CLI par-dessus la configuration chargée.
fn appliquer_options(config: &mut CalcConfig, args: &Args) {
    if let Some(style) = args.float_style {
        config.display.float_style = style;
    }
    if let Some(sep) = &args.separator {
        config.display.group_separator = Some(sep.clone()).filter(|s| !s.is_empty());
    }
    if let Some(chemin) = &args.history {
        config.history.path = Some(chemin.clone());
    }
    if args.no_history {
        config.history.enabled = false;
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_journal(args.verbose);

    let mut config =
        CalcConfig::load(args.config.as_deref()).context("chargement de la configuration")?;
    appliquer_options(&mut config, &args);
    config.validate().context("options de la ligne de commande")?;

    if args.save_config {
        let chemin = args
            .config
            .clone()
            .or_else(CalcConfig::default_path)
            .context("aucun dossier de configuration")?;
        config
            .save_to_file(&chemin)
            .with_context(|| format!("écriture de la configuration {}", chemin.display()))?;
        info!(chemin = %chemin.display(), "configuration enregistrée");
        return Ok(());
    }

    let mut app = AppCalc::new(&config).context("initialisation de la calculatrice")?;

    let historique = config.history_path();
    if let Some(chemin) = &historique {
        historique::load(chemin, app.moteur_mut())
            .with_context(|| format!("lecture de l’historique {}", chemin.display()))?;
        // lignes rejetées : visibles tout de suite
        for l in app.lignes_vue(false) {
            println!("{l}");
        }
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    app::run(&mut app, stdin.lock(), &mut stdout).context("boucle de lecture")?;

    if let Some(chemin) = &historique {
        historique::save(chemin, app.moteur())
            .with_context(|| format!("écriture de l’historique {}", chemin.display()))?;
    }
    info!("fin de session");
    Ok(())
}
