use crate::catalog::{Catalog, CatalogSpec};
use crate::tiebreak::TieBreak;
use anyhow::Context;
use clap::Parser;
use log::info;
use std::path::PathBuf;

/// Timetable generation server.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Address to bind the server to
    #[arg(long, env = "TIMETABLE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind the server to
    #[arg(short, long, env = "TIMETABLE_PORT", default_value_t = 8080)]
    pub port: u16,

    /// JSON file with rooms, day codes and time windows. Uses the built-in
    /// catalog when absent.
    #[arg(short, long, env = "TIMETABLE_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Fixed tie-break seed, for reproducible schedules.
    #[arg(short, long, env = "TIMETABLE_SEED")]
    pub seed: Option<u64>,
}

impl Args {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn tie_break(&self) -> TieBreak {
        self.seed.map_or(TieBreak::Entropy, TieBreak::Seeded)
    }

    pub fn load_catalog(&self) -> anyhow::Result<Catalog> {
        let Some(path) = &self.catalog else {
            info!("Using built-in catalog");
            return Ok(Catalog::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog {}", path.display()))?;
        let spec: CatalogSpec = serde_json::from_str(&text)
            .with_context(|| format!("parsing catalog {}", path.display()))?;
        let catalog = Catalog::from_spec(&spec)?;
        info!("Loaded catalog from {}", path.display());
        Ok(catalog)
    }
}
