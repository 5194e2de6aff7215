//! Loading and validating catalogs from JSON.

use super::data::builtin_catalog;
use super::types::Catalog;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog: {0}")]
    Io(#[from] io::Error),
    #[error("could not parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog defines no ranks")]
    NoRanks,
    #[error("duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },
    #[error("rank `{id}` has min_xp {min_xp} not below max_xp {max_xp}")]
    InvalidRankRange { id: String, min_xp: u64, max_xp: u64 },
    #[error("boss for rank `{rank}` has no tasks")]
    EmptyBossTasks { rank: String },
    #[error("{context} refers to unknown rank `{rank}`")]
    UnknownRank { context: String, rank: String },
}

impl Catalog {
    /// Parses and validates a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the content breaks one of
    /// the rules checked by [`Catalog::validate`].
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Checks the structural rules the engine relies on: at least one rank,
    /// unique ids, non-empty rank ranges, bosses with tasks and rank
    /// references that resolve.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.ranks.is_empty() {
            return Err(CatalogError::NoRanks);
        }

        ensure_unique("rank", self.ranks.iter().map(|r| r.id.as_str()))?;
        // Daily and side quests share the UI expansion map, so ids must not collide
        ensure_unique(
            "quest",
            self.daily_quests
                .iter()
                .map(|q| q.id.as_str())
                .chain(self.side_quests.iter().map(|q| q.id.as_str())),
        )?;

        for rank in &self.ranks {
            if rank.min_xp >= rank.max_xp {
                return Err(CatalogError::InvalidRankRange {
                    id: rank.id.clone(),
                    min_xp: rank.min_xp,
                    max_xp: rank.max_xp,
                });
            }
        }

        for (rank, boss) in &self.weekly_bosses {
            self.ensure_rank(rank, format!("boss `{}`", boss.id))?;
            if boss.tasks.is_empty() {
                return Err(CatalogError::EmptyBossTasks { rank: rank.clone() });
            }
        }

        for quest in &self.side_quests {
            if let Some(rank) = &quest.rank {
                self.ensure_rank(rank, format!("side quest `{}`", quest.id))?;
            }
        }

        for rank in self.rank_trials.keys() {
            self.ensure_rank(rank, "rank trial".to_string())?;
        }
        for rank in self.main_quests.keys() {
            self.ensure_rank(rank, "main quest board".to_string())?;
        }

        Ok(())
    }

    fn ensure_rank(&self, rank: &str, context: String) -> Result<(), CatalogError> {
        if self.rank(rank).is_none() {
            return Err(CatalogError::UnknownRank {
                context,
                rank: rank.to_string(),
            });
        }
        Ok(())
    }
}

fn ensure_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

/// Loads `path` if it exists, falling back to the built-in catalog when the
/// file is missing or invalid.
pub fn load_catalog_or_builtin(path: &Path) -> Catalog {
    if !path.exists() {
        return builtin_catalog();
    }
    match fs::read_to_string(path)
        .map_err(CatalogError::from)
        .and_then(|json| Catalog::from_json(&json))
    {
        Ok(catalog) => {
            log::info!("Loaded catalog override from {}", path.display());
            catalog
        }
        Err(e) => {
            log::warn!(
                "Ignoring catalog override {}: {}; using built-in catalog",
                path.display(),
                e
            );
            builtin_catalog()
        }
    }
}
