use crate::error::{CorpusError, Result};
use crate::types::{PlayerProfile, RawPlayerRow};
use std::collections::HashMap;
use tracing::info;

/// Player Directory - one current profile per player id
///
/// Built from a roster table that spans several years. When a player appears
/// in more than one year the attributes from the most recent year win, so a
/// player who moved from WR to TE is reported as a TE for every season.
#[derive(Debug, Clone, Default)]
pub struct PlayerDirectory {
    /// Map from canonical player id to profile
    profiles: HashMap<String, PlayerProfile>,
}

impl PlayerDirectory {
    /// Resolve the directory from an optional roster table
    ///
    /// Position drives every cohort computation downstream, so an absent
    /// table is fatal rather than an empty directory.
    pub fn resolve(rows: Option<&[RawPlayerRow]>) -> Result<Self> {
        let rows = rows.ok_or_else(|| {
            CorpusError::MissingDirectory("no player directory table supplied".to_string())
        })?;
        Ok(Self::from_rows(rows))
    }

    /// Sort by year descending, then keep the first row per id
    pub fn from_rows(rows: &[RawPlayerRow]) -> Self {
        let mut keyed: Vec<(String, i64, &RawPlayerRow)> = rows
            .iter()
            .filter_map(|row| {
                let id = row.id.as_ref()?.as_player_id()?;
                let year = row.year.as_ref().and_then(|y| y.as_int()).unwrap_or(i64::MIN);
                Some((id, year, row))
            })
            .collect();

        // Stable sort: rows sharing a year keep their input order
        keyed.sort_by(|a, b| b.1.cmp(&a.1));

        let mut profiles = HashMap::with_capacity(keyed.len());
        for (player_id, _, row) in keyed {
            profiles.entry(player_id.clone()).or_insert_with(|| PlayerProfile {
                player_id,
                position: clean(row.position.as_deref()),
                name: clean(row.name.as_deref()),
            });
        }

        info!("Resolved {} player profiles from {} directory rows", profiles.len(), rows.len());
        Self { profiles }
    }

    /// Build directly from resolved profiles
    pub fn from_profiles(profiles: impl IntoIterator<Item = PlayerProfile>) -> Self {
        let mut map = HashMap::new();
        for profile in profiles {
            map.entry(profile.player_id.clone()).or_insert(profile);
        }
        Self { profiles: map }
    }

    /// Get a player profile by canonical id
    pub fn get(&self, player_id: &str) -> Option<&PlayerProfile> {
        self.profiles.get(player_id)
    }

    /// Position for a player, if known
    pub fn position_of(&self, player_id: &str) -> Option<&str> {
        self.get(player_id).and_then(|p| p.position.as_deref())
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn clean(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}
