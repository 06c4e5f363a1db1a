use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directx: Option<String>,
    #[serde(default, rename = "vcredist", skip_serializing_if = "Option::is_none")]
    pub vc_redist: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dotnet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dlls: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<DownloadLinks>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directx: Option<String>,
    #[serde(default, rename = "vcredist", skip_serializing_if = "Option::is_none")]
    pub vc_redist: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dotnet: Option<String>,
}

impl Game {
    pub fn directx_label(&self) -> &str {
        self.directx.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn dotnet_label(&self) -> &str {
        self.dotnet.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Present-but-empty joins to an empty string; only an absent list
    /// falls back to the placeholder.
    pub fn vc_redist_label(&self) -> String {
        match &self.vc_redist {
            Some(versions) => versions.join(", "),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    pub fn missing_dlls(&self) -> Option<&[String]> {
        match self.dlls.as_deref() {
            Some(dlls) if !dlls.is_empty() => Some(dlls),
            _ => None,
        }
    }
}

impl DownloadLinks {
    pub fn directx_url(&self) -> Option<&str> {
        non_empty(self.directx.as_deref())
    }

    pub fn dotnet_url(&self) -> Option<&str> {
        non_empty(self.dotnet.as_deref())
    }

    /// VC++ links in ascending key order.
    pub fn vc_redist_urls(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vc_redist
            .iter()
            .flat_map(|map| map.iter())
            .map(|(key, url)| (key.as_str(), url.as_str()))
    }
}

pub fn sort_games(games: &mut [Game]) {
    games.sort_by_cached_key(|game| game.name.to_lowercase());
}

pub fn filter_games<'a>(games: &'a [Game], query: &str) -> Vec<&'a Game> {
    if query.trim().is_empty() {
        return games.iter().collect();
    }
    let needle = query.to_lowercase();
    games
        .iter()
        .filter(|game| name_contains(game, &needle))
        .collect()
}

/// Positions in `games` that survive `filter_games`, in the same order.
pub fn filter_indices(games: &[Game], query: &str) -> Vec<usize> {
    if query.trim().is_empty() {
        return (0..games.len()).collect();
    }
    let needle = query.to_lowercase();
    games
        .iter()
        .enumerate()
        .filter(|(_, game)| name_contains(game, &needle))
        .map(|(index, _)| index)
        .collect()
}

fn name_contains(game: &Game, needle: &str) -> bool {
    game.name.to_lowercase().contains(needle)
}

pub fn find_game<'a>(games: &'a [Game], name: &str) -> Option<&'a Game> {
    let name = name.trim().to_lowercase();
    games.iter().find(|game| game.name.to_lowercase() == name)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
