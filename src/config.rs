//! Editor configuration, loaded from `settings.json`.

use crate::editor::grid::Grid;
use crate::editor::style::EditorStyle;
use crate::graph::NodeLayout;
use anyhow::Context;
use egui::Vec2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub grid_spacing: f32,
    pub node_size: Vec2,
    pub port_size: Vec2,
    pub text_margin: f32,
    /// Maximum distance from a connection curve that still counts as a hit.
    pub connection_tolerance: f32,
    /// Two presses on the same kind of target closer than this form a double-click.
    pub double_click_seconds: f64,
    pub history_max_records: usize,
    pub style: EditorStyle,
}

impl Default for EditorConfig {
    fn default() -> Self {
        let layout = NodeLayout::default();
        Self {
            grid_spacing: 10.0,
            node_size: layout.size,
            port_size: layout.port_size,
            text_margin: layout.text_margin,
            connection_tolerance: 6.0,
            double_click_seconds: 0.3,
            history_max_records: 1000,
            style: EditorStyle::default(),
        }
    }
}

impl EditorConfig {
    /// Loads settings from the working directory, then from the user config
    /// directory, falling back to defaults.
    pub fn load() -> Self {
        for path in Self::candidate_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load_from(&path) {
                Ok(config) => {
                    log::info!("loaded settings from {}", path.display());
                    return config;
                }
                Err(e) => log::warn!("ignoring settings: {:#}", e),
            }
        }
        Self::default()
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(SETTINGS_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("story_graph").join(SETTINGS_FILE));
        }
        paths
    }

    pub fn node_layout(&self) -> NodeLayout {
        NodeLayout {
            size: self.node_size,
            port_size: self.port_size,
            text_margin: self.text_margin,
        }
    }

    pub fn grid(&self, offset: Vec2) -> Grid {
        Grid::new(self.grid_spacing).with_offset(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_fill_in_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{ "grid_spacing": 20.0 }"#).unwrap();
        assert_eq!(config.grid_spacing, 20.0);
        assert_eq!(config.node_size, Vec2::new(200.0, 37.0));
        assert_eq!(config.style, EditorStyle::default());
    }

    #[test]
    fn settings_survive_a_save_and_load() {
        let path = std::env::temp_dir().join(format!("story_graph_{}.json", uuid::Uuid::new_v4()));
        let config = EditorConfig {
            double_click_seconds: 0.5,
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        let loaded = EditorConfig::load_from(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join("story_graph_missing_settings.json");
        assert!(EditorConfig::load_from(&path).is_err());
    }
}
