use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use suivy_domain::Jurisdiction;

/// Stores user-configurable preferences for roster tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    #[serde(default)]
    pub jurisdiction: Jurisdiction,
    #[serde(default = "Config::default_tax_rate_pct")]
    pub tax_rate_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened_roster: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for rosters. Defaults to `~/Documents/Rosters`.
    pub default_roster_root: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for backups. Defaults to `~/Documents/RosterBackups`.
    pub default_backup_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "fr-FR".into(),
            jurisdiction: Jurisdiction::default(),
            tax_rate_pct: Self::default_tax_rate_pct(),
            last_opened_roster: None,
            default_roster_root: None,
            default_backup_root: None,
        }
    }
}

impl Config {
    /// Standard VAT rate applied when a catalog does not override it.
    pub fn default_tax_rate_pct() -> f64 {
        20.0
    }

    pub fn resolve_default_roster_root(&self) -> PathBuf {
        if let Some(path) = &self.default_roster_root {
            return path.clone();
        }
        documents_base().join("Rosters")
    }

    pub fn resolve_default_backup_root(&self) -> PathBuf {
        if let Some(path) = &self.default_backup_root {
            return path.clone();
        }
        documents_base().join("RosterBackups")
    }
}

fn documents_base() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_standard_vat_and_zone() {
        let config = Config::default();
        assert_eq!(config.tax_rate_pct, 20.0);
        assert_eq!(config.jurisdiction, Jurisdiction::Metropole);
        assert_eq!(config.locale, "fr-FR");
    }

    #[test]
    fn unknown_jurisdiction_labels_fall_back_to_metropole() {
        let config: Config =
            serde_json::from_str(r#"{"locale": "fr-FR", "jurisdiction": "mars"}"#).unwrap();
        assert_eq!(config.jurisdiction, Jurisdiction::Metropole);

        let config: Config =
            serde_json::from_str(r#"{"locale": "fr-FR", "jurisdiction": "alsace-moselle"}"#)
                .unwrap();
        assert_eq!(config.jurisdiction, Jurisdiction::AlsaceMoselle);
    }

    #[test]
    fn explicit_roots_take_precedence() {
        let config = Config {
            default_roster_root: Some(PathBuf::from("/srv/rosters")),
            ..Config::default()
        };
        assert_eq!(
            config.resolve_default_roster_root(),
            PathBuf::from("/srv/rosters")
        );
    }
}
