//! suivy-storage-json
//!
//! Filesystem-backed JSON persistence for team rosters, their consumption
//! snapshots, and timestamped backups with retention pruning.

use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};

use suivy_core::{
    storage::{RosterBackupInfo, TeamStorage},
    CoreError,
};
use suivy_domain::{ConsumptionSnapshot, TeamRoster};

const FILE_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Filesystem-backed JSON persistence for rosters and their backups.
#[derive(Clone)]
pub struct JsonTeamStorage {
    rosters_dir: PathBuf,
    consumption_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonTeamStorage {
    /// Lays out `rosters/`, `consumption/`, and `backups/` under `base`.
    pub fn new(base: PathBuf) -> Result<Self, CoreError> {
        Self::with_retention(base, DEFAULT_RETENTION)
    }

    pub fn with_retention(base: PathBuf, retention: usize) -> Result<Self, CoreError> {
        let rosters_dir = base.join("rosters");
        let consumption_dir = base.join("consumption");
        let backups_dir = base.join("backups");
        fs::create_dir_all(&rosters_dir)?;
        fs::create_dir_all(&consumption_dir)?;
        fs::create_dir_all(&backups_dir)?;
        Ok(Self {
            rosters_dir,
            consumption_dir,
            backups_dir,
            retention: retention.max(1),
        })
    }

    pub fn roster_path(&self, name: &str) -> PathBuf {
        self.rosters_dir
            .join(format!("{}.{}", canonical_name(name), FILE_EXTENSION))
    }

    pub fn consumption_path(&self, name: &str) -> PathBuf {
        self.consumption_dir
            .join(format!("{}.{}", canonical_name(name), FILE_EXTENSION))
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    fn prune_backups(&self, name: &str) -> Result<(), CoreError> {
        let mut entries = self.list_backups(name)?;
        entries.sort_by_key(|info| Reverse(parse_backup_timestamp(&info.id)));
        for entry in entries.into_iter().skip(self.retention) {
            let _ = fs::remove_file(entry.path);
        }
        Ok(())
    }
}

impl TeamStorage for JsonTeamStorage {
    fn save_roster(&self, name: &str, roster: &TeamRoster) -> Result<(), CoreError> {
        let path = self.roster_path(name);
        let json = to_pretty_json(roster)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn load_roster(&self, name: &str) -> Result<TeamRoster, CoreError> {
        let data = fs::read_to_string(self.roster_path(name))?;
        serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
    }

    fn list_rosters(&self) -> Result<Vec<String>, CoreError> {
        if !self.rosters_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.rosters_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete_roster(&self, name: &str) -> Result<(), CoreError> {
        let path = self.roster_path(name);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn backup_roster(
        &self,
        name: &str,
        roster: &TeamRoster,
        note: Option<&str>,
    ) -> Result<RosterBackupInfo, CoreError> {
        let dir = self.backup_dir(name);
        fs::create_dir_all(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut stem = format!("{}_{}", canonical_name(name), timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let file_name = format!("{}.{}", stem, FILE_EXTENSION);
        let path = dir.join(&file_name);
        write_atomic(&path, &to_pretty_json(roster)?)?;
        self.prune_backups(name)?;
        Ok(RosterBackupInfo {
            roster: canonical_name(name),
            id: file_name,
            created_at: timestamp,
            path,
        })
    }

    fn list_backups(&self, name: &str) -> Result<Vec<RosterBackupInfo>, CoreError> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let slug = canonical_name(name);
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(RosterBackupInfo {
                    roster: slug.clone(),
                    id: file_name.to_string(),
                    created_at: file_name.to_string(),
                    path: path.clone(),
                });
            }
        }
        entries.sort_by_key(|info| Reverse(parse_backup_timestamp(&info.id)));
        Ok(entries)
    }

    fn restore_backup(&self, backup: &RosterBackupInfo) -> Result<TeamRoster, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!(
                "backup `{}` not found",
                backup.id
            )));
        }
        let target = self.roster_path(&backup.roster);
        fs::copy(&backup.path, &target)?;
        let data = fs::read_to_string(&target)?;
        serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
    }

    fn save_consumption(
        &self,
        name: &str,
        snapshot: &ConsumptionSnapshot,
    ) -> Result<(), CoreError> {
        let path = self.consumption_path(name);
        let json =
            serde_json::to_string_pretty(snapshot).map_err(|err| CoreError::Serde(err.to_string()))?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn load_consumption(&self, name: &str) -> Result<ConsumptionSnapshot, CoreError> {
        let path = self.consumption_path(name);
        if !path.exists() {
            return Ok(ConsumptionSnapshot::new());
        }
        let data = fs::read_to_string(&path)?;
        serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "roster".into()
    } else {
        sanitized
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", FILE_EXTENSION))?;
    let mut segments = trimmed.split('_').collect::<Vec<_>>();
    // Trailing note segments are optional; the timestamp is the last pair of
    // all-digit segments.
    while let Some(last) = segments.last() {
        if last.chars().all(|c| c.is_ascii_digit()) {
            break;
        }
        segments.pop();
    }
    if segments.len() < 2 {
        return None;
    }
    let time = segments.pop()?;
    let date = segments.pop()?;
    if date.len() != 8 || time.len() != 4 {
        return None;
    }
    let raw = format!("{}{}", date, time);
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn to_pretty_json(roster: &TeamRoster) -> Result<String, CoreError> {
    serde_json::to_string_pretty(roster).map_err(|err| CoreError::Serde(err.to_string()))
}
