//! Per-user state persistence.
//!
//! Each user's `{subscriptions, balance, holdings}` lives in one JSON file
//! under `<data dir>/users/`. Writes go through a tmp file + rename with a
//! `.bak` of the previous version; unreadable files are archived aside and
//! replaced with defaults instead of taking the session down.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::debug_hooks;
use crate::portfolio::{Holding, Portfolio, STARTING_BALANCE};

/// Bump when the record schema changes.
const STORE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingRecord {
    pub qty: f64,
    pub avg_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRecord {
    pub version: u32,
    pub subscriptions: Vec<String>,
    pub balance: f64,
    pub holdings: HashMap<String, HoldingRecord>,
}

impl Default for UserRecord {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            subscriptions: Vec::new(),
            balance: STARTING_BALANCE,
            holdings: HashMap::new(),
        }
    }
}

impl UserRecord {
    pub fn from_session(subscriptions: &[String], portfolio: &Portfolio) -> Self {
        Self {
            version: STORE_VERSION,
            subscriptions: subscriptions.to_vec(),
            balance: portfolio.balance,
            holdings: portfolio
                .holdings
                .iter()
                .map(|(t, h)| {
                    (
                        t.clone(),
                        HoldingRecord {
                            qty: h.qty,
                            avg_price: h.avg_price,
                        },
                    )
                })
                .collect(),
        }
    }

    pub fn to_portfolio(&self) -> Portfolio {
        Portfolio {
            balance: self.balance,
            holdings: self
                .holdings
                .iter()
                .map(|(t, h)| {
                    (
                        t.clone(),
                        Holding {
                            qty: h.qty,
                            avg_price: h.avg_price,
                        },
                    )
                })
                .collect(),
        }
    }
}

struct Inner {
    base_dir: PathBuf,
    last_saved_json: Mutex<HashMap<String, String>>,
}

#[derive(Clone)]
pub struct UserStore {
    inner: Arc<Inner>,
}

impl UserStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            inner: Arc::new(Inner {
                base_dir,
                last_saved_json: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn default_dir() -> Result<PathBuf> {
        let proj = ProjectDirs::from("com", "trademax", "trademax")
            .context("ProjectDirs::from returned None")?;
        Ok(proj.data_dir().to_path_buf())
    }

    pub fn user_path(&self, user: &str) -> PathBuf {
        let safe: String = user
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.inner.base_dir.join("users").join(format!("{safe}.json"))
    }

    /// Load a user's record; missing or corrupt files yield defaults.
    pub fn load(&self, user: &str) -> UserRecord {
        let path = self.user_path(user);
        if !path.exists() {
            debug_hooks::log_persist_result("missing", format!("{path:?}"));
            return UserRecord::default();
        }
        match read_json::<UserRecord>(&path) {
            Ok(mut record) => {
                // simple migration hook
                if record.version == 0 {
                    record.version = STORE_VERSION;
                }
                debug_hooks::log_persist_result("loaded", format!("{path:?}"));
                record
            }
            Err(err) => {
                archive_corrupt(&path, &err);
                UserRecord::default()
            }
        }
    }

    /// Save if content changed (prevents hammering disk).
    pub fn save(&self, user: &str, record: &UserRecord) -> Result<()> {
        let path = self.user_path(user);
        let parent = path.parent().context("user path has no parent")?;
        fs::create_dir_all(parent).with_context(|| format!("create store dir {parent:?}"))?;

        let json = serde_json::to_string_pretty(record)?;
        {
            let mut last = self
                .inner
                .last_saved_json
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            if last.get(user) == Some(&json) {
                return Ok(());
            }
            last.insert(user.to_string(), json.clone());
        }

        // backup previous
        if path.exists() {
            let backup = path.with_extension("json.bak");
            let _ = fs::copy(&path, backup);
        }

        atomic_write(&path, json.as_bytes())?;
        debug_hooks::log_persist_result("saved", format!("{path:?}"));
        Ok(())
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("read {path:?}"))?;
    let value = serde_json::from_slice::<T>(&bytes).with_context(|| "parse json")?;
    Ok(value)
}

fn archive_corrupt(path: &Path, err: &anyhow::Error) {
    if !path.exists() {
        return;
    }
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let archived = path.with_extension(format!("corrupt.{ts}.json"));
    let _ = fs::rename(path, archived);
    debug_hooks::log_persist_result("corrupt_archived", format!("{err:?}"));
}

fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().context("no parent dir for store path")?;
    let tmp = dir.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    {
        let mut f = fs::File::create(&tmp).with_context(|| format!("create tmp {tmp:?}"))?;
        f.write_all(bytes).with_context(|| "write tmp")?;
        let _ = f.sync_all();
    }

    fs::rename(&tmp, path).with_context(|| format!("rename {tmp:?} -> {path:?}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_store(tag: &str) -> (UserStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!(
            "trademax_store_{}_{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        (UserStore::new(dir.clone()), dir)
    }

    #[test]
    fn test_missing_user_yields_defaults() {
        let (store, dir) = scratch_store("missing");
        let record = store.load("nobody@firm.com");
        assert_eq!(record.balance, STARTING_BALANCE);
        assert!(record.subscriptions.is_empty());
        assert!(record.holdings.is_empty());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_save_load_round_trip() {
        let (store, dir) = scratch_store("roundtrip");
        let mut portfolio = Portfolio::new(STARTING_BALANCE);
        portfolio.buy("GOOG", 10.0, 100.0).unwrap();
        let subs = vec!["GOOG".to_string(), "ETH".to_string()];
        let record = UserRecord::from_session(&subs, &portfolio);

        store.save("trader@firm.com", &record).unwrap();
        let loaded = store.load("trader@firm.com");
        assert_eq!(loaded.subscriptions, subs);
        assert!((loaded.balance - 99_000.0).abs() < 1e-9);
        let h = &loaded.holdings["GOOG"];
        assert_eq!(h.qty, 10.0);
        assert_eq!(h.avg_price, 100.0);

        let restored = loaded.to_portfolio();
        assert_eq!(restored.position("GOOG").unwrap().qty, 10.0);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_corrupt_file_is_archived_and_defaulted() {
        let (store, dir) = scratch_store("corrupt");
        let path = store.user_path("trader@firm.com");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"{not json").unwrap();

        let record = store.load("trader@firm.com");
        assert_eq!(record.balance, STARTING_BALANCE);
        assert!(!path.exists(), "corrupt file should be moved aside");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_user_path_is_sanitized() {
        let (store, _dir) = scratch_store("sanitize");
        let path = store.user_path("weird user@firm.com/../x");
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(!name.contains('/'));
        assert!(!name.contains('@'));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn test_unchanged_record_skips_rewrite() {
        let (store, dir) = scratch_store("dedup");
        let record = UserRecord::default();
        store.save("trader@firm.com", &record).unwrap();
        let path = store.user_path("trader@firm.com");
        let first = fs::metadata(&path).unwrap().modified().unwrap();
        store.save("trader@firm.com", &record).unwrap();
        let second = fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(first, second);
        let _ = fs::remove_dir_all(dir);
    }
}
