use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub(crate) const KEY_TRANSACTIONS: &str = "transactions";
pub(crate) const KEY_BUDGETS: &str = "budgets";
pub(crate) const KEY_THEME: &str = "theme";

/// Abstraction over persistence backends. Values are JSON text keyed by
/// name; a missing key reads as `None` and the caller supplies the
/// default. The store does not care whether the bytes land in files, a
/// database, or a test map.
pub(crate) trait Backend {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// File-per-key JSON backend rooted at a data directory. Saves write a
/// temp file first and rename over the target so a crash mid-write
/// leaves the previous contents intact.
pub(crate) struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    pub(crate) fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl Backend for FileBackend {
    fn load(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.key_path(key)).ok()
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let tmp = tmp_path(&path);
        fs::write(&tmp, value).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.tmp"),
        None => "tmp".to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display configuration with an explicit load/persist lifecycle through
/// the same backend key space as the ledger data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Config {
    pub theme: Theme,
}

impl Config {
    /// Read the persisted configuration; anything missing or corrupt
    /// falls back to the defaults.
    pub(crate) fn load(backend: &dyn Backend) -> Self {
        let theme = backend
            .load(KEY_THEME)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self { theme }
    }

    pub(crate) fn persist(&self, backend: &dyn Backend) -> Result<()> {
        let raw = serde_json::to_string(&self.theme).context("Failed to encode theme")?;
        backend.save(KEY_THEME, &raw)
    }
}

/// Shared-map backend for tests. Cloning shares the underlying map, so a
/// second store opened over a clone sees what the first one saved.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct MemBackend {
    data: std::rc::Rc<std::cell::RefCell<std::collections::HashMap<String, String>>>,
}

#[cfg(test)]
impl MemBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn put(&self, key: &str, value: &str) {
        self.data.borrow_mut().insert(key.into(), value.into());
    }
}

#[cfg(test)]
impl Backend for MemBackend {
    fn load(&self, key: &str) -> Option<String> {
        self.data.borrow().get(key).cloned()
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.data.borrow_mut().insert(key.into(), value.into());
        Ok(())
    }
}
