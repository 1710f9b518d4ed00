//! Where collected proxies are kept between runs

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{info, warn};
use thiserror::Error;

use crate::models::{Proxy, ProxyList};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence backend for the proxy pool
pub trait ProxyStore: Send + Sync {
    fn save(&self, proxies: &ProxyList) -> Result<(), StoreError>;
    fn load(&self) -> Result<ProxyList, StoreError>;
}

/// Keeps the last saved list in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    proxies: Mutex<Vec<Proxy>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProxyStore for MemoryStore {
    fn save(&self, proxies: &ProxyList) -> Result<(), StoreError> {
        let mut stored = self.proxies.lock().unwrap_or_else(|e| e.into_inner());
        *stored = proxies.as_slice().to_vec();
        Ok(())
    }

    fn load(&self) -> Result<ProxyList, StoreError> {
        let stored = self.proxies.lock().unwrap_or_else(|e| e.into_inner());
        Ok(stored.iter().cloned().collect())
    }
}

/// A JSON array of canonical proxy records on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonFileStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProxyStore for JsonFileStore {
    fn save(&self, proxies: &ProxyList) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(proxies.as_slice())?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// A missing file is an empty pool
    fn load(&self) -> Result<ProxyList, StoreError> {
        if !self.path.exists() {
            return Ok(ProxyList::new());
        }
        let content = fs::read_to_string(&self.path)?;
        let proxies: Vec<Proxy> = serde_json::from_str(&content)?;
        Ok(proxies.into_iter().collect())
    }
}

/// The current proxy set, optionally backed by a store
///
/// Store failures never lose the in-memory copy: the pool logs them and
/// carries on without the store.
#[derive(Default)]
pub struct ProxyPool {
    store: Option<Box<dyn ProxyStore>>,
    proxies: ProxyList,
}

impl ProxyPool {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the pool from `store`, continuing in memory when it cannot be read
    pub fn open(store: Box<dyn ProxyStore>) -> Self {
        match store.load() {
            Ok(proxies) => {
                info!("Loaded {} proxies from store", proxies.len());
                ProxyPool {
                    store: Some(store),
                    proxies,
                }
            }
            Err(e) => {
                warn!("Proxy store unavailable, keeping proxies in memory: {}", e);
                Self::in_memory()
            }
        }
    }

    pub fn proxies(&self) -> &ProxyList {
        &self.proxies
    }

    pub fn is_persistent(&self) -> bool {
        self.store.is_some()
    }

    /// Swap in a freshly collected list and persist it
    ///
    /// An empty list keeps the previous proxies, since it almost always means
    /// every source was down rather than that every proxy disappeared.
    pub fn replace(&mut self, proxies: ProxyList) {
        if proxies.is_empty() {
            warn!(
                "Collected list is empty, keeping the previous {} proxies",
                self.proxies.len()
            );
            return;
        }
        self.proxies = proxies;

        if let Some(store) = &self.store {
            if let Err(e) = store.save(&self.proxies) {
                warn!("Saving proxies failed, continuing in memory: {}", e);
                self.store = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProxyNode;
    use crate::parser::parse_proxies_from_text;

    struct Broken;

    impl ProxyStore for Broken {
        fn save(&self, _: &ProxyList) -> Result<(), StoreError> {
            Err(std::io::Error::other("disk full").into())
        }

        fn load(&self) -> Result<ProxyList, StoreError> {
            Ok(ProxyList::new())
        }
    }

    fn sample() -> ProxyList {
        parse_proxies_from_text(
            "trojan://a@one.com:443#one vless://u@two.com:443?security=tls&type=ws#two",
        )
    }

    #[test]
    fn test_json_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("proxies.json"));
        assert!(store.load().unwrap().is_empty());

        let mut proxies = sample();
        for proxy in proxies.iter_mut() {
            proxy.set_country("JP");
            proxy.set_usable(true);
        }
        store.save(&proxies).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.as_slice(), proxies.as_slice());
    }

    #[test]
    fn test_json_file_store_corrupt() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "{not json").unwrap();
        assert!(matches!(
            JsonFileStore::new(file.path()).load(),
            Err(StoreError::Json(_))
        ));
    }

    #[test]
    fn test_pool_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proxies.json");

        let mut pool = ProxyPool::open(Box::new(JsonFileStore::new(&path)));
        assert!(pool.is_persistent());
        pool.replace(sample());

        let reopened = ProxyPool::open(Box::new(JsonFileStore::new(&path)));
        assert_eq!(reopened.proxies().len(), 2);
    }

    #[test]
    fn test_pool_keeps_previous_on_empty() {
        let store = MemoryStore::new();
        store.save(&sample()).unwrap();

        let mut pool = ProxyPool::open(Box::new(store));
        pool.replace(ProxyList::new());
        assert_eq!(pool.proxies().len(), 2);
    }

    #[test]
    fn test_pool_degrades_to_memory() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "[1, 2").unwrap();
        let pool = ProxyPool::open(Box::new(JsonFileStore::new(file.path())));
        assert!(!pool.is_persistent());

        let mut pool = ProxyPool::open(Box::new(Broken));
        assert!(pool.is_persistent());
        pool.replace(sample());
        assert!(!pool.is_persistent());
        assert_eq!(pool.proxies().len(), 2);
    }
}
