use crate::core::{Cart, CartError};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors that can occur while loading or persisting carts
#[derive(Debug, Error)]
pub enum CartStoreError {
    #[error("Cart snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cart snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cart change rejected: {0}")]
    Rejected(#[from] CartError),

    #[error("Cart store lock poisoned")]
    Poisoned,
}

/// A mutation applied to a single cart by [`CartStore::update`]
pub type CartChange<'a> = Box<dyn FnOnce(&mut Cart) -> Result<(), CartError> + Send + 'a>;

/// Injectable persistence for shopping carts
///
/// `load` of an unknown id yields an empty cart. `update` applies a change
/// atomically with respect to other updates of the same store; a rejected
/// change leaves the stored cart untouched. `flush` makes every cart durable.
pub trait CartStore: Send + Sync {
    fn load(&self, cart_id: &str) -> Result<Cart, CartStoreError>;
    fn update(&self, cart_id: &str, change: CartChange<'_>) -> Result<Cart, CartStoreError>;
    fn flush(&self) -> Result<(), CartStoreError>;
}

/// Process-local cart store; nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    carts: RwLock<HashMap<String, Cart>>,
}

impl MemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStore for MemoryCartStore {
    fn load(&self, cart_id: &str) -> Result<Cart, CartStoreError> {
        let carts = self.carts.read().map_err(|_| CartStoreError::Poisoned)?;
        Ok(carts.get(cart_id).cloned().unwrap_or_default())
    }

    fn update(&self, cart_id: &str, change: CartChange<'_>) -> Result<Cart, CartStoreError> {
        // Write lock spans load, change and store
        let mut carts = self.carts.write().map_err(|_| CartStoreError::Poisoned)?;

        let mut cart = carts.get(cart_id).cloned().unwrap_or_default();
        change(&mut cart)?;

        if cart.is_empty() {
            carts.remove(cart_id);
        } else {
            carts.insert(cart_id.to_string(), cart.clone());
        }
        Ok(cart)
    }

    fn flush(&self) -> Result<(), CartStoreError> {
        Ok(())
    }
}

/// Cart store backed by a JSON snapshot file
///
/// The snapshot is read once by `open` and rewritten on every `flush`.
#[derive(Debug)]
pub struct FileCartStore {
    path: PathBuf,
    inner: MemoryCartStore,
    flush_lock: Mutex<()>,
}

impl FileCartStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CartStoreError> {
        let path = path.as_ref().to_path_buf();

        let carts: HashMap<String, Cart> = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            HashMap::new()
        };

        tracing::info!("Loaded {} carts from {}", carts.len(), path.display());

        Ok(Self {
            path,
            inner: MemoryCartStore {
                carts: RwLock::new(carts),
            },
            flush_lock: Mutex::new(()),
        })
    }

    fn snapshot_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl CartStore for FileCartStore {
    fn load(&self, cart_id: &str) -> Result<Cart, CartStoreError> {
        self.inner.load(cart_id)
    }

    fn update(&self, cart_id: &str, change: CartChange<'_>) -> Result<Cart, CartStoreError> {
        self.inner.update(cart_id, change)
    }

    fn flush(&self) -> Result<(), CartStoreError> {
        // One flush at a time, so snapshots land in the order they were taken
        let _guard = self.flush_lock.lock().map_err(|_| CartStoreError::Poisoned)?;

        let json = {
            let carts = self.inner.carts.read().map_err(|_| CartStoreError::Poisoned)?;
            serde_json::to_vec_pretty(&*carts)?
        };

        let dir = self.snapshot_dir();
        std::fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!("Flushed cart snapshot to {}", self.path.display());
        Ok(())
    }
}
