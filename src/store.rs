use std::{
    collections::BTreeMap,
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex, PoisonError, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use crate::{error::StoreError, game::Game};

/// Keyed storage for games. Every call is atomic on its own; nothing spans
/// more than one call.
pub trait GameStore: Send + Sync {
    fn get(&self, id: &str) -> Option<Game>;
    fn put(&self, id: &str, game: Game);
    /// Returns true if a record was removed.
    fn delete(&self, id: &str) -> bool;
    fn list_all(&self) -> Vec<Game>;
}

/// Ordered in-memory store, optionally mirrored to a JSON snapshot file.
///
/// Snapshot writes happen after the map lock is released. Inside a tokio
/// runtime they run on the blocking pool; outside one they run inline.
#[derive(Debug, Default)]
pub struct MemoryStore {
    games: RwLock<BTreeMap<String, Game>>,
    writer: Option<Arc<SnapshotWriter>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store backed by `path`. A missing file starts empty; a file
    /// that can't be read or parsed is an error. A leftover `<file>.tmp`
    /// from an interrupted write is ignored.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let games = load_snapshot(&path)?;
        tracing::info!("loaded {} games from {}", games.len(), path.display());
        Ok(Self {
            games: RwLock::new(games),
            writer: Some(Arc::new(SnapshotWriter::new(path))),
        })
    }

    /// Write the current map to the snapshot file and wait for it. Pending
    /// background writes of older states are skipped afterwards.
    pub fn flush(&self) {
        let Some(writer) = &self.writer else {
            return;
        };
        let (version, games) = {
            let games = self.games.read().unwrap_or_else(PoisonError::into_inner);
            writer.stage(&games)
        };
        writer.write(version, &games);
    }
}

impl GameStore for MemoryStore {
    fn get(&self, id: &str) -> Option<Game> {
        let games = self.games.read().unwrap_or_else(PoisonError::into_inner);
        games.get(id).cloned()
    }

    fn put(&self, id: &str, game: Game) {
        let staged = {
            let mut games = self.games.write().unwrap_or_else(PoisonError::into_inner);
            games.insert(id.to_string(), game);
            self.writer.as_ref().map(|w| w.stage(&games))
        };
        if let (Some(writer), Some((version, games))) = (&self.writer, staged) {
            Arc::clone(writer).schedule(version, games);
        }
    }

    fn delete(&self, id: &str) -> bool {
        let (removed, staged) = {
            let mut games = self.games.write().unwrap_or_else(PoisonError::into_inner);
            let removed = games.remove(id).is_some();
            let staged = match &self.writer {
                Some(w) if removed => Some(w.stage(&games)),
                _ => None,
            };
            (removed, staged)
        };
        if let (Some(writer), Some((version, games))) = (&self.writer, staged) {
            Arc::clone(writer).schedule(version, games);
        }
        removed
    }

    fn list_all(&self) -> Vec<Game> {
        let games = self.games.read().unwrap_or_else(PoisonError::into_inner);
        games.values().cloned().collect()
    }
}

/// Serializes snapshot writes. Every staged copy gets a version taken while
/// the map lock is held, and a write never replaces a newer version on disk.
#[derive(Debug)]
struct SnapshotWriter {
    path: PathBuf,
    staged: AtomicU64,
    written: Mutex<u64>,
}

impl SnapshotWriter {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            staged: AtomicU64::new(0),
            written: Mutex::new(0),
        }
    }

    /// Must be called with the map lock held.
    fn stage(&self, games: &BTreeMap<String, Game>) -> (u64, BTreeMap<String, Game>) {
        let version = self.staged.fetch_add(1, Ordering::SeqCst) + 1;
        (version, games.clone())
    }

    fn schedule(self: Arc<Self>, version: u64, games: BTreeMap<String, Game>) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || self.write(version, &games));
            }
            Err(_) => self.write(version, &games),
        }
    }

    fn write(&self, version: u64, games: &BTreeMap<String, Game>) {
        let mut written = self.written.lock().unwrap_or_else(PoisonError::into_inner);
        if version <= *written {
            return;
        }
        match save_snapshot(&self.path, games) {
            Ok(()) => *written = version,
            Err(e) => tracing::warn!("failed to write snapshot {}: {}", self.path.display(), e),
        }
    }
}

/// Load a snapshot map from `path`; a missing file yields an empty map.
fn load_snapshot(path: &Path) -> Result<BTreeMap<String, Game>, StoreError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let s = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&s).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Sibling file a snapshot is written to before being renamed into place.
pub fn temp_snapshot_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("games"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Save the snapshot map as pretty JSON. The file is written next to `path`
/// and renamed over it, so `path` is never seen half-written.
fn save_snapshot(path: &Path, games: &BTreeMap<String, Game>) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let s = serde_json::to_string_pretty(games)?;
    let tmp = temp_snapshot_path(path);
    fs::write(&tmp, s)?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Bounds;
    use chrono::Utc;

    fn sample(id: &str) -> Game {
        Game::new(id.to_string(), Bounds::new(0, 100).unwrap(), Utc::now())
    }

    #[test]
    fn delete_reports_presence() {
        let store = MemoryStore::new();
        store.put("a", sample("a"));
        assert!(store.delete("a"));
        assert!(!store.delete("a"));
        assert!(store.get("a").is_none());
    }

    #[test]
    fn put_overwrites() {
        let store = MemoryStore::new();
        let mut g = sample("a");
        store.put("a", g.clone());
        g.points = 9;
        store.put("a", g);
        assert_eq!(store.get("a").unwrap().points, 9);
        assert_eq!(store.list_all().len(), 1);
    }

    #[test]
    fn corrupt_snapshot_is_an_error() {
        let pid = std::process::id();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let tmp = std::env::temp_dir().join(format!("games_corrupt_{}_{}.json", pid, nanos));
        fs::write(&tmp, "{ not json").unwrap();
        assert!(matches!(MemoryStore::open(&tmp), Err(StoreError::Json { .. })));
        let _ = fs::remove_file(&tmp);
    }

    #[test]
    fn temp_path_is_a_sibling() {
        let p = Path::new("data").join("games.json");
        assert_eq!(temp_snapshot_path(&p), Path::new("data").join("games.json.tmp"));
    }

    #[test]
    fn older_versions_never_overwrite_newer() {
        let pid = std::process::id();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let tmp = std::env::temp_dir().join(format!("games_versions_{}_{}.json", pid, nanos));
        let writer = SnapshotWriter::new(tmp.clone());

        let mut old = BTreeMap::new();
        old.insert("a".to_string(), sample("a"));
        let (v1, old) = writer.stage(&old);
        let mut new = old.clone();
        new.insert("b".to_string(), sample("b"));
        let (v2, new) = writer.stage(&new);

        writer.write(v2, &new);
        writer.write(v1, &old);

        assert_eq!(load_snapshot(&tmp).unwrap().len(), 2);
        assert!(!temp_snapshot_path(&tmp).exists());
        let _ = fs::remove_file(&tmp);
    }
}
