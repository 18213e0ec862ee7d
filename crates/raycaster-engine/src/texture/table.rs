use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Opaque identifier of a loaded texture.
///
/// Handles are issued sequentially starting at 1. `0` is reserved and means
/// "invalid / none".
#[repr(transparent)]
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TextureId(pub u32);

impl TextureId {
    pub const INVALID: TextureId = TextureId(0);

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TextureId {
    #[inline]
    fn from(v: u32) -> Self {
        TextureId(v)
    }
}

/// Map from [`TextureId`] to loaded texture resources.
///
/// Generic over the resource type so the GPU backend and the headless backend
/// share the same numbering and lifetime rules.
///
/// Invariants:
/// - issued handles are `>= 1` and strictly increasing for the table's lifetime
/// - a failed load leaves the table untouched (no handle is consumed)
/// - handles are never reused, even after unload
#[derive(Debug)]
pub struct TextureTable<T> {
    entries: BTreeMap<TextureId, T>,
    next_id: u32,
}

impl<T> Default for TextureTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TextureTable<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Loads a resource through `loader` and registers it under a fresh handle.
    ///
    /// On failure the error is logged and [`TextureId::INVALID`] is returned.
    pub fn load_with<F>(&mut self, path: &Path, loader: F) -> TextureId
    where
        F: FnOnce(&Path) -> anyhow::Result<T>,
    {
        match loader(path) {
            Ok(resource) => {
                let id = self.insert(resource);
                log::info!("loaded texture '{}' with id {id}", path.display());
                id
            }
            Err(e) => {
                log::warn!("failed to load texture '{}': {e:#}", path.display());
                TextureId::INVALID
            }
        }
    }

    /// Registers `resource` under the next sequential handle.
    pub fn insert(&mut self, resource: T) -> TextureId {
        let id = TextureId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        self.entries.insert(id, resource);
        id
    }

    /// Removes and returns the resource for `id`.
    ///
    /// Absent handles are a logged no-op.
    pub fn remove(&mut self, id: TextureId) -> Option<T> {
        let removed = self.entries.remove(&id);
        if removed.is_some() {
            log::info!("unloaded texture with id {id}");
        } else {
            log::info!("attempted to unload non-existent texture id {id}");
        }
        removed
    }

    #[inline]
    pub fn get(&self, id: TextureId) -> Option<&T> {
        self.entries.get(&id)
    }

    #[inline]
    pub fn contains(&self, id: TextureId) -> bool {
        self.entries.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Live handles in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = TextureId> + '_ {
        self.entries.keys().copied()
    }

    /// Removes every entry and hands each resource to `release`.
    ///
    /// The handle counter is left as-is; a fresh table starts again at 1.
    pub fn drain_with<F>(&mut self, mut release: F)
    where
        F: FnMut(TextureId, T),
    {
        let entries = std::mem::take(&mut self.entries);
        let count = entries.len();
        for (id, resource) in entries {
            release(id, resource);
        }
        if count > 0 {
            log::debug!("released {count} outstanding texture(s)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    fn ok(_: &Path) -> anyhow::Result<&'static str> {
        Ok("tex")
    }

    fn fail(p: &Path) -> anyhow::Result<&'static str> {
        bail!("cannot decode {}", p.display())
    }

    #[test]
    fn handles_start_at_one_and_increase() {
        let mut t = TextureTable::new();
        let a = t.load_with(Path::new("a.png"), ok);
        let b = t.load_with(Path::new("b.png"), ok);
        assert_eq!(a, TextureId(1));
        assert_eq!(b, TextureId(2));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn failed_load_returns_invalid_and_consumes_nothing() {
        let mut t = TextureTable::new();
        let a = t.load_with(Path::new("a.png"), ok);
        let bad = t.load_with(Path::new("missing.png"), fail);
        let b = t.load_with(Path::new("b.png"), ok);

        assert_eq!(bad, TextureId::INVALID);
        assert!(!bad.is_valid());
        assert_eq!(t.ids().collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(b, TextureId(2));
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut t = TextureTable::new();
        let a = t.load_with(Path::new("a.png"), ok);
        assert!(t.remove(TextureId(42)).is_none());
        assert!(t.remove(TextureId::INVALID).is_none());
        assert_eq!(t.remove(a), Some("tex"));
        assert!(t.remove(a).is_none());
        assert!(t.is_empty());
    }

    #[test]
    fn handles_are_not_reused_after_remove() {
        let mut t = TextureTable::new();
        let a = t.insert(1);
        t.remove(a);
        let b = t.insert(2);
        assert_ne!(a, b);
        assert_eq!(b, TextureId(2));
    }

    #[test]
    fn drain_releases_everything() {
        let mut t = TextureTable::new();
        t.insert("x");
        t.insert("y");
        let mut released = Vec::new();
        t.drain_with(|id, r| released.push((id, r)));
        assert_eq!(released, vec![(TextureId(1), "x"), (TextureId(2), "y")]);
        assert!(t.is_empty());
    }
}
