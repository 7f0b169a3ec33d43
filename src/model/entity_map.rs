//! Natural-key keyed entity storage.
//!
//! Rows are deduplicated by a business key (name, filename, tag text) before
//! numeric ids exist. Ids come from the position a key was *first* inserted
//! at: `base + position + 1`. Overwriting an existing key keeps its position
//! and therefore its id. Iteration follows the same insertion order, so ids
//! are increasing along every iteration and reproducible for a given input.

use indexmap::IndexMap;

use crate::error::{Result, SeedError};

/// Records that carry their assigned id
pub trait Entity {
    fn id(&self) -> i64;
}

/// Sequential id allocator for tables without a deduplicating key
#[derive(Debug, Clone)]
pub struct IdSequence {
    last: i64,
}

impl IdSequence {
    pub fn new(base: i64) -> Self {
        Self { last: base }
    }

    pub fn next(&mut self) -> i64 {
        self.last += 1;
        self.last
    }
}

/// Insertion-ordered mapping from natural key to entity record
#[derive(Debug, Clone)]
pub struct EntityMap<T> {
    table: &'static str,
    base: i64,
    entries: IndexMap<String, T>,
}

impl<T: Entity> EntityMap<T> {
    pub fn new(table: &'static str, base: i64) -> Self {
        Self {
            table,
            base,
            entries: IndexMap::new(),
        }
    }

    /// Id the given key has, or would get if inserted now
    fn slot_id(&self, key: &str) -> i64 {
        let position = self
            .entries
            .get_index_of(key)
            .unwrap_or(self.entries.len());
        self.base + position as i64 + 1
    }

    /// Insert or overwrite, keeping the first-seen position. Returns the id.
    pub fn upsert(&mut self, key: impl Into<String>, build: impl FnOnce(i64) -> T) -> i64 {
        let key = key.into();
        let id = self.slot_id(&key);
        self.entries.insert(key, build(id));
        id
    }

    /// Existing record for `key`, or a fresh one created with its new id
    pub fn entry_or_insert(
        &mut self,
        key: impl Into<String>,
        create: impl FnOnce(i64) -> T,
    ) -> &mut T {
        let key = key.into();
        let id = self.slot_id(&key);
        self.entries.entry(key).or_insert_with(|| create(id))
    }

    /// Lookup by natural key; a miss is an unresolved foreign key
    pub fn get(&self, key: &str) -> Result<&T> {
        self.entries
            .get(key)
            .ok_or_else(|| SeedError::unresolved(self.table, key))
    }

    pub fn id_of(&self, key: &str) -> Result<i64> {
        self.get(key).map(Entity::id)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Records in id order, ready for rendering
    pub fn records(&self) -> Vec<&T> {
        self.entries.values().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest assigned id, `None` when empty
    pub fn max_id(&self) -> Option<i64> {
        self.entries.values().map(Entity::id).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Named {
        id: i64,
        label: &'static str,
    }

    impl Entity for Named {
        fn id(&self) -> i64 {
            self.id
        }
    }

    #[test]
    fn test_ids_follow_first_seen_order() {
        let mut map = EntityMap::new("things", 100);
        assert_eq!(map.upsert("b", |id| Named { id, label: "b1" }), 101);
        assert_eq!(map.upsert("a", |id| Named { id, label: "a1" }), 102);
        assert_eq!(map.upsert("b", |id| Named { id, label: "b2" }), 101);

        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(map.get("b").unwrap().label, "b2");
        assert_eq!(map.max_id(), Some(102));
    }

    #[test]
    fn test_entry_or_insert_merges_into_existing() {
        let mut map = EntityMap::new("things", 0);
        map.entry_or_insert("x", |id| Named { id, label: "first" });
        let existing = map.entry_or_insert("x", |id| Named { id, label: "second" });
        assert_eq!(existing.label, "first");
        existing.label = "merged";
        assert_eq!(map.get("x").unwrap(), &Named { id: 1, label: "merged" });
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_lookup_miss_is_unresolved_reference() {
        let map: EntityMap<Named> = EntityMap::new("datasets", 100);
        match map.id_of("nope") {
            Err(SeedError::UnresolvedReference { table, key }) => {
                assert_eq!(table, "datasets");
                assert_eq!(key, "nope");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_id_sequence() {
        let mut ids = IdSequence::new(100);
        assert_eq!(ids.next(), 101);
        assert_eq!(ids.next(), 102);
    }
}
