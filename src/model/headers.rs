//! Case-insensitive map
//!
//! Header storage for recorded requests and responses. Lookups ignore key
//! case while iteration yields the casing of the most recently set key.

use std::collections::{HashMap, HashSet};
use std::fmt;

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Map with case-insensitive string keys.
///
/// ```
/// use apiscribe::CaseInsensitiveMap;
///
/// let mut headers = CaseInsensitiveMap::new();
/// headers.insert("Accept", "application/json".to_string());
/// assert_eq!(headers.get("aCCEPT").map(String::as_str), Some("application/json"));
/// assert_eq!(headers.keys().collect::<Vec<_>>(), vec!["Accept"]);
/// ```
#[derive(Clone, Default)]
pub struct CaseInsensitiveMap<V = String> {
    // lower-cased key -> (last-set key, value)
    store: IndexMap<String, (String, V)>,
}

impl<V> CaseInsensitiveMap<V> {
    pub fn new() -> Self {
        Self {
            store: IndexMap::new(),
        }
    }

    /// Insert a value, returning the previous value for the same logical key
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        self.store
            .insert(key.to_lowercase(), (key, value))
            .map(|(_, old)| old)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.store.get(&key.to_lowercase()).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.store.get_mut(&key.to_lowercase()).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.store
            .shift_remove(&key.to_lowercase())
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.store.contains_key(&key.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Keys in their last-set casing
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.store.values().map(|(k, _)| k.as_str())
    }

    /// Entries in their last-set casing
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.store.values().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries with lower-cased keys
    pub fn lower_items(&self) -> impl Iterator<Item = (&str, &V)> {
        self.store.iter().map(|(lower, (_, v))| (lower.as_str(), v))
    }
}

impl<V: PartialEq> PartialEq for CaseInsensitiveMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .lower_items()
                .all(|(k, v)| other.store.get(k).is_some_and(|(_, o)| o == v))
    }
}

impl<V: Eq> Eq for CaseInsensitiveMap<V> {}

impl<V: PartialEq> CaseInsensitiveMap<V> {
    // Keys of the plain map that collide once lower-cased never compare equal
    fn eq_entries<'a>(
        &self,
        len: usize,
        mut entries: impl Iterator<Item = (&'a String, &'a V)>,
    ) -> bool
    where
        V: 'a,
    {
        let mut seen = HashSet::new();
        self.len() == len
            && entries.all(|(k, v)| seen.insert(k.to_lowercase()) && self.get(k) == Some(v))
    }
}

/// Plain maps compare by lower-cased key
impl<V: PartialEq> PartialEq<IndexMap<String, V>> for CaseInsensitiveMap<V> {
    fn eq(&self, other: &IndexMap<String, V>) -> bool {
        self.eq_entries(other.len(), other.iter())
    }
}

impl<V: PartialEq> PartialEq<HashMap<String, V>> for CaseInsensitiveMap<V> {
    fn eq(&self, other: &HashMap<String, V>) -> bool {
        self.eq_entries(other.len(), other.iter())
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for CaseInsensitiveMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V: fmt::Debug> fmt::Debug for CaseInsensitiveMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V: Serialize> Serialize for CaseInsensitiveMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for CaseInsensitiveMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = IndexMap::<String, V>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}
