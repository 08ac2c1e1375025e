use indexmap::map::Entry;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::query::{self, Extract, Find, FindValue};
use crate::value::{self, Dict, Value, ValueKind};
use crate::UfoTreeError;

/// An insertion-ordered map for ad-hoc nested data, with two states: while
/// **open**, reading an absent key through [`AttrMap::get_or_create`]
/// materializes an empty dict at that key, so chained access builds
/// intermediate levels on demand; once [`AttrMap::lock`]ed, the same read
/// fails with [`UfoTreeError::KeyNotFound`]. Locking never blocks explicit
/// writes, only creation-on-read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttrMap {
    entries: Dict,
    #[serde(skip)]
    locked: bool,
}

impl AttrMap {
    pub fn new() -> Self {
        AttrMap::default()
    }

    /// Freeze the key set against implicit creation. Terminal: there is no
    /// way back to the open state.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Open-state read: an absent key is created as an empty dict and
    /// returned. On a locked map an absent key is a [`UfoTreeError::KeyNotFound`].
    pub fn get_or_create(&mut self, key: &str) -> Result<&mut Value, UfoTreeError> {
        match self.entries.entry(SmolStr::from(key)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                if self.locked {
                    Err(UfoTreeError::KeyNotFound {
                        key: key.to_string(),
                    })
                } else {
                    Ok(entry.insert(Value::Dict(Dict::new())))
                }
            }
        }
    }

    /// Locked-state read: an absent key is always an error, whatever the
    /// current state.
    pub fn get_strict(&self, key: &str) -> Result<&Value, UfoTreeError> {
        self.entries.get(key).ok_or_else(|| UfoTreeError::KeyNotFound {
            key: key.to_string(),
        })
    }

    /// Always succeeds: locking only affects creation-on-read.
    pub fn insert(&mut self, key: &str, value: Value) -> Option<Value> {
        self.entries.insert(SmolStr::from(key), value)
    }

    /// Removing an absent key is a no-op returning `None`.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &Value)> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &Dict {
        &self.entries
    }

    /// A hash over the map's structure, independent of insertion order:
    /// two maps with the same entries hash equal however they were built.
    pub fn structural_hash(&self) -> u64 {
        value::hash_dict(&self.entries)
    }

    /// See [`query::extract`].
    pub fn extract<'a>(&'a self, key: &'a str) -> Extract<'a> {
        Extract::from_dict(&self.entries, key)
    }

    /// See [`query::find`].
    pub fn find<'a>(&'a self, key: &'a str, kind: Option<ValueKind>) -> Find<'a> {
        Find::from_dict(&self.entries, key, kind)
    }

    /// See [`query::find_value`].
    pub fn find_value<'a>(&'a self, value: &'a Value, key: Option<&'a str>) -> FindValue<'a> {
        FindValue::from_dict(&self.entries, value, key)
    }

    /// See [`query::contains`].
    pub fn contains(&self, key: &str, kind: Option<ValueKind>) -> bool {
        query::contains_dict(&self.entries, key, kind)
    }
}

impl From<Dict> for AttrMap {
    fn from(entries: Dict) -> Self {
        AttrMap {
            entries,
            locked: false,
        }
    }
}

impl From<AttrMap> for Dict {
    fn from(map: AttrMap) -> Self {
        map.entries
    }
}

impl FromIterator<(SmolStr, Value)> for AttrMap {
    fn from_iter<I: IntoIterator<Item = (SmolStr, Value)>>(iter: I) -> Self {
        AttrMap::from(iter.into_iter().collect::<Dict>())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_auto_vivification() {
        let mut map = AttrMap::new();
        let created = map.get_or_create("missing").unwrap();
        assert_eq!(*created, Value::Dict(Dict::new()));
        assert!(map.contains_key("missing"));
    }

    #[test]
    fn test_chained_access_builds_intermediate_levels() {
        let mut map = AttrMap::new();
        map.get_or_create("com.example.tool")
            .unwrap()
            .as_dict_mut()
            .unwrap()
            .insert("version".into(), Value::Int(2));
        assert_eq!(
            map.get("com.example.tool").unwrap().as_dict().unwrap()["version"],
            Value::Int(2)
        );
    }

    #[test]
    fn test_locked_read_fails() {
        let mut map = AttrMap::new();
        map.insert("present", Value::Int(1));
        map.lock();
        assert!(map.is_locked());
        assert_eq!(*map.get_or_create("present").unwrap(), Value::Int(1));
        let err = map.get_or_create("other_missing").unwrap_err();
        assert!(matches!(err, UfoTreeError::KeyNotFound { .. }));
        assert!(map.get_strict("other_missing").is_err());
    }

    #[test]
    fn test_locking_does_not_block_writes() {
        let mut map = AttrMap::new();
        map.lock();
        assert_eq!(map.insert("new", Value::Int(1)), None);
        assert_eq!(map.insert("new", Value::Int(2)), Some(Value::Int(1)));
        assert_eq!(*map.get("new").unwrap(), Value::Int(2));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut map = AttrMap::new();
        assert_eq!(map.remove("nothing"), None);
        map.insert("present", Value::Int(1));
        assert_eq!(map.remove("present"), Some(Value::Int(1)));
        assert!(map.is_empty());
    }

    #[test]
    fn test_structural_hash_ignores_insertion_order() {
        let mut ab = AttrMap::new();
        ab.insert("a", Value::Int(1));
        ab.insert("b", Value::Int(2));
        let mut ba = AttrMap::new();
        ba.insert("b", Value::Int(2));
        ba.insert("a", Value::Int(1));
        assert_eq!(ab.structural_hash(), ba.structural_hash());
        ba.insert("c", Value::Int(3));
        assert_ne!(ab.structural_hash(), ba.structural_hash());
    }

    #[test]
    fn test_query_convenience() {
        let mut map = AttrMap::new();
        map.insert(
            "glyphOrder",
            Value::Array(vec![Value::Str("A".into()), Value::Str("B".into())]),
        );
        let mut nested = Dict::new();
        nested.insert("unitsPerEm".into(), Value::Int(1000));
        map.insert("info", Value::Dict(nested));
        let extracted: Vec<&Value> = map.extract("unitsPerEm").collect();
        assert_eq!(extracted, vec![&Value::Int(1000)]);
        assert_eq!(map.find("unitsPerEm", Some(ValueKind::Int)).count(), 1);
        assert!(map.contains("units", None));
        assert!(!map.contains("kerning", None));
        let needle = Value::Int(1000);
        assert_eq!(map.find_value(&needle, None).count(), 1);
    }
}
