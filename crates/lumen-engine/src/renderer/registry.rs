use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use indexmap::map::Entry;
use indexmap::IndexMap;

use super::error::RegistryError;

/// Owned registry key.
///
/// Cheap to clone; renderables keep the names of their shaders rather than
/// references to them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(Arc<str>);

impl Name {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl From<&Name> for Name {
    fn from(n: &Name) -> Self {
        n.clone()
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name-keyed store that iterates in insertion order.
///
/// Keys are unique: inserting an existing name fails and leaves the stored
/// value untouched.
#[derive(Debug)]
pub struct Registry<T> {
    entries: IndexMap<Name, T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: Name, value: T) -> Result<(), RegistryError> {
        match self.entries.entry(name) {
            Entry::Occupied(e) => Err(RegistryError::DuplicateName(e.key().clone())),
            Entry::Vacant(e) => {
                e.insert(value);
                Ok(())
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The stored key equal to `name`.
    pub fn key(&self, name: &str) -> Option<&Name> {
        self.entries.get_key_value(name).map(|(k, _)| k)
    }

    /// Registration position of `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.get_full(name).map(|(i, _, _)| i)
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.entries.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &T)> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Name, &mut T)> {
        self.entries.iter_mut()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterates_in_insertion_order() {
        let mut r = Registry::new();
        for n in ["zeta", "alpha", "mid"] {
            r.insert(Name::from(n), n.len()).unwrap();
        }
        let names: Vec<&str> = r.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
        assert_eq!(r.position("alpha"), Some(1));
        assert_eq!(r.position("omega"), None);
    }

    #[test]
    fn duplicate_insert_is_rejected_without_overwrite() {
        let mut r = Registry::new();
        r.insert(Name::from("cube"), 1).unwrap();
        let err = r.insert(Name::from("cube"), 2).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName(Name::from("cube")));
        assert_eq!(r.get("cube"), Some(&1));
        assert_eq!(r.len(), 1);

        r.insert(Name::from("sphere"), 3).unwrap();
        assert_eq!(r.position("cube"), Some(0));
    }

    #[test]
    fn lookup_by_str() {
        let mut r = Registry::new();
        r.insert(Name::from(String::from("light")), 'x').unwrap();
        assert!(r.contains("light"));
        assert!(!r.contains("dark"));
        *r.get_mut("light").unwrap() = 'y';
        assert_eq!(r.get("light"), Some(&'y'));
    }
}
