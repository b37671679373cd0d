//! Ordered key → object collections returned by searches.

use std::collections::HashMap;

use serde::Serialize;

/// An object identified by a key unique within its type and scope.
pub trait Keyed {
    /// The object's key (project key, branch name, group name, ...).
    fn key(&self) -> &str;
}

/// Objects indexed by key, iterated in the order their keys were first seen.
///
/// Inserting an existing key replaces the stored object in place.
#[derive(Debug, Clone)]
pub struct KeyedCollection<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for KeyedCollection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Keyed> KeyedCollection<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object, returning the object it replaced if the key was
    /// already present.
    pub fn insert(&mut self, item: T) -> Option<T> {
        if let Some(&position) = self.index.get(item.key()) {
            return Some(std::mem::replace(&mut self.items[position], item));
        }
        self.index.insert(item.key().to_string(), self.items.len());
        self.items.push(item);
        None
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&position| &self.items[position])
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(Keyed::key)
    }
}

impl<T> KeyedCollection<T> {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> IntoIterator for KeyedCollection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a KeyedCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Keyed> FromIterator<T> for KeyedCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut collection = Self::new();
        for item in iter {
            collection.insert(item);
        }
        collection
    }
}

impl<T: Keyed> Extend<T> for KeyedCollection<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T: Serialize> Serialize for KeyedCollection<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}
