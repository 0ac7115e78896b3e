//! Ordered sub-collections embedded in a parent document.
//!
//! Experience, education and comment entries live inside their parent as a
//! newest-first list. Each entry carries a UUID assigned on insertion; removal
//! is by that UUID only, and the position is looked up again on every call.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An element of a [`SubCollection`].
pub trait Entry {
  fn entry_id(&self) -> Uuid;
}

/// A newest-first list of uniquely identified entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubCollection<T>(Vec<T>);

impl<T> Default for SubCollection<T> {
  fn default() -> Self { Self(Vec::new()) }
}

impl<T: Entry> SubCollection<T> {
  pub fn new() -> Self { Self::default() }

  /// Prepend `entry`. The newest entry is always at index 0.
  pub fn push_front(&mut self, entry: T) -> &T {
    self.0.insert(0, entry);
    &self.0[0]
  }

  /// Current position of the entry with `id`, if any.
  pub fn position(&self, id: Uuid) -> Option<usize> {
    self.0.iter().position(|e| e.entry_id() == id)
  }

  pub fn get(&self, id: Uuid) -> Option<&T> {
    self.position(id).map(|i| &self.0[i])
  }

  /// Remove the entry with `id` and return it. An unknown id leaves the
  /// collection untouched.
  pub fn remove(&mut self, id: Uuid) -> Option<T> {
    let index = self.position(id)?;
    Some(self.0.remove(index))
  }

  pub fn iter(&self) -> std::slice::Iter<'_, T> { self.0.iter() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn as_slice(&self) -> &[T] { &self.0 }
}

impl<'a, T> IntoIterator for &'a SubCollection<T> {
  type Item = &'a T;
  type IntoIter = std::slice::Iter<'a, T>;

  fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Clone, PartialEq, Eq)]
  struct Item {
    id:    Uuid,
    label: &'static str,
  }

  impl Entry for Item {
    fn entry_id(&self) -> Uuid { self.id }
  }

  fn item(label: &'static str) -> Item { Item { id: Uuid::new_v4(), label } }

  fn labels(c: &SubCollection<Item>) -> Vec<&'static str> {
    c.iter().map(|i| i.label).collect()
  }

  #[test]
  fn push_front_keeps_newest_first() {
    let mut c = SubCollection::new();
    for label in ["a", "b", "c", "d"] {
      c.push_front(item(label));
    }
    assert_eq!(labels(&c), ["d", "c", "b", "a"]);
  }

  #[test]
  fn remove_present_keeps_relative_order() {
    let mut c = SubCollection::new();
    let (a, b, d) = (item("a"), item("b"), item("d"));
    c.push_front(a.clone());
    c.push_front(b.clone());
    c.push_front(item("c"));
    c.push_front(d.clone());

    let removed = c.remove(b.id).unwrap();
    assert_eq!(removed, b);
    assert_eq!(labels(&c), ["d", "c", "a"]);
    assert!(c.position(b.id).is_none());
    assert_eq!(c.position(d.id), Some(0));
    assert_eq!(c.position(a.id), Some(2));
  }

  #[test]
  fn remove_unknown_is_noop() {
    let mut c = SubCollection::new();
    c.push_front(item("a"));
    c.push_front(item("b"));
    let before = c.clone();

    assert!(c.remove(Uuid::new_v4()).is_none());
    assert_eq!(c, before);
  }

  #[test]
  fn remove_from_empty_is_noop() {
    let mut c: SubCollection<Item> = SubCollection::new();
    assert!(c.remove(Uuid::new_v4()).is_none());
    assert!(c.is_empty());
  }

  #[test]
  fn serializes_as_plain_array() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct E {
      id: Uuid,
    }
    impl Entry for E {
      fn entry_id(&self) -> Uuid { self.id }
    }

    let mut c = SubCollection::new();
    let id = Uuid::new_v4();
    c.push_front(E { id });
    let json = serde_json::to_value(&c).unwrap();
    assert_eq!(json, serde_json::json!([{ "id": id }]));

    let back: SubCollection<E> = serde_json::from_value(json).unwrap();
    assert_eq!(back.get(id), Some(&E { id }));
  }
}
