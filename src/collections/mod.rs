//! Owned collections with veto hooks.
//!
//! A [`VetoableCollection`] maps keys to shared items that it owns
//! exclusively. Every mutation runs the same protocol:
//!
//! 1. built-in checks (duplicate key, item already owned elsewhere)
//! 2. `before_add` / `before_remove` hook, which may veto by returning an
//!    error or, for adds, modify the item in place
//! 3. commit, which also sets or clears the item's [`OwnerRef`]
//! 4. `after_add` / `after_remove` hook
//!
//! A failed step leaves the collection untouched. Changes a `before_add`
//! hook made to the item itself are not undone when a later check rejects
//! it. Each hook slot holds at most one handler. Handlers must not mutate
//! the collection that invoked them.
//!
//! The owning block observes commits through separate slots that run after
//! the `after_*` hooks and that [`VetoableCollection::clear_hooks`] leaves
//! alone.

use crate::error::{DxfError, Result};
use ahash::RandomState;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;
use tracing::{debug, warn};

pub mod owner;

pub use owner::OwnerRef;

use self::private::Sealed as _;

/// Shared handle to an item that can be placed in a collection
pub type ItemRef<V> = Rc<RefCell<V>>;

pub(crate) mod private {
    use super::OwnerRef;

    /// Only the collection may rewrite an item's back-reference.
    pub trait Sealed {
        fn set_owner(&mut self, owner: Option<OwnerRef>);
    }
}

/// An item that can live in a [`VetoableCollection`]
pub trait CollectionItem: private::Sealed {
    /// Lookup key
    type Key: Clone + Eq + Hash + fmt::Display;

    /// The item's current key, already normalized
    fn key(&self) -> Self::Key;

    /// Bring a caller-supplied key into the form produced by [`key`](Self::key)
    fn normalize_key(key: &Self::Key) -> Self::Key {
        key.clone()
    }

    /// The collection owner this item currently belongs to
    fn owner(&self) -> Option<&OwnerRef>;
}

type AddVeto<V> = Box<dyn FnMut(&mut V) -> Result<()>>;
type RemoveVeto<V> = Box<dyn FnMut(&V) -> Result<()>>;
type Notify<V> = Box<dyn FnMut(&V)>;

/// Ordered, exclusively owning collection keyed by `K`
pub struct VetoableCollection<K, V> {
    items: IndexMap<K, ItemRef<V>, RandomState>,
    owner: OwnerRef,
    before_add: Option<AddVeto<V>>,
    after_add: Option<Notify<V>>,
    before_remove: Option<RemoveVeto<V>>,
    after_remove: Option<Notify<V>>,
    added_observer: Option<Notify<V>>,
    removed_observer: Option<Notify<V>>,
}

impl<K, V> VetoableCollection<K, V>
where
    K: Clone + Eq + Hash + fmt::Display,
    V: CollectionItem<Key = K>,
{
    pub(crate) fn new(owner: OwnerRef) -> Self {
        VetoableCollection {
            items: IndexMap::default(),
            owner,
            before_add: None,
            after_add: None,
            before_remove: None,
            after_remove: None,
            added_observer: None,
            removed_observer: None,
        }
    }

    /// The owner every item of this collection points back to
    pub fn owner(&self) -> &OwnerRef {
        &self.owner
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.items.contains_key(&V::normalize_key(key))
    }

    /// Check whether this exact item (not just its key) is in the collection
    pub fn contains(&self, item: &ItemRef<V>) -> bool {
        self.items.values().any(|stored| Rc::ptr_eq(stored, item))
    }

    pub fn get(&self, key: &K) -> Option<&ItemRef<V>> {
        self.items.get(&V::normalize_key(key))
    }

    /// Iterate over items in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ItemRef<V>> {
        self.items.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.items.keys()
    }

    /// Register the pre-add hook. It may veto the add or modify the item.
    pub fn set_before_add<F>(&mut self, hook: F)
    where
        F: FnMut(&mut V) -> Result<()> + 'static,
    {
        self.before_add = Some(Box::new(hook));
    }

    /// Register the post-add hook, called once per committed add.
    pub fn set_after_add<F>(&mut self, hook: F)
    where
        F: FnMut(&V) + 'static,
    {
        self.after_add = Some(Box::new(hook));
    }

    /// Register the pre-remove hook. It may veto the removal.
    pub fn set_before_remove<F>(&mut self, hook: F)
    where
        F: FnMut(&V) -> Result<()> + 'static,
    {
        self.before_remove = Some(Box::new(hook));
    }

    /// Register the post-remove hook, called once per committed removal.
    pub fn set_after_remove<F>(&mut self, hook: F)
    where
        F: FnMut(&V) + 'static,
    {
        self.after_remove = Some(Box::new(hook));
    }

    /// Owner-level observer of committed adds, independent of the hooks
    pub(crate) fn set_added_observer<F>(&mut self, observer: F)
    where
        F: FnMut(&V) + 'static,
    {
        self.added_observer = Some(Box::new(observer));
    }

    /// Owner-level observer of committed removals
    pub(crate) fn set_removed_observer<F>(&mut self, observer: F)
    where
        F: FnMut(&V) + 'static,
    {
        self.removed_observer = Some(Box::new(observer));
    }

    /// Unregister all four hooks. Observers installed by the owner stay.
    pub fn clear_hooks(&mut self) {
        self.before_add = None;
        self.after_add = None;
        self.before_remove = None;
        self.after_remove = None;
    }

    fn check_insert(&self, key: &K, value: &V) -> Result<()> {
        if self.items.contains_key(key) {
            return Err(DxfError::DuplicateKey(key.to_string()));
        }
        if value.owner().is_some() {
            return Err(DxfError::OwnershipConflict {
                key: key.to_string(),
            });
        }
        Ok(())
    }

    /// Add an item, taking ownership of it.
    ///
    /// Fails with [`DxfError::DuplicateKey`] if the key is taken,
    /// [`DxfError::OwnershipConflict`] if the item already belongs to a
    /// collection, or whatever error the `before_add` hook returns.
    ///
    /// The `before_add` hook edits the caller's item directly. If the key it
    /// produces is then rejected, the item stays unowned but keeps the edit.
    pub fn add(&mut self, item: ItemRef<V>) -> Result<()> {
        let key = {
            let mut value = item
                .try_borrow_mut()
                .map_err(|_| DxfError::ItemInUse("item being added".to_string()))?;

            let proposed = value.key();
            self.check_insert(&proposed, &*value)?;

            if let Some(hook) = self.before_add.as_mut() {
                if let Err(err) = hook(&mut *value) {
                    warn!(key = %proposed, error = %err, "add vetoed");
                    return Err(err);
                }
            }

            let key = value.key();
            if key != proposed {
                self.check_insert(&key, &*value)?;
            }

            value.set_owner(Some(self.owner.clone()));
            key
        };

        self.items.insert(key.clone(), Rc::clone(&item));
        debug!(key = %key, count = self.items.len(), "item added");

        let value = item.borrow();
        if let Some(hook) = self.after_add.as_mut() {
            hook(&*value);
        }
        if let Some(observer) = self.added_observer.as_mut() {
            observer(&*value);
        }
        Ok(())
    }

    /// Add items one by one through [`add`](Self::add).
    ///
    /// Stops at the first failure. Items added before the failure stay in
    /// the collection.
    pub fn add_range<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = ItemRef<V>>,
    {
        for item in items {
            self.add(item)?;
        }
        Ok(())
    }

    /// Remove the item stored under `key` and hand it back unowned.
    pub fn remove(&mut self, key: &K) -> Result<ItemRef<V>> {
        let key = V::normalize_key(key);
        let item = self
            .items
            .get(&key)
            .cloned()
            .ok_or_else(|| DxfError::NotFound(key.to_string()))?;

        {
            let mut value = item
                .try_borrow_mut()
                .map_err(|_| DxfError::ItemInUse(key.to_string()))?;

            if let Some(hook) = self.before_remove.as_mut() {
                if let Err(err) = hook(&*value) {
                    warn!(key = %key, error = %err, "remove vetoed");
                    return Err(err);
                }
            }

            self.items.shift_remove(&key);
            value.set_owner(None);
        }
        debug!(key = %key, count = self.items.len(), "item removed");

        {
            let value = item.borrow();
            if let Some(hook) = self.after_remove.as_mut() {
                hook(&*value);
            }
            if let Some(observer) = self.removed_observer.as_mut() {
                observer(&*value);
            }
        }
        Ok(item)
    }

    /// Remove this exact item. Fails with [`DxfError::NotFound`] if a
    /// different item is stored under its key.
    pub fn remove_item(&mut self, item: &ItemRef<V>) -> Result<ItemRef<V>> {
        let key = item
            .try_borrow()
            .map_err(|_| DxfError::ItemInUse("item being removed".to_string()))?
            .key();
        match self.items.get(&key) {
            Some(stored) if Rc::ptr_eq(stored, item) => self.remove(&key),
            _ => Err(DxfError::NotFound(key.to_string())),
        }
    }

    /// Remove every item through [`remove`](Self::remove), stopping at the
    /// first veto.
    pub fn clear(&mut self) -> Result<()> {
        let keys: Vec<K> = self.items.keys().cloned().collect();
        for key in keys {
            self.remove(&key)?;
        }
        Ok(())
    }
}

impl<K: fmt::Debug, V> fmt::Debug for VetoableCollection<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VetoableCollection")
            .field("keys", &self.items.keys().collect::<Vec<_>>())
            .field("before_add", &self.before_add.is_some())
            .field("after_add", &self.after_add.is_some())
            .field("before_remove", &self.before_remove.is_some())
            .field("after_remove", &self.after_remove.is_some())
            .field("added_observer", &self.added_observer.is_some())
            .field("removed_observer", &self.removed_observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::owner::OwnerAnchor;
    use super::*;
    use std::cell::Cell;

    #[derive(Debug)]
    struct Tagged {
        tag: String,
        owner: Option<OwnerRef>,
    }

    impl Tagged {
        fn shared(tag: &str) -> ItemRef<Tagged> {
            Rc::new(RefCell::new(Tagged {
                tag: tag.to_string(),
                owner: None,
            }))
        }
    }

    impl private::Sealed for Tagged {
        fn set_owner(&mut self, owner: Option<OwnerRef>) {
            self.owner = owner;
        }
    }

    impl CollectionItem for Tagged {
        type Key = String;

        fn key(&self) -> String {
            self.tag.to_uppercase()
        }

        fn normalize_key(key: &String) -> String {
            key.to_uppercase()
        }

        fn owner(&self) -> Option<&OwnerRef> {
            self.owner.as_ref()
        }
    }

    fn collection(anchor: &Rc<OwnerAnchor>) -> VetoableCollection<String, Tagged> {
        VetoableCollection::new(OwnerRef::from_anchor(anchor))
    }

    #[test]
    fn test_add_sets_owner_and_preserves_order() {
        let anchor = OwnerAnchor::new_ref();
        let mut items = collection(&anchor);

        items.add(Tagged::shared("b")).unwrap();
        items.add(Tagged::shared("a")).unwrap();

        assert_eq!(items.keys().cloned().collect::<Vec<_>>(), vec!["B", "A"]);
        let stored = items.get(&"a".to_string()).unwrap();
        assert_eq!(stored.borrow().owner(), Some(items.owner()));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let anchor = OwnerAnchor::new_ref();
        let mut items = collection(&anchor);
        items.add(Tagged::shared("x")).unwrap();

        let dup = Tagged::shared("X");
        let err = items.add(Rc::clone(&dup)).unwrap_err();
        assert!(matches!(err, DxfError::DuplicateKey(_)));
        assert_eq!(items.len(), 1);
        assert!(dup.borrow().owner().is_none());
    }

    #[test]
    fn test_owned_item_rejected_elsewhere() {
        let first_anchor = OwnerAnchor::new_ref();
        let second_anchor = OwnerAnchor::new_ref();
        let mut first = collection(&first_anchor);
        let mut second = collection(&second_anchor);

        let item = Tagged::shared("shared");
        first.add(Rc::clone(&item)).unwrap();

        let err = second.add(Rc::clone(&item)).unwrap_err();
        assert!(matches!(err, DxfError::OwnershipConflict { .. }));
        assert!(second.is_empty());
    }

    #[test]
    fn test_before_add_veto_leaves_collection_unchanged() {
        let anchor = OwnerAnchor::new_ref();
        let mut items = collection(&anchor);
        items.set_before_add(|item: &mut Tagged| {
            if item.tag.starts_with('_') {
                return Err("private tags are not allowed".into());
            }
            Ok(())
        });

        let item = Tagged::shared("_hidden");
        assert!(items.add(Rc::clone(&item)).is_err());
        assert!(items.is_empty());
        assert!(item.borrow().owner().is_none());
    }

    #[test]
    fn test_before_add_can_transform_item() {
        let anchor = OwnerAnchor::new_ref();
        let mut items = collection(&anchor);
        items.set_before_add(|item: &mut Tagged| {
            item.tag = format!("{}_1", item.tag);
            Ok(())
        });

        items.add(Tagged::shared("door")).unwrap();
        assert!(items.contains_key(&"DOOR_1".to_string()));
        assert!(!items.contains_key(&"DOOR".to_string()));
    }

    #[test]
    fn test_transformed_key_is_checked_for_duplicates() {
        let anchor = OwnerAnchor::new_ref();
        let mut items = collection(&anchor);
        items.add(Tagged::shared("taken")).unwrap();
        items.set_before_add(|item: &mut Tagged| {
            item.tag = "taken".to_string();
            Ok(())
        });

        let err = items.add(Tagged::shared("free")).unwrap_err();
        assert!(matches!(err, DxfError::DuplicateKey(_)));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_hooks_fire_once_and_in_order() {
        let anchor = OwnerAnchor::new_ref();
        let mut items = collection(&anchor);
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = Rc::clone(&log);
        items.set_before_add(move |item: &mut Tagged| {
            l.borrow_mut().push(format!("before_add {}", item.tag));
            Ok(())
        });
        let l = Rc::clone(&log);
        items.set_after_add(move |item: &Tagged| {
            assert!(item.owner().is_some());
            l.borrow_mut().push(format!("after_add {}", item.tag));
        });
        let l = Rc::clone(&log);
        items.set_before_remove(move |item: &Tagged| {
            l.borrow_mut().push(format!("before_remove {}", item.tag));
            Ok(())
        });
        let l = Rc::clone(&log);
        items.set_after_remove(move |item: &Tagged| {
            assert!(item.owner().is_none());
            l.borrow_mut().push(format!("after_remove {}", item.tag));
        });

        items.add(Tagged::shared("a")).unwrap();
        items.remove(&"a".to_string()).unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["before_add a", "after_add a", "before_remove a", "after_remove a"]
        );
    }

    #[test]
    fn test_remove_clears_owner_and_allows_readd() {
        let first_anchor = OwnerAnchor::new_ref();
        let second_anchor = OwnerAnchor::new_ref();
        let mut first = collection(&first_anchor);
        let mut second = collection(&second_anchor);

        let item = Tagged::shared("moving");
        first.add(Rc::clone(&item)).unwrap();
        let removed = first.remove(&"MOVING".to_string()).unwrap();
        assert!(Rc::ptr_eq(&removed, &item));
        assert!(item.borrow().owner().is_none());

        second.add(item).unwrap();
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let anchor = OwnerAnchor::new_ref();
        let mut items = collection(&anchor);
        let err = items.remove(&"nothing".to_string()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_before_remove_veto_keeps_item() {
        let anchor = OwnerAnchor::new_ref();
        let mut items = collection(&anchor);
        items.add(Tagged::shared("keep")).unwrap();
        items.set_before_remove(|_: &Tagged| Err("locked".into()));

        assert!(items.remove(&"keep".to_string()).is_err());
        assert_eq!(items.len(), 1);
        assert!(items.iter().next().unwrap().borrow().owner().is_some());
    }

    #[test]
    fn test_add_range_stops_without_rollback() {
        let anchor = OwnerAnchor::new_ref();
        let mut items = collection(&anchor);
        let batch = vec![
            Tagged::shared("one"),
            Tagged::shared("two"),
            Tagged::shared("ONE"),
            Tagged::shared("three"),
        ];

        let err = items.add_range(batch).unwrap_err();
        assert!(matches!(err, DxfError::DuplicateKey(_)));
        assert_eq!(items.keys().cloned().collect::<Vec<_>>(), vec!["ONE", "TWO"]);
    }

    #[test]
    fn test_remove_item_requires_same_instance() {
        let anchor = OwnerAnchor::new_ref();
        let mut items = collection(&anchor);
        items.add(Tagged::shared("a")).unwrap();

        let impostor = Tagged::shared("a");
        assert!(items.remove_item(&impostor).unwrap_err().is_not_found());
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_clear_stops_at_veto() {
        let anchor = OwnerAnchor::new_ref();
        let mut items = collection(&anchor);
        items.add(Tagged::shared("a")).unwrap();
        items.add(Tagged::shared("locked")).unwrap();
        items.add(Tagged::shared("c")).unwrap();
        let removed = Rc::new(Cell::new(0));
        let r = Rc::clone(&removed);
        items.set_after_remove(move |_: &Tagged| r.set(r.get() + 1));
        items.set_before_remove(|item: &Tagged| {
            if item.tag == "locked" {
                return Err("locked".into());
            }
            Ok(())
        });

        assert!(items.clear().is_err());
        assert_eq!(removed.get(), 1);
        assert_eq!(items.keys().cloned().collect::<Vec<_>>(), vec!["LOCKED", "C"]);
    }

    #[test]
    fn test_borrowed_item_cannot_be_added() {
        let anchor = OwnerAnchor::new_ref();
        let mut items = collection(&anchor);
        let item = Tagged::shared("busy");
        let _guard = item.borrow();

        let err = items.add(Rc::clone(&item)).unwrap_err();
        assert!(matches!(err, DxfError::ItemInUse(_)));
    }

    #[test]
    fn test_observers_run_after_hooks_and_survive_clear_hooks() {
        let anchor = OwnerAnchor::new_ref();
        let mut items = collection(&anchor);
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = Rc::clone(&log);
        items.set_added_observer(move |item: &Tagged| {
            l.borrow_mut().push(format!("observed +{}", item.tag))
        });
        let l = Rc::clone(&log);
        items.set_removed_observer(move |item: &Tagged| {
            l.borrow_mut().push(format!("observed -{}", item.tag))
        });
        let l = Rc::clone(&log);
        items.set_after_add(move |item: &Tagged| {
            l.borrow_mut().push(format!("hook +{}", item.tag))
        });

        items.add(Tagged::shared("a")).unwrap();
        items.clear_hooks();
        items.add(Tagged::shared("b")).unwrap();
        items.remove(&"a".to_string()).unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["hook +a", "observed +a", "observed +b", "observed -a"]
        );
    }

    #[test]
    fn test_rejected_transformed_item_keeps_edit_but_stays_unowned() {
        let anchor = OwnerAnchor::new_ref();
        let mut items = collection(&anchor);
        items.add(Tagged::shared("taken")).unwrap();
        items.set_before_add(|item: &mut Tagged| {
            item.tag = "taken".to_string();
            Ok(())
        });

        let item = Tagged::shared("free");
        assert!(items.add(Rc::clone(&item)).is_err());
        assert_eq!(item.borrow().tag, "taken");
        assert!(item.borrow().owner().is_none());
        assert_eq!(items.len(), 1);
    }
}
