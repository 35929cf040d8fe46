//! Insertion-ordered property storage.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use kiln_ir::Name;
use rustc_hash::FxHashMap;

use super::{Object, Pointer};

#[derive(Default)]
struct PropertyTable {
    slots: Vec<(Name, Pointer)>,
    index: FxHashMap<Name, usize>,
}

impl PropertyTable {
    fn get(&self, key: &str) -> Option<&Pointer> {
        self.index.get(key).map(|&i| &self.slots[i].1)
    }

    fn insert(&mut self, key: Name, ptr: Pointer) {
        self.index.insert(key.clone(), self.slots.len());
        self.slots.push((key, ptr));
    }
}

/// Map from property key to cell, iterated in insertion order.
///
/// Cloning shares the map: object properties, module globals, and class
/// statics are all handed out as `PropertyMap` handles.
#[derive(Clone, Default)]
pub struct PropertyMap(Rc<RefCell<PropertyTable>>);

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell for `key`; with `init`, a missing key gets a fresh null cell.
    pub fn get_addr(&self, key: &str, init: bool) -> Option<Pointer> {
        if init {
            return Some(self.get_or_insert_addr(key));
        }
        self.0.borrow().get(key).cloned()
    }

    pub fn get_or_insert_addr(&self, key: &str) -> Pointer {
        let mut table = self.0.borrow_mut();
        if let Some(ptr) = table.get(key) {
            return ptr.clone();
        }
        let ptr = Pointer::new(Object::null(), false);
        table.insert(Name::new(key), ptr.clone());
        ptr
    }

    /// Store `obj` under `key`, creating the cell if needed.
    ///
    /// An existing cell is overwritten in place, so handles to it observe
    /// the new value. With `readonly` the cell is frozen afterwards.
    pub fn init_addr(&self, key: Name, obj: Object, readonly: bool) -> Pointer {
        let mut table = self.0.borrow_mut();
        let ptr = match table.get(&key) {
            Some(ptr) => {
                ptr.overwrite(obj);
                ptr.clone()
            }
            None => {
                let ptr = Pointer::new(obj, false);
                table.insert(key, ptr.clone());
                ptr
            }
        };
        if readonly {
            ptr.freeze();
        }
        ptr
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.borrow().index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Vec<Name> {
        self.0.borrow().slots.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Snapshot of all entries in insertion order.
    pub fn entries(&self) -> Vec<(Name, Pointer)> {
        self.0.borrow().slots.clone()
    }

    /// Whether both handles refer to the same map.
    pub fn same(&self, other: &PropertyMap) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for PropertyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}
