//! Lexical scopes for locals.
//!
//! Scopes form a stack of blocks. A block pushed as an activation frame
//! (one per interpreted call) hides every block beneath it, so a callee
//! never sees its caller's locals.

use kiln_ir::LocalId;
use rustc_hash::FxHashMap;

use crate::rt::{Object, Pointer};

struct ScopeBlock {
    activation: bool,
    slots: FxHashMap<LocalId, Pointer>,
}

impl ScopeBlock {
    fn new(activation: bool) -> Self {
        ScopeBlock {
            activation,
            slots: FxHashMap::default(),
        }
    }
}

/// Stack of scope blocks mapping locals to cells.
pub struct LocalScope {
    blocks: Vec<ScopeBlock>,
}

impl LocalScope {
    /// Create a scope stack holding one root activation block.
    pub fn new() -> Self {
        LocalScope {
            blocks: vec![ScopeBlock::new(true)],
        }
    }

    /// Number of blocks, including the root.
    pub fn depth(&self) -> usize {
        self.blocks.len()
    }

    pub fn push(&mut self, activation: bool) {
        self.blocks.push(ScopeBlock::new(activation));
    }

    /// Pop the innermost block. The root block is never popped.
    pub fn pop(&mut self) {
        debug_assert!(self.blocks.len() > 1, "popped the root scope block");
        if self.blocks.len() > 1 {
            self.blocks.pop();
        }
    }

    fn innermost(&mut self) -> &mut ScopeBlock {
        match self.blocks.last_mut() {
            Some(block) => block,
            None => unreachable!("scope stack always holds its root block"),
        }
    }

    /// Bind `local` to `ptr` in the innermost block, shadowing outer bindings.
    pub fn declare(&mut self, local: LocalId, ptr: Pointer) {
        self.innermost().slots.insert(local, ptr);
    }

    /// Bind `local` to a fresh null cell in the innermost block.
    pub fn register(&mut self, local: LocalId) -> Pointer {
        let ptr = Pointer::new(Object::null(), false);
        self.declare(local, ptr.clone());
        ptr
    }

    /// Find the cell of `local`, searching outwards up to and including the
    /// nearest activation block.
    pub fn lookup(&self, local: LocalId) -> Option<Pointer> {
        for block in self.blocks.iter().rev() {
            if let Some(ptr) = block.slots.get(&local) {
                return Some(ptr.clone());
            }
            if block.activation {
                break;
            }
        }
        None
    }

    /// Like [`lookup`](Self::lookup); with `init`, a missing local is
    /// registered in the innermost block.
    pub fn value_addr(&mut self, local: LocalId, init: bool) -> Option<Pointer> {
        match self.lookup(local) {
            Some(ptr) => Some(ptr),
            None if init => Some(self.register(local)),
            None => None,
        }
    }

    /// Store into `local`, registering it if needed. Returns `false` if the
    /// cell is read-only.
    pub fn set_value(&mut self, local: LocalId, obj: Object) -> bool {
        match self.value_addr(local, true) {
            Some(ptr) => ptr.set(obj),
            None => false,
        }
    }
}

impl Default for LocalScope {
    fn default() -> Self {
        Self::new()
    }
}
