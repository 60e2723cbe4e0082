//! Stable identifiers derived from label strings.
//!
//! Tables, header buttons and resize handles are identified by hashing their
//! label together with the id on top of the id stack, so the same label used
//! in two different scopes produces two different ids.

use std::fmt;

/// FNV-1a prime for hash mixing.
const FNV_PRIME: u64 = 0x100000001b3;
/// FNV-1a offset basis.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Id(pub u64);

impl Id {
    /// The root scope every stack starts from.
    pub const ROOT: Id = Id(FNV_OFFSET);

    /// Hash `label` in the scope of `self`.
    pub fn with_str(self, label: &str) -> Id {
        Id(hash_bytes(self.0, label.as_bytes()))
    }

    /// Hash an integer in the scope of `self` (column indices, instance numbers).
    pub fn with_int(self, value: u64) -> Id {
        Id(hash_bytes(self.0, &value.to_le_bytes()))
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({:016x})", self.0)
    }
}

#[inline]
fn hash_bytes(seed: u64, bytes: &[u8]) -> u64 {
    let mut hash = seed;
    for byte in bytes {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// The visible part of a label. Everything from `##` onward only feeds the id.
pub fn display_label(label: &str) -> &str {
    match label.find("##") {
        Some(pos) => &label[..pos],
        None => label,
    }
}

#[derive(Debug, Clone)]
pub struct IdStack {
    stack: Vec<Id>,
}

impl Default for IdStack {
    fn default() -> Self {
        Self::new()
    }
}

impl IdStack {
    pub fn new() -> Self {
        Self {
            stack: vec![Id::ROOT],
        }
    }

    pub fn current(&self) -> Id {
        // The root entry is never popped.
        self.stack[self.stack.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn get(&self, label: &str) -> Id {
        self.current().with_str(label)
    }

    pub fn push_str(&mut self, label: &str) {
        let id = self.get(label);
        self.stack.push(id);
    }

    pub fn push_int(&mut self, value: u64) {
        let id = self.current().with_int(value);
        self.stack.push(id);
    }

    pub fn push_id(&mut self, id: Id) {
        self.stack.push(id);
    }

    pub fn pop(&mut self) {
        assert!(self.stack.len() > 1, "IdStack::pop called on the root scope");
        self.stack.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_label_same_scope_is_stable() {
        let stack = IdStack::new();
        assert_eq!(stack.get("table"), stack.get("table"));
        assert_ne!(stack.get("table"), stack.get("other"));
    }

    #[test]
    fn test_scopes_separate_ids() {
        let mut stack = IdStack::new();
        let outer = stack.get("cell");
        stack.push_str("window");
        let inner = stack.get("cell");
        stack.pop();
        assert_ne!(outer, inner);
        assert_eq!(stack.get("cell"), outer);
    }

    #[test]
    fn test_display_label_hides_id_suffix() {
        assert_eq!(display_label("Name##col0"), "Name");
        assert_eq!(display_label("Name"), "Name");
        assert_eq!(display_label("##hidden"), "");
    }

    #[test]
    #[should_panic]
    fn test_pop_root_panics() {
        let mut stack = IdStack::new();
        stack.pop();
    }
}
