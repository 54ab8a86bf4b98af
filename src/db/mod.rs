//! Resource database.
//!
//! Entries are stored in a trie whose edges are either tight (`.`) or
//! loose (`*`). Nodes live in an arena owned by the database and refer to
//! each other by [`NodeId`], so a database never shares nodes with another
//! one and cloning it is a deep copy.
//!
//! Inserting `foo.bar*gazonk: yep` into an empty database gives:
//!
//! ```text
//! root ─tight─ foo ─tight─ bar ─loose─ gazonk = "yep"
//! ```
//!
//! A specifier that starts with `*` hangs off the reserved top-level
//! component `""`, so `*background` is stored as `"" ─loose─ background`.

mod lookup;
mod merge;

use std::collections::BTreeMap;

use xrdb_text::{join_specifier, parse_records, split_specifier, Binding};

/// Handle of a node in a database's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(usize);

/// The implicit root. Its tight map is the top-level mapping; its loose
/// map stays empty and it never carries a value.
pub(crate) const ROOT: NodeId = NodeId(0);

#[derive(Debug, Clone)]
pub(crate) struct Node<V> {
    tight: BTreeMap<String, NodeId>,
    loose: BTreeMap<String, NodeId>,
    value: Option<V>,
}

impl<V> Node<V> {
    fn empty() -> Self {
        Self {
            tight: BTreeMap::new(),
            loose: BTreeMap::new(),
            value: None,
        }
    }

    fn children(&self, binding: Binding) -> &BTreeMap<String, NodeId> {
        match binding {
            Binding::Tight => &self.tight,
            Binding::Loose => &self.loose,
        }
    }

    fn children_mut(&mut self, binding: Binding) -> &mut BTreeMap<String, NodeId> {
        match binding {
            Binding::Tight => &mut self.tight,
            Binding::Loose => &mut self.loose,
        }
    }
}

/// Errors returned by database lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatabaseError {
    #[error("different number of parts in resource name/class: {name}/{class}")]
    InvalidQuery { name: String, class: String },

    #[error("no resource matches {name}/{class}")]
    NotFound { name: String, class: String },
}

/// A resource database mapping specifiers to values of type `V`.
///
/// Mutated through [`insert`](Self::insert) and [`update`](Self::update),
/// read through [`lookup`](Self::lookup). There is no internal locking.
#[derive(Debug, Clone)]
pub struct Database<V> {
    nodes: Vec<Node<V>>,
}

impl<V> Default for Database<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Database<V> {
    /// Create an empty database.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::empty()],
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<V> {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<V> {
        &mut self.nodes[id.0]
    }

    fn alloc(&mut self, node: Node<V>) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn child_or_insert(&mut self, parent: NodeId, binding: Binding, component: &str) -> NodeId {
        if let Some(&child) = self.node(parent).children(binding).get(component) {
            return child;
        }
        let child = self.alloc(Node::empty());
        self.node_mut(parent)
            .children_mut(binding)
            .insert(component.to_string(), child);
        child
    }

    /// Store `value` under `specifier`.
    ///
    /// A later insert of an identical specifier replaces the value and
    /// keeps everything stored below it. A specifier with an empty final
    /// component (`"foo."`, `"a*"`, `""`) is ignored.
    pub fn insert(&mut self, specifier: &str, value: V) {
        let parts = match split_specifier(specifier) {
            Ok(parts) => parts,
            Err(e) => {
                tracing::debug!(error = %e, "ignoring resource");
                return;
            }
        };

        let mut node = ROOT;
        for (binding, component) in parts {
            node = self.child_or_insert(node, binding, component);
        }
        self.node_mut(node).value = Some(value);
    }

    /// Insert every `(specifier, value)` pair in order.
    pub fn insert_all<I, S>(&mut self, resources: I)
    where
        I: IntoIterator<Item = (S, V)>,
        S: AsRef<str>,
    {
        for (specifier, value) in resources {
            self.insert(specifier.as_ref(), value);
        }
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.value.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored entries as `(specifier, value)`, in a stable order:
    /// components sorted, tight children before loose ones.
    pub fn entries(&self) -> Vec<(String, &V)> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        for (component, &child) in &self.node(ROOT).tight {
            path.push((Binding::Tight, component.as_str()));
            self.collect_entries(child, &mut path, &mut out);
            path.pop();
        }
        out
    }

    fn collect_entries<'a>(
        &'a self,
        id: NodeId,
        path: &mut Vec<(Binding, &'a str)>,
        out: &mut Vec<(String, &'a V)>,
    ) {
        let node = self.node(id);
        if let Some(value) = &node.value {
            out.push((join_specifier(path), value));
        }
        for binding in [Binding::Tight, Binding::Loose] {
            for (component, &child) in node.children(binding) {
                path.push((binding, component.as_str()));
                self.collect_entries(child, path, out);
                path.pop();
            }
        }
    }
}

impl Database<String> {
    /// Parse resource text and insert its records in source order.
    ///
    /// Returns the number of records read.
    pub fn insert_string(&mut self, text: &str) -> usize {
        let mut count = 0;
        for record in parse_records(text) {
            self.insert(&record.specifier, record.value);
            count += 1;
        }
        count
    }
}
