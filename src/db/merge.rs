//! Database merging.
//!
//! Merge semantics, applied recursively from the top level:
//! - Component only in the source: deep copy of the whole subtree
//! - Component in both: union tight and loose children
//! - Value in the source: overrides the destination value at that node

use std::collections::BTreeMap;

use xrdb_text::Binding;

use super::{Database, Node, NodeId, ROOT};

impl<V: Clone> Database<V> {
    /// Merge every entry of `other` into this database.
    ///
    /// Nodes are copied into this database's arena, so later changes to
    /// either database never show up in the other.
    pub fn update(&mut self, other: &Database<V>) {
        let before = self.nodes.len();
        self.merge_node(ROOT, other, ROOT);
        tracing::debug!(
            copied_nodes = self.nodes.len() - before,
            "merged resource database"
        );
    }

    fn merge_node(&mut self, dest: NodeId, src: &Database<V>, src_id: NodeId) {
        let src_node = src.node(src_id);

        for binding in [Binding::Tight, Binding::Loose] {
            for (component, &src_child) in src_node.children(binding) {
                let existing = self.node(dest).children(binding).get(component).copied();
                match existing {
                    Some(dest_child) => self.merge_node(dest_child, src, src_child),
                    None => {
                        let copied = self.copy_subtree(src, src_child);
                        self.node_mut(dest)
                            .children_mut(binding)
                            .insert(component.clone(), copied);
                    }
                }
            }
        }

        if let Some(value) = &src_node.value {
            self.node_mut(dest).value = Some(value.clone());
        }
    }

    fn copy_subtree(&mut self, src: &Database<V>, src_id: NodeId) -> NodeId {
        let src_node = src.node(src_id);
        let mut copy = Node {
            tight: BTreeMap::new(),
            loose: BTreeMap::new(),
            value: src_node.value.clone(),
        };
        for (component, &child) in &src_node.tight {
            copy.tight.insert(component.clone(), self.copy_subtree(src, child));
        }
        for (component, &child) in &src_node.loose {
            copy.loose.insert(component.clone(), self.copy_subtree(src, child));
        }
        self.alloc(copy)
    }
}
