//! Best-match lookup.
//!
//! A query is a name path and a class path of equal length `N`. The search
//! is best-first over partial matches ("candidates"), each scored by the
//! tuple of per-component match kinds consumed so far. Lower is better:
//!
//! ```text
//! name  . 0   * 1
//! class . 2   * 3
//! ?     . 4   * 5
//! skip      6          (a loose binding spanning one more component)
//! ```
//!
//! Tuples compare lexicographically. The smallest candidate is always
//! extended next, so the first candidate that reaches depth `N` on a node
//! carrying a value is the best match and is returned immediately.

use std::collections::BTreeMap;

use xrdb_text::split_path;

use super::{Database, DatabaseError, NodeId, ROOT};

const NAME_MATCH: u8 = 0;
const CLASS_MATCH: u8 = 2;
const WILD_MATCH: u8 = 4;
const MATCH_SKIP: u8 = 6;

/// Where a candidate continues from.
#[derive(Debug, Clone, Copy)]
enum Resume {
    /// Tight then loose children of a node.
    Group(NodeId),
    /// Only the loose children of a node, with no loose penalty. Used
    /// while a loose binding is spanning components.
    Skip(NodeId),
}

/// Candidates keyed by score. An equal score is never inserted twice.
type Candidates = BTreeMap<Vec<u8>, Resume>;

fn push(candidates: &mut Candidates, path: Vec<u8>, resume: Resume) {
    candidates.entry(path).or_insert(resume);
}

fn extended(path: &[u8], score: u8) -> Vec<u8> {
    let mut next = Vec::with_capacity(path.len() + 1);
    next.extend_from_slice(path);
    next.push(score);
    next
}

fn joined<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join(".")
}

impl<V> Database<V> {
    /// Match one component from `resume`.
    fn match_component(
        &self,
        path: &[u8],
        resume: Resume,
        component: &str,
        score: u8,
    ) -> Option<(Vec<u8>, NodeId)> {
        match resume {
            Resume::Skip(id) => self
                .node(id)
                .loose
                .get(component)
                .map(|&child| (extended(path, score), child)),
            Resume::Group(id) => {
                let node = self.node(id);
                if let Some(&child) = node.tight.get(component) {
                    Some((extended(path, score), child))
                } else {
                    node.loose
                        .get(component)
                        .map(|&child| (extended(path, score + 1), child))
                }
            }
        }
    }

    /// Let a loose binding span the next component.
    ///
    /// Only possible while at least one component is left after the
    /// skipped one, and only if there are loose children to resume from.
    fn skip_component(&self, path: &[u8], resume: Resume, n: usize) -> Option<(Vec<u8>, Resume)> {
        if path.len() + 1 >= n {
            return None;
        }
        let id = match resume {
            Resume::Group(id) | Resume::Skip(id) => id,
        };
        if self.node(id).loose.is_empty() {
            return None;
        }
        Some((extended(path, MATCH_SKIP), Resume::Skip(id)))
    }

    fn final_value(&self, depth: usize, resume: Resume, n: usize) -> Option<&V> {
        match resume {
            Resume::Group(id) if depth == n => self.node(id).value.as_ref(),
            _ => None,
        }
    }

    /// Find the value best matching a name path and class path.
    ///
    /// Fails with [`DatabaseError::InvalidQuery`] if the paths differ in
    /// length and [`DatabaseError::NotFound`] if nothing matches.
    pub fn lookup<S: AsRef<str>>(&self, name: &[S], class: &[S]) -> Result<&V, DatabaseError> {
        if name.len() != class.len() {
            return Err(DatabaseError::InvalidQuery {
                name: joined(name),
                class: joined(class),
            });
        }

        let n = name.len();
        let not_found = || DatabaseError::NotFound {
            name: joined(name),
            class: joined(class),
        };
        if n == 0 {
            return Err(not_found());
        }

        let top = &self.node(ROOT).tight;
        let mut candidates = Candidates::new();

        // Depth 0 is seeded from at most one of name, class or '?'
        let seed = [
            (name[0].as_ref(), NAME_MATCH),
            (class[0].as_ref(), CLASS_MATCH),
            ("?", WILD_MATCH),
        ]
        .into_iter()
        .find_map(|(component, score)| top.get(component).map(|&id| (vec![score], id)));

        if let Some((path, id)) = seed {
            if let Some(value) = self.final_value(path.len(), Resume::Group(id), n) {
                return Ok(value);
            }
            push(&mut candidates, path, Resume::Group(id));
        }

        // Specifiers that begin with a loose binding
        if let Some(&id) = top.get("") {
            push(&mut candidates, Vec::new(), Resume::Skip(id));
        }

        while let Some((path, resume)) = candidates.pop_first() {
            let depth = path.len();
            if depth >= n {
                if let Some(value) = self.final_value(depth, resume, n) {
                    return Ok(value);
                }
                continue;
            }

            for (component, score) in [
                (name[depth].as_ref(), NAME_MATCH),
                (class[depth].as_ref(), CLASS_MATCH),
                ("?", WILD_MATCH),
            ] {
                if let Some((next, child)) = self.match_component(&path, resume, component, score) {
                    if let Some(value) = self.final_value(next.len(), Resume::Group(child), n) {
                        return Ok(value);
                    }
                    push(&mut candidates, next, Resume::Group(child));
                }
            }

            if let Some((next, skip)) = self.skip_component(&path, resume, n) {
                push(&mut candidates, next, skip);
            }
        }

        tracing::trace!(name = %joined(name), class = %joined(class), "no resource matched");
        Err(not_found())
    }

    /// Like [`lookup`](Self::lookup), returning `default` when nothing
    /// matches. An invalid query is still an error.
    pub fn lookup_or<'a, S: AsRef<str>>(
        &'a self,
        name: &[S],
        class: &[S],
        default: &'a V,
    ) -> Result<&'a V, DatabaseError> {
        match self.lookup(name, class) {
            Err(DatabaseError::NotFound { .. }) => Ok(default),
            result => result,
        }
    }

    /// Look up dotted name and class strings, e.g.
    /// `query("xterm.vt100.background", "XTerm.VT100.Background")`.
    pub fn query(&self, name: &str, class: &str) -> Result<&V, DatabaseError> {
        self.lookup(&split_path(name), &split_path(class))
    }

    /// Like [`query`](Self::query), returning `default` when nothing
    /// matches. An invalid query is still an error.
    pub fn query_or<'a>(
        &'a self,
        name: &str,
        class: &str,
        default: &'a V,
    ) -> Result<&'a V, DatabaseError> {
        self.lookup_or(&split_path(name), &split_path(class), default)
    }
}
