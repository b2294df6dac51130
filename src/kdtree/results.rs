use std::collections::VecDeque;

use crate::kdtree::index::KdTree;
use crate::r#type::CoordNum;

#[derive(Debug, Clone, Copy)]
struct Entry<N: CoordNum> {
    node: u32,
    /// `None` for unordered queries, which make no distance promise.
    sq_dist: Option<N>,
}

/// The matches produced by one radius query.
///
/// A `ResultSet` borrows the tree it came from: the matched nodes stay owned
/// by the tree, and the tree cannot be mutated while any of its result sets
/// is alive. Dropping a set releases only its entry list.
///
/// Iteration order is ascending squared distance for [`KdTree::within`] and
/// most-recently-visited first for [`KdTree::within_unsorted`]. Matches are
/// read through a forward cursor; reading never moves the cursor, and
/// reading past the end yields `None`.
#[derive(Debug)]
pub struct ResultSet<'t, 'p, P, N: CoordNum, const DIM: usize> {
    tree: &'t KdTree<'p, P, N, DIM>,
    entries: VecDeque<Entry<N>>,
    ordered: bool,
    cursor: usize,
}

impl<'t, 'p, P, N: CoordNum, const DIM: usize> ResultSet<'t, 'p, P, N, DIM> {
    pub(crate) fn new(tree: &'t KdTree<'p, P, N, DIM>, ordered: bool) -> Self {
        Self {
            tree,
            entries: VecDeque::new(),
            ordered,
            cursor: 0,
        }
    }

    /// Record a match. Ordered sets keep ascending squared distance, with
    /// ties left in discovery order; unordered sets prepend.
    pub(crate) fn push(&mut self, node: u32, sq_dist: N) {
        if self.ordered {
            let at = self
                .entries
                .partition_point(|entry| entry.sq_dist.is_some_and(|d| d <= sq_dist));
            self.entries.insert(
                at,
                Entry {
                    node,
                    sq_dist: Some(sq_dist),
                },
            );
        } else {
            self.entries.push_front(Entry {
                node,
                sq_dist: None,
            });
        }
    }

    /// The number of matches.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the query matched nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if the matches are sorted by ascending distance.
    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    /// Returns `true` once the cursor has moved past the last match.
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.entries.len()
    }

    /// Move the cursor to the next match.
    ///
    /// Returns `true` while a current match remains afterwards. Advancing
    /// an exhausted cursor stays exhausted and returns `false`.
    pub fn advance(&mut self) -> bool {
        if self.cursor < self.entries.len() {
            self.cursor += 1;
        }
        self.cursor < self.entries.len()
    }

    /// Reset the cursor to the first match.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// The payload of the match under the cursor, or `None` once exhausted.
    pub fn current_payload(&self) -> Option<&'p P> {
        self.current().map(|entry| self.tree.node(entry.node).payload)
    }

    /// The coordinates of the match under the cursor, or `None` once
    /// exhausted.
    pub fn current_point(&self) -> Option<&'t [N; DIM]> {
        self.current().map(|entry| &self.tree.node(entry.node).point)
    }

    /// The squared distance from the query point to the match under the
    /// cursor.
    ///
    /// `None` once exhausted, and `None` for every match of an unordered
    /// query.
    pub fn current_sq_dist(&self) -> Option<N> {
        self.current().and_then(|entry| entry.sq_dist)
    }

    /// The matched payloads in iteration order, independent of the cursor.
    pub fn payloads(&self) -> Vec<&'p P> {
        self.entries
            .iter()
            .map(|entry| self.tree.node(entry.node).payload)
            .collect()
    }

    fn current(&self) -> Option<&Entry<N>> {
        self.entries.get(self.cursor)
    }
}
