use std::cmp::Ordering;
use std::num::NonZeroU32;

use tinyvec::TinyVec;

use crate::error::{KdIndexError, Result};
use crate::kdtree::bounds::BoundingBox;
use crate::kdtree::results::ResultSet;
use crate::r#type::CoordNum;

/// A stored point: its coordinate copy, the borrowed payload, the splitting
/// axis used at this position, and the child links.
///
/// Nodes live in the tree's arena and address each other by slot. The root
/// always occupies slot 0, so child links fit in `Option<NonZeroU32>`.
#[derive(Debug)]
pub(crate) struct Node<'p, P, N: CoordNum, const DIM: usize> {
    pub(crate) point: [N; DIM],
    pub(crate) payload: &'p P,
    axis: u8,
    left: Option<NonZeroU32>,
    right: Option<NonZeroU32>,
}

impl<'p, P, N: CoordNum, const DIM: usize> Node<'p, P, N, DIM> {
    fn new(point: [N; DIM], payload: &'p P, axis: u8) -> Self {
        Self {
            point,
            payload,
            axis,
            left: None,
            right: None,
        }
    }
}

/// A mutable k-d tree over `DIM`-dimensional points carrying borrowed
/// payloads.
///
/// Points are inserted one at a time and queried by radius; the tree never
/// rebalances, deletes, or bulk-loads. Coordinates are copied into the tree
/// on insertion, while payloads are only borrowed and must outlive the tree.
///
/// The structure is single-threaded: `insert` takes `&mut self`, and a
/// [`ResultSet`] borrows the tree for as long as it is alive, so writers and
/// readers are serialized by the borrow checker rather than by locks.
#[derive(Debug)]
pub struct KdTree<'p, P, N: CoordNum, const DIM: usize> {
    nodes: Vec<Node<'p, P, N, DIM>>,
    bounds: Option<BoundingBox<N, DIM>>,
}

impl<'p, P, N: CoordNum, const DIM: usize> KdTree<'p, P, N, DIM> {
    const VALID_DIM: () = assert!(DIM == 2 || DIM == 3, "dimension can only be 2 or 3");

    /// Create an empty tree.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty tree with arena space reserved for `capacity` points.
    pub fn with_capacity(capacity: usize) -> Self {
        let _ = Self::VALID_DIM;
        Self {
            nodes: Vec::with_capacity(capacity),
            bounds: None,
        }
    }

    /// The number of points in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no points have been inserted.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The smallest axis-aligned box enclosing every inserted point, or
    /// `None` while the tree is empty.
    pub fn bounds(&self) -> Option<&BoundingBox<N, DIM>> {
        self.bounds.as_ref()
    }

    /// Drop every node and the bounding region, leaving an empty tree.
    ///
    /// Payloads are untouched; the tree never owned them.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.bounds = None;
    }

    /// Add a point to the tree.
    ///
    /// The coordinates are copied; `payload` is borrowed and must outlive
    /// the tree. Points whose coordinate on a node's splitting axis equals
    /// the node's own are routed to the right subtree. Always returns
    /// `true`: insertion has no failure path for well-formed input, and the
    /// return value exists for symmetry with the query interface.
    pub fn insert(&mut self, point: [N; DIM], payload: &'p P) -> bool {
        assert!(
            self.nodes.len() < u32::MAX as usize,
            "Tree is full: {} points.",
            self.nodes.len()
        );

        if self.nodes.is_empty() {
            self.nodes.push(Node::new(point, payload, 0));
        } else {
            let (parent, go_left) = self.descend_to_slot(&point);
            let axis = ((self.nodes[parent].axis as usize + 1) % DIM) as u8;
            // The arena is non-empty, so the new slot index is never zero.
            let link = NonZeroU32::new(self.nodes.len() as u32);
            debug_assert!(link.is_some());
            self.nodes.push(Node::new(point, payload, axis));
            let parent = &mut self.nodes[parent];
            if go_left {
                parent.left = link;
            } else {
                parent.right = link;
            }
        }

        match self.bounds.as_mut() {
            Some(bounds) => bounds.extend(&point),
            None => self.bounds = Some(BoundingBox::from_point(&point)),
        }

        true
    }

    /// Walk from the root to the empty child slot where `point` belongs,
    /// comparing on each visited node's stored splitting axis.
    ///
    /// A loop rather than recursion: degenerate insertion orders (e.g.
    /// sorted input) make the tree as deep as it is large.
    fn descend_to_slot(&self, point: &[N; DIM]) -> (usize, bool) {
        let mut current = 0;
        loop {
            let node = &self.nodes[current];
            let axis = node.axis as usize;
            let go_left = point[axis] < node.point[axis];
            let child = if go_left { node.left } else { node.right };
            match child {
                Some(next) => current = next.get() as usize,
                None => return (current, go_left),
            }
        }
    }

    /// Search the tree for points within `radius` of `center`, closest
    /// first.
    ///
    /// Matching is inclusive and computed in squared-distance space
    /// (`distance² <= radius²`). Results are sorted by ascending squared
    /// distance; matches at the same distance stay in discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`KdIndexError::InvalidRadius`] if `radius` is negative or
    /// NaN.
    pub fn within(&self, center: &[N; DIM], radius: N) -> Result<ResultSet<'_, 'p, P, N, DIM>> {
        self.range_query(center, radius, true)
    }

    /// Search the tree for points within `radius` of `center`, without
    /// sorting.
    ///
    /// Each match is prepended to the result list in O(1), so iteration
    /// yields the most recently visited match first and entries carry no
    /// distance values.
    ///
    /// # Errors
    ///
    /// Returns [`KdIndexError::InvalidRadius`] if `radius` is negative or
    /// NaN.
    pub fn within_unsorted(
        &self,
        center: &[N; DIM],
        radius: N,
    ) -> Result<ResultSet<'_, 'p, P, N, DIM>> {
        self.range_query(center, radius, false)
    }

    fn range_query(
        &self,
        center: &[N; DIM],
        radius: N,
        ordered: bool,
    ) -> Result<ResultSet<'_, 'p, P, N, DIM>> {
        // partial_cmp rejects NaN radii along with negative ones.
        if !matches!(
            radius.partial_cmp(&N::zero()),
            Some(Ordering::Greater | Ordering::Equal)
        ) {
            return Err(KdIndexError::InvalidRadius(format!("{:?}", radius)));
        }

        let mut results = ResultSet::new(self, ordered);
        if self.nodes.is_empty() {
            return Ok(results);
        }

        let radius_sq = radius.square();

        // Use TinyVec to avoid heap allocations on shallow trees.
        let mut stack: TinyVec<[u32; 32]> = TinyVec::new();
        stack.push(0);

        // Depth-first descent over the node arena. Children are pushed far
        // side first, so popping explores the whole near half before the
        // far half, the same visit order as the recursive formulation.
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index as usize];

            let mut dist_sq = N::zero();
            for axis in 0..DIM {
                dist_sq = dist_sq + (node.point[axis] - center[axis]).square();
            }
            if dist_sq <= radius_sq {
                results.push(index, dist_sq);
            }

            let axis = node.axis as usize;
            let delta = center[axis] - node.point[axis];
            let (near, far) = if delta <= N::zero() {
                (node.left, node.right)
            } else {
                (node.right, node.left)
            };

            // The far half only holds candidates when the query sphere
            // crosses this node's splitting plane.
            if delta.abs() < radius {
                if let Some(far) = far {
                    stack.push(far.get());
                }
            }
            if let Some(near) = near {
                stack.push(near.get());
            }
        }

        Ok(results)
    }

    pub(crate) fn node(&self, index: u32) -> &Node<'p, P, N, DIM> {
        &self.nodes[index as usize]
    }
}

impl<'p, P, N: CoordNum, const DIM: usize> Default for KdTree<'p, P, N, DIM> {
    fn default() -> Self {
        Self::new()
    }
}
