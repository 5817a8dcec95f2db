//! Thread assembly from a flat comment list

use super::model::{CommentNode, CommentRecord};
use crate::types::CommentId;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Comments arranged into threads
#[derive(Debug, Default)]
pub struct CommentTree {
    roots: Vec<CommentNode>,
}

impl CommentTree {
    /// Build threads from records in fetch order.
    ///
    /// Siblings keep their input order. A record whose parent is not part of
    /// the input starts its own thread; records that cannot be reached from
    /// any thread start (parent cycles, duplicate ids) are dropped.
    pub fn build(records: Vec<CommentRecord>) -> Self {
        let total = records.len();
        let mut seen = HashSet::with_capacity(total);
        let mut slots: Vec<Option<CommentRecord>> = Vec::with_capacity(total);
        for record in records {
            if seen.insert(record.id) {
                slots.push(Some(record));
            } else {
                debug!("Skipping duplicate comment {}", record.id);
            }
        }

        let mut children: HashMap<CommentId, Vec<usize>> = HashMap::new();
        let mut roots = Vec::new();
        for (index, slot) in slots.iter().enumerate() {
            let Some(record) = slot else { continue };
            match record.parent {
                Some(parent) if seen.contains(&parent) => {
                    children.entry(parent).or_default().push(index);
                }
                Some(parent) => {
                    debug!(
                        "Comment {} replies to missing comment {}, treating as top level",
                        record.id, parent
                    );
                    roots.push(index);
                }
                None => roots.push(index),
            }
        }

        // Pre-order placement; every descendant lands after its ancestor
        let mut placements = Vec::with_capacity(slots.len());
        let mut stack = Vec::new();
        push_siblings(&mut stack, &roots, 1);
        while let Some(placement) = stack.pop() {
            if let Some(replies) = slots[placement.index]
                .as_ref()
                .and_then(|record| children.get(&record.id))
            {
                push_siblings(&mut stack, replies, placement.depth + 1);
            }
            placements.push(placement);
        }

        // Assemble bottom-up so replies exist before their parent
        let mut built: HashMap<usize, CommentNode> = HashMap::with_capacity(placements.len());
        for placement in placements.into_iter().rev() {
            let Some(comment) = slots[placement.index].take() else {
                continue;
            };
            let replies = children
                .get(&comment.id)
                .map(|indices| indices.iter().filter_map(|i| built.remove(i)).collect())
                .unwrap_or_default();
            built.insert(
                placement.index,
                CommentNode {
                    comment,
                    depth: placement.depth,
                    position: placement.position,
                    sibling_count: placement.sibling_count,
                    children: replies,
                },
            );
        }

        let roots = roots.iter().filter_map(|i| built.remove(i)).collect();
        let tree = Self { roots };

        let placed = tree.len();
        if placed < total {
            debug!(
                "Dropped {} comments unreachable from any thread",
                total - placed
            );
        }
        tree
    }

    /// Top-level nodes in order
    pub fn roots(&self) -> &[CommentNode] {
        &self.roots
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Check if the tree has no comments
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Depth-first pre-order traversal
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder {
            stack: self.roots.iter().rev().collect(),
        }
    }

    /// Find a node by comment id
    pub fn find(&self, id: CommentId) -> Option<&CommentNode> {
        self.iter().find(|node| node.id() == id)
    }
}

/// Pre-order iterator over a [`CommentTree`]
pub struct PreOrder<'a> {
    stack: Vec<&'a CommentNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a CommentNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

struct Placement {
    index: usize,
    depth: usize,
    position: usize,
    sibling_count: usize,
}

fn push_siblings(stack: &mut Vec<Placement>, indices: &[usize], depth: usize) {
    let sibling_count = indices.len();
    stack.extend(
        indices
            .iter()
            .enumerate()
            .rev()
            .map(|(i, &index)| Placement {
                index,
                depth,
                position: i + 1,
                sibling_count,
            }),
    );
}
