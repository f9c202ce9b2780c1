use std::mem;

use crate::{PathError, action::Action, path::join_segments};

/// One node of the action tree: a namespace when `action` is `None`, a leaf otherwise.
///
/// Children are kept in insertion order. Namespaces without children are pruned on removal, so
/// every node is either an action or has at least one child.
#[derive(Default)]
pub(crate) struct Node {
    pub(crate) segment: String,
    pub(crate) children: Vec<Node>,
    pub(crate) action: Option<Action>,
}

impl Node {
    fn child(&self, segment: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.segment == segment)
    }

    fn child_index(&self, segment: &str) -> Option<usize> {
        self.children.iter().position(|c| c.segment == segment)
    }

    /// Node at `segments` below this one; the empty slice yields `self`.
    pub(crate) fn find(&self, segments: &[String]) -> Option<&Node> {
        segments
            .iter()
            .try_fold(self, |node, seg| node.child(seg))
    }

    pub(crate) fn find_mut(&mut self, segments: &[String]) -> Option<&mut Node> {
        let mut node = self;
        for seg in segments {
            let i = node.child_index(seg)?;
            node = &mut node.children[i];
        }
        Some(node)
    }

    /// Insert an action at `segments`, creating namespaces along the way.
    pub(crate) fn insert(&mut self, segments: &[String], action: Action) -> Result<(), PathError> {
        let Some((last, prefix)) = segments.split_last() else {
            return Err(PathError::Empty);
        };
        // Validate before mutating so a rejected insert leaves no empty namespaces behind.
        let mut probe: &Node = self;
        for (depth, seg) in prefix.iter().enumerate() {
            match probe.child(seg) {
                Some(c) if c.action.is_some() => {
                    return Err(PathError::LeafGainsChild {
                        path: join_segments(segments),
                        action: join_segments(&segments[..=depth]),
                    });
                }
                Some(c) => probe = c,
                None => break,
            }
        }
        if let Some(existing) = self.find(segments) {
            let path = join_segments(segments);
            return Err(if existing.action.is_some() {
                PathError::Duplicate { path }
            } else {
                PathError::NamespaceCollision { path }
            });
        }

        let mut node = self;
        for seg in prefix {
            let i = match node.child_index(seg) {
                Some(i) => i,
                None => {
                    node.children.push(Node {
                        segment: seg.clone(),
                        ..Node::default()
                    });
                    node.children.len() - 1
                }
            };
            node = &mut node.children[i];
        }
        node.children.push(Node {
            segment: last.clone(),
            children: Vec::new(),
            action: Some(action),
        });
        Ok(())
    }

    /// Remove the action at `segments`, pruning namespaces left empty.
    pub(crate) fn remove(&mut self, segments: &[String]) -> Option<Action> {
        let (first, rest) = segments.split_first()?;
        let i = self.child_index(first)?;
        let removed = if rest.is_empty() {
            self.children[i].action.take()
        } else {
            self.children[i].remove(rest)
        };
        let child = &self.children[i];
        if child.action.is_none() && child.children.is_empty() {
            self.children.remove(i);
        }
        removed
    }

    /// Canonical paths of all actions strictly below this node, depth-first in insertion order.
    pub(crate) fn collect_actions(&self, prefix: &mut Vec<String>, out: &mut Vec<String>) {
        for child in &self.children {
            prefix.push(child.segment.clone());
            if child.action.is_some() {
                out.push(join_segments(prefix));
            }
            child.collect_actions(prefix, out);
            prefix.pop();
        }
    }

    /// Take every action out of the tree, leaving it empty.
    pub(crate) fn drain(&mut self, prefix: &mut Vec<String>, out: &mut Vec<(String, Action)>) {
        for mut child in mem::take(&mut self.children) {
            prefix.push(child.segment.clone());
            if let Some(action) = child.action.take() {
                out.push((join_segments(prefix), action));
            }
            child.drain(prefix, out);
            prefix.pop();
        }
    }

    /// Owned, read-only view of the subtree below this node.
    pub(crate) fn outline(&self, prefix: &mut Vec<String>) -> Vec<OutlineNode> {
        self.children
            .iter()
            .map(|child| {
                prefix.push(child.segment.clone());
                let node = OutlineNode {
                    path: join_segments(prefix),
                    segment: child.segment.clone(),
                    is_action: child.action.is_some(),
                    children: child.outline(prefix),
                };
                prefix.pop();
                node
            })
            .collect()
    }
}

/// A snapshot of one tree node, used by projections to lay out menus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    /// Canonical path of this node.
    pub path: String,
    /// The raw (trimmed) segment, including any separator suffix.
    pub segment: String,
    /// Whether an action is registered here.
    pub is_action: bool,
    /// Children in insertion order.
    pub children: Vec<OutlineNode>,
}
