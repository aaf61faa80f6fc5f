#![forbid(unsafe_code)]

//! In-memory node tree.

use std::collections::{BTreeMap, BTreeSet};

use crate::geometry::Size;
use crate::host::Tree;

/// Handle to a node in a [`MemoryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Raw index of the node inside its tree.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
    natural_size: Size,
    pinned_size: Option<Size>,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            parent: None,
            children: Vec::new(),
            classes: BTreeSet::new(),
            attributes: BTreeMap::new(),
            natural_size: Size::ZERO,
            pinned_size: None,
        }
    }
}

/// A DOM-like tree held entirely in memory.
///
/// Layout is not computed: each node has a *natural* size set by the caller,
/// and [`measure`](Tree::measure) reports the pinned size when one is set,
/// otherwise the natural size. Operations on ids from another tree are no-ops.
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    nodes: Vec<NodeData>,
}

impl MemoryTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no node was created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a detached element with a natural size.
    pub fn create_sized(&mut self, tag: &str, size: Size) -> NodeId {
        let id = self.create_element(tag);
        self.set_natural_size(id, size);
        id
    }

    /// Set the size the node reports when it is not pinned.
    pub fn set_natural_size(&mut self, node: NodeId, size: Size) {
        if let Some(data) = self.get_mut(node) {
            data.natural_size = size;
        }
    }

    /// Current pinned size, if any.
    #[must_use]
    pub fn pinned_size(&self, node: NodeId) -> Option<Size> {
        self.get(node).and_then(|data| data.pinned_size)
    }

    /// Children of `node` in document order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.get(node).map_or(&[], |data| data.children.as_slice())
    }

    /// Tag name of `node`.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.get(node).map(|data| data.tag.as_str())
    }

    /// Class list of `node`, sorted.
    #[must_use]
    pub fn classes(&self, node: NodeId) -> Vec<&str> {
        self.get(node)
            .map(|data| data.classes.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether `node` is currently a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.get(node).and_then(|data| data.parent);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.get(current).and_then(|data| data.parent);
        }
        false
    }

    fn get(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node.0 as usize)
    }

    fn get_mut(&mut self, node: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(node.0 as usize)
    }

    fn can_adopt(&self, parent: NodeId, child: NodeId) -> bool {
        parent != child
            && self.get(parent).is_some()
            && self.get(child).is_some()
            && !self.is_descendant(parent, child)
    }
}

impl Tree for MemoryTree {
    type Node = NodeId;

    fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData::new(tag));
        id
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        if !self.can_adopt(*parent, *child) {
            return;
        }
        self.detach(child);
        if let Some(data) = self.get_mut(*parent) {
            data.children.push(*child);
        }
        if let Some(data) = self.get_mut(*child) {
            data.parent = Some(*parent);
        }
    }

    fn insert_before(&mut self, parent: &NodeId, child: &NodeId, reference: &NodeId) {
        if !self.can_adopt(*parent, *child) {
            return;
        }
        self.detach(child);
        if let Some(data) = self.get_mut(*parent) {
            match data.children.iter().position(|c| c == reference) {
                Some(index) => data.children.insert(index, *child),
                None => data.children.push(*child),
            }
        }
        if let Some(data) = self.get_mut(*child) {
            data.parent = Some(*parent);
        }
    }

    fn detach(&mut self, node: &NodeId) {
        let Some(parent) = self.get_mut(*node).and_then(|data| data.parent.take()) else {
            return;
        };
        if let Some(data) = self.get_mut(parent) {
            data.children.retain(|c| c != node);
        }
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.get(*node).and_then(|data| data.parent)
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        if let Some(data) = self.get_mut(*node) {
            data.classes.insert(class.to_owned());
        }
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        if let Some(data) = self.get_mut(*node) {
            data.classes.remove(class);
        }
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.get(*node)
            .is_some_and(|data| data.classes.contains(class))
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.get(*node)
            .and_then(|data| data.attributes.get(name).cloned())
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        if let Some(data) = self.get_mut(*node) {
            data.attributes.insert(name.to_owned(), value.to_owned());
        }
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) {
        if let Some(data) = self.get_mut(*node) {
            data.attributes.remove(name);
        }
    }

    fn measure(&self, node: &NodeId) -> Size {
        self.get(*node).map_or(Size::ZERO, |data| {
            data.pinned_size.unwrap_or(data.natural_size)
        })
    }

    fn pin_size(&mut self, node: &NodeId, size: Option<Size>) {
        if let Some(data) = self.get_mut(*node) {
            data.pinned_size = size;
        }
    }

    fn find_descendant(&self, root: &NodeId, tag: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(*root).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if self.tag(node) == Some(tag) {
                return Some(node);
            }
            stack.extend(self.children(node).iter().rev().copied());
        }
        None
    }
}
