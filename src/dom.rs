//! Component-scoped DOM seam
//!
//! Components never look elements up by id or class. They receive
//! [`NodeId`] handles when they are built and mutate the page through the
//! [`Surface`] trait. [`MemorySurface`] is a headless implementation that
//! keeps a small element tree and counts every mutation, which is what the
//! replay binary and the tests render into.

use std::collections::{BTreeMap, BTreeSet};

use crate::game::{ClientError, ClientResult};

/// Opaque handle to an element owned by a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

/// Description of an element to create
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementSpec {
    pub tag: String,
    pub classes: Vec<String>,
    pub text: Option<String>,
    pub attrs: Vec<(String, String)>,
}

impl ElementSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }
}

/// Mutation interface the components render through
pub trait Surface {
    /// The page root every mounted view hangs off
    fn root(&self) -> NodeId;

    /// Creates a detached element
    fn create(&mut self, spec: ElementSpec) -> NodeId;

    fn append(&mut self, parent: NodeId, child: NodeId) -> ClientResult<()>;

    fn prepend(&mut self, parent: NodeId, child: NodeId) -> ClientResult<()>;

    /// Detaches and drops an element and its subtree
    fn remove(&mut self, node: NodeId) -> ClientResult<()>;

    /// Removes every child of `parent`
    fn clear(&mut self, parent: NodeId) -> ClientResult<()>;

    fn set_text(&mut self, node: NodeId, text: &str) -> ClientResult<()>;

    fn set_class(&mut self, node: NodeId, class: &str, on: bool) -> ClientResult<()>;

    fn set_visible(&mut self, node: NodeId, visible: bool) -> ClientResult<()>;

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> ClientResult<()>;

    /// Transient notification provided by the UI toolkit
    fn toast(&mut self, text: &str, duration_ms: u64, class: &str);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub tag: String,
    pub classes: BTreeSet<String>,
    pub text: String,
    pub attrs: BTreeMap<String, String>,
    pub visible: bool,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub text: String,
    pub duration_ms: u64,
    pub class: String,
}

/// In-memory element tree
#[derive(Debug, Clone)]
pub struct MemorySurface {
    nodes: BTreeMap<NodeId, Node>,
    next_id: u32,
    mutations: usize,
    toasts: Vec<Toast>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            Self::ROOT,
            Node {
                tag: "body".to_string(),
                visible: true,
                ..Default::default()
            },
        );
        Self {
            nodes,
            next_id: 1,
            mutations: 0,
            toasts: Vec::new(),
        }
    }

    /// Number of mutating calls made so far
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(|n| n.text.as_str())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.nodes
            .get(&id)
            .map(|n| n.classes.contains(class))
            .unwrap_or(false)
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.nodes.get(&id).map(|n| n.visible).unwrap_or(false)
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(&id)
            .and_then(|n| n.attrs.get(name))
            .map(String::as_str)
    }

    /// Texts of the direct children of `id`, in order
    pub fn child_texts(&self, id: NodeId) -> Vec<String> {
        self.children(id)
            .iter()
            .filter_map(|c| self.text(*c))
            .map(str::to_string)
            .collect()
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    fn node_mut(&mut self, id: NodeId) -> ClientResult<&mut Node> {
        self.nodes.get_mut(&id).ok_or(ClientError::UnknownNode)
    }

    fn detach(&mut self, child: NodeId) {
        let parent = self.nodes.get(&child).and_then(|n| n.parent);
        if let Some(parent) = parent {
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children.retain(|c| *c != child);
            }
        }
        if let Some(c) = self.nodes.get_mut(&child) {
            c.parent = None;
        }
    }

    fn drop_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            for child in node.children {
                self.drop_subtree(child);
            }
        }
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, front: bool) -> ClientResult<()> {
        if !self.contains(parent) || !self.contains(child) || parent == child {
            return Err(ClientError::UnknownNode);
        }
        self.mutations += 1;
        self.detach(child);
        let p = self.node_mut(parent)?;
        if front {
            p.children.insert(0, child);
        } else {
            p.children.push(child);
        }
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }
}

impl Surface for MemorySurface {
    fn root(&self) -> NodeId {
        Self::ROOT
    }

    fn create(&mut self, spec: ElementSpec) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.mutations += 1;
        self.nodes.insert(
            id,
            Node {
                tag: spec.tag,
                classes: spec.classes.into_iter().collect(),
                text: spec.text.unwrap_or_default(),
                attrs: spec.attrs.into_iter().collect(),
                visible: true,
                children: Vec::new(),
                parent: None,
            },
        );
        id
    }

    fn append(&mut self, parent: NodeId, child: NodeId) -> ClientResult<()> {
        self.attach(parent, child, false)
    }

    fn prepend(&mut self, parent: NodeId, child: NodeId) -> ClientResult<()> {
        self.attach(parent, child, true)
    }

    fn remove(&mut self, node: NodeId) -> ClientResult<()> {
        if node == Self::ROOT || !self.contains(node) {
            return Err(ClientError::UnknownNode);
        }
        self.mutations += 1;
        self.detach(node);
        self.drop_subtree(node);
        Ok(())
    }

    fn clear(&mut self, parent: NodeId) -> ClientResult<()> {
        let children = std::mem::take(&mut self.node_mut(parent)?.children);
        self.mutations += 1;
        for child in children {
            self.drop_subtree(child);
        }
        Ok(())
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> ClientResult<()> {
        self.node_mut(node)?.text = text.to_string();
        self.mutations += 1;
        Ok(())
    }

    fn set_class(&mut self, node: NodeId, class: &str, on: bool) -> ClientResult<()> {
        let n = self.node_mut(node)?;
        if on {
            n.classes.insert(class.to_string());
        } else {
            n.classes.remove(class);
        }
        self.mutations += 1;
        Ok(())
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) -> ClientResult<()> {
        self.node_mut(node)?.visible = visible;
        self.mutations += 1;
        Ok(())
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> ClientResult<()> {
        self.node_mut(node)?
            .attrs
            .insert(name.to_string(), value.to_string());
        self.mutations += 1;
        Ok(())
    }

    fn toast(&mut self, text: &str, duration_ms: u64, class: &str) {
        tracing::debug!("toast ({}ms): {}", duration_ms, text);
        self.toasts.push(Toast {
            text: text.to_string(),
            duration_ms,
            class: class.to_string(),
        });
    }
}
