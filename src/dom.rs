//! Abstract DOM snapshot.
//!
//! The pipeline never talks to a rendering engine directly. A driver hands it
//! a [`Snapshot`]: a flattened element tree carrying per-node tag, own text,
//! computed overflow and scroll metrics. Node ids are preorder positions and
//! double as the scroll-addressing contract back to the driver, so the id a
//! classifier sees is the id the driver can scroll.

use serde::Deserialize;

use crate::text::normalize;

/// Wire shape of one element, as produced by the driver's DOM serializer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeSpec {
    /// Lowercase tag name.
    pub tag: String,
    /// Text of the element's direct text nodes only (children excluded).
    pub text: String,
    /// Computed `overflow-y`.
    pub overflow_y: String,
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
    pub children: Vec<NodeSpec>,
}

pub type NodeId = usize;

#[derive(Debug, Clone)]
pub struct Node {
    pub tag: String,
    pub own_text: String,
    pub overflow_y: String,
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// One consistent view of the document. Immutable once built.
#[derive(Debug, Clone)]
pub struct Snapshot {
    nodes: Vec<Node>,
}

impl Snapshot {
    pub fn from_spec(spec: &NodeSpec) -> Self {
        let mut snap = Self { nodes: Vec::new() };
        snap.add(spec, None);
        snap
    }

    fn add(&mut self, spec: &NodeSpec, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            tag: spec.tag.clone(),
            own_text: spec.text.clone(),
            overflow_y: spec.overflow_y.clone(),
            scroll_top: spec.scroll_top,
            scroll_height: spec.scroll_height,
            client_height: spec.client_height,
            parent,
            children: Vec::new(),
        });
        for child in &spec.children {
            let cid = self.add(child, Some(id));
            self.nodes[id].children.push(cid);
        }
        id
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> std::ops::Range<NodeId> {
        0..self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id].children.is_empty()
    }

    /// Ancestors from the immediate parent upward.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes[id].parent, move |&p| self.nodes[p].parent)
    }

    /// Subtree of `id` in document (preorder) order, `id` included.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            out.push(cur);
            for &child in self.nodes[cur].children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Normalized combined text of the whole subtree.
    pub fn text(&self, id: NodeId) -> String {
        let joined = self
            .subtree(id)
            .into_iter()
            .map(|n| self.nodes[n].own_text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        normalize(&joined)
    }

    /// Siblings before `id`, in document order.
    pub fn preceding_siblings(&self, id: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.nodes[id].parent else {
            return Vec::new();
        };
        self.nodes[parent]
            .children
            .iter()
            .copied()
            .take_while(|&c| c != id)
            .collect()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.nodes[id].parent?;
        let siblings = &self.nodes[parent].children;
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings.get(pos + 1).copied()
    }

    // ── Scroll container detection ───────────────────────────────────────────

    /// The element with the largest `scrollHeight - clientHeight` among those
    /// whose computed overflow allows scrolling; the document root when none
    /// qualifies.
    pub fn scrollable_container(&self) -> NodeId {
        self.ids()
            .filter(|&id| {
                let n = &self.nodes[id];
                matches!(n.overflow_y.as_str(), "auto" | "scroll")
                    && n.scroll_height > n.client_height
            })
            .max_by(|&a, &b| {
                let da = self.max_scroll(a);
                let db = self.max_scroll(b);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or_else(|| self.root())
    }

    pub fn max_scroll(&self, id: NodeId) -> f64 {
        let n = &self.nodes[id];
        (n.scroll_height - n.client_height).max(0.0)
    }

    pub fn at_bottom(&self, id: NodeId, tolerance_px: f64) -> bool {
        self.nodes[id].scroll_top >= self.max_scroll(id) - tolerance_px
    }
}
