use super::HostBinding;
use arbor_vdom::{Event, Listener, PropValue, NODE_VALUE};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Handle to a node owned by a [`MemoryHost`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "tag", rename_all = "lowercase")]
pub enum HostNodeKind {
    Element(String),
    Text,
}

#[derive(Debug, Clone)]
pub struct HostNode {
    pub kind: HostNodeKind,
    pub attributes: BTreeMap<String, PropValue>,
    pub listeners: Vec<(String, Listener)>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

impl HostNode {
    fn new(kind: HostNodeKind) -> Self {
        Self {
            kind,
            attributes: BTreeMap::new(),
            listeners: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }
}

/// Record of one host binding call, in call order
#[derive(Debug, Clone, PartialEq)]
pub enum HostOp {
    CreateNode { node: NodeId, tag: String },
    CreateText { node: NodeId },
    SetAttribute { node: NodeId, key: String, value: PropValue },
    RemoveAttribute { node: NodeId, key: String },
    AddListener { node: NodeId, event: String },
    RemoveListener { node: NodeId, event: String },
    AppendChild { parent: NodeId, child: NodeId },
    RemoveChild { parent: NodeId, child: NodeId },
}

/// Serializable view of a host subtree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSnapshot {
    pub id: NodeId,
    #[serde(flatten)]
    pub kind: HostNodeKind,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, PropValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub listeners: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HostSnapshot>,
}

/// In-memory host tree.
///
/// Nodes live in an arena and are never freed; a removed node is simply
/// detached. Every binding call is appended to an operation log.
#[derive(Debug, Default)]
pub struct MemoryHost {
    nodes: Vec<HostNode>,
    ops: Vec<HostOp>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, kind: HostNodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(HostNode::new(kind));
        id
    }

    pub fn node(&self, id: NodeId) -> &HostNode {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut HostNode {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn attribute(&self, id: NodeId, key: &str) -> Option<&PropValue> {
        self.node(id).attributes.get(key)
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            HostNodeKind::Element(tag) => Some(tag),
            HostNodeKind::Text => None,
        }
    }

    /// Content of a text node
    pub fn text(&self, id: NodeId) -> Option<String> {
        match self.node(id).kind {
            HostNodeKind::Text => Some(
                self.attribute(id, NODE_VALUE)
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            ),
            HostNodeKind::Element(_) => None,
        }
    }

    pub fn listener_count(&self, id: NodeId, event: &str) -> usize {
        self.node(id)
            .listeners
            .iter()
            .filter(|(name, _)| name == event)
            .count()
    }

    /// Invoke every listener registered for `event` on `id`; returns how many
    /// ran. Events do not bubble.
    pub fn dispatch(&self, id: NodeId, event: &str) -> usize {
        let payload = Event::new(event);
        let mut called = 0;
        for (name, listener) in &self.node(id).listeners {
            if name == event {
                listener.call(&payload);
                called += 1;
            }
        }
        called
    }

    pub fn ops(&self) -> &[HostOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<HostOp> {
        std::mem::take(&mut self.ops)
    }

    /// Markup for the node itself and its subtree
    pub fn outer_markup(&self, id: NodeId) -> String {
        let mut buffer = String::new();
        self.write_markup(id, &mut buffer);
        buffer
    }

    /// Markup for the node's children only
    pub fn inner_markup(&self, id: NodeId) -> String {
        let mut buffer = String::new();
        for &child in self.children(id) {
            self.write_markup(child, &mut buffer);
        }
        buffer
    }

    fn write_markup(&self, id: NodeId, buffer: &mut String) {
        let node = self.node(id);
        match &node.kind {
            HostNodeKind::Text => {
                buffer.push_str(&escape(&self.text(id).unwrap_or_default()));
            }
            HostNodeKind::Element(tag) => {
                buffer.push('<');
                buffer.push_str(tag);
                for (key, value) in &node.attributes {
                    if value.is_listener() {
                        continue;
                    }
                    buffer.push_str(&format!(" {}=\"{}\"", key, escape(&value.to_string())));
                }
                buffer.push('>');
                for &child in &node.children {
                    self.write_markup(child, buffer);
                }
                buffer.push_str(&format!("</{}>", tag));
            }
        }
    }

    pub fn snapshot(&self, id: NodeId) -> HostSnapshot {
        let node = self.node(id);
        HostSnapshot {
            id,
            kind: node.kind.clone(),
            attributes: node.attributes.clone(),
            listeners: node.listeners.iter().map(|(name, _)| name.clone()).collect(),
            children: node.children.iter().map(|&c| self.snapshot(c)).collect(),
        }
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.node(child).parent {
            self.node_mut(parent).children.retain(|&c| c != child);
            self.node_mut(child).parent = None;
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl HostBinding for MemoryHost {
    type Handle = NodeId;

    fn create_node(&mut self, tag: &str) -> NodeId {
        let node = self.alloc(HostNodeKind::Element(tag.to_string()));
        self.ops.push(HostOp::CreateNode {
            node,
            tag: tag.to_string(),
        });
        node
    }

    fn create_text_node(&mut self) -> NodeId {
        let node = self.alloc(HostNodeKind::Text);
        self.ops.push(HostOp::CreateText { node });
        node
    }

    fn set_attribute(&mut self, node: &NodeId, key: &str, value: &PropValue) {
        self.node_mut(*node)
            .attributes
            .insert(key.to_string(), value.clone());
        self.ops.push(HostOp::SetAttribute {
            node: *node,
            key: key.to_string(),
            value: value.clone(),
        });
    }

    fn remove_attribute(&mut self, node: &NodeId, key: &str) {
        self.node_mut(*node).attributes.remove(key);
        self.ops.push(HostOp::RemoveAttribute {
            node: *node,
            key: key.to_string(),
        });
    }

    fn add_listener(&mut self, node: &NodeId, event: &str, listener: &Listener) {
        self.node_mut(*node)
            .listeners
            .push((event.to_string(), listener.clone()));
        self.ops.push(HostOp::AddListener {
            node: *node,
            event: event.to_string(),
        });
    }

    fn remove_listener(&mut self, node: &NodeId, event: &str, listener: &Listener) {
        let listeners = &mut self.node_mut(*node).listeners;
        if let Some(pos) = listeners
            .iter()
            .position(|(name, l)| name == event && l == listener)
        {
            listeners.remove(pos);
        }
        self.ops.push(HostOp::RemoveListener {
            node: *node,
            event: event.to_string(),
        });
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.detach(*child);
        self.node_mut(*parent).children.push(*child);
        self.node_mut(*child).parent = Some(*parent);
        self.ops.push(HostOp::AppendChild {
            parent: *parent,
            child: *child,
        });
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) {
        let children = &mut self.node_mut(*parent).children;
        let before = children.len();
        children.retain(|c| c != child);
        if children.len() != before {
            self.node_mut(*child).parent = None;
        }
        self.ops.push(HostOp::RemoveChild {
            parent: *parent,
            child: *child,
        });
    }
}
