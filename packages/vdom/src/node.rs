use crate::value::PropValue;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Prop key carrying the content of a text node
pub const NODE_VALUE: &str = "nodeValue";

/// Reserved prop key; children are always passed separately
pub const CHILDREN: &str = "children";

/// Attribute and listener props, ordered by key
pub type PropMap = BTreeMap<String, PropValue>;

/// Failure signalled by a component function while rendering
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ComponentError {
    pub message: String,
}

impl ComponentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

type RenderFn = dyn Fn(&Props) -> Result<VNode, ComponentError>;

/// Function component: props in, exactly one virtual node out.
///
/// Identity is the function allocation, not the name. Create a component once
/// and clone it into every element that uses it; two separately constructed
/// components never match during reconciliation.
#[derive(Clone)]
pub struct Component {
    name: Rc<str>,
    render: Rc<RenderFn>,
}

impl Component {
    pub fn new(
        name: impl Into<Rc<str>>,
        render: impl Fn(&Props) -> Result<VNode, ComponentError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            render: Rc::new(render),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, props: &Props) -> Result<VNode, ComponentError> {
        (self.render)(props)
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.render, &other.render)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Component").field(&self.name).finish()
    }
}

/// What a node renders as
#[derive(Debug, Clone, PartialEq)]
pub enum NodeType {
    /// Host element, e.g. `div`
    Host(String),
    /// Text node; its content lives in the `nodeValue` prop
    Text,
    /// Function component
    Component(Component),
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Host(tag) => f.write_str(tag),
            NodeType::Text => f.write_str("#text"),
            NodeType::Component(c) => write!(f, "<{}>", c.name()),
        }
    }
}

impl From<&str> for NodeType {
    fn from(tag: &str) -> Self {
        NodeType::Host(tag.to_string())
    }
}

impl From<String> for NodeType {
    fn from(tag: String) -> Self {
        NodeType::Host(tag)
    }
}

impl From<Component> for NodeType {
    fn from(component: Component) -> Self {
        NodeType::Component(component)
    }
}

/// Props of a node: attributes/listeners plus the ordered children
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    attributes: PropMap,
    children: Vec<VNode>,
}

impl Props {
    pub fn new(mut attributes: PropMap, children: Vec<VNode>) -> Self {
        attributes.remove(CHILDREN);
        Self {
            attributes,
            children,
        }
    }

    pub fn with_children(children: Vec<VNode>) -> Self {
        Self::new(PropMap::new(), children)
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.attributes.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn attributes(&self) -> &PropMap {
        &self.attributes
    }

    pub fn children(&self) -> &[VNode] {
        &self.children
    }
}

/// Immutable description of one desired UI node.
///
/// Props are shared behind an `Rc`, so cloning a node (or handing its props
/// to a fiber) never copies the subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct VNode {
    node_type: NodeType,
    props: Rc<Props>,
}

impl VNode {
    pub fn new(node_type: NodeType, props: Props) -> Self {
        Self {
            node_type,
            props: Rc::new(props),
        }
    }

    pub fn host(tag: impl Into<String>) -> Self {
        Self::new(NodeType::Host(tag.into()), Props::default())
    }

    pub fn text(value: impl Into<PropValue>) -> Self {
        create_text_element(value)
    }

    pub fn component(component: Component) -> Self {
        Self::new(NodeType::Component(component), Props::default())
    }

    pub fn node_type(&self) -> &NodeType {
        &self.node_type
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Shared handle to the props, for holders that outlive this node
    pub fn shared_props(&self) -> Rc<Props> {
        Rc::clone(&self.props)
    }

    pub fn children(&self) -> &[VNode] {
        self.props.children()
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        let key = key.into();
        if key != CHILDREN {
            Rc::make_mut(&mut self.props)
                .attributes
                .insert(key, value.into());
        }
        self
    }

    pub fn with_child(mut self, child: impl Into<Child>) -> Self {
        Rc::make_mut(&mut self.props)
            .children
            .push(child.into().into_vnode());
        self
    }

    pub fn with_children<C: Into<Child>>(mut self, children: impl IntoIterator<Item = C>) -> Self {
        Rc::make_mut(&mut self.props)
            .children
            .extend(children.into_iter().map(|c| c.into().into_vnode()));
        self
    }
}

/// A child passed to [`create_element`]: a node, or a primitive that gets
/// wrapped into a text node.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Node(VNode),
    Primitive(PropValue),
}

impl Child {
    pub fn into_vnode(self) -> VNode {
        match self {
            Child::Node(node) => node,
            Child::Primitive(value) => create_text_element(value),
        }
    }
}

impl From<VNode> for Child {
    fn from(node: VNode) -> Self {
        Child::Node(node)
    }
}

impl From<&str> for Child {
    fn from(value: &str) -> Self {
        Child::Primitive(value.into())
    }
}

impl From<String> for Child {
    fn from(value: String) -> Self {
        Child::Primitive(value.into())
    }
}

impl From<f64> for Child {
    fn from(value: f64) -> Self {
        Child::Primitive(value.into())
    }
}

impl From<i32> for Child {
    fn from(value: i32) -> Self {
        Child::Primitive(value.into())
    }
}

impl From<i64> for Child {
    fn from(value: i64) -> Self {
        Child::Primitive(value.into())
    }
}

impl From<bool> for Child {
    fn from(value: bool) -> Self {
        Child::Primitive(value.into())
    }
}

/// Build a virtual node. `None` props is an empty mapping; a `children` key in
/// `props` is dropped in favour of the explicit children.
pub fn create_element<C: Into<Child>>(
    node_type: impl Into<NodeType>,
    props: Option<PropMap>,
    children: impl IntoIterator<Item = C>,
) -> VNode {
    let children = children
        .into_iter()
        .map(|child| child.into().into_vnode())
        .collect();
    VNode::new(node_type.into(), Props::new(props.unwrap_or_default(), children))
}

/// Wrap a primitive into a text node carrying it as `nodeValue`.
pub fn create_text_element(value: impl Into<PropValue>) -> VNode {
    let mut attributes = PropMap::new();
    attributes.insert(NODE_VALUE.to_string(), value.into());
    VNode::new(NodeType::Text, Props::new(attributes, Vec::new()))
}

/// Collect `(key, value)` pairs into a [`PropMap`] for [`create_element`].
pub fn props<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Option<PropMap>
where
    K: Into<String>,
    V: Into<PropValue>,
{
    Some(
        pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect(),
    )
}

/// Empty child list, for elements without children.
pub fn no_children() -> std::iter::Empty<VNode> {
    std::iter::empty()
}
