//! # Arbor VDOM
//!
//! Immutable description of a desired UI tree.
//!
//! A [`VNode`] is a [`NodeType`] plus [`Props`]. Props hold the attribute and
//! listener mapping and the ordered children. Primitive children (strings,
//! numbers, booleans) never appear as such: [`create_element`] wraps them into
//! text nodes carrying a `nodeValue` prop, so consumers only ever see nodes.
//!
//! ```rust
//! use arbor_vdom::{create_element, props, Child};
//!
//! let tree = create_element(
//!     "div",
//!     props([("id", "root")]),
//!     [
//!         Child::from(create_element("a", None, ["x"])),
//!         Child::from(create_element("p", None, ["y"])),
//!     ],
//! );
//! assert_eq!(tree.children().len(), 2);
//! ```

pub mod node;
pub mod value;

pub use node::{
    create_element, create_text_element, no_children, props, Child, Component, ComponentError,
    NodeType, PropMap, Props, VNode, CHILDREN, NODE_VALUE,
};
pub use value::{event_name, is_event_prop, Event, Listener, PropValue};
