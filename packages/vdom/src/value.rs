use serde::{Serialize, Serializer};
use std::fmt;
use std::rc::Rc;

/// Event delivered to a [`Listener`] by a host that dispatches events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Lower-cased event name, e.g. `click`
    pub name: String,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Event callback stored in props under an `on<Event>` key.
///
/// Listeners compare by identity: two listeners are equal only when they are
/// clones of the same allocation. Re-creating a closure on every render
/// therefore counts as a changed listener.
#[derive(Clone)]
pub struct Listener {
    callback: Rc<dyn Fn(&Event)>,
}

impl Listener {
    pub fn new(callback: impl Fn(&Event) + 'static) -> Self {
        Self {
            callback: Rc::new(callback),
        }
    }

    pub fn call(&self, event: &Event) {
        (self.callback)(event)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", Rc::as_ptr(&self.callback) as *const ())
    }
}

/// Prop value
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Listener(Listener),
    Null,
}

impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_listener(&self) -> Option<&Listener> {
        match self {
            PropValue::Listener(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_listener(&self) -> bool {
        matches!(self, PropValue::Listener(_))
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::String(s) => f.write_str(s),
            PropValue::Number(n) => write!(f, "{}", n),
            PropValue::Boolean(b) => write!(f, "{}", b),
            PropValue::Listener(_) => f.write_str("[listener]"),
            PropValue::Null => Ok(()),
        }
    }
}

impl Serialize for PropValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropValue::String(s) => serializer.serialize_str(s),
            PropValue::Number(n) => serializer.serialize_f64(*n),
            PropValue::Boolean(b) => serializer.serialize_bool(*b),
            PropValue::Listener(_) => serializer.serialize_str("[listener]"),
            PropValue::Null => serializer.serialize_unit(),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::String(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::String(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Number(value.into())
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Boolean(value)
    }
}

impl From<Listener> for PropValue {
    fn from(value: Listener) -> Self {
        PropValue::Listener(value)
    }
}

/// Whether a prop key names an event listener (`onclick`, `onInput`, ...).
pub fn is_event_prop(key: &str) -> bool {
    key.starts_with("on")
}

/// Event name for a listener key: the `on` prefix stripped, lower-cased.
pub fn event_name(key: &str) -> String {
    key.get(2..).unwrap_or_default().to_lowercase()
}
