use arbor_vdom::ComponentError;
use thiserror::Error;

pub type ReconcileResult<T> = Result<T, ReconcileError>;
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors surfacing out of the work loop.
///
/// There is no recovery: the failing fiber stays the next unit of work, so
/// driving the loop again calls the same component again.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconcileError {
    #[error("Component '{component}' failed to render: {source}")]
    Component {
        component: String,
        #[source]
        source: ComponentError,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
