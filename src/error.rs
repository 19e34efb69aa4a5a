//! Error types for the grid buffer, transform stack, configuration lookups
//! and the plugin lifecycle.
//!
//! Grid and stack errors are programmer errors in a plugin. The host does not
//! swallow them: the offending plugin is marked failed and skipped for the
//! rest of the run, while other plugins keep running.

use glam::UVec2;
use thiserror::Error;

/// Errors raised by [`ColorGrid`](crate::rendering::grid::ColorGrid) operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("invalid grid extent {0}: every component must be at least 1")]
    InvalidExtent(UVec2),

    #[error("grid is already initialized with extent {0}")]
    AlreadyInitialized(UVec2),

    #[error("grid is not initialized")]
    NotInitialized,

    #[error("coordinate {coord} is out of bounds for extent {extent}")]
    OutOfBounds { coord: UVec2, extent: UVec2 },
}

/// Errors raised by the transform stack.
///
/// `Underflow` is detected by the stack itself on an excess pop. `Unbalanced`
/// is detected defensively by the host after each plugin's draw call returns,
/// since an unbalanced plugin would otherwise corrupt rendering for every
/// plugin drawn after it on the same context.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StackError {
    #[error("transform stack pop below its base depth")]
    Underflow,

    #[error("transform stack left {residual} unpopped transform(s) at end of draw")]
    Unbalanced { residual: usize },
}

/// Errors raised by [`Configuration`](crate::config::Configuration) lookups.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration key '{key}'")]
    MissingKey { key: String },

    #[error("configuration key '{key}' is not a {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    #[error("invalid configuration JSON: {0}")]
    Parse(String),
}

/// A lifecycle callback was invoked in a state that does not permit it.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("cannot call {call} while plugin is in state {state}")]
    InvalidTransition {
        call: &'static str,
        state: &'static str,
    },
}

/// Any error a plugin callback can produce.
///
/// The grid, stack, configuration and lifecycle errors all convert into this
/// via `?`; plugins can also report their own failures with [`PluginError::Custom`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PluginError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Stack(#[from] StackError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("{0}")]
    Custom(String),
}

impl PluginError {
    /// Convenience constructor for plugin-authored failures.
    pub fn custom(msg: impl Into<String>) -> Self {
        PluginError::Custom(msg.into())
    }
}
