//! Rendering primitives: colors, the grid drawable, the transform stack and
//! the backends that turn submitted geometry into terminal output.
//!
//! **Sub-modules:**
//!
//! *   [`color`](crate::rendering::color): the 4-component float [`Color`](color::Color).
//! *   [`grid`](crate::rendering::grid): [`ColorGrid`](grid::ColorGrid), the dense per-cell color drawable.
//! *   [`context`](crate::rendering::context): [`TransformStack`](context::TransformStack) and
//!     [`RenderContext`](context::RenderContext), the surface plugins draw through.
//! *   [`backend`](crate::rendering::backend): the [`RenderBackend`](backend::RenderBackend) seam,
//!     with a crossterm terminal implementation and an in-memory recorder for tests.
//!
//! The flow during one draw: a plugin pushes the transform stack, scales by
//! the simulation's world size, asks its grid to draw, and pops. The grid
//! submits one rectangle per cell through the context, which maps each
//! rectangle through the top transform and forwards it to the backend. The
//! host presents the backend once all plugins have drawn.

pub mod backend;
pub mod color;
pub mod context;
pub mod grid;
