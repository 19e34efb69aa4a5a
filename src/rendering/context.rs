//! The transform stack and the rendering context handed to plugin draws.
//!
//! Transforms compose in the usual scene-graph pattern: `push` copies the
//! current top, zero or more `scale`/`translate` calls right-multiply it in
//! place, the drawable emits geometry through the top transform, and `pop`
//! discards it. Pushes are value copies, so no two stack entries alias.

use std::io;

use glam::{Affine2, Vec2};
use smallvec::{smallvec, SmallVec};

use crate::error::StackError;
use crate::rendering::backend::RenderBackend;
use crate::rendering::color::Color;

/// A LIFO stack of composable affine transforms.
///
/// The stack starts with an implicit identity base which can never be popped.
/// The base must be restored to its entry depth by the end of every draw
/// call; the host checks this with [`TransformStack::depth`] and resets a
/// corrupted stack with [`TransformStack::reset`].
#[derive(Clone, Debug)]
pub struct TransformStack {
    // Invariant: never empty; entry 0 is the identity base.
    stack: SmallVec<[Affine2; 8]>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            stack: smallvec![Affine2::IDENTITY],
        }
    }

    /// Number of pushes above the identity base.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// The effective current transform.
    pub fn top(&self) -> Affine2 {
        *self.stack.last().unwrap()
    }

    /// Duplicates the current top transform and pushes it.
    pub fn push(&mut self) {
        self.stack.push(self.top());
    }

    /// Removes the top transform.
    pub fn pop(&mut self) -> Result<(), StackError> {
        if self.depth() == 0 {
            return Err(StackError::Underflow);
        }
        self.stack.pop();
        Ok(())
    }

    /// Right-multiplies the top transform by a per-axis scale. Depth is
    /// unchanged.
    pub fn scale(&mut self, factors: Vec2) {
        let top = self.stack.last_mut().unwrap();
        *top = *top * Affine2::from_scale(factors);
    }

    /// Right-multiplies the top transform by a translation. Depth is
    /// unchanged.
    pub fn translate(&mut self, offset: Vec2) {
        let top = self.stack.last_mut().unwrap();
        *top = *top * Affine2::from_translation(offset);
    }

    /// Drops everything above the identity base.
    pub fn reset(&mut self) {
        self.stack.truncate(1);
        self.stack[0] = Affine2::IDENTITY;
    }
}

/// The rendering context passed into plugin `draw_init` and `draw` calls.
///
/// Owns a borrow of the host's transform stack and graphics backend for the
/// duration of one callback. Geometry submitted through
/// [`submit_cell`](RenderContext::submit_cell) is mapped through whatever is
/// on top of the stack at call time.
pub struct RenderContext<'a> {
    transforms: &'a mut TransformStack,
    backend: &'a mut dyn RenderBackend,
}

impl<'a> RenderContext<'a> {
    pub fn new(transforms: &'a mut TransformStack, backend: &'a mut dyn RenderBackend) -> Self {
        Self {
            transforms,
            backend,
        }
    }

    /// Duplicates the current top transform and pushes it.
    pub fn matrix_push(&mut self) {
        self.transforms.push();
    }

    /// Removes the top transform.
    pub fn matrix_pop(&mut self) -> Result<(), StackError> {
        self.transforms.pop()
    }

    /// Composes a per-axis scale onto the top transform.
    pub fn matrix_scale(&mut self, factors: Vec2) {
        self.transforms.scale(factors);
    }

    /// Composes a translation onto the top transform.
    pub fn matrix_translate(&mut self, offset: Vec2) {
        self.transforms.translate(offset);
    }

    /// The effective current transform.
    pub fn transform(&self) -> Affine2 {
        self.transforms.top()
    }

    /// Current stack depth above the base.
    pub fn depth(&self) -> usize {
        self.transforms.depth()
    }

    /// Viewport size of the underlying backend, in device cells.
    pub fn viewport(&self) -> (usize, usize) {
        self.backend.viewport()
    }

    /// Submits one axis-aligned cell rectangle, mapped through the current
    /// transform.
    ///
    /// Only scale and translation are composable onto the stack, so the
    /// transformed rectangle stays axis-aligned; corners are reordered in
    /// case of a negative scale.
    pub fn submit_cell(&mut self, min: Vec2, max: Vec2, color: Color) {
        let a = self.transforms.top().transform_point2(min);
        let b = self.transforms.top().transform_point2(max);
        self.backend.submit_rect(a.min(b), a.max(b), color);
    }

    /// Flushes the backend. Normally called by the host once per frame, not
    /// by plugins.
    pub fn present(&mut self) -> io::Result<()> {
        self.backend.present()
    }
}
