//! A fixed-extent 2D color buffer drawable.
//!
//! `ColorGrid` is the workhorse drawable for grid-based simulations: a plugin
//! performs many O(1) point updates per simulation step with
//! [`set`](ColorGrid::set), then pays the O(cells) rendering cost once per
//! frame with [`draw`](ColorGrid::draw). Re-submitting to the backend on
//! every `set` would be asymptotically worse for dense fields, so keep point
//! updates and bulk submission separate.

use glam::{UVec2, Vec2};

use crate::error::GridError;
use crate::rendering::color::Color;
use crate::rendering::context::RenderContext;

/// A 2D grid of colors with a fixed extent, drawn as a unit square centered
/// at the origin.
///
/// The grid starts unallocated; [`init`](ColorGrid::init) fixes the extent
/// and allocates backing storage. Initializing an already-initialized grid
/// fails with [`GridError::AlreadyInitialized`] rather than silently
/// reallocating.
#[derive(Clone, Debug, Default)]
pub struct ColorGrid {
    extent: Option<UVec2>,
    cells: Vec<Color>,
}

impl ColorGrid {
    /// Creates an unallocated grid. No operation other than `init` is valid
    /// on it yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates `extent.x * extent.y` cells, all set to the default
    /// (transparent) color.
    pub fn init(&mut self, extent: UVec2) -> Result<(), GridError> {
        if let Some(current) = self.extent {
            return Err(GridError::AlreadyInitialized(current));
        }
        if extent.x == 0 || extent.y == 0 {
            return Err(GridError::InvalidExtent(extent));
        }
        self.cells = vec![Color::default(); extent.x as usize * extent.y as usize];
        self.extent = Some(extent);
        Ok(())
    }

    /// Returns whether `init` has run.
    pub fn is_initialized(&self) -> bool {
        self.extent.is_some()
    }

    /// The fixed extent, if initialized.
    pub fn extent(&self) -> Option<UVec2> {
        self.extent
    }

    fn extent_checked(&self) -> Result<UVec2, GridError> {
        self.extent.ok_or(GridError::NotInitialized)
    }

    fn index(extent: UVec2, coord: UVec2) -> Result<usize, GridError> {
        if coord.x >= extent.x || coord.y >= extent.y {
            return Err(GridError::OutOfBounds { coord, extent });
        }
        Ok((coord.y * extent.x + coord.x) as usize)
    }

    /// Resets every cell to `color`.
    pub fn clear(&mut self, color: Color) -> Result<(), GridError> {
        self.extent_checked()?;
        for cell in self.cells.iter_mut() {
            *cell = color;
        }
        Ok(())
    }

    /// Writes one cell, unconditionally overwriting the previous value.
    ///
    /// A failed write leaves the grid unmodified.
    pub fn set(&mut self, coord: UVec2, color: Color) -> Result<(), GridError> {
        let extent = self.extent_checked()?;
        let idx = Self::index(extent, coord)?;
        self.cells[idx] = color;
        Ok(())
    }

    /// Reads one cell.
    pub fn get(&self, coord: UVec2) -> Result<Color, GridError> {
        let extent = self.extent_checked()?;
        let idx = Self::index(extent, coord)?;
        Ok(self.cells[idx])
    }

    /// Submits every cell to the context in row-major order.
    ///
    /// The grid occupies `[-0.5, 0.5]` on both axes in its local space, with
    /// cell `(0, 0)` at the bottom-left; callers scale it into world space
    /// via the context's transform stack. Submission is dense: transparent
    /// cells are submitted too, and it is up to the backend to skip them.
    /// Does not mutate the grid.
    pub fn draw(&self, ctx: &mut RenderContext) -> Result<(), GridError> {
        let extent = self.extent_checked()?;
        let cell_size = Vec2::new(1.0 / extent.x as f32, 1.0 / extent.y as f32);
        for y in 0..extent.y {
            for x in 0..extent.x {
                let color = self.cells[(y * extent.x + x) as usize];
                let min = Vec2::new(
                    x as f32 * cell_size.x - 0.5,
                    y as f32 * cell_size.y - 0.5,
                );
                ctx.submit_cell(min, min + cell_size, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::backend::RecordingBackend;
    use crate::rendering::context::TransformStack;

    fn draw_into(grid: &ColorGrid, backend: &mut RecordingBackend) -> Result<(), GridError> {
        let mut transforms = TransformStack::new();
        let mut ctx = RenderContext::new(&mut transforms, backend);
        grid.draw(&mut ctx)
    }

    #[test]
    fn init_then_draw_submits_every_cell() {
        let mut grid = ColorGrid::new();
        grid.init(UVec2::new(7, 3)).unwrap();

        let mut backend = RecordingBackend::default();
        draw_into(&grid, &mut backend).unwrap();
        assert_eq!(backend.submitted.len(), 21);
    }

    #[test]
    fn init_rejects_zero_extent() {
        let mut grid = ColorGrid::new();
        assert_eq!(
            grid.init(UVec2::new(0, 5)),
            Err(GridError::InvalidExtent(UVec2::new(0, 5)))
        );
        assert!(!grid.is_initialized());
    }

    #[test]
    fn reinit_fails_fast() {
        let mut grid = ColorGrid::new();
        grid.init(UVec2::new(4, 4)).unwrap();
        assert_eq!(
            grid.init(UVec2::new(8, 8)),
            Err(GridError::AlreadyInitialized(UVec2::new(4, 4)))
        );
        assert_eq!(grid.extent(), Some(UVec2::new(4, 4)));
    }

    #[test]
    fn operations_require_init() {
        let mut grid = ColorGrid::new();
        assert_eq!(grid.clear(Color::BLACK), Err(GridError::NotInitialized));
        assert_eq!(
            grid.set(UVec2::ZERO, Color::RED),
            Err(GridError::NotInitialized)
        );
        assert_eq!(grid.get(UVec2::ZERO), Err(GridError::NotInitialized));

        let mut backend = RecordingBackend::default();
        assert_eq!(draw_into(&grid, &mut backend), Err(GridError::NotInitialized));
        assert!(backend.submitted.is_empty());
    }

    #[test]
    fn set_get_round_trip_last_write_wins() {
        let mut grid = ColorGrid::new();
        grid.init(UVec2::new(10, 10)).unwrap();

        let coord = UVec2::new(3, 7);
        grid.set(coord, Color::GREEN).unwrap();
        assert_eq!(grid.get(coord), Ok(Color::GREEN));

        // no blending: the second write fully replaces the first
        grid.set(coord, Color::rgba(1.0, 0.0, 0.0, 0.25)).unwrap();
        assert_eq!(grid.get(coord), Ok(Color::rgba(1.0, 0.0, 0.0, 0.25)));
    }

    #[test]
    fn set_out_of_bounds_leaves_grid_unmodified() {
        let mut grid = ColorGrid::new();
        grid.init(UVec2::new(4, 4)).unwrap();
        grid.clear(Color::BLUE).unwrap();

        let err = grid.set(UVec2::new(4, 0), Color::RED);
        assert_eq!(
            err,
            Err(GridError::OutOfBounds {
                coord: UVec2::new(4, 0),
                extent: UVec2::new(4, 4),
            })
        );
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(grid.get(UVec2::new(x, y)), Ok(Color::BLUE));
            }
        }
    }

    #[test]
    fn clear_is_equivalent_to_fresh_grid_of_that_color() {
        let mut grid = ColorGrid::new();
        grid.init(UVec2::new(5, 5)).unwrap();
        grid.set(UVec2::new(2, 2), Color::RED).unwrap();
        grid.clear(Color::WHITE).unwrap();

        let mut fresh = ColorGrid::new();
        fresh.init(UVec2::new(5, 5)).unwrap();
        fresh.clear(Color::WHITE).unwrap();

        let mut a = RecordingBackend::default();
        let mut b = RecordingBackend::default();
        draw_into(&grid, &mut a).unwrap();
        draw_into(&fresh, &mut b).unwrap();
        assert_eq!(a.submitted, b.submitted);
    }

    #[test]
    fn draw_respects_current_transform() {
        let mut grid = ColorGrid::new();
        grid.init(UVec2::new(2, 2)).unwrap();

        let mut backend = RecordingBackend::default();
        let mut transforms = TransformStack::new();
        let mut ctx = RenderContext::new(&mut transforms, &mut backend);
        ctx.matrix_push();
        ctx.matrix_scale(Vec2::new(10.0, 10.0));
        grid.draw(&mut ctx).unwrap();
        ctx.matrix_pop().unwrap();

        // first submitted cell is the bottom-left quarter, scaled to world
        let first = &backend.submitted[0];
        assert_eq!(first.min, Vec2::new(-5.0, -5.0));
        assert_eq!(first.max, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn diagonal_scenario() {
        // 200x200 grid with an opaque red diagonal, everything else
        // fully transparent
        let extent = UVec2::new(200, 200);
        let mut grid = ColorGrid::new();
        grid.init(extent).unwrap();
        for i in 1..=200u32 {
            for j in 1..=200u32 {
                let color = if i == j { Color::RED } else { Color::TRANSPARENT };
                grid.set(UVec2::new(i - 1, j - 1), color).unwrap();
            }
        }

        let mut backend = RecordingBackend::default();
        draw_into(&grid, &mut backend).unwrap();
        assert_eq!(backend.submitted.len(), 200 * 200);

        let red = backend
            .submitted
            .iter()
            .filter(|rect| rect.color == Color::RED)
            .count();
        let transparent = backend
            .submitted
            .iter()
            .filter(|rect| rect.color == Color::TRANSPARENT)
            .count();
        assert_eq!(red, 200);
        assert_eq!(transparent, 200 * 200 - 200);
    }
}
