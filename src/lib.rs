#![doc = include_str!("../README.md")]

use std::io;
use std::time::{Duration, Instant};

use crossterm::{cursor, execute};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use glam::Vec2;

pub mod config;
pub mod error;
pub mod plugins;
pub mod rendering;
pub mod simulation;

pub use crate::config::Configuration;
pub use crate::plugins::{LifecycleState, Plugin, PluginHandle};
pub use crate::rendering::backend::RenderBackend;
pub use crate::rendering::color::Color;
pub use crate::rendering::context::RenderContext;
pub use crate::rendering::grid::ColorGrid;
pub use crate::simulation::Simulation;

use crate::error::StackError;
use crate::rendering::context::TransformStack;

struct PluginEntry {
    handle: PluginHandle,
    config: Configuration,
}

/// Drives a set of plugins through the lifecycle, one frame at a time.
///
/// The host owns the graphics backend, the shared transform stack and the
/// simulation snapshot. Everything is strictly single-threaded and
/// run-to-completion: one frame is `update` for every live plugin, then
/// `draw` for every live plugin, then a backend present.
///
/// Plugin failures are isolated: a callback error (or an unbalanced
/// transform stack detected after a draw) marks only that plugin failed and
/// logs it; the remaining plugins keep running.
pub struct Host<B: RenderBackend> {
    backend: B,
    transforms: TransformStack,
    simulation: Simulation,
    plugins: Vec<PluginEntry>,
}

impl<B: RenderBackend> Host<B> {
    pub fn new(backend: B, world_size: Vec2) -> Self {
        Self {
            backend,
            transforms: TransformStack::new(),
            simulation: Simulation::new(world_size),
            plugins: Vec::new(),
        }
    }

    /// Registers a plugin with the configuration its `configure` call will
    /// receive during [`setup`](Self::setup).
    pub fn add_plugin(&mut self, plugin: Box<dyn Plugin>, config: Configuration) {
        self.plugins.push(PluginEntry {
            handle: PluginHandle::new(plugin),
            config,
        });
    }

    /// The current simulation snapshot.
    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Number of plugins that have not failed.
    pub fn live_plugins(&self) -> usize {
        self.plugins.iter().filter(|p| p.handle.is_live()).count()
    }

    /// Lifecycle states of all registered plugins, in registration order.
    pub fn plugin_states(&self) -> Vec<LifecycleState> {
        self.plugins.iter().map(|p| p.handle.state()).collect()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Consumes the host, returning the backend. Mostly useful for
    /// inspecting a recording backend after a run.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Runs `configure` and then `draw_init` for every registered plugin.
    ///
    /// Must run before the first [`step`](Self::step). A plugin failing
    /// either call is logged and skipped for the rest of the run.
    pub fn setup(&mut self) {
        for entry in &mut self.plugins {
            if let Err(err) = entry.handle.configure(&entry.config) {
                log::error!("plugin '{}' failed to configure: {err}", entry.handle.name());
                continue;
            }
            log::debug!("plugin '{}' configured", entry.handle.name());
        }
        for entry in &mut self.plugins {
            if !entry.handle.is_live() {
                continue;
            }
            let mut ctx = RenderContext::new(&mut self.transforms, &mut self.backend);
            if let Err(err) = entry.handle.draw_init(&mut ctx) {
                log::error!(
                    "plugin '{}' failed in draw_init: {err}",
                    entry.handle.name()
                );
                continue;
            }
            log::debug!("plugin '{}' draw-ready", entry.handle.name());
        }
    }

    /// Runs one frame: advance the simulation, update all live plugins, draw
    /// all live plugins, present.
    pub fn step(&mut self, dt: Duration) -> io::Result<()> {
        self.simulation.advance(dt);

        for entry in &mut self.plugins {
            if !entry.handle.is_live() {
                continue;
            }
            if let Err(err) = entry.handle.update(dt, &self.simulation) {
                log::error!("plugin '{}' failed in update: {err}", entry.handle.name());
            }
        }

        self.backend.begin_frame();
        for entry in &mut self.plugins {
            if !entry.handle.is_live() {
                continue;
            }
            let entry_depth = self.transforms.depth();
            let mut ctx = RenderContext::new(&mut self.transforms, &mut self.backend);
            if let Err(err) = entry.handle.draw(&mut ctx, &self.simulation) {
                log::error!("plugin '{}' failed in draw: {err}", entry.handle.name());
                self.transforms.reset();
                continue;
            }
            // the stack is shared by every plugin drawn this frame, so an
            // unbalanced plugin would corrupt all draws after it
            let residual = self.transforms.depth() - entry_depth;
            if residual != 0 {
                let err = StackError::Unbalanced { residual };
                log::error!("plugin '{}': {err}", entry.handle.name());
                entry.handle.fail();
                self.transforms.reset();
            }
        }
        self.backend.present()
    }

    /// Runs `frames` frames, sleeping between them to hold `target_fps`.
    ///
    /// Each frame's `dt` is the measured wall-clock time since the previous
    /// frame started.
    pub fn run(&mut self, frames: u64, target_fps: f64) -> io::Result<()> {
        let frame_budget = Duration::from_secs_f64(1.0 / target_fps);
        let mut last_frame = Instant::now();
        let mut dt = frame_budget;
        for _ in 0..frames {
            self.step(dt)?;

            let elapsed = last_frame.elapsed();
            std::thread::sleep(frame_budget.saturating_sub(elapsed));
            let now = Instant::now();
            dt = now.duration_since(last_frame);
            last_frame = now;
        }
        Ok(())
    }
}

/// Puts the terminal into raw mode on the alternate screen with the cursor
/// hidden. Call before running a host on a terminal backend, and pair with
/// [`terminal_cleanup`].
pub fn terminal_setup() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    enable_raw_mode()?;
    execute!(stdout, cursor::Hide)?;
    Ok(())
}

/// Undoes everything [`terminal_setup`] did.
pub fn terminal_cleanup() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Show)?;
    disable_raw_mode()?;
    execute!(stdout, crossterm::terminal::LeaveAlternateScreen)?;
    Ok(())
}

/// Installs a panic handler that restores the terminal before printing the
/// panic. Without this the message would be lost to the alternate screen.
pub fn install_panic_handler() {
    let old_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |pinfo| {
        let _ = terminal_cleanup();
        eprintln!("{pinfo}");
        old_hook(pinfo);
    }));
}
