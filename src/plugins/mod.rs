//! The plugin trait and the lifecycle state machine the host drives it
//! through.
//!
//! A plugin instance moves through `Unloaded → Configured → DrawReady →
//! Running` and stays in `Running` for the rest of the run, alternating
//! `update` and `draw` once per frame. Any callback error latches the
//! instance into `Failed`, after which the host skips it; other plugins are
//! unaffected.

use std::time::Duration;

use crate::config::Configuration;
use crate::error::{LifecycleError, PluginError};
use crate::rendering::context::RenderContext;
use crate::simulation::Simulation;

/// A unit of user code driven by the host once per frame.
///
/// All callbacks are optional; the defaults do nothing. State that the
/// original scripts kept in module-level globals lives in fields of the
/// implementing type instead, so several instances of the same plugin can be
/// loaded side by side.
pub trait Plugin {
    /// Short name used in log messages.
    fn name(&self) -> &str {
        "plugin"
    }

    /// Called once, right after load. Read configuration and set up
    /// plugin-local state here; the rendering context is not available yet,
    /// so no grid allocation.
    fn configure(&mut self, _config: &Configuration) -> Result<(), PluginError> {
        Ok(())
    }

    /// Called once before the first draw, with the rendering context
    /// available. Allocate and `init` drawables here.
    fn draw_init(&mut self, _ctx: &mut RenderContext) -> Result<(), PluginError> {
        Ok(())
    }

    /// Called once per frame to advance plugin state. May `set`/`clear` the
    /// plugin's grid.
    fn update(&mut self, _dt: Duration, _simulation: &Simulation) -> Result<(), PluginError> {
        Ok(())
    }

    /// Called once per frame after `update`. The typical body pushes the
    /// transform stack, scales by `simulation.world_size()`, draws the grid
    /// and pops. The host verifies the stack returns to its entry depth.
    fn draw(
        &mut self,
        _ctx: &mut RenderContext,
        _simulation: &Simulation,
    ) -> Result<(), PluginError> {
        Ok(())
    }
}

/// Lifecycle states of a loaded plugin instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    /// Loaded but not yet configured.
    Unloaded,
    /// `configure` has run; no rendering resources yet.
    Configured,
    /// `draw_init` has run; drawables are allocated.
    DrawReady,
    /// At least one `update` has run; alternating update/draw.
    Running,
    /// A callback failed; the instance is skipped for the rest of the run.
    Failed,
}

impl LifecycleState {
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Unloaded => "Unloaded",
            LifecycleState::Configured => "Configured",
            LifecycleState::DrawReady => "DrawReady",
            LifecycleState::Running => "Running",
            LifecycleState::Failed => "Failed",
        }
    }
}

/// A plugin instance plus its lifecycle state.
///
/// Enforces the transition table: callbacks invoked out of order fail with
/// [`LifecycleError::InvalidTransition`], and any callback error latches the
/// handle into [`LifecycleState::Failed`].
pub struct PluginHandle {
    plugin: Box<dyn Plugin>,
    state: LifecycleState,
    draw_initialized: bool,
}

impl PluginHandle {
    pub fn new(plugin: Box<dyn Plugin>) -> Self {
        Self {
            plugin,
            state: LifecycleState::Unloaded,
            draw_initialized: false,
        }
    }

    pub fn name(&self) -> &str {
        self.plugin.name()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Whether the instance is still participating in the run.
    pub fn is_live(&self) -> bool {
        self.state != LifecycleState::Failed
    }

    fn invalid(&self, call: &'static str) -> PluginError {
        LifecycleError::InvalidTransition {
            call,
            state: self.state.as_str(),
        }
        .into()
    }

    fn latch<T>(&mut self, result: Result<T, PluginError>) -> Result<T, PluginError> {
        if result.is_err() {
            self.state = LifecycleState::Failed;
        }
        result
    }

    /// Marks the instance failed without running a callback. Used by the
    /// host when it detects an unbalanced transform stack after a draw.
    pub fn fail(&mut self) {
        self.state = LifecycleState::Failed;
    }

    /// Runs `configure`. Valid exactly once, from `Unloaded`.
    pub fn configure(&mut self, config: &Configuration) -> Result<(), PluginError> {
        if self.state != LifecycleState::Unloaded {
            return Err(self.invalid("configure"));
        }
        let result = self.plugin.configure(config);
        self.latch(result)?;
        self.state = LifecycleState::Configured;
        Ok(())
    }

    /// Runs `draw_init`. Valid exactly once, from `Configured`.
    pub fn draw_init(&mut self, ctx: &mut RenderContext) -> Result<(), PluginError> {
        if self.state != LifecycleState::Configured {
            return Err(self.invalid("draw_init"));
        }
        let result = self.plugin.draw_init(ctx);
        self.latch(result)?;
        self.state = LifecycleState::DrawReady;
        self.draw_initialized = true;
        Ok(())
    }

    /// Runs `update`. Valid once `configure` has run.
    pub fn update(&mut self, dt: Duration, simulation: &Simulation) -> Result<(), PluginError> {
        match self.state {
            LifecycleState::Configured | LifecycleState::DrawReady | LifecycleState::Running => {}
            _ => return Err(self.invalid("update")),
        }
        let result = self.plugin.update(dt, simulation);
        self.latch(result)?;
        self.state = LifecycleState::Running;
        Ok(())
    }

    /// Runs `draw`. Valid once `draw_init` has run.
    pub fn draw(
        &mut self,
        ctx: &mut RenderContext,
        simulation: &Simulation,
    ) -> Result<(), PluginError> {
        if !self.draw_initialized || self.state == LifecycleState::Failed {
            return Err(self.invalid("draw"));
        }
        let result = self.plugin.draw(ctx, simulation);
        self.latch(result)?;
        self.state = LifecycleState::Running;
        Ok(())
    }
}
