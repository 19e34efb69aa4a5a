//! A decaying signal field: random cells are energized each frame and every
//! cell fades back toward transparent, leaving drifting green blotches.
//!
//! Run with `cargo run --example diffusion`.

use std::time::Duration;

use glam::{UVec2, Vec2};
use rand::Rng;
use simvis::error::PluginError;
use simvis::rendering::backend::TermBackend;
use simvis::{
    install_panic_handler, terminal_cleanup, terminal_setup, Color, ColorGrid, Configuration,
    Host, Plugin, RenderContext, Simulation,
};

struct DiffusionPlugin {
    grid: ColorGrid,
    extent: UVec2,
    /// Energized cells per second.
    injection_rate: f64,
    /// Exponential decay constant, per second.
    decay: f32,
    carry: f64,
}

impl DiffusionPlugin {
    fn new() -> Self {
        Self {
            grid: ColorGrid::new(),
            extent: UVec2::ZERO,
            injection_rate: 0.0,
            decay: 0.0,
            carry: 0.0,
        }
    }
}

impl Plugin for DiffusionPlugin {
    fn name(&self) -> &str {
        "diffusion"
    }

    fn configure(&mut self, config: &Configuration) -> Result<(), PluginError> {
        let size = config.get_u64_or("size", 120)? as u32;
        self.extent = UVec2::new(size, size);
        self.injection_rate = config.get_f64_or("injection-rate", 400.0)?;
        self.decay = config.get_f64_or("decay", 1.5)? as f32;
        Ok(())
    }

    fn draw_init(&mut self, _ctx: &mut RenderContext) -> Result<(), PluginError> {
        self.grid.init(self.extent)?;
        self.grid.clear(Color::TRANSPARENT)?;
        Ok(())
    }

    fn update(&mut self, dt: Duration, _sim: &Simulation) -> Result<(), PluginError> {
        let dt = dt.as_secs_f32();
        let fade = (-self.decay * dt).exp();
        for y in 0..self.extent.y {
            for x in 0..self.extent.x {
                let coord = UVec2::new(x, y);
                let mut color = self.grid.get(coord)?;
                if color.a > 0.0 {
                    color.a *= fade;
                    if color.a < 0.01 {
                        color = Color::TRANSPARENT;
                    }
                    self.grid.set(coord, color)?;
                }
            }
        }

        let mut rng = rand::thread_rng();
        self.carry += self.injection_rate * dt as f64;
        while self.carry >= 1.0 {
            self.carry -= 1.0;
            let coord = UVec2::new(
                rng.gen_range(0..self.extent.x),
                rng.gen_range(0..self.extent.y),
            );
            let strength = rng.gen_range(0.5..1.0f32);
            self.grid
                .set(coord, Color::rgba(0.2, 1.0, 0.4, strength))?;
        }
        Ok(())
    }

    fn draw(&mut self, ctx: &mut RenderContext, sim: &Simulation) -> Result<(), PluginError> {
        ctx.matrix_push();
        ctx.matrix_scale(sim.world_size());
        self.grid.draw(ctx)?;
        ctx.matrix_pop()?;
        Ok(())
    }
}

fn main() -> std::io::Result<()> {
    env_logger::init();

    let world_size = Vec2::new(1.0, 1.0);
    let backend = TermBackend::stdout(world_size)?;
    let mut host = Host::new(backend, world_size);
    host.add_plugin(Box::new(DiffusionPlugin::new()), Configuration::new());

    terminal_setup()?;
    install_panic_handler();

    host.setup();
    let result = host.run(900, 30.0);

    terminal_cleanup()?;
    result
}
