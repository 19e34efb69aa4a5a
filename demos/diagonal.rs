//! Draws an opaque red diagonal across a 200x200 grid, with everything else
//! transparent so the configured background shows through.
//!
//! Run with `cargo run --example diagonal`. Press Ctrl+C to exit early.

use glam::{UVec2, Vec2};
use simvis::error::PluginError;
use simvis::rendering::backend::TermBackend;
use simvis::{
    install_panic_handler, terminal_cleanup, terminal_setup, Color, ColorGrid, Configuration,
    Host, Plugin, RenderContext, Simulation,
};

struct DiagonalPlugin {
    grid: ColorGrid,
    size: u32,
}

impl DiagonalPlugin {
    fn new() -> Self {
        Self {
            grid: ColorGrid::new(),
            size: 0,
        }
    }
}

impl Plugin for DiagonalPlugin {
    fn name(&self) -> &str {
        "diagonal"
    }

    fn configure(&mut self, config: &Configuration) -> Result<(), PluginError> {
        self.size = config.get_u64_or("size", 200)? as u32;
        Ok(())
    }

    fn draw_init(&mut self, _ctx: &mut RenderContext) -> Result<(), PluginError> {
        self.grid.init(UVec2::new(self.size, self.size))?;
        for i in 1..=self.size {
            for j in 1..=self.size {
                let color = if i == j { Color::RED } else { Color::TRANSPARENT };
                self.grid.set(UVec2::new(i - 1, j - 1), color)?;
            }
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
    let mut backend = TermBackend::stdout(world_size)?;
    backend.set_default_bg(Color::rgb(0.1, 0.1, 0.1));

    let mut host = Host::new(backend, world_size);
    host.add_plugin(
        Box::new(DiagonalPlugin::new()),
        Configuration::new().with("size", 200u64),
    );

    terminal_setup()?;
    install_panic_handler();

    host.setup();
    let result = host.run(300, 30.0);

    terminal_cleanup()?;
    result
}
