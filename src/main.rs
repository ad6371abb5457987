use bounce_sandbox::{Color, Renderer, SandboxConfig, Segment, Session, Vec2};

use anyhow::{Context, Result, ensure};
use clap::Parser;

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

/// Runs the sandbox without a window, ticking frames at a fixed refresh rate.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// YAML scenario; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of display refreshes to simulate.
    #[arg(short, long, default_value_t = 600)]
    frames: usize,

    /// Refresh rate in Hz.
    #[arg(long, default_value_t = 60.0)]
    hz: f64,

    /// Bodies to spawn before the first frame, on top of the initial one.
    #[arg(short, long, default_value_t = 0)]
    spawn: usize,

    /// Write the last frame as an SVG image.
    #[arg(long)]
    svg: Option<PathBuf>,
}

/// Collects draw calls into an SVG document.
struct SvgRenderer {
    body: String,
}

impl SvgRenderer {
    fn new() -> Self {
        Self { body: String::new() }
    }

    fn finish(self, width: f32, height: f32) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
             viewBox=\"0 0 {width} {height}\">\n{}</svg>\n",
            self.body
        )
    }
}

impl Renderer for SvgRenderer {
    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let _ = writeln!(
            self.body,
            "  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{radius}\" fill=\"none\" \
             stroke=\"{}\" stroke-width=\"2\"/>",
            center.x,
            center.y,
            color.to_hex()
        );
    }

    fn line(&mut self, segment: Segment, color: Color) {
        let _ = writeln!(
            self.body,
            "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" \
             stroke=\"{}\" stroke-width=\"2\"/>",
            segment.from.x,
            segment.from.y,
            segment.to.x,
            segment.to.y,
            color.to_hex()
        );
    }
}

fn load_config(args: &Args) -> Result<SandboxConfig> {
    let mut config = match &args.config {
        Some(path) => SandboxConfig::load(path)?,
        None => SandboxConfig::default(),
    };
    // A headless run that starts paused would never move.
    config.paused = false;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    ensure!(args.hz.is_finite() && args.hz > 0.0, "--hz must be positive");

    let config = load_config(&args)?;
    let mut session = Session::new(config);

    for _ in 0..args.spawn {
        if session.simulation.spawn().is_none() {
            log::info!("population cap reached at {}", session.simulation.bodies.len());
            break;
        }
    }

    // Frame timestamps start at zero, so the first frame steps nothing.
    let period = 1000.0 / args.hz;
    for frame in 0..args.frames {
        session.frame(frame as f64 * period);
    }
    let seconds = args.frames.saturating_sub(1) as f64 * period / 1000.0;

    let sim = &session.simulation;
    log::info!(
        "simulated {} frames ({:.2}s) with {} bodies",
        sim.frame,
        seconds,
        sim.bodies.len()
    );
    for body in &sim.bodies {
        println!(
            "body {:>3}  pos ({:>8.2}, {:>8.2})  vel ({:>8.2}, {:>8.2})  r {:.1}  {}",
            body.id,
            body.pos.x,
            body.pos.y,
            body.vel.x,
            body.vel.y,
            body.radius,
            body.color.to_hex()
        );
    }

    if let Some(path) = &args.svg {
        let mut svg = SvgRenderer::new();
        sim.render(&mut svg);
        fs::write(path, svg.finish(sim.bounds.width, sim.bounds.height))
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("wrote {}", path.display());
    }

    Ok(())
}
