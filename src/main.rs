//! Top-down city driving viewer.
//!
//! ```bash
//! cargo run --release -- --seed 7
//! RUST_LOG=debug cargo run -- --config city.toml --template blocks.txt
//! ```
//!
//! Arrows / WASD drive, Space brakes, Esc quits.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::info;
use minifb::{Key, Window, WindowOptions};

use cityrun::{
    config::GameConfig,
    renderer::{RendererExt, Software, TopDownCamera, scene},
    sim::{InputCmd, Phase, SIM_FPS, Session, TicRunner},
};

const W: usize = 960;
const H: usize = 720;
/// Camera ease rate, 1/s.
const FOLLOW: f32 = 6.0;

#[derive(Parser, Debug)]
#[command(version, about = "Drive around a procedurally built city")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// City floor-plan template (overrides the config file)
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// RNG seed (overrides the config file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Pixels per world unit
    #[arg(long, default_value_t = 28.0)]
    scale: f32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut cfg = GameConfig::load_or_default(args.config.as_deref())
        .context("loading configuration")?;
    if args.template.is_some() {
        cfg.city.template = args.template;
    }
    if args.seed.is_some() {
        cfg.city.seed = args.seed;
    }

    let session = Session::new(cfg).context("building the city")?;
    let (gw, gl) = session.city().grid.dimensions();
    info!("city {gw}×{gl}, {} buildings", session.city().index.len());

    let mut sim = TicRunner::new(session);
    let mut camera = TopDownCamera::new(args.scale, FOLLOW);
    camera.snap_to(scene::focus(sim.session()));
    let mut renderer = Software::default();

    let mut win = Window::new("cityrun", W, H, WindowOptions::default())?;
    win.set_target_fps(SIM_FPS as usize);

    let mut last_frame = Instant::now();
    let mut announced = false;

    while win.is_open() && !win.is_key_down(Key::Escape) {
        /* --------------- build one InputCmd per frame --------------------- */
        let mut cmd = InputCmd::default();
        if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
            cmd.throttle += 1.0;
        }
        if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
            cmd.throttle -= 1.0;
        }
        if win.is_key_down(Key::Left) || win.is_key_down(Key::A) {
            cmd.steer += 1.0;
        }
        if win.is_key_down(Key::Right) || win.is_key_down(Key::D) {
            cmd.steer -= 1.0;
        }
        cmd.brake = win.is_key_down(Key::Space);

        sim.pump(cmd);

        let session = sim.session();
        if session.phase() != Phase::Running && !announced {
            println!(
                "{:?} after {:.1}s with {} points",
                session.phase(),
                session.elapsed(),
                session.score().points()
            );
            announced = true;
        }

        /* draw */
        let dt = last_frame.elapsed().as_secs_f32();
        last_frame = Instant::now();
        camera.follow(scene::focus(session), dt);

        let calls = scene::compose(session, &camera, W, H);
        let mut shown = Ok(());
        renderer.draw_frame(W, H, &calls, |fb, w, h| {
            shown = win.update_with_buffer(fb, w, h);
        });
        shown?;
    }
    Ok(())
}
