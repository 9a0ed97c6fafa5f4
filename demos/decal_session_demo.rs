//! Scripted decal painting session
//!
//! Replays a sequence of pointer gestures against the default sphere:
//! - Clicks at random pixels place decals
//! - Every third gesture is a camera drag and places nothing
//! - A frame is ticked after each gesture
//!
//! Run with `RUST_LOG=debug` to see every raycast miss and clip.

use anyhow::{bail, Context, Result};
use clap::Parser;
use decalkit_geometry::Surface;
use decalkit_interaction::{
    DecalInstance, DecalParams, DecalSession, HoverMarker, Interaction, PointerEvent, RenderSink,
    SceneNode, Viewport,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Parser, Debug)]
#[command(name = "decal_session_demo")]
#[command(about = "Place decals on a sphere with scripted pointer input")]
struct Args {
    /// Smallest decal half-size
    #[arg(long, default_value_t = 5.0)]
    min_scale: f32,

    /// Largest decal half-size
    #[arg(long, default_value_t = 10.0)]
    max_scale: f32,

    /// Randomize decal roll around the surface normal
    #[arg(long)]
    rotate: bool,

    /// Seed for placement and gesture randomness
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of scripted gestures
    #[arg(long, default_value_t = 12)]
    clicks: usize,

    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    #[arg(long, default_value_t = 720.0)]
    height: f32,
}

/// Counts what each frame would draw
#[derive(Default)]
struct FrameStats {
    surfaces: usize,
    hovers: usize,
    decals: usize,
    triangles: usize,
}

impl RenderSink for FrameStats {
    fn draw_surface(&mut self, surface: &Surface, _node: &SceneNode) {
        self.surfaces += 1;
        self.triangles += surface.face_count();
    }

    fn draw_hover(&mut self, _marker: &HoverMarker) {
        self.hovers += 1;
    }

    fn draw_decal(&mut self, decal: &DecalInstance) {
        self.decals += 1;
        self.triangles += decal.mesh().len();
    }
}

fn random_pixel(rng: &mut StdRng, viewport: &Viewport) -> (f32, f32) {
    (
        rng.gen_range(0.0..viewport.width),
        rng.gen_range(0.0..viewport.height),
    )
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.clicks == 0 {
        bail!("--clicks must be at least 1");
    }

    let params = DecalParams {
        min_scale: args.min_scale,
        max_scale: args.max_scale,
        rotate: args.rotate,
        ..DecalParams::default()
    };
    let viewport = Viewport::new(args.width, args.height).context("invalid viewport")?;
    let mut session =
        DecalSession::new(params, viewport, Some(args.seed)).context("failed to start session")?;
    let mut gestures = StdRng::seed_from_u64(args.seed.wrapping_add(1));

    let (mut placed, mut suppressed, mut missed) = (0usize, 0usize, 0usize);
    for gesture in 0..args.clicks {
        let (x, y) = random_pixel(&mut gestures, &viewport);
        session.handle_event(PointerEvent::Down { x, y });

        let (up_x, up_y) = if gesture % 3 == 2 {
            let (to_x, to_y) = (x + gestures.gen_range(20.0..120.0), y);
            session.handle_event(PointerEvent::Move {
                x: to_x,
                y: to_y,
                is_primary: true,
            });
            (to_x, to_y)
        } else {
            (x, y)
        };

        match session.handle_event(PointerEvent::Up { x: up_x, y: up_y }) {
            Interaction::Placed { draw_order, .. } => {
                debug!("Gesture {} placed decal #{}", gesture, draw_order);
                placed += 1;
            }
            Interaction::Suppressed => suppressed += 1,
            Interaction::Missed | Interaction::Empty => missed += 1,
            Interaction::Rejected(e) => return Err(e).context("placement failed"),
            _ => {}
        }

        let mut stats = FrameStats::default();
        session.tick(&mut stats);
        debug!(
            "Frame {}: {} decals, {} triangles, hover shown: {}",
            session.frame_count(),
            stats.decals,
            stats.triangles,
            stats.hovers > 0
        );
    }

    info!(
        "{} gestures: {} placed, {} camera drags, {} missed",
        args.clicks, placed, suppressed, missed
    );

    let mut stats = FrameStats::default();
    session.tick(&mut stats);
    println!("Decal session finished");
    println!("- Decals in store: {}", session.store().len());
    println!("- Triangles drawn last frame: {}", stats.triangles);
    println!("- Surfaces drawn last frame: {}", stats.surfaces);

    session.clear_decals();
    println!("- Decals after clear: {}", session.store().len());
    Ok(())
}
