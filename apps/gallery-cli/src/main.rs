use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use gallery_assets::{load_manifest, preload};
use gallery_input::{InputEvent, Intent};
use gallery_kernel::{Gallery, GalleryConfig};
use gallery_render::{DebugTextRenderer, RenderView, Renderer};
use gallery_scene::{PaintingDescriptor, build_gallery, default_paintings};
use gallery_walk::{GalleryBounds, MAX_FRAME_DT, SPRINT_SPEED, WALK_SPEED};
use glam::Vec3;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gallery-cli", about = "Headless tools for the gallery walkthrough")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Painting manifest (JSON, or YAML by extension) replacing the default six
    #[arg(long, global = true)]
    paintings: Option<PathBuf>,

    /// Seed for the dust particle field
    #[arg(long, default_value = "42", global = true)]
    seed: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, walk constants and scene counts
    Info,
    /// Dump the assembled scene as text
    Layout,
    /// List where each painting hangs
    Paintings,
    /// Simulate holding keys and print the final camera pose
    Walk {
        /// Comma-separated keys or intents, e.g. "w,d,shift"
        #[arg(short, long, default_value = "w")]
        keys: String,
        /// Simulated seconds
        #[arg(short, long, default_value = "2.0")]
        seconds: f32,
        /// Simulated frame rate
        #[arg(long, default_value = "60")]
        fps: u32,
        /// Never grant pointer capture
        #[arg(long)]
        unlocked: bool,
    },
}

fn load_paintings(manifest: Option<&Path>) -> Result<Vec<PaintingDescriptor>> {
    let Some(path) = manifest else {
        return Ok(default_paintings());
    };
    let paintings = load_manifest(path)
        .with_context(|| format!("failed to load painting manifest {}", path.display()))?;
    let (paintings, _images) = preload(&paintings);
    Ok(paintings)
}

fn parse_keys(keys: &str) -> Result<Vec<Intent>> {
    keys.split(',')
        .filter(|k| !k.trim().is_empty())
        .map(|k| Intent::from_name(k).with_context(|| format!("unknown key {k:?}")))
        .collect()
}

/// Result of a simulated walk.
struct WalkRun {
    frames: u64,
    locked: bool,
    start: Vec3,
    end: Vec3,
    hint: &'static str,
}

/// Click in, hold `intents` and tick at a fixed rate, the way the window would.
fn simulate_walk(
    config: GalleryConfig,
    intents: &[Intent],
    seconds: f32,
    fps: u32,
    unlocked: bool,
) -> Result<WalkRun> {
    if fps == 0 {
        bail!("--fps must be positive");
    }
    let mut gallery = Gallery::new(config);

    gallery.dispatch(InputEvent::Click);
    if unlocked {
        gallery.dispatch(InputEvent::CaptureDenied);
    } else {
        gallery.dispatch(InputEvent::CaptureGranted);
    }
    for intent in intents {
        gallery.dispatch(InputEvent::key_down(intent.key()));
    }

    let frames = (seconds.max(0.0) * fps as f32).round() as u64;
    let dt = 1.0 / fps as f32;
    tracing::debug!(frames, dt, ?intents, "simulating walk");
    let start = gallery.rig().position;
    for _ in 0..frames {
        gallery.advance(dt);
    }

    Ok(WalkRun {
        frames,
        locked: gallery.rig().capture.is_locked(),
        start,
        end: gallery.rig().position,
        hint: gallery.hint(),
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let paintings = load_paintings(cli.paintings.as_deref())?;
    tracing::info!(paintings = paintings.len(), seed = cli.seed, "gallery-cli starting");

    match cli.command {
        Commands::Info => {
            let scene = build_gallery(&paintings, cli.seed);
            let s = scene.summary();
            let b = GalleryBounds::GALLERY;
            println!("gallery-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("walk: {WALK_SPEED} m/s, sprint: {SPRINT_SPEED} m/s, frame cap: {MAX_FRAME_DT} s");
            println!(
                "bounds: x [{}, {}], z [{}, {}]",
                b.min_x, b.max_x, b.min_z, b.max_z
            );
            println!(
                "scene: {} meshes, {} lights, {} particle field, {} materials, {} paintings",
                s.meshes, s.lights, s.particles, s.materials, s.paintings
            );
        }
        Commands::Layout => {
            let scene = build_gallery(&paintings, cli.seed);
            print!(
                "{}",
                DebugTextRenderer::new().render(&scene, &RenderView::default())
            );
        }
        Commands::Paintings => {
            let scene = build_gallery(&paintings, cli.seed);
            println!(
                "{:<3} {:<24} {:<6} {:>8} {:>8} {:>6}  {:<8} canvas",
                "#", "title", "wall", "x", "z", "ry", "accent"
            );
            for (i, (placed, desc)) in scene.paintings().iter().zip(&paintings).enumerate() {
                let p = placed.placement.position;
                let wall = if p.x < 0.0 { "left" } else { "right" };
                let canvas = desc
                    .image
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "placeholder".into());
                println!(
                    "{:<3} {:<24} {:<6} {:>8.2} {:>8.2} {:>6.0}  {:<8} {canvas}",
                    i + 1,
                    placed.title,
                    wall,
                    p.x,
                    p.z,
                    placed.placement.ry.to_degrees(),
                    placed.accent.to_string(),
                );
            }
        }
        Commands::Walk {
            keys,
            seconds,
            fps,
            unlocked,
        } => {
            let intents = parse_keys(&keys)?;
            let run = simulate_walk(
                GalleryConfig {
                    paintings,
                    particle_seed: cli.seed,
                    ..GalleryConfig::default()
                },
                &intents,
                seconds,
                fps,
                unlocked,
            )?;
            let (start, end) = (run.start, run.end);
            println!(
                "keys: {keys} ({} frames at {fps} fps, locked: {})",
                run.frames, run.locked
            );
            println!("start: ({:.3}, {:.3}, {:.3})", start.x, start.y, start.z);
            println!("end:   ({:.3}, {:.3}, {:.3})", end.x, end.y, end.z);
            println!("walked: {:.3} m", start.distance(end));
            println!("hint: {}", run.hint);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_parse_from_comma_list() {
        let keys = parse_keys("w, d,SHIFT").unwrap();
        assert_eq!(keys, vec![Intent::Forward, Intent::Right, Intent::Sprint]);
        assert!(parse_keys("").unwrap().is_empty());
        assert!(parse_keys("w,jump").is_err());
    }

    #[test]
    fn no_manifest_means_default_paintings() {
        let p = load_paintings(None).unwrap();
        assert_eq!(p.len(), 6);
        assert_eq!(p[0].title, "Painting 01");
    }

    #[test]
    fn walk_runs_locked_at_fixed_rate() {
        let run = simulate_walk(GalleryConfig::default(), &[Intent::Back], 1.0, 60, false).unwrap();
        assert_eq!(run.frames, 60);
        assert!(run.locked);
        assert!(!run.hint.starts_with("Click"));
        // S passes a positive forward distance; the rig starts looking down -Z
        assert!((run.start.z - run.end.z - 4.2).abs() < 1e-3);
    }

    #[test]
    fn unlocked_walk_stays_put() {
        let run = simulate_walk(
            GalleryConfig::default(),
            &[Intent::Forward, Intent::Sprint],
            2.0,
            30,
            true,
        )
        .unwrap();
        assert!(!run.locked);
        assert_eq!(run.start, run.end);
        assert!(run.hint.starts_with("Click to enter"));
    }

    #[test]
    fn zero_fps_is_rejected() {
        assert!(simulate_walk(GalleryConfig::default(), &[], 1.0, 0, false).is_err());
    }

    #[test]
    fn cli_parses_walk_flags() {
        let cli = Cli::parse_from([
            "gallery-cli",
            "--seed",
            "7",
            "walk",
            "--keys",
            "w,shift",
            "--unlocked",
        ]);
        assert_eq!(cli.seed, 7);
        assert!(matches!(
            cli.command,
            Commands::Walk { unlocked: true, fps: 60, .. }
        ));
    }
}
