// Hearthwright demo driver: builds one house into an in-memory plot.
//
// Prepares a flat test plot (stone under dirt under grass, with a pond over
// the west half so part of the house stands in water), plans and builds a
// house on it, then prints each floor's plan and the build report.
//
// Usage:
//   cargo run -p hearthwright -- [--seed N] [--width N] [--depth N]
//     [--theme NAME] [--floors N] [--config FILE] [--json] [--list-themes]
//
// Set RUST_LOG=hearthwright=debug to see every window and door as it is
// placed.

use hearthwright::blueprint::ThemeRegistry;
use hearthwright::config::GenConfig;
use hearthwright::error::WorldError;
use hearthwright::house::House;
use hearthwright::prng::BuildRng;
use hearthwright::search::find_ground;
use hearthwright::types::VoxelCoord;
use hearthwright::world::{BUILDING_BLOCKS, VoxelWorld};
use std::error::Error;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

const PLOT: u32 = 48;
const PLOT_HEIGHT: u32 = 48;
const SURFACE: i32 = 10;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    let registry = ThemeRegistry::builtin()?;

    if args.iter().any(|a| a == "--list-themes") {
        for name in registry.theme_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let seed: u64 = parse_flag(&args, "--seed").unwrap_or_else(clock_seed);
    let width: u32 = parse_flag(&args, "--width").unwrap_or(13);
    let depth: u32 = parse_flag(&args, "--depth").unwrap_or(9);
    let theme: String = parse_flag(&args, "--theme").unwrap_or_else(|| "rustic".to_string());
    let mut config = match parse_flag::<String>(&args, "--config") {
        Some(path) => GenConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => GenConfig::default(),
    };
    if let Some(floors) = parse_flag(&args, "--floors") {
        config.max_floors = floors;
    }

    println!("=== Hearthwright ===");
    println!("Seed: {seed}");
    println!("Footprint: {width}x{depth}, theme {theme}");
    println!();

    let mut rng = BuildRng::new(seed);
    let mut world = prepare_plot()?;

    println!("[1/2] Planning...");
    let mut house = House::plan(width, depth, &theme, &registry, config.clone(), &mut rng)?;
    for floor in house.floors() {
        println!("  Floor {} ({:?}):", floor.level, floor.stage);
        for line in floor.grid().to_string().lines() {
            println!("    {line}");
        }
    }

    println!("[2/2] Building...");
    // Ground level is taken from the dry far corner; the ground floor sits
    // in the surface layer, so its west side stands in the pond.
    let corner = (PLOT as i32 - width as i32) / 2;
    let far_x = corner + width as i32 - 1;
    let ground = find_ground(&world, &config.blocks, far_x, corner, PLOT_HEIGHT as i32 - 1, 0)?
        .unwrap_or(SURFACE);
    let origin = VoxelCoord::new(corner, ground, corner);
    let report = house.build(&mut world, origin, &mut rng)?;

    if args.iter().any(|a| a == "--json") {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!("  Floors:   {}", report.floors);
    println!("  Blocks:   {} placed, {} rejected", report.blocks_placed, report.blocks_rejected);
    println!("  Windows:  {}", report.windows);
    println!("  Doors:    {}", report.doors);
    println!("  Shutters: {}", report.shutters);
    println!("  Studs:    {}", report.studs);
    if !report.events.is_empty() {
        println!("  Skipped:");
        for event in &report.events {
            println!("    {event}");
        }
    }
    Ok(())
}

/// Stone to y = 7, dirt to the surface, grass on top, and a pond two
/// blocks deep covering the west half.
fn prepare_plot() -> Result<VoxelWorld, WorldError> {
    let mut world = VoxelWorld::new(VoxelCoord::new(0, 0, 0), PLOT, PLOT_HEIGHT, PLOT)
        .with_known_blocks(BUILDING_BLOCKS);
    let far = PLOT as i32 - 1;
    let pond_edge = PLOT as i32 / 2 - 2;
    world.fill(VoxelCoord::new(0, 0, 0), VoxelCoord::new(far, 7, far), "stone")?;
    world.fill(VoxelCoord::new(0, 8, 0), VoxelCoord::new(far, SURFACE - 1, far), "dirt")?;
    world.fill(
        VoxelCoord::new(0, SURFACE, 0),
        VoxelCoord::new(far, SURFACE, far),
        "grass_block",
    )?;
    world.fill(
        VoxelCoord::new(0, SURFACE - 1, 0),
        VoxelCoord::new(pond_edge, SURFACE, far),
        "water",
    )?;
    Ok(world)
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
