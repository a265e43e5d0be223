//! Influence Map Simulation
//!
//! Drives an influence map through a chase scenario: a target wanders the
//! graph, a fixed observer sees it within a radius, and the engine tracks or
//! predicts its position. One JSON snapshot is printed per frame.
//!
//! Examples:
//!   cargo run -p influence-core -- --frames 600
//!   cargo run -p influence-core -- --graph level.json --config tuning.toml

use clap::Parser;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use influence_core::{InfluenceConfig, InfluenceMap, InfluenceType, Spread};
use nav_graph::{AdjacencyGraph, NavGraph, Vec2, VertexId};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "influence_sim")]
#[command(about = "Chase scenario driving a spatial influence map")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 300)]
    frames: u64,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 30.0)]
    dt: f32,

    /// Grid width when no graph file is given
    #[arg(long, default_value_t = 24)]
    width: usize,

    /// Grid height when no graph file is given
    #[arg(long, default_value_t = 16)]
    height: usize,

    /// Navigation graph as JSON
    #[arg(long)]
    graph: Option<PathBuf>,

    /// Engine configuration as TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Distance within which the observer sees the target
    #[arg(long, default_value_t = 5.0)]
    sight_radius: f32,

    /// Frames between target steps
    #[arg(long, default_value_t = 10)]
    step_interval: u64,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => InfluenceConfig::from_file(path)?,
        None => InfluenceConfig::default(),
    };
    let graph = match &args.graph {
        Some(path) => AdjacencyGraph::from_file(path)?,
        None => AdjacencyGraph::grid(args.width, args.height, 1.0),
    };

    eprintln!("Influence Map Simulation");
    eprintln!("========================");
    eprintln!("Seed: {}", args.seed);
    eprintln!("Frames: {}", args.frames);
    eprintln!("Vertices: {}", graph.vertex_count());
    eprintln!();

    run(&args, &graph, config)
}

fn run(args: &Args, graph: &AdjacencyGraph, config: InfluenceConfig) -> Result<(), Box<dyn Error>> {
    let mut rng = SmallRng::seed_from_u64(args.seed);
    let mut map = InfluenceMap::with_config(graph, config)?;

    let vertices: Vec<VertexId> = graph.vertex_ids().collect();
    if vertices.is_empty() {
        return Err("navigation graph has no vertices".into());
    }

    // Observer sits at the graph's centroid
    let observer = vertices
        .iter()
        .filter_map(|v| graph.position(*v))
        .fold(Vec2::ZERO, |acc, p| acc + p)
        / vertices.len() as f32;
    let observer_layer = map.register_type("Observer", false);

    // A few static hazards for the AI to avoid
    let threat = map.register_type("Threat", true);
    for _ in 0..3 {
        let vertex = vertices[rng.gen_range(0..vertices.len())];
        if let Some(pos) = graph.position(vertex) {
            map.add_static_influence(pos, threat, 1.0, Spread::flood(4))?;
        }
    }

    let mut target = vertices[rng.gen_range(0..vertices.len())];
    let mut heading = Vec2::ZERO;
    let mut visible = false;

    for frame in 0..args.frames {
        if frame > 0 && frame % args.step_interval.max(1) == 0 {
            let neighbors = graph.neighbors(target);
            if !neighbors.is_empty() {
                let next = neighbors[rng.gen_range(0..neighbors.len())];
                if let (Some(from), Some(to)) = (graph.position(target), graph.position(next)) {
                    heading = to - from;
                }
                target = next;
            }
        }

        let target_pos = graph.position(target).unwrap_or(Vec2::ZERO);
        let in_view = target_pos.distance(observer) <= args.sight_radius;
        if in_view {
            map.on_have_sight(target_pos)?;
        } else if visible {
            map.on_lose_sight(target_pos, heading)?;
        }
        visible = in_view;

        map.clear_influence(observer_layer)?;
        map.add_dynamic_influence(observer, observer_layer, 1.0)?;
        map.update(args.dt)?;

        let snapshot = map.snapshot()?;
        println!("{}", snapshot.to_json()?);
    }

    match map.predicted_position()? {
        Some(guess) => eprintln!("Final search estimate: ({:.2}, {:.2})", guess.x, guess.y),
        None => eprintln!("Target position known"),
    }
    if let Ok(hottest) = map.highest_influence(InfluenceType::Player) {
        eprintln!("Strongest player influence at {}", hottest);
    }
    Ok(())
}
