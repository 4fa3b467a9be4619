//! Rampart - command line front end
//!
//! Loads a wall catalog and either plans a single span or drags out a
//! whole chain of poles, reporting what would be spawned and why any span
//! was refused.
//!
//! Usage:
//!   rampart --catalog data/walls.toml plan --wall palisade --from 0,0,0 --to 0,0,9.2
//!   rampart chain --wall stone_wall --pole 0,0,0 --pole 12,0,0 --pole 12,0,12 --stock stone=40

use clap::{Parser, Subcommand};
use glam::{Vec2, Vec3};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use rampart::core::config::PlacementConfig;
use rampart::core::error::{RampartError, Result};
use rampart::economy::{ResourceKind, ResourceQuery, Stockpile, Unlimited};
use rampart::walls::{
    PlacementContext, PlacementOutcome, PlacementSession, SegmentPlan, SpawnLog, WallCatalog,
    WallSegmentPlanner,
};
use rampart::world::{BuildingFootprints, FogMap, Footprint, NoObstacles, ObstacleQuery};

#[derive(Parser, Debug)]
#[command(name = "rampart")]
#[command(about = "Plan and validate pole-to-pole wall placements")]
struct Args {
    /// Wall catalog (TOML)
    #[arg(long, default_value = "data/walls.toml")]
    catalog: PathBuf,

    /// Placement tolerances (TOML); defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the wall types in the catalog
    List,

    /// Split one span into wall units
    Plan {
        #[arg(long)]
        wall: String,
        /// Start pole as x,y,z
        #[arg(long, value_parser = parse_point)]
        from: Vec3,
        /// End pole as x,y,z
        #[arg(long, value_parser = parse_point)]
        to: Vec3,
    },

    /// Place a chain of poles, one span per pole after the first
    Chain {
        #[arg(long)]
        wall: String,
        /// Pole as x,y,z (repeat for each pole)
        #[arg(long = "pole", value_parser = parse_point, required = true)]
        poles: Vec<Vec3>,
        /// Starting resources as kind=amount; unlimited when omitted
        #[arg(long = "stock", value_parser = parse_stock)]
        stock: Vec<StockArg>,
        /// Building footprint as x,z,width,depth
        #[arg(long = "building", value_parser = parse_building)]
        buildings: Vec<BuildingArg>,
        /// Revealed circle as x,z,radius; no fog of war when omitted
        #[arg(long = "reveal", value_parser = parse_reveal)]
        reveals: Vec<RevealArg>,
    },
}

#[derive(Debug, Clone, Copy)]
struct StockArg {
    kind: ResourceKind,
    amount: u32,
}

#[derive(Debug, Clone, Copy)]
struct BuildingArg {
    center: Vec3,
    size: Vec2,
}

#[derive(Debug, Clone, Copy)]
struct RevealArg {
    center: Vec3,
    radius: f32,
}

fn parse_floats(s: &str, expected: usize) -> std::result::Result<Vec<f32>, String> {
    let values: Vec<f32> = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("'{}': {}", p, e)))
        .collect::<std::result::Result<_, _>>()?;
    if values.len() != expected {
        return Err(format!("expected {} comma-separated numbers, got '{}'", expected, s));
    }
    Ok(values)
}

fn parse_point(s: &str) -> std::result::Result<Vec3, String> {
    let v = parse_floats(s, 3)?;
    Ok(Vec3::new(v[0], v[1], v[2]))
}

fn parse_building(s: &str) -> std::result::Result<BuildingArg, String> {
    let v = parse_floats(s, 4)?;
    Ok(BuildingArg {
        center: Vec3::new(v[0], 0.0, v[1]),
        size: Vec2::new(v[2], v[3]),
    })
}

fn parse_reveal(s: &str) -> std::result::Result<RevealArg, String> {
    let v = parse_floats(s, 3)?;
    Ok(RevealArg {
        center: Vec3::new(v[0], 0.0, v[1]),
        radius: v[2],
    })
}

fn parse_stock(s: &str) -> std::result::Result<StockArg, String> {
    let (kind, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected kind=amount, got '{}'", s))?;
    Ok(StockArg {
        kind: kind.trim().parse()?,
        amount: amount
            .trim()
            .parse()
            .map_err(|e| format!("'{}': {}", amount, e))?,
    })
}

/// What happened to one span of a chain
#[derive(Serialize)]
struct ChainStep {
    from: Vec3,
    to: Vec3,
    outcome: Option<PlacementOutcome>,
    rejected: Vec<String>,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rampart=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PlacementConfig::load(path)?,
        None => PlacementConfig::default(),
    };
    let catalog = WallCatalog::load_file(&args.catalog)?;

    match args.command {
        Command::List => {
            for spec in catalog.iter() {
                println!(
                    "{:<16} {:<24} unit {:.2} ({:?} axis, min scale {:.2}) cost {}",
                    spec.id,
                    spec.name,
                    spec.unit_length,
                    spec.length_axis,
                    spec.min_scale_factor,
                    spec.cost_per_unit
                );
            }
        }
        Command::Plan { wall, from, to } => {
            let spec = catalog.get(&wall)?;
            let plan = WallSegmentPlanner::plan(from, to, spec);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print_plan(&plan);
            }
        }
        Command::Chain {
            wall,
            poles,
            stock,
            buildings,
            reveals,
        } => {
            let spec = catalog.get(&wall)?.clone();
            let steps = run_chain(spec, config, &poles, &stock, &buildings, &reveals)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&steps)?);
            } else {
                for step in &steps {
                    print_step(step);
                }
            }
        }
    }

    Ok(())
}

fn run_chain(
    spec: rampart::walls::WallUnitSpec,
    config: PlacementConfig,
    poles: &[Vec3],
    stock: &[StockArg],
    buildings: &[BuildingArg],
    reveals: &[RevealArg],
) -> Result<Vec<ChainStep>> {
    let mut footprints = BuildingFootprints::new(config.obstacle_radius);
    for (i, b) in buildings.iter().enumerate() {
        footprints.add(Footprint::rect(format!("building_{}", i + 1), b.center, b.size));
    }
    let obstacles: &dyn ObstacleQuery = if footprints.is_empty() {
        &NoObstacles
    } else {
        &footprints
    };

    let mut fog = FogMap::new();
    for r in reveals {
        fog.reveal_radius(r.center, r.radius);
    }

    let mut unlimited = Unlimited;
    let mut stockpile = Stockpile::new();
    for s in stock {
        stockpile.deposit(s.kind, s.amount);
    }
    let resources: &mut dyn ResourceQuery = if stock.is_empty() {
        &mut unlimited
    } else {
        &mut stockpile
    };

    let mut ctx = PlacementContext::new(obstacles, resources);
    if !reveals.is_empty() {
        ctx = ctx.with_visibility(&fog);
    }

    let mut session = PlacementSession::new(spec, config);
    let mut spawner = SpawnLog::new();
    let mut steps = Vec::new();

    let (first, rest) = poles.split_first().ok_or(RampartError::NoActivePole)?;
    let mut from = session.begin(*first);

    for &to in rest {
        if !session.is_active() {
            // The previous span closed a loop; start over from this pole
            from = session.begin(to);
            continue;
        }
        match session.place(to, &mut ctx, &mut spawner) {
            Ok(outcome) => {
                let next = outcome.end;
                steps.push(ChainStep {
                    from,
                    to: next,
                    outcome: Some(outcome),
                    rejected: Vec::new(),
                });
                from = next;
            }
            Err(RampartError::Rejected(report)) => {
                steps.push(ChainStep {
                    from,
                    to,
                    outcome: None,
                    rejected: report.reasons.iter().map(|r| r.to_string()).collect(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    Ok(steps)
}

fn print_plan(plan: &SegmentPlan) {
    println!(
        "Span {:.2} -> {} segments covering {:.2} (shortfall {:.2})",
        plan.total_distance,
        plan.len(),
        plan.covered_length(),
        plan.shortfall()
    );
    for (i, seg) in plan.segments.iter().enumerate() {
        println!(
            "  #{:<3} center [{:7.2}, {:7.2}, {:7.2}] length {:5.2} scale [{:.2}, {:.2}, {:.2}]",
            i + 1,
            seg.center.x,
            seg.center.y,
            seg.center.z,
            seg.length,
            seg.scale.x,
            seg.scale.y,
            seg.scale.z
        );
    }
}

fn print_step(step: &ChainStep) {
    let from = format!("[{:.1}, {:.1}, {:.1}]", step.from.x, step.from.y, step.from.z);
    let to = format!("[{:.1}, {:.1}, {:.1}]", step.to.x, step.to.y, step.to.z);
    match &step.outcome {
        Some(outcome) => println!(
            "{} -> {}: placed {} segments, cost {}{}",
            from,
            to,
            outcome.segments.len(),
            outcome.cost,
            if outcome.closed_loop { " (loop closed)" } else { "" }
        ),
        None => println!("{} -> {}: REJECTED ({})", from, to, step.rejected.join("; ")),
    }
}
