//! Headless Skirmish Runner
//!
//! Pits the enemy AI against a static player base and prints a match summary.

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use skirmish::ai::AiState;
use skirmish::core::types::{Faction, Vec3};
use skirmish::economy::{ResourceAccess, ResourceKind};
use skirmish::simulation::SimEvent;
use skirmish::world::{ActorKind, BuildingKind, KindFilter, UnitKind};
use skirmish::{Result, Simulation, SimulationConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

/// Headless Skirmish Runner - enemy AI against a static defender
#[derive(Parser, Debug)]
#[command(name = "skirmish_runner")]
#[command(about = "Run the enemy AI against a static player base and print a summary")]
struct Args {
    /// Simulated seconds before the match is called
    #[arg(long, default_value_t = 900.0)]
    seconds: f32,

    /// Seconds per simulation frame
    #[arg(long, default_value_t = 0.1)]
    dt: f32,

    /// Seed for the AI's randomness (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with balancing overrides
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

#[derive(Serialize)]
struct FactionSummary {
    faction: Faction,
    workers: usize,
    military: usize,
    structures: usize,
    wood: i64,
    stone: i64,
    iron: i64,
    food: i64,
}

#[derive(Serialize)]
struct MatchSummary {
    match_id: Uuid,
    seed: u64,
    simulated_seconds: f32,
    winner: Option<Faction>,
    ai_state: Option<AiState>,
    units_trained: usize,
    buildings_placed: usize,
    actors_destroyed: usize,
    damage_dealt: i64,
    factions: Vec<FactionSummary>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skirmish=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.ai.seed = seed;
    }
    config.validate()?;
    if args.dt <= 0.0 {
        return Err(skirmish::SimError::InvalidAction(format!(
            "--dt must be positive, got {}",
            args.dt
        )));
    }
    let seed = config.ai.seed;

    let mut sim = Simulation::new(config);
    setup_enemy_base(&mut sim);
    setup_player_defense(&mut sim);
    sim.enable_ai(Faction::Enemy);

    let match_id = Uuid::new_v4();
    tracing::info!("Match {} started (seed {})", match_id, seed);

    let mut units_trained = 0;
    let mut buildings_placed = 0;
    let mut actors_destroyed = 0;
    let mut damage_dealt = 0i64;

    while sim.elapsed() < args.seconds && !sim.outcome().is_over() {
        sim.tick(args.dt);
        // Orders would go to pathfinding; the runner has none
        sim.drain_orders();
        for event in sim.drain_events() {
            match event {
                SimEvent::UnitTrained { .. } => units_trained += 1,
                SimEvent::BuildingPlaced { .. } => buildings_placed += 1,
                SimEvent::ActorDestroyed { .. } => actors_destroyed += 1,
                SimEvent::Damage { amount, .. } => damage_dealt += i64::from(amount),
                _ => {}
            }
        }
    }

    let summary = MatchSummary {
        match_id,
        seed,
        simulated_seconds: sim.elapsed(),
        winner: sim.outcome().winner(),
        ai_state: sim.ai_state(Faction::Enemy),
        units_trained,
        buildings_placed,
        actors_destroyed,
        damage_dealt,
        factions: [Faction::Enemy, Faction::Player]
            .into_iter()
            .map(|f| faction_summary(&sim, f))
            .collect(),
    };

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        Format::Text => print_text(&summary),
    }
    Ok(())
}

/// Castle, workers and nearby resource nodes; the AI builds the rest
fn setup_enemy_base(sim: &mut Simulation) {
    sim.spawn(
        ActorKind::Building(BuildingKind::Castle),
        Faction::Enemy,
        Vec3::ZERO,
        0.0,
    );
    for i in 0..3 {
        sim.spawn(
            ActorKind::Unit(UnitKind::Worker),
            Faction::Enemy,
            Vec3::new(-4.0 + i as f32 * 4.0, 0.0, 5.0),
            0.0,
        );
    }

    let nodes = [
        (ResourceKind::Wood, Vec3::new(-35.0, 0.0, -10.0)),
        (ResourceKind::Wood, Vec3::new(-30.0, 0.0, 15.0)),
        (ResourceKind::Stone, Vec3::new(35.0, 0.0, -5.0)),
        (ResourceKind::Iron, Vec3::new(30.0, 0.0, -25.0)),
        (ResourceKind::Food, Vec3::new(0.0, 0.0, -35.0)),
    ];
    for (resource, position) in nodes {
        sim.world_mut().add_resource_node(resource, position);
    }

    sim.ledger_mut(Faction::Enemy).credit_all(600);
}

/// A fortified player castle that never acts on its own
fn setup_player_defense(sim: &mut Simulation) {
    let front = Vec3::new(0.0, 0.0, 150.0);
    // Face the enemy base
    let yaw = std::f32::consts::PI;

    sim.spawn(ActorKind::Building(BuildingKind::Castle), Faction::Player, front, yaw);
    for x in [-12.0, 12.0] {
        sim.spawn(
            ActorKind::Building(BuildingKind::Tower),
            Faction::Player,
            front + Vec3::new(x, 0.0, -10.0),
            yaw,
        );
    }
    for i in 0..4 {
        sim.spawn(
            ActorKind::Unit(UnitKind::Infantry),
            Faction::Player,
            front + Vec3::new(-6.0 + i as f32 * 4.0, 0.0, -15.0),
            yaw,
        );
    }
    for i in 0..2 {
        sim.spawn(
            ActorKind::Unit(UnitKind::Archer),
            Faction::Player,
            front + Vec3::new(-3.0 + i as f32 * 6.0, 0.0, -5.0),
            yaw,
        );
    }
}

fn faction_summary(sim: &Simulation, faction: Faction) -> FactionSummary {
    let world = sim.world();
    let ledger = sim.ledger(faction);
    FactionSummary {
        faction,
        workers: world.count_units(faction, UnitKind::Worker),
        military: world.count(faction, KindFilter::Military),
        structures: world.count(faction, KindFilter::Structures),
        wood: ledger.get(ResourceKind::Wood),
        stone: ledger.get(ResourceKind::Stone),
        iron: ledger.get(ResourceKind::Iron),
        food: ledger.get(ResourceKind::Food),
    }
}

fn print_text(summary: &MatchSummary) {
    println!("Skirmish Result");
    println!("===============");
    println!("Match: {}", summary.match_id);
    println!("Seed: {}", summary.seed);
    println!("Simulated: {:.1}s", summary.simulated_seconds);
    match summary.winner {
        Some(winner) => println!("Winner: {}", winner.name()),
        None => println!("Winner: none (time limit)"),
    }
    if let Some(state) = summary.ai_state {
        println!("Enemy AI state: {}", state);
    }
    println!(
        "Trained {} units, placed {} buildings, destroyed {} actors, dealt {} damage",
        summary.units_trained,
        summary.buildings_placed,
        summary.actors_destroyed,
        summary.damage_dealt
    );
    println!();
    for f in &summary.factions {
        println!(
            "{:>6}: {} workers, {} military, {} structures | wood {} stone {} iron {} food {}",
            f.faction.name(),
            f.workers,
            f.military,
            f.structures,
            f.wood,
            f.stone,
            f.iron,
            f.food
        );
    }
}
