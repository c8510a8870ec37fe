use clap::Parser;
use log::{error, info};
use lumen::{Block, Config, CycleStats, LightWorld, LightingEngine, LogChanges, VanillaPropagator};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use vocs::position::{GlobalColumnPosition, GlobalPosition};

/// Lights a flat test world, then measures lamp toggles and a roof being placed and removed.
#[derive(Debug, Parser)]
#[command(name = "lumen-bench", version)]
struct Args {
	/// TOML file with `[engine]` and `[world]` tables. Defaults are used when absent.
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Width of the square of loaded columns, in columns.
	#[arg(short, long, default_value_t = 2)]
	size: i32,

	/// Number of lamps to place and remove again.
	#[arg(short, long, default_value_t = 16)]
	toggles: usize,

	/// Side length of the roof, in blocks.
	#[arg(short, long, default_value_t = 24)]
	roof: i32
}

type Engine = LightingEngine<LightWorld, VanillaPropagator, LogChanges>;

#[derive(Debug, Default)]
struct Totals {
	cycles: usize,
	darkenings: usize,
	brightenings: usize,
	elapsed: Duration
}

impl Totals {
	fn add(&mut self, stats: &CycleStats) {
		info!("cycle: {}", stats);

		self.cycles += 1;
		self.darkenings += stats.darkenings;
		self.brightenings += stats.brightenings;
		self.elapsed += stats.elapsed;
	}

	fn report(&self, name: &str) {
		println!(
			"{:>8}: {} cycles, {} darkenings, {} brightenings, {:?} total",
			name, self.cycles, self.darkenings, self.brightenings, self.elapsed
		);
	}
}

fn main() {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let args = Args::parse();

	if let Err(e) = run(&args) {
		error!("{}", e);
		process::exit(1);
	}
}

fn run(args: &Args) -> lumen::Result<()> {
	let config = match args.config {
		Some(ref path) => Config::load(path)?,
		None => Config::default()
	};

	let bounds = config.world.bounds();
	let floor = bounds.min_y() + 3;
	let width = args.size.max(1) * 16;

	let mut world = LightWorld::from_config(&config.world);

	for x in 0..args.size.max(1) {
		for z in 0..args.size.max(1) {
			world.load_column(GlobalColumnPosition::new(x, z));
		}
	}

	world.fill(GlobalPosition::new(0, bounds.min_y(), 0), GlobalPosition::new(width - 1, floor, width - 1), Block::OPAQUE);

	info!("lighting {} columns with bounds {}", world.loaded_columns().count(), bounds);

	let mut engine = LightingEngine::new(world, VanillaPropagator::new(config.engine.max_light), LogChanges, &config.engine)?;

	let columns: Vec<_> = engine.storage().loaded_columns().collect();

	for column in columns {
		let positions: Vec<_> = engine.storage().column_positions(column).collect();

		for position in positions {
			engine.schedule_light_init(position);
		}
	}

	let mut load = Totals::default();
	drain(&mut engine, &mut load);
	load.report("load");

	let mut toggles = Totals::default();

	for i in 0..args.toggles as i32 {
		let lamp = GlobalPosition::new((i * 37).rem_euclid(width), floor + 1, (i * 53).rem_euclid(width));

		set_block(&mut engine, lamp, Block::lamp(15), &mut toggles);
		drain(&mut engine, &mut toggles);

		set_block(&mut engine, lamp, Block::AIR, &mut toggles);
		drain(&mut engine, &mut toggles);
	}

	toggles.report("toggles");

	let roof_y = floor + 8;
	let roof = args.roof.clamp(1, width);
	let mut roofing = Totals::default();

	for block in [Block::OPAQUE, Block::AIR] {
		for x in 0..roof {
			for z in 0..roof {
				set_block(&mut engine, GlobalPosition::new(x, roof_y, z), block, &mut roofing);
			}
		}

		drain(&mut engine, &mut roofing);
	}

	roofing.report("roof");

	if engine.has_pending() {
		info!("work at the edges of the loaded area stays deferred");
	}

	Ok(())
}

fn set_block(engine: &mut Engine, position: GlobalPosition, block: Block, totals: &mut Totals) {
	if engine.storage_mut().set_block(position, block) {
		engine.schedule_light_check(position, None);
	}

	if engine.needs_flush() {
		engine.proc_light_updates();
		totals.add(engine.last_cycle());
	}
}

fn drain(engine: &mut Engine, totals: &mut Totals) {
	while engine.has_updates() {
		engine.proc_light_updates();
		totals.add(engine.last_cycle());
	}
}
