//! Headless geode host.
//!
//! Loads `config.ron`, applies CLI overrides, generates the area around the
//! spawn point and walks the player around for `simulation.max_ticks` ticks
//! (forever when zero). Mesh traffic goes over a channel to a renderer
//! thread that logs it instead of drawing.
//!
//! Run with `cargo run -p geode-app -- --seed 7 --ticks 400`.

use std::process::ExitCode;

use clap::Parser;
use geode_app::{AppError, GameLoop, Session, TickInput, spawn_renderer};
use geode_config::{CliArgs, Config, default_config_dir};
use geode_mesh::ChannelSink;
use glam::Vec3;
use tracing::{error, info};

/// Ticks spent walking in one direction before turning.
const LEG_TICKS: u64 = 200;

/// Ticks between jumps.
const JUMP_TICKS: u64 = 50;

/// Walk impulse per tick.
const WALK_IMPULSE: f32 = 0.05;

/// Walk a square, jumping now and then.
fn scripted_input(tick: u64) -> TickInput {
    let direction = match (tick / LEG_TICKS) % 4 {
        0 => Vec3::X,
        1 => Vec3::Z,
        2 => Vec3::NEG_X,
        _ => Vec3::NEG_Z,
    };
    TickInput {
        step: Some(direction * WALK_IMPULSE),
        jump: tick % JUMP_TICKS == JUMP_TICKS - 1,
    }
}

struct Host {
    session: Session,
    sink: ChannelSink,
    max_ticks: u64,
    ticks: u64,
    failure: Option<AppError>,
}

impl Host {
    fn done(&self) -> bool {
        self.failure.is_some() || (self.max_ticks > 0 && self.ticks >= self.max_ticks)
    }

    fn update(&mut self) {
        if self.done() {
            return;
        }
        match self.session.tick(&scripted_input(self.ticks)) {
            Ok(_) => self.ticks += 1,
            Err(e) => self.failure = Some(e),
        }
    }

    fn render(&mut self) {
        self.session.upload(&mut self.sink);
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Warning: failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    geode_log::init_logging(
        Some(&config_dir.join("logs")),
        cfg!(debug_assertions),
        Some(&config),
    );
    info!(
        seed = config.world.seed,
        tick_rate = config.simulation.tick_rate_hz,
        max_ticks = config.simulation.max_ticks,
        "Starting geode"
    );

    let session = match Session::new(&config) {
        Ok(session) => session,
        Err(e) => {
            error!("failed to start session: {e}");
            return ExitCode::FAILURE;
        }
    };

    let (sink, receiver) = ChannelSink::new();
    let renderer = match spawn_renderer(receiver) {
        Ok(handle) => handle,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut host = Host {
        session,
        sink,
        max_ticks: config.simulation.max_ticks,
        ticks: 0,
        failure: None,
    };
    let mut game_loop = GameLoop::new(config.simulation.tick_rate_hz);
    while !host.done() {
        game_loop.tick(&mut host, |host, _, _| host.update(), |host, _| host.render());
        std::thread::sleep(game_loop.time_until_next_tick());
    }

    let Host {
        session,
        sink,
        ticks,
        failure,
        ..
    } = host;
    drop(sink);
    let sink = match renderer.join() {
        Ok(sink) => sink,
        Err(_) => {
            error!("{}", AppError::RendererPanicked);
            return ExitCode::FAILURE;
        }
    };
    if let Some(player) = session.player() {
        info!(position = %player.position, "player final position");
    }
    info!(
        ticks,
        chunks = session.world().chunk_count(),
        meshes_created = sink.created(),
        meshes_deleted = sink.deleted(),
        triangles = sink.triangles(),
        "run finished"
    );

    let result = match failure {
        Some(e) => Err(e),
        None => session.shutdown(),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("session failed: {e}");
            ExitCode::FAILURE
        }
    }
}
