//! Slope Sim headless runner
//!
//! Loads (or generates) a level and runs a scripted descent through it with
//! the fixed-timestep loop, logging what the actors do.
//!
//! Usage: `slope-sim [level.json] [tuning.json]`

use glam::Vec3;

use slope_sim::audio::LogSoundPlayer;
use slope_sim::consts::*;
use slope_sim::level::{ItemData, LevelData, build_level, load_level};
use slope_sim::sim::{CourseConfig, Environment, ObserverState, Terrain, tick};
use slope_sim::terrain::HeightGrid;
use slope_sim::{LevelError, Tuning};

/// Wall-clock frame length the runner pretends to render at
const FRAME_DT: f32 = 1.0 / 30.0;
/// Observer downhill speed (units/s)
const DESCENT_SPEED: f32 = 14.0;
const TERRAIN_SEED: u64 = 0x5EED;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let level_path = args.next();
    let tuning = match args.next() {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };

    let course = CourseConfig {
        width: 60.0,
        play_width: 50.0,
        length: 400.0,
        fields_x: 31,
        fields_z: 101,
    };
    let terrain = HeightGrid::generate(TERRAIN_SEED, &course, 0.15, 0.4);

    let mut level = match level_path {
        Some(path) => load_level(&path, &terrain, &course, &tuning)?,
        None => demo_level(&terrain, &course, &tuning)?,
    };

    let env = Environment::new(&terrain, &course, &tuning);
    let mut sound = LogSoundPlayer::new();

    let start = Vec3::new(course.width / 2.0, 0.0, -1.0);
    let mut observer = ObserverState {
        position: Vec3::new(start.x, terrain.height_at(start.x, start.z), start.z),
        velocity: Vec3::new(0.0, 0.0, -DESCENT_SPEED),
        airborne: false,
    };

    let mut accumulator = 0.0;
    let mut time = 0.0;
    let mut ticks = 0u64;
    let mut obstacle_hits = 0usize;
    let mut projectile_hits = 0usize;
    let mut throws = 0usize;

    while observer.position.z > -course.length + 1.0 {
        accumulator += FRAME_DT;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let previous = observer.position;
            scripted_observer(&mut observer, &terrain, &course, time, SIM_DT);

            let report = tick(&mut level, &env, &mut observer, previous, SIM_DT, &mut sound);
            obstacle_hits += report.obstacle_hits().len();
            projectile_hits += report.observer_hits();
            throws += report.throws();

            accumulator -= SIM_DT;
            time += SIM_DT;
            ticks += 1;
            substeps += 1;
        }
    }

    log::info!(
        "Descent finished after {ticks} ticks ({time:.1}s): {throws} throws, {projectile_hits} projectile hits, {obstacle_hits} obstacle hits"
    );
    Ok(())
}

/// Weave down the course, jumping every few seconds
fn scripted_observer(
    observer: &mut ObserverState,
    terrain: &dyn Terrain,
    course: &CourseConfig,
    time: f32,
    dt: f32,
) {
    // Recover from knockback toward cruising speed
    let target = Vec3::new((time * 0.7).cos() * 6.0, 0.0, -DESCENT_SPEED);
    observer.velocity = observer.velocity.lerp(target, (dt * 2.0).min(1.0));

    let mut position = observer.position + observer.velocity * dt;
    position.x = course.clamp_x(position.x).0;
    observer.airborne = (time % 5.0) > 4.4;
    let ground = terrain.height_at(position.x, position.z);
    position.y = if observer.airborne { ground + 1.0 } else { ground };
    observer.position = position;
}

/// A short course exercising every actor type
fn demo_level(
    terrain: &dyn Terrain,
    course: &CourseConfig,
    tuning: &Tuning,
) -> Result<slope_sim::sim::Level, LevelError> {
    let item = |type_name: &str, x: f32, z: f32, height: f32, diameter: f32| ItemData {
        type_name: type_name.to_string(),
        x,
        z,
        height,
        diameter,
        ..Default::default()
    };

    let mut items = vec![
        item("START", 16.0, 100.0, 1.0, 8.0),
        item("TREE", 10.0, 90.0, 4.0, 2.0),
        item("TREE", 20.0, 85.0, 4.0, 2.0),
        item("SHRUB", 14.0, 70.0, 1.0, 1.5),
        item("HERRING", 16.0, 60.0, 0.5, 1.0),
        item("TREE_BARREN", 12.0, 40.0, 3.5, 1.5),
        item("FINISH", 16.0, 2.0, 1.0, 8.0),
    ];
    items.push(ItemData {
        movement_pattern: Some("patrolling".to_string()),
        speed: Some(4.0),
        patrol_end_x: Some(8.0),
        patrol_end_z: Some(80.0),
        ..item("ENEMY_PENGUIN", 24.0, 80.0, 1.2, 1.0)
    });
    items.push(ItemData {
        radius: Some(4.0),
        angular_speed: Some(0.8),
        ..item("ENEMY_SNOWMAN", 16.0, 55.0, 2.2, 1.6)
    });
    items.push(ItemData {
        movement_pattern: Some("following".to_string()),
        speed: Some(9.0),
        detection_radius: Some(18.0),
        ..item("ENEMY_YETI", 18.0, 30.0, 2.8, 2.2)
    });

    build_level(&LevelData { items }, terrain, course, tuning)
}
