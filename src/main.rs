//! Roto Bounce entry point
//!
//! Runs the simulation headless and prints the final state as JSON.
//!
//! Usage: `roto-bounce [preset|settings.json] [ticks] [pointer_x]`

use roto_bounce::sim::{SimState, TickInput, tick};
use roto_bounce::{Preset, SimError, Settings};

fn load_settings(arg: Option<&str>) -> Result<Settings, SimError> {
    match arg {
        None => Ok(Settings::default()),
        Some(name) => match Preset::from_str(name) {
            Some(preset) => {
                log::info!("Using {} preset", preset.as_str());
                Ok(Settings::from_preset(preset))
            }
            None => Settings::load(name),
        },
    }
}

fn run(args: &[String]) -> Result<(), SimError> {
    let mut settings = load_settings(args.get(1).map(String::as_str))?;
    if let Some(ticks) = args.get(2).and_then(|s| s.parse().ok()) {
        settings.ticks = ticks;
    }
    let spin_input = args
        .get(3)
        .and_then(|s| s.parse::<f64>().ok())
        .map(|x| settings.spin_input_from_pointer(x));

    let mut state = SimState::from_settings(&settings)?;
    let input = TickInput { spin_input };

    let mut bounces = 0usize;
    let mut corners = 0usize;
    while state.time_ticks < settings.ticks {
        let report = tick(&mut state, &input, settings.dt)?;
        bounces += report.bounces.len();
        corners += report.bounces.iter().filter(|b| b.corner).count();
    }

    log::info!(
        "Ran {} ticks: {} bounce(s) ({} corner), {} active ball(s), angle {:.1}°",
        state.time_ticks,
        bounces,
        corners,
        state.active_bodies().count(),
        state.frame.angle().to_degrees()
    );

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::warn!("Could not serialize snapshot: {}", e),
    }
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Roto Bounce (headless) starting...");

    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        eprintln!("roto-bounce: {}", e);
        std::process::exit(1);
    }
}
