//! Neon Drift headless runner
//!
//! The playable build is the wasm library driven by the page script. The
//! native binary runs the core on autopilot and logs what happens, which is
//! handy for balancing: set `NEON_DRIFT_TUNING` to a JSON file to try
//! different numbers and `RUST_LOG=debug` to see every spawn and pass.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::rc::Rc;

    use neon_drift::{EventBus, GamePhase, NeonDrift, Services, Tuning};

    env_logger::init();
    log::info!("Neon Drift (native) starting...");

    let tuning = match std::env::var("NEON_DRIFT_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Failed to load tuning from {}: {}", path, e);
                Tuning::default()
            }
        },
        Err(_) => Tuning::default(),
    };

    const FRAME_DT: f32 = 1.0 / 60.0;
    const RUNS: u32 = 3;
    const MAX_RUN_SECONDS: f32 = 120.0;

    let bus = Rc::new(EventBus::new());
    bus.subscribe_state(|phase| log::info!("state -> {}", phase.as_str()));
    bus.subscribe_stats(|stats| {
        log::debug!(
            "score {} combo {} gates {} best {} near {}",
            stats.score,
            stats.combo,
            stats.gates,
            stats.best,
            stats.near_misses
        );
    });

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    log::info!("Seed: {}", seed);

    let mut game = NeonDrift::new(bus, Services::headless(), tuning, seed);
    game.set_autopilot(true);

    for run in 1..=RUNS {
        game.restart();
        let mut elapsed = 0.0;
        while game.phase() == GamePhase::Running && elapsed < MAX_RUN_SECONDS {
            game.update(FRAME_DT);
            elapsed += FRAME_DT;
        }
        let stats = game.stats();
        println!(
            "run {}: score {} gates {} near misses {} ({:.1}s)",
            run, stats.score, stats.gates, stats.near_misses, elapsed
        );
    }

    println!("best {}", game.best());
    game.destroy();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}
