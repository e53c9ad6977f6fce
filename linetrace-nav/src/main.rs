//! LinetraceNav - route-following line tracer
//!
//! Runs the navigation controller against the built-in track simulator.
//!
//! ```text
//! linetrace-nav [config.toml] [--route NAME]
//! ```
//!
//! Without a config argument, `linetrace.toml` in the working directory is
//! used if present, otherwise the defaults. `--route` replaces the configured
//! route sequence with a single route.
//!
//! ## Threads
//!
//! - **Simulation thread**: integrates the chassis and feeds the sensor buffer
//! - **Control thread** (tick_ms): runs the route controller
//! - **Main thread**: logs status changes and waits for the run to end

use linetrace_io::ActuatorSink;
use linetrace_io::sim::SimulatedRobot;
use linetrace_nav::threads::spawn_control;
use linetrace_nav::{CancelToken, NavConfig, NavError, Result, RouteController, SharedState, SystemClock};

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("linetrace_nav=info".parse().unwrap()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    let mut config = if args.len() > 1 && !args[1].starts_with("--") {
        let config_path = Path::new(&args[1]);
        info!("Loading configuration from {:?}", config_path);
        NavConfig::load(config_path)?
    } else if Path::new("linetrace.toml").exists() {
        info!("Loading configuration from linetrace.toml");
        NavConfig::load(Path::new("linetrace.toml"))?
    } else {
        info!("Using default configuration");
        NavConfig::default()
    };

    // Override route sequence if requested
    if let Some(route) = args
        .iter()
        .position(|a| a == "--route")
        .and_then(|i| args.get(i + 1))
    {
        if config.route(route).is_none() {
            return Err(NavError::Config(format!(
                "unknown route '{}' (known: {})",
                route,
                config.routes.keys().cloned().collect::<Vec<_>>().join(", ")
            )));
        }
        info!("Driving route '{}' only", route);
        config.route_sequence = vec![route.clone()];
    }

    info!("LinetraceNav v{}", env!("CARGO_PKG_VERSION"));
    for name in &config.route_sequence {
        if let Some(route) = config.route(name) {
            let plan: Vec<String> = route.plan.iter().map(|a| a.to_string()).collect();
            info!("Route '{}' -> '{}': {}", name, route.destination, plan.join(", "));
        }
    }

    let mut robot = SimulatedRobot::start(config.simulation.clone())
        .map_err(|e| NavError::Config(format!("Failed to start simulator: {}", e)))?;

    let cancel = CancelToken::new();
    let shared_state = Arc::new(SharedState::new());

    {
        let cancel = cancel.clone();
        let shared_state = Arc::clone(&shared_state);
        ctrlc::set_handler(move || {
            cancel.cancel();
            shared_state.signal_shutdown();
        })
        .map_err(|e| NavError::Config(format!("Failed to install Ctrl-C handler: {}", e)))?;
    }

    let controller = RouteController::new(
        &config,
        robot.sensors(),
        robot.actuator(),
        SystemClock::new(),
        cancel,
    )?;

    info!("Starting control loop...");
    let handle = spawn_control(controller, Arc::clone(&shared_state), config.tick_period())?;

    // Main thread: log status changes until the control thread exits
    let check_interval = Duration::from_millis(200);
    let mut last_seen = (shared_state.status(), shared_state.position());

    while !handle.is_finished() {
        std::thread::sleep(check_interval);

        let seen = (shared_state.status(), shared_state.position());
        if seen != last_seen {
            let pose = robot.pose();
            info!(
                "{:?}: route {} step {} at ({:.2}, {:.2}, {:.0}°)",
                seen.0,
                seen.1.0,
                seen.1.1,
                pose.x,
                pose.y,
                pose.theta.to_degrees()
            );
            last_seen = seen;
        }
    }

    let result = match handle.join() {
        Ok(result) => result,
        Err(e) => {
            error!("Control thread panicked: {:?}", e);
            Err(NavError::Config("control thread panicked".into()))
        }
    };

    // Motors off before the simulator goes away
    if let Err(e) = robot.actuator().stop() {
        warn!("Final stop failed: {}", e);
    }
    let pose = robot.pose();
    robot.shutdown();

    info!(
        "{} junctions handled, final pose ({:.2}, {:.2}, {:.0}°)",
        shared_state.junction_count(),
        pose.x,
        pose.y,
        pose.theta.to_degrees()
    );

    match result {
        Ok(status) => {
            info!("LinetraceNav finished: {:?}", status);
            Ok(())
        }
        Err(NavError::Cancelled) => {
            info!("LinetraceNav stopped by signal");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
