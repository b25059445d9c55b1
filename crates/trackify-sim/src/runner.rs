//! ---
//! tfy_section: "03-simulation"
//! tfy_subsection: "module"
//! tfy_type: "source"
//! tfy_scope: "code"
//! tfy_description: "Simulation driver and tick loop."
//! tfy_version: "v0.1.0"
//! tfy_owner: "tbd"
//! ---
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};
use trackify_common::time::now_utc;
use trackify_core::SharedWorld;

use crate::driver::SimulationDriver;

/// Async rate limiter holding the loop to a fixed cadence. Missed ticks are
/// delayed, never replayed: there is no catch-up after a stall.
#[derive(Debug)]
pub struct RateLimiter {
    interval: tokio::time::Interval,
}

impl RateLimiter {
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    pub async fn tick(&mut self) -> Instant {
        self.interval.tick().await
    }
}

/// Owns the periodic advancement of a shared [`FleetWorld`].
///
/// [`FleetWorld`]: trackify_core::FleetWorld
#[derive(Debug)]
pub struct SimulationRunner {
    world: SharedWorld,
    driver: SimulationDriver,
    period: Duration,
    max_ticks: Option<u64>,
}

impl SimulationRunner {
    pub fn new(world: SharedWorld, seed: u64, period: Duration) -> Self {
        Self {
            world,
            driver: SimulationDriver::new(seed),
            period,
            max_ticks: None,
        }
    }

    /// Stop after a fixed number of ticks; used by scripted runs.
    pub fn with_max_ticks(mut self, max_ticks: Option<u64>) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Spawn the loop on the current runtime. Returns the number of ticks
    /// executed once the loop ends.
    pub fn spawn(mut self, mut shutdown: broadcast::Receiver<()>) -> JoinHandle<u64> {
        tokio::spawn(async move {
            let mut limiter = RateLimiter::new(self.period);
            let mut tick: u64 = 0;
            info!(period_ms = self.period.as_millis() as u64, "simulation loop started");
            loop {
                tokio::select! {
                    _ = shutdown.recv() => {
                        debug!(tick, "simulation shutdown signal received");
                        break;
                    }
                    _ = limiter.tick() => {
                        let now = now_utc();
                        {
                            let mut world = self.world.write();
                            self.driver.advance(&mut world, now);
                            debug!(
                                tick,
                                average_speed = world.average_speed(),
                                alerts = world.alerts().len(),
                                "simulation tick applied"
                            );
                        }
                        tick += 1;
                        if let Some(limit) = self.max_ticks {
                            if tick >= limit {
                                info!(tick, "simulation reached tick limit");
                                break;
                            }
                        }
                    }
                }
            }
            tick
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackify_common::config::AppConfig;
    use trackify_core::FleetWorld;

    fn shared_world() -> SharedWorld {
        FleetWorld::from_seeds(&AppConfig::default().devices, now_utc()).into_shared()
    }

    #[tokio::test(start_paused = true)]
    async fn runs_to_the_tick_limit() {
        let world = shared_world();
        let (_tx, rx) = broadcast::channel(1);
        let handle = SimulationRunner::new(world.clone(), 9, Duration::from_millis(100))
            .with_max_ticks(Some(3))
            .spawn(rx);
        let ticks = handle.await.unwrap();
        assert_eq!(ticks, 3);
        let world = world.read();
        for device in world.telemetry().devices() {
            if !device.is_stationary() {
                assert!(device.speed <= 89);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stops_on_shutdown_signal() {
        let world = shared_world();
        let (tx, rx) = broadcast::channel(1);
        let handle = SimulationRunner::new(world, 9, Duration::from_secs(5)).spawn(rx);
        tx.send(()).unwrap();
        let ticks = handle.await.unwrap();
        assert_eq!(ticks, 0);
    }
}
