//! The seam between the game and whatever physics engine and renderer
//! back it, plus a fixed-timestep loop that drives them.

use std::{future::Future, time::Duration};

use log::{debug, info};
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub a: BodyHandle,
    pub b: BodyHandle,
}

pub type CollisionHandler = Box<dyn FnMut(Collision) + Send>;

pub trait Simulation {
    /// Advances the world by `dt`, reporting contacts to registered handlers.
    fn step(&mut self, dt: Duration);
    fn render(&mut self);
    fn on_collision(&mut self, handler: CollisionHandler);
}

#[derive(Debug, Clone, Copy)]
pub struct Runner {
    pub delta: Duration,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            delta: Duration::from_secs_f64(1.0 / 60.0),
        }
    }
}

impl Runner {
    pub fn new(delta: Duration) -> Self {
        Self { delta }
    }

    pub fn tick<S: Simulation + ?Sized>(&self, sim: &mut S) {
        sim.step(self.delta);
        sim.render();
    }

    /// Ticks `sim` once per `delta` until `shutdown` resolves. Returns the
    /// number of ticks performed.
    pub async fn run<S, F>(&self, sim: &mut S, shutdown: F) -> u64
    where
        S: Simulation + ?Sized,
        F: Future<Output = ()>,
    {
        let mut interval = tokio::time::interval(self.delta);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        let mut ticks = 0;
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = interval.tick() => {
                    self.tick(sim);
                    ticks += 1;
                    if ticks % 600 == 0 {
                        debug!("runner at {ticks} ticks");
                    }
                }
            }
        }
        info!("runner stopped after {ticks} ticks");
        ticks
    }
}
