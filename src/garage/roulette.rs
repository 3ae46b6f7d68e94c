//! Repeating random pick bound to the lifetime of its handle.

use rand::seq::SliceRandom;
use rand::Rng;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::garage::JoinedVehicle;
use crate::prelude::*;

/// Shortest period between the draws.
const MIN_PERIOD: StdDuration = StdDuration::from_millis(1);

/// A single draw, `None` when there is nothing to pick from.
pub type Draw = Option<JoinedVehicle>;

/// Owns the drawing task: dropping or stopping the handle cancels it.
pub struct RouletteHandle {
    draws: mpsc::Receiver<Draw>,
    candidates: watch::Sender<Vec<JoinedVehicle>>,
    task: JoinHandle<()>,
}

/// Starts drawing from the candidates every `period`, the first draw is immediate.
///
/// The period is clamped to [`MIN_PERIOD`].
pub fn spawn<R: Rng + Send + 'static>(
    candidates: Vec<JoinedVehicle>,
    period: StdDuration,
    mut rng: R,
) -> RouletteHandle {
    if period < MIN_PERIOD {
        warn!(?period, "the period is too short, clamping");
    }
    let period = period.max(MIN_PERIOD);
    let (draw_sender, draws) = mpsc::channel(1);
    let (candidates, mut candidates_receiver) = watch::channel(candidates);

    let task = tokio::spawn(async move {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let draw = candidates_receiver.borrow_and_update().choose(&mut rng).cloned();
            debug!(tank_id = draw.as_ref().map(|vehicle| vehicle.tank_id), "drawn");
            if draw_sender.send(draw).await.is_err() {
                break;
            }
        }
        debug!("the roulette has stopped");
    });

    RouletteHandle {
        draws,
        candidates,
        task,
    }
}

impl RouletteHandle {
    /// Waits for the next draw, `None` once the roulette has stopped.
    pub async fn next(&mut self) -> Option<Draw> {
        self.draws.recv().await
    }

    /// Replaces the candidates, effective from the next draw.
    pub fn reconfigure(&self, candidates: Vec<JoinedVehicle>) {
        self.candidates.send_replace(candidates);
    }

    pub fn stop(self) {
        // Dropping aborts the task.
    }
}

impl Drop for RouletteHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
