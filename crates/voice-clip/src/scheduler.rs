//! Tokio-backed timer and frame capabilities.
//!
//! Each scheduled task is a spawned tokio task that posts [`EngineEvent`]s
//! into the recording loop's channel. Cancel aborts the task; a firing that
//! was already queued is dropped by the recorder's ticket check.

use crate::EngineEvent;

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use tokio::{sync::mpsc, task::JoinHandle, time};
use tracing::{debug, trace};
use voice_clip_core::{Clock, FrameScheduler, ScheduledTask, Ticket};

/// A spawned timer or frame task.
pub struct TokioTask {
    ticket: Ticket,
    handle: JoinHandle<()>,
    cancelled: Arc<AtomicBool>,
}

impl ScheduledTask for TokioTask {
    fn ticket(&self) -> Ticket {
        self.ticket
    }

    fn cancel(&mut self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            self.handle.abort();
            trace!(ticket = self.ticket.id(), "Scheduled task cancelled");
        }
    }

    fn is_active(&self) -> bool {
        !self.cancelled.load(Ordering::Acquire) && !self.handle.is_finished()
    }
}

impl Drop for TokioTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Repeating elapsed-time timer.
pub struct TokioClock {
    event_tx: mpsc::UnboundedSender<EngineEvent>,
    next_id: u64,
}

impl TokioClock {
    /// Creates a clock posting ticks into `event_tx`.
    pub fn new(event_tx: mpsc::UnboundedSender<EngineEvent>) -> Self {
        Self {
            event_tx,
            next_id: 0,
        }
    }
}

impl Clock for TokioClock {
    fn every(&mut self, period: Duration) -> Box<dyn ScheduledTask> {
        self.next_id += 1;
        let ticket = Ticket::new(self.next_id);
        let event_tx = self.event_tx.clone();
        let cancelled = Arc::new(AtomicBool::new(false));

        let handle = tokio::spawn(async move {
            // First firing one period from now, not immediately.
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if event_tx.send(EngineEvent::Tick(ticket)).is_err() {
                    break;
                }
            }
        });

        debug!(ticket = ticket.id(), period_ms = period.as_millis() as u64, "Timer started");

        Box::new(TokioTask {
            ticket,
            handle,
            cancelled,
        })
    }
}

/// One-shot frame callbacks at a fixed frame period.
pub struct TokioFrameScheduler {
    event_tx: mpsc::UnboundedSender<EngineEvent>,
    frame_period: Duration,
    next_id: u64,
}

impl TokioFrameScheduler {
    /// Creates a scheduler posting frames into `event_tx` every `frame_period`.
    pub fn new(event_tx: mpsc::UnboundedSender<EngineEvent>, frame_period: Duration) -> Self {
        Self {
            event_tx,
            frame_period,
            next_id: 0,
        }
    }
}

impl FrameScheduler for TokioFrameScheduler {
    fn next_frame(&mut self) -> Box<dyn ScheduledTask> {
        self.next_id += 1;
        let ticket = Ticket::new(self.next_id);
        let event_tx = self.event_tx.clone();
        let period = self.frame_period;

        let handle = tokio::spawn(async move {
            time::sleep(period).await;
            let _ = event_tx.send(EngineEvent::Frame(ticket));
        });

        Box::new(TokioTask {
            ticket,
            handle,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }
}
