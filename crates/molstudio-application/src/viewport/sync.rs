//! Async driver for [`ViewportMachine`].
//!
//! `ViewportSync` owns the renderer. Each observed change arms a timer task;
//! only the task armed by the latest change may commit the fetch. Primary and
//! overlay are fetched together and drawn in a single clear/add/render pass.

use super::machine::{
    FetchFailure, FetchOutcome, FetchTicket, ObserveOutcome, RenderPlan, ViewportCompletion,
    ViewportMachine, ViewportPhase,
};
use molstudio_core::render::{AtomSelector, AtomStyle, ModelFormat, StructureRenderer};
use molstudio_core::session::ViewTarget;
use molstudio_core::{RequestGateway, StudioError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::time::Instant;

/// Notifications from the viewport to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewportEvent {
    Rendered { seq: u64, target: ViewTarget },
    /// Reported once per failed fetch
    FetchFailed {
        seq: u64,
        smiles: String,
        error: StudioError,
    },
    /// A superseded fetch result was dropped
    Discarded { seq: u64 },
}

struct ViewportInner {
    machine: ViewportMachine,
    renderer: Box<dyn StructureRenderer>,
    /// Bumped on every change; a timer only fires if it is still current
    timer_generation: u64,
    closed: bool,
}

/// Debounced, supersession-aware bridge from view targets to the renderer.
#[derive(Clone)]
pub struct ViewportSync {
    inner: Arc<Mutex<ViewportInner>>,
    gateway: Arc<dyn RequestGateway>,
    events: mpsc::UnboundedSender<ViewportEvent>,
}

impl ViewportSync {
    pub fn new(
        gateway: Arc<dyn RequestGateway>,
        renderer: Box<dyn StructureRenderer>,
        window: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<ViewportEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let inner = ViewportInner {
            machine: ViewportMachine::new(window),
            renderer,
            timer_generation: 0,
            closed: false,
        };
        let sync = Self {
            inner: Arc::new(Mutex::new(inner)),
            gateway,
            events,
        };
        (sync, receiver)
    }

    /// Observes the structures the viewport should show.
    ///
    /// Must be called from within a tokio runtime; the debounce timer runs
    /// as a spawned task.
    pub async fn observe(&self, target: ViewTarget) -> ObserveOutcome {
        let mut inner = self.inner.lock().await;
        if inner.closed {
            return ObserveOutcome::Unchanged;
        }
        let outcome = inner.machine.observe(target, Instant::now());
        match outcome {
            ObserveOutcome::Unchanged => {}
            ObserveOutcome::Blank => {
                inner.timer_generation += 1;
                tracing::debug!("[ViewportSync] Blank target, keeping last scene");
            }
            ObserveOutcome::Scheduled { deadline } => {
                inner.timer_generation += 1;
                let generation = inner.timer_generation;
                let this = self.clone();
                tokio::spawn(async move {
                    tokio::time::sleep_until(deadline).await;
                    this.fire(generation).await;
                });
            }
        }
        outcome
    }

    /// Commits the pending change now and waits for its render.
    ///
    /// Returns the sequence number of the fetch, or `None` when nothing was
    /// pending.
    pub async fn flush(&self) -> Option<u64> {
        let ticket = {
            let mut inner = self.inner.lock().await;
            if inner.closed {
                return None;
            }
            let now = Instant::now();
            inner.machine.expedite(now);
            inner.timer_generation += 1;
            inner.machine.begin_fetch(now)?
        };
        let seq = ticket.seq;
        self.run_fetch(ticket).await;
        Some(seq)
    }

    /// Stops scheduling. In-flight fetches complete but are not drawn.
    pub async fn shutdown(&self) {
        let mut inner = self.inner.lock().await;
        inner.closed = true;
        inner.timer_generation += 1;
        tracing::debug!("[ViewportSync] Shut down");
    }

    pub async fn phase(&self) -> ViewportPhase {
        self.inner.lock().await.machine.phase()
    }

    pub async fn rendered_target(&self) -> Option<ViewTarget> {
        self.inner.lock().await.machine.rendered_target().cloned()
    }

    async fn fire(&self, generation: u64) {
        let ticket = {
            let mut inner = self.inner.lock().await;
            if inner.closed || inner.timer_generation != generation {
                return;
            }
            match inner.machine.begin_fetch(Instant::now()) {
                Some(ticket) => ticket,
                None => return,
            }
        };
        self.run_fetch(ticket).await;
    }

    async fn run_fetch(&self, ticket: FetchTicket) {
        tracing::debug!(
            seq = ticket.seq,
            smiles = ticket.primary(),
            overlay = ticket.overlay(),
            "[ViewportSync] Fetching"
        );
        let gateway = &self.gateway;
        let overlay = async {
            match ticket.overlay() {
                Some(smiles) => Some(gateway.fetch_3d(smiles).await.map(|s| s.sdf)),
                None => None,
            }
        };
        let (primary, overlay) = tokio::join!(gateway.fetch_3d(ticket.primary()), overlay);
        let outcome = FetchOutcome {
            primary: primary.map(|s| s.sdf),
            overlay,
        };

        let mut inner = self.inner.lock().await;
        if inner.closed {
            return;
        }
        match inner.machine.complete(ticket, outcome) {
            ViewportCompletion::Render(plan) => {
                let seq = plan.seq;
                let target = plan.target.clone();
                let failure = draw(inner.renderer.as_mut(), plan);
                inner.machine.mark_rendered(seq, target.clone());
                if let Some(failure) = failure {
                    self.report_failure(seq, failure);
                }
                let _ = self.events.send(ViewportEvent::Rendered { seq, target });
            }
            ViewportCompletion::Failed { seq, failures } => {
                for failure in failures {
                    self.report_failure(seq, failure);
                }
            }
            ViewportCompletion::Discarded { seq } => {
                tracing::trace!(seq, "[ViewportSync] Discarded stale fetch");
                let _ = self.events.send(ViewportEvent::Discarded { seq });
            }
        }
    }

    fn report_failure(&self, seq: u64, failure: FetchFailure) {
        tracing::warn!(
            seq,
            smiles = %failure.smiles,
            error = %failure.error,
            "[ViewportSync] 3D fetch failed"
        );
        let _ = self.events.send(ViewportEvent::FetchFailed {
            seq,
            smiles: failure.smiles,
            error: failure.error,
        });
    }
}

/// Rebuilds the scene from scratch. Returns the overlay failure, if any.
fn draw(renderer: &mut dyn StructureRenderer, plan: RenderPlan) -> Option<FetchFailure> {
    renderer.clear();
    let primary = renderer.add_model(&plan.primary_sdf, ModelFormat::Sdf);
    renderer.set_style(&AtomSelector::model(primary), &AtomStyle::element_colored());
    if let Some(overlay_sdf) = &plan.overlay_sdf {
        let overlay = renderer.add_model(overlay_sdf, ModelFormat::Sdf);
        renderer.set_style(&AtomSelector::model(overlay), &AtomStyle::accent_overlay());
    }
    renderer.zoom_to();
    renderer.render();
    plan.failure
}
