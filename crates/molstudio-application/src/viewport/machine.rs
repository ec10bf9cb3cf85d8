//! Debounce and supersession state machine for the 3-D viewport.
//!
//! Pure and clock-free: callers pass `now` in. The async driver in
//! [`super::sync`] owns the timers, the fetches and the renderer.

use molstudio_core::StudioError;
use molstudio_core::session::ViewTarget;
use std::time::Duration;
use tokio::time::Instant;

/// Where the viewport is in its `Idle → Pending → Fetching → Rendering` cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportPhase {
    Idle,
    /// Waiting for the quiet period to end.
    Pending { deadline: Instant },
    Fetching { seq: u64 },
    Rendering { seq: u64 },
}

/// Result of observing a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserveOutcome {
    /// Same as the latest observed target; the timer keeps running.
    Unchanged,
    /// A fetch is due at `deadline` unless another change arrives first.
    Scheduled { deadline: Instant },
    /// Nothing to fetch; pending and in-flight work is superseded and the
    /// last rendered scene stays.
    Blank,
}

/// A committed fetch. Its completion is applied only if `seq` is still the
/// latest issued and `target` is still current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub target: ViewTarget,
}

impl FetchTicket {
    pub fn primary(&self) -> &str {
        self.target.primary.as_deref().unwrap_or_default()
    }

    pub fn overlay(&self) -> Option<&str> {
        self.target.overlay.as_deref()
    }
}

/// What the fetches for a ticket produced (SDF blocks).
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub primary: Result<String, StudioError>,
    pub overlay: Option<Result<String, StudioError>>,
}

/// A failed fetch, reported once.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchFailure {
    pub smiles: String,
    pub error: StudioError,
}

/// Models to draw for an accepted completion.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub seq: u64,
    pub target: ViewTarget,
    pub primary_sdf: String,
    pub overlay_sdf: Option<String>,
    /// Overlay failure; the primary is drawn alone
    pub failure: Option<FetchFailure>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewportCompletion {
    Render(RenderPlan),
    /// The primary fetch failed; the last good scene stays.
    Failed { seq: u64, failures: Vec<FetchFailure> },
    /// Superseded by a newer target or a newer fetch.
    Discarded { seq: u64 },
}

#[derive(Debug, Clone)]
pub struct ViewportMachine {
    window: Duration,
    phase: ViewportPhase,
    /// Latest observed target
    current: Option<ViewTarget>,
    latest_issued: u64,
    rendered: Option<ViewTarget>,
}

impl ViewportMachine {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            phase: ViewportPhase::Idle,
            current: None,
            latest_issued: 0,
            rendered: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn phase(&self) -> ViewportPhase {
        self.phase
    }

    pub fn current_target(&self) -> Option<&ViewTarget> {
        self.current.as_ref()
    }

    /// Target of the scene currently on screen.
    pub fn rendered_target(&self) -> Option<&ViewTarget> {
        self.rendered.as_ref()
    }

    pub fn latest_issued(&self) -> u64 {
        self.latest_issued
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.phase {
            ViewportPhase::Pending { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// Records a structure change observed at `now`.
    pub fn observe(&mut self, target: ViewTarget, now: Instant) -> ObserveOutcome {
        if self.current.as_ref() == Some(&target) {
            return ObserveOutcome::Unchanged;
        }
        let blank = target.is_blank();
        self.current = Some(target);

        if blank {
            self.phase = ViewportPhase::Idle;
            return ObserveOutcome::Blank;
        }
        let deadline = now + self.window;
        self.phase = ViewportPhase::Pending { deadline };
        ObserveOutcome::Scheduled { deadline }
    }

    pub fn due(&self, now: Instant) -> bool {
        self.deadline().is_some_and(|deadline| deadline <= now)
    }

    /// Ends the quiet period early.
    pub fn expedite(&mut self, now: Instant) {
        if let ViewportPhase::Pending { deadline } = &mut self.phase
            && *deadline > now
        {
            *deadline = now;
        }
    }

    /// Commits the pending change into a fetch when its deadline has passed.
    pub fn begin_fetch(&mut self, now: Instant) -> Option<FetchTicket> {
        if !self.due(now) {
            return None;
        }
        let target = self.current.clone()?;
        self.latest_issued += 1;
        let seq = self.latest_issued;
        self.phase = ViewportPhase::Fetching { seq };
        Some(FetchTicket { seq, target })
    }

    /// Applies the fetch results for `ticket`.
    pub fn complete(&mut self, ticket: FetchTicket, outcome: FetchOutcome) -> ViewportCompletion {
        let FetchTicket { seq, target } = ticket;
        if seq != self.latest_issued || self.current.as_ref() != Some(&target) {
            return ViewportCompletion::Discarded { seq };
        }

        let primary_sdf = match outcome.primary {
            Ok(sdf) => sdf,
            Err(error) => {
                let mut failures = vec![FetchFailure {
                    smiles: target.primary.clone().unwrap_or_default(),
                    error,
                }];
                if let (Some(Err(error)), Some(smiles)) = (outcome.overlay, target.overlay.clone()) {
                    failures.push(FetchFailure { smiles, error });
                }
                self.settle_fetching(seq);
                return ViewportCompletion::Failed { seq, failures };
            }
        };

        let (overlay_sdf, failure) = match (outcome.overlay, target.overlay.clone()) {
            (Some(Ok(sdf)), _) => (Some(sdf), None),
            (Some(Err(error)), Some(smiles)) => (None, Some(FetchFailure { smiles, error })),
            _ => (None, None),
        };

        // A change back to this target while fetching left a pending timer
        // for a scene that is about to be drawn.
        if matches!(self.phase, ViewportPhase::Pending { .. } | ViewportPhase::Fetching { .. }) {
            self.phase = ViewportPhase::Rendering { seq };
        }
        ViewportCompletion::Render(RenderPlan {
            seq,
            target,
            primary_sdf,
            overlay_sdf,
            failure,
        })
    }

    /// Marks the plan for `seq` as drawn.
    pub fn mark_rendered(&mut self, seq: u64, target: ViewTarget) {
        self.rendered = Some(target);
        if self.phase == (ViewportPhase::Rendering { seq }) {
            self.phase = ViewportPhase::Idle;
        }
    }

    fn settle_fetching(&mut self, seq: u64) {
        if self.phase == (ViewportPhase::Fetching { seq }) {
            self.phase = ViewportPhase::Idle;
        }
    }
}
