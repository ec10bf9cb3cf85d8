use molstudio_core::RecordStore;
use molstudio_core::config::DualEviction;
use molstudio_core::session::ViewTarget;

const MAX_SELECTED: usize = 2;

/// Ordered selection of at most two experiment runs.
///
/// The first run drives the primary structure, the second the overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonSelection {
    selected: Vec<String>,
    eviction: DualEviction,
}

impl ComparisonSelection {
    pub fn new(eviction: DualEviction) -> Self {
        Self {
            selected: Vec::with_capacity(MAX_SELECTED),
            eviction,
        }
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn primary(&self) -> Option<&str> {
        self.selected.first().map(String::as_str)
    }

    pub fn eviction(&self) -> DualEviction {
        self.eviction
    }

    pub fn contains(&self, run_id: &str) -> bool {
        self.selected.iter().any(|id| id == run_id)
    }

    /// Adds the run, or removes it when already selected.
    ///
    /// With two runs selected, a third one evicts according to the policy:
    /// `PinnedPrimary` replaces the second slot, `Rotate` drops the oldest.
    /// Returns whether the run is selected afterwards.
    pub fn toggle(&mut self, run_id: &str) -> bool {
        if let Some(index) = self.selected.iter().position(|id| id == run_id) {
            self.selected.remove(index);
            return false;
        }
        if self.selected.len() >= MAX_SELECTED {
            let evicted = match self.eviction {
                DualEviction::PinnedPrimary => self.selected.pop(),
                DualEviction::Rotate => Some(self.selected.remove(0)),
            };
            tracing::debug!(
                "[ComparisonSelection] {} evicted {:?} for {}",
                self.eviction,
                evicted,
                run_id
            );
        }
        self.selected.push(run_id.to_string());
        true
    }

    /// Replaces the selection with a single run.
    pub fn select_only(&mut self, run_id: &str) {
        self.selected.clear();
        self.selected.push(run_id.to_string());
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Drops runs that are no longer present.
    pub fn retain_present(&mut self, runs: &RecordStore) {
        self.selected.retain(|id| runs.contains(id));
    }

    /// Derives the viewport target from the selected runs' first results.
    pub fn view(&self, runs: &RecordStore) -> ViewTarget {
        let smiles_of = |id: Option<&String>| {
            id.and_then(|id| runs.get(id))
                .and_then(|run| run.first_result())
                .map(|result| result.smiles.clone())
        };
        ViewTarget::new(
            smiles_of(self.selected.first()),
            smiles_of(self.selected.get(1)),
        )
    }
}
