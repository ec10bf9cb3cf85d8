use serde::{Deserialize, Serialize};

/// The structures the 3-D viewport should display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewTarget {
    pub primary: Option<String>,
    pub overlay: Option<String>,
}

impl ViewTarget {
    pub fn new(primary: Option<String>, overlay: Option<String>) -> Self {
        Self { primary, overlay }
    }

    pub fn single(primary: impl Into<String>) -> Self {
        Self {
            primary: Some(primary.into()),
            overlay: None,
        }
    }

    /// A target with nothing to fetch.
    pub fn is_blank(&self) -> bool {
        self.primary.as_deref().is_none_or(|s| s.trim().is_empty())
    }
}
