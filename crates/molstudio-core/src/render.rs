//! 3-D renderer capability.
//!
//! The rendering engine is opaque; the core needs only the five calls below.
//! Style values serialize to the selector/style JSON a web viewer accepts, so
//! a host can forward them as-is.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Structure file formats understood by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModelFormat {
    Sdf,
    Pdb,
}

/// Index of a model within the current scene, in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelIndex(pub usize);

/// Selects atoms to style. The default selects every atom in the scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomSelector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<usize>,
}

impl AtomSelector {
    pub fn model(index: ModelIndex) -> Self {
        Self {
            model: Some(index.0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StickStyle {
    pub radius: f64,
    #[serde(rename = "colorscheme", default, skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SphereStyle {
    pub scale: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartoonStyle {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

/// Visual encoding applied to selected atoms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtomStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stick: Option<StickStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sphere: Option<SphereStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cartoon: Option<CartoonStyle>,
}

/// Accent color used for comparison overlays.
pub const OVERLAY_ACCENT: &str = "#00FFFF";
const OVERLAY_OPACITY: f64 = 0.7;

impl AtomStyle {
    /// Ball-and-stick, colored by element. Used for the primary structure.
    pub fn element_colored() -> Self {
        Self {
            stick: Some(StickStyle {
                radius: 0.15,
                color_scheme: Some("Jmol".to_string()),
                ..Default::default()
            }),
            sphere: Some(SphereStyle {
                scale: 0.25,
                ..Default::default()
            }),
            cartoon: None,
        }
    }

    /// Ball-and-stick in a single translucent accent color. Used for overlays.
    pub fn accent_overlay() -> Self {
        Self {
            stick: Some(StickStyle {
                radius: 0.15,
                color_scheme: None,
                color: Some(OVERLAY_ACCENT.to_string()),
                opacity: Some(OVERLAY_OPACITY),
            }),
            sphere: Some(SphereStyle {
                scale: 0.25,
                color: Some(OVERLAY_ACCENT.to_string()),
                opacity: Some(OVERLAY_OPACITY),
            }),
            cartoon: None,
        }
    }

    /// Secondary-structure cartoon for a docking target.
    pub fn protein_cartoon() -> Self {
        Self {
            cartoon: Some(CartoonStyle {
                color: "spectrum".to_string(),
                opacity: Some(0.8),
            }),
            ..Default::default()
        }
    }

    /// Sticks with green carbons for a docked ligand.
    pub fn ligand_sticks() -> Self {
        Self {
            stick: Some(StickStyle {
                radius: 0.2,
                color_scheme: Some("greenCarbon".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

/// The opaque 3-D rendering engine.
///
/// Callers must never add a model without first calling [`clear`](Self::clear)
/// in the same scene rebuild, so stale geometry cannot accumulate.
pub trait StructureRenderer: Send {
    fn clear(&mut self);
    fn add_model(&mut self, data: &str, format: ModelFormat) -> ModelIndex;
    fn set_style(&mut self, selector: &AtomSelector, style: &AtomStyle);
    fn zoom_to(&mut self);
    fn render(&mut self);
}
