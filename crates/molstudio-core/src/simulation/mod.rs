//! Docking simulation domain types.

use serde::{Deserialize, Serialize};

/// Per-term contributions to a docking score (kcal/mol).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(default)]
    pub van_der_waals: f64,
    #[serde(default)]
    pub electrostatic: f64,
    #[serde(default)]
    pub desolvation: f64,
}

/// Outcome of docking a ligand into a target protein.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockingResult {
    /// Binding affinity in kcal/mol (more negative binds tighter)
    pub affinity: f64,
    /// Ligand pose as a PDB block, placed at the target's active site
    pub ligand_pdb: String,
    /// Target protein as a PDB block
    pub target_pdb: String,
    pub score_breakdown: ScoreBreakdown,
}

/// A protein the backend can dock against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockingTarget {
    pub id: &'static str,
    pub pdb_id: &'static str,
    pub name: &'static str,
}

const DOCKING_TARGETS: &[DockingTarget] = &[
    DockingTarget {
        id: "covid_protease",
        pdb_id: "6LU7",
        name: "SARS-CoV-2 Main Protease",
    },
    DockingTarget {
        id: "hiv_protease",
        pdb_id: "1HSG",
        name: "HIV-1 Protease",
    },
    DockingTarget {
        id: "breast_cancer",
        pdb_id: "3ERT",
        name: "Estrogen Receptor Alpha",
    },
];

/// Targets known to the backend.
pub fn docking_targets() -> &'static [DockingTarget] {
    DOCKING_TARGETS
}

pub fn find_docking_target(id: &str) -> Option<&'static DockingTarget> {
    DOCKING_TARGETS.iter().find(|t| t.id == id)
}
