//! Docking simulation and its scene.

use molstudio_core::render::{AtomSelector, AtomStyle, ModelFormat, StructureRenderer};
use molstudio_core::simulation::{DockingResult, find_docking_target};
use molstudio_core::{RequestGateway, Result, StudioError};
use std::sync::Arc;

pub struct DockingService {
    gateway: Arc<dyn RequestGateway>,
}

impl DockingService {
    pub fn new(gateway: Arc<dyn RequestGateway>) -> Self {
        Self { gateway }
    }

    /// Docks a ligand into one of the known targets.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank ligand or an unknown target.
    pub async fn run(&self, ligand_smiles: &str, target_id: &str) -> Result<DockingResult> {
        let ligand_smiles = ligand_smiles.trim();
        if ligand_smiles.is_empty() {
            return Err(StudioError::validation("ligand SMILES must not be empty"));
        }
        let target = find_docking_target(target_id).ok_or_else(|| {
            StudioError::validation(format!("unknown docking target '{}'", target_id))
        })?;

        tracing::info!(
            "[DockingService] Docking {} into {} ({})",
            ligand_smiles,
            target.name,
            target.pdb_id
        );
        let result = self.gateway.run_docking(ligand_smiles, target.id).await?;
        tracing::info!("[DockingService] Affinity {:.2} kcal/mol", result.affinity);
        Ok(result)
    }

    /// Draws the protein as a cartoon (model 0) and the ligand pose as sticks
    /// (model 1).
    pub fn render(&self, renderer: &mut dyn StructureRenderer, result: &DockingResult) {
        renderer.clear();
        let protein = renderer.add_model(&result.target_pdb, ModelFormat::Pdb);
        renderer.set_style(&AtomSelector::model(protein), &AtomStyle::protein_cartoon());
        let ligand = renderer.add_model(&result.ligand_pdb, ModelFormat::Pdb);
        renderer.set_style(&AtomSelector::model(ligand), &AtomStyle::ligand_sticks());
        renderer.zoom_to();
        renderer.render();
    }
}
