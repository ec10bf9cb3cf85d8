use anyhow::Result;
use colored::Colorize;
use molstudio_core::GenerationRecord;
use serde::Serialize;

/// Chooses between JSON and human-readable output.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Prints `value` as JSON, or runs `human` for text output.
    pub fn emit<T: Serialize + ?Sized>(&self, value: &T, human: impl FnOnce()) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human();
        }
        Ok(())
    }
}

pub fn record_lines(record: &GenerationRecord) -> Vec<String> {
    let mut lines = vec![format!(
        "{}  {}  {}",
        record.id.bold(),
        record.created_at.format("%Y-%m-%d %H:%M"),
        record.prompt
    )];
    if let Some(experiment_id) = &record.experiment_id {
        lines.push(format!("  experiment: {}", experiment_id));
    }
    for result in &record.results {
        let validity = match result.is_valid {
            Some(false) => " (invalid)".red().to_string(),
            _ => String::new(),
        };
        lines.push(format!(
            "  {:<12} {}  confidence {:.2}  {} ms{}",
            result.model_name.cyan(),
            result.smiles,
            result.confidence,
            result.execution_time_ms,
            validity
        ));
    }
    lines
}

pub fn print_record(record: &GenerationRecord) {
    for line in record_lines(record) {
        println!("{}", line);
    }
}
