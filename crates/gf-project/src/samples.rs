//! Two-column isotherm files: `capacity,potential` per line.

use crate::{ProjectError, ProjectResult};
use std::path::Path;

/// Raw (capacity, potential) columns before fitting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IsothermSamples {
    pub capacity: Vec<f64>,
    pub potential: Vec<f64>,
}

/// Parse CSV text. Blank lines and `#` comments are skipped; a leading
/// non-numeric line is taken as a header.
pub fn parse_isotherm_csv(text: &str, origin: &str) -> ProjectResult<IsothermSamples> {
    let mut samples = IsothermSamples::default();
    let mut seen_data = false;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let err = |what: String| ProjectError::Samples {
            path: origin.to_string(),
            line: idx + 1,
            what,
        };

        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c == ';' || c == '\t')
            .map(str::trim)
            .collect();
        if fields.len() != 2 {
            return Err(err(format!("expected 2 columns, found {}", fields.len())));
        }
        let parsed = (fields[0].parse::<f64>(), fields[1].parse::<f64>());
        match parsed {
            (Ok(c), Ok(p)) => {
                samples.capacity.push(c);
                samples.potential.push(p);
                seen_data = true;
            }
            _ if !seen_data => {
                // header
                seen_data = true;
            }
            _ => return Err(err(format!("not a number pair: {line:?}"))),
        }
    }
    Ok(samples)
}

pub fn read_isotherm_csv(path: &Path) -> ProjectResult<IsothermSamples> {
    let text = std::fs::read_to_string(path)?;
    let samples = parse_isotherm_csv(&text, &path.display().to_string())?;
    tracing::debug!(
        path = %path.display(),
        rows = samples.capacity.len(),
        "isotherm samples read"
    );
    Ok(samples)
}
