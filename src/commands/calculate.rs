use anyhow::{Context, Result};
use colored::Colorize;
use saas_pricing_calculator::pricing;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Execute the calculate command
///
/// Reads a JSON input from a file (or stdin for "-"), validates it and prints
/// the report as pretty JSON on stdout.
pub fn execute(input: &Path) -> Result<()> {
    let raw = read_input(input)?;
    let value: Value = serde_json::from_str(&raw).context("Input is not valid JSON")?;

    let report = match pricing::validate(&value) {
        Ok(parsed) => pricing::calculate(&parsed),
        Err(err) => {
            eprintln!("{} {}", "✗".red(), err.to_string().red());
            anyhow::bail!("Invalid pricing input");
        }
    };

    debug!(
        monthly_price = report.monthly_price,
        not_applicable = report.not_applicable.len(),
        "Calculated report"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);

    for skipped in &report.not_applicable {
        eprintln!("{} {}", "note:".yellow(), skipped);
    }

    Ok(())
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read input from stdin")?;
        return Ok(buffer);
    }

    std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file {}", input.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_calculate_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"currentPrice": 99, "customers": 0, "churnRate": 3, "features": 0, "growthRate": 0}}"#
        )
        .unwrap();

        assert!(execute(file.path()).is_ok());
    }

    #[test]
    fn test_calculate_rejects_invalid_input() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"currentPrice": 99, "customers": 5, "churnRate": 2, "features": 1, "growthRate": 0, "supportTier": "gold"}}"#).unwrap();

        assert!(execute(file.path()).is_err());
    }

    #[test]
    fn test_calculate_missing_file() {
        let result = execute(Path::new("/nonexistent/input.json"));
        assert!(result.unwrap_err().to_string().contains("Failed to read input file"));
    }
}
