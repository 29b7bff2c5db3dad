//! Params command implementation
//!
//! Prints the effective, validated parameter set as JSON.

use anyhow::{Context, Result};
use std::process::ExitCode;

use super::load_params;

/// Run the params command.
pub fn run(params_path: Option<&str>) -> Result<ExitCode> {
    println!("{}", effective_json(params_path)?);
    Ok(ExitCode::SUCCESS)
}

/// Loads, validates, and pretty-prints the parameters.
pub fn effective_json(params_path: Option<&str>) -> Result<String> {
    let params = load_params(params_path)?;
    params.validate().context("Parameter set is invalid")?;
    Ok(params.to_json_pretty()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use radiovox_fx::EffectParameters;
    use std::fs;

    #[test]
    fn test_defaults_print_full_document() {
        let json = effective_json(None).unwrap();
        let parsed = EffectParameters::from_json(&json).unwrap();
        assert_eq!(parsed, EffectParameters::default());
    }

    #[test]
    fn test_partial_file_merges_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        fs::write(&path, r#"{ "eq_boost_db": 12.0 }"#).unwrap();

        let json = effective_json(path.to_str()).unwrap();
        let parsed = EffectParameters::from_json(&json).unwrap();
        assert_eq!(parsed.eq_boost_db, 12.0);
        assert_eq!(parsed.eq_order, 6);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        fs::write(&path, r#"{ "mod_depth": 1.5 }"#).unwrap();

        assert!(effective_json(path.to_str()).is_err());
    }
}
