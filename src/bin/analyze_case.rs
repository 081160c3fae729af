//! One-shot analysis of a case file.
//!
//! Usage: analyze_case <typology> <case.json>
//! Model configuration comes from the environment as for the engine process.

use anyhow::{bail, Context, Result};

use tradewatch::{CaseData, Engine, EngineConfig};

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let (Some(typology), Some(path)) = (args.next(), args.next()) else {
        bail!("usage: analyze_case <typology> <case.json>");
    };

    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let case = CaseData::from_json(&text).with_context(|| format!("parsing {path}"))?;

    let engine = Engine::load(EngineConfig::from_env());
    let result = engine
        .analyze(&typology, &case)
        .with_context(|| format!("analysing {path} as {typology}"))?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
