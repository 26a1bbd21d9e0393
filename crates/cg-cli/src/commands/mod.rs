pub mod abilities;
pub mod modifier;
pub mod roll;

use cg_mechanics::{EngineRng, Roller, RollerConfig};
use serde::Serialize;

/// Build a roller from the shared CLI flags.
fn roller(seed: Option<u64>, audit: bool) -> Roller<EngineRng> {
    let mut config = RollerConfig::default().with_audit(audit);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    Roller::from_config(&config)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

/// Render a modifier with an explicit sign.
fn signed(value: i32) -> String {
    format!("{value:+}")
}
