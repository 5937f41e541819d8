#![forbid(unsafe_code)]

mod rendering;

use std::path::Path;

use anyhow::Context;
use lane_runner::prelude::LevelConfig;

pub use rendering::{init_tracing, render_layout_to_png, KindStyle, RenderConfig};

/// Reads a [`LevelConfig`] from a RON file; missing fields keep their defaults.
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<LevelConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: LevelConfig =
        ron::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
