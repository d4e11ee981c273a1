use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use tib_core::config::{self, ConfigError};
use tib_core::dict::{build_trie, DictError, TrieStats};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("cannot read {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Dict(#[from] DictError),
}

/// Command-line overrides for `tibtool build`.
#[derive(Debug, Default)]
pub struct BuildOptions {
    pub config: Option<PathBuf>,
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub no_optimize: bool,
}

/// What `build` will do once config and overrides are merged.
#[derive(Debug, PartialEq, Eq)]
pub struct BuildPlan {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub optimize: bool,
}

/// Merge the config file (or the embedded default) with the overrides.
/// Paths from a config file are relative to the file's directory.
pub fn plan(opts: &BuildOptions) -> Result<BuildPlan, BuildError> {
    let (settings, base) = match &opts.config {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|source| BuildError::ReadConfig {
                path: path.clone(),
                source,
            })?;
            let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
            (config::parse_config_toml(&content)?.build, base)
        }
        None => (config::Config::builtin()?.build, PathBuf::new()),
    };

    let inputs = if opts.inputs.is_empty() {
        settings.inputs.iter().map(|p| base.join(p)).collect()
    } else {
        opts.inputs.clone()
    };
    let output = opts
        .output
        .clone()
        .unwrap_or_else(|| base.join(&settings.output));
    Ok(BuildPlan {
        inputs,
        output,
        optimize: settings.optimize && !opts.no_optimize,
    })
}

/// Build the trie described by `plan` and write it.
pub fn run(plan: &BuildPlan) -> Result<TrieStats, BuildError> {
    let trie = build_trie(&plan.inputs, plan.optimize)?;
    trie.save(&plan.output)?;
    Ok(trie.stats())
}

pub fn build(opts: &BuildOptions) {
    let plan = die!(plan(opts), "Error: {}");
    for input in &plan.inputs {
        eprintln!("Source: {}", input.display());
    }
    info!(optimize = plan.optimize, output = %plan.output.display(), "building trie");
    let stats = die!(run(&plan), "Error building trie: {}");

    let file_size = fs::metadata(&plan.output).map(|m| m.len()).unwrap_or(0);
    eprintln!(
        "Wrote {} ({} keys, {} nodes, {:.1} KB)",
        plan.output.display(),
        stats.keys,
        stats.nodes,
        file_size as f64 / 1024.0
    );
}
