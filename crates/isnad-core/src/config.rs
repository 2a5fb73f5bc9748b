use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "isnad.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub pagerank: PageRankConfig,
    #[serde(default)]
    pub betweenness: BetweennessConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_hadiths_path")]
    pub hadiths: PathBuf,
    #[serde(default = "default_narrators_path")]
    pub narrators: PathBuf,
    /// Only the first `max_hadiths` rows are processed.
    #[serde(default = "default_max_hadiths")]
    pub max_hadiths: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            hadiths: default_hadiths_path(),
            narrators: default_narrators_path(),
            max_hadiths: default_max_hadiths(),
        }
    }
}

/// Power-iteration settings. There is no tolerance: the iteration count is
/// always run in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRankConfig {
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            iterations: default_iterations(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetweennessConfig {
    /// Number of BFS sources, taken from the front of node insertion order.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

impl Default for BetweennessConfig {
    fn default() -> Self {
        Self {
            sample_size: default_sample_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Nodes kept in the visualization graph, by PageRank.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Length of each leaderboard in `stats.json`.
    #[serde(default = "default_top_list_len")]
    pub top_list_len: usize,
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            top_n: default_top_n(),
            top_list_len: default_top_list_len(),
            pretty: default_true(),
        }
    }
}

impl PipelineConfig {
    /// Reject settings the metrics cannot run with.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        let damping = self.pagerank.damping;
        if !damping.is_finite() || !(0.0..=1.0).contains(&damping) {
            bail!("pagerank.damping must lie in [0, 1], got {damping}");
        }
        let counts = [
            ("input.max_hadiths", self.input.max_hadiths),
            ("pagerank.iterations", self.pagerank.iterations),
            ("betweenness.sample_size", self.betweenness.sample_size),
            ("export.top_n", self.export.top_n),
            ("export.top_list_len", self.export.top_list_len),
        ];
        for (name, value) in counts {
            if value == 0 {
                bail!("{name} must be at least 1");
            }
        }
        Ok(())
    }
}

/// Load the pipeline configuration.
///
/// An explicit path must exist. Without one, `isnad.toml` in `cwd` is used
/// when present, otherwise defaults apply.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_pipeline_config(explicit: Option<&Path>, cwd: &Path) -> Result<PipelineConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = cwd.join(CONFIG_FILE_NAME);
            if !candidate.exists() {
                return Ok(PipelineConfig::default());
            }
            candidate
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<PipelineConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn default_true() -> bool {
    true
}

fn default_hadiths_path() -> PathBuf {
    PathBuf::from("all_hadiths_clean.csv")
}

fn default_narrators_path() -> PathBuf {
    PathBuf::from("all_rawis.csv")
}

const fn default_max_hadiths() -> usize {
    15_000
}

const fn default_damping() -> f64 {
    0.85
}

const fn default_iterations() -> usize {
    100
}

const fn default_sample_size() -> usize {
    1_000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public/data")
}

const fn default_top_n() -> usize {
    500
}

const fn default_top_list_len() -> usize {
    20
}
