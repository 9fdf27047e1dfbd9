use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Environment variable that points at an explicit settings file.
pub const CONFIG_ENV_VAR: &str = "ASTROT_CONFIG";

const SEARCH_PATHS: &[&str] = &["configs/astrot.toml", "../../configs/astrot.toml"];

/// Chart computation settings as read from `astrot.toml`.
///
/// Values are kept as plain strings and numbers; the engine turns them
/// into typed settings and rejects anything it does not recognise.
#[derive(Debug, Clone, PartialEq)]
pub struct AstrotSettings {
    pub house_system: String,
    /// Orb below which an aspect is flagged exact, in degrees.
    pub exact_orb: f64,
    /// Per-aspect orb overrides: "conjunction" -> 8.0 etc.
    pub orbs: BTreeMap<String, f64>,
    pub provider: String,
    pub timeout_ms: u64,
    /// Total span between the two samples used for body speeds, in days.
    pub speed_sample_days: f64,
    pub swiss_ephemeris_path: Option<PathBuf>,
}

impl Default for AstrotSettings {
    fn default() -> Self {
        Self {
            house_system: default_house_system(),
            exact_orb: default_exact_orb(),
            orbs: BTreeMap::new(),
            provider: default_provider(),
            timeout_ms: default_timeout_ms(),
            speed_sample_days: default_speed_sample_days(),
            swiss_ephemeris_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    chart: ChartToml,
    #[serde(default)]
    ephemeris: EphemerisToml,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartToml {
    #[serde(default = "default_house_system")]
    house_system: String,
    #[serde(default = "default_exact_orb")]
    exact_orb: f64,
    #[serde(default)]
    orbs: BTreeMap<String, f64>,
}

impl Default for ChartToml {
    fn default() -> Self {
        Self {
            house_system: default_house_system(),
            exact_orb: default_exact_orb(),
            orbs: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct EphemerisToml {
    #[serde(default = "default_provider")]
    provider: String,
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,
    #[serde(default = "default_speed_sample_days")]
    speed_sample_days: f64,
    #[serde(default)]
    swiss_path: Option<PathBuf>,
}

impl Default for EphemerisToml {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            timeout_ms: default_timeout_ms(),
            speed_sample_days: default_speed_sample_days(),
            swiss_path: None,
        }
    }
}

fn default_house_system() -> String {
    "placidus".to_string()
}

fn default_exact_orb() -> f64 {
    1.0
}

fn default_provider() -> String {
    "analytic".to_string()
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_speed_sample_days() -> f64 {
    1.0
}

/// Candidate locations, in lookup order: `$ASTROT_CONFIG` first, then the
/// repository-relative paths.
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(explicit) = env::var(CONFIG_ENV_VAR) {
        paths.push(PathBuf::from(explicit));
    }
    paths.extend(SEARCH_PATHS.iter().map(PathBuf::from));
    paths
}

/// Read the first settings file that exists.
pub fn read_config_toml_text() -> anyhow::Result<String> {
    let paths = config_search_paths();
    for p in &paths {
        if let Ok(c) = fs::read_to_string(p) {
            log::debug!("Loaded settings from {}", p.display());
            return Ok(c);
        }
    }
    anyhow::bail!("Could not load astrot.toml from {:?}", paths);
}

/// Parse settings text. Missing sections and keys fall back to defaults.
pub fn parse_settings(text: &str) -> anyhow::Result<AstrotSettings> {
    let root: RootConfigToml = toml::from_str(text)
        .map_err(|e| anyhow::anyhow!("Failed to parse astrot.toml: {e}"))?;
    let RootConfigToml { chart, ephemeris } = root;

    if !(chart.exact_orb > 0.0) {
        anyhow::bail!("chart.exact_orb must be positive, got {}", chart.exact_orb);
    }
    if let Some((name, orb)) = chart.orbs.iter().find(|(_, orb)| !(**orb > 0.0)) {
        anyhow::bail!("chart.orbs.{name} must be positive, got {orb}");
    }
    if !(ephemeris.speed_sample_days > 0.0) {
        anyhow::bail!(
            "ephemeris.speed_sample_days must be positive, got {}",
            ephemeris.speed_sample_days
        );
    }
    if ephemeris.timeout_ms == 0 {
        anyhow::bail!("ephemeris.timeout_ms must be non-zero");
    }

    Ok(AstrotSettings {
        house_system: chart.house_system.to_lowercase(),
        exact_orb: chart.exact_orb,
        orbs: chart
            .orbs
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect(),
        provider: ephemeris.provider.to_lowercase(),
        timeout_ms: ephemeris.timeout_ms,
        speed_sample_days: ephemeris.speed_sample_days,
        swiss_ephemeris_path: ephemeris.swiss_path,
    })
}

/// Load settings from disk, or defaults when no file exists.
///
/// A file that exists but does not parse is an error, not a fallback.
pub fn load_settings() -> anyhow::Result<AstrotSettings> {
    match read_config_toml_text() {
        Ok(text) => parse_settings(&text),
        Err(e) => {
            log::info!("Using default chart settings ({e})");
            Ok(AstrotSettings::default())
        }
    }
}
