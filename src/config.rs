use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub log_file: PathBuf,
    pub packages: PackagesConfig,
    pub node: NodeConfig,
    pub foundry: FoundryConfig,
    pub hyperlane: HyperlaneConfig,
    pub validator: ValidatorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagesConfig {
    pub base: Vec<String>,
    pub docker_package: String,
}

impl Default for PackagesConfig {
    fn default() -> Self {
        Self {
            base: ["curl", "wget", "git", "jq", "lz4", "build-essential", "ca-certificates"]
                .into_iter()
                .map(String::from)
                .collect(),
            docker_package: "docker.io".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub nvm_install_url: String,
    /// Defaults to `$HOME/.nvm` when unset
    pub nvm_dir: Option<PathBuf>,
    pub major_version: u32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            nvm_install_url: "https://raw.githubusercontent.com/nvm-sh/nvm/v0.39.7/install.sh".to_string(),
            nvm_dir: None,
            major_version: 20,
        }
    }
}

impl NodeConfig {
    pub fn resolved_nvm_dir(&self) -> PathBuf {
        self.nvm_dir.clone().unwrap_or_else(|| home_dir().join(".nvm"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FoundryConfig {
    pub install_url: String,
    /// Defaults to `$HOME/.foundry/bin` when unset
    pub bin_dir: Option<PathBuf>,
}

impl Default for FoundryConfig {
    fn default() -> Self {
        Self {
            install_url: "https://foundry.paradigm.xyz".to_string(),
            bin_dir: None,
        }
    }
}

impl FoundryConfig {
    pub fn resolved_bin_dir(&self) -> PathBuf {
        self.bin_dir
            .clone()
            .unwrap_or_else(|| home_dir().join(".foundry").join("bin"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HyperlaneConfig {
    pub cli_package: String,
    pub cli_command: String,
    pub image: String,
    pub platform: String,
}

impl Default for HyperlaneConfig {
    fn default() -> Self {
        Self {
            cli_package: "@hyperlane-xyz/cli".to_string(),
            cli_command: "hyperlane".to_string(),
            image: "gcr.io/abacus-labs-dev/hyperlane-agent:agents-v1.0.0".to_string(),
            platform: "linux/amd64".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub container_name: String,
    pub db_dir: PathBuf,
    pub container_db_path: String,
    pub chain: String,
    pub reorg_period: u32,
    /// 0 keeps prompting forever
    pub max_key_attempts: u32,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            container_name: "hyperlane".to_string(),
            db_dir: PathBuf::from("/opt/hyperlane_db_base"),
            container_db_path: "/hyperlane_db_base".to_string(),
            chain: "base".to_string(),
            reorg_period: 1,
            max_key_attempts: 5,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            log_file: PathBuf::from("/root/hyperlane_setup.log"),
            packages: PackagesConfig::default(),
            node: NodeConfig::default(),
            foundry: FoundryConfig::default(),
            hyperlane: HyperlaneConfig::default(),
            validator: ValidatorConfig::default(),
        }
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/root"))
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let project_name = env!("CARGO_PKG_NAME");
        let file_name = format!("{}.yml", project_name);
        let mut candidates = Vec::new();
        // Primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join(project_name).join(&file_name));
        }
        // Fallback location: ./<project>.yml
        candidates.push(PathBuf::from(file_name));

        match Self::load_first_existing(&candidates)? {
            Some(config) => Ok(config),
            None => {
                log::info!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load the first candidate that exists. An existing file that does
    /// not parse is an error, never a fall back to defaults.
    fn load_first_existing(candidates: &[PathBuf]) -> Result<Option<Self>> {
        for path in candidates {
            if path.exists() {
                return Self::load_from_file(path)
                    .context(format!("Failed to load config from {}", path.display()))
                    .map(Some);
            }
        }
        Ok(None)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}
