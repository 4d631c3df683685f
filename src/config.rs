use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where exemplars come from
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExemplarConfig {
    pub dir: Option<PathBuf>,
    pub include_builtin: bool,
}

impl Default for ExemplarConfig {
    fn default() -> Self {
        Self {
            dir: None,
            include_builtin: true,
        }
    }
}

/// A tool an exemplar action may name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ToolSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl ToolSpec {
    fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// Prompt rendering configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PromptConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
    pub max_exemplars: usize,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template: None,
            max_exemplars: 3,
        }
    }
}

/// How model responses are read
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResponseConfig {
    pub refusal_prefixes: Vec<String>,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            refusal_prefixes: vec!["I cannot".to_string(), "I'm sorry".to_string()],
        }
    }
}

/// Main configuration struct
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub exemplars: ExemplarConfig,
    pub tools: Vec<ToolSpec>,
    pub prompt: PromptConfig,
    pub response: ResponseConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exemplars: ExemplarConfig::default(),
            tools: vec![
                ToolSpec::new("wiki_dump_lookup", "Look up an article by title in the local Wikipedia dump"),
                ToolSpec::new("web_search", "Search the web and return the most relevant snippets"),
            ],
            prompt: PromptConfig::default(),
            response: ResponseConfig::default(),
        }
    }
}

impl Config {
    /// Get the global config directory path
    pub fn global_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("fcx"))
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_config_dir().map(|d| d.join("fcx.yml"))
    }

    /// Get the local config directory path (relative to work_dir)
    pub fn local_config_dir(work_dir: &Path) -> PathBuf {
        work_dir.join(".fcx")
    }

    /// Get the local config file path (relative to work_dir)
    pub fn local_config_path(work_dir: &Path) -> PathBuf {
        Self::local_config_dir(work_dir).join("fcx.yml")
    }

    /// Load configuration with the cascade: explicit -> local -> global -> defaults
    pub fn load(config_path: Option<&PathBuf>, work_dir: &Path) -> Result<Self> {
        if let Some(path) = config_path {
            let base = path.parent().unwrap_or(work_dir).to_path_buf();
            return Self::load_from_file(path)
                .map(|config| config.resolve_paths(&base))
                .context(format!("Failed to load config from {}", path.display()));
        }

        // Try local config first (.fcx/fcx.yml)
        let local_config = Self::local_config_path(work_dir);
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config.resolve_paths(&Self::local_config_dir(work_dir))),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try global config (~/.config/fcx/fcx.yml)
        if let Some(global_config) = Self::global_config_path()
            && global_config.exists()
        {
            match Self::load_from_file(&global_config) {
                Ok(config) => return Ok(config.resolve_paths(global_config.parent().unwrap_or(work_dir))),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", global_config.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load global config from ~/.config/fcx/fcx.yml
    pub fn load_global() -> Result<Self> {
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            return Self::load_from_file(&global_path);
        }
        Ok(Self::default())
    }

    /// Relative paths in a config file are relative to the file's directory
    fn resolve_paths(mut self, base: &Path) -> Self {
        if let Some(dir) = self.exemplars.dir.as_mut()
            && dir.is_relative()
        {
            *dir = base.join(&*dir);
        }
        if let Some(template) = self.prompt.template.as_mut()
            && template.is_relative()
        {
            *template = base.join(&*template);
        }
        self
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        fs::write(&path, content).context("Failed to write config file")?;
        log::info!("Saved config to: {}", path.as_ref().display());
        Ok(())
    }

    /// Save to the local config path (.fcx/fcx.yml)
    pub fn save_local(&self, work_dir: &Path) -> Result<()> {
        let local_path = Self::local_config_path(work_dir);
        self.save(&local_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.exemplars.include_builtin);
        assert!(config.exemplars.dir.is_none());
        assert_eq!(config.tools.len(), 2);
        assert_eq!(config.tools[0].name, "wiki_dump_lookup");
        assert_eq!(config.prompt.max_exemplars, 3);
        assert!(config.response.refusal_prefixes.contains(&"I cannot".to_string()));
    }

    #[test]
    fn test_save_and_load_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("test-config.yml");

        let config = Config::default();
        config.save(&config_path).unwrap();

        let loaded = Config::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.tools, config.tools);
        assert_eq!(loaded.prompt.max_exemplars, config.prompt.max_exemplars);
    }

    #[test]
    fn test_load_from_yaml() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("test-config.yml");

        let yaml = r#"
exemplars:
  dir: "/srv/exemplars"
  include_builtin: false

tools:
  - name: "wiki_dump_lookup"
    description: "Wiki"
  - name: "image_search"

prompt:
  max_exemplars: 1

response:
  refusal_prefixes:
    - "As an AI"
"#;

        let mut file = fs::File::create(&config_path).unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.exemplars.dir, Some(PathBuf::from("/srv/exemplars")));
        assert!(!config.exemplars.include_builtin);
        assert_eq!(config.tools.len(), 2);
        assert_eq!(config.tools[1].name, "image_search");
        assert_eq!(config.tools[1].description, "");
        assert_eq!(config.prompt.max_exemplars, 1);
        assert!(config.prompt.template.is_none());
        assert_eq!(config.response.refusal_prefixes, vec!["As an AI".to_string()]);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("partial.yml");
        fs::write(&config_path, "prompt:\n  max_exemplars: 5\n").unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.prompt.max_exemplars, 5);
        assert_eq!(config.tools.len(), 2);
        assert!(config.exemplars.include_builtin);
    }

    #[test]
    fn test_load_local_resolves_relative_paths() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.exemplars.dir = Some(PathBuf::from("exemplars"));
        config.save_local(dir.path()).unwrap();

        let loaded = Config::load(None, dir.path()).unwrap();
        assert_eq!(
            loaded.exemplars.dir,
            Some(Config::local_config_dir(dir.path()).join("exemplars"))
        );
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.yml");
        assert!(Config::load(Some(&missing), dir.path()).is_err());
    }
}
