//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["parley.toml", ".parley.toml"];
const ENV_PREFIX: &str = "PARLEY_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment (`PARLEY_SECTION__KEY`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./parley.toml` or `./.parley.toml`
    /// 4. Global: `~/.config/panda-parley/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Self::file_figment(config_path);
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        figment.extract().map_err(Box::new)
    }

    /// Defaults and files only, no environment
    fn file_figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// `~/.config/panda-parley/config.toml` (platform config dir)
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("panda-parley").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");
        println!("  [ENV  ] {}<SECTION>__<KEY>", ENV_PREFIX);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISS " };
            println!("  [{}] --config: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./parley.toml or ./.parley.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.provider.kind, "gemini");
        assert_eq!(config.personas.expert_a, "auto");
    }

    #[test]
    fn test_global_config_path_names_the_app() {
        if let Some(path) = ConfigLoader::global_config_path() {
            assert!(path.to_string_lossy().contains("panda-parley"));
            assert!(path.ends_with("config.toml"));
        }
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[provider]\nkind = \"modelscope\"\n\n[discussion]\nautoplay_interval_ms = 900\n",
        )
        .unwrap();

        let config: FileConfig = ConfigLoader::file_figment(Some(&path)).extract().unwrap();
        assert_eq!(config.provider.kind, "modelscope");
        assert_eq!(config.discussion.autoplay_interval_ms, 900);
        assert_eq!(config.discussion.context_budget, 2500);
    }

    #[test]
    fn test_environment_overrides_files() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("parley.toml", "[provider]\nkind = \"openai\"\n")?;
            jail.set_env("PARLEY_PROVIDER__KIND", "openrouter");
            jail.set_env("PARLEY_DISCUSSION__LANGUAGE", "spanish");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.provider.kind, "openrouter");
            assert_eq!(config.discussion.language, "spanish");
            Ok(())
        });
    }

    #[test]
    fn test_project_file_is_picked_up() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(".parley.toml", "[personas]\nexpert_a = \"realist\"\n")?;

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.personas.expert_a, "realist");
            Ok(())
        });
    }
}
