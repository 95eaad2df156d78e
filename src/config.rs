//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/cgtree/cgtree.toml`
//! 3. Local config: `--config <file>` or `./.cgtree.toml`
//! 4. Environment variables: `CGTREE_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::kind::LIBRARY_VERSION_TAG;
use crate::domain::{EntityBuilder, MergePolicy};

/// Unified configuration for cgtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Name of assembled tree roots
    pub tree_name: String,
    /// Base that receives zones with no group and no parent base
    pub default_base_name: String,
    /// Value of the `CGNSLibraryVersion` node on new trees
    pub library_version: f32,
    /// Cell and physical dimension stored on new bases
    pub base_dimensions: Vec<i32>,
    /// Tags that still combine when `combine_all` is off
    pub combine_tags: Vec<String>,
    /// Combine every same-named node, not just containers
    pub combine_all: bool,
    /// Rename zones so no two zones in a tree share a name
    pub unique_zone_names: bool,
    /// Directory relative input paths are resolved against
    pub data_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let builder = EntityBuilder::default();
        Self {
            tree_name: builder.tree_name,
            default_base_name: "Base".into(),
            library_version: builder.library_version,
            base_dimensions: builder.base_dimensions,
            combine_tags: vec![LIBRARY_VERSION_TAG.into()],
            combine_all: false,
            unique_zone_names: false,
            data_dir: None,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub tree_name: Option<String>,
    pub default_base_name: Option<String>,
    pub library_version: Option<f32>,
    pub base_dimensions: Option<Vec<i32>>,
    pub combine_tags: Option<Vec<String>>,
    pub combine_all: Option<bool>,
    pub unique_zone_names: Option<bool>,
    pub data_dir: Option<PathBuf>,
}

/// Get the XDG config directory for cgtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cgtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("cgtree.toml"))
}

/// Local config picked up from the working directory.
pub fn local_config_path() -> PathBuf {
    PathBuf::from(".cgtree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["a", "b"], &["c"])       // → ["a", "b", "c"]
    /// merge_array(&["a", "b"], &["!a", "c"]) // → ["b", "c"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().cloned().collect();

        for pattern in overlay {
            if let Some(negated) = pattern.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(pattern.clone());
            }
        }

        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    /// Merge overlay config onto self (base).
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - `combine_tags`: union merge with negation support
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        let mut merged = self.apply_scalars(overlay);
        merged.combine_tags = overlay
            .combine_tags
            .as_ref()
            .map(|o| Self::merge_array(&self.combine_tags, o))
            .unwrap_or_else(|| self.combine_tags.clone());
        merged
    }

    /// Apply global config onto defaults; arrays REPLACE the defaults.
    pub fn apply_global(&self, global: &RawSettings) -> Self {
        let mut merged = self.apply_scalars(global);
        merged.combine_tags = global
            .combine_tags
            .clone()
            .unwrap_or_else(|| self.combine_tags.clone());
        merged
    }

    fn apply_scalars(&self, raw: &RawSettings) -> Self {
        Self {
            tree_name: raw.tree_name.clone().unwrap_or_else(|| self.tree_name.clone()),
            default_base_name: raw
                .default_base_name
                .clone()
                .unwrap_or_else(|| self.default_base_name.clone()),
            library_version: raw.library_version.unwrap_or(self.library_version),
            base_dimensions: raw
                .base_dimensions
                .clone()
                .unwrap_or_else(|| self.base_dimensions.clone()),
            combine_tags: self.combine_tags.clone(),
            combine_all: raw.combine_all.unwrap_or(self.combine_all),
            unique_zone_names: raw.unique_zone_names.unwrap_or(self.unique_zone_names),
            data_dir: raw.data_dir.clone().or_else(|| self.data_dir.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// An explicit `local` file must exist; without one, `./.cgtree.toml` is
    /// used when present.
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE
    /// - Global → Local: UNION with negation support
    /// - Any → Env vars: REPLACE
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        match local {
            Some(path) => {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
            None => {
                let path = local_config_path();
                if path.exists() {
                    let raw = load_raw_settings(&path)?;
                    current = current.merge_with(&raw);
                }
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Load a single file on top of the defaults, ignoring global config and
    /// environment.
    pub fn load_from_file(path: &Path) -> Result<Self, ApplicationError> {
        let raw = load_raw_settings(path)?;
        let mut settings = Self::default().merge_with(&raw);
        settings.expand_paths();
        Ok(settings)
    }

    /// Apply CGTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("CGTREE")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("combine_tags")
                .with_list_parse_key("base_dimensions")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("tree_name") {
            settings.tree_name = val;
        }
        if let Ok(val) = config.get_string("default_base_name") {
            settings.default_base_name = val;
        }
        if let Ok(val) = config.get_float("library_version") {
            settings.library_version = val as f32;
        }
        if let Ok(val) = config.get::<Vec<i32>>("base_dimensions") {
            settings.base_dimensions = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("combine_tags") {
            settings.combine_tags = val;
        }
        if let Ok(val) = config.get_bool("combine_all") {
            settings.combine_all = val;
        }
        if let Ok(val) = config.get_bool("unique_zone_names") {
            settings.unique_zone_names = val;
        }
        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Expand `~`, `$VAR` and `${VAR}` in `data_dir`.
    fn expand_paths(&mut self) {
        if let Some(dir) = &self.data_dir {
            let raw = dir.to_string_lossy();
            let expanded = shellexpand::full(&raw)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            self.data_dir = Some(PathBuf::from(expanded));
        }
    }

    /// Resolve a user-supplied input path against `data_dir`.
    pub fn resolve_input(&self, path: &Path) -> PathBuf {
        match &self.data_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn entity_builder(&self) -> EntityBuilder {
        EntityBuilder {
            tree_name: self.tree_name.clone(),
            library_version: self.library_version,
            base_dimensions: self.base_dimensions.clone(),
        }
    }

    pub fn merge_policy(&self) -> MergePolicy {
        if self.combine_all {
            MergePolicy::CombineAll
        } else {
            MergePolicy::CombineContainers {
                tags: self.combine_tags.clone(),
            }
        }
    }

    /// Serialize to TOML, as shown by `config show`.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Template written by `config init`.
pub fn config_template() -> &'static str {
    r#"# cgtree configuration

# Name of assembled tree roots
# tree_name = "CGNSTree"

# Base receiving zones that have no group and no parent base
# default_base_name = "Base"

# library_version = 4.0
# base_dimensions = [3, 3]

# Combine every same-named node (true) or only containers and combine_tags (false)
# combine_all = false

# Tags that combine when combine_all = false. Prefix with "!" to drop an inherited tag.
# combine_tags = ["CGNSLibraryVersion_t"]

# Rename zones so no two zones in a tree share a name
# unique_zone_names = false

# Relative input paths resolve against this directory (supports ~ and $VAR)
# data_dir = "~/cgns"
"#
}
