//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/fenwick-diagram/fenwick-diagram.toml`
//! 3. Local config: `<project_dir>/.fenwick-diagram.toml`
//! 4. Environment variables: `FENWICK_DIAGRAM__*` prefix
//!
//! CLI flags are applied on top by the command layer.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, DiagramStyle, EdgeDirection, RankDir};

const APP_NAME: &str = "fenwick-diagram";
const ENV_PREFIX: &str = "FENWICK_DIAGRAM";

/// Node and canvas styling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StyleConfig {
    /// Node color (Graphviz color name or `#rrggbb`)
    pub node_color: String,
    /// Node style, e.g. `filled`
    pub node_style: String,
    /// Canvas size in inches: `"width,height"`
    pub size: String,
    /// Layout direction: TB, LR, BT or RL
    pub rankdir: RankDir,
}

impl Default for StyleConfig {
    fn default() -> Self {
        let style = DiagramStyle::default();
        Self {
            node_color: style.node_color,
            node_style: style.node_style,
            size: style.size,
            rankdir: style.rankdir,
        }
    }
}

/// Where and how the rendered diagram is written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// DOT source filename; the rendered file gets `.<format>` appended
    pub filename: String,
    /// Engine output format (`-T`), e.g. pdf, png, svg
    pub format: String,
    /// Output directory
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            filename: "fenwick_tree".into(),
            format: "pdf".into(),
            directory: PathBuf::from("."),
        }
    }
}

/// Raw style config for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawStyleConfig {
    pub node_color: Option<String>,
    pub node_style: Option<String>,
    pub size: Option<String>,
    pub rankdir: Option<RankDir>,
}

/// Raw output config for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawOutputConfig {
    pub filename: Option<String>,
    pub format: Option<String>,
    pub directory: Option<PathBuf>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub edge_direction: Option<EdgeDirection>,
    pub engine: Option<String>,
    pub layout: Option<String>,
    pub viewer: Option<String>,
    pub style: RawStyleConfig,
    pub output: RawOutputConfig,
}

/// Unified configuration for fenwick-diagram.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// How `(parent, child)` pairs are drawn
    pub edge_direction: EdgeDirection,
    /// Graphviz executable
    pub engine: String,
    /// Graphviz layout engine passed as `-K`
    pub layout: String,
    /// Viewer command; platform opener when unset.
    ///
    /// Split on whitespace into program and leading arguments, with no shell
    /// quoting. A program path containing spaces needs a wrapper script.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer: Option<String>,
    pub style: StyleConfig,
    pub output: OutputConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            edge_direction: EdgeDirection::ChildToParent,
            engine: "dot".into(),
            layout: "dot".into(),
            viewer: None,
            style: StyleConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Get the XDG config directory for fenwick-diagram.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(format!("{APP_NAME}.toml")))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(format!(".{APP_NAME}.toml"))
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

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Style handed to the diagram builder.
    pub fn diagram_style(&self) -> DiagramStyle {
        DiagramStyle {
            node_color: self.style.node_color.clone(),
            node_style: self.style.node_style.clone(),
            size: self.style.size.clone(),
            rankdir: self.style.rankdir,
            edge_direction: self.edge_direction,
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.output.directory.to_string_lossy().as_ref());
        self.output.directory = PathBuf::from(expanded);

        self.engine = expand_env_vars(&self.engine);
    }

    /// Overlay a parsed config file: fields it specifies win.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            edge_direction: overlay.edge_direction.unwrap_or(self.edge_direction),
            engine: overlay.engine.clone().unwrap_or_else(|| self.engine.clone()),
            layout: overlay.layout.clone().unwrap_or_else(|| self.layout.clone()),
            viewer: overlay.viewer.clone().or_else(|| self.viewer.clone()),
            style: StyleConfig {
                node_color: overlay
                    .style
                    .node_color
                    .clone()
                    .unwrap_or_else(|| self.style.node_color.clone()),
                node_style: overlay
                    .style
                    .node_style
                    .clone()
                    .unwrap_or_else(|| self.style.node_style.clone()),
                size: overlay
                    .style
                    .size
                    .clone()
                    .unwrap_or_else(|| self.style.size.clone()),
                rankdir: overlay.style.rankdir.unwrap_or(self.style.rankdir),
            },
            output: OutputConfig {
                filename: overlay
                    .output
                    .filename
                    .clone()
                    .unwrap_or_else(|| self.output.filename.clone()),
                format: overlay
                    .output
                    .format
                    .clone()
                    .unwrap_or_else(|| self.output.format.clone()),
                directory: overlay
                    .output
                    .directory
                    .clone()
                    .unwrap_or_else(|| self.output.directory.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for local config
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(global_config_path().as_deref(), project_dir)
    }

    /// Load settings from an explicit global config path.
    ///
    /// Missing files are skipped. Environment overrides are applied last.
    pub fn load_layers(
        global_path: Option<&Path>,
        project_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_path {
            if global_path.exists() {
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local project config
        if let Some(project) = project_dir {
            let local_path = local_config_path(project);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        current.diagram_style().validate()?;

        Ok(current)
    }

    /// Apply FENWICK_DIAGRAM__* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("edge_direction") {
            settings.edge_direction = val.parse()?;
        }
        if let Ok(val) = config.get_string("engine") {
            settings.engine = val;
        }
        if let Ok(val) = config.get_string("layout") {
            settings.layout = val;
        }
        if let Ok(val) = config.get_string("viewer") {
            settings.viewer = Some(val);
        }
        if let Ok(val) = config.get_string("style.node_color") {
            settings.style.node_color = val;
        }
        if let Ok(val) = config.get_string("style.node_style") {
            settings.style.node_style = val;
        }
        if let Ok(val) = config.get_string("style.size") {
            settings.style.size = val;
        }
        if let Ok(val) = config.get_string("style.rankdir") {
            settings.style.rankdir = val.parse()?;
        }
        if let Ok(val) = config.get_string("output.filename") {
            settings.output.filename = val;
        }
        if let Ok(val) = config.get_string("output.format") {
            settings.output.format = val;
        }
        if let Ok(val) = config.get_string("output.directory") {
            settings.output.directory = PathBuf::from(val);
        }

        Ok(settings)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {e}"),
        })
    }
}

/// Commented config template written by `config init`.
pub fn config_template() -> String {
    r#"# fenwick-diagram configuration
#
# edge_direction = "child-to-parent"   # or "parent-to-child"
# engine = "dot"                       # Graphviz executable
# layout = "dot"                       # layout engine (-K)
# viewer = "xdg-open"                  # default: platform opener

[style]
# node_color = "lightblue2"
# node_style = "filled"
# size = "8,5"
# rankdir = "TB"                       # TB | LR | BT | RL

[output]
# filename = "fenwick_tree"
# format = "pdf"
# directory = "."
"#
    .to_string()
}
