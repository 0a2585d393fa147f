//! Diagram rendering service
//!
//! Builds the Fenwick tree graph, writes its DOT source and hands it to the
//! Graphviz engine. The engine is run as
//! `<engine> -K<layout> -T<format> -O <source>`, which writes the rendered
//! file next to the source as `<source>.<format>`.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{fenwick_diagram, validate_output_filename, Digraph};
use crate::infrastructure::traits::{CommandRunner, FileSystem};
use crate::infrastructure::InfraError;

/// Platform command used to open a rendered file when no viewer is configured.
pub fn default_viewer() -> &'static [&'static str] {
    if cfg!(target_os = "macos") {
        &["open"]
    } else if cfg!(target_os = "windows") {
        &["cmd", "/C", "start", ""]
    } else {
        &["xdg-open"]
    }
}

/// Diagram build/render/view service.
pub struct DiagramService {
    fs: Arc<dyn FileSystem>,
    cmd: Arc<dyn CommandRunner>,
    settings: Arc<Settings>,
}

impl DiagramService {
    /// Create a new diagram service.
    pub fn new(
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        settings: Arc<Settings>,
    ) -> Self {
        Self { fs, cmd, settings }
    }

    /// Build the Fenwick tree graph with the configured style.
    pub fn build(&self) -> ApplicationResult<Digraph> {
        let style = self.settings.diagram_style();
        style.validate()?;
        let graph = fenwick_diagram(&style);
        debug!(
            "build: {} nodes, {} edges, {}",
            graph.nodes().len(),
            graph.edges().len(),
            graph.edge_direction()
        );
        Ok(graph)
    }

    /// Directory the source and rendered files are written to.
    pub fn output_dir(&self) -> &Path {
        &self.settings.output.directory
    }

    /// Path of the DOT source for `filename`.
    pub fn source_path(&self, filename: &str) -> PathBuf {
        self.output_dir().join(filename)
    }

    /// Path of the rendered file for `filename`: `<source>.<format>`.
    pub fn rendered_path(&self, filename: &str) -> PathBuf {
        let mut name = OsString::from(self.source_path(filename));
        name.push(".");
        name.push(&self.settings.output.format);
        PathBuf::from(name)
    }

    /// Write `graph` as DOT to `<output_dir>/<filename>`.
    ///
    /// An existing file with identical content is left untouched.
    pub fn save_source(&self, graph: &Digraph, filename: &str) -> ApplicationResult<PathBuf> {
        validate_output_filename(filename)?;
        let dir = self.output_dir();
        if !dir.as_os_str().is_empty() && !self.fs.exists(dir) {
            self.fs
                .create_dir_all(dir)
                .with_path_context("create output directory", dir)?;
        }

        let path = self.source_path(filename);
        let dot = graph.to_dot();
        let unchanged = self.fs.exists(&path)
            && self.fs.read_to_string(&path).ok().as_deref() == Some(dot.as_str());
        if unchanged {
            debug!("save_source: unchanged {}", path.display());
            return Ok(path);
        }
        self.fs
            .write(&path, &dot)
            .with_path_context("write DOT source", &path)?;
        debug!("save_source: wrote {} bytes to {}", dot.len(), path.display());
        Ok(path)
    }

    /// Save the DOT source and run the engine on it.
    ///
    /// Returns the path of the rendered file.
    #[instrument(skip(self, graph))]
    pub fn render(&self, graph: &Digraph, filename: &str) -> ApplicationResult<PathBuf> {
        let source = self.save_source(graph, filename)?;
        let source_arg = source.to_string_lossy().into_owned();
        let layout_arg = format!("-K{}", self.settings.layout);
        let format_arg = format!("-T{}", self.settings.output.format);
        let args = [layout_arg.as_str(), format_arg.as_str(), "-O", source_arg.as_str()];
        let engine = self.settings.engine.as_str();
        debug!("render: {} {}", engine, args.join(" "));

        let output = self
            .cmd
            .run(engine, &args)
            .map_err(|e| engine_error(engine, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ApplicationError::OperationFailed {
                context: format!("render {}", source.display()),
                source: Box::new(InfraError::Engine {
                    message: stderr.trim().to_string(),
                    exit_code: output.status.code(),
                }),
            });
        }

        let rendered = self.rendered_path(filename);
        info!("rendered {}", rendered.display());
        Ok(rendered)
    }

    /// Open a rendered file in the configured viewer.
    #[instrument(skip(self))]
    pub fn open(&self, path: &Path) -> ApplicationResult<()> {
        let configured: Vec<&str> = self
            .settings
            .viewer
            .as_deref()
            .map(|v| v.split_whitespace().collect())
            .unwrap_or_default();
        let viewer: &[&str] = if configured.is_empty() {
            default_viewer()
        } else {
            &configured
        };
        let (program, leading) = viewer
            .split_first()
            .ok_or_else(|| viewer_error("empty viewer command"))?;

        let target = path.to_string_lossy().into_owned();
        let mut args: Vec<&str> = leading.to_vec();
        args.push(target.as_str());
        debug!("open: {} {}", program, args.join(" "));

        let output = self.cmd.run(program, &args).map_err(|e| {
            let message = if e.kind() == io::ErrorKind::NotFound {
                format!("viewer not found: {program}")
            } else {
                format!("run {program}: {e}")
            };
            viewer_error(message)
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(viewer_error(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }

    /// Render to the configured filename and open the result.
    pub fn view(&self, graph: &Digraph) -> ApplicationResult<PathBuf> {
        let rendered = self.render(graph, &self.settings.output.filename)?;
        self.open(&rendered)?;
        Ok(rendered)
    }

    /// Build the diagram, optionally view it, then render it to the output file.
    #[instrument(skip(self))]
    pub fn draw(&self, view: bool) -> ApplicationResult<PathBuf> {
        let graph = self.build()?;
        if view {
            self.view(&graph)?;
        }
        self.render(&graph, &self.settings.output.filename)
    }
}

fn engine_error(engine: &str, e: io::Error) -> ApplicationError {
    let source = if e.kind() == io::ErrorKind::NotFound {
        InfraError::EngineNotFound {
            command: engine.to_string(),
        }
    } else {
        InfraError::io(format!("run {engine}"), e)
    };
    ApplicationError::OperationFailed {
        context: format!("run rendering engine {engine}"),
        source: Box::new(source),
    }
}

fn viewer_error(message: impl Into<String>) -> ApplicationError {
    let message = message.into();
    ApplicationError::OperationFailed {
        context: "open viewer".to_string(),
        source: Box::new(InfraError::Viewer { message }),
    }
}
