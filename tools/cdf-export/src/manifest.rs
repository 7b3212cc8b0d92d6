//! Manifest parsing and build orchestration
//!
//! Parses assets.toml and runs one export per entry.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::export::{export_files, ExportOptions, ExportSummary};
use crate::formats::CDF_MESH_EXT;
use crate::mesh::UpAxis;

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    /// Output name -> sources; ordered so builds are reproducible
    #[serde(default)]
    pub exports: BTreeMap<String, ExportEntry>,
    /// Directory relative source paths resolve against
    #[serde(skip)]
    pub root: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default)]
    pub debug_json: bool,
    /// Unset: each loader's own convention
    #[serde(default)]
    pub up_axis: Option<UpAxis>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            debug_json: false,
            up_axis: None,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("assets/")
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ExportEntry {
    Simple(PathBuf),
    Detailed {
        sources: Vec<PathBuf>,
        #[serde(default)]
        debug_json: Option<bool>,
        #[serde(default)]
        up_axis: Option<UpAxis>,
    },
}

impl ExportEntry {
    pub fn sources(&self) -> &[PathBuf] {
        match self {
            ExportEntry::Simple(p) => std::slice::from_ref(p),
            ExportEntry::Detailed { sources, .. } => sources,
        }
    }

    /// Entry flags with the `[output]` defaults filled in
    pub fn options(&self, defaults: &OutputConfig) -> ExportOptions {
        match self {
            ExportEntry::Simple(_) => ExportOptions {
                debug_json: defaults.debug_json,
                up_axis: defaults.up_axis,
            },
            ExportEntry::Detailed {
                debug_json,
                up_axis,
                ..
            } => ExportOptions {
                debug_json: debug_json.unwrap_or(defaults.debug_json),
                up_axis: up_axis.or(defaults.up_axis),
            },
        }
    }
}

impl Manifest {
    /// Parse manifest text; relative paths resolve against `root`
    pub fn from_toml(content: &str, root: &Path) -> Result<Self> {
        let mut manifest: Manifest = toml::from_str(content)?;
        manifest.root = root.to_path_buf();
        Ok(manifest)
    }

    /// Absolute (or cwd-relative) path of a manifest-relative path
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let root = path.parent().unwrap_or_else(|| Path::new(""));
    Manifest::from_toml(&content, root)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))
}

/// Validate a manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    for (name, entry) in &manifest.exports {
        if entry.sources().is_empty() {
            bail!("Export '{}' has no sources", name);
        }
        for source in entry.sources() {
            let path = manifest.resolve(source);
            if !path.exists() {
                bail!("Export '{}' source not found: {:?}", name, path);
            }
        }
    }
    Ok(())
}

/// Build all exports from a manifest
pub fn build_all(manifest: &Manifest, output_override: Option<&Path>) -> Result<Vec<ExportSummary>> {
    validate(manifest)?;

    let output_dir = match output_override {
        Some(dir) => dir.to_path_buf(),
        None => manifest.resolve(&manifest.output.dir),
    };
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let mut summaries = Vec::with_capacity(manifest.exports.len());
    for (name, entry) in &manifest.exports {
        let output = output_dir.join(format!("{}.{}", name, CDF_MESH_EXT));
        tracing::info!("Exporting: {} -> {:?}", name, output);

        let sources: Vec<PathBuf> = entry
            .sources()
            .iter()
            .map(|s| manifest.resolve(s))
            .collect();
        let summary = export_files(&sources, &output, &entry.options(&manifest.output))
            .with_context(|| format!("Export '{}' failed", name))?;
        summaries.push(summary);
    }

    Ok(summaries)
}
