//! Layer export
//!
//! Drives the per-layer loop: filter the parsed document down to the base
//! layer plus one renderable layer, write it next to the output images and
//! hand it to a [`Rasterizer`].

pub mod rasterize;

use crate::error::{ExportError, Result};
use crate::layers::{LayerGroup, classify, filter_for_layer};
use crate::svg::{load_document, save_document};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub use rasterize::{InkscapeCli, InkscapeRasterizer, Rasterizer, ResvgRasterizer};

pub const DEFAULT_DPI: u32 = 90;

/// Options for a layer export run
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub dpi: u32,
    /// Keep the intermediate SVG written for each layer
    pub keep_svg: bool,
    /// Export only these layer labels (all renderable layers when `None`)
    pub layers: Option<Vec<String>>,
}

impl ExportOptions {
    pub fn new(source: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output_dir: output_dir.into(),
            dpi: DEFAULT_DPI,
            keep_svg: false,
            layers: None,
        }
    }
}

/// Replace anything but alphanumerics, `-`, `_` and `.` with `_`
pub fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `{source}_{label}_{dpi}dpi.png`
pub fn output_file_name(source_name: &str, label: &str, dpi: u32) -> String {
    format!("{}_{}_{}dpi.png", source_name, sanitize_label(label), dpi)
}

/// `{source}_{label}.svg`
pub fn intermediate_file_name(source_name: &str, label: &str) -> String {
    format!("{}_{}.svg", source_name, sanitize_label(label))
}

/// One exported layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedLayer {
    pub label: String,
    pub png: PathBuf,
    /// Intermediate SVG, when kept
    pub svg: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub base: LayerGroup,
    pub exported: Vec<ExportedLayer>,
}

/// Progress notifications from [`Exporter::run_with_progress`]
#[derive(Debug)]
pub enum Progress<'a> {
    Started { total: usize },
    LayerDone(&'a ExportedLayer),
}

pub struct Exporter {
    options: ExportOptions,
    source_name: String,
    rasterizer: Box<dyn Rasterizer>,
}

impl Exporter {
    /// Create the exporter, creating the output directory if it is missing
    pub fn new(options: ExportOptions, rasterizer: Box<dyn Rasterizer>) -> Result<Self> {
        if !options.output_dir.exists() {
            std::fs::create_dir_all(&options.output_dir)
                .map_err(|e| ExportError::io(&options.output_dir, e))?;
            info!("created output directory {}", options.output_dir.display());
        }

        let source_name = options
            .source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "export".to_string());

        Ok(Self {
            options,
            source_name,
            rasterizer,
        })
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn run(&self) -> Result<ExportSummary> {
        self.run_with_progress(|_| {})
    }

    pub fn run_with_progress(
        &self,
        mut on_progress: impl FnMut(Progress<'_>),
    ) -> Result<ExportSummary> {
        let doc = load_document(&self.options.source)?;
        let classification = classify(&doc)?;
        let targets = self.select_targets(classification.others)?;
        check_output_names(&self.source_name, &targets)?;
        let base = classification.base;

        on_progress(Progress::Started {
            total: targets.len(),
        });

        let mut exported = Vec::with_capacity(targets.len());
        for target in &targets {
            debug!("exporting layer {} over {}", target.label, base.label);
            let filtered = filter_for_layer(&doc, &base.label, &target.label);

            let svg = self
                .options
                .output_dir
                .join(intermediate_file_name(&self.source_name, &target.label));
            let png = self.options.output_dir.join(output_file_name(
                &self.source_name,
                &target.label,
                self.options.dpi,
            ));

            save_document(&filtered, &svg)?;
            self.rasterizer.rasterize(&svg, &png, self.options.dpi)?;
            info!("wrote {}", png.display());

            let kept_svg = if self.options.keep_svg {
                Some(svg)
            } else {
                remove_file(&svg)?;
                None
            };

            exported.push(ExportedLayer {
                label: target.label.clone(),
                png,
                svg: kept_svg,
            });
            if let Some(layer) = exported.last() {
                on_progress(Progress::LayerDone(layer));
            }
        }

        Ok(ExportSummary { base, exported })
    }

    /// Restrict renderable layers to the requested labels, keeping document order
    fn select_targets(&self, others: Vec<LayerGroup>) -> Result<Vec<LayerGroup>> {
        let Some(wanted) = &self.options.layers else {
            return Ok(others);
        };

        if let Some(missing) = wanted
            .iter()
            .find(|w| !others.iter().any(|l| &l.label == *w))
        {
            return Err(ExportError::UnknownLayer(missing.clone()));
        }

        Ok(others
            .into_iter()
            .filter(|l| wanted.contains(&l.label))
            .collect())
    }
}

/// Reject targets that cannot get an output of their own.
///
/// Layers are selected by label, so a repeated label would put both layers in
/// one image, and labels that sanitize alike would overwrite each other.
fn check_output_names(source_name: &str, targets: &[LayerGroup]) -> Result<()> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for target in targets {
        let file = intermediate_file_name(source_name, &target.label);
        if let Some(first) = seen.insert(file.clone(), &target.label) {
            if first == target.label {
                return Err(ExportError::DuplicateLayer(target.label.clone()));
            }
            return Err(ExportError::NameCollision {
                file,
                first: first.to_string(),
                second: target.label.clone(),
            });
        }
    }
    Ok(())
}

fn remove_file(path: &Path) -> Result<()> {
    std::fs::remove_file(path).map_err(|e| ExportError::io(path, e))
}
