use crate::error::{ExportError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tracing::debug;

/// User units per inch assumed by SVG renderers
pub const SVG_USER_UNITS_PER_INCH: f32 = 96.0;

/// Environment variable naming the Inkscape executable
pub const INKSCAPE_ENV: &str = "INKSCAPE_BIN";

/// Turns an SVG file into a PNG of the whole page
pub trait Rasterizer {
    fn name(&self) -> &str;

    fn rasterize(&self, svg: &Path, png: &Path, dpi: u32) -> Result<()>;
}

/// Command line dialect of the Inkscape executable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InkscapeCli {
    /// Inkscape 0.92 and older
    Legacy,
    /// Inkscape 1.x
    #[default]
    Modern,
}

/// Runs Inkscape as a subprocess
#[derive(Debug, Clone)]
pub struct InkscapeRasterizer {
    program: PathBuf,
    cli: InkscapeCli,
}

impl Default for InkscapeRasterizer {
    fn default() -> Self {
        Self::new("inkscape", InkscapeCli::default())
    }
}

impl InkscapeRasterizer {
    pub fn new(program: impl Into<PathBuf>, cli: InkscapeCli) -> Self {
        Self {
            program: program.into(),
            cli,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments passed to Inkscape for one export
    pub fn command_args(&self, svg: &Path, png: &Path, dpi: u32) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        match self.cli {
            InkscapeCli::Legacy => {
                args.push("--without-gui".into());
                args.push("--export-area-page".into());
                let mut export = OsString::from("--export-png=");
                export.push(png);
                args.push(export);
            }
            InkscapeCli::Modern => {
                args.push("--export-area-page".into());
                args.push("--export-type=png".into());
                let mut export = OsString::from("--export-filename=");
                export.push(png);
                args.push(export);
            }
        }
        args.push(format!("--export-dpi={}", dpi).into());
        args.push(svg.into());
        args
    }
}

impl Rasterizer for InkscapeRasterizer {
    fn name(&self) -> &str {
        "inkscape"
    }

    fn rasterize(&self, svg: &Path, png: &Path, dpi: u32) -> Result<()> {
        let args = self.command_args(svg, png, dpi);
        debug!("running {} {:?}", self.program.display(), args);

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| ExportError::RasterizerSpawn {
                program: self.program.clone(),
                source,
            })?;

        debug!(
            "----- Inkscape output -----\n{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );

        if !output.status.success() {
            return Err(ExportError::RasterizerFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Renders in-process with resvg
pub struct ResvgRasterizer {
    options: usvg::Options<'static>,
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ResvgRasterizer {
    /// `resources_dir` resolves relative `href`s, normally the source file's directory
    pub fn new(resources_dir: Option<PathBuf>) -> Self {
        let mut options = usvg::Options {
            resources_dir,
            ..Default::default()
        };
        Arc::make_mut(&mut options.fontdb).load_system_fonts();
        Self { options }
    }

    /// Pixel size of the page at `dpi`
    pub fn page_size(tree: &usvg::Tree, dpi: u32) -> Result<(u32, u32, f32)> {
        let scale = dpi as f32 / SVG_USER_UNITS_PER_INCH;
        let size = tree.size();
        let to_px = |v: f32| -> Result<u32> {
            let px = (v * scale).ceil();
            if !px.is_finite() || px < 1.0 {
                return Err(ExportError::render("svg has invalid width/height"));
            }
            Ok(px as u32)
        };
        Ok((to_px(size.width())?, to_px(size.height())?, scale))
    }
}

impl Rasterizer for ResvgRasterizer {
    fn name(&self) -> &str {
        "resvg"
    }

    fn rasterize(&self, svg: &Path, png: &Path, dpi: u32) -> Result<()> {
        let data = std::fs::read(svg).map_err(|e| ExportError::io(svg, e))?;
        let tree = usvg::Tree::from_data(&data, &self.options)
            .map_err(|e| ExportError::render(format!("failed to parse SVG: {}", e)))?;

        let (width, height, scale) = Self::page_size(&tree, dpi)?;
        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| ExportError::render(format!("failed to allocate {width}x{height} pixmap")))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        // tiny-skia stores premultiplied alpha, PNG wants straight alpha
        let mut rgba = Vec::with_capacity(pixmap.data().len());
        for px in pixmap.pixels() {
            let c = px.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }

        image::save_buffer_with_format(
            png,
            &rgba,
            width,
            height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )?;
        debug!("rendered {}x{} px to {}", width, height, png.display());
        Ok(())
    }
}
