//! File and directory rendering pipeline
//!
//! Orchestrates rendering outside the core engine:
//! 1. **Discovery**: walk the input directory for `.json`, `.md` and `.markdown` sources
//! 2. **Rendering**: render each source (optionally in parallel)
//! 3. **Export**: enhance and wrap each result as a standalone HTML page

use crate::enhancer::{enhance_html, Enhancer};
use crate::html_exporter::{to_html_page, write_html_page, HtmlExportError};
use crate::render_config::RendererConfig;
use crate::renderer::{RenderedDocument, Renderer};
use itertools::Itertools;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Source file extensions picked up by a directory build
pub const SOURCE_EXTENSIONS: &[&str] = &["json", "md", "markdown"];

/// Options for a directory build
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Enhancer applied to every rendered body before it is wrapped
    pub enhancer: Option<Enhancer>,

    /// Theme CSS embedded in every page
    pub highlight_css: Option<String>,
}

impl BuildOptions {
    /// Build options derived from the configuration's highlight section
    ///
    /// An unknown theme disables the theme CSS but keeps highlighting.
    pub fn from_config(config: &RendererConfig) -> Self {
        if !config.highlight.enabled {
            return Self::default();
        }

        let highlight_css = match crate::enhancer::theme_css(&config.highlight.theme) {
            Ok(css) => Some(css),
            Err(e) => {
                log::warn!("{}; pages will have no highlight styles", e);
                None
            }
        };

        Self {
            enhancer: Some(
                Enhancer::new().with_highlighter(crate::enhancer::SyntectHighlighter::new()),
            ),
            highlight_css,
        }
    }
}

/// Result of a directory build
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Pages written, in source path order
    pub written: Vec<PathBuf>,

    /// Sources that could not be rendered, with the reason
    pub skipped: Vec<(PathBuf, String)>,
}

/// Render a single source file
///
/// # Parameters
/// * `path` - Path to a `.json` or Markdown source
/// * `renderer` - Configured renderer
///
/// # Returns
/// * `Ok(RenderedDocument)` - The rendered document
/// * `Err(BuildError)` - The file could not be read
pub fn render_file(path: &Path, renderer: &Renderer) -> Result<RenderedDocument, BuildError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| BuildError::ReadError(path.to_path_buf(), e))?;
    Ok(renderer.render(&content))
}

/// Find every renderable source under `root`, sorted by path
pub fn discover_sources(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .map(|e| e.path().to_path_buf())
        .sorted()
        .collect()
}

/// Render every source under `input` to an HTML page under `output`
///
/// The directory layout is preserved; `guide/intro.md` becomes
/// `guide/intro.html`. A source that fails is logged and skipped, as is a source
/// whose page path was already claimed by an earlier source (`notes.md` after
/// `notes.json`).
///
/// # Returns
/// * `Ok(BuildReport)` - Pages written and sources skipped
/// * `Err(BuildError)` - The input is not a directory
pub fn build_directory(
    input: &Path,
    output: &Path,
    renderer: &Renderer,
    options: &BuildOptions,
) -> Result<BuildReport, BuildError> {
    if !input.is_dir() {
        return Err(BuildError::NotADirectory(input.to_path_buf()));
    }

    let sources = discover_sources(input);
    log::info!("Found {} source files in {}", sources.len(), input.display());

    let mut report = BuildReport::default();
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
    let mut jobs = Vec::with_capacity(sources.len());
    for source in sources {
        let target = page_path(&source, input, output);
        if let Some(first) = claimed.get(&target) {
            let e = BuildError::DuplicateOutput(target, first.clone());
            log::warn!("Skipping {}: {}", source.display(), e);
            report.skipped.push((source, e.to_string()));
            continue;
        }
        claimed.insert(target.clone(), source.clone());
        jobs.push((source, target));
    }

    #[cfg(feature = "parallel")]
    let results: Vec<_> = jobs
        .par_iter()
        .map(|(source, target)| build_page(source, target, renderer, options))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<_> = jobs
        .iter()
        .map(|(source, target)| build_page(source, target, renderer, options))
        .collect();

    for ((source, _), result) in jobs.into_iter().zip(results) {
        match result {
            Ok(page_path) => {
                log::info!("Wrote {}", page_path.display());
                report.written.push(page_path);
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", source.display(), e);
                report.skipped.push((source, e.to_string()));
            }
        }
    }

    Ok(report)
}

/// Render, enhance and write one page to `page_path`; returns the page path
fn build_page(
    source: &Path,
    page_path: &Path,
    renderer: &Renderer,
    options: &BuildOptions,
) -> Result<PathBuf, BuildError> {
    let mut doc = render_file(source, renderer)?;
    if let Some(ref enhancer) = options.enhancer {
        doc.html = enhance_html(&doc.html, enhancer);
    }

    let title = source.file_stem().and_then(|s| s.to_str());
    let page = to_html_page(
        &doc,
        &renderer.config().page,
        title,
        options.highlight_css.as_deref(),
    );

    write_html_page(&page, page_path)?;
    Ok(page_path.to_path_buf())
}

/// Output path of the page for `source`
fn page_path(source: &Path, input: &Path, output: &Path) -> PathBuf {
    let relative = source.strip_prefix(input).unwrap_or(source);
    output.join(relative).with_extension("html")
}

/// Build errors
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error reading {path}: {source}", path = .0.display(), source = .1)]
    ReadError(PathBuf, #[source] std::io::Error),

    #[error("Input is not a directory: {path}", path = .0.display())]
    NotADirectory(PathBuf),

    #[error("Page {page} is already built from {first}", page = .0.display(), first = .1.display())]
    DuplicateOutput(PathBuf, PathBuf),

    #[error(transparent)]
    ExportError(#[from] HtmlExportError),
}
