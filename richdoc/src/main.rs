//! richdoc - rich-document rendering CLI
//!
//! Renders document trees and Markdown to HTML fragments, standalone pages
//! and tables of contents.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, TocFormat};
use richdoc::enhancer::{enhance_html, theme_css, Enhancer, SyntectHighlighter};
use richdoc::html_exporter::{to_html_page, write_html_page};
use richdoc::pipeline::{self, BuildOptions};
use richdoc::render_config::{RendererConfig, CONFIG_FILE_NAME};
use richdoc::renderer::{sniff, Renderer, SniffedContent, TocEntry};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Main entry point for the richdoc CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging if verbose
    if cli.command.verbose() {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    match cli.command {
        Commands::Render {
            input,
            output,
            config,
            page,
            highlight,
            verbose: _,
        } => {
            handle_render_command(input, output, config, page, highlight)?;
        }

        Commands::Toc {
            input,
            format,
            config,
            verbose: _,
        } => {
            handle_toc_command(input, format, config)?;
        }

        Commands::Build {
            input,
            output,
            config,
            verbose: _,
        } => {
            handle_build_command(input, output, config)?;
        }

        Commands::InitConfig {
            path,
            force,
            verbose: _,
        } => {
            handle_init_config_command(path, force)?;
        }
    }

    Ok(())
}

/// Handle the render command
fn handle_render_command(
    input: PathBuf,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    page: bool,
    highlight: bool,
) -> Result<()> {
    let config = load_config(config_path.as_deref(), Path::new(CONFIG_FILE_NAME))?;
    let renderer = Renderer::new(config);

    let content = read_input(&input)?;
    let mut doc = renderer.render(&content);
    log::info!(
        "Rendered {} as {:?} ({} headings)",
        input.display(),
        doc.source,
        doc.toc.iter().map(|e| e.flatten().len()).sum::<usize>()
    );

    if highlight {
        let enhancer = Enhancer::new().with_highlighter(SyntectHighlighter::new());
        doc.html = enhance_html(&doc.html, &enhancer);
    }

    let html = if page {
        let highlight_css = if highlight {
            let theme = &renderer.config().highlight.theme;
            Some(theme_css(theme).with_context(|| format!("Failed to load theme '{}'", theme))?)
        } else {
            None
        };
        let title = input
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|stem| *stem != "-");
        to_html_page(&doc, &renderer.config().page, title, highlight_css.as_deref())
    } else {
        doc.html
    };

    match output {
        Some(path) => {
            write_html_page(&html, &path)
                .with_context(|| format!("Failed to write HTML to {}", path.display()))?;
            println!("✓ Successfully wrote: {}", path.display());
        }
        None => print!("{}", html),
    }

    Ok(())
}

/// Handle the toc command
fn handle_toc_command(
    input: PathBuf,
    format: TocFormat,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path.as_deref(), Path::new(CONFIG_FILE_NAME))?;
    let renderer = Renderer::new(config);

    let content = read_input(&input)?;
    let toc = match sniff(&content) {
        SniffedContent::Structured(root) => renderer.toc(&root),
        SniffedContent::Markdown(_) => renderer.render(&content).toc,
    };

    match format {
        TocFormat::Json => {
            let json = serde_json::to_string_pretty(&toc)
                .context("Failed to serialize table of contents")?;
            println!("{}", json);
        }
        TocFormat::Text => print_toc(&toc, 0),
    }

    Ok(())
}

/// Handle the build command
fn handle_build_command(
    input: PathBuf,
    output: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path.as_deref(), &input.join(CONFIG_FILE_NAME))?;
    let options = BuildOptions::from_config(&config);
    let renderer = Renderer::new(config);

    println!("Building documents...");
    println!("Input: {}", input.display());
    println!("Output: {}", output.display());

    let report = pipeline::build_directory(&input, &output, &renderer, &options)
        .with_context(|| format!("Failed to build {}", input.display()))?;

    for (path, reason) in &report.skipped {
        println!("✗ Skipped {}: {}", path.display(), reason);
    }
    println!("\n✓ Wrote {} pages", report.written.len());

    if !report.skipped.is_empty() {
        anyhow::bail!("{} documents could not be rendered", report.skipped.len());
    }

    Ok(())
}

/// Handle the init-config command
fn handle_init_config_command(path: Option<PathBuf>, force: bool) -> Result<()> {
    let target_path = path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

    if target_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it",
            target_path.display()
        );
    }

    if let Some(parent) = target_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    RendererConfig::default()
        .save(&target_path)
        .with_context(|| format!("Failed to write {}", target_path.display()))?;

    println!("✓ Successfully wrote: {}", target_path.display());
    Ok(())
}

/// Load the explicit configuration file, or `fallback` if it exists
fn load_config(explicit: Option<&Path>, fallback: &Path) -> Result<RendererConfig> {
    match explicit {
        Some(path) => RendererConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display())),
        None => RendererConfig::load_or_default(fallback)
            .with_context(|| format!("Failed to load configuration {}", fallback.display())),
    }
}

/// Read a file, or stdin when the path is `-`
fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read from stdin")?;
        return Ok(content);
    }

    std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))
}

/// Print an indented outline
fn print_toc(entries: &[TocEntry], depth: usize) {
    for entry in entries {
        println!("{}- {} (#{})", "  ".repeat(depth), entry.text, entry.id);
        print_toc(&entry.children, depth + 1);
    }
}
