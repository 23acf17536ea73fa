//! Mathsmith CLI
//!
//! Usage:
//!   mathsmith [OPTIONS] [FILE]
//!
//! The formula source comes from FILE, stdin, a named preset, or a natural
//! language description (--describe, requires a generation API key). The
//! rendered standalone SVG goes to stdout or --output.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mathsmith::engine::MathJaxCli;
use mathsmith::generate::{FormulaGenerator, GeminiGenerator};
use mathsmith::{
    presets, render_with_config, ExportConfig, FontVariant, RenderConfig, StyleConfig,
};

#[derive(Parser)]
#[command(name = "mathsmith")]
#[command(about = "Typeset math formulas into print-ready standalone SVG")]
struct Cli {
    /// Input file with formula source (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Render a built-in preset formula (see --list-presets)
    #[arg(short, long, conflicts_with = "describe")]
    preset: Option<String>,

    /// Generate the formula from a natural language description
    #[arg(long)]
    describe: Option<String>,

    /// List built-in presets and exit
    #[arg(long)]
    list_presets: bool,

    /// Style file (TOML: font_size, color, variant)
    #[arg(short, long)]
    style: Option<PathBuf>,

    /// Font size in pixels (overrides the style file)
    #[arg(long)]
    font_size: Option<u32>,

    /// Color as #RGB or #RRGGBB (overrides the style file)
    #[arg(long)]
    color: Option<String>,

    /// Font variant (overrides the style file)
    #[arg(long, value_enum)]
    variant: Option<FontVariant>,

    /// Typeset inline rather than in display mode
    #[arg(long)]
    inline: bool,

    /// Omit the XML declaration from the output
    #[arg(long)]
    no_declaration: bool,

    /// Path to the MathJax tex2svg executable
    #[arg(long, env = "MATHSMITH_TEX2SVG", default_value = "tex2svg")]
    engine: PathBuf,

    /// Output file (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.list_presets {
        print_presets();
        return;
    }

    // If no formula source of any kind and stdin is a terminal, show intro
    if cli.input.is_none()
        && cli.preset.is_none()
        && cli.describe.is_none()
        && io::stdin().is_terminal()
    {
        print_intro();
        return;
    }

    let style = match load_style(&cli) {
        Ok(style) => style,
        Err(e) => {
            eprintln!("Error in style configuration: {}", e);
            std::process::exit(1);
        }
    };

    let source = match resolve_source(&cli).await {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let config = RenderConfig::new()
        .with_style(style)
        .with_export(ExportConfig::new().with_standalone(!cli.no_declaration))
        .with_inline(cli.inline);
    let engine = MathJaxCli::new(cli.engine.clone());

    match render_with_config(&source, &engine, config).await {
        Ok(svg) => match &cli.output {
            Some(path) => {
                if let Err(e) = fs::write(path, &svg) {
                    eprintln!("Error writing '{}': {}", path.display(), e);
                    std::process::exit(1);
                }
            }
            None => println!("{}", svg),
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Combine the style file (if any) with command line overrides
fn load_style(cli: &Cli) -> Result<StyleConfig, mathsmith::StyleError> {
    let base = match &cli.style {
        Some(path) => StyleConfig::from_file(path)?,
        None => StyleConfig::default(),
    };
    StyleConfig::new(
        cli.font_size.unwrap_or(base.font_size_px),
        cli.color.clone().unwrap_or(base.color_hex),
        cli.variant.unwrap_or(base.variant),
    )
}

/// Pick the formula source: description, preset, file, or stdin
async fn resolve_source(cli: &Cli) -> Result<String, String> {
    if let Some(prompt) = &cli.describe {
        let generator =
            GeminiGenerator::from_env().map_err(|e| e.to_string())?;
        return generator.generate(prompt).await.map_err(|e| e.to_string());
    }

    if let Some(name) = &cli.preset {
        return match presets::find(name) {
            Some(preset) => Ok(preset.source.to_string()),
            None => Err(format!(
                "unknown preset '{}' (run --list-presets for the catalog)",
                name
            )),
        };
    }

    match &cli.input {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("failed to read file '{}': {}", path.display(), e)),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("failed to read from stdin: {}", e))?;
            Ok(buffer)
        }
    }
}

fn print_presets() {
    for preset in presets::PRESETS {
        println!("{:<12} {}", preset.name, preset.source);
    }
}

fn print_intro() {
    println!(
        r#"Mathsmith - typeset math formulas into print-ready standalone SVG

USAGE:
    mathsmith [OPTIONS] [FILE]
    echo '<formula>' | mathsmith

OPTIONS:
    -p, --preset <NAME>    Render a built-in preset (--list-presets for names)
    --describe <TEXT>      Generate the formula from a description (needs GEMINI_API_KEY)
    -s, --style <FILE>     Style file (TOML: font_size, color, variant)
    --font-size <PX>       Font size in pixels
    --color <HEX>          Color as #RGB or #RRGGBB
    --variant <VARIANT>    standard | serif | sans-serif | monospace
    --inline               Inline rather than display layout
    --engine <PATH>        MathJax tex2svg executable (default: tex2svg on PATH)
    -o, --output <FILE>    Write SVG to a file instead of stdout
    -h, --help             Print help

QUICK START:
    echo 'x = \frac{{-b \pm \sqrt{{b^2 - 4ac}}}}{{2a}}' | mathsmith --color '#1a1a1a' > formula.svg

Requires the MathJax CLI: npm install -g mathjax-node-cli"#
    );
}
