use std::{env, fs, path::PathBuf};

use tracing_subscriber::EnvFilter;

use chartlens_core::config::Config;
use chartlens_format::{format_analysis_markdown, ChartAnalysis, FormatOptions};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("chartlens=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let mut opts = FormatOptions::from(&config.settings()?.format);

    let mut path = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--include-empty" => opts.include_empty_sections = true,
            _ if !arg.starts_with('-') => path = Some(PathBuf::from(arg)),
            _ => { eprintln!("Unknown flag: {}", arg); std::process::exit(1); }
        }
    }
    let Some(path) = path else {
        eprintln!("Usage: chartlens-format <analysis.json> [--include-empty]");
        std::process::exit(1);
    };

    let raw = fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    let analysis: ChartAnalysis = serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
    print!("{}", format_analysis_markdown(&analysis, &opts));
    Ok(())
}
