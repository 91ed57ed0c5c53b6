use std::env;
use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use chartlens_core::config::{resolve_with_base, Config};
use chartlens_core::loader::HistoryLoader;
use chartlens_core::types::Document;
use chartlens_text::LexicalIndex;

struct Args {
    cmd: String,
    query: Vec<String>,
    dir: Option<PathBuf>,
    top_k: Option<usize>,
    limit: Option<usize>,
    rag: bool,
}

fn usage(prog: &str) -> ! {
    eprintln!("Usage: {} <query|context|stats> [--dir <history dir>] [--top-k <n>] [--limit <files>] [--rag] [query text...]", prog);
    std::process::exit(1);
}

fn parse_number(flag: &str, value: Option<&String>) -> usize {
    match value.and_then(|v| v.parse::<usize>().ok()) {
        Some(n) => n,
        None => { eprintln!("Error: {} requires a number", flag); std::process::exit(1); }
    }
}

fn parse_args() -> Args {
    let mut raw: Vec<String> = env::args().collect();
    let prog = raw.remove(0);
    if raw.is_empty() { usage(&prog); }
    let cmd = raw.remove(0);
    let mut args = Args { cmd, query: Vec::new(), dir: None, top_k: None, limit: None, rag: false };
    let mut i = 0;
    while i < raw.len() {
        match raw[i].as_str() {
            "--dir" | "-d" => { i += 1; match raw.get(i) { Some(d) => args.dir = Some(PathBuf::from(d)), None => usage(&prog) } }
            "--top-k" | "-k" => { i += 1; args.top_k = Some(parse_number("--top-k", raw.get(i))); }
            "--limit" => { i += 1; args.limit = Some(parse_number("--limit", raw.get(i))); }
            "--rag" => args.rag = true,
            "--help" | "-h" => usage(&prog),
            other => args.query.push(other.to_string()),
        }
        i += 1;
    }
    args
}

fn build_index(documents: Vec<Document>) -> anyhow::Result<LexicalIndex> {
    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents ({percent}%)")?
            .progress_chars("#>-"),
    );
    let mut index = LexicalIndex::new();
    for doc in documents {
        index.add_document(doc);
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(index)
}

fn preview(content: &str) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > 100 { format!("{}…", flat.chars().take(100).collect::<String>()) } else { flat }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("chartlens=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    let args = parse_args();

    let cwd = env::current_dir()?;
    let history_dir = args.dir.clone().unwrap_or_else(|| resolve_with_base(&cwd, &settings.data.history_dir));
    let top_k = args.top_k.unwrap_or(settings.retrieval.top_k);

    let loader = HistoryLoader::new();
    let documents = match args.limit {
        Some(limit) => loader.load_directory_limited(&history_dir, limit)?,
        None => loader.load_directory(&history_dir)?,
    };
    info!(documents = documents.len(), dir = %history_dir.display(), "indexing history");
    let index = build_index(documents)?;

    let query = args.query.join(" ");
    match args.cmd.as_str() {
        "query" => {
            if query.trim().is_empty() { eprintln!("Usage: chartlens query \"<query>\""); std::process::exit(1); }
            let hits = index.search_scored(&query, top_k);
            if hits.is_empty() { println!("No similar documents (send without added context)."); }
            for (rank, hit) in hits.iter().enumerate() {
                let kind = serde_json::to_value(hit.document.metadata.kind)?;
                println!("{}. [{:.3}] {} ({})", rank + 1, hit.score, hit.document.id, kind.as_str().unwrap_or("?"));
                println!("   {}", preview(&hit.document.content));
            }
        }
        "context" => {
            if query.trim().is_empty() { eprintln!("Usage: chartlens context \"<message>\""); std::process::exit(1); }
            if !(settings.retrieval.use_rag || args.rag) {
                info!("retrieval.use_rag is off; pass --rag to retrieve anyway");
                println!();
                return Ok(());
            }
            let context = index
                .search_similar(&query, top_k)
                .iter()
                .map(|d| d.content.as_str())
                .collect::<Vec<_>>()
                .join("\n\n");
            println!("{}", context);
        }
        "stats" => {
            println!("History directory: {}", history_dir.display());
            println!("Documents: {}", index.len());
            println!("Vocabulary: {} terms", index.vocabulary_len());
        }
        _ => { eprintln!("Unknown command: {}", args.cmd); std::process::exit(1); }
    }
    Ok(())
}
