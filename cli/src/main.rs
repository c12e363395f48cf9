use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sift_core::loader::{load_json_dir, load_stopwords, load_text_dir};
use sift_core::trec::{run_topics, write_run};
use sift_core::{
    Analyzer, AnalyzerConfig, Document, InvertedIndex, Query, QueryMode, StemmerKind, StopwordSource, Topic,
    TrecDocument,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Build an in-memory index and run boolean or TF-IDF queries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a directory and run a single query
    Search(SearchArgs),
    /// Rank every topic of a TREC collection and write a run file
    Trec {
        /// Collection directory holding `documents/` and `topics/`
        #[arg(long)]
        dir: PathBuf,
        /// Run file path, `<dir>/results.txt` by default
        #[arg(long)]
        output: Option<PathBuf>,
        /// Documents ranked per topic
        #[arg(long, default_value_t = 100)]
        top: usize,
        #[arg(long, default_value = "runindex1")]
        label: String,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Directory with one document per file
    #[arg(long)]
    input: PathBuf,
    /// Files are JSON TREC documents instead of plain text
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Stopword file, one word per line; built-in list when omitted
    #[arg(long)]
    stopwords: Option<PathBuf>,
    /// czech, english or none
    #[arg(long, default_value = "czech")]
    stemmer: StemmerKind,
    #[arg(long, default_value_t = false)]
    no_lowercase: bool,
    #[arg(long, default_value_t = false)]
    no_accents: bool,
    /// Maximum number of results to print
    #[arg(long, default_value_t = 10)]
    top: usize,
    /// boolean or vector
    #[arg(long, default_value = "vector")]
    mode: QueryMode,
    /// Query text
    query: String,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => search(args),
        Commands::Trec { dir, output, top, label } => {
            let output = output.unwrap_or_else(|| dir.join("results.txt"));
            trec(&dir, &output, top, &label)
        }
    }
}

fn search(args: SearchArgs) -> Result<()> {
    let config = AnalyzerConfig {
        lowercase: !args.no_lowercase,
        remove_accents: !args.no_accents,
        perform_stemming: args.stemmer != StemmerKind::None,
    };
    let stopwords = match &args.stopwords {
        Some(path) => load_stopwords(path).with_context(|| format!("reading stopwords from {}", path.display()))?,
        None => StopwordSource::Defaults,
    };
    let stemmer = config.perform_stemming.then(|| args.stemmer.build());
    let analyzer = Analyzer::new(config, stemmer, &stopwords)?;

    let documents = if args.json {
        load_json_dir::<TrecDocument, _>(&args.input)?
    } else {
        load_text_dir(&args.input)?
    };

    let mut index = InvertedIndex::new(args.input.display().to_string(), analyzer);
    let start = Instant::now();
    index.index(documents)?;
    tracing::info!(took_s = start.elapsed().as_secs_f64(), "indexing finished");

    let query = Query::new(args.query, args.top);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.mode {
        QueryMode::Boolean => {
            let results = index.boolean_search(&query)?;
            writeln!(out, "{} matching documents", results.total)?;
            for hit in &results.documents {
                writeln!(out, "{:>6}  {}", hit.id, label(hit.document))?;
            }
        }
        QueryMode::Vector => {
            let results = index.vector_search(&query)?;
            writeln!(out, "{} documents with nonzero score", results.nonzero)?;
            for (hit, score) in results.documents.iter().zip(&results.scores) {
                writeln!(out, "{:>6}  {:.4}  {}", hit.id, score, label(hit.document))?;
            }
        }
    }
    Ok(())
}

/// External id when the collection has one, otherwise the first line of text.
fn label(document: &Document) -> String {
    match document.external_id() {
        Some(id) => id.to_string(),
        None => {
            let text = document.relevant_text();
            let first = text.lines().next().unwrap_or_default();
            first.chars().take(80).collect()
        }
    }
}

fn trec(dir: &Path, output: &Path, top: usize, label: &str) -> Result<()> {
    let analyzer = Analyzer::new(AnalyzerConfig::default(), Some(StemmerKind::Czech.build()), &StopwordSource::Defaults)?;
    let documents = load_json_dir::<TrecDocument, _>(dir.join("documents"))
        .with_context(|| format!("loading documents from {}", dir.display()))?;
    let topics = load_json_dir::<Topic, _>(dir.join("topics"))
        .with_context(|| format!("loading topics from {}", dir.display()))?;

    let mut index = InvertedIndex::new("trec", analyzer);
    index.index(documents)?;

    let start = Instant::now();
    let lines = run_topics(&index, &topics, top, label)?;
    tracing::info!(topics = topics.len(), lines = lines.len(), took_s = start.elapsed().as_secs_f64(), "topics ranked");

    let file = File::create(output).with_context(|| format!("creating {}", output.display()))?;
    write_run(BufWriter::new(file), &lines)?;
    tracing::info!(output = %output.display(), "run written");
    Ok(())
}
