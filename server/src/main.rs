use anyhow::{anyhow, Context, Result};
use clap::Parser;
use sift_server::{build_app, build_index, AppState, CreateIndexRequest};
use sift_core::{AnalyzerConfig, StemmerKind};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Index a directory of text files at startup, as `name=dir`
    #[arg(long, value_parser = parse_preload)]
    preload: Vec<(String, PathBuf)>,
}

fn parse_preload(s: &str) -> Result<(String, PathBuf)> {
    let (name, dir) = s.split_once('=').ok_or_else(|| anyhow!("expected name=dir, got '{s}'"))?;
    if name.is_empty() || dir.is_empty() {
        return Err(anyhow!("expected name=dir, got '{s}'"));
    }
    Ok((name.to_string(), PathBuf::from(dir)))
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let state = Arc::new(AppState::new());
    for (name, directory) in args.preload {
        let request = CreateIndexRequest {
            name: name.clone(),
            directory,
            stopwords_path: None,
            stemmer: StemmerKind::default(),
            config: AnalyzerConfig::default(),
        };
        let index = tokio::task::spawn_blocking(move || build_index(&request))
            .await?
            .with_context(|| format!("preloading index '{name}'"))?;
        state.insert(index)?;
    }

    let app = build_app(state);
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
