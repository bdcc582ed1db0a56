use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use itchtap_core::{
    bind, sample_file, serve_one, ListenOptions, DEFAULT_DESTINATION, DEFAULT_FEED_OUTPUT,
    DEFAULT_SOURCE,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "itchtap", version, about = "ITCH 5.0 行情解析与 JSONL 采样")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 监听端口，接收一个连接的 ITCH 流并写出 JSONL
    Listen {
        /// 监听端口
        #[arg(long)]
        port: u16,

        /// 输出文件（JSONL，每行一条消息）
        #[arg(long, default_value = DEFAULT_FEED_OUTPUT)]
        output: PathBuf,
    },
    /// 取 out/parsed.jsonl 前 50 条记录写入 out/parsed_sample.json
    Sample,
}

fn main() -> Result<()> {
    // 初始化日志（支持通过 RUST_LOG 控制等级，例如 info、debug）
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Listen { port, output } => run_listen(&ListenOptions { port, output })?,
        Commands::Sample => run_sample(Path::new(DEFAULT_SOURCE), Path::new(DEFAULT_DESTINATION))?,
    }

    Ok(())
}

fn run_listen(opts: &ListenOptions) -> Result<()> {
    let listener = bind(opts.port).context("start listener")?;
    let addr = listener.local_addr().context("query listener address")?;
    println!("Listening on port {}...", addr.port());
    info!(%addr, output = ?opts.output, "waiting for feed connection");

    let stats = serve_one(&listener, &opts.output).context("parse feed")?;
    println!(
        "Parsed {} messages, skipped {} unknown messages.",
        stats.messages_parsed, stats.unknown_messages
    );
    Ok(())
}

fn run_sample(source: &Path, destination: &Path) -> Result<()> {
    info!(?source, ?destination, "starting sample");
    let report = sample_file(source, destination).context("sample failed")?;
    println!("{report}");
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // 日志写到 stderr，stdout 只保留结果摘要
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
