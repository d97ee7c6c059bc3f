use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use polyexec::{ExecutionRequest, Executor, ExecutorConfig, Language};

/// Compile and run a single source file, printing the result as JSON.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Opt {
    /// Source file, or `-` for stdin.
    file: PathBuf,

    /// Defaults to the file extension.
    #[arg(short, long, value_enum)]
    language: Option<Language>,

    #[arg(short, long)]
    compile_only: bool,

    #[arg(short, long)]
    pretty: bool,

    #[command(flatten)]
    config: ExecutorConfig,
}

fn setup_tracing() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .pretty()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .finish()
        .with(ErrorLayer::default())
        .init();
}

fn read_source(opt: &Opt) -> Result<String> {
    if opt.file.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read source from stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(&opt.file)
        .with_context(|| format!("failed to read source: path = {}", opt.file.display()))
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    setup_tracing();

    let opt = Opt::parse();

    let language = match opt.language.or_else(|| Language::from_extension(&opt.file)) {
        Some(lang) => lang,
        None => anyhow::bail!(
            "cannot infer language from {}; pass --language",
            opt.file.display()
        ),
    };

    let source = read_source(&opt)?;
    let req = ExecutionRequest::new(language, source).compile_only(opt.compile_only);

    let executor = Executor::new(opt.config)?;
    let result = executor.execute(&req);

    {
        let stdout = io::stdout();
        let mut stdout_lock = stdout.lock();
        let out = &mut stdout_lock;
        if opt.pretty {
            serde_json::to_writer_pretty(&mut *out, &result)?;
        } else {
            serde_json::to_writer(&mut *out, &result)?;
        }
        writeln!(out)?;
    }

    Ok(())
}
