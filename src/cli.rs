use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bilby")]
#[command(about = "Split PDFs and run them through text extraction, translation and summarization services")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config TOML. If omitted, uses ./bilby.toml if present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Args, Clone, Copy)]
pub struct ChunkArgs {
    /// Maximum pages per output file (default from config, 15)
    #[arg(short = 'n', long)]
    pub max_pages: Option<u32>,

    /// Start each chunk one page past the previous end, dropping boundary
    /// pages, to reproduce file names from older runs
    #[arg(long)]
    pub legacy_advance: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server over stdio
    Mcp,

    /// Split a PDF (or every PDF under a directory) into page-range chunks
    Split {
        /// PDF file or directory to split
        path: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output_dir: PathBuf,

        #[command(flatten)]
        chunks: ChunkArgs,
    },

    /// Show how a PDF would be split, without writing anything
    Plan {
        /// PDF file to inspect
        path: PathBuf,

        #[command(flatten)]
        chunks: ChunkArgs,
    },

    /// Extract the text of a PDF
    ExtractText {
        /// PDF file to read
        path: PathBuf,

        /// Use the embedded text layer instead of Document AI
        #[arg(long)]
        local: bool,

        /// Write the text here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract the text of a PDF and translate it
    Translate {
        /// PDF file to read
        path: PathBuf,

        /// Target language code, e.g. "zh-CN" (default from config)
        #[arg(short, long)]
        target: Option<String>,

        /// Use the embedded text layer instead of Document AI
        #[arg(long)]
        local: bool,

        /// Write the translation here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract the text of a PDF and summarize it with an LLM
    Summarize {
        /// PDF file to read
        path: PathBuf,

        /// Model name (default from config, "gpt-4")
        #[arg(short, long)]
        model: Option<String>,

        /// Use the embedded text layer instead of Document AI
        #[arg(long)]
        local: bool,

        /// Write the summary here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
