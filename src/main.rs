use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use codeq::config::Config;
use codeq::mapper::{self, MapOptions};
use codeq::pipeline::QueryPipeline;
use codeq::provider::LlmClient;
use codeq::store::{self, AppData};
use codeq::TokenBudget;

#[derive(Parser)]
#[command(
    name = "codeq",
    version,
    about = "Token-budget-aware codebase Q&A",
    long_about = "Maps source files into metadata records, then answers free-text questions \
                  about the codebase by packing relevant file contents into budget-sized LLM calls."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a source tree: one metadata record per code file
    Map {
        /// Source root to map (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Re-map files that already have a record
        #[arg(long)]
        remap: bool,

        /// Skip the per-file project summary update (faster, one call per file)
        #[arg(long)]
        no_summary: bool,
    },

    /// Ask a free-text question about a mapped codebase
    Query {
        /// Source root (defaults to current directory)
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// The question
        #[arg(trailing_var_arg = true, required = true)]
        question: Vec<String>,

        /// Extra context document to feed every synthesis round
        #[arg(short, long)]
        context: Option<PathBuf>,
    },

    /// Rewrite a raw question into a sharper prompt using the project summary
    Improve {
        /// Source root (defaults to current directory)
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// The question to improve
        #[arg(trailing_var_arg = true, required = true)]
        question: Vec<String>,
    },

    /// Print the generated project summary
    Summary {
        /// Source root (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Show or initialize the configuration
    Config {
        /// Write the default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Map {
            path,
            remap,
            no_summary,
        } => {
            let model = LlmClient::from_config(&config.provider)?;
            let opts = MapOptions {
                remap_existing: remap,
                update_summary: !no_summary,
            };
            let report = mapper::run_mapping(&model, &path, &config.scan, &opts, cli.verbose)?;
            if !report.failed.is_empty() {
                for (file, reason) in &report.failed {
                    eprintln!("{} {}: {}", "unmapped".red(), file.display(), reason);
                }
            }
        }

        Commands::Query {
            path,
            question,
            context,
        } => {
            let model = LlmClient::from_config(&config.provider)?;
            let budget = TokenBudget::new(config.budget.max_input_tokens);
            let mut pipeline = QueryPipeline::new(model, &path, budget, cli.verbose)?;
            if let Some(doc_path) = context {
                let doc = store::read_context_doc(&doc_path)?;
                pipeline.add_extra_context(&doc, false);
            }
            let answer = pipeline.answer(&question.join(" "))?;
            println!("{answer}");
        }

        Commands::Improve { path, question } => {
            let model = LlmClient::from_config(&config.provider)?;
            let budget = TokenBudget::new(config.budget.max_input_tokens);
            let pipeline = QueryPipeline::new(model, &path, budget, cli.verbose)?;
            println!("{}", pipeline.improve_prompt(&question.join(" "))?);
        }

        Commands::Summary { path } => {
            let summary = AppData::for_source(&path).read_summary()?;
            println!("{summary}");
        }

        Commands::Config { init } => {
            let path = Config::path()?;
            if init && !path.exists() {
                Config::default().save()?;
                println!("{} {}", "created".green(), path.display());
            } else {
                println!("{} {}", "config:".blue(), path.display());
                println!("{}", toml::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}
