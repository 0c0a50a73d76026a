//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for sales-agent
#[derive(Parser, Debug)]
#[command(name = "sales-agent")]
#[command(author, version, about = "Ask questions about your sales data in plain language")]
#[command(long_about = r#"
Sales Agent answers natural-language questions about a customer sales
database. The model looks up the schema, writes read-only SQL queries, and
turns the results into an answer.

Without a question, an interactive chat session starts.

Configuration files are loaded from (lowest to highest priority):
1. ~/.config/sales-agent/config.toml          Global config
2. ./sales-agent.toml or ./.sales-agent.toml  Project-level config
3. --config <path>                            Explicit config file
4. SALES_AGENT_* environment variables        e.g. SALES_AGENT_MODEL__API_KEY

Example:
  sales-agent "What were the total sales by region in 2022?"
  sales-agent -m gpt-4o-mini --db data/customer_sales.db
  sales-agent --endpoint https://contoso.openai.azure.com -vv
"#)]
pub struct Cli {
    /// Question to answer (starts the interactive chat when omitted)
    pub question: Option<String>,

    /// Model name (Azure: deployment name)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Path to the SQLite sales database
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Base URL of the model endpoint
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Maximum tool round trips per question
    #[arg(long, value_name = "N")]
    pub max_round_trips: Option<usize>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators and tool call echo
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
