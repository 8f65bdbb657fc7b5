//! nl2sql CLI binary: serve the HTTP API, or ask / generate / execute from the terminal.
//!
//! Subcommands: `serve`, `ask`, `generate`, `execute`, `schema`. Settings come from the
//! environment, `.env` and `$XDG_CONFIG_HOME/nl2sql/config.toml` (in that priority).

mod log_format;
mod logging;

use clap::{Parser, Subcommand};
use config::Settings;
use tracing::debug;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser, Debug)]
#[command(name = "nl2sql")]
#[command(about = "nl2sql: ask a MySQL database questions in plain language (Gemini)")]
struct Args {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Run the HTTP API (default 127.0.0.1:8000 or NL2SQL_ADDR)
    Serve(ServeArgs),
    /// Generate SQL for a question, run it, print SQL and rows
    Ask(QuestionArgs),
    /// Generate SQL for a question and print it without running it
    Generate(TextArgs),
    /// Run SQL as given (subject to SQL_POLICY) and print rows
    Execute(QuestionArgs),
    /// Print the schema description sent to the model
    Schema,
}

#[derive(clap::Args, Debug, Clone)]
struct ServeArgs {
    /// Listen address, overrides NL2SQL_ADDR
    #[arg(long, value_name = "ADDR")]
    addr: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
struct TextArgs {
    /// Question in natural language
    #[arg(required = true, trailing_var_arg = true, value_name = "TEXT")]
    text: Vec<String>,
}

#[derive(clap::Args, Debug, Clone)]
struct QuestionArgs {
    /// Print the API's JSON body instead of a text table
    #[arg(long)]
    json: bool,
    /// Question (ask) or SQL statement (execute)
    #[arg(required = true, trailing_var_arg = true, value_name = "TEXT")]
    text: Vec<String>,
}

fn print_json(value: &serde_json::Value) -> Result<(), BoxError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(args: Args) -> Result<(), BoxError> {
    let settings = Settings::from_env()?;
    debug!(?settings, "settings loaded");

    let pipeline = || serve::build_pipeline(&settings);
    match args.cmd {
        Command::Serve(sa) => serve::run_serve(&settings, sa.addr.as_deref()).await?,
        Command::Ask(qa) => {
            let answer = pipeline().ask(&cli::join_words(&qa.text)).await?;
            if qa.json {
                print_json(&cli::answer_json(&answer)?)?;
            } else {
                print!("{}", cli::format_answer(&answer));
            }
        }
        Command::Generate(ta) => {
            let sql = pipeline().generate(&cli::join_words(&ta.text)).await?;
            println!("{}", sql);
        }
        Command::Execute(qa) => {
            let table = pipeline().execute(&cli::join_words(&qa.text)).await?;
            if qa.json {
                print_json(&cli::table_json(&table)?)?;
            } else {
                print!("{}", table.render_text());
            }
        }
        Command::Schema => {
            let pipeline = pipeline();
            let schema = pipeline.schema().await?;
            print!(
                "{}",
                cli::format_schema(pipeline.inspector().database(), &schema)
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_and_apply("nl2sql", None) {
        eprintln!("nl2sql: {}", e);
    }
    if let Err(e) = logging::init() {
        eprintln!("nl2sql: logging: {}", e);
    }

    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("nl2sql: {}", e);
        std::process::exit(1);
    }
}
