use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches, Parser};

use dfrandom::character::{render_json, render_text};
use dfrandom::config::{TemplateLibrary, RANDOM_SELECTOR};
use dfrandom::error::Result;
use dfrandom::generate_batch;

#[derive(Parser, Debug)]
#[command(name = "dfrandom", version)]
#[command(about = "Generate a random GURPS Dungeon Fantasy character")]
struct Cli {
    /// Character template to use, or "random"
    #[arg(short, long, value_name = "NAME")]
    template: Option<String>,

    /// Seed for reproducible output
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of characters to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Print characters as JSON
    #[arg(long)]
    json: bool,

    /// Template data file to use instead of the built-in templates
    #[arg(long, value_name = "PATH")]
    data: Option<PathBuf>,

    /// List template names and exit
    #[arg(long)]
    list: bool,
}

fn load_library(data: Option<&PathBuf>) -> Result<Arc<TemplateLibrary>> {
    match data {
        Some(path) => TemplateLibrary::from_path(path).map(Arc::new),
        None => TemplateLibrary::builtin(),
    }
}

/// `--data` as given on the raw command line, so help can list its templates
fn data_arg() -> Option<PathBuf> {
    let mut args = std::env::args_os().skip(1);
    while let Some(arg) = args.next() {
        let text = arg.to_string_lossy();
        if text == "--data" {
            return args.next().map(PathBuf::from);
        }
        if let Some(path) = text.strip_prefix("--data=") {
            return Some(PathBuf::from(path));
        }
    }
    None
}

fn template_help(library: Option<&TemplateLibrary>) -> String {
    match library {
        Some(library) => format!(
            "Templates: {}, {}",
            library.names().join(", "),
            RANDOM_SELECTOR
        ),
        None => "Templates: unavailable (template data failed to load)".to_string(),
    }
}

async fn run(cli: Cli, library: Arc<TemplateLibrary>) -> Result<()> {
    if cli.list {
        for name in library.names() {
            println!("{}", name);
        }
        return Ok(());
    }

    // Fail on a bad selector before spawning any work
    library.check_selector(cli.template.as_deref())?;

    let characters = generate_batch(library, cli.template, cli.count.max(1), cli.seed).await?;

    if cli.json {
        if characters.len() == 1 {
            println!("{}", render_json(&characters[0])?);
        } else {
            println!("{}", serde_json::to_string_pretty(&characters)?);
        }
    } else {
        let sheets: Vec<String> = characters.iter().map(render_text).collect();
        print!("{}", sheets.join("\n"));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let preload = load_library(data_arg().as_ref());
    let matches = Cli::command()
        .after_help(template_help(preload.as_deref().ok()))
        .get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };

    let outcome = match preload {
        Ok(library) => run(cli, library).await,
        Err(err) => Err(err),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("exiting after error: {:?}", err);
            eprintln!("error: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
