mod assets;
mod book;
mod config;
mod fetch;
mod highlight;
mod markdown;
mod page;
mod scroll;
mod serve;

use anyhow::Result;
use argh::FromArgs;
use config::Config;
use fetch::HttpFetcher;
use highlight::HighlightRegistry;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::fs;
use std::path::Path;

/// Assemble a remote Markdown book into a single HTML page.
#[derive(FromArgs)]
struct Args {
    /// path to the configuration file
    #[argh(option, short = 'c', default = "String::from(\"chapbook.toml\")")]
    config: String,

    /// log more
    #[argh(switch, short = 'v')]
    verbose: bool,

    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Build(BuildCmd),
    Serve(ServeCmd),
}

/// fetch the book and write the assembled page to a file
#[derive(FromArgs)]
#[argh(subcommand, name = "build")]
struct BuildCmd {}

/// fetch the book and host it with scroll-position persistence
#[derive(FromArgs)]
#[argh(subcommand, name = "serve")]
struct ServeCmd {}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Args = argh::from_env();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let config = Config::load(Path::new(&args.config))?;

    let mut highlights = HighlightRegistry::new();
    for lang in &config.languages {
        highlights.register(lang);
    }

    let fetcher = HttpFetcher::new(&config.base_url, config.fetch_timeout());
    let book = book::assemble(&fetcher, &config, &highlights).await;

    match args.command {
        Command::Build(_) => {
            let env = page::template_env();
            let html = page::render_page(&book, &env, None, false)?;
            fs::write(&config.output, html)?;
            log::info!("wrote {}", config.output.display());
        }
        Command::Serve(_) => {
            let store = scroll::FileStore::new(&config.state_dir);
            serve::serve(book, store, &config.listen).await?;
        }
    }

    Ok(())
}
