// ABOUTME: Main entry point for the big-deck program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use big_deck::{
    Config, Document, Location, Navigator, Session, SyntheticInput, load_script, render_outline,
    render_status,
};
use clap::{Args, Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the slide and quiz structure of a deck
    Inspect(InspectArgs),

    /// Replay a script of input events against a deck
    Replay(ReplayArgs),

    /// Generate the favicon set from the deck logo
    Favicon(FaviconArgs),
}

#[derive(Args)]
struct InspectArgs {
    /// Path to the deck HTML file
    #[arg(short, long)]
    deck: PathBuf,
}

#[derive(Args)]
struct ReplayArgs {
    /// Path to the deck HTML file
    #[arg(short, long)]
    deck: PathBuf,

    /// Path to the replay script
    #[arg(short, long)]
    script: PathBuf,

    /// Open the deck at this one-based slide number
    #[arg(long)]
    hash: Option<String>,
}

#[derive(Args)]
struct FaviconArgs {
    /// Directory for the PNG favicons and logo.svg
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path of the ICO file
    #[arg(long)]
    ico: Option<PathBuf>,

    /// Logo SVG to use instead of the built-in one (local path or URL)
    #[arg(long)]
    logo: Option<String>,
}

fn inspect(args: &InspectArgs) -> anyhow::Result<()> {
    let document = Document::load(&args.deck)?;
    print!("{}", render_outline(&document));
    Ok(())
}

fn replay(args: &ReplayArgs, config: &Config) -> anyhow::Result<()> {
    let document = Document::load(&args.deck)?;
    let steps = load_script(&args.script)?;

    let mut location = Location::for_file(&args.deck)?;
    if let Some(hash) = &args.hash {
        location.set_hash(hash);
    }

    let mut input = SyntheticInput::new();
    let navigator = Navigator::new(document, location, config.get_navigator_config());
    let mut session = Session::attach(&mut input, navigator);
    let shared = session.navigator();

    println!("{:>7}  {}", "start", render_status(&shared.lock()));
    for step in &steps {
        shared.lock().advance_to(step.at);
        for event in &step.events {
            input.emit(event);
        }
        println!(
            "{:>5}ms  {}",
            step.at.as_millis(),
            render_status(&shared.lock())
        );
    }

    // Let pending animations and resets settle before reporting
    let settled = shared.lock().now() + config.get_navigator_config().quiz_reset;
    shared.lock().advance_to(settled);
    let stats = shared.lock().stats();
    session.detach(&mut input);

    info!("Replay finished: {:?}", stats);
    println!(
        "{} transitions, {} entrance runs, {} ignored events",
        stats.transitions, stats.entrance_runs, stats.ignored_events
    );
    Ok(())
}

fn favicon(args: &FaviconArgs, config: &Config) -> anyhow::Result<()> {
    let favicon_config =
        config.get_favicon_config(args.output.clone(), args.ico.clone(), args.logo.clone());
    let written = big_deck::generate_favicons(&favicon_config)?;
    for path in &written {
        println!("Generated {}", path.display());
    }
    println!("Favicon generation complete!");
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = Config::from_env()
        .map_err(anyhow::Error::from)
        .and_then(|config| match &cli.command {
            Some(Commands::Inspect(args)) => inspect(args),
            Some(Commands::Replay(args)) => replay(args, &config),
            Some(Commands::Favicon(args)) => favicon(args, &config),
            None => {
                println!("No command specified. Use --help for usage information.");
                Ok(())
            }
        });

    if let Err(e) = result {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
