use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgGroup, Parser};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use toplist_generator::toplist::Playlist;
use toplist_generator::{
    JsonEventSource, JsonFileWriter, ListeningLog, ListeningWindow, PlayEventSource,
    ToplistGenerator, load_config,
};

#[derive(Parser)]
#[command(name = "toplist-generator")]
#[command(about = "Build weekly per-group top list playlists from listening history")]
#[command(version)]
#[command(group(ArgGroup::new("input").required(true).args(["events", "log"])))]
struct Args {
    /// JSON array of pre-joined play events
    #[arg(short = 'e', long = "events")]
    events: Option<String>,

    /// JSON listening log (memberships, plays and tracks) to join for the window
    #[arg(short = 'l', long = "log")]
    log: Option<String>,

    /// Path to the top list configuration JSON file
    #[arg(short = 'c', long = "config")]
    config_file: Option<String>,

    /// JSON file holding the stored top lists
    #[arg(short = 'o', long = "output", default_value = "toplists.json")]
    output: String,

    /// End of the listening window (RFC 3339), defaults to now
    #[arg(long = "until")]
    until: Option<DateTime<Utc>>,

    /// Override the number of tracks in the overall list
    #[arg(long = "top-overall")]
    top_overall: Option<usize>,

    /// Override the number of tracks in each genre list
    #[arg(long = "top-genre")]
    top_genre: Option<usize>,

    /// Enable debug mode - print top lists to stdout instead of storing them
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Quiet mode - reduce output verbosity
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_tracing(args.verbose);

    let mut config = load_config(args.config_file.as_deref())?;
    if let Some(size) = args.top_overall {
        config.top_overall_size = size;
    }
    if let Some(size) = args.top_genre {
        config.top_genre_size = size;
    }
    config.validate()?;

    let window =
        ListeningWindow::trailing_days(args.until.unwrap_or_else(Utc::now), config.window_days);
    let source: Box<dyn PlayEventSource> = match (&args.events, &args.log) {
        (Some(path), None) => Box::new(JsonEventSource::new(path.as_str())),
        (None, Some(path)) => Box::new(ListeningLog::load_from_file(path)?),
        _ => unreachable!("clap requires exactly one of --events and --log"),
    };

    let generator = ToplistGenerator::new(config);
    if !args.quiet {
        let config = generator.config();
        println!(
            "Generating top lists for {} - {} (top {} overall, {} per genre)...",
            window.start().format("%Y-%m-%d %H:%M"),
            window.end.format("%Y-%m-%d %H:%M"),
            config.top_overall_size,
            config.top_genre_size
        );
    }

    let playlists = if args.debug {
        let events = source.fetch_play_events(&window)?;
        generator.generate(&events)?
    } else {
        let mut writer = JsonFileWriter::open(&args.output)
            .with_context(|| format!("Failed to open top list store '{}'", args.output))?;
        generator.run(source.as_ref(), &mut writer, &window)?
    };

    if !args.quiet {
        print_report(&playlists, args.debug);
    }

    if args.debug {
        println!("\nDEBUG MODE: {} playlists not stored", playlists.len());
    } else {
        println!("Created {} playlists in '{}'.", playlists.len(), args.output);
    }

    Ok(())
}

fn print_report(playlists: &[Playlist], detailed: bool) {
    println!("\n=== GENERATION RESULTS ===");
    println!("Generated {} playlists", playlists.len());

    for playlist in playlists {
        let title = format!("{} / {}", playlist.group_id, playlist.name);
        println!("\n{title}");
        println!("{}", "=".repeat(title.len()));
        println!(
            "Score: {:.3} | Tracks: {}",
            playlist.score,
            playlist.tracks.len()
        );

        if playlist.tracks.is_empty() {
            println!("No tracks played in this window.");
            continue;
        }
        if !detailed {
            continue;
        }

        for (i, track) in playlist.tracks.iter().enumerate() {
            println!(
                "     {}. {} | plays: {} | listeners: {} | score: {:.3}",
                i + 1,
                track.id,
                track.total_plays(),
                track.unique_listeners(),
                track.score
            );
        }
    }
}
