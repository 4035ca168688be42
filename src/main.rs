// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use song_browser::catalog::{builtin_catalog, CatalogFile};
use song_browser::config::{FileSettingsStore, DEFAULT_SETTINGS_FILE};
use song_browser::control::KeyboardController;
use song_browser::session::{EventRouter, HostEvent, Screen, SessionController};
use song_browser::ui::App;
use song_browser::{order, MemoryHost, Song, SortMode};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILE: &str = "song-browser.log";
const DEFAULT_FPS: u32 = 30;

fn print_usage() {
    println!("Song Browser - sortable song list with favorites");
    println!();
    println!("Usage: song-browser [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --settings <PATH>   Settings file (default {})", DEFAULT_SETTINGS_FILE);
    println!("  --catalog <PATH>    YAML catalog to load instead of the stock levels");
    println!("  --log <PATH>        Log file for interactive mode (default {})", DEFAULT_LOG_FILE);
    println!("  --fps <N>           Interactive redraw rate, 1-120 (default {})", DEFAULT_FPS);
    println!("  --print             Print the sorted song list and exit");
    println!("  --mode <MODE>       Sort mode for --print (default, favorites, original)");
    println!("  --help              Show this help message");
}

#[derive(Debug)]
struct Options {
    settings: PathBuf,
    catalog: Option<PathBuf>,
    log: PathBuf,
    fps: u32,
    print: bool,
    mode: Option<SortMode>,
}

fn parse_args(args: &[String]) -> Result<Option<Options>> {
    let mut options = Options {
        settings: PathBuf::from(DEFAULT_SETTINGS_FILE),
        catalog: None,
        log: PathBuf::from(DEFAULT_LOG_FILE),
        fps: DEFAULT_FPS,
        print: false,
        mode: None,
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| anyhow!("{} requires a value", name))
        };
        match arg.as_str() {
            "--settings" => options.settings = PathBuf::from(value("--settings")?),
            "--catalog" => options.catalog = Some(PathBuf::from(value("--catalog")?)),
            "--log" => options.log = PathBuf::from(value("--log")?),
            "--fps" => {
                let fps = value("--fps")?;
                options.fps = fps
                    .parse()
                    .with_context(|| format!("Invalid --fps value: {}", fps))?;
            }
            "--mode" => options.mode = Some(value("--mode")?.parse()?),
            "--print" => options.print = true,
            "--help" | "-h" => return Ok(None),
            other => return Err(anyhow!("Unknown option: {}", other)),
        }
    }

    Ok(Some(options))
}

fn load_catalog(options: &Options) -> Result<Vec<Song>> {
    match &options.catalog {
        Some(path) => Ok(CatalogFile::load(path)?.songs),
        None => Ok(builtin_catalog()),
    }
}

fn print_sorted(options: &Options) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();

    let songs = load_catalog(options)?;
    let settings = FileSettingsStore::new(&options.settings).load_or_default();
    let mode = options.mode.unwrap_or(settings.sort_mode).normalized();

    println!("Sorted by {} ({} songs)", mode, songs.len());
    for (i, song) in order(&songs, mode, &settings.favorites).iter().enumerate() {
        let marker = if settings.is_favorite(song.id()) { "*" } else { " " };
        println!(
            "{:>3} {} {:<30} {:<24} {}",
            i + 1,
            marker,
            song.title(),
            song.author(),
            song.id()
        );
    }
    Ok(())
}

fn run_interactive(options: &Options) -> Result<()> {
    let log_file = File::create(&options.log)
        .with_context(|| format!("Failed to create log file: {:?}", options.log))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .init();

    let songs = load_catalog(options)?;
    info!("Loaded {} songs", songs.len());

    let host = MemoryHost::new(songs);
    let store = FileSettingsStore::new(&options.settings);
    info!("Using settings file {:?}", store.path());
    let controller = SessionController::new(host.bindings(), Box::new(store));
    let mut router = EventRouter::new(controller);
    let keyboard = KeyboardController::with_defaults();

    // Same order the game uses: menu scene first, then the loader finishes
    host.show_screen();
    router.dispatch(HostEvent::ScreenChanged(Screen::SongMenu));
    router.dispatch(HostEvent::CatalogLoaded);

    let mut app = App::new().context("Failed to initialise terminal")?;
    app.set_frame_rate(options.fps);
    app.run(&host, &mut router, &keyboard)?;

    info!("Exiting with sort mode {}", router.controller().sort_mode());
    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "song_browser=info".into())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let options = match parse_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    if options.print {
        print_sorted(&options)
    } else {
        run_interactive(&options)
    }
}
