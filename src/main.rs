use anyhow::{anyhow, Context};
use clap::Parser;
use std::path::PathBuf;
use thumb_gallery::{
    folder_name, open_in_browser, player_url, resolve, thumbnail_url, Config, FileSource,
    HttpSource, Overrides, VideoList, VideoRecord, VideoSource,
};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Browse the video list of a thumbnail gallery backend.
#[derive(Parser)]
#[command(name = "thumb-gallery", version)]
struct Args {
    /// Backend address (default http://localhost/).
    #[arg(short, long, env = "GALLERY_URL")]
    url: Option<String>,

    /// JSON config file with `base_url` and `sort`.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Read a saved /video response instead of asking the backend.
    #[arg(long, value_name = "FILE")]
    source_file: Option<PathBuf>,

    /// Only list videos whose path contains this text.
    #[arg(short, long, default_value = "")]
    filter: String,

    /// Sort key: name, size or date followed by `u` (ascending) or `d`.
    #[arg(short, long)]
    sort: Option<String>,

    /// Show folders with their video counts, in first-seen order.
    #[arg(long, conflicts_with_all = ["folder", "filter", "sort", "thumbs"])]
    folders: bool,

    /// List only the videos in this folder.
    #[arg(long, value_name = "DIR")]
    folder: Option<String>,

    /// Open the player for the video with this hash.
    #[arg(long, value_name = "HASH")]
    open: Option<String>,

    /// Print absolute thumbnail links next to each video.
    #[arg(long)]
    thumbs: bool,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("thumb_gallery={}", level).parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn format_size(bytes: u64) -> String {
    const GB: u64 = 1024 * 1024 * 1024;
    const MB: u64 = 1024 * 1024;
    const KB: u64 = 1024;

    if bytes >= GB {
        format!("{:.1}G", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1}M", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1}K", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}

fn print_video(video: &VideoRecord, thumb: Option<String>) {
    println!(
        "{:>8}  {}  {}  {}",
        format_size(video.size),
        video.modified_at.format("%Y-%m-%d %H:%M"),
        video.hash,
        video.path
    );
    if let Some(thumb) = thumb {
        println!("{:>8}  {}", "", thumb);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::load(
        args.config.as_deref(),
        Overrides {
            base_url: args.url.as_deref(),
            sort: args.sort.as_deref(),
        },
    )?;

    let source: Box<dyn VideoSource> = match &args.source_file {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(HttpSource::new(&config.base_url)?),
    };

    let mut list = VideoList::new(source);
    list.set_sort_key(config.sort);
    list.refresh().context("cannot load video list")?;

    if let Some(hash) = &args.open {
        let video = list
            .find_by_hash(hash)
            .ok_or_else(|| anyhow!("no video with hash {}", hash))?;
        let url = resolve(&config.base_url, &player_url(&video.path))?;
        open_in_browser(&url)?;
        return Ok(());
    }

    if args.folders {
        list.show_folders();
        for group in list.grouped_by_folder() {
            println!(
                "{} ({}, {} videos)",
                folder_name(group.folder),
                group.folder,
                group.videos.len()
            );
        }
        return Ok(());
    }

    match &args.folder {
        Some(folder) => list.select_folder(folder),
        None => list.set_path_filter(args.filter.as_str()),
    }

    for video in list.filtered_sorted() {
        let thumb = if args.thumbs {
            Some(resolve(&config.base_url, &thumbnail_url(&video.hash))?.to_string())
        } else {
            None
        };
        print_video(video, thumb);
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
