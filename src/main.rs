use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use flexi_logger::Logger;

use sd_quickview::scan::{self, DateRange};
use sd_quickview::{Engine, EngineConfig};

#[derive(Parser, Debug)]
#[command(version, about = "Scan photo folders and build cached thumbnails", long_about = None)]
struct Args {
    /// Config file (defaults to the user config directory)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Override the thumbnail cache directory
    #[arg(long, value_name = "DIR", global = true)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List supported images under a folder with their effective dates
    Scan {
        folder: PathBuf,
        #[command(flatten)]
        range: RangeArgs,
        /// Order by effective date instead of folder order
        #[arg(long)]
        sort: bool,
    },
    /// Print the effective date of one file
    Date { file: PathBuf },
    /// Generate (or fetch cached) thumbnails for a folder
    Thumbs {
        folder: PathBuf,
        #[command(flatten)]
        range: RangeArgs,
        /// Longer edge in pixels
        #[arg(long)]
        size: Option<u32>,
        /// Write each thumbnail as PNG into this directory
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
    /// Delete image files and their cached thumbnails
    Delete {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Remove every cached thumbnail
    ClearCache,
    /// Show cache statistics
    Stats,
}

#[derive(clap::Args, Debug)]
struct RangeArgs {
    /// First day to include (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,
    /// Last day to include (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,
}

impl RangeArgs {
    fn range(&self) -> Option<DateRange> {
        match (self.from, self.to) {
            (None, None) => None,
            (from, to) => Some(DateRange::new(
                from.unwrap_or(NaiveDate::MIN),
                to.unwrap_or(NaiveDate::MAX),
            )),
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("{s}: {e}"))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let _logger = Logger::try_with_env_or_str("info")?.start()?;

    let mut config = EngineConfig::load(args.config.as_deref())?;
    if let Some(dir) = args.cache_dir {
        config.cache_dir = dir;
    }

    match args.command {
        Command::Date { file } => {
            let date = scan::effective_date(&file)?;
            println!("{}\t{:?}", date.date, date.source);
            Ok(())
        }
        Command::Scan { folder, range, sort } => run_scan(config, &folder, range.range(), sort),
        Command::Thumbs {
            folder,
            range,
            size,
            out,
        } => run_thumbs(config, &folder, range.range(), size, out.as_deref()),
        Command::Delete { files } => {
            let engine = Engine::open(config)?;
            let report = engine.delete(&files);
            for path in &report.deleted {
                println!("deleted\t{}", path.display());
            }
            for err in &report.failed {
                println!("failed\t{}", err);
            }
            let failed = report.failed.len();
            engine.close()?;
            if failed > 0 {
                bail!("{} file(s) could not be deleted", failed);
            }
            Ok(())
        }
        Command::ClearCache => {
            let engine = Engine::open(config)?;
            engine.clear_cache()?;
            engine.close()?;
            Ok(())
        }
        Command::Stats => {
            let engine = Engine::open(config)?;
            println!("cache dir\t{}", engine.config().cache_dir.display());
            println!("entries\t{}", engine.cache_len()?);
            engine.close()?;
            Ok(())
        }
    }
}

fn run_scan(config: EngineConfig, folder: &Path, range: Option<DateRange>, sort: bool) -> anyhow::Result<()> {
    let scanner = scan::FileScanner::new(folder)?.follow_links(config.follow_links);
    let outcome = scanner.scan();

    let mut records = scan::records(&outcome.paths);
    if let Some(range) = range {
        records.retain(|r| range.contains(r.date.date));
    }
    if sort {
        scan::sort_by_date(&mut records);
    }

    for record in &records {
        println!("{}\t{:?}\t{}", record.date.date, record.date.source, record.path.display());
    }
    for warning in &outcome.warnings {
        eprintln!("warning: {}", warning);
    }
    Ok(())
}

fn run_thumbs(
    config: EngineConfig,
    folder: &Path,
    range: Option<DateRange>,
    size: Option<u32>,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    if let Some(out) = out {
        fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;
    }

    let engine = Engine::open(config)?;
    let (outcome, stream) = engine.open_folder(folder, range, size)?;
    log::info!("Loading {} thumbnails", outcome.paths.len());

    let mut ok = 0usize;
    let mut failed = 0usize;
    for event in stream.collect_blocking() {
        match event.result {
            Ok(thumb) => {
                ok += 1;
                let origin = if thumb.cached { "cached" } else { "generated" };
                println!("{}\t{}x{}\t{}", origin, thumb.width, thumb.height, event.path.display());
                if let Some(out) = out {
                    let target = thumbnail_target(out, folder, &event.path);
                    if let Some(parent) = target.parent() {
                        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
                    }
                    fs::write(&target, &thumb.png).with_context(|| format!("writing {}", target.display()))?;
                }
            }
            Err(e) => {
                failed += 1;
                println!("no preview\t{}\t{}", event.path.display(), e);
            }
        }
    }

    log::info!("{} thumbnails ready, {} without preview", ok, failed);
    engine.close()?;
    Ok(())
}

/// Where a thumbnail lands under `out`: the source's path below the scanned
/// folder, full file name kept, plus `.png`. Cards reuse names like
/// `IMG_0001.JPG` across `DCIM` subfolders and next to the raw file.
fn thumbnail_target(out: &Path, root: &Path, source: &Path) -> PathBuf {
    let relative = match source.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
        _ => source
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("thumbnail")),
    };
    let mut name = relative.into_os_string();
    name.push(".png");
    out.join(name)
}
