use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use simplelog::{Config, LevelFilter, WriteLogger};

use pdfsight::panic_handler::initialize_panic_handler;
use pdfsight::pdf::{DocumentSource, MemoryDocument, ScaleRequest, Viewer};
use pdfsight::search::NavOutcome;
use pdfsight::settings::load_settings;

#[derive(Parser)]
#[command(
    name = "pdfsight",
    about = "Search and page through the text of a PDF document",
    version
)]
struct Cli {
    /// PDF file, or a JSON text dump
    file: PathBuf,

    /// Text to search for
    #[arg(short, long)]
    find: Option<String>,

    /// Page (1-based) to focus before searching
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Number of additional find-next steps after the first match
    #[arg(short, long, default_value_t = 0)]
    next: usize,

    /// Document scale: actual, width, height, fit, auto or a number
    #[arg(short, long)]
    scale: Option<ScaleRequest>,

    /// Settings file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "pdfsight.log")]
    log_file: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    WriteLogger::init(
        if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        Config::default(),
        File::create(&cli.log_file)
            .with_context(|| format!("creating log file {:?}", cli.log_file))?,
    )?;
    initialize_panic_handler();

    info!("Starting pdfsight");
    let result = run(&cli);
    if let Err(err) = &result {
        error!("Application error: {err:?}");
    }
    info!("Shutting down pdfsight");
    result
}

fn run(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli.config.as_deref());
    let mut viewer = Viewer::new(&settings);

    let source = open_source(&cli.file)?;
    viewer
        .open(Some(source))
        .with_context(|| format!("opening {:?}", cli.file))?;
    println!("{}: {} pages", cli.file.display(), viewer.pages_count());

    if let Err(e) = viewer.extract_all() {
        eprintln!("Text extraction stopped early: {e}");
    }

    if let Some(request) = cli.scale {
        viewer.set_scale(request, None)?;
    }
    viewer.set_page(cli.page);
    if let Ok(viewport) = viewer.page_viewport(cli.page, None) {
        println!(
            "page {} is {:.0}x{:.0} at scale {}",
            cli.page,
            viewport.width,
            viewport.height,
            viewport.scale
        );
    }

    if let Some(query) = &cli.find {
        let mut outcome = viewer.find(query);
        println!("'{query}': {} matches", viewer.found_count());
        print_outcome(&viewer, outcome);

        for _ in 0..cli.next {
            outcome = viewer.find_next();
            if outcome == NavOutcome::Unchanged {
                println!("No further matches");
                break;
            }
            print_outcome(&viewer, outcome);
        }
    }

    println!(
        "page {} of {}, rendered pages {:?}",
        viewer.page_number(),
        viewer.pages_count(),
        viewer.rendered_pages()
    );
    viewer.destroy();
    Ok(())
}

fn open_source(path: &Path) -> Result<Box<dyn DocumentSource>> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let document = MemoryDocument::open(path)
            .with_context(|| format!("reading text dump {path:?}"))?;
        return Ok(Box::new(document));
    }
    open_pdf(path)
}

#[cfg(feature = "pdf")]
fn open_pdf(path: &Path) -> Result<Box<dyn DocumentSource>> {
    let document = pdfsight::pdf::MupdfDocument::open(path)
        .with_context(|| format!("opening PDF {path:?}"))?;
    Ok(Box::new(document))
}

#[cfg(not(feature = "pdf"))]
fn open_pdf(path: &Path) -> Result<Box<dyn DocumentSource>> {
    anyhow::bail!("{path:?} is not a JSON text dump and PDF support is not compiled in")
}

fn print_outcome(viewer: &Viewer, outcome: NavOutcome) {
    let NavOutcome::Selected {
        position, number, ..
    } = outcome
    else {
        return;
    };

    let Some(data) = viewer.match_data(position.page, position.item_id) else {
        return;
    };
    let token = viewer
        .search()
        .page_contents()
        .get(position.page)
        .and_then(|tokens| tokens.get(position.item_id))
        .map(String::as_str)
        .unwrap_or_default();

    println!(
        "#{number} page {} item {}: {}",
        position.page + 1,
        position.item_id,
        data.mark(token)
    );
}
