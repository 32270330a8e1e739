use clap::{Parser, ValueEnum};
use std::error::Error;
use std::path::PathBuf;
use yield_records::config::{CrawlKind, HarvestConfig};

#[derive(Parser, Debug)]
#[command(name = "yield-records")]
#[command(about = "Extracts structured records from paginated listings and search results")]
#[command(version)]
pub struct Args {
    /// Seed URL to start crawling from
    pub uri: String,

    /// Extraction job (auto picks one from the seed URL)
    #[arg(short, long, value_enum)]
    pub kind: Option<KindArg>,

    /// Maximum number of pages to process
    #[arg(short = 'n', long)]
    pub max_pages: Option<usize>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver endpoint used to render pages
    #[arg(long)]
    pub webdriver: Option<String>,

    /// Print the records on a single line
    #[arg(long)]
    pub compact: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Auto,
    Search,
    Listing,
}

impl From<KindArg> for CrawlKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Auto => CrawlKind::Auto,
            KindArg::Search => CrawlKind::Search,
            KindArg::Listing => CrawlKind::Listing,
        }
    }
}

/// Builds the run configuration, command-line flags overriding the config file
pub fn build_config(args: &Args) -> Result<HarvestConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => HarvestConfig::from_file(path)?,
        None => HarvestConfig::new(&args.uri),
    };

    config.seed_url = args.uri.clone();
    if let Some(kind) = args.kind {
        config.kind = kind.into();
    }
    if let Some(max_pages) = args.max_pages {
        config.max_pages = Some(max_pages);
    }
    if let Some(webdriver) = &args.webdriver {
        config.webdriver_url = Some(webdriver.clone());
    }

    Ok(config)
}
