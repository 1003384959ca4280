use clap::Parser;
use directory_search::present::OutputFormat;
use directory_search::{Search, SearchError, SearchRequest};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "directory-search")]
#[command(about = "AMGR Directory Search CLI scraper with pagination")]
#[command(version)]
pub struct Args {
    /// State to search for
    #[arg(long)]
    pub state: Option<String>,

    /// Member name to search for
    #[arg(long)]
    pub member: Option<String>,

    /// Breed to search for
    #[arg(long)]
    pub breed: Option<String>,

    /// Natural language command, turned into search parameters by a language model
    #[arg(long)]
    pub natural: Option<String>,

    /// Interactive mode
    #[arg(long)]
    pub interactive: bool,

    /// Maximum number of result pages to fetch
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Pause between page requests in milliseconds
    #[arg(long)]
    pub page_delay_ms: Option<u64>,

    /// Search form URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print results as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Search builder from the config file (if any) with flag overrides applied
    pub fn search(&self) -> Result<Search, SearchError> {
        let mut search = Search::default();
        if let Some(path) = &self.config {
            search = search.with_config_file(path)?;
        }
        if let Some(base_url) = &self.base_url {
            search = search.with_base_url(base_url);
        }
        if let Some(max_pages) = self.max_pages {
            search = search.with_max_pages(max_pages);
        }
        if let Some(delay) = self.page_delay_ms {
            search = search.with_page_delay_ms(delay);
        }
        Ok(search)
    }

    /// Natural-language command, unless it is blank
    pub fn natural(&self) -> Option<&str> {
        self.natural.as_deref().filter(|text| !text.trim().is_empty())
    }

    pub fn request(&self) -> SearchRequest {
        SearchRequest::new(self.state.clone(), self.member.clone(), self.breed.clone())
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        }
    }
}
