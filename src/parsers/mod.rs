pub mod form;
pub mod html;
pub mod pagination;
pub mod table;
pub mod text;


pub use form::{FormSnapshot, SelectField, SelectOption};
pub use pagination::{PaginationOptions, PaginationState};

use crate::results::ResultRecord;
use scraper::Html;
use url::Url;

/// Everything the search loop needs from one result page
#[derive(Debug, Clone, Default)]
pub struct ResultPage {
    /// Records from every data table on the page
    pub records: Vec<ResultRecord>,
    /// Pagination control state of the page
    pub pagination: PaginationState,
}

impl ResultPage {
    /// Parses the page once and derives both records and pagination from it
    pub fn parse(html: &str, base: &Url, options: PaginationOptions) -> Self {
        let doc = Html::parse_document(html);
        Self {
            records: table::extract(&doc, base),
            pagination: PaginationState::detect(&doc, options),
        }
    }
}
