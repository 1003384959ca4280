use crate::parsers::html::{find_first, selector, text_of};
use crate::results::ResultRecord;
use crate::utils::absolutize;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

static TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table"));
static THEAD: LazyLock<Selector> = LazyLock::new(|| selector("thead"));
static TBODY: LazyLock<Selector> = LazyLock::new(|| selector("tbody"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("th, td"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));

/// Extracts records from every data table in the markup.
///
/// Links inside cells are resolved against `base`.
pub fn extract_records(html: &str, base: &Url) -> Vec<ResultRecord> {
    let doc = Html::parse_document(html);
    extract(&doc, base)
}

/// Extracts records from an already parsed page, tables in document order
pub fn extract(doc: &Html, base: &Url) -> Vec<ResultRecord> {
    let mut records = Vec::new();
    for (index, table) in doc.select(&TABLE).enumerate() {
        let headers = table_headers(table);
        if headers.is_empty() {
            ::log::trace!("Skipping table {} without a header row", index);
            continue;
        }

        let before = records.len();
        records.extend(table_rows(table, &headers, base));
        ::log::debug!(
            "Table {} ({} columns) gave {} records",
            index,
            headers.len(),
            records.len() - before
        );
    }
    records
}

/// Header labels from the first row of the table's `<thead>`
fn table_headers(table: ElementRef<'_>) -> Vec<String> {
    find_first(table, &THEAD)
        .and_then(|thead| find_first(thead, &ROW))
        .map(|row| row.select(&CELL).map(text_of).collect())
        .unwrap_or_default()
}

fn table_rows<'a>(
    table: ElementRef<'a>,
    headers: &'a [String],
    base: &'a Url,
) -> impl Iterator<Item = ResultRecord> + 'a {
    find_first(table, &TBODY)
        .into_iter()
        .flat_map(|tbody| tbody.select(&ROW))
        .filter_map(move |row| {
            let cells = row.select(&CELL).collect::<Vec<_>>();
            if cells.len() < headers.len() {
                return None;
            }
            let record = headers
                .iter()
                .zip(cells)
                .map(|(header, cell)| (header.clone(), cell_value(cell, base)))
                .collect::<ResultRecord>();
            (!record.is_blank()).then_some(record)
        })
}

/// Cell text, with the first link's absolute URL appended as ` [url]`
fn cell_value(cell: ElementRef<'_>, base: &Url) -> String {
    let text = text_of(cell);
    match find_first(cell, &LINK).and_then(|a| a.value().attr("href")) {
        Some(href) if !href.is_empty() => format!("{} [{}]", text, absolutize(base, href)),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.example.org/frm_directorySearch.cfm").unwrap()
    }

    #[test]
    fn test_linked_cell_gets_absolute_url() {
        let html = r#"
            <table>
              <thead><tr><th>Name</th><th>State</th></tr></thead>
              <tbody><tr><td><a href="/member/42">Jane Doe</a></td><td>Kansas</td></tr></tbody>
            </table>"#;
        let records = extract_records(html, &base());
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            [
                ("Name", "Jane Doe [https://www.example.org/member/42]"),
                ("State", "Kansas"),
            ]
            .into_iter()
            .collect::<ResultRecord>()
        );
    }

    #[test]
    fn test_short_and_blank_rows_dropped() {
        let html = r#"
            <table>
              <thead><tr><td>Name</td><td>State</td></tr></thead>
              <tbody>
                <tr><td>Only one cell</td></tr>
                <tr><td> </td><td></td></tr>
                <tr><td>John</td><td>Ohio</td><td>extra</td></tr>
              </tbody>
            </table>"#;
        let records = extract_records(html, &base());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Name"), Some("John"));
        assert_eq!(records[0].get("State"), Some("Ohio"));
        assert_eq!(records[0].len(), 2);
    }

    #[test]
    fn test_layout_tables_skipped_and_tables_concatenated() {
        let html = r#"
            <table><tr><td>layout</td><td>only</td></tr></table>
            <table>
              <thead><tr><th>Herd</th></tr></thead>
              <tbody><tr><td>A</td></tr></tbody>
            </table>
            <table>
              <thead><tr><th>Breed</th><th>Code</th></tr></thead>
              <tbody><tr><td>American Red</td><td>AR</td></tr></tbody>
            </table>"#;
        let records = extract_records(html, &base());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].headers().collect::<Vec<_>>(), vec!["Herd"]);
        assert_eq!(records[1].get("Code"), Some("AR"));
    }

    #[test]
    fn test_anchor_without_href_is_plain_text() {
        let html = r#"
            <table>
              <thead><tr><th>Name</th></tr></thead>
              <tbody><tr><td><a name="x">Anchor</a></td></tr></tbody>
            </table>"#;
        let records = extract_records(html, &base());
        assert_eq!(records[0].get("Name"), Some("Anchor"));
    }

    #[test]
    fn test_link_only_cell_is_not_blank() {
        let html = r#"
            <table>
              <thead><tr><th>Profile</th></tr></thead>
              <tbody><tr><td><a href="view.cfm?id=3"><img src="i.png"></a></td></tr></tbody>
            </table>"#;
        let records = extract_records(html, &base());
        assert_eq!(
            records[0].get("Profile"),
            Some(" [https://www.example.org/view.cfm?id=3]")
        );
    }
}
