use crate::results::ResultSet;

/// How results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Renders results as a `|`-separated text table.
///
/// Columns come from the first record; records missing a column show an
/// empty cell there.
pub fn render_table(results: &ResultSet) -> String {
    let Some(first) = results.iter().next() else {
        return "No results found.".to_string();
    };

    let headers = first.headers().collect::<Vec<_>>();
    let widths = headers
        .iter()
        .map(|h| {
            results
                .iter()
                .map(|r| r.get(h).unwrap_or_default().chars().count())
                .fold(h.chars().count(), usize::max)
        })
        .collect::<Vec<_>>();

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let header_line = line(headers.clone());
    let mut out = vec![header_line.clone(), "-".repeat(header_line.chars().count())];
    for record in results {
        out.push(line(
            headers
                .iter()
                .map(|h| record.get(h).unwrap_or_default())
                .collect(),
        ));
    }
    out.join("\n")
}

pub fn render_json(results: &ResultSet) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(results)
}

/// Writes results to stdout in the requested format
pub fn print(results: &ResultSet, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{}", render_table(results)),
        OutputFormat::Json => match render_json(results) {
            Ok(json) => println!("{}", json),
            Err(e) => ::log::error!("Failed to encode results: {}", e),
        },
    }
}
