/// Collapses every whitespace run (newlines and tabs included) into a single
/// space and trims both ends.
///
/// Table cells and option labels are usually indented markup, so the raw text
/// of a cell like `<td>\n   Jane\n   Doe\n</td>` becomes `"Jane Doe"`.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
