use url::Url;

/// Resolve a link found on a result page against the search endpoint.
///
/// Absolute links pass through unchanged; anything `Url::join` rejects is
/// kept verbatim.
pub fn absolutize(base: &Url, href: &str) -> String {
    match base.join(href) {
        Ok(resolved) => resolved.to_string(),
        Err(e) => {
            ::log::debug!("Keeping unresolvable link {:?}: {}", href, e);
            href.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolutize() {
        let base = Url::parse("https://www.example.org/dir/search.cfm").unwrap();
        assert_eq!(
            absolutize(&base, "/member/42"),
            "https://www.example.org/member/42"
        );
        assert_eq!(
            absolutize(&base, "detail.cfm?id=7"),
            "https://www.example.org/dir/detail.cfm?id=7"
        );
        assert_eq!(
            absolutize(&base, "https://other.org/x"),
            "https://other.org/x"
        );
        assert_eq!(
            absolutize(&base, "mailto:someone@example.org"),
            "mailto:someone@example.org"
        );
    }
}
