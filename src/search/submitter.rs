use crate::config::FieldNames;
use crate::error::SearchError;
use crate::parsers::{FormSnapshot, SelectField};
use crate::resolver::resolve_option;
use crate::results::SearchRequest;
use crate::search::walker::PageSource;
use crate::session::Session;
use async_trait::async_trait;
use url::Url;

/// Form fields sent with a search, in form order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionPayload {
    fields: Vec<(String, String)>,
}

impl SubmissionPayload {
    /// Set a field; an existing field keeps its position
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Copy of this payload asking for a specific result page
    pub fn with_page(&self, page_field: &str, page: u32) -> Self {
        let mut payload = self.clone();
        payload.set(page_field, page.to_string());
        payload
    }
}

/// Form defaults with the request's state, member and breed mapped onto
/// option values.
///
/// Dropdowns the request leaves alone are reset to their empty ("any")
/// option when they have one, otherwise to the option the page marks
/// selected. A target no option matches clears its field.
pub fn build_payload(
    snapshot: &FormSnapshot,
    request: &SearchRequest,
    names: &FieldNames,
) -> SubmissionPayload {
    let mut payload = SubmissionPayload::default();
    for (name, value) in &snapshot.inputs {
        payload.set(name.as_str(), value.as_str());
    }

    for select in &snapshot.selects {
        match requested_target(select, request, names) {
            Some(target) => {
                let value = resolve_option(&select.options, target);
                if value.is_empty() {
                    ::log::warn!(
                        "No option of {} matches {:?}, leaving it unfiltered",
                        select.name,
                        target
                    );
                }
                payload.set(select.name.as_str(), value);
            }
            None if select.has_empty_option() => payload.set(select.name.as_str(), ""),
            None => {
                if let Some(selected) = &select.selected {
                    payload.set(select.name.as_str(), selected.as_str());
                }
            }
        }
    }

    payload
}

fn requested_target<'r>(
    select: &SelectField,
    request: &'r SearchRequest,
    names: &FieldNames,
) -> Option<&'r str> {
    let target = if select.name == names.state {
        request.state.as_deref()
    } else if select.name == names.member {
        request.member.as_deref()
    } else if select.name == names.breed {
        request.breed.as_deref()
    } else {
        None
    };
    target.map(str::trim).filter(|t| !t.is_empty())
}

/// Posts payloads to the search endpoint over the session
pub struct Submitter<'a> {
    session: &'a Session,
    endpoint: &'a Url,
    page_field: &'a str,
}

impl<'a> Submitter<'a> {
    pub fn new(session: &'a Session, endpoint: &'a Url, page_field: &'a str) -> Self {
        Self {
            session,
            endpoint,
            page_field,
        }
    }

    /// Runs the initial search and returns the first result page
    pub async fn submit(&self, payload: &SubmissionPayload) -> Result<String, SearchError> {
        self.session.post_form(self.endpoint, payload.fields()).await
    }
}

#[async_trait]
impl PageSource for Submitter<'_> {
    async fn fetch_page(
        &self,
        payload: &SubmissionPayload,
        page: u32,
    ) -> Result<String, SearchError> {
        let paged = payload.with_page(self.page_field, page);
        self.session.post_form(self.endpoint, paged.fields()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::SelectOption;

    fn snapshot() -> FormSnapshot {
        FormSnapshot {
            inputs: vec![
                ("token".to_string(), "t0k".to_string()),
                ("memberName".to_string(), String::new()),
            ],
            selects: vec![
                SelectField {
                    name: "stateID".to_string(),
                    options: vec![
                        SelectOption::new("All States", ""),
                        SelectOption::new("Kansas", "KS"),
                    ],
                    selected: None,
                },
                SelectField {
                    name: "memberID".to_string(),
                    options: vec![
                        SelectOption::new("Any", ""),
                        SelectOption::new("Dwight Elmore", "901"),
                    ],
                    selected: None,
                },
                SelectField {
                    name: "breedID".to_string(),
                    options: vec![
                        SelectOption::new("Any", ""),
                        SelectOption::new("(AR) - American Red", "12"),
                    ],
                    selected: None,
                },
                SelectField {
                    name: "sortBy".to_string(),
                    options: vec![
                        SelectOption::new("Name", "name"),
                        SelectOption::new("State", "state"),
                    ],
                    selected: Some("state".to_string()),
                },
                SelectField {
                    name: "region".to_string(),
                    options: vec![SelectOption::new("North", "n")],
                    selected: None,
                },
            ],
        }
    }

    #[test]
    fn test_targets_resolved_and_others_cleared() {
        let request = SearchRequest::new(Some("kansas".into()), None, Some("American Red".into()));
        let payload = build_payload(&snapshot(), &request, &FieldNames::default());

        assert_eq!(payload.get("token"), Some("t0k"));
        assert_eq!(payload.get("memberName"), Some(""));
        assert_eq!(payload.get("stateID"), Some("KS"));
        assert_eq!(payload.get("memberID"), Some(""));
        assert_eq!(payload.get("breedID"), Some("12"));
        assert_eq!(payload.get("sortBy"), Some("state"));
        assert_eq!(payload.get("region"), None);
    }

    #[test]
    fn test_unmatched_target_clears_field() {
        let request = SearchRequest::new(None, Some("Nobody Known".into()), None);
        let payload = build_payload(&snapshot(), &request, &FieldNames::default());
        assert_eq!(payload.get("memberID"), Some(""));
    }

    #[test]
    fn test_blank_target_counts_as_absent() {
        let request = SearchRequest::new(Some("  ".into()), None, None);
        let payload = build_payload(&snapshot(), &request, &FieldNames::default());
        assert_eq!(payload.get("stateID"), Some(""));
    }

    #[test]
    fn test_custom_field_names() {
        let names = FieldNames {
            state: "sortBy".to_string(),
            ..FieldNames::default()
        };
        let request = SearchRequest::new(Some("name".into()), None, None);
        let payload = build_payload(&snapshot(), &request, &names);
        assert_eq!(payload.get("sortBy"), Some("name"));
        assert_eq!(payload.get("stateID"), Some(""));
    }

    #[test]
    fn test_with_page_leaves_original_untouched() {
        let payload = build_payload(&snapshot(), &SearchRequest::default(), &FieldNames::default());
        let paged = payload.with_page("page", 3);
        assert_eq!(paged.get("page"), Some("3"));
        assert_eq!(payload.get("page"), None);
        assert_eq!(paged.fields().len(), payload.fields().len() + 1);

        let again = paged.with_page("page", 4);
        assert_eq!(again.get("page"), Some("4"));
        assert_eq!(again.fields().len(), paged.fields().len());
    }
}
