use crate::parsers::html::{attr_or_empty, selector, text_of};
use scraper::{Html, Selector};
use std::sync::LazyLock;

static INPUT: LazyLock<Selector> = LazyLock::new(|| selector("input[name]"));
static SELECT: LazyLock<Selector> = LazyLock::new(|| selector("select[name]"));
static OPTION: LazyLock<Selector> = LazyLock::new(|| selector("option"));

/// One entry of a dropdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Human-readable label
    pub text: String,
    /// Code submitted to the server
    pub value: String,
}

impl SelectOption {
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
        }
    }
}

/// A named `<select>` with its options in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectField {
    pub name: String,
    pub options: Vec<SelectOption>,
    /// Value of the option explicitly marked `selected`, if any
    pub selected: Option<String>,
}

impl SelectField {
    /// True when one of the options submits an empty value ("any"/"all")
    pub fn has_empty_option(&self) -> bool {
        self.options.iter().any(|o| o.value.is_empty())
    }
}

/// Fields of the search form as served, before any user input is applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    /// Plain inputs and their default values, in document order
    pub inputs: Vec<(String, String)>,
    /// Selectable fields, in document order
    pub selects: Vec<SelectField>,
}

impl FormSnapshot {
    /// Collects named inputs and selects from the markup.
    ///
    /// Unnamed controls are skipped. Broken markup gives a partial or empty
    /// snapshot, never an error.
    pub fn parse(html: &str) -> Self {
        let doc = Html::parse_document(html);
        let root = doc.root_element();

        let inputs = root
            .select(&INPUT)
            .filter_map(|input| {
                let name = input.value().attr("name")?;
                (!name.is_empty()).then(|| (name.to_string(), attr_or_empty(input, "value")))
            })
            .collect::<Vec<_>>();

        let selects = root
            .select(&SELECT)
            .filter_map(|select| {
                let name = select.value().attr("name")?;
                if name.is_empty() {
                    return None;
                }
                let mut selected = None;
                let options = select
                    .select(&OPTION)
                    .map(|option| {
                        let value = attr_or_empty(option, "value");
                        if selected.is_none() && option.value().attr("selected").is_some() {
                            selected = Some(value.clone());
                        }
                        SelectOption::new(text_of(option), value)
                    })
                    .collect();
                Some(SelectField {
                    name: name.to_string(),
                    options,
                    selected,
                })
            })
            .collect::<Vec<_>>();

        ::log::debug!(
            "Form snapshot: {} inputs, {} selects",
            inputs.len(),
            selects.len()
        );

        Self { inputs, selects }
    }

    pub fn select(&self, name: &str) -> Option<&SelectField> {
        self.selects.iter().find(|s| s.name == name)
    }

    pub fn input(&self, name: &str) -> Option<&str> {
        self.inputs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}
