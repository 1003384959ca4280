use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// What the user is looking for. Values are free text and are only matched
/// against the form's options when the search is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub member: Option<String>,

    #[serde(default)]
    pub breed: Option<String>,
}

impl SearchRequest {
    pub fn new(state: Option<String>, member: Option<String>, breed: Option<String>) -> Self {
        Self {
            state,
            member,
            breed,
        }
    }

    /// True when no field carries a non-blank value
    pub fn is_empty(&self) -> bool {
        [&self.state, &self.member, &self.breed]
            .iter()
            .all(|v| v.as_deref().is_none_or(|s| s.trim().is_empty()))
    }
}

impl fmt::Display for SearchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "None".to_string());
        write!(
            f,
            "State={}, Member={}, Breed={}",
            show(&self.state),
            show(&self.member),
            show(&self.breed)
        )
    }
}

/// One row of a results table, keyed by column header in table order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultRecord {
    fields: Vec<(String, String)>,
}

impl ResultRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value. A repeated header keeps its first position and
    /// takes the latest value.
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        let header = header.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(h, _)| *h == header) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((header, value)),
        }
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(h, _)| h.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when every value is empty or whitespace
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, v)| v.trim().is_empty())
    }
}

impl<H: Into<String>, V: Into<String>> FromIterator<(H, V)> for ResultRecord {
    fn from_iter<I: IntoIterator<Item = (H, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (h, v) in iter {
            record.insert(h, v);
        }
        record
    }
}

impl Serialize for ResultRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (h, v) in &self.fields {
            map.serialize_entry(h, v)?;
        }
        map.end()
    }
}

/// Records gathered across all pages of a search, in the order they were found
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    records: Vec<ResultRecord>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = ResultRecord>) {
        self.records.extend(records);
    }

    pub fn push(&mut self, record: ResultRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ResultRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ResultRecord;
    type IntoIter = std::slice::Iter<'a, ResultRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
