/// Column names accepted for each field, compared case-insensitively. Earlier
/// names win when a file has several.
pub const TITLE_COLUMNS: &[&str] = &["title", "primary_title"];
pub const ABSTRACT_COLUMNS: &[&str] = &["abstract", "abstract note"];
pub const LABEL_COLUMNS: &[&str] = &[
    "final_included",
    "label",
    "label_included",
    "included_label",
    "included_final",
    "included",
    "included_flag",
    "include",
];

/// Screening decision attached to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Irrelevant,
    Relevant,
}

impl Label {
    /// `1` is relevant and `0` irrelevant; everything else (`-1`, blanks,
    /// free text) means the record is unlabeled.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" | "1.0" => Some(Label::Relevant),
            "0" | "0.0" => Some(Label::Irrelevant),
            _ => None,
        }
    }
}

/// One row of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub title: String,
    pub abstract_text: String,
    pub label: Option<Label>,
}

impl Record {
    /// Title and abstract joined by a space.
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.abstract_text)
    }
}

/// Which text of each record goes into the cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    FullText,
    Title,
    Abstract,
}

impl TextField {
    /// Asking for both fields is the same as asking for neither.
    pub fn from_flags(title: bool, abstract_text: bool) -> Self {
        match (title, abstract_text) {
            (true, false) => TextField::Title,
            (false, true) => TextField::Abstract,
            _ => TextField::FullText,
        }
    }

    pub fn extract(self, record: &Record) -> String {
        match self {
            TextField::FullText => record.text(),
            TextField::Title => record.title.clone(),
            TextField::Abstract => record.abstract_text.clone(),
        }
    }
}

/// A loaded screening dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewData {
    records: Vec<Record>,
}

impl ReviewData {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn titles(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.title.as_str()).collect()
    }

    pub fn abstracts(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.abstract_text.as_str())
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.records.iter().map(Record::text).collect()
    }

    pub fn labels(&self) -> Vec<Option<Label>> {
        self.records.iter().map(|r| r.label).collect()
    }

    /// Cells of `field` for the rows where `mask` is true.
    ///
    /// The mask must have one entry per record.
    pub fn column(&self, field: TextField, mask: &[bool]) -> Vec<String> {
        debug_assert_eq!(mask.len(), self.records.len());

        self.records
            .iter()
            .zip(mask)
            .filter(|(_, selected)| **selected)
            .map(|(record, _)| field.extract(record))
            .collect()
    }
}
