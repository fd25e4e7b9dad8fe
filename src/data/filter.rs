use super::model::{Label, ReviewData};

/// Which records go into the cloud, by screening label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subset {
    All,
    Relevant,
    Irrelevant,
}

impl Subset {
    /// Asking for both subsets is the same as asking for neither.
    pub fn from_flags(relevant: bool, irrelevant: bool) -> Self {
        match (relevant, irrelevant) {
            (true, false) => Subset::Relevant,
            (false, true) => Subset::Irrelevant,
            _ => Subset::All,
        }
    }

    pub fn includes(self, label: Option<Label>) -> bool {
        match self {
            Subset::All => true,
            Subset::Relevant => label == Some(Label::Relevant),
            Subset::Irrelevant => label == Some(Label::Irrelevant),
        }
    }

    /// One entry per record; unlabeled records are only in [`Subset::All`].
    pub fn mask(self, data: &ReviewData) -> Vec<bool> {
        data.records()
            .iter()
            .map(|record| self.includes(record.label))
            .collect()
    }
}
