use std::{fs, path::Path};

use csv::ReaderBuilder;
use log::{debug, info};
use regex::Regex;

use super::model::{Label, Record, ReviewData, ABSTRACT_COLUMNS, LABEL_COLUMNS, TITLE_COLUMNS};
use crate::DataError;

const MAX_DOWNLOAD_BYTES: u64 = 512 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Tsv,
    Ris,
}

impl Format {
    /// Format implied by the extension of a path or URL.
    pub fn from_location(location: &str) -> Result<Self, DataError> {
        let path = location.split(['?', '#']).next().unwrap_or(location);
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(Format::Csv),
            "tsv" | "tab" => Ok(Format::Tsv),
            "ris" | "txt" => Ok(Format::Ris),
            _ => Err(DataError::UnsupportedFormat(location.to_owned())),
        }
    }
}

pub fn is_url(location: &str) -> bool {
    let lower = location.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

pub fn download(url: &str) -> Result<Vec<u8>, DataError> {
    debug!("Downloading {url}");
    let download_error = |message: String| DataError::Download {
        url: url.to_owned(),
        message,
    };

    let mut response = ureq::get(url)
        .call()
        .map_err(|error| download_error(error.to_string()))?;

    response
        .body_mut()
        .with_config()
        .limit(MAX_DOWNLOAD_BYTES)
        .read_to_vec()
        .map_err(|error| download_error(error.to_string()))
}

/// Raw bytes behind a local path or URL.
pub fn read_bytes(location: &str) -> Result<Vec<u8>, DataError> {
    if is_url(location) {
        return download(location);
    }

    fs::read(location).map_err(|source| DataError::Io {
        path: location.into(),
        source,
    })
}

/// Read a dataset from a local path or URL, dispatching on its extension.
///
/// Supported formats:
/// * `.csv`         – comma separated, header row required
/// * `.tsv`, `.tab` – tab separated, header row required
/// * `.ris`, `.txt` – RIS records
pub fn from_file(location: &str) -> Result<ReviewData, DataError> {
    let format = Format::from_location(location)?;
    let bytes = read_bytes(location)?;
    let data = parse(format, &bytes, location)?;

    info!("Loaded {} records from {location}", data.len());
    Ok(data)
}

pub fn parse(format: Format, bytes: &[u8], location: &str) -> Result<ReviewData, DataError> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim_start_matches('\u{feff}');

    match format {
        Format::Csv => parse_delimited(text, b',', location),
        Format::Tsv => parse_delimited(text, b'\t', location),
        Format::Ris => Ok(parse_ris(text)),
    }
}

// ---------------------------------------------------------------------------
// CSV / TSV
// ---------------------------------------------------------------------------

fn parse_delimited(text: &str, delimiter: u8, location: &str) -> Result<ReviewData, DataError> {
    let csv_error = |source| DataError::Csv {
        location: location.to_owned(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let find_column = |names: &[&str]| {
        names
            .iter()
            .find_map(|name| headers.iter().position(|h| h == name))
    };
    let title_idx = find_column(TITLE_COLUMNS);
    let abstract_idx = find_column(ABSTRACT_COLUMNS);
    let label_idx = find_column(LABEL_COLUMNS);

    if title_idx.is_none() && abstract_idx.is_none() {
        return Err(DataError::MissingColumns(location.to_owned()));
    }
    if label_idx.is_none() {
        debug!("{location} has no label column, every record is unlabeled");
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(csv_error)?;
        let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i)).unwrap_or("").trim();

        records.push(Record {
            title: cell(title_idx).to_owned(),
            abstract_text: cell(abstract_idx).to_owned(),
            label: label_idx.and_then(|i| row.get(i)).and_then(Label::parse),
        });
    }

    Ok(ReviewData::new(records))
}

// ---------------------------------------------------------------------------
// RIS
// ---------------------------------------------------------------------------

/// RIS layout: one `TG  - value` line per field, records closed by `ER`.
/// Lines without a tag continue the previous field. Screening decisions are
/// read from `N1` notes written by ASReview.
fn parse_ris(text: &str) -> ReviewData {
    let tag_line =
        Regex::new(r"^([A-Z][A-Z0-9]) {1,2}- ?(.*)$").expect("Unable to compile RIS regex");

    let mut records = Vec::new();
    let mut fields: Vec<(String, String)> = Vec::new();

    for line in text.lines() {
        let line = line.trim_end();

        if let Some(caps) = tag_line.captures(line) {
            let (tag, value) = (&caps[1], caps[2].trim());
            if tag == "ER" {
                records.push(ris_record(&fields));
                fields.clear();
            } else {
                fields.push((tag.to_owned(), value.to_owned()));
            }
        } else if let Some((_, value)) = fields.last_mut() {
            if !line.trim().is_empty() {
                value.push(' ');
                value.push_str(line.trim());
            }
        }
    }

    if !fields.is_empty() {
        records.push(ris_record(&fields));
    }

    ReviewData::new(records)
}

fn ris_record(fields: &[(String, String)]) -> Record {
    let first_of = |tags: &[&str]| {
        tags.iter()
            .find_map(|tag| fields.iter().find(|(t, _)| t == tag))
            .map(|(_, value)| value.clone())
            .unwrap_or_default()
    };

    let label = fields
        .iter()
        .filter(|(tag, _)| tag == "N1")
        .find_map(|(_, note)| label_from_note(note));

    Record {
        title: first_of(&["TI", "T1"]),
        abstract_text: first_of(&["AB", "N2"]),
        label,
    }
}

fn label_from_note(note: &str) -> Option<Label> {
    if note.contains("ASReview_relevant") {
        Some(Label::Relevant)
    } else if note.contains("ASReview_irrelevant") {
        Some(Label::Irrelevant)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::{from_file, is_url, parse, Format};
    use crate::data::model::Label;
    use crate::DataError;

    #[rstest]
    #[case("records.csv", Format::Csv)]
    #[case("RECORDS.CSV", Format::Csv)]
    #[case("records.tsv", Format::Tsv)]
    #[case("records.tab", Format::Tsv)]
    #[case("export.ris", Format::Ris)]
    #[case("export.txt", Format::Ris)]
    #[case("https://example.org/data/records.csv?raw=true", Format::Csv)]
    fn format_from_extension(#[case] location: &str, #[case] expected: Format) {
        assert_eq!(Format::from_location(location).unwrap(), expected);
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        assert!(matches!(
            Format::from_location("records.xlsx"),
            Err(DataError::UnsupportedFormat(_))
        ));
    }

    #[rstest]
    #[case("https://example.org/a.csv", true)]
    #[case("HTTP://example.org/a.csv", true)]
    #[case("data/a.csv", false)]
    #[case("benchmark:van_de_schoot2017", false)]
    fn recognises_urls(#[case] location: &str, #[case] expected: bool) {
        assert_eq!(is_url(location), expected);
    }

    #[test]
    fn csv_columns_match_case_insensitively() {
        let csv = "\u{feff}Title,Abstract,Included\n\
                   Deep learning,Neural nets,1\n\
                   Gardening,,0\n\
                   Unscreened,Pending,\n";

        let data = parse(Format::Csv, csv.as_bytes(), "test.csv").unwrap();

        assert_eq!(data.titles(), ["Deep learning", "Gardening", "Unscreened"]);
        assert_eq!(data.abstracts(), ["Neural nets", "", "Pending"]);
        assert_eq!(
            data.labels(),
            [Some(Label::Relevant), Some(Label::Irrelevant), None]
        );
    }

    #[test]
    fn earlier_column_names_win() {
        let csv = "primary_title,title,abstract note,final_included,label\n\
                   Secondary,Primary,Notes,0,1\n";

        let data = parse(Format::Csv, csv.as_bytes(), "test.csv").unwrap();

        assert_eq!(data.titles(), ["Primary"]);
        assert_eq!(data.abstracts(), ["Notes"]);
        assert_eq!(data.labels(), [Some(Label::Irrelevant)]);
    }

    #[test]
    fn tsv_uses_tabs() {
        let tsv = "title\tabstract\nA, with comma\tB\n";

        let data = parse(Format::Tsv, tsv.as_bytes(), "test.tsv").unwrap();

        assert_eq!(data.titles(), ["A, with comma"]);
        assert_eq!(data.labels(), [None]);
    }

    #[test]
    fn csv_without_text_columns_is_rejected() {
        let err = parse(Format::Csv, b"doi,year\n10.1/x,2020\n", "test.csv").unwrap_err();

        assert!(matches!(err, DataError::MissingColumns(location) if location == "test.csv"));
    }

    #[test]
    fn ris_records_with_continuations_and_labels() {
        let ris = "TY  - JOUR\n\
                   TI  - Active learning for\n\
                   screening prioritization\n\
                   AB  - We study ranking.\n\
                   N1  - ASReview_relevant\n\
                   ER  - \n\
                   \n\
                   TY  - JOUR\n\
                   T1  - Unrelated work\n\
                   N2  - Nothing to see.\n\
                   N1  - ASReview_irrelevant\n\
                   ER  - \n\
                   TY  - JOUR\n\
                   TI  - Not yet screened\n\
                   ER  - \n";

        let data = parse(Format::Ris, ris.as_bytes(), "test.ris").unwrap();

        assert_eq!(
            data.titles(),
            [
                "Active learning for screening prioritization",
                "Unrelated work",
                "Not yet screened"
            ]
        );
        assert_eq!(data.abstracts(), ["We study ranking.", "Nothing to see.", ""]);
        assert_eq!(
            data.labels(),
            [Some(Label::Relevant), Some(Label::Irrelevant), None]
        );
    }

    #[test]
    fn reads_local_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.csv");
        fs::write(&path, "title,abstract\nA,B\n").unwrap();

        let data = from_file(&path.display().to_string()).unwrap();

        assert_eq!(data.len(), 1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.csv");

        assert!(matches!(
            from_file(&path.display().to_string()),
            Err(DataError::Io { .. })
        ));
    }
}
