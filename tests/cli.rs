//! Behavioural tests for the `asreview-wordcloud` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use rstest::rstest;
use tempfile::TempDir;

const DATASET: &str = "\
title,abstract,included
,Active learning reduces screening workload in systematic reviews,1
,Machine learning ranks records so relevant studies are found early,1
Gardening tips,,0
Tomato harvest,,0
";

fn run(args: &[&str], index: Option<&Path>) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_asreview-wordcloud"));
    command
        .args(args)
        .env_remove("ASREVIEW_WORDCLOUD_FONT")
        .env_remove("RUST_LOG");

    match index {
        Some(path) => {
            command.env("ASREVIEW_WORDCLOUD_DATASET_INDEX", path);
        }
        None => {
            command.env_remove("ASREVIEW_WORDCLOUD_DATASET_INDEX");
        }
    }

    match command.output() {
        Ok(output) => output,
        Err(error) => panic!("failed to run asreview-wordcloud: {error}"),
    }
}

fn write_dataset(dir: &TempDir) -> String {
    let path = dir.path().join("records.csv");
    fs::write(&path, DATASET).unwrap();
    path.display().to_string()
}

fn assert_image(path: &Path, size: (u32, u32)) {
    let image = image::open(path).unwrap();
    assert_eq!((image.width(), image.height()), size);
}

#[test]
fn renders_local_dataset_to_output() {
    let dir = TempDir::new().unwrap();
    let dataset = write_dataset(&dir);
    let output = dir.path().join("cloud.png");

    let result = run(&[dataset.as_str(), "-o", output.display().to_string().as_str()], None);

    assert!(
        result.status.success(),
        "{}",
        String::from_utf8_lossy(&result.stderr)
    );
    assert!(fs::metadata(&output).unwrap().len() > 0);
    assert_image(&output, (400, 200));
}

#[test]
fn size_flags_set_the_figure_size() {
    let dir = TempDir::new().unwrap();
    let dataset = write_dataset(&dir);
    let output = dir.path().join("cloud.jpg");

    let result = run(
        &[
            dataset.as_str(),
            "--width",
            "320",
            "--height",
            "240",
            "--colormap",
            "plasma",
            "-o",
            output.display().to_string().as_str(),
        ],
        None,
    );

    assert!(result.status.success());
    assert_image(&output, (320, 240));
}

// Relevant records only have abstracts and irrelevant records only have
// titles, so the wrong selection leaves nothing to draw.
#[rstest]
#[case::relevant_abstracts(&["--relevant", "--abstract"], true)]
#[case::relevant_titles(&["--relevant", "--title"], false)]
#[case::irrelevant_titles(&["--irrelevant", "--title"], true)]
#[case::irrelevant_abstracts(&["--irrelevant", "--abstract"], false)]
#[case::everything(&[], true)]
fn flags_select_rows_and_text(#[case] flags: &[&str], #[case] expect_success: bool) {
    let dir = TempDir::new().unwrap();
    let dataset = write_dataset(&dir);
    let output = dir.path().join("cloud.png");
    let output_arg = output.display().to_string();

    let mut args = vec![dataset.as_str(), "-o", output_arg.as_str()];
    args.extend_from_slice(flags);
    let result = run(&args, None);

    assert_eq!(result.status.success(), expect_success);
    assert_eq!(output.exists(), expect_success);
    if !expect_success {
        let stderr = String::from_utf8_lossy(&result.stderr);
        assert!(stderr.contains("at least 1 word"), "{stderr}");
    }
}

#[rstest]
#[case::zero_width(&["records.csv", "--width", "0"])]
#[case::bad_seed(&["records.csv", "--random_state", "abc"])]
#[case::unknown_flag(&["records.csv", "--verbose"])]
#[case::missing_path(&[])]
fn malformed_arguments_exit_with_usage_error(#[case] args: &[&str]) {
    let result = run(args, None);

    assert_eq!(result.status.code(), Some(2));
    assert!(!result.stderr.is_empty());
}

#[test]
fn version_flag_prints_version() {
    let result = run(&["-V"], None);

    assert!(result.status.success());
    assert!(String::from_utf8_lossy(&result.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_dataset_is_reported() {
    let dir = TempDir::new().unwrap();
    let index = dir.path().join("index.json");
    fs::write(&index, "[]").unwrap();

    let result = run(&["benchmark:does_not_exist"], Some(&index));

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(
        stderr.contains("File, URL, or dataset does not exist: 'benchmark:does_not_exist'"),
        "{stderr}"
    );
}

#[test]
fn dataset_alias_resolves_through_local_index() {
    let dir = TempDir::new().unwrap();
    write_dataset(&dir);
    let index = dir.path().join("index.json");
    fs::write(
        &index,
        r#"[{"dataset_id": "smith2020", "url": "records.csv", "title": "Smith 2020"}]"#,
    )
    .unwrap();
    let output = dir.path().join("cloud.png");

    let result = run(
        &["benchmark:smith2020", "-o", output.display().to_string().as_str()],
        Some(&index),
    );

    assert!(
        result.status.success(),
        "{}",
        String::from_utf8_lossy(&result.stderr)
    );
    assert_image(&output, (400, 200));
}

#[test]
#[ignore = "downloads a benchmark dataset"]
fn benchmark_dataset_renders() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("cloud.png");

    let result = run(
        &["benchmark:van_de_schoot2017", "-o", output.display().to_string().as_str()],
        None,
    );

    assert!(result.status.success());
    assert!(fs::metadata(&output).unwrap().len() > 0);
}
