//! The `asreview wordcloud` subcommand.

use std::{ffi::OsString, path::PathBuf};

use clap::{value_parser, Parser};
use log::info;

use crate::{
    data::{self, Subset, TextField},
    extend_stopwords,
    figure::{self, CloudOptions},
    Config, Error,
};

/// Wordcloud functionality for ASReview datasets.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "asreview wordcloud", version, about)]
pub struct Args {
    /// The file path of the dataset.
    pub path: String,

    /// Create wordcloud of titles only.
    #[arg(long)]
    pub title: bool,

    /// Create wordcloud of abstracts only.
    #[arg(long = "abstract")]
    pub abstract_only: bool,

    /// Create wordcloud of relevant records only.
    #[arg(long)]
    pub relevant: bool,

    /// Create wordcloud of irrelevant records only.
    #[arg(long)]
    pub irrelevant: bool,

    /// Set random state of wordcloud.
    #[arg(
        long = "random_state",
        visible_alias = "random-state",
        default_value_t = 535,
        allow_negative_numbers = true
    )]
    pub random_state: i64,

    /// The colormap of the wordcloud.
    #[arg(long, default_value = "viridis")]
    pub colormap: String,

    /// The width of the wordcloud.
    #[arg(long, default_value_t = 400, value_parser = value_parser!(u32).range(1..))]
    pub width: u32,

    /// The height of the wordcloud.
    #[arg(long, default_value_t = 200, value_parser = value_parser!(u32).range(1..))]
    pub height: u32,

    /// Save the wordcloud to a file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Background colour of the wordcloud, any CSS colour.
    #[arg(
        long = "background_color",
        visible_alias = "background-color",
        default_value = "white"
    )]
    pub background_color: String,

    /// Maximum number of words in the wordcloud.
    #[arg(long = "max_words", visible_alias = "max-words", default_value_t = 100)]
    pub max_words: usize,

    /// Extra word to leave out, can be repeated.
    #[arg(long = "stopword", value_name = "WORD")]
    pub stopwords: Vec<String>,

    /// Font file (TTF or OTF) to render with. The bundled font has no CJK
    /// glyphs, so Chinese, Japanese or Korean text needs one.
    #[arg(long)]
    pub font: Option<PathBuf>,
}

impl Args {
    pub fn subset(&self) -> Subset {
        Subset::from_flags(self.relevant, self.irrelevant)
    }

    pub fn text_field(&self) -> TextField {
        TextField::from_flags(self.title, self.abstract_only)
    }

    /// Styling for the engine; `--font` wins over the configured font.
    pub fn styling(&self, config: &Config) -> CloudOptions {
        CloudOptions {
            width: self.width,
            height: self.height,
            colormap: self.colormap.clone(),
            // same bits, so negative seeds stay distinct
            random_state: Some(self.random_state as u64),
            background_color: self.background_color.clone(),
            max_words: self.max_words,
            stopwords: extend_stopwords(self.stopwords.iter().cloned()),
            font: self.font.clone().or_else(|| config.font.clone()),
        }
    }
}

/// A subcommand of the `asreview` command line.
pub trait EntryPoint {
    fn description(&self) -> &str;
    fn extension_name(&self) -> &str;
    fn version(&self) -> &str;

    /// Run with the arguments that follow the subcommand name.
    fn execute(&self, argv: &[OsString]) -> Result<(), Error>;
}

#[derive(Debug, Clone)]
pub struct WordCloudEntryPoint {
    config: Config,
}

impl WordCloudEntryPoint {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl Default for WordCloudEntryPoint {
    fn default() -> Self {
        Self::new(Config::from_env())
    }
}

impl EntryPoint for WordCloudEntryPoint {
    fn description(&self) -> &str {
        "Wordcloud functionality for ASReview datasets."
    }

    fn extension_name(&self) -> &str {
        "asreview-wordcloud"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn execute(&self, argv: &[OsString]) -> Result<(), Error> {
        let program = OsString::from("asreview wordcloud");
        let args = Args::try_parse_from(std::iter::once(&program).chain(argv))?;

        run(&args, &self.config)
    }
}

pub fn run(args: &Args, config: &Config) -> Result<(), Error> {
    let data = data::load_data(&args.path, config)?;

    let mask = args.subset().mask(&data);
    let selected = mask.iter().filter(|selected| **selected).count();
    info!(
        "Selected {selected} of {} records ({:?}, {:?})",
        data.len(),
        args.subset(),
        args.text_field()
    );

    let cells = data.column(args.text_field(), &mask);
    figure::word_cloud(&cells, &args.styling(config), args.output.as_deref())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::{CommandFactory, Parser};
    use rstest::rstest;

    use super::{Args, EntryPoint, WordCloudEntryPoint};
    use crate::{
        data::{Subset, TextField},
        Config,
    };

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("asreview wordcloud").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn defaults_match_the_plugin() {
        let args = parse(&["data.csv"]);

        assert_eq!(args.path, "data.csv");
        assert_eq!(args.random_state, 535);
        assert_eq!(args.colormap, "viridis");
        assert_eq!((args.width, args.height), (400, 200));
        assert_eq!(args.output, None);
        assert_eq!(args.subset(), Subset::All);
        assert_eq!(args.text_field(), TextField::FullText);
    }

    #[rstest]
    #[case(&["d.csv", "--title"], Subset::All, TextField::Title)]
    #[case(&["d.csv", "--abstract", "--relevant"], Subset::Relevant, TextField::Abstract)]
    #[case(&["d.csv", "--irrelevant"], Subset::Irrelevant, TextField::FullText)]
    #[case(
        &["d.csv", "--title", "--abstract", "--relevant", "--irrelevant"],
        Subset::All,
        TextField::FullText
    )]
    fn flags_select_rows_and_field(
        #[case] argv: &[&str],
        #[case] subset: Subset,
        #[case] field: TextField,
    ) {
        let args = parse(argv);

        assert_eq!(args.subset(), subset);
        assert_eq!(args.text_field(), field);
    }

    #[test]
    fn styling_flags_reach_the_engine_options() {
        let args = parse(&[
            "d.csv",
            "--random_state",
            "7",
            "--colormap",
            "plasma",
            "--width",
            "640",
            "--height",
            "480",
            "-o",
            "cloud.png",
            "--stopword",
            "covid",
            "--max_words",
            "50",
        ]);
        let config = Config {
            font: Some(PathBuf::from("/fonts/env.ttf")),
            ..Config::default()
        };

        let options = args.styling(&config);

        assert_eq!(args.output, Some(PathBuf::from("cloud.png")));
        assert_eq!(options.random_state, Some(7));
        assert_eq!(options.colormap, "plasma");
        assert_eq!((options.width, options.height), (640, 480));
        assert_eq!(options.max_words, 50);
        assert_eq!(options.background_color, "white");
        assert!(options.stopwords.iter().any(|word| word == "covid"));
        assert!(options.stopwords.iter().any(|word| word == "the"));
        assert_eq!(options.font, Some(PathBuf::from("/fonts/env.ttf")));
    }

    #[test]
    fn negative_seeds_are_accepted() {
        let args = parse(&["d.csv", "--random_state", "-7"]);

        assert_eq!(args.random_state, -7);
        assert_eq!(
            args.styling(&Config::default()).random_state,
            Some((-7_i64) as u64)
        );
    }

    #[test]
    fn font_help_mentions_cjk() {
        let command = Args::command();
        let font = command
            .get_arguments()
            .find(|arg| arg.get_id() == "font")
            .unwrap();

        assert!(font.get_help().unwrap().to_string().contains("CJK"));
    }

    #[rstest]
    #[case(&["d.csv", "--width", "0"])]
    #[case(&["d.csv", "--height", "-5"])]
    #[case(&["d.csv", "--random_state", "abc"])]
    #[case(&["d.csv", "--unknown"])]
    #[case(&[])]
    fn malformed_arguments_are_rejected(#[case] argv: &[&str]) {
        let result =
            Args::try_parse_from(std::iter::once("asreview wordcloud").chain(argv.iter().copied()));

        assert!(result.is_err());
    }

    #[test]
    fn entry_point_metadata() {
        let entry_point = WordCloudEntryPoint::new(Config::default());

        assert_eq!(entry_point.extension_name(), "asreview-wordcloud");
        assert_eq!(
            entry_point.description(),
            "Wordcloud functionality for ASReview datasets."
        );
        assert_eq!(entry_point.version(), env!("CARGO_PKG_VERSION"));
    }
}
