use std::{env, ffi::OsString};

use anyhow::Result;
use asreview_wordcloud::{
    entrypoint::{EntryPoint, WordCloudEntryPoint},
    Error,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("asreview_wordcloud=info"),
    )
    .init();

    let argv: Vec<OsString> = env::args_os().skip(1).collect();

    match WordCloudEntryPoint::default().execute(&argv) {
        Err(Error::Usage(err)) => err.exit(),
        result => Ok(result?),
    }
}
