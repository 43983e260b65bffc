use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("reading population file \"{path}\" failed: {source}")]
    ReadPopulation { path: PathBuf, #[source] source: std::io::Error },
    #[error("writing run file \"{path}\" failed: {source}")]
    WriteRunFile { path: PathBuf, #[source] source: std::io::Error },
    #[error("opening CSV log \"{path}\" failed: {source}")]
    OpenCsvLog { path: PathBuf, #[source] source: std::io::Error },
    #[error("writing CSV row failed: {0}")]
    CsvWrite(#[from] csv::Error),
    #[error("malformed population/run JSON in \"{path}\": {source}")]
    MalformedJson { path: PathBuf, #[source] source: serde_json::Error },
    #[error("population must not be empty")]
    EmptyPopulation,
}
