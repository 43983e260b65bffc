//! JSON persistence for a run's population and maze test set (the format
//! described in the external-interfaces section: `best_program_hex`,
//! `population` as hex strings, `mazes` as serialised `MazeLayout`s), plus
//! the per-generation CSV score log.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use misc_maze::MazeLayout;

use crate::error::RunnerError;

#[derive(Serialize, Deserialize)]
pub struct RunFile {
    pub best_program_hex: String,
    pub population: Vec<String>,
    pub mazes: Vec<MazeLayout>,
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn from_hex(hex: &str) -> Option<Vec<u8>> {
    if !hex.len().is_multiple_of(2) {
        return None;
    }
    (0..hex.len()).step_by(2).map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok()).collect()
}

pub fn save_run(
    path: &Path,
    population: &[Vec<u8>],
    best_program: &[u8],
    mazes: &[MazeLayout],
) -> Result<(), RunnerError> {
    let run_file = RunFile {
        best_program_hex: to_hex(best_program),
        population: population.iter().map(|p| to_hex(p)).collect(),
        mazes: mazes.to_vec(),
    };
    let file = File::create(path)
        .map_err(|source| RunnerError::WriteRunFile { path: path.to_owned(), source })?;
    serde_json::to_writer_pretty(BufWriter::new(file), &run_file)
        .map_err(|source| RunnerError::MalformedJson { path: path.to_owned(), source })
}

pub fn load_population(path: &Path) -> Result<RunFile, RunnerError> {
    let file = File::open(path)
        .map_err(|source| RunnerError::ReadPopulation { path: path.to_owned(), source })?;
    let run_file: RunFile = serde_json::from_reader(BufReader::new(file))
        .map_err(|source| RunnerError::MalformedJson { path: path.to_owned(), source })?;
    Ok(run_file)
}

pub fn decode_population(run_file: &RunFile) -> Vec<Vec<u8>> {
    run_file.population.iter().filter_map(|hex| from_hex(hex)).collect()
}

/// Appends one `generation,score` row per individual to the CSV log,
/// matching the `generation,score` header from the external-interfaces spec.
pub struct ScoreLog {
    writer: csv::Writer<File>,
}

impl ScoreLog {
    pub fn create(path: &PathBuf) -> Result<ScoreLog, RunnerError> {
        let file = File::create(path)
            .map_err(|source| RunnerError::OpenCsvLog { path: path.to_owned(), source })?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(["generation", "score"])?;
        Ok(ScoreLog { writer })
    }

    pub fn log_generation(&mut self, generation: usize, scores: &[i64]) -> Result<(), RunnerError> {
        for score in scores {
            self.writer.write_record([generation.to_string(), score.to_string()])?;
        }
        self.writer.flush().map_err(|e| RunnerError::CsvWrite(csv::Error::from(e)))
    }
}

pub fn hex_summary(best_program: &[u8]) -> String {
    to_hex(best_program)
}
