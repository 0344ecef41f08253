//! This module provides the `ProgramLoader` struct, responsible for loading programs from
//! files and strings and for saving them back.
//!
//! Files ending in `.json` hold the serde form of a [`Program`]; everything else is read as a
//! definition file.

use crate::encoder::encode;
use crate::parser::parse;
use crate::program::Program;
use crate::types::TuringMachineError;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of definition files picked up by [`ProgramLoader::load_programs`].
pub const DEFINITION_EXTENSION: &str = "tm";

/// `ProgramLoader` is a utility struct for loading and saving programs.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single program from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is successfully read and parsed.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read or holds invalid JSON.
    /// * `Err(TuringMachineError::ParseError)` if a definition file is malformed.
    /// * `Err(TuringMachineError::ValidationError)` if the machine breaks the model's invariants.
    pub fn load_program(path: &Path) -> Result<Program, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        if is_json(path) {
            serde_json::from_str(&content).map_err(|e| {
                TuringMachineError::FileError(format!(
                    "Failed to decode JSON in {}: {}",
                    path.display(),
                    e
                ))
            })
        } else {
            parse(&content)
        }
    }

    /// Loads a single program from the provided definition text.
    pub fn load_program_from_string(content: &str) -> Result<Program, TuringMachineError> {
        parse(content)
    }

    /// Writes `program` to `path`, as JSON for `.json` paths and as a definition file otherwise.
    pub fn save_program(path: &Path, program: &Program) -> Result<(), TuringMachineError> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(program).map_err(|e| {
                TuringMachineError::FileError(format!("Failed to encode JSON: {}", e))
            })?
        } else {
            encode(program)
        };

        fs::write(path, content).map_err(|e| {
            TuringMachineError::FileError(format!(
                "Failed to write file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Loads all definition files (`.tm` extension) from a given directory.
    ///
    /// Directories and files with other extensions are skipped.
    ///
    /// # Returns
    ///
    /// * `Vec<Result<(PathBuf, Program), TuringMachineError>>` - one entry per `.tm` file, holding
    ///   either its path and program or the error that prevented loading it.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), TuringMachineError>> {
        if !directory.exists() {
            return vec![Err(TuringMachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut results: Vec<_> = entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(TuringMachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                // Skip directories and non-.tm files
                if path.is_dir()
                    || path
                        .extension()
                        .is_none_or(|ext| ext != DEFINITION_EXTENSION)
                {
                    return None;
                }

                match Self::load_program(&path) {
                    Ok(program) => Some(Ok((path, program))),
                    Err(e) => Some(Err(TuringMachineError::FileError(format!(
                        "Failed to load program from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect();

        // Directory order is platform dependent.
        results.sort_by_key(|result| result.as_ref().ok().map(|(path, _)| path.clone()));
        results
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}
