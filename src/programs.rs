//! Sample machines shipped with the crate, embedded at build time and parsed on first use.

use crate::parser::parse;
use crate::program::Program;
use crate::types::TuringMachineError;

use std::sync::RwLock;

// Default embedded programs
const PROGRAM_TEXTS: [(&str, &str); 3] = [
    ("even-a", include_str!("../machines/even-a.tm")),
    ("balanced", include_str!("../machines/balanced.tm")),
    ("append", include_str!("../machines/append.tm")),
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: RwLock<Vec<(String, Program)>> = RwLock::new(Vec::new());
}

pub struct ProgramManager;

impl ProgramManager {
    /// Parses the embedded programs into the registry, replacing its contents.
    ///
    /// # Errors
    ///
    /// Fails if an embedded program does not parse or the registry lock is poisoned.
    pub fn load() -> Result<(), TuringMachineError> {
        let programs = PROGRAM_TEXTS
            .iter()
            .map(|(name, text)| Ok((name.to_string(), parse(text)?)))
            .collect::<Result<Vec<_>, TuringMachineError>>()?;

        let mut write_guard = PROGRAMS.write().map_err(|_| {
            TuringMachineError::FileError("Failed to acquire write lock".to_string())
        })?;
        *write_guard = programs;

        Ok(())
    }

    /// Loads the registry unless it is already populated.
    fn ensure_loaded() -> Result<(), TuringMachineError> {
        let loaded = PROGRAMS
            .read()
            .map(|programs| !programs.is_empty())
            .unwrap_or(false);

        if loaded {
            Ok(())
        } else {
            Self::load()
        }
    }

    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        let _ = Self::ensure_loaded();

        PROGRAMS.read().map(|programs| programs.len()).unwrap_or(0)
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<Program, TuringMachineError> {
        Self::ensure_loaded()?;

        PROGRAMS
            .read()
            .map_err(|_| TuringMachineError::FileError("Failed to acquire read lock".to_string()))?
            .get(index)
            .map(|(_, program)| program.clone())
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program index {} out of range", index))
            })
    }

    /// Get a program by its name
    pub fn get_program_by_name(name: &str) -> Result<Program, TuringMachineError> {
        Self::ensure_loaded()?;

        PROGRAMS
            .read()
            .map_err(|_| TuringMachineError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|(program_name, _)| program_name == name)
            .map(|(_, program)| program.clone())
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program '{}' not found", name))
            })
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        let _ = Self::ensure_loaded();

        PROGRAMS
            .read()
            .map(|programs| programs.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default()
    }

    /// Get the definition text of a program by its index
    pub fn get_program_text_by_index(index: usize) -> Result<&'static str, TuringMachineError> {
        PROGRAM_TEXTS
            .get(index)
            .map(|(_, text)| *text)
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!(
                    "Program text index {} out of range",
                    index
                ))
            })
    }
}
