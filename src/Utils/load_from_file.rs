use crate::Kinetics::kinetics_errors::KineticsResult;
use crate::Kinetics::mechanism::Mechanism;
use crate::Kinetics::mechanism_input::MechanismInput;
use crate::Thermodynamics::NASAdata::NASAinput;
use log::{error, info, warn};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub struct LoadData {
    pub file_name: String,
}

impl LoadData {
    pub fn new(file_name: String) -> Self {
        LoadData { file_name }
    }
    pub fn load_mechanism(&self) -> KineticsResult<Mechanism> {
        load_mechanism_from_file(&self.file_name)
    }
    pub fn load_thermo(&self) -> KineticsResult<HashMap<String, NASAinput>> {
        load_thermo_from_file(&self.file_name)
    }
}

fn read_lines(file_name: &str) -> KineticsResult<Vec<String>> {
    let file = File::open(Path::new(file_name))?;
    let reader = BufReader::new(file);
    Ok(reader.lines().collect::<Result<Vec<String>, _>>()?)
}

/// Section after one of the `headers` up to the next all-caps header or the end of the document.
/// Without any header the whole document is the section. Returns the index of the first line of
/// the section and its text.
fn find_section(lines: &[String], headers: &[&str]) -> (usize, String) {
    let start_index = lines
        .iter()
        .position(|line| headers.contains(&line.trim().to_uppercase().as_str()))
        .map(|i| i + 1);
    let Some(start_index) = start_index else {
        return (0, lines.join("\n"));
    };
    let mut end_index = lines.len();
    for i in start_index..lines.len() {
        let trimmed = lines[i].trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_uppercase() || c == '_') {
            end_index = i;
            break;
        }
    }
    (start_index, lines[start_index..end_index].join("\n"))
}

/// Parse a JSON section; parse errors are logged with the line of the file and a pointer to the
/// offending column.
fn parse_section<T: DeserializeOwned>(
    file_name: &str,
    what: &str,
    lines: &[String],
    start_index: usize,
    section: &str,
) -> KineticsResult<T> {
    match serde_json::from_str::<T>(section) {
        Ok(data) => {
            info!("Successfully parsed {} from file '{}'", what, file_name);
            Ok(data)
        }
        Err(e) => {
            let error_line = e.line();
            let error_column = e.column();
            // serde_json counts lines from 1
            let actual_line = start_index + error_line.max(1) - 1;
            error!(
                "Error parsing {} at line {}, column {} (line {} in file '{}'): {}",
                what,
                error_line,
                error_column,
                actual_line + 1,
                file_name,
                e
            );
            if let Some(problem_line) = lines.get(actual_line) {
                error!("Problematic line: {}", problem_line);
                if error_column >= 1 && error_column <= problem_line.len() {
                    let pointer = " ".repeat(error_column - 1) + "^";
                    error!("{}", pointer);
                }
            }
            Err(e.into())
        }
    }
}

/// Loads a mechanism document, either the whole file or the section under a "MECHANISM",
/// "KINETICS" or "REACTIONS" header, and builds the validated mechanism.
pub fn load_mechanism_from_file(file_name: &str) -> KineticsResult<Mechanism> {
    let lines = read_lines(file_name)?;
    let (start_index, section) = find_section(&lines, &["MECHANISM", "KINETICS", "REACTIONS"]);
    let input: MechanismInput =
        parse_section(file_name, "mechanism", &lines, start_index, &section)?;
    if input.reactions.is_empty() {
        warn!("Mechanism in file '{}' contains no reactions", file_name);
    }
    let mechanism = input.build()?;
    info!(
        "Loaded mechanism with {} species and {} reactions from file '{}'",
        mechanism.n_species(),
        mechanism.n_reactions(),
        file_name
    );
    Ok(mechanism)
}

/// Loads NASA7 records {species: {"Cp": [...], "composition": {...}}}, either the whole file or
/// the section under a "THERMO" or "SUBSTANCES DATA" header.
pub fn load_thermo_from_file(file_name: &str) -> KineticsResult<HashMap<String, NASAinput>> {
    let lines = read_lines(file_name)?;
    let (start_index, section) =
        find_section(&lines, &["THERMO", "SUBSTANCES DATA", "SUBS DATA", "SUBSTANCE DATA"]);
    let data: HashMap<String, NASAinput> =
        parse_section(file_name, "thermo data", &lines, start_index, &section)?;
    if data.is_empty() {
        warn!("Loaded thermo data is empty");
    }
    Ok(data)
}
