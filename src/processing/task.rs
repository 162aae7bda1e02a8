use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;
use uuid::Uuid;

use super::effects::Effect;
use crate::error::ErrorType;

/// One image job: which file to read, where to write it and the ordered
/// effect codes to run in between.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageTask {
    #[serde(skip, default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(skip)]
    pub dir: String,
    #[serde(rename = "inPath")]
    pub in_path: String,
    #[serde(rename = "outPath")]
    pub out_path: String,
    pub effects: Vec<String>,
}

impl ImageTask {
    #[allow(unused)]
    pub fn new(in_path: &str, out_path: &str, effects: &[&str]) -> Self {
        Self {
            id: Uuid::new_v4(),
            dir: String::new(),
            in_path: in_path.into(),
            out_path: out_path.into(),
            effects: effects.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Copy of this template bound to `dir`, with its own id.
    pub fn for_dir(&self, dir: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            dir: dir.into(),
            ..self.clone()
        }
    }

    /// Known effects in catalog order. Unknown codes are reported and dropped.
    pub fn resolve_effects(&self) -> Vec<Effect> {
        self.effects
            .iter()
            .filter_map(|code| {
                let effect = Effect::from_code(code);
                if effect.is_none() {
                    warn!("Unknown effect {:?} in task {}, skipping", code, self.id);
                }
                effect
            })
            .collect()
    }
}

/// Parses one JSON record per line. Any line that fails to decode, blank
/// lines included, aborts the whole parse.
pub fn parse_catalog<R: BufRead>(reader: R) -> Result<Vec<ImageTask>, ErrorType> {
    let mut tasks = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|source| ErrorType::CatalogRead {
            line: line_number,
            source,
        })?;

        let task = serde_json::from_str::<ImageTask>(&line).map_err(|source| {
            ErrorType::CatalogParse {
                line: line_number,
                source,
            }
        })?;
        tasks.push(task);
    }

    debug!("Parsed {} catalog entries", tasks.len());

    Ok(tasks)
}

pub fn load_catalog(path: &Path) -> Result<Vec<ImageTask>, ErrorType> {
    let file = File::open(path).map_err(|source| ErrorType::CatalogIo {
        path: path.to_path_buf(),
        source,
    })?;

    parse_catalog(BufReader::new(file))
}

/// Every `+`-separated segment, empty ones included.
pub fn split_dirs(data_dirs: &str) -> Vec<&str> {
    data_dirs.split('+').collect()
}

/// Cross product of directories and catalog templates, directory-major.
pub fn expand(catalog: &[ImageTask], data_dirs: &str) -> Vec<ImageTask> {
    split_dirs(data_dirs)
        .into_iter()
        .flat_map(|dir| catalog.iter().map(move |template| template.for_dir(dir)))
        .collect()
}
