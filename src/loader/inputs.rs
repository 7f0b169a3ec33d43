use indexmap::IndexMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

use super::record::{load_rows, SourceRow};
use crate::error::{Result, SeedError};

pub const DATASETS_CSV: &str = "datasets.csv";
pub const DATASET_FILES_CSV: &str = "dataset_files.csv";
pub const ANNOTATION_CAMPAIGNS_CSV: &str = "annotation_campaigns.csv";
pub const USERS_CSV: &str = "users.csv";

/// Everything read from a seed folder. Built once, before any entity is derived.
#[derive(Debug, Clone, Default)]
pub struct SeedInputs {
    pub datasets: Vec<SourceRow>,
    pub dataset_files: Vec<SourceRow>,
    pub annotation_campaigns: Vec<SourceRow>,
    /// `None` when the folder has no users.csv
    pub users: Option<Vec<SourceRow>>,
    /// Byte size of each audio file named in dataset_files.csv
    pub file_sizes: IndexMap<String, u64>,
}

impl SeedInputs {
    pub fn load(seed_folder: &Path) -> Result<Self> {
        if !seed_folder.is_dir() {
            return Err(SeedError::MissingInput {
                path: seed_folder.to_path_buf(),
            });
        }

        let datasets = load_rows(&seed_folder.join(DATASETS_CSV))?;
        let dataset_files = load_rows(&seed_folder.join(DATASET_FILES_CSV))?;
        let annotation_campaigns = load_rows(&seed_folder.join(ANNOTATION_CAMPAIGNS_CSV))?;

        let users_path = seed_folder.join(USERS_CSV);
        let users = if users_path.exists() {
            Some(load_rows(&users_path)?)
        } else {
            None
        };

        let mut file_sizes = IndexMap::new();
        for row in &dataset_files {
            let filename = row.field("filename")?;
            let size = audio_file_size(seed_folder, filename)?;
            debug!("{}: {} bytes", filename, size);
            file_sizes.insert(filename.to_string(), size);
        }

        info!(
            "Loaded {} datasets, {} files, {} campaign rows, {} user rows",
            datasets.len(),
            dataset_files.len(),
            annotation_campaigns.len(),
            users
                .as_ref()
                .map(|u| u.len().to_string())
                .unwrap_or_else(|| "default".to_string())
        );

        Ok(Self {
            datasets,
            dataset_files,
            annotation_campaigns,
            users,
            file_sizes,
        })
    }
}

fn audio_file_size(seed_folder: &Path, filename: &str) -> Result<u64> {
    let path = seed_folder.join(filename);
    match fs::metadata(&path) {
        Ok(meta) if meta.is_file() => Ok(meta.len()),
        Ok(_) => Err(SeedError::MissingInput { path }),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(SeedError::MissingInput { path }),
        Err(e) => Err(e.into()),
    }
}
