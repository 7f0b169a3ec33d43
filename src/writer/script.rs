use std::fs::{self, Permissions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::emitter::SqlEmitter;
use super::template::ScriptTemplate;
use crate::config::{SeedConfig, OUTPUT_FILE};
use crate::error::Result;
use crate::loader::SeedInputs;
use crate::model::SeedModel;
use crate::schema::DependencyResolver;

/// Summary of one generation run
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub output: PathBuf,
    pub rows: usize,
    pub tasks: usize,
    pub restart: i64,
}

/// Sequence restart value: at least `end_index`, always above every seeded id
pub fn restart_value(model: &SeedModel, config: &SeedConfig) -> i64 {
    let above_seed = model.max_id().map_or(config.start_index + 1, |id| id + 1);
    config.end_index.max(above_seed)
}

/// Render the complete seed script for a built model
pub fn render_script(
    model: &SeedModel,
    config: &SeedConfig,
    template: &ScriptTemplate,
) -> Result<String> {
    let emitter = SqlEmitter::new(template, config.max_insert);
    let mut promises = String::new();

    promises.push_str(&emitter.render("users", &model.users.records())?);
    promises.push_str(&emitter.render("dataset_types", &model.dataset_types.records())?);
    promises.push_str(&emitter.render("geo_metadata", &model.geo_metadata.records())?);
    for sql in model.location_updates() {
        debug!("{}", sql);
        promises.push_str(&emitter.render_raw(&sql)?);
    }
    promises.push_str(&emitter.render("audio_metadata", &model.audio_metadata.records())?);
    promises.push_str(&emitter.render("datasets", &model.datasets.records())?);
    promises.push_str(&emitter.render("dataset_files", &model.dataset_files.records())?);
    promises.push_str(&emitter.render("annotation_sets", &model.annotation_sets.records())?);
    promises.push_str(&emitter.render("annotation_tags", &model.annotation_tags.records())?);
    promises.push_str(&emitter.render("annotation_set_tags", &model.annotation_set_tags)?);
    promises.push_str(&emitter.render(
        "annotation_campaigns",
        &model.annotation_campaigns.records(),
    )?);
    promises.push_str(&emitter.render(
        "annotation_campaign_datasets",
        &model.annotation_campaign_datasets,
    )?);
    promises.push_str(&emitter.render("annotation_tasks", &model.annotation_tasks)?);

    // No init at the moment
    let init = "";
    let tables = DependencyResolver::new().build_order()?;
    let finish = emitter.render_sequence_resets(&tables, restart_value(model, config))?;

    emitter.compose(init, &promises, &finish)
}

/// Replace `path` with `text` through a temporary file in the same directory.
///
/// An existing file keeps its permissions; a new one gets the usual 0644.
pub fn write_script(path: &Path, text: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = match fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(e) if e.kind() == ErrorKind::NotFound => default_permissions(),
        Err(e) => return Err(e.into()),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(text.as_bytes())?;
    file.flush()?;
    if let Some(permissions) = permissions {
        debug!("Output permissions: {:?}", permissions);
        file.as_file().set_permissions(permissions)?;
    }
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// Temp files are created 0600
#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
    None
}

/// Load a seed folder, build every table and write the script.
///
/// The output defaults to `<seed_folder>/init.js`. Nothing is written unless
/// every stage succeeded.
pub fn generate(
    seed_folder: &Path,
    config: &SeedConfig,
    output: Option<&Path>,
) -> Result<GenerationReport> {
    let start = Instant::now();
    config.validate()?;

    let inputs = SeedInputs::load(seed_folder)?;
    let model = SeedModel::build(&inputs, config)?;
    let script = render_script(&model, config, &ScriptTemplate::default())?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| seed_folder.join(OUTPUT_FILE));
    write_script(&output, &script)?;

    info!(
        "Wrote {} ({} bytes) in {:.2}s",
        output.display(),
        script.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(GenerationReport {
        output,
        rows: model.row_count(),
        tasks: model.annotation_tasks.len(),
        restart: restart_value(&model, config),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::SourceRow;

    fn small_inputs() -> SeedInputs {
        let mut inputs = SeedInputs {
            datasets: vec![SourceRow::new("datasets.csv")
                .with("name", "ds")
                .with("start_date", "2020-01-01")
                .with("end_date", "2020-02-01")
                .with("files_type", ".wav")
                .with("dataset_type_name", "Coastal")
                .with("dataset_type_description", "near shore")
                .with("location_name", "Brest")
                .with("location_desc", "harbour")
                .with("location_lat", "48.39")
                .with("location_lon", "-4.49")],
            dataset_files: vec![SourceRow::new("dataset_files.csv")
                .with("filename", "a.wav")
                .with("dataset_name", "ds")],
            annotation_campaigns: vec![SourceRow::new("annotation_campaigns.csv")
                .with("name", "spring")
                .with("desc", "first pass")
                .with("instructions_url", "https://example.org")
                .with("start", "2020-03-01")
                .with("end", "2020-04-01")
                .with("annotation_set", "whale, boat")
                .with("dataset_name", "ds")],
            ..SeedInputs::default()
        };
        inputs.file_sizes.insert("a.wav".to_string(), 1024);
        inputs
    }

    #[test]
    fn test_restart_value_defaults_to_end_index() {
        let config = SeedConfig::default();
        let model = SeedModel::build(&small_inputs(), &config).unwrap();
        assert_eq!(restart_value(&model, &config), 1000);
    }

    #[test]
    fn test_restart_value_grows_past_seeded_ids() {
        let config = SeedConfig {
            end_index: 105,
            ..SeedConfig::default()
        };
        let model = SeedModel::build(&small_inputs(), &config).unwrap();
        // 7 default users x 1 file -> tasks 101..=107
        assert_eq!(model.max_id(), Some(107));
        assert_eq!(restart_value(&model, &config), 108);
    }

    #[test]
    fn test_render_script_layout() {
        let config = SeedConfig::default();
        let model = SeedModel::build(&small_inputs(), &config).unwrap();
        let script = render_script(&model, &config, &ScriptTemplate::default()).unwrap();

        assert!(script.starts_with("exports.seed = function(knex) {\n"));
        assert_eq!(script.matches(".del())").count(), 12);
        assert_eq!(script.matches("RESTART WITH 1000").count(), 12);

        let geo = script.find("knex('geo_metadata').insert(").unwrap();
        let update = script.find("UPDATE geo_metadata SET location").unwrap();
        let audio = script.find("knex('audio_metadata').del()").unwrap();
        assert!(geo < update && update < audio);

        let users = script.find("knex('users').del()").unwrap();
        let tasks = script.find("knex('annotation_tasks').del()").unwrap();
        assert!(users < tasks);
    }

    #[test]
    fn test_sequence_resets_follow_build_order() {
        let config = SeedConfig::default();
        let model = SeedModel::build(&small_inputs(), &config).unwrap();
        let script = render_script(&model, &config, &ScriptTemplate::default()).unwrap();

        let order = DependencyResolver::new().build_order().unwrap();
        let positions: Vec<_> = order
            .iter()
            .map(|table| script.find(&table.id_sequence()).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_write_script_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("init.js");
        std::fs::write(&path, "old").unwrap();
        write_script(&path, "new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_script_new_file_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("init.js");
        write_script(&path, "new").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_script_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("init.js");
        std::fs::write(&path, "old").unwrap();
        std::fs::set_permissions(&path, Permissions::from_mode(0o664)).unwrap();

        write_script(&path, "new").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o664);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }
}
