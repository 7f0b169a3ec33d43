//! Entity builders, one per seeded table.
//!
//! Each builder receives the ancestor maps it resolves foreign keys against;
//! callers must have built those first (see `SeedModel::build`).

use indexmap::IndexMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::entity_map::{Entity, EntityMap, IdSequence};
use super::records::*;
use crate::config::SeedConfig;
use crate::credentials::{DEFAULT_PASSWORD_HASH, DEFAULT_USERS};
use crate::error::{Result, SeedError};
use crate::loader::SourceRow;

/// Seeded users: users.csv when present, else the default accounts
pub fn build_users(rows: Option<&[SourceRow]>, config: &SeedConfig) -> Result<EntityMap<User>> {
    let mut users = EntityMap::new("users", config.start_index);

    match rows {
        Some(rows) => {
            for row in rows {
                let email = row.field("user")?;
                if users.contains_key(email) {
                    warn!("Duplicate user {:?} in users.csv, later row wins", email);
                }
                let password = config.hasher.hash(email, row.field("password")?)?;
                users.upsert(email, |id| User {
                    id,
                    email: email.to_string(),
                    password,
                });
            }
        }
        None => {
            info!("No users.csv, seeding {} default users", DEFAULT_USERS.len());
            for email in DEFAULT_USERS {
                users.upsert(*email, |id| User {
                    id,
                    email: email.to_string(),
                    password: DEFAULT_PASSWORD_HASH.to_string(),
                });
            }
        }
    }

    Ok(users)
}

/// Owner of seeded datasets, sets and campaigns: the first seeded user
pub fn owner_id(users: &EntityMap<User>) -> Result<i64> {
    users
        .values()
        .next()
        .map(Entity::id)
        .ok_or_else(|| SeedError::unresolved("users", "<first seeded user>"))
}

pub fn build_dataset_types(datasets: &[SourceRow], base: i64) -> Result<EntityMap<DatasetType>> {
    let mut types = EntityMap::new("dataset_types", base);
    for row in datasets {
        let name = row.field("dataset_type_name")?;
        let desc = row.field("dataset_type_description")?;
        types.upsert(name, |id| DatasetType {
            id,
            name: name.to_string(),
            desc: desc.to_string(),
        });
    }
    Ok(types)
}

pub fn build_geo_metadata(datasets: &[SourceRow], base: i64) -> Result<EntityMap<GeoMetadata>> {
    let mut geo = EntityMap::new("geo_metadata", base);
    for row in datasets {
        let name = row.field("location_name")?;
        let desc = row.field("location_desc")?;
        let location = parse_point(row)?;
        if location.is_none() {
            warn!("Location {:?} has no coordinates", name);
        }
        geo.upsert(name, |id| GeoMetadata {
            id,
            name: name.to_string(),
            desc: desc.to_string(),
            location,
        });
    }
    Ok(geo)
}

/// Both coordinates empty means no location; a single one is malformed
fn parse_point(row: &SourceRow) -> Result<Option<GeoPoint>> {
    let lat = row.field("location_lat")?.trim();
    let lon = row.field("location_lon")?.trim();

    match (lat.is_empty(), lon.is_empty()) {
        (true, true) => Ok(None),
        (false, false) => Ok(Some(GeoPoint {
            lat: parse_coordinate(row, "location_lat", lat)?,
            lon: parse_coordinate(row, "location_lon", lon)?,
        })),
        _ => Err(SeedError::MalformedValue {
            file: row.file.clone(),
            field: "location_lat, location_lon".to_string(),
            value: format!("{}, {}", lat, lon),
            reason: "latitude and longitude must both be set or both be empty".to_string(),
        }),
    }
}

fn parse_coordinate(row: &SourceRow, field: &str, value: &str) -> Result<f64> {
    let malformed = |reason: String| SeedError::MalformedValue {
        file: row.file.clone(),
        field: field.to_string(),
        value: value.to_string(),
        reason,
    };
    let parsed: f64 = value.parse().map_err(|e| malformed(format!("{}", e)))?;
    if !parsed.is_finite() {
        return Err(malformed("coordinate must be finite".to_string()));
    }
    Ok(parsed)
}

/// Dataset-level entries first (keyed by dataset name), then file-level
/// entries (keyed by filename). On a key collision the later entry's fields
/// overwrite the earlier ones.
pub fn build_audio_metadata(
    datasets: &[SourceRow],
    dataset_files: &[SourceRow],
    base: i64,
) -> Result<EntityMap<AudioMetadata>> {
    let mut audio = EntityMap::new("audio_metadata", base);

    let sources = datasets
        .iter()
        .map(|row| (row, "name"))
        .chain(dataset_files.iter().map(|row| (row, "filename")));

    for (row, key_column) in sources {
        let key = row.field(key_column)?;
        let record = audio.entry_or_insert(key, |id| AudioMetadata {
            id,
            fields: IndexMap::new(),
        });
        record.fields.extend(row.audio_fields());
    }

    Ok(audio)
}

pub struct DatasetParents<'a> {
    pub dataset_types: &'a EntityMap<DatasetType>,
    pub geo_metadata: &'a EntityMap<GeoMetadata>,
    pub audio_metadata: &'a EntityMap<AudioMetadata>,
    pub users: &'a EntityMap<User>,
}

pub fn build_datasets(
    rows: &[SourceRow],
    parents: &DatasetParents<'_>,
    base: i64,
) -> Result<EntityMap<Dataset>> {
    let owner_id = owner_id(parents.users)?;
    let mut datasets = EntityMap::new("datasets", base);

    for row in rows {
        let name = row.field("name")?;
        let record = Dataset {
            id: 0,
            name: name.to_string(),
            start_date: row.field("start_date")?.to_string(),
            end_date: row.field("end_date")?.to_string(),
            files_type: row.field("files_type")?.to_string(),
            status: DATASET_STATUS_IMPORTED,
            dataset_type_id: parents
                .dataset_types
                .id_of(row.field("dataset_type_name")?)?,
            geo_metadata_id: parents.geo_metadata.id_of(row.field("location_name")?)?,
            audio_metadata_id: parents.audio_metadata.id_of(name)?,
            owner_id,
        };
        datasets.upsert(name, |id| Dataset { id, ..record });
    }

    Ok(datasets)
}

pub fn build_dataset_files(
    rows: &[SourceRow],
    file_sizes: &IndexMap<String, u64>,
    datasets: &EntityMap<Dataset>,
    audio_metadata: &EntityMap<AudioMetadata>,
    base: i64,
) -> Result<EntityMap<DatasetFile>> {
    let mut files = EntityMap::new("dataset_files", base);

    for row in rows {
        let filename = row.field("filename")?;
        let size = *file_sizes
            .get(filename)
            .ok_or_else(|| SeedError::MissingInput {
                path: PathBuf::from(filename),
            })?;
        let record = DatasetFile {
            id: 0,
            filename: filename.to_string(),
            size,
            dataset_id: datasets.id_of(row.field("dataset_name")?)?,
            audio_metadata_id: audio_metadata.id_of(filename)?,
        };
        files.upsert(filename, |id| DatasetFile { id, ..record });
    }

    Ok(files)
}

/// Annotation set key of a campaign row: the tag list with outer whitespace
/// trimmed and everything inside kept verbatim
pub fn annotation_set_key(row: &SourceRow) -> Result<&str> {
    Ok(row.field("annotation_set")?.trim())
}

/// One set per distinct tag list. Campaigns sharing a tag list share the set;
/// the last of them names it.
pub fn build_annotation_sets(
    campaigns: &[SourceRow],
    users: &EntityMap<User>,
    base: i64,
) -> Result<EntityMap<AnnotationSet>> {
    let owner_id = owner_id(users)?;
    let mut sets = EntityMap::new("annotation_sets", base);

    for row in campaigns {
        let key = annotation_set_key(row)?;
        let campaign = row.field("name")?;
        sets.upsert(key, |id| AnnotationSet {
            id,
            name: campaign.to_string(),
            desc: format!("Annotation set made for {}", campaign),
            owner_id,
        });
    }

    Ok(sets)
}

pub fn build_annotation_campaigns(
    rows: &[SourceRow],
    annotation_sets: &EntityMap<AnnotationSet>,
    users: &EntityMap<User>,
    base: i64,
) -> Result<EntityMap<AnnotationCampaign>> {
    let owner_id = owner_id(users)?;
    let mut campaigns = EntityMap::new("annotation_campaigns", base);

    for row in rows {
        let name = row.field("name")?;
        let record = AnnotationCampaign {
            id: 0,
            name: name.to_string(),
            desc: row.field("desc")?.to_string(),
            instructions_url: row.field("instructions_url")?.to_string(),
            start: row.field("start")?.to_string(),
            end: row.field("end")?.to_string(),
            annotation_set_id: annotation_sets.id_of(annotation_set_key(row)?)?,
            owner_id,
        };
        campaigns.upsert(name, |id| AnnotationCampaign { id, ..record });
    }

    Ok(campaigns)
}

/// One link per campaign CSV line, duplicates included
pub fn build_campaign_datasets(
    rows: &[SourceRow],
    campaigns: &EntityMap<AnnotationCampaign>,
    datasets: &EntityMap<Dataset>,
    base: i64,
) -> Result<Vec<AnnotationCampaignDataset>> {
    let mut ids = IdSequence::new(base);
    let mut links = Vec::with_capacity(rows.len());

    for row in rows {
        let annotation_campaign_id = campaigns.id_of(row.field("name")?)?;
        let dataset_id = datasets.id_of(row.field("dataset_name")?)?;
        links.push(AnnotationCampaignDataset {
            id: ids.next(),
            annotation_campaign_id,
            dataset_id,
        });
    }

    debug!("{} campaign-dataset links", links.len());
    Ok(links)
}
