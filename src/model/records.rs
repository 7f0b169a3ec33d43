//! Row records for every seeded table.
//!
//! Field names match the target database columns; records serialize straight
//! into the insert fragments of the seed script.

use indexmap::IndexMap;
use serde::Serialize;

use super::entity_map::Entity;

/// `status` of freshly seeded datasets
pub const DATASET_STATUS_IMPORTED: i64 = 1;
/// `status` of freshly seeded annotation tasks
pub const TASK_STATUS_CREATED: i64 = 0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetType {
    pub id: i64,
    pub name: String,
    pub desc: String,
}

/// Latitude / longitude pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoMetadata {
    pub id: i64,
    pub name: String,
    pub desc: String,
    /// Geometry has no literal form in an insert row; emitted as a raw update
    #[serde(skip)]
    pub location: Option<GeoPoint>,
}

impl GeoMetadata {
    /// Raw statement setting the location column, if the row has coordinates
    pub fn location_update(&self) -> Option<String> {
        self.location.map(|point| {
            format!(
                "UPDATE geo_metadata SET location = POINT({}, {}) WHERE id = {}",
                point.lat, point.lon, self.id
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioMetadata {
    pub id: i64,
    /// `audio_*` columns, prefix removed
    #[serde(flatten)]
    pub fields: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub id: i64,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub files_type: String,
    pub status: i64,
    pub dataset_type_id: i64,
    pub geo_metadata_id: i64,
    pub audio_metadata_id: i64,
    pub owner_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetFile {
    pub id: i64,
    pub filename: String,
    pub size: u64,
    pub dataset_id: i64,
    pub audio_metadata_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationSet {
    pub id: i64,
    pub name: String,
    pub desc: String,
    pub owner_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationTag {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationSetTag {
    pub id: i64,
    pub annotation_set_id: i64,
    pub annotation_tag_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationCampaign {
    pub id: i64,
    pub name: String,
    pub desc: String,
    pub instructions_url: String,
    pub start: String,
    pub end: String,
    pub annotation_set_id: i64,
    pub owner_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationCampaignDataset {
    pub id: i64,
    pub annotation_campaign_id: i64,
    pub dataset_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationTask {
    pub id: i64,
    pub annotation_campaign_id: i64,
    pub dataset_file_id: i64,
    pub status: i64,
    pub annotator_id: i64,
}

macro_rules! impl_entity {
    ($($record:ty),* $(,)?) => {
        $(
            impl Entity for $record {
                fn id(&self) -> i64 {
                    self.id
                }
            }
        )*
    };
}

impl_entity!(
    User,
    DatasetType,
    GeoMetadata,
    AudioMetadata,
    Dataset,
    DatasetFile,
    AnnotationSet,
    AnnotationTag,
    AnnotationSetTag,
    AnnotationCampaign,
    AnnotationCampaignDataset,
    AnnotationTask,
);
