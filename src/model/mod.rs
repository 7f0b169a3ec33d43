pub mod builder;
pub mod entity_map;
pub mod records;
pub mod tags;
pub mod tasks;

pub use builder::*;
pub use entity_map::*;
pub use records::*;
pub use tags::*;
pub use tasks::*;

use tracing::info;

use crate::config::SeedConfig;
use crate::error::Result;
use crate::loader::SeedInputs;
use crate::schema::{DependencyResolver, SEED_TABLES};

/// Every seeded table, built once and read-only afterwards
#[derive(Debug, Clone)]
pub struct SeedModel {
    pub users: EntityMap<User>,
    pub dataset_types: EntityMap<DatasetType>,
    pub geo_metadata: EntityMap<GeoMetadata>,
    pub audio_metadata: EntityMap<AudioMetadata>,
    pub datasets: EntityMap<Dataset>,
    pub dataset_files: EntityMap<DatasetFile>,
    pub annotation_sets: EntityMap<AnnotationSet>,
    pub annotation_tags: EntityMap<AnnotationTag>,
    pub annotation_set_tags: Vec<AnnotationSetTag>,
    pub annotation_campaigns: EntityMap<AnnotationCampaign>,
    pub annotation_campaign_datasets: Vec<AnnotationCampaignDataset>,
    pub annotation_tasks: Vec<AnnotationTask>,
}

impl SeedModel {
    /// Build all tables in dependency order
    pub fn build(inputs: &SeedInputs, config: &SeedConfig) -> Result<Self> {
        config.validate()?;
        DependencyResolver::new().verify_order(SEED_TABLES)?;

        let base = config.start_index;

        let users = build_users(inputs.users.as_deref(), config)?;
        let dataset_types = build_dataset_types(&inputs.datasets, base)?;
        let geo_metadata = build_geo_metadata(&inputs.datasets, base)?;
        let audio_metadata = build_audio_metadata(&inputs.datasets, &inputs.dataset_files, base)?;
        let datasets = build_datasets(
            &inputs.datasets,
            &DatasetParents {
                dataset_types: &dataset_types,
                geo_metadata: &geo_metadata,
                audio_metadata: &audio_metadata,
                users: &users,
            },
            base,
        )?;
        let dataset_files = build_dataset_files(
            &inputs.dataset_files,
            &inputs.file_sizes,
            &datasets,
            &audio_metadata,
            base,
        )?;
        let annotation_sets = build_annotation_sets(&inputs.annotation_campaigns, &users, base)?;
        let annotation_tags = derive_tag_vocabulary(&annotation_sets, base);
        let annotation_set_tags =
            build_annotation_set_tags(&annotation_sets, &annotation_tags, base)?;
        let annotation_campaigns = build_annotation_campaigns(
            &inputs.annotation_campaigns,
            &annotation_sets,
            &users,
            base,
        )?;
        let annotation_campaign_datasets = build_campaign_datasets(
            &inputs.annotation_campaigns,
            &annotation_campaigns,
            &datasets,
            base,
        )?;
        let annotation_tasks =
            expand_tasks(&annotation_campaign_datasets, &dataset_files, &users, base);

        let model = Self {
            users,
            dataset_types,
            geo_metadata,
            audio_metadata,
            datasets,
            dataset_files,
            annotation_sets,
            annotation_tags,
            annotation_set_tags,
            annotation_campaigns,
            annotation_campaign_datasets,
            annotation_tasks,
        };
        info!("Built {} rows across {} tables", model.row_count(), SEED_TABLES.len());
        Ok(model)
    }

    /// Total number of seeded rows
    pub fn row_count(&self) -> usize {
        self.users.len()
            + self.dataset_types.len()
            + self.geo_metadata.len()
            + self.audio_metadata.len()
            + self.datasets.len()
            + self.dataset_files.len()
            + self.annotation_sets.len()
            + self.annotation_tags.len()
            + self.annotation_set_tags.len()
            + self.annotation_campaigns.len()
            + self.annotation_campaign_datasets.len()
            + self.annotation_tasks.len()
    }

    /// Highest id assigned in any table, `None` when nothing was seeded
    pub fn max_id(&self) -> Option<i64> {
        [
            self.users.max_id(),
            self.dataset_types.max_id(),
            self.geo_metadata.max_id(),
            self.audio_metadata.max_id(),
            self.datasets.max_id(),
            self.dataset_files.max_id(),
            self.annotation_sets.max_id(),
            self.annotation_tags.max_id(),
            self.annotation_set_tags.iter().map(Entity::id).max(),
            self.annotation_campaigns.max_id(),
            self.annotation_campaign_datasets.iter().map(Entity::id).max(),
            self.annotation_tasks.iter().map(Entity::id).max(),
        ]
        .into_iter()
        .flatten()
        .max()
    }

    /// Raw location updates, one per geo row with coordinates
    pub fn location_updates(&self) -> Vec<String> {
        self.geo_metadata
            .values()
            .filter_map(GeoMetadata::location_update)
            .collect()
    }
}
