//! Definitions of the twelve seeded tables, listed in build order

use super::types::*;

// =============================================================================
// Independent Tables (no FK dependencies)
// =============================================================================

pub static USERS: TableSchema = TableSchema {
    name: "users",
    foreign_keys: &[],
};

pub static DATASET_TYPES: TableSchema = TableSchema {
    name: "dataset_types",
    foreign_keys: &[],
};

pub static GEO_METADATA: TableSchema = TableSchema {
    name: "geo_metadata",
    foreign_keys: &[],
};

pub static AUDIO_METADATA: TableSchema = TableSchema {
    name: "audio_metadata",
    foreign_keys: &[],
};

pub static ANNOTATION_SETS: TableSchema = TableSchema {
    name: "annotation_sets",
    foreign_keys: &[],
};

pub static ANNOTATION_TAGS: TableSchema = TableSchema {
    name: "annotation_tags",
    foreign_keys: &[],
};

// =============================================================================
// Dependent Tables
// =============================================================================

pub static DATASETS: TableSchema = TableSchema {
    name: "datasets",
    foreign_keys: &[
        ForeignKey::new("dataset_type_id", "dataset_types"),
        ForeignKey::new("geo_metadata_id", "geo_metadata"),
        ForeignKey::new("audio_metadata_id", "audio_metadata"),
        ForeignKey::new("owner_id", "users"),
    ],
};

pub static DATASET_FILES: TableSchema = TableSchema {
    name: "dataset_files",
    foreign_keys: &[
        ForeignKey::new("dataset_id", "datasets"),
        ForeignKey::new("audio_metadata_id", "audio_metadata"),
    ],
};

pub static ANNOTATION_SET_TAGS: TableSchema = TableSchema {
    name: "annotation_set_tags",
    foreign_keys: &[
        ForeignKey::new("annotation_set_id", "annotation_sets"),
        ForeignKey::new("annotation_tag_id", "annotation_tags"),
    ],
};

pub static ANNOTATION_CAMPAIGNS: TableSchema = TableSchema {
    name: "annotation_campaigns",
    foreign_keys: &[
        ForeignKey::new("annotation_set_id", "annotation_sets"),
        ForeignKey::new("owner_id", "users"),
    ],
};

pub static ANNOTATION_CAMPAIGN_DATASETS: TableSchema = TableSchema {
    name: "annotation_campaign_datasets",
    foreign_keys: &[
        ForeignKey::new("annotation_campaign_id", "annotation_campaigns"),
        ForeignKey::new("dataset_id", "datasets"),
    ],
};

pub static ANNOTATION_TASKS: TableSchema = TableSchema {
    name: "annotation_tasks",
    foreign_keys: &[
        ForeignKey::new("annotation_campaign_id", "annotation_campaigns"),
        ForeignKey::new("dataset_file_id", "dataset_files"),
        ForeignKey::new("annotator_id", "users"),
    ],
};

/// All seeded tables in build order (parents before children)
pub static SEED_TABLES: &[&TableSchema] = &[
    &USERS,
    &DATASET_TYPES,
    &GEO_METADATA,
    &AUDIO_METADATA,
    &DATASETS,
    &DATASET_FILES,
    &ANNOTATION_SETS,
    &ANNOTATION_TAGS,
    &ANNOTATION_SET_TAGS,
    &ANNOTATION_CAMPAIGNS,
    &ANNOTATION_CAMPAIGN_DATASETS,
    &ANNOTATION_TASKS,
];

/// Look up a table by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    SEED_TABLES.iter().find(|t| t.name == name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twelve_tables_in_build_order() {
        let names: Vec<_> = SEED_TABLES.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "users",
                "dataset_types",
                "geo_metadata",
                "audio_metadata",
                "datasets",
                "dataset_files",
                "annotation_sets",
                "annotation_tags",
                "annotation_set_tags",
                "annotation_campaigns",
                "annotation_campaign_datasets",
                "annotation_tasks",
            ]
        );
    }

    #[test]
    fn test_foreign_keys_reference_known_tables() {
        for table in SEED_TABLES {
            for fk in table.foreign_keys {
                assert!(
                    get_table(fk.references_table).is_some(),
                    "{}.{} references unknown table {}",
                    table.name,
                    fk.column,
                    fk.references_table
                );
            }
        }
    }
}
