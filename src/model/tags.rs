//! Tag vocabulary.
//!
//! Tags are not declared anywhere: they are the comma-separated tokens of the
//! annotation set keys. Sets and tags are therefore correlated through this
//! derivation, which lives here and nowhere else.

use super::entity_map::{EntityMap, IdSequence};
use super::records::{AnnotationSet, AnnotationSetTag, AnnotationTag};
use crate::error::Result;

/// Tokens of a raw tag list, stripped, empty tokens dropped
pub fn split_tags(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|tag| !tag.is_empty())
}

/// Distinct tags across all annotation sets, in first-seen order
pub fn derive_tag_vocabulary(
    sets: &EntityMap<AnnotationSet>,
    base: i64,
) -> EntityMap<AnnotationTag> {
    let mut tags = EntityMap::new("annotation_tags", base);
    for tag in sets.keys().flat_map(split_tags) {
        tags.entry_or_insert(tag, |id| AnnotationTag {
            id,
            name: tag.to_string(),
        });
    }
    tags
}

/// One join row per tag occurrence per set: sets in build order, tags left to
/// right within each set's list
pub fn build_annotation_set_tags(
    sets: &EntityMap<AnnotationSet>,
    tags: &EntityMap<AnnotationTag>,
    base: i64,
) -> Result<Vec<AnnotationSetTag>> {
    let mut ids = IdSequence::new(base);
    let mut rows = Vec::new();

    for (key, set) in sets.iter() {
        for tag in split_tags(key) {
            rows.push(AnnotationSetTag {
                id: ids.next(),
                annotation_set_id: set.id,
                annotation_tag_id: tags.id_of(tag)?,
            });
        }
    }

    Ok(rows)
}
