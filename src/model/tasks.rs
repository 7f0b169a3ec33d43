//! Annotation task expansion.
//!
//! Every campaign-dataset link is crossed with the files of that dataset and
//! with every seeded user. Ids are a running counter over exactly this
//! nesting: links in build order, then files in build order, then users in
//! seeding order.

use std::collections::HashMap;
use tracing::info;

use super::entity_map::{EntityMap, IdSequence};
use super::records::{AnnotationCampaignDataset, AnnotationTask, DatasetFile, User, TASK_STATUS_CREATED};

/// File ids grouped by dataset id, each list in file build order
pub fn files_by_dataset(files: &EntityMap<DatasetFile>) -> HashMap<i64, Vec<i64>> {
    let mut grouped: HashMap<i64, Vec<i64>> = HashMap::new();
    for file in files.values() {
        grouped.entry(file.dataset_id).or_default().push(file.id);
    }
    grouped
}

pub fn expand_tasks(
    links: &[AnnotationCampaignDataset],
    files: &EntityMap<DatasetFile>,
    users: &EntityMap<User>,
    base: i64,
) -> Vec<AnnotationTask> {
    let grouped = files_by_dataset(files);
    let mut ids = IdSequence::new(base);
    let mut tasks = Vec::with_capacity(expected_task_count(links, &grouped, users.len()));

    for link in links {
        let dataset_files = grouped.get(&link.dataset_id).map(Vec::as_slice).unwrap_or(&[]);
        for &file_id in dataset_files {
            for user in users.values() {
                tasks.push(AnnotationTask {
                    id: ids.next(),
                    annotation_campaign_id: link.annotation_campaign_id,
                    dataset_file_id: file_id,
                    status: TASK_STATUS_CREATED,
                    annotator_id: user.id,
                });
            }
        }
    }

    info!(
        "Expanded {} links x {} users into {} annotation tasks",
        links.len(),
        users.len(),
        tasks.len()
    );
    tasks
}

/// Sum over links of files-in-dataset x users
fn expected_task_count(
    links: &[AnnotationCampaignDataset],
    grouped: &HashMap<i64, Vec<i64>>,
    user_count: usize,
) -> usize {
    links
        .iter()
        .map(|link| grouped.get(&link.dataset_id).map_or(0, Vec::len) * user_count)
        .sum()
}
