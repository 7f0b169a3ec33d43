use super::tables::{get_table, SEED_TABLES};
use super::types::TableSchema;
use crate::error::{Result, SeedError};
use std::collections::{HashMap, HashSet};

/// Resolves foreign key dependencies between seeded tables
pub struct DependencyResolver {
    /// Map of table name -> tables it depends on
    deps: HashMap<&'static str, HashSet<&'static str>>,
}

impl DependencyResolver {
    pub fn new() -> Self {
        let deps = SEED_TABLES
            .iter()
            .map(|table| (table.name, table.dependencies()))
            .collect();

        Self { deps }
    }

    /// Check that every table's FK parents appear before it
    pub fn verify_order(&self, tables: &[&TableSchema]) -> Result<()> {
        let mut seen: HashSet<&str> = HashSet::new();

        for table in tables {
            let pending: Vec<_> = table
                .foreign_keys
                .iter()
                .filter(|fk| fk.references_table != table.name && !seen.contains(fk.references_table))
                .map(|fk| format!("{}.{} -> {}", table.name, fk.column, fk.references_table))
                .collect();
            if !pending.is_empty() {
                return Err(SeedError::DependencyOrder(format!(
                    "parent tables built after their children: {}",
                    pending.join(", ")
                )));
            }
            seen.insert(table.name);
        }

        Ok(())
    }

    /// Topological order of all seeded tables, ties broken by declaration order
    pub fn build_order(&self) -> Result<Vec<&'static TableSchema>> {
        let mut result = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut temp_visited: HashSet<&str> = HashSet::new();

        for table in SEED_TABLES {
            if !visited.contains(table.name) {
                self.visit(table.name, &mut visited, &mut temp_visited, &mut result)?;
            }
        }

        Ok(result)
    }

    fn visit(
        &self,
        name: &'static str,
        visited: &mut HashSet<&'static str>,
        temp_visited: &mut HashSet<&'static str>,
        result: &mut Vec<&'static TableSchema>,
    ) -> Result<()> {
        if temp_visited.contains(name) {
            return Err(SeedError::DependencyOrder(format!(
                "circular dependency detected at: {}",
                name
            )));
        }
        if visited.contains(name) {
            return Ok(());
        }

        temp_visited.insert(name);

        if let Some(deps) = self.deps.get(name) {
            let mut deps: Vec<_> = deps.iter().copied().collect();
            deps.sort_by_key(|dep| SEED_TABLES.iter().position(|t| t.name == *dep));
            for dep in deps {
                if dep != name {
                    self.visit(dep, visited, temp_visited, result)?;
                }
            }
        }

        temp_visited.remove(name);
        visited.insert(name);

        if let Some(table) = get_table(name) {
            result.push(table);
        }

        Ok(())
    }
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{ANNOTATION_TASKS, DATASETS, DATASET_FILES, USERS};

    #[test]
    fn test_seed_tables_are_in_dependency_order() {
        let resolver = DependencyResolver::new();
        resolver.verify_order(SEED_TABLES).unwrap();
    }

    #[test]
    fn test_build_order_matches_declared_order() {
        let resolver = DependencyResolver::new();
        let names: Vec<_> = resolver
            .build_order()
            .unwrap()
            .iter()
            .map(|t| t.name)
            .collect();
        let declared: Vec<_> = SEED_TABLES.iter().map(|t| t.name).collect();
        assert_eq!(names, declared);
    }

    #[test]
    fn test_child_before_parent_is_rejected() {
        let resolver = DependencyResolver::new();
        let err = resolver
            .verify_order(&[&USERS, &DATASET_FILES, &DATASETS])
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("dataset_files.dataset_id -> datasets"));
        assert!(message.contains("dataset_files.audio_metadata_id -> audio_metadata"));
    }

    #[test]
    fn test_tasks_depend_on_users_and_files() {
        let deps = ANNOTATION_TASKS.dependencies();
        assert!(deps.contains("users"));
        assert!(deps.contains("dataset_files"));
        assert!(deps.contains("annotation_campaigns"));
    }
}
