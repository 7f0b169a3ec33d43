use std::collections::HashSet;

/// Foreign key reference
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references_table: &'static str,
}

impl ForeignKey {
    pub const fn new(column: &'static str, references_table: &'static str) -> Self {
        Self {
            column,
            references_table,
        }
    }
}

/// Seeded table definition
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    pub foreign_keys: &'static [ForeignKey],
}

impl TableSchema {
    /// Get all tables this table depends on (FK parents)
    pub fn dependencies(&self) -> HashSet<&'static str> {
        self.foreign_keys
            .iter()
            .map(|fk| fk.references_table)
            .collect()
    }

    /// Name of the postgres sequence backing the id column
    pub fn id_sequence(&self) -> String {
        format!("{}_id_seq", self.name)
    }
}
