use serde::Serialize;
use tracing::debug;

use super::template::{substitute, ScriptTemplate};
use crate::error::Result;
use crate::schema::TableSchema;

/// Renders table rows and raw SQL into script fragments
pub struct SqlEmitter<'a> {
    template: &'a ScriptTemplate,
    max_insert: usize,
}

impl<'a> SqlEmitter<'a> {
    pub fn new(template: &'a ScriptTemplate, max_insert: usize) -> Self {
        Self {
            template,
            max_insert: max_insert.max(1),
        }
    }

    /// Fragment deleting every row of `table`
    pub fn deletion(&self, table: &str) -> Result<String> {
        substitute(&self.template.deletion, &[("table", table)])
    }

    /// Single insert fragment for all of `records`
    pub fn insertion<T: Serialize>(&self, table: &str, records: &[T]) -> Result<String> {
        let inserts = serde_json::to_string(records)?;
        substitute(
            &self.template.insertion,
            &[("table", table), ("inserts", inserts.as_str())],
        )
    }

    /// Deletion followed by inserts of at most `max_insert` rows each, in order
    pub fn render<T: Serialize>(&self, table: &str, records: &[T]) -> Result<String> {
        let mut out = self.deletion(table)?;

        for (batch, chunk) in records.chunks(self.max_insert).enumerate() {
            debug!("{}: batch {} with {} rows", table, batch + 1, chunk.len());
            out.push_str(&self.insertion(table, chunk)?);
        }

        Ok(out)
    }

    /// Chained raw statement
    pub fn render_raw(&self, sql: &str) -> Result<String> {
        let quoted = serde_json::to_string(sql)?;
        substitute(&self.template.raw_sql, &[("sql", quoted.as_str())])
    }

    /// One sequence restart per table, joined for the finishing block
    pub fn render_sequence_resets(&self, tables: &[&TableSchema], restart: i64) -> Result<String> {
        let statements = tables
            .iter()
            .map(|table| {
                let sql = format!(
                    "ALTER SEQUENCE {} RESTART WITH {}",
                    table.id_sequence(),
                    restart
                );
                let quoted = serde_json::to_string(&sql)?;
                substitute(&self.template.single_raw_sql, &[("sql", quoted.as_str())])
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(statements.join(self.template.finish_separator.as_str()))
    }

    /// Wrap the rendered fragments into the final script
    pub fn compose(&self, init: &str, promises: &str, finish: &str) -> Result<String> {
        substitute(
            &self.template.document,
            &[("init", init), ("promises", promises), ("finish", finish)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DATASETS, USERS};

    #[derive(Serialize)]
    struct Row {
        id: i64,
        name: &'static str,
    }

    #[test]
    fn test_render_single_batch() {
        let template = ScriptTemplate::default();
        let emitter = SqlEmitter::new(&template, 10);
        let rows = [Row { id: 101, name: "a" }, Row { id: 102, name: "b" }];

        let out = emitter.render("dataset_types", &rows).unwrap();
        assert_eq!(
            out,
            "    .then(() => knex('dataset_types').del())\n\
             \x20   .then(() => knex('dataset_types').insert([{\"id\":101,\"name\":\"a\"},{\"id\":102,\"name\":\"b\"}]))\n"
        );
    }

    #[test]
    fn test_render_splits_batches() {
        let template = ScriptTemplate::default();
        let emitter = SqlEmitter::new(&template, 10_000);
        let rows: Vec<i64> = (0..25_000).collect();

        let out = emitter.render("annotation_tasks", &rows).unwrap();
        assert_eq!(out.matches(".del()").count(), 1);
        assert_eq!(out.matches(".insert(").count(), 3);

        let sizes: Vec<usize> = out
            .lines()
            .filter(|line| line.contains(".insert("))
            .map(|line| line.matches(',').count() + 1)
            .collect();
        assert_eq!(sizes, vec![10_000, 10_000, 5_000]);
    }

    #[test]
    fn test_render_empty_table_only_deletes() {
        let template = ScriptTemplate::default();
        let emitter = SqlEmitter::new(&template, 10);
        let out = emitter.render::<Row>("annotation_tags", &[]).unwrap();
        assert_eq!(out, "    .then(() => knex('annotation_tags').del())\n");
    }

    #[test]
    fn test_render_raw_quotes_sql() {
        let template = ScriptTemplate::default();
        let emitter = SqlEmitter::new(&template, 10);
        let out = emitter
            .render_raw("UPDATE geo_metadata SET location = POINT(1, 2) WHERE id = 101")
            .unwrap();
        assert_eq!(
            out,
            "    .then(() => knex.raw(\"UPDATE geo_metadata SET location = POINT(1, 2) WHERE id = 101\"))\n"
        );
    }

    #[test]
    fn test_sequence_resets() {
        let template = ScriptTemplate::default();
        let emitter = SqlEmitter::new(&template, 10);
        let out = emitter
            .render_sequence_resets(&[&USERS, &DATASETS], 1000)
            .unwrap();
        assert_eq!(
            out,
            "knex.raw(\"ALTER SEQUENCE users_id_seq RESTART WITH 1000\"),\n            \
             knex.raw(\"ALTER SEQUENCE datasets_id_seq RESTART WITH 1000\")"
        );
    }
}
