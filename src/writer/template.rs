//! Text templates for the generated seed script.
//!
//! Placeholders use the `${name}` form. Substitution is a single pass, so
//! substituted values are never scanned for placeholders themselves.

use crate::error::{Result, SeedError};

/// Delete every row of `${table}`
pub const DELETION: &str = "    .then(() => knex('${table}').del())\n";
/// Insert the JSON array `${inserts}` into `${table}`
pub const INSERTION: &str = "    .then(() => knex('${table}').insert(${inserts}))\n";
/// Chained raw statement, `${sql}` is a quoted string literal
pub const RAW_SQL: &str = "    .then(() => knex.raw(${sql}))\n";
/// Raw statement as a bare promise, used inside `Promise.all`
pub const SINGLE_RAW_SQL: &str = "knex.raw(${sql})";
/// Whole script: `${init}` preamble, `${promises}` chain, `${finish}` list
pub const DOCUMENT: &str = "exports.seed = function(knex) {
  return Promise.resolve()
${init}${promises}    .then(() => Promise.all([
            ${finish}
    ]));
};
";

/// Separator between finishing statements
pub const FINISH_SEPARATOR: &str = ",\n            ";

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptTemplate {
    pub deletion: String,
    pub insertion: String,
    pub raw_sql: String,
    pub single_raw_sql: String,
    pub document: String,
    pub finish_separator: String,
}

impl Default for ScriptTemplate {
    fn default() -> Self {
        Self {
            deletion: DELETION.to_string(),
            insertion: INSERTION.to_string(),
            raw_sql: RAW_SQL.to_string(),
            single_raw_sql: SINGLE_RAW_SQL.to_string(),
            document: DOCUMENT.to_string(),
            finish_separator: FINISH_SEPARATOR.to_string(),
        }
    }
}

/// Replace every `${name}` in `template` with its value from `values`
pub fn substitute(template: &str, values: &[(&str, &str)]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or_else(|| {
            SeedError::InvalidConfig(format!("unterminated placeholder in template: {:?}", rest))
        })?;
        let name = &after[..end];
        let value = values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| SeedError::InvalidConfig(format!("unknown template placeholder: {}", name)))?;
        out.push_str(value);
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute() {
        let out = substitute(DELETION, &[("table", "users")]).unwrap();
        assert_eq!(out, "    .then(() => knex('users').del())\n");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let out = substitute("a ${x} b", &[("x", "${x}")]).unwrap();
        assert_eq!(out, "a ${x} b");
    }

    #[test]
    fn test_unknown_placeholder() {
        assert!(substitute("${nope}", &[("table", "users")]).is_err());
    }

    #[test]
    fn test_unterminated_placeholder() {
        assert!(substitute("knex('${table')", &[("table", "users")]).is_err());
    }
}
