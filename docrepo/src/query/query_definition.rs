use crate::errors::RepoResult;
use crate::filter::{Filter, SqlQuerySpec, SqlWriter};
use std::fmt::Display;

/// A filter together with its rendered store query.
///
/// Rendering happens once, when the definition is created, so a filter that
/// cannot be expressed fails before any store call is made.
#[derive(Clone)]
pub struct QueryDefinition {
    filter: Filter,
    sql: SqlQuerySpec,
}

impl QueryDefinition {
    pub fn new(filter: Filter) -> RepoResult<Self> {
        let mut writer = SqlWriter::new();
        let predicate = filter.write_sql(&mut writer)?;
        let sql = writer.finish(&predicate);
        Ok(QueryDefinition { filter, sql })
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn sql(&self) -> &SqlQuerySpec {
        &self.sql
    }

    pub fn query_text(&self) -> &str {
        &self.sql.query_text
    }
}

impl Display for QueryDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sql)
    }
}
