use crate::common::{Value, FIELD_SEPARATOR};
use crate::errors::{ErrorKind, RepoError, RepoResult};
use std::fmt::Display;

/// Alias the rendered query uses for the collection root.
pub const ROOT_ALIAS: &str = "root";

/// A named query parameter bound to a value.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlParameter {
    pub name: String,
    pub value: Value,
}

/// A parameterized SQL query as sent to the document store.
///
/// Values never appear in `query_text`; they are bound as `@p0`, `@p1`, ...
/// in `parameters`.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuerySpec {
    pub query_text: String,
    pub parameters: Vec<SqlParameter>,
}

impl SqlQuerySpec {
    /// Looks up the value bound to a parameter name.
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }
}

impl Display for SqlQuerySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.query_text)?;
        if !self.parameters.is_empty() {
            write!(f, " [")?;
            for (i, p) in self.parameters.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{} = {}", p.name, p.value)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

/// Accumulates parameters while a filter tree renders its predicate.
#[derive(Default)]
pub struct SqlWriter {
    parameters: Vec<SqlParameter>,
}

impl SqlWriter {
    pub fn new() -> Self {
        SqlWriter {
            parameters: Vec::new(),
        }
    }

    /// Binds `value` to the next parameter name and returns that name.
    pub fn bind(&mut self, value: Value) -> String {
        let name = format!("@p{}", self.parameters.len());
        self.parameters.push(SqlParameter {
            name: name.clone(),
            value,
        });
        name
    }

    /// Renders a field name as a property path on the root alias.
    ///
    /// `location.zip` becomes `root["location"]["zip"]`.
    pub fn field_path(&self, field_name: &str) -> RepoResult<String> {
        if field_name.is_empty() {
            log::error!("Cannot render a query for an empty field name");
            return Err(RepoError::new(
                "Field name cannot be empty",
                ErrorKind::FilterError,
            ));
        }

        let mut path = String::from(ROOT_ALIAS);
        for segment in field_name.split(FIELD_SEPARATOR) {
            if segment.is_empty() {
                log::error!("Field name {} has an empty segment", field_name);
                return Err(RepoError::new(
                    &format!("Field name {} has an empty segment", field_name),
                    ErrorKind::FilterError,
                ));
            }
            let escaped = segment.replace('\\', "\\\\").replace('"', "\\\"");
            path.push_str(&format!("[\"{}\"]", escaped));
        }
        Ok(path)
    }

    /// Wraps a rendered predicate into the final query.
    pub fn finish(self, predicate: &str) -> SqlQuerySpec {
        SqlQuerySpec {
            query_text: format!("SELECT * FROM {} WHERE {}", ROOT_ALIAS, predicate),
            parameters: self.parameters,
        }
    }
}
