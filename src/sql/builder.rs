//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for the riddles table.

use super::PgBindValue;

pub const TABLE: &str = "riddles";
pub const KEY_COLUMN: &str = "id";

/// Columns returned on public read paths.
const PUBLIC_COLUMNS: &[&str] = &["id", "riddle", "solution", "synonyms"];

/// Columns written on create, in bind order.
pub const INSERT_COLUMNS: &[&str] = &["riddle", "solution", "synonyms", "username", "user_email"];

/// Quote identifier for PostgreSQL (safe: only from constants).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn select_column_list() -> String {
    PUBLIC_COLUMNS
        .iter()
        .map(|c| quoted(c))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf::default()
    }

    fn push_param(&mut self, v: PgBindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// SELECT every published row, ordered by id.
pub fn select_published() -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = TRUE ORDER BY {}",
        select_column_list(),
        quoted(TABLE),
        quoted("published"),
        quoted(KEY_COLUMN)
    );
    q
}

/// SELECT one published row chosen uniformly at random.
pub fn select_random_published() -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = TRUE ORDER BY RANDOM() LIMIT 1",
        select_column_list(),
        quoted(TABLE),
        quoted("published")
    );
    q
}

/// SELECT by primary key, published or not.
pub fn select_by_id(id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id.into());
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        select_column_list(),
        quoted(TABLE),
        quoted(KEY_COLUMN),
        n
    );
    q
}

/// INSERT one row; values bound in `INSERT_COLUMNS` order. Returns the assigned id.
pub fn insert(values: [PgBindValue; 5]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let placeholders: Vec<String> = values
        .into_iter()
        .map(|v| format!("${}", q.push_param(v)))
        .collect();
    let cols: Vec<String> = INSERT_COLUMNS.iter().map(|c| quoted(c)).collect();
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(TABLE),
        cols.join(", "),
        placeholders.join(", "),
        quoted(KEY_COLUMN)
    );
    q
}

/// DELETE by id.
pub fn delete(id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id.into());
    q.sql = format!("DELETE FROM {} WHERE {} = ${}", quoted(TABLE), quoted(KEY_COLUMN), n);
    q
}

/// Accumulates `column = value` pairs for an UPDATE keyed by id.
/// SET clauses render in the order columns were added.
#[derive(Debug, Default)]
pub struct UpdateBuilder {
    sets: Vec<(&'static str, PgBindValue)>,
}

impl UpdateBuilder {
    pub fn new() -> Self {
        UpdateBuilder::default()
    }

    pub fn set(&mut self, column: &'static str, value: impl Into<PgBindValue>) -> &mut Self {
        self.sets.push((column, value.into()));
        self
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sets.iter().map(|(c, _)| *c)
    }

    /// Renders `UPDATE ... SET ... WHERE id = $n`. None when nothing was set.
    pub fn build(self, id: i32) -> Option<QueryBuf> {
        if self.sets.is_empty() {
            return None;
        }
        let mut q = QueryBuf::new();
        let mut set_parts = Vec::with_capacity(self.sets.len());
        for (column, value) in self.sets {
            let n = q.push_param(value);
            set_parts.push(format!("{} = ${}", quoted(column), n));
        }
        let id_param = q.push_param(id.into());
        q.sql = format!(
            "UPDATE {} SET {} WHERE {} = ${}",
            quoted(TABLE),
            set_parts.join(", "),
            quoted(KEY_COLUMN),
            id_param
        );
        Some(q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_binds_each_value_positionally() {
        let mut b = UpdateBuilder::new();
        b.set("riddle", "What runs but never walks?".to_string())
            .set("synonyms", None::<String>);
        let q = b.build(7).expect("non-empty update");
        assert_eq!(
            q.sql,
            r#"UPDATE "riddles" SET "riddle" = $1, "synonyms" = $2 WHERE "id" = $3"#
        );
        assert_eq!(
            q.params,
            vec![
                PgBindValue::Text("What runs but never walks?".into()),
                PgBindValue::Null,
                PgBindValue::Int(7),
            ]
        );
    }

    #[test]
    fn update_never_interpolates_values() {
        let mut b = UpdateBuilder::new();
        b.set("solution", "x'; DROP TABLE riddles; --".to_string());
        let q = b.build(1).expect("non-empty update");
        assert!(!q.sql.contains("DROP"));
    }

    #[test]
    fn empty_update_renders_nothing() {
        assert!(UpdateBuilder::new().build(1).is_none());
    }

    #[test]
    fn read_paths_filter_on_published() {
        assert!(select_published().sql.contains(r#"WHERE "published" = TRUE"#));
        let random = select_random_published();
        assert!(random.sql.contains(r#"WHERE "published" = TRUE"#));
        assert!(random.sql.ends_with("ORDER BY RANDOM() LIMIT 1"));
        assert!(random.params.is_empty());
    }

    #[test]
    fn insert_returns_assigned_id() {
        let q = insert([
            PgBindValue::Text("r".into()),
            PgBindValue::Text("s".into()),
            PgBindValue::Null,
            PgBindValue::Null,
            PgBindValue::Null,
        ]);
        assert_eq!(
            q.sql,
            r#"INSERT INTO "riddles" ("riddle", "solution", "synonyms", "username", "user_email") VALUES ($1, $2, $3, $4, $5) RETURNING "id""#
        );
        assert_eq!(q.params.len(), 5);
    }

    #[test]
    fn delete_and_select_bind_the_id() {
        assert_eq!(delete(3).params, vec![PgBindValue::Int(3)]);
        let q = select_by_id(3);
        assert!(q.sql.ends_with(r#"WHERE "id" = $1"#));
        assert_eq!(q.params, vec![PgBindValue::Int(3)]);
    }
}
