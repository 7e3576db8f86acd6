/// The table that holds consent mappings
pub const CONSENTS_TABLE: &str = "consents";

/// Columns written by an upsert, in binding order. The first one is the conflict key.
pub const BOUND_COLUMNS: [&str; 4] = ["person_name", "display_name", "email", "updated_at"];

pub const CREATE_CONSENTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS consents (person_name text primary key, display_name text, email text, updated_at timestamptz);";

/// How values are referenced from the statement text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindStyle {
    /// psql client variables, quoted as literals: `:'person_name'`
    PsqlVariables,
    /// server side positional parameters: `$1`
    Positional,
}

impl BindStyle {
    fn placeholder(&self, index: usize, column: &str) -> String {
        match self {
            BindStyle::PsqlVariables => format!(":'{}'", column),
            BindStyle::Positional => format!("${}", index + 1),
        }
    }
}

/// Builds the insert-or-update statement for a single consent. Values never appear in the text,
/// only placeholders in the given style.
pub fn upsert_sql(style: BindStyle) -> String {
    let (conflict_key, updated_columns) = BOUND_COLUMNS.split_at(1);

    let placeholders = BOUND_COLUMNS.iter()
        .enumerate()
        .map(|(index, column)| style.placeholder(index, column))
        .collect::<Vec<_>>()
        .join(", ");

    let assignments = updated_columns.iter()
        .map(|column| format!("{} = EXCLUDED.{}", column, column))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) DO UPDATE SET {};",
        CONSENTS_TABLE,
        BOUND_COLUMNS.join(", "),
        placeholders,
        conflict_key[0],
        assignments
    )
}
