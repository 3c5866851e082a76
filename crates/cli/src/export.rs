//! Result writers for `profmatch run`.
//!
//! Pure functions over resolved records: each returns the rendered text and
//! leaves file handling to the caller.

use profmatch_resolve::config::{SqlColumn, SqlColumnKind, SqlOutputConfig, SQL_BASE_COLUMNS};
use profmatch_resolve::ResolvedRecord;

/// Columns appended after the passthrough source columns in CSV output.
pub const CSV_RESULT_COLUMNS: [&str; 6] = [
    "cleaned_first_name",
    "cleaned_last_name",
    "full_name",
    "department_canonical",
    "best_match",
    "match_score",
];

/// Header row of a CSV document, trimmed the same way the loader trims it.
pub fn csv_headers(csv_data: &str) -> Result<Vec<String>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());
    let headers = reader.headers().map_err(|e| e.to_string())?;
    Ok(headers.iter().map(|h| h.trim().to_string()).collect())
}

/// Render records as CSV: every source column in `source_headers` order,
/// then [`CSV_RESULT_COLUMNS`]. A source column whose name collides with a
/// result column is written once, with the result value.
pub fn write_csv(source_headers: &[String], records: &[ResolvedRecord]) -> Result<String, String> {
    let passthrough: Vec<&String> = source_headers
        .iter()
        .filter(|h| !CSV_RESULT_COLUMNS.contains(&h.as_str()))
        .collect();

    let mut wtr = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<&str> = passthrough.iter().map(|h| h.as_str()).collect();
    header.extend(CSV_RESULT_COLUMNS);
    wtr.write_record(&header).map_err(|e| e.to_string())?;

    for record in records {
        let mut row: Vec<String> = passthrough
            .iter()
            .map(|h| record.raw_fields.get(*h).cloned().unwrap_or_default())
            .collect();
        row.push(record.cleaned_first_name.clone());
        row.push(record.cleaned_last_name.clone());
        row.push(record.full_name.clone());
        row.push(record.department_canonical.clone().unwrap_or_default());
        row.push(record.best.matched.clone());
        row.push(record.best.score.to_string());
        wtr.write_record(&row).map_err(|e| e.to_string())?;
    }

    let bytes = wtr.into_inner().map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// SQL dump
// ---------------------------------------------------------------------------

/// Render a self-contained SQL dump: drop, create, then multi-row inserts of
/// `batch_size` rows each.
///
/// `full_name` is the canonical name. `best_match` holds the reference
/// spelling of the matched instructor (the join key against the course
/// catalog) and is `NULL` when nothing matched. `department` prefers the
/// canonical department.
pub fn write_sql(config: &SqlOutputConfig, records: &[ResolvedRecord]) -> String {
    let table = &config.table;
    let mut columns: Vec<&str> = SQL_BASE_COLUMNS.to_vec();
    columns.extend(config.columns.iter().map(|c| c.name.as_str()));
    let column_list = columns.join(", ");

    let mut out = String::new();
    out.push_str("-- Resolved instructor identities\n");
    out.push_str(&format!("-- {} records\n\n", records.len()));
    out.push_str(&format!("DROP TABLE IF EXISTS {table};\n\n"));
    out.push_str(&create_table(table, &config.columns));
    out.push('\n');

    let batch_size = config.batch_size.max(1);
    for batch in records.chunks(batch_size) {
        out.push_str(&format!("\nINSERT INTO {table} ({column_list}) VALUES\n"));
        let rows: Vec<String> = batch
            .iter()
            .map(|record| format!("    ({})", row_values(record, &config.columns).join(", ")))
            .collect();
        out.push_str(&rows.join(",\n"));
        out.push_str(";\n");
    }

    out.push_str("\n-- End of SQL dump\n");
    out
}

fn create_table(table: &str, extra: &[SqlColumn]) -> String {
    let mut defs = vec![
        "    id VARCHAR(255) PRIMARY KEY".to_string(),
        "    first_name VARCHAR(100)".to_string(),
        "    last_name VARCHAR(100)".to_string(),
        "    full_name VARCHAR(200)".to_string(),
        "    department VARCHAR(100)".to_string(),
        "    best_match VARCHAR(200)".to_string(),
        "    match_score INT".to_string(),
    ];
    for column in extra {
        let ty = match column.kind {
            SqlColumnKind::Text => "VARCHAR(255)",
            SqlColumnKind::Int => "INT",
            SqlColumnKind::Float => "FLOAT",
        };
        defs.push(format!("    {} {ty}", column.name));
    }
    format!("CREATE TABLE {table} (\n{}\n);\n", defs.join(",\n"))
}

fn row_values(record: &ResolvedRecord, extra: &[SqlColumn]) -> Vec<String> {
    let department = record
        .department_canonical
        .as_deref()
        .or(record.department.as_deref())
        .unwrap_or("");

    let mut values = vec![
        sql_text(&record.record_id),
        sql_text(&record.cleaned_first_name),
        sql_text(&record.cleaned_last_name),
        sql_text(&record.full_name),
        sql_text(department),
        sql_text(&record.best.matched),
        record.best.score.to_string(),
    ];
    for column in extra {
        let raw = record.raw_fields.get(&column.source).map(String::as_str).unwrap_or("");
        values.push(sql_value(raw, column.kind));
    }
    values
}

/// Quoted SQL string literal, or `NULL` for blank input.
pub fn sql_text(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return "NULL".into();
    }
    format!("'{}'", value.replace('\'', "''"))
}

/// Typed SQL literal. Numbers that fail to parse become `NULL`; a float
/// that is integral and fits in an `i64` is accepted for an int column
/// (`"12.0"` → `12`).
pub fn sql_value(value: &str, kind: SqlColumnKind) -> String {
    let value = value.trim();
    match kind {
        SqlColumnKind::Text => sql_text(value),
        SqlColumnKind::Int => match value.parse::<i64>() {
            Ok(n) => n.to_string(),
            Err(_) => match value.parse::<f64>() {
                Ok(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                    format!("{}", f as i64)
                }
                _ => "NULL".into(),
            },
        },
        SqlColumnKind::Float => match value.parse::<f64>() {
            Ok(f) if f.is_finite() => value.to_string(),
            _ => "NULL".into(),
        },
    }
}
