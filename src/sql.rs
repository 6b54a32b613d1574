//! SQL text for the fragment-based operations.
//!
//! Fragments are inserted verbatim. Nothing here quotes, escapes or validates
//! what the caller passes in.

/// `CREATE TABLE IF NOT EXISTS {table}({definition});`
pub fn create_table_sql(table: &str, definition: &str) -> String {
    format!("CREATE TABLE IF NOT EXISTS {}({});", table, definition)
}

/// `INSERT INTO {table} ({columns}) VALUES ({values});`
pub fn insert_sql(table: &str, columns: &str, values: &str) -> String {
    format!("INSERT INTO {} ({}) VALUES ({});", table, columns, values)
}

/// `UPDATE {table} SET {set} WHERE {condition};`
pub fn update_sql(table: &str, set: &str, condition: &str) -> String {
    format!("UPDATE {} SET {} WHERE {};", table, set, condition)
}

/// `DELETE FROM {table} WHERE {condition};`
pub fn delete_sql(table: &str, condition: &str) -> String {
    format!("DELETE FROM {} WHERE {};", table, condition)
}

/// `SELECT {columns} FROM {table} WHERE {condition};`, dropping the WHERE
/// clause when `condition` is empty.
pub fn select_sql(table: &str, columns: &str, condition: &str) -> String {
    let mut sql = format!("SELECT {} FROM {}", columns, table);
    if !condition.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(condition);
    }
    sql.push(';');
    sql
}

/// `SELECT * FROM {table};`
pub fn select_all_sql(table: &str) -> String {
    format!("SELECT * FROM {};", table)
}

/// Wrap an identifier in double quotes, doubling any embedded quote.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
