//! Structured CRUD descriptions rendered to parameterized statements.
//!
//! Identifiers are quoted and every value becomes a bound placeholder, so
//! nothing the caller passes as data is spliced into SQL text.

use serde::{Deserialize, Serialize};

use crate::sql::quote_ident;
use crate::value::{Params, SqlQuery, Value};

/// Query operators for building conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryOperator {
    Equal(Value),
    NotEqual(Value),
    GreaterThan(Value),
    GreaterThanOrEqual(Value),
    LessThan(Value),
    LessThanOrEqual(Value),
    Like(String),
    In(Vec<Value>),
}

/// Conditions joined with `AND`, rendered in the order they were added.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub conditions: Vec<(String, QueryOperator)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_condition(mut self, field: &str, op: QueryOperator) -> Self {
        self.conditions.push((field.to_string(), op));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    fn where_clause(&self, binder: &mut Binder) -> String {
        if self.conditions.is_empty() {
            return String::new();
        }
        let terms: Vec<String> = self
            .conditions
            .iter()
            .map(|(field, op)| render_condition(field, op, binder))
            .collect();
        format!(" WHERE {}", terms.join(" AND "))
    }
}

fn render_condition(field: &str, op: &QueryOperator, binder: &mut Binder) -> String {
    let column = quote_ident(field);
    let (sym, value) = match op {
        QueryOperator::Equal(v) => ("=", v.clone()),
        QueryOperator::NotEqual(v) => ("<>", v.clone()),
        QueryOperator::GreaterThan(v) => (">", v.clone()),
        QueryOperator::GreaterThanOrEqual(v) => (">=", v.clone()),
        QueryOperator::LessThan(v) => ("<", v.clone()),
        QueryOperator::LessThanOrEqual(v) => ("<=", v.clone()),
        QueryOperator::Like(pattern) => ("LIKE", Value::Text(pattern.clone())),
        QueryOperator::In(values) => {
            if values.is_empty() {
                return "0 = 1".to_string();
            }
            let names: Vec<String> = values.iter().map(|v| binder.bind(v.clone())).collect();
            return format!("{} IN ({})", column, names.join(", "));
        }
    };
    format!("{} {} {}", column, sym, binder.bind(value))
}

/// Hands out `:p0`, `:p1`, ... and collects the bound values.
#[derive(Debug, Default)]
struct Binder {
    params: Params,
}

impl Binder {
    fn bind(&mut self, value: Value) -> String {
        let name = format!(":p{}", self.params.len());
        self.params.push(&name, value);
        name
    }

    fn finish(self, statement: String) -> SqlQuery {
        SqlQuery {
            statement,
            params: self.params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOperation {
    pub table: String,
    pub data: Vec<(String, Value)>,
}

impl CreateOperation {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            data: Vec::new(),
        }
    }

    pub fn with_value(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.data.push((column.to_string(), value.into()));
        self
    }

    pub fn to_sql_query(&self) -> SqlQuery {
        let table = quote_ident(&self.table);
        if self.data.is_empty() {
            return SqlQuery::new(&format!("INSERT INTO {} DEFAULT VALUES", table));
        }
        let mut binder = Binder::default();
        let columns: Vec<String> = self.data.iter().map(|(c, _)| quote_ident(c)).collect();
        let names: Vec<String> = self
            .data
            .iter()
            .map(|(_, v)| binder.bind(v.clone()))
            .collect();
        binder.finish(format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            names.join(", ")
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadOperation {
    pub table: String,
    pub query: Query,
    pub fields: Option<Vec<String>>,
}

impl ReadOperation {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            query: Query::new(),
            fields: None,
        }
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    pub fn with_fields(mut self, fields: &[&str]) -> Self {
        self.fields = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn to_sql_query(&self) -> SqlQuery {
        let fields = match &self.fields {
            Some(fields) if !fields.is_empty() => fields
                .iter()
                .map(|f| quote_ident(f))
                .collect::<Vec<_>>()
                .join(", "),
            _ => "*".to_string(),
        };
        let mut binder = Binder::default();
        let mut sql = format!("SELECT {} FROM {}", fields, quote_ident(&self.table));
        sql.push_str(&self.query.where_clause(&mut binder));
        binder.finish(sql)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateOperation {
    pub table: String,
    pub query: Query,
    pub updates: Vec<(String, Value)>,
}

impl UpdateOperation {
    pub fn new(table: &str, query: Query) -> Self {
        Self {
            table: table.to_string(),
            query,
            updates: Vec::new(),
        }
    }

    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.updates.push((column.to_string(), value.into()));
        self
    }

    pub fn to_sql_query(&self) -> SqlQuery {
        let mut binder = Binder::default();
        let assignments: Vec<String> = self
            .updates
            .iter()
            .map(|(c, v)| format!("{} = {}", quote_ident(c), binder.bind(v.clone())))
            .collect();
        let mut sql = format!(
            "UPDATE {} SET {}",
            quote_ident(&self.table),
            assignments.join(", ")
        );
        sql.push_str(&self.query.where_clause(&mut binder));
        binder.finish(sql)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteOperation {
    pub table: String,
    pub query: Query,
}

impl DeleteOperation {
    pub fn new(table: &str, query: Query) -> Self {
        Self {
            table: table.to_string(),
            query,
        }
    }

    pub fn to_sql_query(&self) -> SqlQuery {
        let mut binder = Binder::default();
        let mut sql = format!("DELETE FROM {}", quote_ident(&self.table));
        sql.push_str(&self.query.where_clause(&mut binder));
        binder.finish(sql)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CrudOperation {
    Create(CreateOperation),
    Read(ReadOperation),
    Update(UpdateOperation),
    Delete(DeleteOperation),
}

impl CrudOperation {
    pub fn to_sql_query(&self) -> SqlQuery {
        match self {
            CrudOperation::Create(op) => op.to_sql_query(),
            CrudOperation::Read(op) => op.to_sql_query(),
            CrudOperation::Update(op) => op.to_sql_query(),
            CrudOperation::Delete(op) => op.to_sql_query(),
        }
    }
}
