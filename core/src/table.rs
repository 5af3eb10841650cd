//! Result tables and chart descriptions handed to the presentation layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One cell of a result table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str(""),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:.2}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Option<f64>> for Value {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Value::Null, Value::Float)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Option<String>> for Value {
    fn from(v: Option<String>) -> Self {
        v.map_or(Value::Null, Value::Text)
    }
}

/// A typed query row that knows how to lay itself out as table cells.
pub trait TableRow {
    const COLUMNS: &'static [&'static str];

    fn cells(&self) -> Vec<Value>;
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultTable {
    pub fn from_rows<R: TableRow>(rows: &[R]) -> Self {
        Self {
            columns: R::COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: rows.iter().map(R::cells).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Vec<&Value> {
        match self.column_index(name) {
            Some(idx) => self.rows.iter().filter_map(|r| r.get(idx)).collect(),
            None => Vec::new(),
        }
    }

    /// Wide-to-long reshape: every non-id column becomes a
    /// `(id, var_name, value_name)` row, grouped by column then row.
    pub fn melt(&self, id_column: &str, var_name: &str, value_name: &str) -> ResultTable {
        let mut long = ResultTable {
            columns: vec![id_column.to_string(), var_name.to_string(), value_name.to_string()],
            rows: Vec::new(),
        };
        let Some(id_idx) = self.column_index(id_column) else {
            return long;
        };
        for (col_idx, col) in self.columns.iter().enumerate() {
            if col_idx == id_idx {
                continue;
            }
            for row in &self.rows {
                long.rows.push(vec![
                    row.get(id_idx).cloned().unwrap_or(Value::Null),
                    Value::Text(col.clone()),
                    row.get(col_idx).cloned().unwrap_or(Value::Null),
                ]);
            }
        }
        long
    }
}

// ── Charts ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartMark {
    Bar,
    Arc,
}

/// Reshape applied to the result table before charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Melt {
    pub id_column: String,
    pub var_name: String,
    pub value_name: String,
}

/// Everything a renderer needs to draw a query's chart.
///
/// For `Arc` marks `x` is unused and `y` is the angle (theta) field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub mark: ChartMark,
    pub x: Option<String>,
    pub y: String,
    pub color: Option<String>,
    pub tooltip: Vec<String>,
    pub melt: Option<Melt>,
}

impl ChartSpec {
    pub fn bar(x: &str, y: &str) -> Self {
        Self {
            mark: ChartMark::Bar,
            x: Some(x.to_string()),
            y: y.to_string(),
            color: None,
            tooltip: Vec::new(),
            melt: None,
        }
    }

    pub fn arc(theta: &str, color: &str) -> Self {
        Self {
            mark: ChartMark::Arc,
            x: None,
            y: theta.to_string(),
            color: Some(color.to_string()),
            tooltip: Vec::new(),
            melt: None,
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn with_tooltip(mut self, fields: &[&str]) -> Self {
        self.tooltip = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_melt(mut self, id_column: &str, var_name: &str, value_name: &str) -> Self {
        self.melt = Some(Melt {
            id_column: id_column.to_string(),
            var_name: var_name.to_string(),
            value_name: value_name.to_string(),
        });
        self
    }
}

// ── Query results ────────────────────────────────────────────────────────────

/// A single-number answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryOutput {
    Table(ResultTable),
    Scalar(Metric),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub id: u8,
    pub title: String,
    pub output: QueryOutput,
    pub chart: Option<ChartSpec>,
}

impl QueryResult {
    pub fn table(&self) -> Option<&ResultTable> {
        match &self.output {
            QueryOutput::Table(t) => Some(t),
            QueryOutput::Scalar(_) => None,
        }
    }

    pub fn scalar(&self) -> Option<u64> {
        match &self.output {
            QueryOutput::Scalar(m) => Some(m.value),
            QueryOutput::Table(_) => None,
        }
    }

    /// True when the query produced no rows, or a zero scalar.
    pub fn is_empty(&self) -> bool {
        match &self.output {
            QueryOutput::Table(t) => t.is_empty(),
            QueryOutput::Scalar(m) => m.value == 0,
        }
    }

    /// The table the chart should be drawn from, reshaped if the chart asks for it.
    pub fn chart_data(&self) -> Option<ResultTable> {
        let chart = self.chart.as_ref()?;
        let table = self.table()?;
        Some(match &chart.melt {
            Some(m) => table.melt(&m.id_column, &m.var_name, &m.value_name),
            None => table.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn melt_emits_one_row_per_value_column() {
        let wide = ResultTable {
            columns: vec!["City".into(), "providers".into(), "receivers".into()],
            rows: vec![
                vec![Value::Text("Lyon".into()), Value::Int(2), Value::Int(0)],
                vec![Value::Text("Nice".into()), Value::Int(1), Value::Int(3)],
            ],
        };
        let long = wide.melt("City", "role", "count");
        assert_eq!(long.columns, vec!["City", "role", "count"]);
        assert_eq!(long.len(), 4);
        assert_eq!(
            long.rows[2],
            vec![
                Value::Text("Lyon".into()),
                Value::Text("receivers".into()),
                Value::Int(0)
            ]
        );
    }

    #[test]
    fn values_serialize_untagged() {
        let row = vec![Value::Text("a".into()), Value::Int(3), Value::Float(1.5), Value::Null];
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"["a",3,1.5,null]"#);
    }
}
