#![forbid(unsafe_code)]

//! Table node: named columns and row-major cell nodes.

use eastui_value::{Value, ValueType};

use crate::{Component, node};

/// A data table. Rows are arrays of cell nodes, one per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<(String, String)>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from `(key, label)` column pairs.
    #[must_use]
    pub fn new<K: Into<String>, L: Into<String>>(
        columns: impl IntoIterator<Item = (K, L)>,
    ) -> Self {
        Self {
            columns: columns
                .into_iter()
                .map(|(k, l)| (k.into(), l.into()))
                .collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row of cells. Cell count should match the column count;
    /// the host binding decides how to render ragged rows.
    #[must_use]
    pub fn row(mut self, cells: impl IntoIterator<Item = Value>) -> Self {
        self.rows.push(cells.into_iter().collect());
        self
    }
}

impl Component for Table {
    const TAG: &'static str = "Table";

    fn schema() -> ValueType {
        ValueType::record([
            (
                "columns",
                ValueType::array(ValueType::record([
                    ("key", ValueType::Str),
                    ("label", ValueType::Str),
                ])),
            ),
            (
                "rows",
                ValueType::array(ValueType::array(ValueType::Any)),
            ),
        ])
    }

    fn build(self) -> Value {
        let columns = self
            .columns
            .into_iter()
            .map(|(key, label)| {
                Value::record([("key", Value::Str(key)), ("label", Value::Str(label))])
            })
            .collect();
        let rows = self.rows.into_iter().map(Value::Array).collect();
        node::<Self>(Value::record([
            ("columns", Value::Array(columns)),
            ("rows", Value::Array(rows)),
        ]))
    }
}
