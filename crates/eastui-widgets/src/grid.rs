#![forbid(unsafe_code)]

//! Grid container: children flow into a fixed number of columns.

use eastui_value::{Value, ValueType};

use crate::{Component, node};

/// A column-count grid with uniform gap.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    columns: i64,
    gap: i64,
    children: Vec<Value>,
}

impl Grid {
    /// Create an empty grid with `columns` columns.
    #[must_use]
    pub fn new(columns: i64) -> Self {
        Self {
            columns,
            gap: 0,
            children: Vec::new(),
        }
    }

    /// Gap between cells, in design-system units.
    #[must_use]
    pub fn gap(mut self, gap: i64) -> Self {
        self.gap = gap;
        self
    }

    /// Append a cell.
    #[must_use]
    pub fn child(mut self, child: Value) -> Self {
        self.children.push(child);
        self
    }
}

impl Component for Grid {
    const TAG: &'static str = "Grid";

    fn schema() -> ValueType {
        ValueType::record([
            ("columns", ValueType::Int),
            ("gap", ValueType::Int),
            ("children", ValueType::array(ValueType::Any)),
        ])
    }

    fn build(self) -> Value {
        node::<Self>(Value::record([
            ("columns", Value::Int(self.columns)),
            ("gap", Value::Int(self.gap)),
            ("children", Value::Array(self.children)),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Text;

    #[test]
    fn cells_in_insertion_order() {
        let built = Grid::new(2)
            .child(Text::new("a").build())
            .child(Text::new("b").build())
            .build();
        let Value::Union { payload, .. } = built else {
            panic!("expected union");
        };
        assert_eq!(payload.field("columns"), Some(&Value::Int(2)));
        let Some(Value::Array(children)) = payload.field("children") else {
            panic!("expected children array");
        };
        assert_eq!(children.len(), 2);
    }
}
