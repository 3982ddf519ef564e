//! The clicked context and column value resolution.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::fs::load_from_file;
use crate::{Column, Error, Value};

static NULL_VALUE: Value = Value::Null;

/// The full row from which a click originated, along with its columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    #[serde(default)]
    pub row: Vec<Value>,
    #[serde(default)]
    pub cols: Vec<Column>,
}

impl Origin {
    pub fn new(row: Vec<Value>, cols: Vec<Column>) -> Self {
        Self { row, cols }
    }
}

/// An additional breakout dimension of a clicked data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    #[serde(default)]
    pub value: Value,
    pub column: Column,
}

impl Dimension {
    pub fn new<V: Into<Value>>(value: V, column: Column) -> Self {
        Self {
            value: value.into(),
            column,
        }
    }
}

/// A user interaction with a single data point in a visualization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clicked {
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<Dimension>,
}

impl Clicked {
    /// A click on a single value of the given column.
    pub fn new<V: Into<Value>>(value: V, column: Column) -> Self {
        Self {
            value: value.into(),
            column: Some(column),
            ..Default::default()
        }
    }

    /// A click that originated from a table row.
    pub fn from_origin(origin: Origin) -> Self {
        Self {
            origin: Some(origin),
            ..Default::default()
        }
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimensions.push(dimension);
        self
    }

    /// Load a clicked context from a JSON, YAML or TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        load_from_file(path)
    }

    /// Resolve the value and column for the given column name.
    ///
    /// Builds a fresh [`ColumnIndex`] for the origin, if any. When resolving
    /// many names against many rows of the same table, build the index once
    /// and use [`Resolver::with_index`] instead.
    pub fn resolve(&self, name: &str) -> Option<Resolved<'_>> {
        Resolver::new(self).resolve(name)
    }
}

/// Maps lower-cased column names to their positions within a row.
///
/// Where two columns share a name (ignoring case), the first one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndex(HashMap<String, usize>);

impl ColumnIndex {
    pub fn new(cols: &[Column]) -> Self {
        let mut index = HashMap::with_capacity(cols.len());
        for (i, col) in cols.iter().enumerate() {
            index.entry(col.name.to_lowercase()).or_insert(i);
        }
        Self(index)
    }

    /// Position of the column with the given name, which must already be
    /// lower-cased.
    pub fn get(&self, lower_name: &str) -> Option<usize> {
        self.0.get(lower_name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A value and the column it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved<'a> {
    pub value: &'a Value,
    pub column: &'a Column,
}

/// Resolves column names against a clicked context.
#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    clicked: &'a Clicked,
    index: Option<Cow<'a, ColumnIndex>>,
}

impl<'a> Resolver<'a> {
    /// Constructor. Indexes the clicked context's origin, if it has one.
    pub fn new(clicked: &'a Clicked) -> Self {
        Self {
            clicked,
            index: clicked
                .origin
                .as_ref()
                .map(|origin| Cow::Owned(ColumnIndex::new(&origin.cols))),
        }
    }

    /// Constructor that reuses an index built for the origin's columns, e.g.
    /// one shared by all the rows of a table.
    pub fn with_index(clicked: &'a Clicked, index: &'a ColumnIndex) -> Self {
        Self {
            clicked,
            index: Some(Cow::Borrowed(index)),
        }
    }

    pub fn clicked(&self) -> &'a Clicked {
        self.clicked
    }

    /// Resolve the value and column for the given column name, ignoring case.
    ///
    /// The origin row is consulted first. Failing that, the clicked value
    /// and then each dimension are checked in order, and the first whose
    /// column name matches wins.
    pub fn resolve(&self, name: &str) -> Option<Resolved<'a>> {
        let lower = name.to_lowercase();
        if let (Some(origin), Some(index)) = (self.clicked.origin.as_ref(), self.index.as_ref()) {
            if let Some(i) = index.get(&lower) {
                if let Some(column) = origin.cols.get(i) {
                    trace!("Resolved column \"{}\" at origin index {}", name, i);
                    return Some(Resolved {
                        // A short row is missing trailing nulls.
                        value: origin.row.get(i).unwrap_or(&NULL_VALUE),
                        column,
                    });
                }
            }
        }
        let clicked = self.clicked.column.as_ref().map(|column| Resolved {
            value: &self.clicked.value,
            column,
        });
        let dimensions = self.clicked.dimensions.iter().map(|d| Resolved {
            value: &d.value,
            column: &d.column,
        });
        let found = clicked
            .into_iter()
            .chain(dimensions)
            .find(|r| r.column.name_matches(&lower));
        if found.is_some() {
            trace!("Resolved column \"{}\" from clicked dimensions", name);
        }
        found
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn table_click() -> Clicked {
        Clicked::from_origin(Origin::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![Column::new("COL1"), Column::new("COL2"), Column::new("COL3")],
        ))
    }

    #[test]
    fn resolves_from_origin_ignoring_case() {
        let clicked = table_click();
        for name in ["COL2", "col2", "Col2"] {
            let resolved = clicked.resolve(name).unwrap();
            assert_eq!(resolved.value, &Value::from("b"));
            assert_eq!(resolved.column.name, "COL2");
        }
        assert!(clicked.resolve("COL4").is_none());
    }

    #[test]
    fn short_rows_resolve_to_null() {
        let clicked = Clicked::from_origin(Origin::new(
            vec!["a".into()],
            vec![Column::new("COL1"), Column::new("COL2")],
        ));
        assert_eq!(clicked.resolve("col2").unwrap().value, &Value::Null);
    }

    #[test]
    fn first_match_wins_across_dimensions() {
        let clicked = Clicked::new(10_i64, Column::new("count"))
            .with_dimension(Dimension::new("Widget", Column::new("Category")))
            .with_dimension(Dimension::new("Gizmo", Column::new("CATEGORY")));
        assert_eq!(clicked.resolve("count").unwrap().value, &Value::Signed(10));
        assert_eq!(
            clicked.resolve("category").unwrap().value,
            &Value::from("Widget")
        );
    }

    #[test]
    fn origin_miss_falls_back_to_dimensions() {
        let clicked = table_click().with_dimension(Dimension::new(7_i64, Column::new("extra")));
        assert_eq!(clicked.resolve("EXTRA").unwrap().value, &Value::Signed(7));
    }

    #[test]
    fn duplicate_origin_columns_resolve_to_first() {
        let index = ColumnIndex::new(&[Column::new("x"), Column::new("X")]);
        assert_eq!(index.get("x"), Some(0));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn shared_index_across_rows() {
        let cols = vec![Column::new("ID"), Column::new("Name")];
        let index = ColumnIndex::new(&cols);
        let rows = vec![
            vec![Value::from(1_i64), Value::from("alpha")],
            vec![Value::from(2_i64), Value::from("beta")],
        ];
        let names = rows
            .into_iter()
            .map(|row| {
                let clicked = Clicked::from_origin(Origin::new(row, cols.clone()));
                let resolver = Resolver::with_index(&clicked, &index);
                resolver.resolve("name").unwrap().value.to_string()
            })
            .collect::<Vec<String>>();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn deserialize_from_json() {
        let clicked: Clicked = serde_json::from_value(json!({
            "value": 42,
            "column": { "name": "total", "base_type": "type/Integer" },
            "dimensions": [
                { "value": "2024-03-01", "column": { "name": "created_at", "base_type": "type/DateTime", "unit": "month" } }
            ]
        }))
        .unwrap();
        assert_eq!(clicked.value, Value::Unsigned(42));
        assert!(clicked.origin.is_none());
        let resolved = clicked.resolve("CREATED_AT").unwrap();
        assert!(resolved.column.is_temporal());
    }

    #[test]
    fn load_clicked_context_from_json_file() {
        let path =
            std::env::temp_dir().join(format!("clickthru-clicked-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{
                "value": "b",
                "column": { "name": "COL2" },
                "origin": {
                    "row": ["a", "b", 7],
                    "cols": [{ "name": "COL1" }, { "name": "COL2" }, { "name": "COL3" }]
                }
            }"#,
        )
        .unwrap();
        let loaded = Clicked::load_from_file(&path);
        std::fs::remove_file(&path).unwrap();

        let clicked = loaded.unwrap();
        assert_eq!(clicked.value, Value::from("b"));
        assert_eq!(clicked.resolve("col1").unwrap().value, &Value::from("a"));
        assert_eq!(clicked.resolve("COL3").unwrap().value, &Value::Unsigned(7));
    }

    #[test]
    fn missing_clicked_context_file() {
        let path = std::env::temp_dir().join("clickthru-no-such-context.json");
        match Clicked::load_from_file(&path).unwrap_err() {
            Error::Io(_, _) => (),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
