//! Analysis results and their renderings.

use std::collections::BTreeMap;

use serde::Serialize;

use super::aggregate::AggregateState;
use super::compile::{RowSchema, VariantSchemaEntry};
use super::index::IndexDescriptor;
use crate::bson::{TypeTag, ends_with_wildcard};
use crate::error::Result;

const MAX_PERCENT_DIGITS: usize = 2;

/// Everything one analysis run produces.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SchemaReport {
    #[serde(rename = "RowSchema")]
    pub row_schema: RowSchema,
    #[serde(rename = "TableIndex", skip_serializing_if = "Vec::is_empty")]
    pub table_index: Vec<IndexDescriptor>,
    #[serde(rename = "NestedSchemaSet", skip_serializing_if = "BTreeMap::is_empty")]
    pub nested_schema_set: BTreeMap<u32, VariantSchemaEntry>,
    /// Per-key statistics over the flattened paths.
    #[serde(skip)]
    pub key_frequencies: Vec<KeyFrequency>,
    #[serde(skip)]
    pub documents: u64,
}

impl SchemaReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Occurrence statistics for one flattened key.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyFrequency {
    pub key: String,
    pub types: BTreeMap<TypeTag, u64>,
    pub total_occurrences: u64,
    pub percent_containing: f64,
}

/// Rank flattened keys by how many documents contain them.
///
/// Keys that end in an array-index wildcard are dropped; their parent array
/// key is kept.
pub fn key_frequencies(state: &AggregateState, document_count: u64) -> Vec<KeyFrequency> {
    let mut rows: Vec<KeyFrequency> = state
        .paths()
        .iter()
        .filter(|(key, _)| !ends_with_wildcard(key))
        .map(|(key, stat)| KeyFrequency {
            key: key.clone(),
            types: stat.types.clone(),
            total_occurrences: stat.total_occurrences,
            percent_containing: if document_count == 0 {
                0.0
            } else {
                stat.total_occurrences as f64 * 100.0 / document_count as f64
            },
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_occurrences.cmp(&a.total_occurrences).then_with(|| a.key.cmp(&b.key))
    });
    rows
}

/// Fractional digits in the shortest rendering of `value`, at least 1.
fn significant_digits(value: f64) -> usize {
    let rendered = value.to_string();
    match rendered.split_once('.') {
        Some((_, fraction)) if !fraction.is_empty() => fraction.len(),
        _ => 1,
    }
}

fn types_cell(types: &BTreeMap<TypeTag, u64>) -> String {
    if types.len() > 1 {
        types.iter().map(|(tag, count)| format!("{tag} ({count})")).collect::<Vec<_>>().join(",")
    } else {
        types.keys().map(|tag| tag.label()).collect::<Vec<_>>().join(",")
    }
}

/// Columns holding counts and percentages; their data cells are right-aligned.
const NUMERIC_COLUMNS: [bool; 4] = [false, false, true, true];

fn pad_cell(cell: &str, width: usize, fill: char, right_align: bool) -> String {
    let len = cell.chars().count();
    if len >= width {
        return cell.to_string();
    }
    let padding: String = std::iter::repeat_n(fill, width - len).collect();
    if right_align { format!("{padding}{cell}") } else { format!("{cell}{padding}") }
}

/// Render key frequencies as a bordered text table.
pub fn render_ascii_table(rows: &[KeyFrequency]) -> String {
    let digits = rows
        .iter()
        .map(|row| significant_digits(row.percent_containing))
        .max()
        .unwrap_or(1)
        .min(MAX_PERCENT_DIGITS);

    let mut table: Vec<[String; 4]> = vec![
        ["key".into(), "types".into(), "occurrences".into(), "percents".into()],
        Default::default(),
    ];
    table.extend(rows.iter().map(|row| {
        [
            row.key.clone(),
            types_cell(&row.types),
            row.total_occurrences.to_string(),
            format!("{:.digits$}", row.percent_containing),
        ]
    }));

    let mut widths = [0usize; 4];
    for row in &table {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let lines: Vec<String> = table
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let fill = if index == 1 { '-' } else { ' ' };
            let data_row = index > 1;
            let cells: Vec<String> = row
                .iter()
                .zip(widths)
                .zip(NUMERIC_COLUMNS)
                .map(|((cell, width), numeric)| pad_cell(cell, width, fill, data_row && numeric))
                .collect();
            format!("| {} |", cells.join(" | "))
        })
        .collect();

    let inner = lines.first().map(|line| line.chars().count()).unwrap_or(2) - 2;
    let border = format!("+{}+", "-".repeat(inner));

    let mut out = Vec::with_capacity(lines.len() + 2);
    out.push(border.clone());
    out.extend(lines);
    out.push(border);
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use mongodb::bson::doc;

    use super::*;
    use crate::schema::aggregate::DocumentProfile;

    fn state_for(docs: &[mongodb::bson::Document]) -> AggregateState {
        let mut state = AggregateState::new();
        for doc in docs {
            state.merge(&DocumentProfile::from_document(doc, 99));
        }
        state
    }

    #[test]
    fn ranks_by_occurrence_then_key() {
        let state = state_for(&[
            doc! { "_id": 1, "name": "a" },
            doc! { "_id": 2, "name": "b", "age": 5 },
        ]);
        let rows = key_frequencies(&state, 2);
        let keys: Vec<&str> = rows.iter().map(|row| row.key.as_str()).collect();
        assert_eq!(keys, vec!["_id", "name", "age"]);
        assert_eq!(rows[2].percent_containing, 50.0);
    }

    #[test]
    fn drops_wildcard_leaf_keys() {
        let state = state_for(&[doc! { "tags": ["a"], "items": [{ "x": 1 }] }]);
        let keys: Vec<String> = key_frequencies(&state, 1).into_iter().map(|row| row.key).collect();
        assert_eq!(keys, vec!["items", "items.XX.x", "tags"]);
    }

    #[test]
    fn renders_bordered_table() {
        let state = state_for(&[
            doc! { "_id": 1, "name": "a" },
            doc! { "_id": 2, "name": "b", "age": 5 },
        ]);
        let table = render_ascii_table(&key_frequencies(&state, 2));
        let border = format!("+{}+", "-".repeat(40));
        let expected = [
            border.as_str(),
            "| key  | types  | occurrences | percents |",
            "| ---- | ------ | ----------- | -------- |",
            "| _id  | Number |           2 |    100.0 |",
            "| name | String |           2 |    100.0 |",
            "| age  | Number |           1 |     50.0 |",
            border.as_str(),
        ]
        .join("\n");
        assert_eq!(table, expected);
    }

    #[test]
    fn lists_counts_for_polymorphic_keys() {
        let state = state_for(&[doc! { "v": 1 }, doc! { "v": "x" }, doc! { "w": 1 }]);
        let rows = key_frequencies(&state, 3);
        assert_eq!(types_cell(&rows[0].types), "String (1),Number (1)");
        assert_eq!(format!("{:.2}", rows[0].percent_containing), "66.67");
    }

    #[test]
    fn number_like_keys_stay_left_aligned() {
        let row = |key: &str| KeyFrequency {
            key: key.to_string(),
            types: BTreeMap::from([(TypeTag::Number, 1)]),
            total_occurrences: 1,
            percent_containing: 100.0,
        };
        let table = render_ascii_table(&[row("NaN"), row("inf"), row("infinity")]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[3], "| NaN      | Number |           1 |    100.0 |");
        assert_eq!(lines[4], "| inf      | Number |           1 |    100.0 |");
        assert_eq!(lines[5], "| infinity | Number |           1 |    100.0 |");
    }

    #[test]
    fn precision_is_capped() {
        assert_eq!(significant_digits(100.0), 1);
        assert_eq!(significant_digits(12.5), 1);
        assert_eq!(significant_digits(33.333), 3);
    }
}
