//! Aggregation outputs: chart series, period tables and rankings

use serde::Serialize;

/// One named line/bar set in a chart, parallel to `AggregatedSeries::labels`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Dataset {
    pub key: String,
    pub label: String,
    pub data: Vec<f64>,
}

/// Chart-ready output: period labels plus one dataset per dimension
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AggregatedSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl AggregatedSeries {
    pub fn dataset(&self, key: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.key == key)
    }
}

/// One period row: per-dimension values in column order plus the row total
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TableRow {
    pub label: String,
    pub values: Vec<f64>,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColumnTotal {
    pub key: String,
    pub label: String,
    pub total: f64,
}

/// Table-ready output with running totals
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AggregatedTable {
    pub rows: Vec<TableRow>,
    pub column_totals: Vec<ColumnTotal>,
    pub grand_total: f64,
}

impl AggregatedTable {
    fn column_index(&self, key: &str) -> Option<usize> {
        self.column_totals.iter().position(|c| c.key == key)
    }

    /// Value of `key` in row `row`
    pub fn value(&self, row: usize, key: &str) -> Option<f64> {
        let col = self.column_index(key)?;
        self.rows.get(row).and_then(|r| r.values.get(col).copied())
    }

    pub fn column_total(&self, key: &str) -> Option<f64> {
        self.column_index(key).map(|i| self.column_totals[i].total)
    }

    /// Per-column share of the grand total (pie chart payload)
    pub fn distribution(&self) -> Vec<Share> {
        self.column_totals
            .iter()
            .map(|c| Share::of(&c.key, &c.label, c.total, self.grand_total))
            .collect()
    }
}

/// Series and table produced by one aggregation pass.
///
/// Always replaced as a whole so a renderer never sees a series from one
/// period next to a table from another.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AggregationReport {
    pub series: AggregatedSeries,
    pub table: AggregatedTable,
}

/// A slice of a distribution chart
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Share {
    pub key: String,
    pub label: String,
    pub value: f64,
    pub percent: f64,
}

impl Share {
    /// Percent uses 1 as divisor when the whole is zero, so empty periods give 0%
    pub fn of(key: &str, label: &str, value: f64, whole: f64) -> Self {
        let divisor = if whole == 0.0 { 1.0 } else { whole };
        Self {
            key: key.to_string(),
            label: label.to_string(),
            value,
            percent: value / divisor * 100.0,
        }
    }
}

/// Driver total volume for one period
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DriverTotal {
    pub driver_id: String,
    pub name: String,
    pub total_volume: f64,
}

/// Drivers active in a period, highest volume first
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DriverRanking {
    pub rows: Vec<DriverTotal>,
    pub total_volume: f64,
}

impl DriverRanking {
    pub fn distribution(&self) -> Vec<Share> {
        self.rows
            .iter()
            .map(|r| Share::of(&r.driver_id, &r.name, r.total_volume, self.total_volume))
            .collect()
    }
}

/// Driver view output: per-period stacked series plus the ranking table
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DriverReport {
    pub report: AggregationReport,
    pub ranking: DriverRanking,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table() -> AggregatedTable {
        AggregatedTable {
            rows: vec![
                TableRow {
                    label: "2026-01-01".into(),
                    values: vec![100.0, 50.0],
                    total: 150.0,
                },
                TableRow {
                    label: "2026-01-02".into(),
                    values: vec![0.0, 50.0],
                    total: 50.0,
                },
            ],
            column_totals: vec![
                ColumnTotal {
                    key: "Molo".into(),
                    label: "Molo".into(),
                    total: 100.0,
                },
                ColumnTotal {
                    key: "Oton".into(),
                    label: "Oton".into(),
                    total: 100.0,
                },
            ],
            grand_total: 200.0,
        }
    }

    #[test]
    fn test_table_value_lookup() {
        let table = make_table();
        assert_eq!(table.value(0, "Oton"), Some(50.0));
        assert_eq!(table.value(1, "Molo"), Some(0.0));
        assert_eq!(table.value(0, "Sooc"), None);
        assert_eq!(table.value(9, "Molo"), None);
    }

    #[test]
    fn test_table_distribution() {
        let shares = make_table().distribution();
        assert_eq!(shares.len(), 2);
        assert!((shares[0].percent - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_share_zero_whole() {
        let share = Share::of("Molo", "Molo", 0.0, 0.0);
        assert!((share.percent - 0.0).abs() < f64::EPSILON);
    }
}
