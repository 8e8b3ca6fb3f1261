//! CSV transactions loader.
//!
//! Parses the pre-joined order-line export into `OrderLine` structs.
//! Columns read (everything else in the file is ignored):
//!   order_id, customer_unique_id, customer_state, product_category_name_english,
//!   order_purchase_timestamp, price, freight_value, order_status
//!
//! Rows whose timestamp is missing or unparseable are skipped and counted,
//! never fatal. Rows without an order id or customer id are kept; only the
//! RFM rollup needs those.

use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::error::{PulseError, PulseResult};

/// Columns a file must carry to be loadable at all.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "order_id",
    "customer_unique_id",
    "customer_state",
    "product_category_name_english",
    "order_purchase_timestamp",
    "price",
    "freight_value",
    "order_status",
];

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// One purchased line item. Several lines can share an `order_id`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderLine {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub customer_unique_id: Option<String>,
    #[serde(rename = "customer_state", default)]
    pub region: Option<String>,
    #[serde(rename = "product_category_name_english", default)]
    pub category: Option<String>,
    #[serde(rename = "order_purchase_timestamp", deserialize_with = "deserialize_timestamp")]
    pub purchased_at: NaiveDateTime,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub price: Option<f64>,
    #[serde(rename = "freight_value", default, deserialize_with = "csv::invalid_option")]
    pub freight: Option<f64>,
    #[serde(rename = "order_status", default)]
    pub status: Option<String>,
}

impl OrderLine {
    /// Purchase timestamp truncated to a calendar date.
    pub fn purchase_date(&self) -> NaiveDate {
        self.purchased_at.date()
    }
}

/// Parsed rows plus the number of rows that were dropped.
#[derive(Debug, Clone, Default)]
pub struct TransactionLoad {
    pub lines: Vec<OrderLine>,
    pub skipped_rows: usize,
}

/// Load order lines from a CSV reader.
pub fn load_transactions<R: Read>(reader: R) -> PulseResult<TransactionLoad> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PulseError::MissingColumns { columns: missing });
    }

    let mut load = TransactionLoad::default();
    for (line_num, result) in csv_reader.deserialize::<OrderLine>().enumerate() {
        match result {
            Ok(line) => load.lines.push(line),
            Err(e) => {
                log::warn!("skipping CSV line {}: {}", line_num + 2, e);
                load.skipped_rows += 1;
            }
        }
    }

    if load.skipped_rows > 0 {
        log::warn!(
            "loaded {} order lines, skipped {} malformed rows",
            load.lines.len(),
            load.skipped_rows
        );
    }
    Ok(load)
}

/// Load order lines from a CSV file path.
///
/// A missing file maps to `PulseError::DatasetNotFound`, the one failure a
/// dashboard cannot start without.
pub fn load_transactions_file(path: impl AsRef<Path>) -> PulseResult<TransactionLoad> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PulseError::DatasetNotFound {
            path: path.display().to_string(),
        },
        _ => PulseError::Io {
            path: path.display().to_string(),
            source: e,
        },
    })?;
    log::info!("loading transactions from '{}'", path.display());
    load_transactions(file)
}

/// Parse a purchase timestamp. Accepts `YYYY-MM-DD HH:MM:SS`, the ISO `T`
/// separator, optional fractional seconds, or a bare date (midnight).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_timestamp(&s).ok_or_else(|| {
        serde::de::Error::custom(format!("expected purchase timestamp, got '{}'", s))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_CSV: &str = "\
order_id,customer_unique_id,customer_state,product_category_name_english,order_purchase_timestamp,price,freight_value,order_status,seller_id
o-1,cust-a,SP,health_beauty,2018-01-10 10:15:00,100.00,10.00,delivered,s-9
o-1,cust-a,SP,toys,2018-01-10 10:15:00,50.00,5.00,delivered,s-9
o-2,cust-b,RJ,,2018-02-03 08:00:00,80.00,8.50,canceled,s-3
o-3,cust-a,SP,toys,2018-03-01,,4.00,shipped,s-1
";

    #[test]
    fn load_sample_csv() {
        let load = load_transactions(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(load.lines.len(), 4);
        assert_eq!(load.skipped_rows, 0);

        let first = &load.lines[0];
        assert_eq!(first.order_id.as_deref(), Some("o-1"));
        assert_eq!(first.customer_unique_id.as_deref(), Some("cust-a"));
        assert_eq!(first.region.as_deref(), Some("SP"));
        assert_eq!(first.category.as_deref(), Some("health_beauty"));
        assert_eq!(first.status.as_deref(), Some("delivered"));
        assert!((first.price.unwrap() - 100.0).abs() < 0.01);
        assert!((first.freight.unwrap() - 10.0).abs() < 0.01);
        assert_eq!(
            first.purchase_date(),
            NaiveDate::from_ymd_opt(2018, 1, 10).unwrap()
        );
    }

    #[test]
    fn empty_cells_become_none() {
        let load = load_transactions(SAMPLE_CSV.as_bytes()).unwrap();
        assert!(load.lines[2].category.is_none());
        assert!(load.lines[3].price.is_none());
        // Bare date parses as midnight.
        assert_eq!(
            load.lines[3].purchased_at,
            NaiveDate::from_ymd_opt(2018, 3, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let csv_data = "\
order_id,customer_unique_id,customer_state,product_category_name_english,order_purchase_timestamp,price,freight_value,order_status
o-1,cust-a,SP,toys,2018-01-10 10:15:00,10.0,1.0,delivered
o-2,cust-b,RJ,toys,not-a-date,10.0,1.0,delivered
o-3,cust-c,RJ,toys,,10.0,1.0,delivered
o-4,cust-d,,toys,2018-01-12 10:15:00,abc,1.0,delivered
";
        let load = load_transactions(csv_data.as_bytes()).unwrap();
        assert_eq!(load.skipped_rows, 2);
        assert_eq!(load.lines.len(), 2);
        assert_eq!(load.lines[0].order_id.as_deref(), Some("o-1"));
        // Unparseable price is tolerated as missing.
        assert_eq!(load.lines[1].order_id.as_deref(), Some("o-4"));
        assert!(load.lines[1].price.is_none());
        assert!(load.lines[1].region.is_none());
    }

    #[test]
    fn rows_without_ids_are_kept() {
        let csv_data = "\
order_id,customer_unique_id,customer_state,product_category_name_english,order_purchase_timestamp,price,freight_value,order_status
,cust-a,SP,toys,2018-01-10 10:15:00,10.0,1.0,delivered
o-2,,RJ,toys,2018-01-11 10:15:00,500.0,1.0,canceled
";
        let load = load_transactions(csv_data.as_bytes()).unwrap();
        assert_eq!(load.skipped_rows, 0);
        assert_eq!(load.lines.len(), 2);
        assert!(load.lines[0].order_id.is_none());
        assert_eq!(load.lines[0].customer_unique_id.as_deref(), Some("cust-a"));
        assert_eq!(load.lines[1].order_id.as_deref(), Some("o-2"));
        assert!(load.lines[1].customer_unique_id.is_none());
    }

    #[test]
    fn missing_required_column_is_rejected() {
        let csv_data = "order_id,price\no-1,10.0\n";
        match load_transactions(csv_data.as_bytes()) {
            Err(PulseError::MissingColumns { columns }) => {
                assert_eq!(
                    columns,
                    vec![
                        "customer_unique_id",
                        "customer_state",
                        "product_category_name_english",
                        "order_purchase_timestamp",
                        "freight_value",
                        "order_status",
                    ]
                );
            }
            other => panic!("expected MissingColumns, got {:?}", other.map(|l| l.lines.len())),
        }
    }

    #[test]
    fn missing_price_column_is_rejected() {
        let csv_data = "\
order_id,customer_unique_id,customer_state,product_category_name_english,order_purchase_timestamp,freight_value,order_status
o-1,cust-a,SP,toys,2018-01-10 10:15:00,1.0,delivered
";
        match load_transactions(csv_data.as_bytes()) {
            Err(PulseError::MissingColumns { columns }) => assert_eq!(columns, vec!["price"]),
            other => panic!("expected MissingColumns, got {:?}", other.map(|l| l.lines.len())),
        }
    }

    #[test]
    fn missing_file_reports_dataset_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all_data.csv");
        match load_transactions_file(&path) {
            Err(PulseError::DatasetNotFound { path: reported }) => {
                assert!(reported.ends_with("all_data.csv"));
            }
            other => panic!("expected DatasetNotFound, got {:?}", other.map(|l| l.lines.len())),
        }
    }

    #[test]
    fn loads_from_file_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_CSV.as_bytes()).unwrap();
        let load = load_transactions_file(file.path()).unwrap();
        assert_eq!(load.lines.len(), 4);
    }

    #[test]
    fn timestamp_formats() {
        assert!(parse_timestamp("2017-10-02 10:56:33").is_some());
        assert!(parse_timestamp("2017-10-02T10:56:33").is_some());
        assert!(parse_timestamp("2017-10-02 10:56:33.250").is_some());
        assert!(parse_timestamp(" 2017-10-02 ").is_some());
        assert!(parse_timestamp("02/10/2017").is_none());
    }
}
