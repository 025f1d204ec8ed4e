use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;
use thiserror::Error;

/// Columns every export must carry, by canonical name
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "order",
    "client",
    "factory",
    "product",
    "date",
    "quantity",
    "unit_price",
];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing column(s): {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),
}

#[derive(Debug, Error, PartialEq)]
pub enum RowError {
    #[error("{0} is empty")]
    Missing(&'static str),

    #[error("invalid date '{0}' (expected YYYY-MM-DD or DD/MM/YYYY)")]
    InvalidDate(String),

    #[error("invalid quantity '{0}'")]
    InvalidQuantity(String),

    #[error("invalid unit price '{0}'")]
    InvalidPrice(String),

    #[error("malformed record: {0}")]
    Malformed(String),
}

// One CSV record as text, keyed by canonical column names
#[derive(Debug, Deserialize)]
struct RawRecord {
    order: String,
    client: String,
    factory: String,
    product: String,
    date: String,
    quantity: String,
    unit_price: String,
}

/// A validated order line
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub order: String,
    pub client: String,
    pub factory: String,
    pub product: String,
    pub date: NaiveDate,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// Outcome of one record, with the line it started on
#[derive(Debug)]
pub struct ParsedRow {
    pub line: u64,
    pub result: Result<ImportRow, RowError>,
}

/// Map an export header (English or Portuguese) to its canonical column
pub fn canonical_column(header: &str) -> Option<&'static str> {
    let name = header.trim().to_lowercase().replace([' ', '-'], "_");
    let column = match name.as_str() {
        "order" | "pedido" | "order_id" => "order",
        "client" | "cliente" => "client",
        "factory" | "fabrica" | "fábrica" => "factory",
        "product" | "produto" => "product",
        "date" | "data" | "issued_at" => "date",
        "quantity" | "quantidade" | "qtd" => "quantity",
        "unit_price" | "price" | "preco" | "preço" | "preco_unitario" | "preço_unitário" => {
            "unit_price"
        }
        _ => return None,
    };
    Some(column)
}

/// Accepts `12.50`, `12,50`, `1.234,50` and an optional `R$` prefix
pub fn parse_price(raw: &str) -> Result<Decimal, RowError> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let normalized = if let Some(comma) = cleaned.rfind(',') {
        // Comma is the decimal separator: one comma, dots only before it
        if cleaned.matches(',').count() > 1 || cleaned[comma..].contains('.') {
            return Err(RowError::InvalidPrice(raw.to_string()));
        }
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };

    match Decimal::from_str(&normalized) {
        Ok(price) if !price.is_sign_negative() => Ok(price),
        _ => Err(RowError::InvalidPrice(raw.to_string())),
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, RowError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .map_err(|_| RowError::InvalidDate(raw.to_string()))
}

fn parse_quantity(raw: &str) -> Result<u32, RowError> {
    match raw.trim().parse::<u32>() {
        Ok(q) if q > 0 => Ok(q),
        _ => Err(RowError::InvalidQuantity(raw.to_string())),
    }
}

fn required(value: String, column: &'static str) -> Result<String, RowError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(RowError::Missing(column));
    }
    Ok(value)
}

impl TryFrom<RawRecord> for ImportRow {
    type Error = RowError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            order: required(raw.order, "order")?,
            client: required(raw.client, "client")?,
            factory: required(raw.factory, "factory")?,
            product: required(raw.product, "product")?,
            date: parse_date(&required(raw.date, "date")?)?,
            quantity: parse_quantity(&required(raw.quantity, "quantity")?)?,
            unit_price: parse_price(&required(raw.unit_price, "unit_price")?)?,
        })
    }
}

// Exports saved from spreadsheets on Windows arrive as Latin-1
fn decode_header(field: &[u8]) -> String {
    match std::str::from_utf8(field) {
        Ok(name) => name.to_string(),
        Err(_) => field.iter().map(|&b| b as char).collect(),
    }
}

/// Read a whole export. Bad records are reported per row; only unreadable
/// input or a header without the required columns fails the call.
pub fn read_rows<R: Read>(input: R, delimiter: u8) -> Result<Vec<ParsedRow>, ImportError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers: StringRecord = reader
        .byte_headers()?
        .iter()
        .map(|h| {
            let name = decode_header(h);
            canonical_column(&name).map(str::to_string).unwrap_or(name)
        })
        .collect();

    let missing: Vec<&'static str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns(missing));
    }

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let result = StringRecord::from_byte_record(record)
            .map_err(|e| RowError::Malformed(e.to_string()))
            .and_then(|record| {
                record
                    .deserialize::<RawRecord>(Some(&headers))
                    .map_err(|e| RowError::Malformed(e.to_string()))
            })
            .and_then(ImportRow::try_from);
        rows.push(ParsedRow { line, result });
    }

    Ok(rows)
}
