use crate::rows::ParsedRow;
use std::collections::BTreeSet;
use std::io::{self, Write};

#[derive(Debug, Default, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub clients: usize,
    pub factories: usize,
    pub products: usize,
    pub orders: usize,
}

impl Summary {
    pub fn from_rows(rows: &[ParsedRow]) -> Self {
        let mut clients = BTreeSet::new();
        let mut factories = BTreeSet::new();
        let mut products = BTreeSet::new();
        let mut orders = BTreeSet::new();
        let mut valid = 0;

        for row in rows.iter().filter_map(|r| r.result.as_ref().ok()) {
            valid += 1;
            clients.insert(row.client.as_str());
            factories.insert(row.factory.as_str());
            // Product names are only unique per factory
            products.insert((row.factory.as_str(), row.product.as_str()));
            orders.insert(row.order.as_str());
        }

        Self {
            total: rows.len(),
            valid,
            invalid: rows.len() - valid,
            clients: clients.len(),
            factories: factories.len(),
            products: products.len(),
            orders: orders.len(),
        }
    }
}

/// Print parsed rows (up to `limit`), every invalid row, then the summary
pub fn write_report<W: Write>(out: &mut W, rows: &[ParsedRow], limit: Option<usize>) -> io::Result<()> {
    let limit = limit.unwrap_or(usize::MAX);

    for parsed in rows.iter().filter(|r| r.result.is_ok()).take(limit) {
        if let Ok(row) = &parsed.result {
            writeln!(
                out,
                "line {:>5} | order {} | {} | {} / {} | {} | qty {} | {}",
                parsed.line,
                row.order,
                row.client,
                row.factory,
                row.product,
                row.date,
                row.quantity,
                row.unit_price,
            )?;
        }
    }

    for parsed in rows {
        if let Err(e) = &parsed.result {
            writeln!(out, "line {:>5} | INVALID: {}", parsed.line, e)?;
        }
    }

    let summary = Summary::from_rows(rows);
    writeln!(out)?;
    writeln!(out, "rows:      {}", summary.total)?;
    writeln!(out, "valid:     {}", summary.valid)?;
    writeln!(out, "invalid:   {}", summary.invalid)?;
    writeln!(out, "clients:   {}", summary.clients)?;
    writeln!(out, "factories: {}", summary.factories)?;
    writeln!(out, "products:  {}", summary.products)?;
    writeln!(out, "orders:    {}", summary.orders)?;

    Ok(())
}
