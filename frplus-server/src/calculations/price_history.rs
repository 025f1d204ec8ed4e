// Per-client price history

use crate::types::{Order, OrderId, PriceHistory, ProductId};
use std::cmp::Reverse;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    #[error("line item for product {product_id} in order {order_id} has no unit price")]
    MissingUnitPrice {
        order_id: OrderId,
        product_id: ProductId,
    },
}

/// Most recent unit price paid for every product in a client's orders.
///
/// Orders are visited newest first (by `issued_at`), items in their stored
/// sequence, and the first price seen for a product wins. Orders sharing a
/// timestamp keep their input order, so feed them `issued_at DESC, id ASC`
/// for a deterministic result.
///
/// Returns an error as soon as a visited item carries no unit price.
pub fn latest_prices(orders: &[Order]) -> Result<PriceHistory, PricingError> {
    let mut newest_first: Vec<&Order> = orders.iter().collect();
    // sort_by_key is stable
    newest_first.sort_by_key(|order| Reverse(order.issued_at));

    let mut prices = PriceHistory::new();
    for order in newest_first {
        for item in &order.items {
            let price = item.unit_price.ok_or(PricingError::MissingUnitPrice {
                order_id: order.id,
                product_id: item.product_id,
            })?;
            prices.entry(item.product_id).or_insert(price);
        }
    }

    Ok(prices)
}
