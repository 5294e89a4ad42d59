//! Product-scoped order listing page

use crate::data::ProductOrderRow;

use super::{clear_cache_button, escape, layout};

/// Renders the orders containing a given product
pub fn render(product_name: &str, rows: &[ProductOrderRow]) -> String {
    let mut body = String::new();
    body.push_str(clear_cache_button());

    body.push_str(
        "<table><tr><th>Order</th><th>Date</th><th>Status</th>\
         <th>Customer</th><th>Email</th><th>Variant</th><th>Qty</th></tr>",
    );
    for row in rows {
        body.push_str(&format!(
            "<tr><td>#{id}</td><td>{date}</td><td>{status}</td><td>{name}</td><td>{email}</td><td>{variant}</td><td>{qty}</td></tr>",
            id = row.id,
            date = escape(&row.date),
            status = escape(&row.status),
            name = escape(&row.customer.name),
            email = escape(&row.customer.email),
            variant = escape(row.variant.as_deref().unwrap_or("-")),
            qty = row.quantity,
        ));
    }
    body.push_str("</table>");

    if rows.is_empty() {
        body.push_str("<p>No orders found for this product.</p>");
    }

    layout(&format!("Orders for {product_name}"), &body)
}
