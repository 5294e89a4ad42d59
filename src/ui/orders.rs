//! Orders listing page, shared by `/orders` and `/processing_orders`

use crate::data::EnrichedOrder;

use super::{clear_cache_button, escape, last_updated_line, layout};

/// Renders the orders table
///
/// `show_all_orders_link` adds the back-link the processing-orders view
/// carries to the unfiltered listing.
pub fn render(
    title: &str,
    orders: &[EnrichedOrder],
    last_updated: Option<&str>,
    show_all_orders_link: bool,
) -> String {
    let mut body = String::new();
    body.push_str(clear_cache_button());
    body.push_str(&last_updated_line(last_updated));
    if show_all_orders_link {
        body.push_str(r#"<p><a href="/orders">Show All Orders</a></p>"#);
    }

    body.push_str(
        "<table><tr><th>Order</th><th>Date</th><th>Status</th>\
         <th>Customer</th><th>Email</th><th>Items</th></tr>",
    );
    for order in orders {
        body.push_str(&format!(
            "<tr><td>#{id}</td><td>{date}</td><td>{status}</td><td>{name}</td><td>{email}</td><td>{items}</td></tr>",
            id = order.id,
            date = escape(&order.date_created),
            status = escape(&order.status),
            name = escape(&order.customer.name),
            email = escape(&order.customer.email),
            items = items_cell(order),
        ));
    }
    body.push_str("</table>");

    if orders.is_empty() {
        body.push_str("<p>No orders found.</p>");
    }

    layout(title, &body)
}

fn items_cell(order: &EnrichedOrder) -> String {
    let mut cell = String::new();
    for item in &order.line_items {
        let name = match &item.product {
            Some(product) => product.name.as_str(),
            None => item.name.as_str(),
        };
        cell.push_str(&format!("{} &times; {}", item.quantity, escape(name)));
        if let Some(variant) = &item.variant {
            let description = variant.description();
            if !description.is_empty() {
                cell.push_str(&format!(" ({})", escape(&description)));
            }
        }
        cell.push_str("<br>");
    }
    cell
}
