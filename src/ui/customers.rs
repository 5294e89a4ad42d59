//! Customers listing page

use crate::data::Customer;

use super::{clear_cache_button, escape, layout};

/// Renders the customers table
pub fn render(customers: &[Customer]) -> String {
    let mut body = String::new();
    body.push_str(clear_cache_button());

    body.push_str("<table><tr><th>ID</th><th>Name</th><th>Email</th></tr>");
    for customer in customers {
        let name = format!("{} {}", customer.first_name, customer.last_name);
        body.push_str(&format!(
            "<tr><td>{id}</td><td>{name}</td><td>{email}</td></tr>",
            id = customer.id,
            name = escape(name.trim()),
            email = escape(&customer.email),
        ));
    }
    body.push_str("</table>");

    if customers.is_empty() {
        body.push_str("<p>No customers found.</p>");
    }

    layout("Customers", &body)
}
