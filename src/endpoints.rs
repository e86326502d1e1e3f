//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}', use [format_endpoint].

/// The route for checking that the server is up.
pub const HEALTH: &str = "/api/health";
/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to get, update and delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route for the all-time summary of a user's ledger.
pub const SUMMARY: &str = "/api/summary";
/// The route for the totals of the current calendar month.
pub const MONTH_SUMMARY: &str = "/api/summary/month";

/// Fill the `{...}` parameter of a route such as [TRANSACTION] with `id`.
///
/// Only the first parameter is replaced. A route without a parameter is
/// returned as is, and an unclosed parameter runs to the end of the route.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(open) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };
    let rest = &endpoint_path[open..];
    let close = rest.find('}').map_or(endpoint_path.len(), |offset| open + offset + 1);

    format!("{}{id}{}", &endpoint_path[..open], &endpoint_path[close..])
}
