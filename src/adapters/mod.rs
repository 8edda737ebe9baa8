// Adapters layer: concrete implementations for external systems.
// http: USPTO ODP API client; web: axum server rendering the search page.

pub mod http;
pub mod web;
