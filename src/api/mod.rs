//! HTTP API for publishing TXT record responses.
//!
//! # API Endpoints
//!
//! ## `/set-txt` (POST)
//!
//!   Expects a JSON request body of the form:
//!
//!   ```json
//!   { "host": "_acme-challenge.example.com", "value": "XXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXX" }
//!   ```
//!
//!  Where `host` is the name a `TXT` query will be answered for. It is lowercased and made fully
//!  qualified before it is stored. Publishing for a host that already has a value replaces it.
//!
//!  For successful updates, returns HTTP 200 (OK) and a JSON response body of the form:
//!
//!  ```json
//!  { "host": "_acme-challenge.example.com.", "value": "XXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXX" }
//!  ```
//!
//!  The body is parsed as JSON whatever `Content-Type` the request carries.
//!
//!  Returns HTTP 400 (Bad Request) if the body isn't valid JSON or `host` is missing or empty,
//!  and HTTP 405 (Method Not Allowed) for any method other than `POST`.
//!
//! Any other path returns HTTP 404 (Not Found).

mod api_error;
mod model;
mod routes;
pub mod server;

pub use server::{new, ApiServer};
