//! Server-side HTML rendering: document shell, shared styles and client
//! scripts, table helpers, and Plotly chart payloads.

pub mod page;
pub mod plotly;
pub mod table;
