//! Data model and request payloads shared between the docfill server and its clients.

pub mod model;
pub mod requests;
