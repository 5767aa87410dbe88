//! Meeting-room reservation service.
//!
//! The library holds the booking domain, its adapters and the OpenAPI
//! document; the `meeting-room` binary wires them into an Actix server.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
