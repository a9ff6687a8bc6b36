//! Typed clients for the APIs under test.
//!
//! Clients only build [`RequestSpec`](probe_domain::request::RequestSpec)s;
//! sending them is the job of the use cases.

mod jsonplaceholder;
mod reqres;
mod session;

pub use jsonplaceholder::JsonPlaceholderApi;
pub use reqres::ReqResApi;
pub use session::{ApiSession, Sessions};
