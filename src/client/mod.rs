//! Client library: everything a submission form or dashboard process
//! needs to talk to the alert backend.

pub mod feed;
pub mod form;
pub mod http;
pub mod router;
pub mod session;

pub use feed::FeedSubscription;
pub use form::AlertForm;
pub use http::{BackendClient, ClientError};
pub use router::{AppRouter, Route, RouteDecision};
pub use session::{Session, SessionStore};
