pub mod client;
pub mod error;
pub mod graphql;

pub use client::{GitHubClient, GraphQLTransport};
pub use error::TransportError;
pub use graphql::graphql_types;
