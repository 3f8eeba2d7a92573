/// Composer configuration loaded from TOML files and environment overrides
pub mod config;

/// GitHub transport, GraphQL fragment library and per-level query composers
pub mod github;

/// Scope validation and the response normalizer that executes composed queries
pub mod services;

/// Core type definitions: scope catalog, requests, credentials and result envelopes
pub mod types;
