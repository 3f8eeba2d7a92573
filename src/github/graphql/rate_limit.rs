use super::graphql_types::ComposedQuery;
use super::selection;

/// Document reading the remaining quota of the calling credential.
pub fn rate_limit_query() -> ComposedQuery {
    ComposedQuery::document(&selection("rateLimit", "limit\nremaining\nused\nresetAt"))
}
