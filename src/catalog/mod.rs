//! Catalog filtering: value normalization, predicate construction, category scopes and
//! facet counting. Everything here is free of I/O; the services run the queries.

pub mod facets;
pub mod predicate;
pub mod scope;
pub mod spec_matcher;

pub use predicate::{ProductFilter, SpecField};
pub use scope::CategoryScope;
pub use spec_matcher::SpecMatcher;
