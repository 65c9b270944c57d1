pub mod query;
pub mod uuid;

pub use self::query::ValidatedQuery;
pub use self::uuid::{PathParam, ValidatedPath, ValidatedUuid};
