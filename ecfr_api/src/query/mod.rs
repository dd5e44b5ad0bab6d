pub(crate) mod common;
pub use self::common::Query;

mod content;
pub use self::content::ContentQuery;

mod search;
pub use self::search::SearchQuery;
