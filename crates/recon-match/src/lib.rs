pub mod catalog;
pub mod detect;
pub mod index;
pub mod matcher;

pub use catalog::DictionaryCatalog;
pub use detect::{ColumnRoles, column_hints, detect_columns};
pub use index::MatcherIndex;
pub use matcher::{EntityMatcher, MIN_TOKEN_LEN, MatcherOptions};
