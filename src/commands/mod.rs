//! CLI command implementations.

pub mod categories;
pub mod detail;
pub mod list;

pub use categories::CategoriesCommand;
pub use detail::DetailCommand;
pub use list::{ListCommand, ListScope};
