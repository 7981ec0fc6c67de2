mod schema;
mod models;

pub use schema::{Database, parse_database_url};
pub use models::{Contact, NewContact};
