//! Command implementations.

mod chat;
mod check;
mod columns;
mod list;
mod upload;

pub use chat::execute_chat;
pub use check::execute_check;
pub use columns::execute_columns;
pub use list::execute_list;
pub use upload::execute_upload;
