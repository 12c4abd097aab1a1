pub mod store;
pub mod types;

pub use store::{ChatStore, SqliteChatStore, StorageError};
pub use types::{ChatRecord, NewChatRecord};

/// Longest accepted question, in characters, after trimming.
pub const MAX_QUESTION_CHARS: usize = 5000;
