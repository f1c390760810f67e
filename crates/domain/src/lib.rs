mod collection;
mod events;
mod models;
pub mod protocol;
mod sort;

pub use collection::{CommentSet, Transition};
pub use events::CommentChange;
pub use models::{Author, Comment, PostId, Profile, SortMode};
pub use sort::sort;
