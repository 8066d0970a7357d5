//! Domain entities - the core business objects.

mod post;
mod tags;
mod user;

pub use post::Post;
pub use tags::parse_tag_names;
pub use user::User;
