pub mod blend;
pub mod text;
pub mod thumbnail;
