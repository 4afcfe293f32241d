pub mod archive;
pub mod embed;
