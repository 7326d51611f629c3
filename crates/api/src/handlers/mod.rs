pub mod documents;
pub mod versions;
