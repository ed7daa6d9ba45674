pub mod ambient;
pub mod unicode;
