pub mod relink;
pub mod validate;
