pub mod art;
pub mod color;
pub mod layout;
