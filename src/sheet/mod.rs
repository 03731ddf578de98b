pub mod compositor;
pub mod layout;
pub mod metadata;
pub mod tiles;
