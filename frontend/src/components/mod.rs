pub mod chat;
pub mod header;
pub mod landing;
pub mod sidebar;
