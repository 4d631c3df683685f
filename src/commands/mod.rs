pub mod actions;
pub mod check;
pub mod init;
pub mod list;
pub mod render;
pub mod show;
