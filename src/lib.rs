pub mod auth;
pub mod helper;
pub mod keymap;
pub mod keysym;
pub mod layout;
pub mod render;
pub mod symmap;
