pub mod layout;
pub mod panel;
