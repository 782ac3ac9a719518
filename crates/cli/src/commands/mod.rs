pub mod layout;
pub mod make;
