pub mod csrf;
pub mod json_guard;
pub mod session;
