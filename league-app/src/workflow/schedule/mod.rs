pub mod create;
pub mod delete;
pub mod preview;
pub mod session;
pub mod validate;
