pub mod holding;
pub mod notification;
pub mod portfolio;
pub mod session;
