pub mod dashboard;
pub mod holding_form;
pub mod landing;
pub mod portfolio_form;
pub mod portfolio_list;
