pub mod dashboard;
pub mod print;
pub mod view;
