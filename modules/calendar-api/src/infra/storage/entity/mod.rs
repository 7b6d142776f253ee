pub mod calendar;
pub mod calendar_image;
pub mod event;
pub mod image;
pub mod user;
