pub mod classify;
pub mod employee;
pub mod error;
pub mod import;
pub mod summarize_month;
pub mod time_of_day;
