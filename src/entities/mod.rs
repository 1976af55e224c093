pub mod cache;
pub mod review;
