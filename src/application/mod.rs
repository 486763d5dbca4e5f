pub mod controller;
pub mod dispatch;
pub mod filter;
pub mod pages;
pub mod session;
