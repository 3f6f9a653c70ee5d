pub mod checkout;
pub mod clients;
pub mod config;
pub mod coupon;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod pricing;
pub mod response;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
