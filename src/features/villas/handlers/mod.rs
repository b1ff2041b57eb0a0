pub mod villa_handler;

pub use villa_handler::*;
