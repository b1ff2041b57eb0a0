mod villa;

pub use villa::{NewVilla, Villa};
