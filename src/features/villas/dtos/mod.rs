pub mod villa_dto;

pub use villa_dto::{CreateVillaDto, UpdateVillaDto, VillaDto};
