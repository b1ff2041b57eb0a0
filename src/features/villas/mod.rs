//! Villa management.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/villas` | List villas |
//! | GET | `/api/villas/{id}` | Get one villa |
//! | POST | `/api/villas` | Create villa |
//! | PUT | `/api/villas/{id}` | Replace villa |
//! | PATCH | `/api/villas/{id}` | JSON Patch villa |
//! | DELETE | `/api/villas/{id}` | Delete villa |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod patch;
pub mod repository;
pub mod routes;
pub mod services;


pub use services::VillaService;
