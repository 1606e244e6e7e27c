//! Scheduled departures consumed for presentation

pub mod model;
pub mod repository;

pub use model::Departure;
pub use repository::DeparturesService;
