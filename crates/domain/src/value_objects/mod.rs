//! Value objects - Immutable types with validation

mod geo_coordinates;

pub use geo_coordinates::GeoCoordinates;
