mod coordinate;
pub use coordinate::Coordinate;

mod endpoint;
pub use endpoint::Endpoint;

mod flight;
pub use flight::FlightSnapshot;

mod bounds;
pub use bounds::Bounds;
