mod flights;
pub use flights::Flights;
