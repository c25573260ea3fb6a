mod airports;
pub use airports::WidgetAirports;
