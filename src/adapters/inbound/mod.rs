mod location_screen;

pub use location_screen::LocationScreen;
