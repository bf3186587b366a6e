pub mod alignment;
pub mod io;
pub mod params;
pub mod scorer;
pub mod scorers;
pub mod transform;
