//! Routable pages. The app has exactly one.

pub mod home;

pub use home::HomePage;
