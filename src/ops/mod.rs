pub mod clock;
pub mod derive;
pub mod store;
pub mod timer;
