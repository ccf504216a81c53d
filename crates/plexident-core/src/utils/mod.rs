pub mod username;

pub use username::generate_username;
