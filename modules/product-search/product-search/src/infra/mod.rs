pub mod keys;
pub mod upstream;
