//! [`DataLoader`](super::DataLoader) implementations.

mod path;

pub use path::{load_from_path, PathLoader};
