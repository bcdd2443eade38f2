pub mod concepts;
pub mod engine;
pub mod feedback;
pub mod framework;
pub mod util;
