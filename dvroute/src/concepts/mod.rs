pub mod link;
pub mod route;
pub mod table;
pub mod topology;
