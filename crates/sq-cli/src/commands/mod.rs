pub mod audit;
pub mod dispatch;
pub mod housekeeper;
pub mod issues;
pub mod loc;
pub mod projects;
pub mod task;
