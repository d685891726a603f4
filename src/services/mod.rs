pub mod gateway;
pub mod heygen;
pub mod pagination;
pub mod poller;
