pub mod backend;
pub mod error;
pub mod http;
pub mod providers;
pub mod reference;
pub mod sdk;
pub mod types;
