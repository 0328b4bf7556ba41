pub mod configuration;
pub mod routes;
pub mod session;
pub mod startup;
pub mod telemetry;
