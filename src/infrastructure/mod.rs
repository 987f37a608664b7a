pub mod model;
pub mod render;
pub mod telemetry;
pub mod tooling;
