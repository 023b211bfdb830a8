// Domain layer: catalog and intake records plus the storage port.

pub mod model;
pub mod ports;
