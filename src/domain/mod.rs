// Domain layer: result records, ports, and the arithmetic core. No I/O.

pub mod model;
pub mod ports;
pub mod services;
