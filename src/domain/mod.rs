// Domain layer: the delegate capability and the launch result. No I/O here.

pub mod model;
pub mod ports;
