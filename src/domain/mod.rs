// Domain layer: input record, feature matrix and the ports the artifacts plug into.

pub mod model;
pub mod ports;
