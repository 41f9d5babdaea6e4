// Domain layer: platform records, outbound payloads and the ports the notifier talks through.

pub mod model;
pub mod ports;
