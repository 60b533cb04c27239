// Domain layer: value model and the preference store port.

pub mod model;
pub mod ports;
