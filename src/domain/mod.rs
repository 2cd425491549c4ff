// Domain layer: feed models, data model and ports (interfaces).

pub mod feed;
pub mod model;
pub mod ports;
