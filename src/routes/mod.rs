pub mod parser;
pub mod table;

pub use parser::{
    active_concrete_route, active_raw_path, active_route, normalize_route, page_number,
    parse_segments, raw_path, route_for, ConcreteRoute, NormalizedRoute, Segments,
};
pub use table::{KnownRoute, RouteTable};
