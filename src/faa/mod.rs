//! Parsers for the FAA NASR subscription (airports, towers) and the Digital
//! Obstacle File.

pub mod airports;
pub mod classify;
pub mod frequencies;
pub mod obstacles;
pub mod schema;

pub use airports::{Facility, FacilityMap, NO_FREQUENCY, decode_airport_line};
pub use classify::{RecordKind, classify_nasr_line, classify_obstacle_line, currency_date};
pub use frequencies::{FrequencyMatcher, FrequencyRules, apply_tower_line};
pub use obstacles::{DEFAULT_MIN_AGL_FT, Obstacle, ObstacleDecoder};
pub use schema::{AirportSchema, ObstacleSchema, Schemas, TowerSchema};
