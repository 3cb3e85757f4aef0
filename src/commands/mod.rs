pub mod frequencies;
pub mod update;

pub use frequencies::handle_frequencies;
pub use update::handle_update;
