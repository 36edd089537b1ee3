#[cfg(test)]
#[allow(dead_code)]
pub mod contract;
pub use contract::*;

#[cfg(test)]
#[allow(dead_code)]
pub mod gateway;
pub use gateway::*;

#[cfg(test)]
#[allow(dead_code)]
pub mod test_data;
pub use test_data::*;

#[cfg(test)]
#[allow(dead_code)]
pub mod simulate_world_state;
pub use simulate_world_state::*;
