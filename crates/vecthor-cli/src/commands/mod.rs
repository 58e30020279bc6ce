pub mod analysis;
pub mod assess;
