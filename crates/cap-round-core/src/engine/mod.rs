pub mod distribution;
pub mod esop;
pub mod input;
pub mod normalize;
pub mod outcome;
pub mod pro_rata;
pub mod safe;
pub mod scenario;
