pub mod resolve;
pub mod status;
pub mod terms;
