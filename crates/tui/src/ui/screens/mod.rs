pub mod register;
pub mod thank_you;
