pub mod reference;
pub mod show;
