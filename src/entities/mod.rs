pub mod prelude;

pub mod countries;
pub mod externals;
pub mod genres;
pub mod networks;
pub mod ratings;
pub mod show_genres;
pub mod shows;
