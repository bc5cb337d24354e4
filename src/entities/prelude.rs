pub use super::countries::Entity as Countries;
pub use super::externals::Entity as Externals;
pub use super::genres::Entity as Genres;
pub use super::networks::Entity as Networks;
pub use super::ratings::Entity as Ratings;
pub use super::show_genres::Entity as ShowGenres;
pub use super::shows::Entity as Shows;
