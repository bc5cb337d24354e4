mod list;
mod show;
mod sync;

pub use list::cmd_list_shows;
pub use show::cmd_show_info;
pub use sync::cmd_sync;
