pub mod browse;
pub mod detail;
pub mod edit_setting;
pub mod help;
pub mod login;
pub mod playlist;
pub mod search;
pub mod settings;

pub use browse::BrowseView;
pub use detail::DetailView;
pub use edit_setting::EditSettingView;
pub use help::HelpView;
pub use login::LoginView;
pub use playlist::PlaylistView;
pub use search::SearchView;
pub use settings::SettingsView;
