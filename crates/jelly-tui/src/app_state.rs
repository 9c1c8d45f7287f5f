//! AppState: the single source of truth for a running session.
//!
//! Controllers read settings and the session through a [`Context`] but never
//! mutate them. The App event-loop is the only thing that writes to AppState.

use jelly_proto::{AppError, Session, Settings};

use crate::controller::{Context, Controller};
use crate::message::ViewTag;
use crate::views::{
    BrowseView, DetailView, EditSettingView, HelpView, LoginView, PlaylistView, SearchView,
    SettingsView,
};

/// One controller per view. All persist across navigations except the
/// setting editor, which exists only while a setting is being edited.
pub struct Views {
    pub login: LoginView,
    pub browse: BrowseView,
    pub detail: DetailView,
    pub search: SearchView,
    pub playlist: PlaylistView,
    pub settings: SettingsView,
    pub edit_setting: Option<EditSettingView>,
    pub help: HelpView,
}

impl Views {
    pub fn new(settings: &Settings) -> Self {
        Self {
            login: LoginView::new(settings),
            browse: BrowseView::new(settings),
            detail: DetailView::default(),
            search: SearchView::default(),
            playlist: PlaylistView::default(),
            settings: SettingsView::default(),
            edit_setting: None,
            help: HelpView,
        }
    }

    pub fn get(&self, tag: ViewTag) -> Option<&dyn Controller> {
        match tag {
            ViewTag::Login => Some(&self.login),
            ViewTag::Browse => Some(&self.browse),
            ViewTag::Detail => Some(&self.detail),
            ViewTag::Search => Some(&self.search),
            ViewTag::Playlist => Some(&self.playlist),
            ViewTag::Settings => Some(&self.settings),
            ViewTag::EditSetting => self.edit_setting.as_ref().map(|v| v as &dyn Controller),
            ViewTag::Help => Some(&self.help),
        }
    }

    pub fn get_mut(&mut self, tag: ViewTag) -> Option<&mut dyn Controller> {
        match tag {
            ViewTag::Login => Some(&mut self.login),
            ViewTag::Browse => Some(&mut self.browse),
            ViewTag::Detail => Some(&mut self.detail),
            ViewTag::Search => Some(&mut self.search),
            ViewTag::Playlist => Some(&mut self.playlist),
            ViewTag::Settings => Some(&mut self.settings),
            ViewTag::EditSetting => self
                .edit_setting
                .as_mut()
                .map(|v| v as &mut dyn Controller),
            ViewTag::Help => Some(&mut self.help),
        }
    }
}

pub struct AppState {
    pub active_view: ViewTag,
    /// When set, rendered in place of the active view until a key dismisses it.
    pub last_error: Option<AppError>,
    pub settings: Settings,
    /// Written once, when login succeeds.
    pub session: Option<Session>,
    pub views: Views,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let views = Views::new(&settings);
        Self {
            active_view: ViewTag::Login,
            last_error: None,
            settings,
            session: None,
            views,
        }
    }

    pub fn context(&self) -> Context<'_> {
        Context {
            settings: &self.settings,
            session: self.session.as_ref(),
        }
    }

    /// Mutable controllers alongside the read-only context they step with.
    pub fn split(&mut self) -> (&mut Views, Context<'_>) {
        (
            &mut self.views,
            Context {
                settings: &self.settings,
                session: self.session.as_ref(),
            },
        )
    }

    pub fn active(&self) -> Option<&dyn Controller> {
        self.views.get(self.active_view)
    }
}
