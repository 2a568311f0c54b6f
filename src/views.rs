//! Page views and their mount/unmount lifecycle

use crate::channel::Channel;
use crate::config::{RoomKind, SessionConfig};
use crate::dom::Surface;
use crate::game::ClientResult;
use crate::session::GameSession;

/// A page that can be mounted into the host document and torn down again
pub trait View {
    fn name(&self) -> &'static str;

    fn mount(&mut self) -> ClientResult<()>;

    /// Must release everything `mount` installed
    fn unmount(&mut self);
}

/// Shared shell every page gets
#[derive(Debug, Default)]
pub struct MainView {
    mounted: bool,
}

impl MainView {
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
}

impl View for MainView {
    fn name(&self) -> &'static str {
        "MainView"
    }

    fn mount(&mut self) -> ClientResult<()> {
        tracing::debug!("MainView mounted");
        self.mounted = true;
        Ok(())
    }

    fn unmount(&mut self) {
        tracing::debug!("MainView unmounted");
        self.mounted = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Main,
    RoomShow,
    PrivateRoomShow,
    RoomIndex,
}

impl ViewKind {
    /// Page bootstraps name their view; anything unrecognized gets the shell
    pub fn from_name(name: &str) -> Self {
        match name {
            "RoomShowView" => ViewKind::RoomShow,
            "PrivateRoomShowView" => ViewKind::PrivateRoomShow,
            "RoomIndexView" => ViewKind::RoomIndex,
            _ => ViewKind::Main,
        }
    }

    fn view_name(self) -> &'static str {
        match self {
            ViewKind::Main => "MainView",
            ViewKind::RoomShow => "RoomShowView",
            ViewKind::PrivateRoomShow => "PrivateRoomShowView",
            ViewKind::RoomIndex => "RoomIndexView",
        }
    }

    fn room_kind(self) -> Option<RoomKind> {
        match self {
            ViewKind::Main => None,
            ViewKind::RoomShow => Some(RoomKind::Public),
            ViewKind::PrivateRoomShow => Some(RoomKind::Private),
            ViewKind::RoomIndex => Some(RoomKind::Lobby),
        }
    }
}

/// A room page: the shell plus a game session
pub struct SessionView<S: Surface, C: Channel> {
    kind: ViewKind,
    main: MainView,
    session: GameSession<S, C>,
}

impl<S: Surface, C: Channel> SessionView<S, C> {
    pub fn new(kind: ViewKind, session: GameSession<S, C>) -> Self {
        Self {
            kind,
            main: MainView::default(),
            session,
        }
    }

    pub fn session(&self) -> &GameSession<S, C> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession<S, C> {
        &mut self.session
    }
}

impl<S: Surface, C: Channel> View for SessionView<S, C> {
    fn name(&self) -> &'static str {
        self.kind.view_name()
    }

    fn mount(&mut self) -> ClientResult<()> {
        self.main.mount()?;
        self.session.mount()
    }

    fn unmount(&mut self) {
        self.session.unmount();
        self.main.unmount();
    }
}

/// Picks the view for a page. Room views get a session whose channel is
/// built from the resulting topic by `connect`.
pub fn load_view<S, C>(
    name: &str,
    config: SessionConfig,
    surface: S,
    connect: impl FnOnce(&str) -> C,
) -> Box<dyn View>
where
    S: Surface + 'static,
    C: Channel + 'static,
{
    let kind = ViewKind::from_name(name);
    match kind.room_kind() {
        None => Box::new(MainView::default()),
        Some(room_kind) => {
            let config = config.with_kind(room_kind);
            let channel = connect(&config.topic());
            Box::new(SessionView::new(kind, GameSession::new(config, surface, channel)))
        }
    }
}
