#![forbid(unsafe_code)]

//! Slide-out mega-menu state.
//!
//! The menu is owned by the app and changed only through [`MenuMsg`]. The
//! map reaches it the same way: "add initiative" on a panel sends
//! `MenuMsg::OpenPage(MenuPage::AddInitiative)`.

use tracing::debug;

/// Menu pages in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MenuPage {
    #[default]
    Menu,
    AboutMap,
    Initiatives,
    AddInitiative,
    Contact,
}

impl MenuPage {
    pub const ALL: [MenuPage; 5] = [
        Self::Menu,
        Self::AboutMap,
        Self::Initiatives,
        Self::AddInitiative,
        Self::Contact,
    ];

    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id)).copied()
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Menu => "Meny",
            Self::AboutMap => "Om kartan",
            Self::Initiatives => "Alla initiativ",
            Self::AddInitiative => "Lägg till initiativ",
            Self::Contact => "Kontakt",
        }
    }

    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Menu => "/",
            Self::AboutMap => "/om-kartan",
            Self::Initiatives => "/initiativ",
            Self::AddInitiative => "/initiativ/ny",
            Self::Contact => "/kontakt",
        }
    }

    /// The form page shows its right column on narrow screens too.
    #[inline]
    pub const fn has_form(self) -> bool {
        matches!(self, Self::AddInitiative)
    }
}

/// Menu transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuMsg {
    Open,
    Close,
    /// Hamburger button: flip visibility and return to the first page.
    Toggle,
    SetPage(MenuPage),
    OpenPage(MenuPage),
}

/// One breadcrumb link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crumb {
    pub label: &'static str,
    /// Highlighted as the current location.
    pub current: bool,
    /// `None` closes the menu; `Some` navigates to the page.
    pub target: Option<MenuPage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuState {
    is_open: bool,
    page: MenuPage,
}

impl MenuState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    #[inline]
    pub fn page(&self) -> MenuPage {
        self.page
    }

    pub fn update(&mut self, msg: MenuMsg) {
        match msg {
            MenuMsg::Open => self.is_open = true,
            MenuMsg::Close => self.is_open = false,
            MenuMsg::Toggle => {
                self.is_open = !self.is_open;
                self.page = MenuPage::Menu;
            }
            MenuMsg::SetPage(page) => self.page = page,
            MenuMsg::OpenPage(page) => self.open_page(page),
        }
        debug!(target: "kartan.app", open = self.is_open, page = self.page.slug(), "menu");
    }

    pub fn open_page(&mut self, page: MenuPage) {
        self.is_open = true;
        self.page = page;
    }

    /// `Kartan › Meny`, plus the current page when it is not the menu.
    #[must_use]
    pub fn breadcrumbs(&self) -> Vec<Crumb> {
        let mut crumbs = vec![
            Crumb {
                label: "Kartan",
                current: false,
                target: None,
            },
            Crumb {
                label: MenuPage::Menu.title(),
                current: self.page == MenuPage::Menu,
                target: Some(MenuPage::Menu),
            },
        ];
        if self.page != MenuPage::Menu {
            crumbs.push(Crumb {
                label: self.page.title(),
                current: true,
                target: Some(self.page),
            });
        }
        crumbs
    }
}
