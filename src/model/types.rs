//! Core type definitions for the presentation layer

/// Which screen the presentation layer is showing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Home,
    Media,
    Profile,
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Screen::Home => "Home",
            Screen::Media => "Media",
            Screen::Profile => "Profile",
        }
    }
}
