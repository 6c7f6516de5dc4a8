//! Product form tab selection. Purely presentational: switching tabs never
//! touches the draft.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    #[default]
    Basic,
    Images,
    Sizes,
    Pricing,
}

impl Tab {
    /// Display order.
    pub const ALL: [Tab; 4] = [Tab::Basic, Tab::Images, Tab::Sizes, Tab::Pricing];

    pub fn id(self) -> &'static str {
        match self {
            Tab::Basic => "basic",
            Tab::Images => "images",
            Tab::Sizes => "sizes",
            Tab::Pricing => "pricing",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Basic => "Basic information",
            Tab::Images => "Images",
            Tab::Sizes => "Sizes",
            Tab::Pricing => "Pricing & availability",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Tab {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|t| t.id() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown tab '{s}'")))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TabController {
    active: Tab,
}

impl TabController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn select(&mut self, tab: Tab) {
        if self.active != tab {
            tracing::trace!(from = %self.active, to = %tab, "Switching product form tab");
            self.active = tab;
        }
    }

    pub fn is_visible(&self, tab: Tab) -> bool {
        self.active == tab
    }
}
