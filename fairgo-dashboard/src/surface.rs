//! Rendering/navigation surface seam
//!
//! The dashboard layout is owned elsewhere; the dispatcher only asks whether a
//! section is currently mounted and asks the surface to bring it into view.

use crate::dictionary::Section;
use std::collections::HashSet;

pub trait NavigationSurface {
    fn contains(&self, section_id: &str) -> bool;
    fn bring_into_view(&mut self, section_id: &str);
}

/// Terminal front-end surface: a fixed set of mounted sections
#[derive(Debug, Clone)]
pub struct TerminalSurface {
    mounted: HashSet<String>,
    focused: Option<String>,
}

impl TerminalSurface {
    pub fn new<I, S>(sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mounted: sections.into_iter().map(Into::into).collect(),
            focused: None,
        }
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }
}

impl NavigationSurface for TerminalSurface {
    fn contains(&self, section_id: &str) -> bool {
        self.mounted.contains(section_id)
    }

    fn bring_into_view(&mut self, section_id: &str) {
        let title = Section::from_id(section_id).map(Section::title).unwrap_or(section_id);
        println!("──── {} ────", title);
        self.focused = Some(section_id.to_string());
    }
}

#[cfg(test)]
impl NavigationSurface for fairgo_devkit::MockSurface {
    fn contains(&self, section_id: &str) -> bool {
        fairgo_devkit::MockSurface::contains(self, section_id)
    }

    fn bring_into_view(&mut self, section_id: &str) {
        fairgo_devkit::MockSurface::bring_into_view(self, section_id);
    }
}
