//! Host UI contract
//!
//! The web UI announces every component it builds together with its element
//! id. Galleries are recognised by a `<tab>_gallery` id and button rows by an
//! `image_buttons_<tab>` id. A row can show up before its gallery; it is then
//! parked until the gallery arrives.

use std::collections::HashMap;
use tracing::{debug, info};

use crate::state::gallery::Tab;

const ROW_ID_PREFIX: &str = "image_buttons_";
const GALLERY_ID_SUFFIX: &str = "_gallery";

/// Paint brush
pub const PAINT_ICON: &str = "\u{1F58C}\u{FE0F}";
pub const PAINT_TOOLTIP: &str = "Save to the export folder and open in the external editor";

/// User-visible notification surface
pub trait Notifier {
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notifier that only logs, for hosts without a toast area
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "paint_tool::notify", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "paint_tool::notify", "{message}");
    }
}

/// Button the host should add to a tab's button row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintButton {
    pub tab: Tab,
    pub elem_id: String,
    pub icon: &'static str,
    pub tooltip: &'static str,
}

impl PaintButton {
    pub fn for_tab(tab: Tab) -> Self {
        Self {
            tab,
            elem_id: format!("{ROW_ID_PREFIX}{tab}_paint_tool"),
            icon: PAINT_ICON,
            tooltip: PAINT_TOOLTIP,
        }
    }
}

/// Component tree operations the extension needs from the host
pub trait HostUi {
    /// Opaque handle to a host component
    type Component: Clone;

    /// Add `button` to `row`. Clicks must call back into the paint handler
    /// with the current contents and selection of `gallery`.
    fn add_paint_button(&mut self, row: &Self::Component, gallery: &Self::Component, button: &PaintButton);
}

/// Tracks galleries and button rows as the host builds its UI
#[derive(Debug)]
pub struct ButtonInjector<C> {
    galleries: HashMap<Tab, C>,
    pending_rows: HashMap<Tab, C>,
}

impl<C> Default for ButtonInjector<C> {
    fn default() -> Self {
        Self {
            galleries: HashMap::new(),
            pending_rows: HashMap::new(),
        }
    }
}

impl<C: Clone> ButtonInjector<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host callback fired after each component is created
    pub fn on_after_component<H>(&mut self, host: &mut H, component: C, elem_id: &str)
    where
        H: HostUi<Component = C>,
    {
        let elem_id = elem_id.trim();

        if let Some(tab) = elem_id.strip_suffix(GALLERY_ID_SUFFIX).and_then(|t| t.parse::<Tab>().ok()) {
            debug!(%tab, "captured gallery");
            self.galleries.insert(tab, component.clone());
            if let Some(row) = self.pending_rows.remove(&tab) {
                self.inject(host, tab, row);
            }
        }

        if let Some(tab) = elem_id.strip_prefix(ROW_ID_PREFIX).and_then(|t| t.parse::<Tab>().ok()) {
            self.inject(host, tab, component);
        }
    }

    fn inject<H>(&mut self, host: &mut H, tab: Tab, row: C)
    where
        H: HostUi<Component = C>,
    {
        let Some(gallery) = self.galleries.get(&tab) else {
            debug!(%tab, "gallery not found yet; row pending");
            self.pending_rows.insert(tab, row);
            return;
        };

        let button = PaintButton::for_tab(tab);
        host.add_paint_button(&row, gallery, &button);
        info!(%tab, elem_id = %button.elem_id, "added paint button");
    }

    /// Tabs whose row is still waiting for a gallery
    pub fn pending_tabs(&self) -> impl Iterator<Item = Tab> + '_ {
        self.pending_rows.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeHost {
        added: Vec<(String, String, PaintButton)>,
    }

    impl HostUi for FakeHost {
        type Component = String;

        fn add_paint_button(&mut self, row: &String, gallery: &String, button: &PaintButton) {
            self.added.push((row.clone(), gallery.clone(), button.clone()));
        }
    }

    #[test]
    fn test_row_after_gallery() {
        let mut host = FakeHost::default();
        let mut injector = ButtonInjector::new();

        injector.on_after_component(&mut host, "g".to_string(), "txt2img_gallery");
        injector.on_after_component(&mut host, "r".to_string(), "image_buttons_txt2img");

        assert_eq!(host.added.len(), 1);
        let (row, gallery, button) = &host.added[0];
        assert_eq!((row.as_str(), gallery.as_str()), ("r", "g"));
        assert_eq!(button.elem_id, "image_buttons_txt2img_paint_tool");
        assert_eq!(button.tab, Tab::Txt2Img);
    }

    #[test]
    fn test_row_before_gallery_is_pending() {
        let mut host = FakeHost::default();
        let mut injector = ButtonInjector::new();

        injector.on_after_component(&mut host, "r".to_string(), "image_buttons_img2img");
        assert!(host.added.is_empty());
        assert_eq!(injector.pending_tabs().collect::<Vec<_>>(), vec![Tab::Img2Img]);

        injector.on_after_component(&mut host, "g".to_string(), "img2img_gallery");
        assert_eq!(host.added.len(), 1);
        assert_eq!(injector.pending_tabs().count(), 0);
    }

    #[test]
    fn test_other_tabs_are_ignored() {
        let mut host = FakeHost::default();
        let mut injector = ButtonInjector::new();

        injector.on_after_component(&mut host, "g".to_string(), "train_gallery");
        injector.on_after_component(&mut host, "r".to_string(), "image_buttons_train");
        injector.on_after_component(&mut host, "x".to_string(), "txt2img_prompt");

        assert!(host.added.is_empty());
        assert_eq!(injector.pending_tabs().count(), 0);
    }

    #[test]
    fn test_one_button_per_tab() {
        let mut host = FakeHost::default();
        let mut injector = ButtonInjector::new();

        for tab in Tab::ALL {
            injector.on_after_component(&mut host, format!("g-{tab}"), &format!("{tab}_gallery"));
            injector.on_after_component(&mut host, format!("r-{tab}"), &format!("image_buttons_{tab}"));
        }

        let tabs: Vec<_> = host.added.iter().map(|(_, _, b)| b.tab).collect();
        assert_eq!(tabs, Tab::ALL);
    }
}
