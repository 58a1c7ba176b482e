use crate::ui::{icon_button, status_label, StyleTokens};
use gtk4::prelude::*;
use gtk4::{
    Align, ApplicationWindow, Box as GtkBox, Button, Label, Orientation, Overlay, Picture,
    PolicyType, ScrolledWindow,
};

const MIN_VIEWPORT_WIDTH: i32 = 1;

#[derive(Clone)]
pub(super) struct ReaderView {
    pub(super) select_button: Button,
    pub(super) prev_button: Button,
    pub(super) next_button: Button,
    pub(super) page_label: Label,
    pub(super) countdown_label: Label,
    pub(super) scroller: ScrolledWindow,
    pub(super) picture: Picture,
    pub(super) placeholder: Label,
    pub(super) toast_label: Label,
}

pub(super) fn build_reader_ui(window: &ApplicationWindow, tokens: StyleTokens) -> ReaderView {
    let control_size = i32::from(tokens.control_size);

    let select_button = Button::with_label("Select PDF");
    select_button.set_focus_on_click(false);
    select_button.add_css_class("select-button");
    select_button.set_tooltip_text(Some("Open a PDF and start a reading session (Ctrl+O)"));

    let prev_button = icon_button("go-previous-symbolic", "Previous page", control_size, &[]);
    let next_button = icon_button("go-next-symbolic", "Next page", control_size, &[]);
    prev_button.set_sensitive(false);
    next_button.set_sensitive(false);

    let page_label = status_label(&page_indicator(None), "page-indicator");
    let countdown_label = status_label("--:--", "countdown");

    let toolbar = GtkBox::new(Orientation::Horizontal, tokens.spacing_8);
    toolbar.add_css_class("reader-toolbar");
    toolbar.append(&select_button);
    let spacer = GtkBox::new(Orientation::Horizontal, 0);
    spacer.set_hexpand(true);
    toolbar.append(&spacer);
    toolbar.append(&prev_button);
    toolbar.append(&page_label);
    toolbar.append(&next_button);
    let trailing_spacer = GtkBox::new(Orientation::Horizontal, 0);
    trailing_spacer.set_hexpand(true);
    toolbar.append(&trailing_spacer);
    toolbar.append(&countdown_label);

    let picture = Picture::new();
    picture.add_css_class("reader-page");
    picture.set_can_shrink(true);
    picture.set_halign(Align::Center);
    picture.set_valign(Align::Start);
    picture.set_visible(false);

    let placeholder = Label::new(Some("Select a PDF to begin a reading session."));
    placeholder.add_css_class("reader-placeholder");
    placeholder.set_halign(Align::Center);
    placeholder.set_valign(Align::Center);
    placeholder.set_vexpand(true);

    let page_column = GtkBox::new(Orientation::Vertical, 0);
    page_column.append(&placeholder);
    page_column.append(&picture);

    let scroller = ScrolledWindow::new();
    scroller.add_css_class("reader-canvas");
    scroller.set_policy(PolicyType::Automatic, PolicyType::Automatic);
    scroller.set_hexpand(true);
    scroller.set_vexpand(true);
    scroller.set_child(Some(&page_column));

    let toast_label = Label::new(None);
    toast_label.add_css_class("reader-toast");
    toast_label.set_halign(Align::Center);
    toast_label.set_valign(Align::End);
    toast_label.set_visible(false);

    let overlay = Overlay::new();
    overlay.set_child(Some(&scroller));
    overlay.add_overlay(&toast_label);

    let root = GtkBox::new(Orientation::Vertical, 0);
    root.append(&toolbar);
    root.append(&overlay);
    window.set_child(Some(&root));

    ReaderView {
        select_button,
        prev_button,
        next_button,
        page_label,
        countdown_label,
        scroller,
        picture,
        placeholder,
        toast_label,
    }
}

/// `Page n / N`, one-based. Without a document it shows dashes.
pub(super) fn page_indicator(position: Option<(u32, u32)>) -> String {
    match position {
        Some((page, total)) if total > 0 => format!("Page {} / {}", page.min(total - 1) + 1, total),
        _ => "Page - / -".to_string(),
    }
}

/// Pixel width to rasterize a page at so it fits the viewport on a display
/// with the given scale factor.
pub(super) fn render_target_width(viewport_width: i32, scale_factor: i32, page_margin: i32) -> u32 {
    let logical = viewport_width
        .saturating_sub(page_margin.saturating_mul(2))
        .max(MIN_VIEWPORT_WIDTH);
    let physical = logical.saturating_mul(scale_factor.max(1));
    u32::try_from(physical).unwrap_or(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PageStep {
    Forward,
    Backward,
}

/// Moves a free-browsing page index one step, staying inside the document.
pub(super) fn step_page(page: u32, total_pages: u32, step: PageStep) -> Option<u32> {
    let last = total_pages.checked_sub(1)?;
    match step {
        PageStep::Forward if page < last => Some(page + 1),
        PageStep::Backward if page > 0 => Some(page.min(last) - 1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_indicator_is_one_based() {
        assert_eq!(page_indicator(Some((0, 12))), "Page 1 / 12");
        assert_eq!(page_indicator(Some((11, 12))), "Page 12 / 12");
        assert_eq!(page_indicator(None), "Page - / -");
        assert_eq!(page_indicator(Some((0, 0))), "Page - / -");
    }

    #[test]
    fn render_target_width_removes_margins_and_applies_scale() {
        assert_eq!(render_target_width(1048, 1, 24), 1000);
        assert_eq!(render_target_width(1048, 2, 24), 2000);
        assert_eq!(render_target_width(10, 1, 24), 1);
        assert_eq!(render_target_width(0, 0, 0), 1);
    }

    #[test]
    fn step_page_stays_within_document() {
        assert_eq!(step_page(0, 3, PageStep::Forward), Some(1));
        assert_eq!(step_page(2, 3, PageStep::Forward), None);
        assert_eq!(step_page(0, 3, PageStep::Backward), None);
        assert_eq!(step_page(2, 3, PageStep::Backward), Some(1));
        assert_eq!(step_page(0, 0, PageStep::Forward), None);
    }
}
