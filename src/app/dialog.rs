use crate::ui::StyleTokens;
use gtk4::prelude::*;
use gtk4::{
    ApplicationWindow, Box as GtkBox, Dialog, FileChooserAction, FileChooserNative, FileFilter,
    Label, Orientation, ResponseType,
};
use std::path::PathBuf;

pub(super) fn show_error_dialog(
    parent: &ApplicationWindow,
    title: &str,
    message: &str,
    style_tokens: StyleTokens,
) {
    let dialog = Dialog::new();
    dialog.add_css_class("pagelock-root");
    dialog.set_title(Some(title));
    dialog.set_transient_for(Some(parent));
    dialog.set_modal(true);
    dialog.set_destroy_with_parent(true);
    dialog.add_button("OK", ResponseType::Accept);
    dialog.set_default_response(ResponseType::Accept);

    let body = Label::new(Some(message));
    body.set_wrap(true);
    body.set_max_width_chars(48);
    body.set_xalign(0.5);
    body.set_justify(gtk4::Justification::Center);

    let dialog_content = GtkBox::new(Orientation::Vertical, 0);
    dialog_content.set_margin_top(style_tokens.spacing_12);
    dialog_content.set_margin_bottom(style_tokens.spacing_12);
    dialog_content.set_margin_start(style_tokens.spacing_12);
    dialog_content.set_margin_end(style_tokens.spacing_12);
    dialog_content.append(&body);
    dialog.content_area().append(&dialog_content);

    dialog.connect_response(|dialog, _| dialog.close());
    dialog.present();
}

fn pdf_filter() -> FileFilter {
    let filter = FileFilter::new();
    filter.set_name(Some("PDF documents"));
    filter.add_mime_type("application/pdf");
    filter.add_pattern("*.pdf");
    filter.add_pattern("*.PDF");
    filter
}

/// Opens a native PDF picker and hands the chosen path to `on_selected`.
/// The chooser is returned so the caller can keep it alive until it responds.
pub(super) fn choose_pdf<F>(parent: &ApplicationWindow, on_selected: F) -> FileChooserNative
where
    F: Fn(PathBuf) + 'static,
{
    let chooser = FileChooserNative::new(
        Some("Select PDF"),
        Some(parent),
        FileChooserAction::Open,
        Some("Open"),
        Some("Cancel"),
    );
    chooser.set_modal(true);
    let filter = pdf_filter();
    chooser.add_filter(&filter);
    chooser.set_filter(&filter);

    chooser.connect_response(move |chooser, response| {
        if response == ResponseType::Accept {
            match chooser.file().and_then(|file| file.path()) {
                Some(path) => on_selected(path),
                None => tracing::warn!("file chooser returned no local path"),
            }
        } else {
            tracing::debug!(?response, "pdf selection canceled");
        }
        chooser.destroy();
    });
    chooser.show();
    chooser
}
