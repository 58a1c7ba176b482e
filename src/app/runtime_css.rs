use crate::ui::{ColorTokens, StyleTokens};
use gtk4::CssProvider;

fn reader_css(tokens: StyleTokens, colors: &ColorTokens) -> String {
    format!(
        "
window.pagelock-root {{
  background: {canvas_background};
  color: {text_color};
}}
.pagelock-root label {{
  color: {text_color};
}}
.reader-toolbar {{
  background: {panel_background};
  border-bottom: {border_width}px solid {border_color};
  padding: {spacing_8}px {spacing_12}px;
}}
.reader-toolbar button {{
  border-radius: {control_radius}px;
  min-height: {control_size}px;
  padding: 0 {spacing_12}px;
  transition: background {motion_hover_ms}ms ease-out;
}}
.reader-toolbar button:disabled {{
  opacity: 0.4;
}}
.status-label {{
  font-feature-settings: \"tnum\";
  padding: 0 {spacing_8}px;
}}
.page-indicator {{
  color: {muted_text_color};
}}
.countdown {{
  font-weight: 700;
}}
.countdown.locked {{
  color: {locked_color};
}}
.countdown.finished {{
  color: {accent_color};
}}
.reader-canvas {{
  background: {canvas_background};
}}
.reader-page {{
  margin: {page_margin}px;
  box-shadow: 0 4px 24px rgba(0, 0, 0, 0.35);
}}
.reader-placeholder {{
  color: {muted_text_color};
  font-size: 1.2em;
}}
.reader-toast {{
  background: {panel_background};
  border: {border_width}px solid {border_color};
  border-radius: {control_radius}px;
  padding: {spacing_8}px {spacing_16}px;
  margin-bottom: {spacing_16}px;
}}
.reader-toast.locked {{
  border-color: {locked_color};
  color: {locked_color};
}}
",
        canvas_background = colors.canvas_background,
        panel_background = colors.panel_background,
        border_color = colors.border_color,
        text_color = colors.text_color,
        muted_text_color = colors.muted_text_color,
        accent_color = colors.accent_color,
        locked_color = colors.locked_color,
        border_width = tokens.border_width,
        spacing_8 = tokens.spacing_8,
        spacing_12 = tokens.spacing_12,
        spacing_16 = tokens.spacing_16,
        control_radius = tokens.control_radius,
        control_size = tokens.control_size,
        motion_hover_ms = tokens.motion_hover_ms,
        page_margin = tokens.page_margin,
    )
}

pub(super) fn install_runtime_css(tokens: StyleTokens, colors: &ColorTokens) {
    let Some(display) = gtk4::gdk::Display::default() else {
        tracing::warn!("no display available; skipping runtime css");
        return;
    };

    let provider = CssProvider::new();
    provider.load_from_data(&reader_css(tokens, colors));
    gtk4::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{LAYOUT_TOKENS, READER_COLORS};

    #[test]
    fn reader_css_substitutes_tokens() {
        let css = reader_css(LAYOUT_TOKENS, &READER_COLORS);
        assert!(css.contains("background: #1e1f22;"));
        assert!(css.contains("min-height: 36px;"));
        assert!(css.contains(".countdown.locked {\n  color: #e0af68;"));
        assert_eq!(css.matches('{').count(), css.matches('}').count());
    }
}
