/// Compile-time layout tokens; not user-overridable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleTokens {
    pub spacing_4: i32,
    pub spacing_8: i32,
    pub spacing_12: i32,
    pub spacing_16: i32,
    pub control_radius: u16,
    pub control_size: u16,
    pub border_width: u16,
    pub window_default_width: i32,
    pub window_default_height: i32,
    pub page_margin: i32,
    pub motion_hover_ms: u32,
    pub toast_duration_ms: u32,
}

pub const LAYOUT_TOKENS: StyleTokens = StyleTokens {
    spacing_4: 4,
    spacing_8: 8,
    spacing_12: 12,
    spacing_16: 16,
    control_radius: 10,
    control_size: 36,
    border_width: 1,
    window_default_width: 1100,
    window_default_height: 800,
    page_margin: 24,
    motion_hover_ms: 160,
    toast_duration_ms: 2_500,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTokens {
    pub canvas_background: &'static str,
    pub panel_background: &'static str,
    pub border_color: &'static str,
    pub text_color: &'static str,
    pub muted_text_color: &'static str,
    pub accent_color: &'static str,
    pub locked_color: &'static str,
}

pub const READER_COLORS: ColorTokens = ColorTokens {
    canvas_background: "#1e1f22",
    panel_background: "#2b2d31",
    border_color: "rgba(255, 255, 255, 0.08)",
    text_color: "#e6e6e6",
    muted_text_color: "#9a9ca3",
    accent_color: "#7aa2f7",
    locked_color: "#e0af68",
};

#[cfg(test)]
mod tests {
    use super::LAYOUT_TOKENS;

    #[test]
    fn layout_tokens_keep_required_control_size() {
        assert_eq!(LAYOUT_TOKENS.control_size, 36);
    }

    #[test]
    fn default_window_fits_a_portrait_page() {
        let tokens = LAYOUT_TOKENS;
        assert!(tokens.window_default_height > tokens.page_margin * 2);
        assert!(tokens.window_default_width > tokens.page_margin * 2);
    }
}
