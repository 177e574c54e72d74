use eframe::egui::{self, Color32};

// Color Palette
pub const PRIMARY_BUTTON_BG: Color32 = Color32::from_rgb(76, 154, 255); // Vibrant blue for primary actions
pub const BUTTON_MAIN_TEXT: Color32 = Color32::from_rgb(255, 255, 255);
pub const SECONDARY_TEXT: Color32 = Color32::from_rgb(138, 138, 143); // Medium gray for loading/progress
pub const BORDER_COLOR: Color32 = Color32::from_rgba_premultiplied(60, 60, 67, 15); // Subtle border
pub const PANEL_BG: Color32 = Color32::from_rgb(248, 248, 248);

// Sizing & Spacing
pub const ROUNDING_FRAME: f32 = 4.0;
pub const ROUNDING_BUTTON: f32 = 6.0;
pub const MIN_SIZE_BUTTON: egui::Vec2 = egui::Vec2::new(120.0, 32.0);
pub const THUMBNAIL_HEIGHT: f32 = 220.0;

pub const BUTTON_FONT_SIZE: f32 = 15.0;
