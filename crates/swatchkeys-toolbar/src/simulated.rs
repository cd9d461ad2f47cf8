//! In-memory drawing toolbar that records every click

use crate::error::ActionError;
use crate::toolbar::DrawToolbar;

/// A click performed on the simulated toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarClick {
    PenButton,
    SelectedPen,
    ColorSwatch(usize),
    PenPreset(usize),
}

/// Simulated toolbar state.
///
/// Clicking the pen button shows the draw panel, clicking the selected pen
/// shows its palette, and picking a swatch or preset hides the palette again.
#[derive(Debug, Clone)]
pub struct SimulatedToolbar {
    panel_visible: bool,
    palette_visible: bool,
    swatch_count: usize,
    pen_count: usize,
    selected_pen: usize,
    selected_color: Option<usize>,
    responsive: bool,
    clicks: Vec<ToolbarClick>,
    alerts: Vec<String>,
}

impl SimulatedToolbar {
    /// Toolbar with 20 swatches and 3 pen presets, panel closed
    pub fn new() -> Self {
        Self::with_layout(20, 3)
    }

    pub fn with_layout(swatch_count: usize, pen_count: usize) -> Self {
        SimulatedToolbar {
            panel_visible: false,
            palette_visible: false,
            swatch_count,
            pen_count,
            selected_pen: 0,
            selected_color: None,
            responsive: true,
            clicks: Vec::new(),
            alerts: Vec::new(),
        }
    }

    /// Toolbar whose menus never open when clicked
    pub fn unresponsive() -> Self {
        SimulatedToolbar {
            responsive: false,
            ..Self::new()
        }
    }

    pub fn clicks(&self) -> &[ToolbarClick] {
        &self.clicks
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn selected_pen(&self) -> usize {
        self.selected_pen
    }

    pub fn selected_color(&self) -> Option<usize> {
        self.selected_color
    }

    pub fn set_panel_visible(&mut self, visible: bool) {
        self.panel_visible = visible;
        if !visible {
            self.palette_visible = false;
        }
    }
}

impl Default for SimulatedToolbar {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawToolbar for SimulatedToolbar {
    fn draw_panel_visible(&self) -> bool {
        self.panel_visible
    }

    fn click_pen_button(&mut self) -> Result<(), ActionError> {
        self.clicks.push(ToolbarClick::PenButton);
        if self.responsive {
            self.panel_visible = true;
        }
        Ok(())
    }

    fn color_palette_visible(&self) -> bool {
        self.palette_visible
    }

    fn click_selected_pen(&mut self) -> Result<(), ActionError> {
        if !self.panel_visible {
            return Err(ActionError::MissingElement("selected pen".to_string()));
        }
        self.clicks.push(ToolbarClick::SelectedPen);
        if self.responsive {
            self.palette_visible = true;
        }
        Ok(())
    }

    fn color_swatch_count(&self) -> usize {
        if self.palette_visible {
            self.swatch_count
        } else {
            0
        }
    }

    fn click_color_swatch(&mut self, index: usize) -> Result<(), ActionError> {
        if !self.palette_visible || index >= self.swatch_count {
            return Err(ActionError::MissingElement(format!("color swatch {}", index)));
        }
        self.clicks.push(ToolbarClick::ColorSwatch(index));
        self.selected_color = Some(index);
        self.palette_visible = false;
        Ok(())
    }

    fn pen_preset_selected(&self, index: usize) -> Option<bool> {
        (self.panel_visible && index < self.pen_count).then_some(index == self.selected_pen)
    }

    fn click_pen_preset(&mut self, index: usize) -> Result<(), ActionError> {
        if !self.panel_visible || index >= self.pen_count {
            return Err(ActionError::MissingElement(format!("pen preset {}", index)));
        }
        self.clicks.push(ToolbarClick::PenPreset(index));
        self.selected_pen = index;
        self.palette_visible = false;
        Ok(())
    }

    fn alert(&mut self, message: &str) {
        tracing::info!("alert: {}", message);
        self.alerts.push(message.to_string());
    }
}
