//! Drawing toolbar automation
//!
//! [`DrawToolbar`] exposes the handful of element queries and clicks the
//! flows need; the host provides the implementation. [`ToolbarAutomation`]
//! strings them together into the colour and pen selection flows, waiting for
//! menus to appear with a bounded timeout.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::actions::ToolbarAction;
use crate::error::ActionError;

/// Element-level access to the drawing toolbar
pub trait DrawToolbar {
    /// Whether the draw toolbar panel is shown
    fn draw_panel_visible(&self) -> bool;

    /// Click the pen button of the creation bar
    fn click_pen_button(&mut self) -> Result<(), ActionError>;

    /// Whether the colour palette of the selected pen is shown
    fn color_palette_visible(&self) -> bool;

    /// Click the currently selected pen preset
    fn click_selected_pen(&mut self) -> Result<(), ActionError>;

    /// Number of colour swatches in the palette, custom-colour button excluded
    fn color_swatch_count(&self) -> usize;

    fn click_color_swatch(&mut self, index: usize) -> Result<(), ActionError>;

    /// Whether pen preset `index` is selected; `None` if there is no such preset
    fn pen_preset_selected(&self, index: usize) -> Option<bool>;

    fn click_pen_preset(&mut self, index: usize) -> Result<(), ActionError>;

    /// Show a message to the user
    fn alert(&mut self, message: &str);
}

/// Automation timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationConfig {
    /// Longest wait for a menu to appear
    pub wait_timeout_ms: u64,
    /// Delay between element checks while waiting
    pub poll_interval_ms: u64,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        AutomationConfig {
            wait_timeout_ms: 5000,
            poll_interval_ms: 50,
        }
    }
}

/// Runs toolbar actions against a [`DrawToolbar`]
pub struct ToolbarAutomation<T> {
    toolbar: T,
    config: AutomationConfig,
}

impl<T: DrawToolbar> ToolbarAutomation<T> {
    pub fn new(toolbar: T, config: AutomationConfig) -> Self {
        ToolbarAutomation { toolbar, config }
    }

    pub fn toolbar(&self) -> &T {
        &self.toolbar
    }

    pub fn toolbar_mut(&mut self) -> &mut T {
        &mut self.toolbar
    }

    pub fn into_inner(self) -> T {
        self.toolbar
    }

    pub fn config(&self) -> &AutomationConfig {
        &self.config
    }

    /// Run one action to completion
    pub async fn run(&mut self, action: ToolbarAction) -> Result<(), ActionError> {
        match action {
            ToolbarAction::SelectColor(index) => self.select_color(index).await,
            ToolbarAction::SelectPen(index) => self.select_pen(index).await,
        }
    }

    /// Open the pen menu and its colour palette, then pick swatch `index`
    pub async fn select_color(&mut self, index: usize) -> Result<(), ActionError> {
        tracing::debug!(index, "select color");
        self.open_pen_menu().await?;
        tracing::debug!("pen menu opened");
        self.open_selected_pen_color().await?;
        tracing::debug!("color palette opened");
        self.select_nth_color(index)?;
        tracing::debug!(index, "color selected");
        Ok(())
    }

    /// Open the pen menu and select preset `index` unless it already is
    pub async fn select_pen(&mut self, index: usize) -> Result<(), ActionError> {
        self.open_pen_menu().await?;

        match self.toolbar.pen_preset_selected(index) {
            None => Err(ActionError::MissingElement(format!("pen preset {}", index))),
            Some(true) => Ok(()),
            Some(false) => self.toolbar.click_pen_preset(index),
        }
    }

    async fn open_pen_menu(&mut self) -> Result<(), ActionError> {
        if self.toolbar.draw_panel_visible() {
            return Ok(());
        }
        self.toolbar.click_pen_button()?;
        self.wait_for("draw toolbar panel", |toolbar| toolbar.draw_panel_visible())
            .await
    }

    async fn open_selected_pen_color(&mut self) -> Result<(), ActionError> {
        if self.toolbar.color_palette_visible() {
            return Ok(());
        }
        self.toolbar.click_selected_pen()?;
        self.wait_for("color palette", |toolbar| toolbar.color_palette_visible())
            .await
    }

    /// Click swatch `index`, falling back to the first swatch with an alert
    fn select_nth_color(&mut self, index: usize) -> Result<(), ActionError> {
        let count = self.toolbar.color_swatch_count();
        if index < count {
            return self.toolbar.click_color_swatch(index);
        }
        if count == 0 {
            return Err(ActionError::MissingElement("color swatch".to_string()));
        }

        self.toolbar.click_color_swatch(0)?;
        self.toolbar
            .alert(&format!("Color with index {} is not defined.", index));
        Ok(())
    }

    /// Poll `ready` until it holds or the wait timeout elapses
    async fn wait_for<F>(&self, what: &str, ready: F) -> Result<(), ActionError>
    where
        F: Fn(&T) -> bool,
    {
        let interval = Duration::from_millis(self.config.poll_interval_ms.max(1));
        let poll = async {
            while !ready(&self.toolbar) {
                tokio::time::sleep(interval).await;
            }
        };

        tokio::time::timeout(Duration::from_millis(self.config.wait_timeout_ms), poll)
            .await
            .map_err(|_| {
                tracing::warn!(what, "element did not appear in time");
                ActionError::Timeout {
                    what: what.to_string(),
                    waited_ms: self.config.wait_timeout_ms,
                }
            })
    }
}
