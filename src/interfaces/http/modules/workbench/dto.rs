use serde::Deserialize;
use utoipa::IntoParams;

use crate::application::workbench::Viewport;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ViewportParams {
    /// Pixels scrolled from the top of the table
    pub scroll_offset: Option<u64>,
    /// Visible table height in pixels
    pub viewport_height: Option<u64>,
}

impl ViewportParams {
    pub fn viewport(&self) -> Viewport {
        let defaults = Viewport::default();
        Viewport {
            scroll_offset: self.scroll_offset.unwrap_or(defaults.scroll_offset),
            height: self.viewport_height.unwrap_or(defaults.height),
        }
    }
}
