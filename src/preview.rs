use opencv::highgui;
use opencv::prelude::*;

pub const PREVIEW_WINDOW_TITLE: &str = "Face Capture (Grayscale Preview)";

/// Live view of the capture plus the only channel for stopping it early.
pub trait PreviewSurface {
    fn show(&mut self, frame: &Mat) -> anyhow::Result<()>;

    /// Waits up to one millisecond for a key press. `None` if no key came in.
    fn poll_key(&mut self) -> anyhow::Result<Option<char>>;

    /// Tears the surface down. Must be safe to call more than once.
    fn close(&mut self) -> anyhow::Result<()>;
}

pub struct PreviewWindow {
    name: String,
    open: bool,
}

impl PreviewWindow {
    pub fn new(name: &str) -> anyhow::Result<Self> {
        highgui::named_window_def(name)?;
        Ok(Self {
            name: name.to_owned(),
            open: true,
        })
    }
}

impl PreviewSurface for PreviewWindow {
    fn show(&mut self, frame: &Mat) -> anyhow::Result<()> {
        highgui::imshow(&self.name, frame)?;
        Ok(())
    }

    fn poll_key(&mut self) -> anyhow::Result<Option<char>> {
        let key = highgui::wait_key(1)?;
        if key < 0 {
            return Ok(None);
        }
        Ok(Some(char::from((key & 0xFF) as u8)))
    }

    fn close(&mut self) -> anyhow::Result<()> {
        if self.open {
            self.open = false;
            highgui::destroy_window(&self.name)?;
        }
        Ok(())
    }
}

/// Preview for runs without a display. Never sees a key press.
#[derive(Debug, Default)]
pub struct HeadlessPreview;

impl PreviewSurface for HeadlessPreview {
    fn show(&mut self, _frame: &Mat) -> anyhow::Result<()> {
        Ok(())
    }

    fn poll_key(&mut self) -> anyhow::Result<Option<char>> {
        Ok(None)
    }

    fn close(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}
