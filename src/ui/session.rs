use crate::ui::lcd::{Geometry, Surface};
use anyhow::Result;

/// Owns the display for the lifetime of the process.
pub struct DisplaySession<S: Surface> {
    surface: S,
    columns: usize,
}

impl<S: Surface> DisplaySession<S> {
    /// Configures a 4x20 panel with the backlight off and homes the cursor.
    pub fn init(mut surface: S) -> Result<Self> {
        let geometry = Geometry::default();
        surface.init(geometry, false)?;
        surface.clear()?;
        surface.home()?;
        Ok(Self {
            surface,
            columns: geometry.columns,
        })
    }

    /// Line 0 goes through the surface's own wrapping. Any other start line
    /// is placed character by character with a hard wrap at the last column.
    pub fn message(&mut self, text: &str, start_line: usize) -> Result<()> {
        if start_line == 0 {
            return self.surface.message(text);
        }

        let mut line = start_line;
        let mut column = 0;
        for c in text.chars() {
            if column >= self.columns {
                line += 1;
                column = 0;
            }
            self.surface.set_cursor_position(line, column)?;
            self.surface.write(c.encode_utf8(&mut [0; 4]))?;
            column += 1;
        }
        Ok(())
    }

    pub fn set_cursor_position(&mut self, line: usize, column: usize) -> Result<()> {
        self.surface.set_cursor_position(line, column)
    }

    pub fn write(&mut self, text: &str) -> Result<()> {
        self.surface.write(text)
    }

    /// Writes `text` at `(line, column)`.
    pub fn write_at(&mut self, line: usize, column: usize, text: &str) -> Result<()> {
        self.set_cursor_position(line, column)?;
        self.write(text)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.surface.clear()
    }

    pub fn home(&mut self) -> Result<()> {
        self.surface.home()
    }

    pub fn release(&mut self) -> Result<()> {
        self.surface.release()
    }

    #[cfg(test)]
    pub fn into_surface(self) -> S {
        self.surface
    }
}
