use crate::ui::lcd::{Geometry, Surface};
use anyhow::Result;

/// Character buffer and cursor of an HD44780-style display.
#[derive(Debug, Clone)]
pub struct LcdState {
    geometry: Geometry,
    backlight: bool,
    cells: Vec<Vec<char>>,
    cursor: (usize, usize),
}

impl Default for LcdState {
    fn default() -> Self {
        Self::new(Geometry::default())
    }
}

impl LcdState {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            backlight: false,
            cells: vec![vec![' '; geometry.columns]; geometry.lines],
            cursor: (0, 0),
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn backlight(&self) -> bool {
        self.backlight
    }

    pub fn line(&self, index: usize) -> String {
        self.cells
            .get(index)
            .map(|row| row.iter().collect())
            .unwrap_or_default()
    }

    pub fn lines(&self) -> Vec<String> {
        (0..self.geometry.lines).map(|i| self.line(i)).collect()
    }

    /// Places one character and advances the cursor. Positions outside the
    /// visible area are dropped.
    fn put(&mut self, c: char) {
        let (line, column) = self.cursor;
        if let Some(cell) = self.cells.get_mut(line).and_then(|row| row.get_mut(column)) {
            *cell = c;
        }
        self.cursor = (line, column + 1);
    }
}

impl Surface for LcdState {
    fn init(&mut self, geometry: Geometry, backlight: bool) -> Result<()> {
        *self = LcdState::new(geometry);
        self.backlight = backlight;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        for row in &mut self.cells {
            row.fill(' ');
        }
        Ok(())
    }

    fn home(&mut self) -> Result<()> {
        self.cursor = (0, 0);
        Ok(())
    }

    fn set_cursor_position(&mut self, line: usize, column: usize) -> Result<()> {
        self.cursor = (line, column);
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<()> {
        for c in text.chars() {
            self.put(c);
        }
        Ok(())
    }

    fn message(&mut self, text: &str) -> Result<()> {
        self.clear()?;
        self.home()?;
        for c in text.chars() {
            let (line, column) = self.cursor;
            if c == '\n' {
                self.cursor = (line + 1, 0);
                continue;
            }
            if column >= self.geometry.columns {
                self.cursor = (line + 1, 0);
            }
            if self.cursor.0 >= self.geometry.lines {
                break;
            }
            self.put(c);
        }
        Ok(())
    }
}
