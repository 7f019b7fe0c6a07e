use common::Rgb;
use ratatui::style::{Color, Modifier, Style};

#[derive(Clone, Copy, Debug)]
pub struct RenderConfig {
    pub chars_per_point: CharDimensions,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            chars_per_point: CharDimensions::new(2, 1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharDimensions {
    pub horizontal: usize,
    pub vertical: usize,
}

impl CharDimensions {
    pub fn new(horizontal: usize, vertical: usize) -> Self {
        Self { horizontal, vertical }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StyledChar {
    pub ch: char,
    pub fg: Option<Rgb>,
    pub bold: bool,
}

impl StyledChar {
    pub const BLANK: StyledChar = StyledChar {
        ch: ' ',
        fg: None,
        bold: false,
    };

    pub fn style(&self) -> Style {
        let mut style = Style::default();
        if let Some(Rgb(r, g, b)) = self.fg {
            style = style.fg(Color::Rgb(r, g, b));
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        style
    }
}

pub struct CharGrid {
    grid: Vec<Vec<StyledChar>>,
    logical_width: usize,
    logical_height: usize,
    char_dims: CharDimensions,
}

impl CharGrid {
    pub fn new(logical_width: usize, logical_height: usize, char_dims: CharDimensions) -> Self {
        let physical_width = logical_width * char_dims.horizontal;
        let physical_height = logical_height * char_dims.vertical;
        let grid = vec![vec![StyledChar::BLANK; physical_width]; physical_height];
        Self {
            grid,
            logical_width,
            logical_height,
            char_dims,
        }
    }

    /// Writes `pattern` at logical cell (x, y). Negative or out-of-range cells are skipped.
    pub fn set_logical_point(&mut self, x: i32, y: i32, pattern: &CharPattern) {
        if x < 0 || y < 0 || x as usize >= self.logical_width || y as usize >= self.logical_height {
            return;
        }
        let start_x = x as usize * self.char_dims.horizontal;
        let start_y = y as usize * self.char_dims.vertical;

        for (dy, row) in pattern.chars.iter().enumerate() {
            for (dx, &ch) in row.iter().enumerate() {
                if let Some(grid_row) = self.grid.get_mut(start_y + dy) {
                    if let Some(cell) = grid_row.get_mut(start_x + dx) {
                        *cell = StyledChar {
                            ch,
                            fg: pattern.color,
                            bold: pattern.bold,
                        };
                    }
                }
            }
        }
    }

    pub fn get(&self, column: usize, row: usize) -> Option<&StyledChar> {
        self.grid.get(row).and_then(|line| line.get(column))
    }

    pub fn into_lines(self) -> Vec<Vec<char>> {
        self.grid
            .into_iter()
            .map(|row| row.into_iter().map(|cell| cell.ch).collect())
            .collect()
    }

    pub fn into_styled_lines(self) -> Vec<(Vec<char>, Vec<Style>)> {
        self.grid
            .into_iter()
            .map(|row| {
                let chars = row.iter().map(|cell| cell.ch).collect();
                let styles = row.iter().map(StyledChar::style).collect();
                (chars, styles)
            })
            .collect()
    }

    pub fn physical_width(&self) -> usize {
        self.logical_width * self.char_dims.horizontal
    }

    pub fn physical_height(&self) -> usize {
        self.logical_height * self.char_dims.vertical
    }
}

#[derive(Clone, Debug)]
pub struct CharPattern {
    pub chars: Vec<Vec<char>>,
    pub color: Option<Rgb>,
    pub bold: bool,
}

impl CharPattern {
    pub fn new(chars: Vec<Vec<char>>) -> Self {
        Self {
            chars,
            color: None,
            bold: false,
        }
    }

    pub fn single(ch: char, dims: CharDimensions) -> Self {
        Self::new(vec![vec![ch; dims.horizontal]; dims.vertical])
    }

    pub fn colored(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}
