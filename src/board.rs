//! Board representation and group bookkeeping.
//!
//! The board is a flat `Vec<Option<Color>>` indexed row-major from the top-left
//! corner. Groups are never stored: [`Board::group_of`] flood-fills them on
//! demand over 4-adjacency, keyed by coordinates.

use std::fmt;
use std::str::FromStr;

use crate::constants::{COLUMN_LETTERS, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::error::GoError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opposite(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Single-character board glyph.
    pub fn glyph(self) -> char {
        match self {
            Color::Black => 'X',
            Color::White => 'O',
        }
    }

    pub fn letter(self) -> &'static str {
        match self {
            Color::Black => "B",
            Color::White => "W",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "Black"),
            Color::White => write!(f, "White"),
        }
    }
}

impl FromStr for Color {
    type Err = GoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Ok(Color::Black),
            "w" | "white" => Ok(Color::White),
            _ => Err(GoError::InvalidColor(s.to_string())),
        }
    }
}

/// An intersection. `x` is the column from the left, `y` the row from the top.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Point { x, y }
    }

    /// Parse a GTP vertex such as `"D4"` for a board of the given size.
    ///
    /// Columns use the letters A-Z without I; row 1 is the bottom edge.
    pub fn from_vertex(s: &str, size: usize) -> Result<Point, GoError> {
        let invalid = || GoError::InvalidCoordinate(s.to_string());
        let bytes = s.trim().as_bytes();
        if bytes.len() < 2 {
            return Err(invalid());
        }

        let col_char = bytes[0].to_ascii_uppercase();
        let x = COLUMN_LETTERS
            .iter()
            .position(|&c| c == col_char)
            .ok_or_else(invalid)?;

        let digits = &bytes[1..];
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }
        let row: usize = std::str::from_utf8(digits)
            .ok()
            .and_then(|r| r.parse().ok())
            .ok_or_else(invalid)?;

        if x >= size || row == 0 || row > size {
            return Err(invalid());
        }
        Ok(Point::new(x, size - row))
    }

    /// Format as a GTP vertex for a board of the given size.
    pub fn to_vertex(self, size: usize) -> String {
        let col = COLUMN_LETTERS.get(self.x).map_or('?', |&c| c as char);
        format!("{col}{}", size.saturating_sub(self.y))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A maximal connected set of same-colored stones and its liberties.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub color: Color,
    pub stones: Vec<Point>,
    pub liberties: Vec<Point>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.stones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stones.is_empty()
    }

    pub fn liberty_count(&self) -> usize {
        self.liberties.len()
    }

    pub fn in_atari(&self) -> bool {
        self.liberties.len() == 1
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Color>>,
}

impl Board {
    pub fn new(size: usize) -> Result<Self, GoError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(GoError::InvalidBoardSize(size));
        }
        Ok(Self {
            size,
            cells: vec![None; size * size],
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn idx(&self, p: Point) -> usize {
        p.y * self.size + p.x
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x < self.size && p.y < self.size
    }

    /// Color at `p`, or `None` for an empty or off-board point.
    pub fn get(&self, p: Point) -> Option<Color> {
        if !self.contains(p) {
            return None;
        }
        self.cells[self.idx(p)]
    }

    pub fn is_empty_at(&self, p: Point) -> bool {
        self.contains(p) && self.cells[self.idx(p)].is_none()
    }

    /// True when no stone is on the board.
    pub fn is_clear(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// All points in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.size).flat_map(move |y| (0..self.size).map(move |x| Point::new(x, y)))
    }

    pub fn stone_count(&self, color: Color) -> usize {
        self.cells.iter().filter(|&&c| c == Some(color)).count()
    }

    /// Orthogonal neighbors that lie on the board.
    pub fn neighbors(&self, p: Point) -> impl Iterator<Item = Point> + use<> {
        let s = self.size;
        let mut v = [None; 4];
        if p.x > 0 {
            v[0] = Some(Point::new(p.x - 1, p.y));
        }
        if p.x + 1 < s {
            v[1] = Some(Point::new(p.x + 1, p.y));
        }
        if p.y > 0 {
            v[2] = Some(Point::new(p.x, p.y - 1));
        }
        if p.y + 1 < s {
            v[3] = Some(Point::new(p.x, p.y + 1));
        }
        v.into_iter().flatten()
    }

    /// Diagonal neighbors that lie on the board, plus how many fell off the edge.
    fn diagonal_neighbors(&self, p: Point) -> (Vec<Point>, usize) {
        let mut on = Vec::with_capacity(4);
        let mut off = 0;
        for (dx, dy) in [(-1isize, -1isize), (1, -1), (1, 1), (-1, 1)] {
            let nx = p.x as isize + dx;
            let ny = p.y as isize + dy;
            if nx < 0 || ny < 0 || nx >= self.size as isize || ny >= self.size as isize {
                off += 1;
            } else {
                on.push(Point::new(nx as usize, ny as usize));
            }
        }
        (on, off)
    }

    /// Put a stone on an empty point.
    pub fn place_stone(&mut self, p: Point, color: Color) -> Result<(), GoError> {
        if !self.contains(p) {
            return Err(GoError::off_board(p, self.size));
        }
        let i = self.idx(p);
        if self.cells[i].is_some() {
            return Err(GoError::OccupiedCell(p));
        }
        self.cells[i] = Some(color);
        Ok(())
    }

    /// Set every stone of `group` back to empty.
    pub fn remove_group(&mut self, group: &Group) {
        for &p in &group.stones {
            let i = self.idx(p);
            self.cells[i] = None;
        }
    }

    /// Flood-fill the group containing `p`. Returns `None` for an empty point.
    pub fn group_of(&self, p: Point) -> Option<Group> {
        let color = self.get(p)?;
        let mut visited = vec![false; self.cells.len()];
        let mut liberty_seen = vec![false; self.cells.len()];
        let mut stones = Vec::new();
        let mut liberties = Vec::new();
        let mut stack = vec![p];

        while let Some(cur) = stack.pop() {
            let i = self.idx(cur);
            if visited[i] {
                continue;
            }
            visited[i] = true;
            stones.push(cur);
            for n in self.neighbors(cur) {
                let ni = self.idx(n);
                match self.cells[ni] {
                    None => {
                        if !liberty_seen[ni] {
                            liberty_seen[ni] = true;
                            liberties.push(n);
                        }
                    }
                    Some(c) if c == color && !visited[ni] => stack.push(n),
                    _ => {}
                }
            }
        }

        Some(Group {
            color,
            stones,
            liberties,
        })
    }

    /// Every group on the board, each reported once.
    pub fn groups(&self) -> Vec<Group> {
        let mut seen = vec![false; self.cells.len()];
        let mut out = Vec::new();
        for p in self.points() {
            if seen[self.idx(p)] {
                continue;
            }
            if let Some(group) = self.group_of(p) {
                for &s in &group.stones {
                    seen[self.idx(s)] = true;
                }
                out.push(group);
            }
        }
        out
    }

    /// Color of the stones surrounding an empty point, if they are all one color.
    ///
    /// May be true for false eyes.
    pub fn is_eyeish(&self, p: Point) -> Option<Color> {
        if !self.is_empty_at(p) {
            return None;
        }
        let mut eye_color = None;
        for n in self.neighbors(p) {
            let c = self.get(n)?;
            match eye_color {
                None => eye_color = Some(c),
                Some(e) if e != c => return None,
                _ => {}
            }
        }
        eye_color
    }

    /// Color owning `p` as a true eye.
    ///
    /// An eyeish point is a true eye when at most one diagonal holds an
    /// opponent stone, or none when the point touches the edge.
    pub fn is_eye(&self, p: Point) -> Option<Color> {
        let eye_color = self.is_eyeish(p)?;
        let (diagonals, off_board) = self.diagonal_neighbors(p);
        let false_count = diagonals
            .into_iter()
            .filter(|&d| self.get(d) == Some(eye_color.opposite()))
            .count();
        let tolerance = if off_board > 0 { 0 } else { 1 };
        if false_count > tolerance {
            return None;
        }
        Some(eye_color)
    }

    /// Chebyshev distance from `p` to the nearest stone, capped at `limit + 1`.
    pub fn distance_to_stones(&self, p: Point, limit: usize) -> usize {
        for d in 1..=limit {
            let x0 = p.x.saturating_sub(d);
            let y0 = p.y.saturating_sub(d);
            let x1 = (p.x + d).min(self.size - 1);
            let y1 = (p.y + d).min(self.size - 1);
            for y in y0..=y1 {
                for x in x0..=x1 {
                    if self.cells[y * self.size + x].is_some() {
                        return d;
                    }
                }
            }
        }
        limit + 1
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for x in 0..self.size {
            write!(f, "{} ", COLUMN_LETTERS[x] as char)?;
        }
        writeln!(f)?;
        for y in 0..self.size {
            write!(f, "{:>2} ", self.size - y)?;
            for x in 0..self.size {
                let ch = match self.get(Point::new(x, y)) {
                    Some(c) => c.glyph(),
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
