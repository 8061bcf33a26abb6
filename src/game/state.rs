use super::direction::Direction;

/// A cell coordinate on the game grid, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighboring cell one step in the given direction
    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The snake body: ordered segments, head at index 0, never empty
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    segments: Vec<Position>,
}

impl Snake {
    /// Build a contiguous snake of `length` segments with the head at `head`,
    /// extending opposite to `heading`
    pub fn new(head: Position, heading: Direction, length: usize) -> Self {
        let (dx, dy) = heading.delta();
        let segments = (0..length.max(1) as i32)
            .map(|i| Position::new(head.x - dx * i, head.y - dy * i))
            .collect();
        Self { segments }
    }

    pub fn head(&self) -> Position {
        self.segments[0]
    }

    pub fn segments(&self) -> &[Position] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether any segment (head included) sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.segments.contains(&pos)
    }

    /// Advance the head to `new_head`; the tail stays put when growing and is
    /// popped otherwise, keeping the length unchanged
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.segments.insert(0, new_head);
        if !grow {
            self.segments.pop();
        }
    }
}

/// What the snake ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    /// Left the grid
    Wall,
    /// Hit its own body
    Body,
}
