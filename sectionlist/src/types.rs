/// A row position inside the list view: section index plus item index within that section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub section: usize,
    pub item: usize,
}

impl Position {
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

/// Where a scroll target ends up inside the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    Auto,
}

/// The kind of view a self-sizing query is made for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellKind {
    Content,
    Header,
    Footer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelfSizingContext {
    pub kind: CellKind,
    /// For supplementary views `item` is always `0`.
    pub position: Position,
}

/// Which axes a cell sizes itself along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelfSizingConfig {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Default for SelfSizingConfig {
    fn default() -> Self {
        Self {
            horizontal: false,
            vertical: true,
        }
    }
}
