//! Popover inputs: transient values typed into a panel before a command runs.
//!
//! Each popover owns its input. Several may be open at once; none of them
//! touches the document until confirmed.

use serde::Serialize;
use smol_str::SmolStr;

/// Colors offered by the text color popover.
pub const PALETTE: [&str; 10] = [
    "#000000", "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF", "#FFA500",
    "#800080", "#008000",
];

/// Input held by a popover while it is open.
pub trait PendingInput: Default {
    /// True when every required field is filled in.
    fn is_complete(&self) -> bool;
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImageInput {
    pub url: String,
}

impl PendingInput for ImageInput {
    fn is_complete(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LinkInput {
    pub url: String,
    /// Text to insert. Empty links the current selection instead.
    pub text: String,
}

impl PendingInput for LinkInput {
    fn is_complete(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VideoInput {
    pub url: String,
}

impl PendingInput for VideoInput {
    fn is_complete(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ColorInput {
    pub color: SmolStr,
}

impl Default for ColorInput {
    fn default() -> Self {
        Self {
            color: SmolStr::new_static(PALETTE[0]),
        }
    }
}

impl PendingInput for ColorInput {
    fn is_complete(&self) -> bool {
        !self.color.is_empty()
    }
}

/// An input panel anchored to a toolbar button.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Popover<I> {
    open: bool,
    input: I,
}

impl<I: PendingInput> Popover<I> {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open if closed, close if open. Input survives toggling.
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Close and discard the input.
    pub fn dismiss(&mut self) {
        self.open = false;
        self.input = I::default();
    }

    /// Hand out the input if it is complete, clearing and closing the popover.
    ///
    /// An incomplete input stays where it is.
    pub fn take(&mut self) -> Option<I> {
        if !self.input.is_complete() {
            return None;
        }
        self.open = false;
        Some(std::mem::take(&mut self.input))
    }
}
