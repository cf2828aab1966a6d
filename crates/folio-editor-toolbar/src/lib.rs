//! Toolbar for the folio editor.
//!
//! Renders nothing itself. [`Toolbar::controls`] describes the buttons for
//! the editor's current state; hosts draw them and route presses back
//! through [`Toolbar::press`] and the popover confirm methods.

pub mod dispatch;
pub mod popover;
pub mod state;

pub use dispatch::{Control, PopoverKind, Toolbar, ToolbarAction, ToolbarGroup};
pub use popover::{
    ColorInput, ImageInput, LinkInput, PALETTE, PendingInput, Popover, VideoInput,
};
pub use state::ToolbarState;
