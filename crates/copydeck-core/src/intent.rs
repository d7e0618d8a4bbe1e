//! Pointer events to editing intents
//!
//! The page layer captures what was under the pointer at event time (fragment
//! id, displayed text, coordinates, modifiers) and hands it over as an
//! immutable [`PageEvent`]. [`interpret`] turns it into the intent the stores
//! act on, so no store ever inspects the page itself.

use crate::comment::PagePoint;

/// Modifier keys held during a click
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Control key
    pub ctrl: bool,
    /// Meta / Command key
    pub meta: bool,
    /// Shift key
    pub shift: bool,
    /// Alt / Option key
    pub alt: bool,
}

impl Modifiers {
    /// Control held
    #[must_use]
    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::default()
        }
    }

    /// Meta held
    #[must_use]
    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Self::default()
        }
    }

    /// Secondary accelerator held (Ctrl or Cmd)
    #[inline]
    #[must_use]
    pub fn is_accelerator(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Scrollable document size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentSize {
    /// Scroll width
    pub width: f64,
    /// Scroll height
    pub height: f64,
}

/// Page-pixel anchor for floating surfaces
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Anchor {
    /// Page X
    pub x: f64,
    /// Page Y
    pub y: f64,
}

impl Anchor {
    /// Create anchor
    #[inline]
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pointer event as captured by the page
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// Context menu requested on an editable fragment
    ContextMenu {
        /// Fragment identifier
        fragment_id: String,
        /// Text on screen at event time
        displayed_text: String,
        /// Page coordinates of the pointer
        anchor: Anchor,
    },
    /// Primary click anywhere in the document
    Click {
        /// Page coordinates of the pointer
        anchor: Anchor,
        /// Held modifiers
        modifiers: Modifiers,
        /// Document size at event time
        document: DocumentSize,
    },
    /// Pointer pressed; `inside_editor` tells whether it hit the edit menu
    PointerDown {
        /// Whether the target lies inside the open edit menu
        inside_editor: bool,
    },
}

/// What the stores should do in response to an event
#[derive(Debug, Clone, PartialEq)]
pub enum PageIntent {
    /// Open the edit menu for a fragment
    OpenEditor {
        /// Fragment identifier
        fragment_id: String,
        /// Text on screen when the menu opened
        displayed_text: String,
        /// Where to place the menu
        anchor: Anchor,
    },
    /// Open the comment placement prompt
    PlaceComment(PagePoint),
    /// Close the edit menu
    DismissEditor,
    /// Nothing to do
    Ignore,
}

/// Map a captured event to its intent
#[must_use]
pub fn interpret(event: PageEvent) -> PageIntent {
    match event {
        PageEvent::ContextMenu {
            fragment_id,
            displayed_text,
            anchor,
        } => PageIntent::OpenEditor {
            fragment_id,
            displayed_text,
            anchor,
        },
        PageEvent::Click {
            anchor,
            modifiers,
            document,
        } if modifiers.is_accelerator() => {
            PagePoint::from_click(anchor.x, anchor.y, document.width, document.height)
                .map_or(PageIntent::Ignore, PageIntent::PlaceComment)
        }
        PageEvent::Click { .. } => PageIntent::Ignore,
        PageEvent::PointerDown { inside_editor } => {
            if inside_editor {
                PageIntent::Ignore
            } else {
                PageIntent::DismissEditor
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(modifiers: Modifiers) -> PageEvent {
        PageEvent::Click {
            anchor: Anchor::new(250.0, 400.0),
            modifiers,
            document: DocumentSize {
                width: 1000.0,
                height: 800.0,
            },
        }
    }

    #[test]
    fn context_menu_opens_editor_with_captured_text() {
        let intent = interpret(PageEvent::ContextMenu {
            fragment_id: "hero_title".into(),
            displayed_text: "A".into(),
            anchor: Anchor::new(5.0, 6.0),
        });
        assert_eq!(
            intent,
            PageIntent::OpenEditor {
                fragment_id: "hero_title".into(),
                displayed_text: "A".into(),
                anchor: Anchor::new(5.0, 6.0),
            }
        );
    }

    #[test]
    fn ctrl_and_meta_clicks_place_comments() {
        let expected = PageIntent::PlaceComment(PagePoint { x: 25.0, y: 50.0 });
        assert_eq!(interpret(click(Modifiers::ctrl())), expected);
        assert_eq!(interpret(click(Modifiers::meta())), expected);
    }

    #[test]
    fn plain_click_is_ignored() {
        assert_eq!(interpret(click(Modifiers::default())), PageIntent::Ignore);
    }

    #[test]
    fn shift_click_is_ignored() {
        let modifiers = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        assert_eq!(interpret(click(modifiers)), PageIntent::Ignore);
    }

    #[test]
    fn zero_sized_document_is_ignored() {
        let event = PageEvent::Click {
            anchor: Anchor::new(1.0, 1.0),
            modifiers: Modifiers::ctrl(),
            document: DocumentSize {
                width: 0.0,
                height: 0.0,
            },
        };
        assert_eq!(interpret(event), PageIntent::Ignore);
    }

    #[test]
    fn pointer_down_outside_dismisses() {
        assert_eq!(
            interpret(PageEvent::PointerDown {
                inside_editor: false
            }),
            PageIntent::DismissEditor
        );
        assert_eq!(
            interpret(PageEvent::PointerDown {
                inside_editor: true
            }),
            PageIntent::Ignore
        );
    }
}
