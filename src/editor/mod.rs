//! Editor-side controller for the image block panel.
//!
//! The host editor is reached only through [`EditorDocument`]; the relay only
//! through [`RelayClient`].

pub mod document;
pub mod panel;
pub mod relay_client;

pub use document::{Block, BlockId, BlockList, DocumentError, EditorDocument, NewBlock};
pub use panel::{Activation, ImageBlockPanel, PanelError, PanelState};
pub use relay_client::{HttpRelayClient, RelayClient, RelayError, RelayReply};
