use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, warn};

use crate::editor::document::{BlockId, DocumentError, EditorDocument, NewBlock};
use crate::editor::relay_client::{RelayClient, RelayError};
use crate::models::process::{ImageId, ProcessRequest};

/// What the panel shows for one image block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelState {
    pub is_processing: bool,
    pub has_processed_image: bool,
    pub title_options: Vec<String>,
    pub show_title_modal: bool,
    /// Legend block inserted by the last successful run.
    pub legend_block: Option<BlockId>,
    pub last_error: Option<String>,
}

/// Result of the panel's primary button.
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    Processed,
    TitlesReopened,
}

#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("Image is already being processed")]
    AlreadyProcessing,

    #[error("Image data is missing.")]
    MissingImageData,

    #[error("No titles have been generated for this image yet")]
    NoTitles,

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Agent Photo panel attached to one image block.
///
/// Each panel allows one request in flight at a time. Panels of different
/// blocks are independent of each other.
pub struct ImageBlockPanel<R> {
    block: BlockId,
    relay: R,
    state: Mutex<PanelState>,
}

/// What a successful run changed in the document.
struct Applied {
    titles: Vec<String>,
    legend_block: BlockId,
}

/// Clears `is_processing` however the request ends.
struct InFlight<'a>(&'a Mutex<PanelState>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.0).is_processing = false;
    }
}

fn lock(state: &Mutex<PanelState>) -> MutexGuard<'_, PanelState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<R: RelayClient> ImageBlockPanel<R> {
    pub fn new(block: BlockId, relay: R) -> Self {
        Self {
            block,
            relay,
            state: Mutex::new(PanelState::default()),
        }
    }

    pub fn block(&self) -> &BlockId {
        &self.block
    }

    pub fn state(&self) -> PanelState {
        lock(&self.state).clone()
    }

    /// Primary button: reopen the title chooser once titles exist, process
    /// the image otherwise.
    pub async fn activate<D: EditorDocument>(
        &self,
        document: &AsyncMutex<D>,
    ) -> Result<Activation, PanelError> {
        if lock(&self.state).has_processed_image {
            self.reopen_title_chooser()?;
            return Ok(Activation::TitlesReopened);
        }
        self.process(document).await?;
        Ok(Activation::Processed)
    }

    /// Send the block's image to the relay and apply the result.
    ///
    /// On success the alt attribute is overwritten, the legend lands in a
    /// paragraph directly after the image (replacing the one a previous run
    /// inserted there) and the title chooser opens. On failure the document
    /// is left as it was and the error is kept for display.
    pub async fn process<D: EditorDocument>(
        &self,
        document: &AsyncMutex<D>,
    ) -> Result<(), PanelError> {
        {
            let mut state = lock(&self.state);
            if state.is_processing {
                return Err(PanelError::AlreadyProcessing);
            }
            state.is_processing = true;
        }
        let _in_flight = InFlight(&self.state);

        let outcome = self.run(document).await;

        let mut state = lock(&self.state);
        match &outcome {
            Ok(applied) => {
                state.title_options = applied.titles.clone();
                state.legend_block = Some(applied.legend_block.clone());
                state.has_processed_image = true;
                state.show_title_modal = true;
                state.last_error = None;
            }
            Err(err) => {
                warn!(block = %self.block, error = %err, "Image processing failed");
                state.last_error = Some(err.to_string());
            }
        }

        outcome.map(|_| ())
    }

    async fn run<D: EditorDocument>(
        &self,
        document: &AsyncMutex<D>,
    ) -> Result<Applied, PanelError> {
        let (image_id, image_url) = {
            let doc = document.lock().await;
            (
                doc.attribute(&self.block, "id").map(|id| match id.parse::<u64>() {
                    Ok(n) => ImageId::Number(n),
                    Err(_) => ImageId::Text(id),
                }),
                doc.attribute(&self.block, "url"),
            )
        };
        let image_id = image_id.filter(|id| !id.is_empty());
        let image_url = image_url.filter(|url| !url.is_empty());
        let (Some(image_id), Some(image_url)) = (image_id, image_url) else {
            return Err(PanelError::MissingImageData);
        };

        let request = ProcessRequest::new(image_id, image_url);
        let reply = self.relay.process(&request).await?;

        let previous_legend = lock(&self.state).legend_block.clone();

        let mut doc = document.lock().await;
        let legend_block = doc.insert_sibling_after(
            &self.block,
            NewBlock::paragraph(reply.legend),
            previous_legend.as_ref(),
        )?;

        let alt = reply
            .alt_text
            .filter(|alt| !alt.is_empty())
            .or_else(|| doc.attribute(&self.block, "alt"));
        if let Some(alt) = alt {
            doc.set_attribute(&self.block, "alt", alt)?;
        }

        info!(block = %self.block, legend_block = %legend_block, "Applied generated image text");
        Ok(Applied {
            titles: reply.titles.to_vec(),
            legend_block,
        })
    }

    /// Apply `title` as the document title, save, and close the chooser.
    ///
    /// The captured titles stay available for [`Self::reopen_title_chooser`].
    pub async fn select_title<D: EditorDocument>(
        &self,
        document: &AsyncMutex<D>,
        title: &str,
    ) -> Result<(), PanelError> {
        document.lock().await.set_title_and_save(title)?;
        lock(&self.state).show_title_modal = false;
        Ok(())
    }

    /// Show the titles of the last successful run again, without a request.
    pub fn reopen_title_chooser(&self) -> Result<Vec<String>, PanelError> {
        let mut state = lock(&self.state);
        if !state.has_processed_image {
            return Err(PanelError::NoTitles);
        }
        state.show_title_modal = true;
        Ok(state.title_options.clone())
    }

    pub fn close_title_chooser(&self) {
        lock(&self.state).show_title_modal = false;
    }
}
