//! Sequential page text extraction feeding the search engine.
//!
//! Pages are pulled strictly in order: page `i + 1` is not requested before
//! page `i` has been stored. The host drives extraction from its event loop
//! with [`TextExtractor::pump`], so searches issued early only see the pages
//! extracted so far.

use log::{debug, error, info};

use super::document::DocumentService;
use super::error::Result;
use crate::search_engine::SearchEngine;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExtractionState {
    /// No document
    #[default]
    Idle,
    /// Next page (zero-based) to extract
    Running { next_page: usize },
    Done,
    /// Halted by a failed fetch of this page (zero-based)
    Failed { page: usize },
}

#[derive(Debug, Default)]
pub struct TextExtractor {
    state: ExtractionState,
}

impl TextExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin extraction from the first page
    pub fn start(&mut self) {
        self.state = ExtractionState::Running { next_page: 0 };
    }

    pub fn reset(&mut self) {
        self.state = ExtractionState::Idle;
    }

    #[must_use]
    pub fn state(&self) -> ExtractionState {
        self.state
    }

    /// True once extraction can make no further progress
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(
            self.state,
            ExtractionState::Done | ExtractionState::Failed { .. }
        )
    }

    /// Extract up to `budget` pages, returning how many were stored.
    ///
    /// A failed fetch halts extraction for good and is returned once; pages
    /// stored before it remain searchable.
    pub fn pump(
        &mut self,
        document: &DocumentService,
        engine: &mut SearchEngine,
        budget: usize,
    ) -> Result<usize> {
        let mut extracted = 0;

        while extracted < budget {
            let ExtractionState::Running { next_page } = self.state else {
                break;
            };

            if next_page >= document.pages_count() {
                info!("Text extraction finished after {next_page} pages");
                self.state = ExtractionState::Done;
                break;
            }

            match extract_page(document, next_page) {
                Ok(tokens) => {
                    debug!("Extracted {} text items from page {}", tokens.len(), next_page + 1);
                    engine.set_page_content(next_page, tokens);
                    extracted += 1;
                    self.state = ExtractionState::Running {
                        next_page: next_page + 1,
                    };
                }
                Err(e) => {
                    error!("Text extraction halted at page {}: {e}", next_page + 1);
                    self.state = ExtractionState::Failed { page: next_page };
                    return Err(e);
                }
            }
        }

        // Settle the final state without waiting for another pump
        if let ExtractionState::Running { next_page } = self.state {
            if next_page >= document.pages_count() {
                self.state = ExtractionState::Done;
            }
        }

        Ok(extracted)
    }

    /// Extract every remaining page
    pub fn run_to_end(&mut self, document: &DocumentService, engine: &mut SearchEngine) -> Result<usize> {
        self.pump(document, engine, usize::MAX)
    }
}

fn extract_page(document: &DocumentService, page_index: usize) -> Result<Vec<String>> {
    let page = document.page(page_index + 1)?;
    Ok(page.text_content()?.into_tokens())
}
