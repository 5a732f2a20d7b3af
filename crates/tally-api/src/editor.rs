//! # Draft Editor
//!
//! Drives one [`InvoiceDraft`] through loading, editing and saving against
//! an [`InvoiceBackend`].
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Editor States                                    │
//! │                                                                         │
//! │   Empty ──open_new / open_existing──► Loading                          │
//! │                                          │                              │
//! │                         ┌────────────────┴──────────────┐               │
//! │                         ▼                               ▼               │
//! │                       Ready ◄──────── edit ───────── LoadError          │
//! │                         │  ▲                         (no draft)         │
//! │                    save │  │ edit                                       │
//! │                         ▼  │                                            │
//! │                       Saving ──failure──► SaveError (draft kept)        │
//! │                         │                                               │
//! │                         ▼ success                                       │
//! │                       Saved (draft discarded)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Mutations are accepted in `Ready` and `SaveError`. Editing after a failed
//! save returns the editor to `Ready`. Nothing is retried automatically.
//!
//! One editor holds one draft; it takes `&mut self` for every operation, so
//! no locking is involved.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tally_core::draft::{DroppedRow, InvoiceDraft, InvoiceNumber, LineId, LineItem};
use tally_core::types::{Invoice, InvoiceId, ItemId};
use tally_core::validation::{parse_percentage, LineEdit, LineField};
use tally_core::{Catalog, CoreError, CoreResult, InvoiceTotals, FALLBACK_INVOICE_NUMBER};
use tracing::{debug, info, warn};

use crate::backend::InvoiceBackend;
use crate::error::ApiResult;

// =============================================================================
// Editor State
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EditorState {
    Empty,
    Loading,
    Ready,
    Saving,
    Saved,
    LoadError,
    SaveError,
}

impl EditorState {
    pub fn is_editable(&self) -> bool {
        matches!(self, EditorState::Ready | EditorState::SaveError)
    }
}

impl fmt::Display for EditorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditorState::Empty => "empty",
            EditorState::Loading => "loading",
            EditorState::Ready => "ready",
            EditorState::Saving => "saving",
            EditorState::Saved => "saved",
            EditorState::LoadError => "load error",
            EditorState::SaveError => "save error",
        };
        f.write_str(name)
    }
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    /// Persisted invoice, when the server echoed one back.
    pub invoice: Option<Invoice>,
    /// Rows left out because no item was selected.
    pub dropped: Vec<DroppedRow>,
}

// =============================================================================
// Draft Editor
// =============================================================================

pub struct DraftEditor<B> {
    backend: B,
    state: EditorState,
    draft: Option<InvoiceDraft>,
    catalog: Catalog,
    default_tax_percentage: Decimal,
    last_error: Option<String>,
}

impl<B: InvoiceBackend> DraftEditor<B> {
    pub fn new(backend: B) -> Self {
        DraftEditor {
            backend,
            state: EditorState::Empty,
            draft: None,
            catalog: Catalog::default(),
            default_tax_percentage: tally_core::DEFAULT_TAX_PERCENTAGE,
            last_error: None,
        }
    }

    /// Tax percentage seeded into new drafts.
    pub fn with_default_tax(mut self, pct: Decimal) -> Self {
        self.default_tax_percentage = pct;
        self
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Starts a new invoice dated `today`.
    ///
    /// The catalog and the number preview load concurrently. A failed
    /// preview falls back to `INV-0001`; a failed catalog is a load error.
    pub async fn open_new(&mut self, today: NaiveDate) -> ApiResult<()> {
        self.begin_load();

        let mut draft = InvoiceDraft::new(today);
        if let Err(e) = draft.set_tax_percentage(self.default_tax_percentage) {
            warn!(error = %e, "Ignoring invalid default tax percentage");
        }

        let (items, preview) = tokio::join!(
            self.backend.list_items(),
            self.backend.next_invoice_number()
        );

        let number = match preview {
            Ok(n) => n,
            Err(e) => {
                warn!(error = %e, "Invoice number preview failed, using fallback");
                FALLBACK_INVOICE_NUMBER
            }
        };
        draft.set_number(InvoiceNumber::Preview(number));

        match items {
            Ok(items) => {
                debug!(items = items.len(), preview = number, "New draft ready");
                self.finish_load(Catalog::new(items), draft);
                Ok(())
            }
            Err(e) => Err(self.fail_load(e)),
        }
    }

    /// Loads invoice `id` for editing. Either request failing is a load
    /// error.
    pub async fn open_existing(&mut self, id: InvoiceId) -> ApiResult<()> {
        self.begin_load();

        let loaded = tokio::try_join!(self.backend.list_items(), self.backend.get_invoice(id));

        match loaded {
            Ok((items, invoice)) => {
                debug!(invoice_id = id, lines = invoice.lines.len(), "Existing draft ready");
                self.finish_load(Catalog::new(items), InvoiceDraft::from_invoice(&invoice));
                Ok(())
            }
            Err(e) => Err(self.fail_load(e)),
        }
    }

    fn begin_load(&mut self) {
        self.state = EditorState::Loading;
        self.draft = None;
        self.last_error = None;
    }

    fn finish_load(&mut self, catalog: Catalog, draft: InvoiceDraft) {
        self.catalog = catalog;
        self.draft = Some(draft);
        self.state = EditorState::Ready;
    }

    fn fail_load(&mut self, err: crate::error::ApiError) -> crate::error::ApiError {
        warn!(error = %err, "Draft load failed");
        self.state = EditorState::LoadError;
        self.draft = None;
        self.last_error = Some(err.user_message());
        err
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    fn editable(&mut self, operation: &str) -> CoreResult<&mut InvoiceDraft> {
        match (&mut self.draft, self.state.is_editable()) {
            (Some(draft), true) => {
                if self.state == EditorState::SaveError {
                    self.state = EditorState::Ready;
                    self.last_error = None;
                }
                Ok(draft)
            }
            _ => Err(CoreError::DraftNotEditable {
                state: self.state.to_string(),
                operation: operation.to_string(),
            }),
        }
    }

    /// Points `row` at catalog item `item_id`, replacing its description
    /// and rate.
    pub fn select_item(&mut self, row: usize, item_id: ItemId) -> CoreResult<()> {
        let item = self
            .catalog
            .get(item_id)
            .cloned()
            .ok_or(CoreError::UnknownItem(item_id))?;
        self.editable("select an item")?.select_item(row, &item)
    }

    pub fn edit_field(&mut self, row: usize, edit: LineEdit) -> CoreResult<()> {
        self.editable("edit a line")?.apply_edit(row, edit)
    }

    /// Parses `input` for `field` and applies it. Invalid text leaves the
    /// row unchanged.
    pub fn edit_field_text(&mut self, row: usize, field: LineField, input: &str) -> CoreResult<()> {
        let edit = LineEdit::parse(field, input)?;
        self.edit_field(row, edit)
    }

    pub fn add_row(&mut self) -> CoreResult<LineId> {
        Ok(self.editable("add a row")?.add_row())
    }

    pub fn remove_row(&mut self, row: usize) -> CoreResult<LineItem> {
        self.editable("remove a row")?.remove_row(row)
    }

    pub fn set_invoice_date(&mut self, date: NaiveDate) -> CoreResult<()> {
        self.editable("change the date")?.set_invoice_date(date);
        Ok(())
    }

    pub fn set_customer_name(&mut self, name: &str) -> CoreResult<()> {
        self.editable("change the customer")?.set_customer_name(name);
        Ok(())
    }

    pub fn set_address(&mut self, address: &str) -> CoreResult<()> {
        self.editable("change the address")?.set_address(address);
        Ok(())
    }

    pub fn set_city(&mut self, city: &str) -> CoreResult<()> {
        self.editable("change the city")?.set_city(city);
        Ok(())
    }

    pub fn set_notes(&mut self, notes: &str) -> CoreResult<()> {
        self.editable("change the notes")?.set_notes(notes);
        Ok(())
    }

    pub fn set_tax_percentage(&mut self, pct: Decimal) -> CoreResult<()> {
        self.editable("change the tax")?.set_tax_percentage(pct)?;
        Ok(())
    }

    pub fn set_tax_percentage_text(&mut self, input: &str) -> CoreResult<()> {
        let pct = parse_percentage("taxPercentage", input)?;
        self.set_tax_percentage(pct)
    }

    // -------------------------------------------------------------------------
    // Save
    // -------------------------------------------------------------------------

    /// Sends the draft once. `POST` for a new invoice, `PUT` for an
    /// existing one.
    ///
    /// On success the draft is discarded. On failure it is kept in
    /// `SaveError` so the caller can fix it and save again.
    pub async fn save(&mut self) -> ApiResult<SaveOutcome> {
        let plan = self.editable("save")?.build_payload()?;

        for row in plan.discarded_content() {
            warn!(
                row = row.row,
                line_id = row.line_id.get(),
                description = %row.description,
                "Discarding row with no item selected"
            );
        }

        self.state = EditorState::Saving;
        match self.backend.save_invoice(&plan.payload).await {
            Ok(invoice) => {
                let invoice_id = invoice
                    .as_ref()
                    .map(|i| i.invoice_id)
                    .or(plan.payload.invoice_id);
                info!(
                    ?invoice_id,
                    lines = plan.payload.lines.len(),
                    "Invoice saved"
                );
                self.state = EditorState::Saved;
                self.draft = None;
                Ok(SaveOutcome {
                    invoice,
                    dropped: plan.dropped,
                })
            }
            Err(e) => {
                warn!(error = %e, "Invoice save failed, draft kept");
                self.state = EditorState::SaveError;
                self.last_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn draft(&self) -> Option<&InvoiceDraft> {
        self.draft.as_ref()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Message of the most recent load or save failure.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn totals(&self) -> Option<InvoiceTotals> {
        self.draft.as_ref().map(InvoiceDraft::totals)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
